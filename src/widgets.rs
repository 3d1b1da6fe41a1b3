use std::f32::consts::TAU;

use eframe::egui::{Color32, Pos2, Sense, Shape, Stroke, Vec2, Widget};

pub const COUNTDOWN_COLOR: Color32 = Color32::from_rgb(0x2e, 0xa0, 0x43);
pub const OVERDUE_COLOR: Color32 = Color32::from_rgb(0xd0, 0x30, 0x30);

/// a ring that fills clockwise from the top as the alarm gets closer
pub struct ProgressDial {
    fraction: f32,
    overdue: bool,
    radius: Option<f32>,
    thickness: f32,
}

impl ProgressDial {
    #[must_use]
    pub fn new(fraction: f32) -> Self {
        Self {
            fraction: fraction.clamp(0.0, 1.0),
            overdue: false,
            radius: None,
            thickness: 6.0,
        }
    }

    #[must_use]
    pub const fn overdue(mut self, overdue: bool) -> Self {
        self.overdue = overdue;
        self
    }

    #[must_use]
    pub const fn radius(mut self, radius: f32) -> Self {
        self.radius = Some(radius);
        self
    }
}

/// points along an arc starting at the top, going clockwise
fn arc_points(center: Pos2, radius: f32, fraction: f32) -> Vec<Pos2> {
    // roughly one segment per 3 degrees
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let segments = ((fraction * 120.0).ceil() as usize).max(1);
    (0..=segments)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let angle = fraction * TAU * (i as f32 / segments as f32) - TAU / 4.0;
            center + Vec2::angled(angle) * radius
        })
        .collect()
}

impl Widget for ProgressDial {
    fn ui(self, ui: &mut eframe::egui::Ui) -> eframe::egui::Response {
        let radius = self
            .radius
            .unwrap_or_else(|| ui.spacing().slider_width / 4.);
        let (rect, response) =
            ui.allocate_exact_size(Vec2::splat(radius * 2. + self.thickness), Sense::hover());
        if !ui.is_rect_visible(rect) {
            return response;
        }
        let visuals = ui.style().noninteractive();
        let painter = ui.painter();
        painter.circle_stroke(
            rect.center(),
            radius,
            Stroke::new(self.thickness, visuals.bg_stroke.color),
        );
        let color = if self.overdue {
            OVERDUE_COLOR
        } else {
            COUNTDOWN_COLOR
        };
        if self.fraction > 0.0 {
            painter.add(Shape::line(
                arc_points(rect.center(), radius, self.fraction),
                Stroke::new(self.thickness, color),
            ));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arc_starts_at_the_top() {
        let center = Pos2::new(50.0, 50.0);
        let points = arc_points(center, 10.0, 0.25);
        let first = points[0];
        let last = points[points.len() - 1];
        assert!((first.x - 50.0).abs() < 1e-4 && (first.y - 40.0).abs() < 1e-4);
        // a quarter turn clockwise ends up on the right
        assert!((last.x - 60.0).abs() < 1e-4 && (last.y - 50.0).abs() < 1e-4);
    }

    #[test]
    fn radius_overrides_the_default() {
        assert_eq!(ProgressDial::new(0.5).radius, None);
        assert_eq!(ProgressDial::new(0.5).radius(28.0).radius, Some(28.0));
    }

    #[test]
    fn dial_fraction_is_clamped() {
        assert!((ProgressDial::new(1.7).fraction - 1.0).abs() < f32::EPSILON);
        assert!(ProgressDial::new(-0.2).fraction.abs() < f32::EPSILON);
    }
}
