use eframe::egui::{self, Key, TextEdit, Widget, Window};

/// the "Set Alarm Time" prompt
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeEntry {
    text: String,
    focused: bool,
}

pub enum EditingState {
    Cancelled,
    Editing,
    /// the raw text, parsing happens when it's applied to the alarm
    Done(String),
}

impl TimeEntry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, ctx: &egui::Context) -> EditingState {
        let mut ret = EditingState::Editing;
        Window::new("Set Alarm Time")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label("Enter time in HH:MM format:");
                let response = TextEdit::singleline(&mut self.text)
                    .hint_text("HH:MM")
                    .desired_width(80.0)
                    .char_limit(5)
                    .ui(ui);
                if !self.focused {
                    response.request_focus();
                    self.focused = true;
                }
                // enter in the field counts as done
                let submitted =
                    response.lost_focus() && ui.input(|input| input.key_pressed(Key::Enter));
                ui.horizontal(|ui| {
                    if ui.button("done").clicked() || submitted {
                        ret = EditingState::Done(self.text.clone());
                    } else if ui.button("cancel").clicked()
                        || ui.input(|input| input.key_pressed(Key::Escape))
                    {
                        ret = EditingState::Cancelled;
                    }
                });
            });
        ret
    }
}
