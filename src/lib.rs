#![warn(clippy::pedantic, clippy::nursery, clippy::cargo)]
#![deny(clippy::use_self, rust_2018_idioms)]
#![allow(clippy::multiple_crate_versions, clippy::module_name_repetitions)]

use std::{path::Path, sync::mpsc::Sender, time::Instant};

use alarm::MAX_POMODORO_MINUTES;
use alarm_edit::{EditingState, TimeEntry};
use chrono::NaiveDateTime;
use communication::Message;
use config::Config;
use eframe::egui::{
    self, Button, CentralPanel, Checkbox, Color32, DragValue, Layout, RichText, TextEdit,
    TopBottomPanel, ViewportCommand, Window, WindowLevel,
};
use session::SharedSession;
use status::StatusLevel;
use widgets::{ProgressDial, COUNTDOWN_COLOR, OVERDUE_COLOR};

/// the alarm state machine and countdown
pub mod alarm;
/// implementation of the set-time prompt for egui
pub mod alarm_edit;
pub mod checker;
pub mod communication;
pub mod config;
pub mod session;
pub mod sound;
pub mod status;
pub mod widgets;

const LABEL_COLOR: Color32 = Color32::GRAY;
const TARGET_COLOR: Color32 = Color32::from_rgb(0x3a, 0x7b, 0xd5);
const DIAL_RADIUS: f32 = 28.0;

pub struct FocusClock {
    config: Config,
    session: SharedSession,
    sender: Sender<Message>,
    in_config: bool,
    setting_time: Option<TimeEntry>,
    /// the current task note, never saved
    task: String,
}

impl FocusClock {
    #[must_use]
    pub fn new(config: Config, session: SharedSession, sender: Sender<Message>) -> Self {
        Self {
            config,
            session,
            sender,
            in_config: false,
            setting_time: None,
            task: String::new(),
        }
    }

    fn now() -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }

    fn send(&self, message: Message) {
        if self.sender.send(message).is_err() {
            log::warn!("sound thread is gone");
        }
    }

    const fn window_level(&self) -> WindowLevel {
        if self.config.always_on_top {
            WindowLevel::AlwaysOnTop
        } else {
            WindowLevel::Normal
        }
    }

    /// silences the old alarm and undoes the raise from it going off
    fn dismiss(&self, ctx: &egui::Context) {
        self.send(Message::Silence);
        ctx.send_viewport_cmd(ViewportCommand::WindowLevel(self.window_level()));
    }

    fn go_pomodoro(&mut self, ctx: &egui::Context) {
        self.dismiss(ctx);
        session::lock(&self.session).start_pomodoro(Self::now(), self.config.pomodoro_minutes);
    }

    fn set_alarm(&mut self, input: &str, ctx: &egui::Context) {
        let armed = session::lock(&self.session).set_custom(input, Self::now());
        if armed {
            self.dismiss(ctx);
        }
    }

    fn clear_alarm(&mut self, ctx: &egui::Context) {
        self.dismiss(ctx);
        session::lock(&self.session).clear();
    }

    fn toggle_always_on_top(&mut self, ctx: &egui::Context) {
        ctx.send_viewport_cmd(ViewportCommand::WindowLevel(self.window_level()));
        session::lock(&self.session)
            .status
            .info("Always on top toggled.");
    }

    fn save(&mut self) {
        let saved = Config::config_path().and_then(|path| self.config.save(path));
        let mut session = session::lock(&self.session);
        match saved {
            Ok(()) => session.status.info("Settings saved."),
            Err(e) => {
                log::error!("{e}");
                session.status.error(format!("Error: {e}"));
            }
        }
    }

    fn pick_sound(&mut self) {
        let file_dialog = rfd::FileDialog::new()
            .set_title("Pick alarm sound")
            .add_filter("audio", &["wav", "mp3", "ogg", "flac"]);
        let file_dialog = match directories::UserDirs::new()
            .and_then(|u| u.audio_dir().map(Path::to_path_buf))
        {
            Some(audio_path) => file_dialog.set_directory(audio_path),
            None => file_dialog,
        };
        if let Some(path) = file_dialog.pick_file() {
            log::info!("picked alarm sound {}", path.display());
            self.config.sound.path = Some(path);
            self.send(Message::Configure(self.config.sound.clone()));
        }
    }

    fn render_settings(&mut self, ctx: &egui::Context) {
        let mut open = self.in_config;
        Window::new("settings ⚙")
            .open(&mut open)
            .resizable(false)
            .show(ctx, |ui| {
                let mut sound_changed = false;
                ui.horizontal(|ui| {
                    let name = self.config.sound.path.as_ref().map_or_else(
                        || "bundled chime".to_string(),
                        |path| path.display().to_string(),
                    );
                    ui.label(format!("alarm sound: {name}"));
                });
                ui.horizontal(|ui| {
                    if ui.button("Custom").clicked() {
                        self.pick_sound();
                    }
                    if ui
                        .add_enabled(self.config.sound.path.is_some(), Button::new("Default"))
                        .clicked()
                    {
                        self.config.sound.path = None;
                        sound_changed = true;
                    }
                    if ui.button("Test").clicked() {
                        self.send(Message::Ring);
                    }
                    if ui.button("Stop").clicked() {
                        self.send(Message::Silence);
                    }
                });
                sound_changed |= ui
                    .add(
                        egui::Slider::new(&mut self.config.sound.volume, 0.0..=100.0)
                            .integer()
                            .suffix("%")
                            .text("volume"),
                    )
                    .changed();
                sound_changed |= ui
                    .checkbox(&mut self.config.sound.repeat, "repeat until cleared")
                    .changed();
                ui.horizontal(|ui| {
                    ui.label("pomodoro length");
                    ui.add(
                        DragValue::new(&mut self.config.pomodoro_minutes)
                            .range(1..=MAX_POMODORO_MINUTES)
                            .suffix(" min"),
                    );
                });
                if sound_changed {
                    self.send(Message::Configure(self.config.sound.clone()));
                }
                ui.separator();
                if ui.button("save").clicked() {
                    self.save();
                }
            });
        self.in_config = open;
    }

    fn render_header(&mut self, ctx: &egui::Context, now: NaiveDateTime) {
        TopBottomPanel::top("date_and_ctrl").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let theme_btn = ui.add(Button::new({
                    if self.config.theme == config::Theme::Dark {
                        "🌞"
                    } else {
                        "🌙"
                    }
                }));
                if theme_btn.clicked() {
                    self.config.theme = !self.config.theme;
                }
                ui.with_layout(Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("⚙").on_hover_text("settings").clicked() {
                        self.in_config = true;
                    }
                    ui.centered_and_justified(|ui| {
                        ui.label(
                            RichText::new(now.format(&self.config.date_format).to_string())
                                .size(16.0),
                        );
                    });
                });
            });
        });
    }

    fn render_status(&self, ctx: &egui::Context) {
        let session = session::lock(&self.session);
        TopBottomPanel::bottom("status").show(ctx, |ui| {
            match session.status.current(Instant::now()) {
                Some(notice) => {
                    let color = match notice.level {
                        StatusLevel::Info => COUNTDOWN_COLOR,
                        StatusLevel::Warning | StatusLevel::Error => OVERDUE_COLOR,
                    };
                    ui.label(RichText::new(format!("   {}", notice.message)).color(color));
                }
                // keep the bar from collapsing
                None => {
                    ui.label("");
                }
            }
        });
    }

    fn render_alarm(&mut self, ui: &mut egui::Ui, now: NaiveDateTime) {
        let (target, countdown, progress) = {
            let mut session = session::lock(&self.session);
            session.status.prune(Instant::now());
            (
                session.alarm.target(),
                session.alarm.countdown(now),
                session.alarm.progress(now),
            )
        };
        ui.label(RichText::new("Next Alarm:").color(LABEL_COLOR));
        ui.label(
            RichText::new(target.map_or_else(
                || "Not set".to_string(),
                |target| target.format("%H:%M:%S").to_string(),
            ))
            .color(TARGET_COLOR),
        );
        ui.label(RichText::new("Remaining Time:").color(LABEL_COLOR));
        let color = if countdown.is_overdue() {
            OVERDUE_COLOR
        } else {
            COUNTDOWN_COLOR
        };
        ui.label(RichText::new(countdown.to_string()).size(18.0).color(color));
        if let Some(fraction) = progress {
            ui.add(
                ProgressDial::new(fraction)
                    .overdue(countdown.is_overdue())
                    .radius(DIAL_RADIUS),
            );
        }
    }

    fn render_controls(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.horizontal(|ui| {
            if ui.button("Go Pomodoro").clicked() {
                self.go_pomodoro(ctx);
            }
            if ui.button("Set Alarm Time").clicked() {
                self.setting_time = Some(TimeEntry::new());
            }
            if ui.button("Clear Alarm").clicked() {
                self.clear_alarm(ctx);
            }
        });
        if ui
            .add(Checkbox::new(&mut self.config.always_on_top, "Always on Top"))
            .changed()
        {
            self.toggle_always_on_top(ctx);
        }
    }
}

impl eframe::App for FocusClock {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // the clock face only needs to change once a second, the checker thread wakes us for alarms
        ctx.request_repaint_after(checker::POLL_INTERVAL);
        ctx.set_visuals(self.config.theme.into());
        let now = Self::now();

        if self.in_config {
            self.render_settings(ctx);
        }
        if let Some(entry) = &mut self.setting_time {
            match entry.render(ctx) {
                EditingState::Done(input) => {
                    self.setting_time = None;
                    self.set_alarm(&input, ctx);
                }
                EditingState::Cancelled => {
                    self.setting_time = None;
                }
                EditingState::Editing => {}
            }
        }

        self.render_header(ctx, now);
        self.render_status(ctx);
        CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(
                    RichText::new(now.format(&self.config.time_format).to_string()).size(32.0),
                );
                ui.add_space(8.0);
                self.render_alarm(ui, now);
                ui.add_space(8.0);
                ui.with_layout(Layout::top_down(egui::Align::Min), |ui| {
                    ui.label(RichText::new("Current Task:").color(LABEL_COLOR));
                    ui.add(
                        TextEdit::multiline(&mut self.task)
                            .desired_rows(3)
                            .desired_width(f32::INFINITY),
                    );
                });
                ui.add_space(8.0);
                self.render_controls(ui, ctx);
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use eframe::egui::{FullOutput, RawInput, ViewportId};

    use super::*;
    use crate::session::Session;

    fn window_levels(output: &FullOutput) -> Vec<ViewportCommand> {
        output
            .viewport_output
            .get(&ViewportId::ROOT)
            .map(|viewport| {
                viewport
                    .commands
                    .iter()
                    .filter(|command| matches!(command, ViewportCommand::WindowLevel(_)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    #[test]
    fn new_target_lowers_a_raised_window() {
        let (tx, rx) = mpsc::channel();
        let mut app = FocusClock::new(Config::default(), Session::new().shared(), tx);
        let ctx = egui::Context::default();

        let output = ctx.run(RawInput::default(), |ctx| app.go_pomodoro(ctx));
        assert!(window_levels(&output)
            .contains(&ViewportCommand::WindowLevel(WindowLevel::Normal)));
        assert_eq!(rx.try_recv(), Ok(Message::Silence));

        let output = ctx.run(RawInput::default(), |ctx| app.set_alarm("07:30", ctx));
        assert!(window_levels(&output)
            .contains(&ViewportCommand::WindowLevel(WindowLevel::Normal)));
    }

    #[test]
    fn rejected_time_leaves_the_window_alone() {
        let (tx, rx) = mpsc::channel();
        let mut app = FocusClock::new(Config::default(), Session::new().shared(), tx);
        let ctx = egui::Context::default();

        let output = ctx.run(RawInput::default(), |ctx| app.set_alarm("25:99", ctx));
        assert!(window_levels(&output).is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn always_on_top_preference_survives_a_new_target() {
        let (tx, _rx) = mpsc::channel();
        let config = Config {
            always_on_top: true,
            ..Config::default()
        };
        let mut app = FocusClock::new(config, Session::new().shared(), tx);
        let ctx = egui::Context::default();

        let output = ctx.run(RawInput::default(), |ctx| app.set_alarm("07:30", ctx));
        assert!(window_levels(&output)
            .contains(&ViewportCommand::WindowLevel(WindowLevel::AlwaysOnTop)));
    }
}
