use std::{
    sync::mpsc::Sender,
    thread::{self, JoinHandle},
    time::Duration,
};

use chrono::NaiveDateTime;
use eframe::egui::{self, ViewportCommand, WindowLevel};

use crate::{
    communication::Message,
    session::{self, SharedSession},
};

pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// one pass of the checker, returns true if the alarm went off
pub fn check_once(session: &SharedSession, sender: &Sender<Message>, now: NaiveDateTime) -> bool {
    // keep the lock short, the ui thread wants it every frame
    let fired = session::lock(session).poll(now);
    if fired {
        log::info!("alarm triggered at {now}");
        if sender.send(Message::Ring).is_err() {
            log::warn!("sound thread is gone, alarm will be silent");
        }
    }
    fired
}

/// polls the alarm once a second for the rest of the process, outside of the ui's frame loop
pub fn spawn_checker(
    session: SharedSession,
    sender: Sender<Message>,
    ctx: egui::Context,
) -> JoinHandle<()> {
    thread::spawn(move || loop {
        let now = chrono::Local::now().naive_local();
        if check_once(&session, &sender, now) {
            // bring the window to the front so the alarm can be dismissed
            ctx.send_viewport_cmd(ViewportCommand::WindowLevel(WindowLevel::AlwaysOnTop));
            ctx.send_viewport_cmd(ViewportCommand::Focus);
            ctx.request_repaint();
        }
        thread::sleep(POLL_INTERVAL);
    })
}
