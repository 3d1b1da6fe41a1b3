use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::NaiveDateTime;

use crate::{
    alarm::{self, AlarmClock, ParseTargetError},
    status::StatusLine,
};

/// state shared by the ui thread and the checker thread
pub type SharedSession = Arc<Mutex<Session>>;

/// locks the session, a panic on the other side doesn't make the alarm state unusable
pub fn lock(session: &SharedSession) -> MutexGuard<'_, Session> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    pub alarm: AlarmClock,
    pub status: StatusLine,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn shared(self) -> SharedSession {
        Arc::new(Mutex::new(self))
    }

    /// returns true if a new target was armed
    pub fn set_custom(&mut self, input: &str, now: NaiveDateTime) -> bool {
        match self.alarm.set_custom(input, now) {
            Ok(target) => {
                self.status
                    .info(format!("Alarm set for {}", target.format("%H:%M:%S")));
                true
            }
            Err(ParseTargetError::Empty) => {
                log::debug!("empty alarm time, nothing to do");
                false
            }
            Err(e) => {
                log::debug!("{e}");
                self.status.error("Error: Invalid time format. Use HH:MM");
                false
            }
        }
    }

    pub fn start_pomodoro(&mut self, now: NaiveDateTime, minutes: u32) {
        let minutes = alarm::pomodoro_minutes(minutes);
        let target = self.alarm.start_pomodoro(now, minutes);
        log::debug!("pomodoro ends at {target}");
        self.status.info(format!(
            "Pomodoro mode activated: {minutes} min work timer set."
        ));
    }

    pub fn clear(&mut self) {
        self.alarm.clear();
        self.status.warning("Alarm cleared.");
    }

    /// runs one checker step, posting a notice if the alarm goes off
    pub fn poll(&mut self, now: NaiveDateTime) -> bool {
        let fired = self.alarm.poll(now);
        if fired {
            self.status.info("Alarm triggered: Time to take a break!");
        }
        fired
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use chrono::{NaiveDate, NaiveTime};

    use super::*;
    use crate::status::StatusLevel;

    fn at(hour: u32, minute: u32, second: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 14)
            .unwrap()
            .and_hms_opt(hour, minute, second)
            .unwrap()
    }

    fn notice(session: &Session) -> (String, StatusLevel) {
        let notice = session.status.current(Instant::now()).unwrap();
        (notice.message.clone(), notice.level)
    }

    #[test]
    fn setting_a_time_announces_it() {
        let mut session = Session::new();
        assert!(session.set_custom("14:30", at(9, 0, 0)));
        assert_eq!(
            session.alarm.target(),
            NaiveTime::from_hms_opt(14, 30, 0)
        );
        assert_eq!(
            notice(&session),
            ("Alarm set for 14:30:00".to_string(), StatusLevel::Info)
        );
    }

    #[test]
    fn invalid_time_keeps_state_and_reports_error() {
        let mut session = Session::new();
        session.set_custom("08:15", at(7, 0, 0));
        let before = session.alarm.clone();

        for input in ["25:99", "abc"] {
            assert!(!session.set_custom(input, at(7, 1, 0)));
            assert_eq!(session.alarm, before);
            assert_eq!(
                notice(&session),
                (
                    "Error: Invalid time format. Use HH:MM".to_string(),
                    StatusLevel::Error
                )
            );
        }
    }

    #[test]
    fn empty_input_is_ignored_quietly() {
        let mut session = Session::new();
        assert!(!session.set_custom("  ", at(7, 0, 0)));
        assert!(session.status.current(Instant::now()).is_none());
        assert!(session.alarm.is_disabled());
    }

    #[test]
    fn pomodoro_announces_duration() {
        let mut session = Session::new();
        session.start_pomodoro(at(13, 0, 0), 25);
        assert_eq!(session.alarm.target(), NaiveTime::from_hms_opt(13, 25, 0));
        assert_eq!(
            notice(&session).0,
            "Pomodoro mode activated: 25 min work timer set."
        );

        session.start_pomodoro(at(13, 0, 0), 1440);
        assert_eq!(session.alarm.target(), NaiveTime::from_hms_opt(16, 0, 0));
        assert_eq!(
            notice(&session).0,
            "Pomodoro mode activated: 180 min work timer set."
        );
    }

    #[test]
    fn fire_then_clear() {
        let mut session = Session::new();
        session.set_custom("14:30", at(14, 0, 0));
        assert!(session.poll(at(14, 30, 0)));
        assert_eq!(notice(&session).0, "Alarm triggered: Time to take a break!");
        assert!(!session.poll(at(14, 30, 45)));

        session.clear();
        assert_eq!(session.alarm.target(), None);
        assert_eq!(session.alarm.countdown(at(14, 31, 0)).to_string(), "00:00");
        assert_eq!(
            notice(&session),
            ("Alarm cleared.".to_string(), StatusLevel::Warning)
        );
    }

    #[test]
    fn poisoned_lock_still_usable() {
        let shared = Session::new().shared();
        let poisoner = Arc::clone(&shared);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.lock().unwrap();
            panic!("poison the session");
        })
        .join();
        assert!(shared.is_poisoned());
        lock(&shared).start_pomodoro(at(8, 0, 0), 25);
        assert!(!lock(&shared).alarm.is_disabled());
    }
}
