use std::time::{Duration, Instant};

/// how long a notice stays in the status bar
pub const STATUS_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusLevel {
    #[default]
    Info,
    /// not a failure, but shown in red
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub level: StatusLevel,
    expires: Instant,
}

/// a single transient message, newer notices replace older ones
#[derive(Debug, Clone, Default)]
pub struct StatusLine {
    notice: Option<Notice>,
}

impl StatusLine {
    #[must_use]
    pub const fn new() -> Self {
        Self { notice: None }
    }

    pub fn show(&mut self, message: impl Into<String>, level: StatusLevel) {
        self.show_at(message, level, Instant::now());
    }

    pub fn show_at(&mut self, message: impl Into<String>, level: StatusLevel, now: Instant) {
        let message = message.into();
        match level {
            StatusLevel::Info | StatusLevel::Warning => log::info!("{message}"),
            StatusLevel::Error => log::warn!("{message}"),
        }
        self.notice = Some(Notice {
            message,
            level,
            expires: now + STATUS_TTL,
        });
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.show(message, StatusLevel::Info);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.show(message, StatusLevel::Warning);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.show(message, StatusLevel::Error);
    }

    /// the notice still on screen at `now`, if any
    #[must_use]
    pub fn current(&self, now: Instant) -> Option<&Notice> {
        self.notice.as_ref().filter(|notice| now < notice.expires)
    }

    /// drops the notice once it has expired
    pub fn prune(&mut self, now: Instant) {
        if self.current(now).is_none() {
            self.notice = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notice_expires_after_three_seconds() {
        let start = Instant::now();
        let mut status = StatusLine::new();
        status.show_at("Alarm cleared.", StatusLevel::Info, start);

        let notice = status.current(start + Duration::from_secs(2)).unwrap();
        assert_eq!(notice.message, "Alarm cleared.");
        assert_eq!(notice.level, StatusLevel::Info);

        assert!(status.current(start + STATUS_TTL).is_none());
        status.prune(start + STATUS_TTL);
        assert!(status.current(start).is_none());
    }

    #[test]
    fn newer_notice_replaces_older() {
        let start = Instant::now();
        let mut status = StatusLine::new();
        status.show_at("first", StatusLevel::Info, start);
        status.show_at("second", StatusLevel::Error, start + Duration::from_secs(2));

        let notice = status.current(start + Duration::from_secs(4)).unwrap();
        assert_eq!(notice.message, "second");
        assert_eq!(notice.level, StatusLevel::Error);
    }
}
