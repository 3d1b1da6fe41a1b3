use std::{error::Error, fmt};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};

pub const DEFAULT_POMODORO_MINUTES: u32 = 25;
/// targets are a time of day, so a pomodoro has to end well inside the next 24 hours
pub const MAX_POMODORO_MINUTES: u32 = 180;

/// keeps a pomodoro length inside `1..=MAX_POMODORO_MINUTES`
#[must_use]
pub fn pomodoro_minutes(minutes: u32) -> u32 {
    minutes.clamp(1, MAX_POMODORO_MINUTES)
}

/// where the alarm is in its life
/// `Idle` doubles as the disabled state: nothing fires until a new target is armed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Armed {
        target: NaiveTime,
        armed_at: NaiveDateTime,
    },
    Fired {
        target: NaiveTime,
        armed_at: NaiveDateTime,
        /// the exact moment the alarm was aiming for when it went off
        due: NaiveDateTime,
    },
}

/// a calendar minute, used to keep the checker from firing twice in the same minute
type MinuteStamp = (NaiveDate, u32, u32);

fn minute_stamp(now: NaiveDateTime) -> MinuteStamp {
    (now.date(), now.hour(), now.minute())
}

fn same_minute(time: NaiveTime, now: NaiveDateTime) -> bool {
    time.hour() == now.hour() && time.minute() == now.minute()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseTargetError {
    Empty,
    Malformed(String),
}

impl fmt::Display for ParseTargetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "no time given"),
            Self::Malformed(input) => write!(f, "`{input}` is not a time in HH:MM format"),
        }
    }
}

impl Error for ParseTargetError {}

/// parses user input of the form `HH:MM` into a time of day with the seconds zeroed
pub fn parse_target(input: &str) -> Result<NaiveTime, ParseTargetError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseTargetError::Empty);
    }
    NaiveTime::parse_from_str(input, "%H:%M")
        .map_err(|_| ParseTargetError::Malformed(input.to_string()))
}

/// signed time left until the alarm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    /// no alarm set
    Zero,
    Ahead(TimeDelta),
    /// the alarm went off this long ago and hasn't been dismissed
    Overdue(TimeDelta),
}

impl Countdown {
    #[must_use]
    pub const fn is_overdue(&self) -> bool {
        matches!(self, Self::Overdue(_))
    }

    /// remaining whole seconds, negative once overdue
    #[must_use]
    pub fn signed_seconds(&self) -> i64 {
        match self {
            Self::Zero => 0,
            Self::Ahead(delta) => delta.num_seconds(),
            Self::Overdue(delta) => -delta.num_seconds(),
        }
    }
}

fn write_clock(f: &mut fmt::Formatter<'_>, seconds: i64) -> fmt::Result {
    let (hours, rest) = (seconds / 3600, seconds % 3600);
    let (minutes, seconds) = (rest / 60, rest % 60);
    if hours > 0 {
        write!(f, "{hours:02}:{minutes:02}:{seconds:02}")
    } else {
        write!(f, "{minutes:02}:{seconds:02}")
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zero => write!(f, "00:00"),
            Self::Ahead(delta) => write_clock(f, delta.num_seconds().max(0)),
            Self::Overdue(delta) => {
                write!(f, "-")?;
                write_clock(f, delta.num_seconds().max(0))
            }
        }
    }
}

/// the alarm target and its trigger state
///
/// every method takes the current time explicitly so the clock can be driven from tests
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlarmClock {
    phase: Phase,
    last_fired: Option<MinuteStamp>,
}

impl AlarmClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub const fn target(&self) -> Option<NaiveTime> {
        match self.phase {
            Phase::Idle => None,
            Phase::Armed { target, .. } | Phase::Fired { target, .. } => Some(target),
        }
    }

    #[must_use]
    pub const fn is_triggered(&self) -> bool {
        matches!(self.phase, Phase::Fired { .. })
    }

    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        matches!(self.phase, Phase::Idle)
    }

    /// sets a new target, re-enabling the alarm and forgetting any earlier trigger
    pub fn arm(&mut self, target: NaiveTime, now: NaiveDateTime) {
        self.phase = Phase::Armed {
            target,
            armed_at: now,
        };
    }

    /// parses `HH:MM` and arms it, leaving the clock untouched if the input is bad
    pub fn set_custom(
        &mut self,
        input: &str,
        now: NaiveDateTime,
    ) -> Result<NaiveTime, ParseTargetError> {
        let target = parse_target(input)?;
        self.arm(target, now);
        Ok(target)
    }

    pub fn start_pomodoro(&mut self, now: NaiveDateTime, minutes: u32) -> NaiveTime {
        let minutes = pomodoro_minutes(minutes);
        let target = (now + TimeDelta::minutes(i64::from(minutes))).time();
        let target = target.with_nanosecond(0).unwrap_or(target);
        self.arm(target, now);
        target
    }

    pub fn clear(&mut self) {
        self.phase = Phase::Idle;
    }

    /// one checker step, returns true if the alarm went off just now
    pub fn poll(&mut self, now: NaiveDateTime) -> bool {
        let Phase::Armed { target, armed_at } = self.phase else {
            return false;
        };
        let stamp = minute_stamp(now);
        if !same_minute(target, now) || self.last_fired == Some(stamp) {
            return false;
        }
        self.phase = Phase::Fired {
            target,
            armed_at,
            due: now.date().and_time(target),
        };
        self.last_fired = Some(stamp);
        true
    }

    /// when an armed alarm is expected to go off, seen from `now`
    fn next_due(&self, target: NaiveTime, now: NaiveDateTime) -> NaiveDateTime {
        let today = now.date().and_time(target);
        if now < today {
            return today;
        }
        // still inside the target minute and the checker hasn't had its turn yet
        if same_minute(target, now) && self.last_fired != Some(minute_stamp(now)) {
            return now;
        }
        today + TimeDelta::days(1)
    }

    #[must_use]
    pub fn countdown(&self, now: NaiveDateTime) -> Countdown {
        match self.phase {
            Phase::Idle => Countdown::Zero,
            Phase::Armed { target, .. } => Countdown::Ahead(self.next_due(target, now) - now),
            Phase::Fired { due, .. } => {
                if now < due {
                    Countdown::Ahead(due - now)
                } else {
                    Countdown::Overdue(now - due)
                }
            }
        }
    }

    /// how much of the armed interval has gone by, from 0 to 1
    #[must_use]
    pub fn progress(&self, now: NaiveDateTime) -> Option<f32> {
        match self.phase {
            Phase::Idle => None,
            Phase::Fired { .. } => Some(1.0),
            Phase::Armed { target, armed_at } => {
                let total = (self.next_due(target, now) - armed_at).num_milliseconds();
                if total <= 0 {
                    return Some(1.0);
                }
                let elapsed = (now - armed_at).num_milliseconds();
                #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
                let fraction = (elapsed as f64 / total as f64) as f32;
                Some(fraction.clamp(0.0, 1.0))
            }
        }
    }
}
