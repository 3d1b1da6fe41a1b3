use std::{error::Error, fmt, fs, io, ops::Not, path::PathBuf};

use eframe::egui;
use serde::{Deserialize, Serialize};

use crate::alarm::{DEFAULT_POMODORO_MINUTES, MAX_POMODORO_MINUTES};

#[derive(Debug, Serialize, Deserialize, Default, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Not for Theme {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

impl From<Theme> for egui::Visuals {
    fn from(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self::dark(),
            Theme::Light => Self::light(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    /// no home directory to put the config in
    NoProjectDirs,
    Io(io::Error),
    Parse(toml::de::Error),
    Serialize(toml::ser::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoProjectDirs => write!(f, "couldn't find a home directory for the config"),
            Self::Io(e) => write!(f, "config io error: {e}"),
            Self::Parse(e) => write!(f, "couldn't parse config file: {e}"),
            Self::Serialize(e) => write!(f, "couldn't serialize config: {e}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NoProjectDirs => None,
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Serialize(e) => Some(e),
        }
    }
}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        Self::Parse(e)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(e: toml::ser::Error) -> Self {
        Self::Serialize(e)
    }
}

/// which sound to ring and how
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SoundSettings {
    /// `None` plays the bundled chime
    pub path: Option<PathBuf>,
    /// percent, 0 to 100
    pub volume: f32,
    /// keep ringing until the alarm is cleared
    pub repeat: bool,
}

impl Default for SoundSettings {
    fn default() -> Self {
        Self {
            path: None,
            volume: 100.0,
            repeat: false,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub time_format: String,
    pub date_format: String,
    pub theme: Theme,
    pub always_on_top: bool,
    pub pomodoro_minutes: u32,
    pub sound: SoundSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            time_format: "%H:%M:%S".to_string(),
            date_format: "%Y-%m-%d".to_string(),
            theme: Theme::Dark,
            always_on_top: false,
            pomodoro_minutes: DEFAULT_POMODORO_MINUTES,
            sound: SoundSettings::default(),
        }
    }
}

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml(config: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(config)?;
        if config.pomodoro_minutes == 0 {
            log::warn!(
                "pomodoro_minutes must be at least 1, using {DEFAULT_POMODORO_MINUTES}"
            );
            config.pomodoro_minutes = DEFAULT_POMODORO_MINUTES;
        } else if config.pomodoro_minutes > MAX_POMODORO_MINUTES {
            log::warn!(
                "pomodoro_minutes = {} is too long, using {MAX_POMODORO_MINUTES}",
                config.pomodoro_minutes
            );
            config.pomodoro_minutes = MAX_POMODORO_MINUTES;
        }
        config.sound.volume = config.sound.volume.clamp(0.0, 100.0);
        Ok(config)
    }

    pub fn load(path: PathBuf) -> Result<Self, ConfigError> {
        let config = fs::read_to_string(path)?;
        Self::from_toml(&config)
    }

    /// loads the user's config, any problem just means running with the defaults
    #[must_use]
    pub fn load_or_default() -> Self {
        let path = match Self::config_path() {
            Ok(path) => path,
            Err(e) => {
                log::warn!("{e}, using default settings");
                return Self::default();
            }
        };
        if !path.exists() {
            log::info!("no config at {}, using default settings", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{e}, using default settings");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: PathBuf) -> Result<(), ConfigError> {
        let config = toml::to_string(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, config)?;
        log::info!("saved config to {}", path.display());
        Ok(())
    }

    fn project_dirs() -> Result<directories::ProjectDirs, ConfigError> {
        directories::ProjectDirs::from("", "", "focus_clock").ok_or(ConfigError::NoProjectDirs)
    }

    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let mut path = Self::project_dirs()?.config_dir().to_path_buf();
        path.push("config.toml");
        Ok(path)
    }

    pub fn sounds_path() -> Result<PathBuf, ConfigError> {
        let mut path = Self::project_dirs()?.data_dir().to_path_buf();
        path.push("sounds");
        Ok(path)
    }

    #[must_use]
    pub fn is_config_present() -> bool {
        Self::config_path().is_ok_and(|path| path.exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_take_defaults() {
        let config = Config::from_toml("theme = \"Light\"\n[sound]\nrepeat = true\n").unwrap();
        assert_eq!(config.theme, Theme::Light);
        assert_eq!(config.pomodoro_minutes, DEFAULT_POMODORO_MINUTES);
        assert_eq!(config.time_format, "%H:%M:%S");
        assert!(config.sound.repeat);
        assert_eq!(config.sound.path, None);
        assert!((config.sound.volume - 100.0).abs() < f32::EPSILON);
    }

    #[test]
    fn zero_minute_pomodoro_is_replaced() {
        let config = Config::from_toml("pomodoro_minutes = 0\n").unwrap();
        assert_eq!(config.pomodoro_minutes, DEFAULT_POMODORO_MINUTES);
    }

    #[test]
    fn day_long_pomodoro_is_capped() {
        let config = Config::from_toml("pomodoro_minutes = 1440\n").unwrap();
        assert_eq!(config.pomodoro_minutes, MAX_POMODORO_MINUTES);
        let config = Config::from_toml("pomodoro_minutes = 180\n").unwrap();
        assert_eq!(config.pomodoro_minutes, 180);
    }

    #[test]
    fn garbage_is_a_parse_error() {
        assert!(matches!(
            Config::from_toml("pomodoro_minutes = \"soon\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = std::env::temp_dir().join(format!("focus_clock_test_{}", std::process::id()));
        let path = dir.join("config.toml");
        let config = Config {
            pomodoro_minutes: 50,
            always_on_top: true,
            sound: SoundSettings {
                path: Some(PathBuf::from("/tmp/bell.wav")),
                volume: 40.0,
                repeat: true,
            },
            ..Config::default()
        };
        config.save(path.clone()).unwrap();
        assert_eq!(Config::load(path).unwrap(), config);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn theme_toggles() {
        assert_eq!(!Theme::Dark, Theme::Light);
        assert_eq!(!!Theme::Dark, Theme::Dark);
    }
}
