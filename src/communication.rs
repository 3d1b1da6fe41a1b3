use crate::config::SoundSettings;

/// requests sent to the audio thread
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    /// the alarm went off (or the user wants to hear it)
    Ring,
    // if the alarm is cleared or a new target replaces it
    Silence,
    Configure(SoundSettings),
}
