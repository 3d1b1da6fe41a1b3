use std::{
    fs::File,
    io::{BufReader, Cursor, Read, Seek},
    path::Path,
    sync::mpsc::Receiver,
};

use rodio::{decoder::DecoderError, Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use crate::{communication::Message, config::SoundSettings};

/// the chime that ships inside the binary
pub static BUNDLED_CHIME: &[u8] = include_bytes!("../assets/chime.wav");
pub const BUNDLED_CHIME_FILE: &str = "chime.wav";

type BoxedSource = Box<dyn Source<Item = i16> + Send>;

fn boxed<R>(decoder: Decoder<R>, repeat: bool) -> BoxedSource
where
    R: Read + Seek + Send + Sync + 'static,
{
    if repeat {
        Box::new(decoder.repeat_infinite())
    } else {
        Box::new(decoder)
    }
}

fn open_file(path: &Path, repeat: bool) -> Result<BoxedSource, String> {
    let file = File::open(path).map_err(|e| e.to_string())?;
    let decoder = Decoder::new(BufReader::new(file)).map_err(|e| e.to_string())?;
    Ok(boxed(decoder, repeat))
}

fn open_bundled(repeat: bool) -> Result<BoxedSource, DecoderError> {
    Ok(boxed(Decoder::new(Cursor::new(BUNDLED_CHIME))?, repeat))
}

/// decodes the configured sound, falling back to the bundled chime if the custom one is unusable
pub fn open_source(settings: &SoundSettings) -> Result<BoxedSource, DecoderError> {
    if let Some(path) = &settings.path {
        match open_file(path, settings.repeat) {
            Ok(source) => return Ok(source),
            Err(e) => log::warn!(
                "couldn't play sound file {}: {e}, using the bundled chime",
                path.display()
            ),
        }
    }
    open_bundled(settings.repeat)
}

/// owns the output stream, which has to stay on the thread that opened it
pub struct Player {
    // kept alive for as long as we want sound
    _stream: Option<OutputStream>,
    handle: Option<OutputStreamHandle>,
    sink: Option<Sink>,
    settings: SoundSettings,
}

impl Player {
    #[must_use]
    pub fn new(settings: SoundSettings) -> Self {
        let (stream, handle) = match OutputStream::try_default() {
            Ok((stream, handle)) => (Some(stream), Some(handle)),
            Err(e) => {
                log::error!("couldn't open audio output, alarms will be silent: {e}");
                (None, None)
            }
        };
        Self {
            _stream: stream,
            handle,
            sink: None,
            settings,
        }
    }

    fn ring(&mut self) {
        self.silence();
        let Some(handle) = &self.handle else {
            log::debug!("no audio output, skipping alarm sound");
            return;
        };
        let source = match open_source(&self.settings) {
            Ok(source) => source,
            Err(e) => {
                log::error!("couldn't decode alarm sound: {e}");
                return;
            }
        };
        match Sink::try_new(handle) {
            Ok(sink) => {
                sink.set_volume(self.settings.volume / 100.0);
                sink.append(source);
                sink.play();
                self.sink = Some(sink);
            }
            Err(e) => log::error!("couldn't start alarm playback: {e}"),
        }
    }

    fn silence(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }

    pub fn handle(&mut self, message: Message) {
        match message {
            Message::Ring => {
                log::info!("ringing with volume {}", self.settings.volume);
                self.ring();
            }
            Message::Silence => self.silence(),
            Message::Configure(settings) => {
                if let Some(sink) = &self.sink {
                    sink.set_volume(settings.volume / 100.0);
                }
                self.settings = settings;
            }
        }
    }

    /// plays alarms until every sender is gone
    pub fn run(mut self, receiver: &Receiver<Message>) {
        for message in receiver {
            self.handle(message);
        }
        log::debug!("sound channel closed, stopping player");
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn bundled_chime_decodes() {
        let source = open_bundled(false).unwrap();
        assert_eq!(source.channels(), 1);
        assert!(source.total_duration().is_some());
    }

    #[test]
    fn missing_custom_sound_falls_back_to_chime() {
        let settings = SoundSettings {
            path: Some(PathBuf::from("/definitely/not/here.mp3")),
            ..SoundSettings::default()
        };
        let source = open_source(&settings).unwrap();
        assert_eq!(source.channels(), 1);
    }

    #[test]
    fn repeating_source_has_no_end() {
        let settings = SoundSettings {
            repeat: true,
            ..SoundSettings::default()
        };
        let source = open_source(&settings).unwrap();
        assert!(source.total_duration().is_none());
    }
}
