//! Fehlertypen fuer Sprachansagen

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("TTS-Anfrage fehlgeschlagen: {0}")]
    Http(#[from] reqwest::Error),

    #[error("TTS-Dienst antwortete mit Status {0}")]
    Status(u16),
}

impl VoiceError {
    /// True wenn die Anfrage am Zeitlimit gescheitert ist
    pub fn ist_zeitlimit(&self) -> bool {
        matches!(self, Self::Http(e) if e.is_timeout())
    }
}

pub type VoiceResult<T> = Result<T, VoiceError>;
