//! Fehlertypen fuer die Tonausgabe

use thiserror::Error;

/// Alle moeglichen Fehler der Tonausgabe
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("Klangdatei nicht gefunden: {0}")]
    DateiFehlt(String),

    #[error("'{programm}' konnte nicht gestartet werden: {quelle}")]
    StartFehler {
        programm: String,
        #[source]
        quelle: std::io::Error,
    },

    #[error("'{programm}' beendet mit Status {}", status_text(.code))]
    ExitStatus { programm: String, code: Option<i32> },

    #[error("Alle {anzahl} Ton-Strategien fehlgeschlagen")]
    AlleStrategienFehlgeschlagen { anzahl: usize },

    #[error("IO-Fehler: {0}")]
    Io(#[from] std::io::Error),
}

pub type AudioResult<T> = Result<T, AudioError>;

fn status_text(code: &Option<i32>) -> String {
    code.map_or_else(|| "unbekannt".to_string(), |c| c.to_string())
}
