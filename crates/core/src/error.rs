//! Fehlertypen fuer Statuston
//!
//! Zentraler Fehler-Enum fuer alles, was bis zum Prozess durchschlagen darf.
//! Kollaborateur-Fehler (TTS, Tonausgabe) werden in ihren eigenen Crates
//! definiert und dort nur geloggt.

use thiserror::Error;

/// Globaler Result-Alias fuer Statuston
pub type Result<T> = std::result::Result<T, StatustonError>;

/// Alle Fehler, die den Statuston-Server betreffen koennen
#[derive(Debug, Error)]
pub enum StatustonError {
    // --- Netzwerk ---
    #[error("Socket konnte nicht an {adresse} gebunden werden: {quelle}")]
    Bind {
        adresse: String,
        #[source]
        quelle: std::io::Error,
    },

    #[error("IO-Fehler: {0}")]
    Io(#[from] std::io::Error),

    // --- Konfiguration ---
    #[error("Konfigurationsfehler: {0}")]
    Konfiguration(String),
}

impl StatustonError {
    /// Gibt true zurueck wenn der Fehler den Prozess beenden muss
    ///
    /// Fatal ist nur, was beim Start passiert: Binden und Konfiguration.
    pub fn ist_fatal(&self) -> bool {
        matches!(self, Self::Bind { .. } | Self::Konfiguration(_))
    }
}
