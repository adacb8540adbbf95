//! Gemeinsame Identifikationstypen fuer Statuston

use uuid::Uuid;

/// Eindeutige ID einer Sitzung (eine TCP-Verbindung)
///
/// Wird nur fuer Log-Felder verwendet, damit sich die Zeilen
/// paralleler Sitzungen auseinanderhalten lassen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SitzungsId(pub Uuid);

impl SitzungsId {
    /// Erstellt eine neue zufaellige SitzungsId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Gibt die innere UUID zurueck
    pub fn inner(&self) -> Uuid {
        self.0
    }
}

impl Default for SitzungsId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SitzungsId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sitzung:{}", self.0)
    }
}
