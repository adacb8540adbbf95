//! Ansage-Logik – wann wird was gesprochen?
//!
//! Entscheidungsregeln fuer einen neuen Frame `cur` und den Vorgaenger
//! `prev` (fehlt beim ersten Frame einer Sitzung). Nur wenn sich der Frame
//! als Ganzes geaendert hat, wird die erste passende Regel angewendet:
//!
//! 1. `speed == 0`            -> "Stop"
//! 2. Mission angenommen      -> "Accepted"
//! 3. Mission abgelehnt       -> "Rejected"
//! 4. `speed` hat sich geaendert -> Geschwindigkeit als Dezimalzahl
//! 5. sonst keine Ansage (z.B. nur die Piep-Rate hat sich geaendert)

use std::sync::Arc;

use statuston_observability::StatustonMetrics;
use statuston_protocol::{MissionsZustand, StatusFrame};
use statuston_voice::Ansager;

/// Eine zu sprechende Ansage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ansage {
    Stopp,
    Angenommen,
    Abgelehnt,
    Geschwindigkeit(u8),
}

impl Ansage {
    /// Text, der an den TTS-Dienst geht
    pub fn text(&self) -> String {
        self.to_string()
    }
}

impl std::fmt::Display for Ansage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stopp => f.write_str("Stop"),
            Self::Angenommen => f.write_str("Accepted"),
            Self::Abgelehnt => f.write_str("Rejected"),
            Self::Geschwindigkeit(speed) => write!(f, "{speed}"),
        }
    }
}

/// Bestimmt die Ansage fuer einen Frame-Uebergang
///
/// Ein unveraenderter Frame ergibt nie eine Ansage.
pub fn ansage_bestimmen(prev: Option<&StatusFrame>, cur: &StatusFrame) -> Option<Ansage> {
    if prev == Some(cur) {
        return None;
    }

    if cur.speed == 0 {
        return Some(Ansage::Stopp);
    }

    match cur.mission {
        MissionsZustand::Angenommen => return Some(Ansage::Angenommen),
        MissionsZustand::Abgelehnt => return Some(Ansage::Abgelehnt),
        MissionsZustand::Keine | MissionsZustand::Unbekannt(_) => {}
    }

    match prev {
        Some(p) if p.speed == cur.speed => None,
        _ => Some(Ansage::Geschwindigkeit(cur.speed)),
    }
}

/// Entscheidet ueber Ansagen und ruft den TTS-Dienst auf
///
/// Fehler des Dienstes werden geloggt und gezaehlt, aber nie weitergereicht.
#[derive(Clone)]
pub struct AnsageDispatcher {
    ansager: Arc<dyn Ansager>,
    metriken: StatustonMetrics,
}

impl AnsageDispatcher {
    pub fn neu(ansager: Arc<dyn Ansager>, metriken: StatustonMetrics) -> Self {
        Self { ansager, metriken }
    }

    /// Spricht ggf. die Ansage fuer `prev -> cur` und gibt sie zurueck
    pub async fn verarbeiten(
        &self,
        prev: Option<&StatusFrame>,
        cur: &StatusFrame,
    ) -> Option<Ansage> {
        let ansage = ansage_bestimmen(prev, cur)?;
        let text = ansage.text();

        tracing::info!(ansage = %text, frame = %cur, "Ansage");
        self.metriken.ansagen_total.inc();

        if let Err(e) = self.ansager.ansagen(&text).await {
            self.metriken.ansage_fehler_total.inc();
            tracing::warn!(
                ansage = %text,
                zeitlimit = e.ist_zeitlimit(),
                fehler = %e,
                "TTS-Aufruf fehlgeschlagen"
            );
        }

        Some(ansage)
    }
}
