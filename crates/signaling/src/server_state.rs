//! Gemeinsamer Server-Zustand fuer den Status-Empfang
//!
//! Haelt Konfiguration und die externen Kollaborateure (TTS, Tonausgabe)
//! als Arc-Referenzen, die sicher zwischen tokio-Tasks geteilt werden
//! koennen. Der Zustand einer Sitzung liegt dagegen ausschliesslich in
//! ihrer eigenen [`Sitzung`](crate::sitzung::Sitzung).

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use statuston_audio::{TonGeber, STANDARD_ABFRAGE_INTERVALL};
use statuston_core::StatustonError;
use statuston_observability::StatustonMetrics;
use statuston_voice::Ansager;

/// Wie Verbindungen abgearbeitet werden
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SitzungsModus {
    /// Eine Verbindung nach der anderen; die naechste wird erst nach dem
    /// Ende der aktuellen Sitzung angenommen
    #[default]
    Seriell,
    /// Ein eigener Task pro Verbindung, jeder mit eigener Sitzung
    Parallel,
}

impl FromStr for SitzungsModus {
    type Err = StatustonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "seriell" => Ok(Self::Seriell),
            "parallel" => Ok(Self::Parallel),
            andere => Err(StatustonError::Konfiguration(format!(
                "Unbekannter Sitzungsmodus '{andere}' (erlaubt: seriell, parallel)"
            ))),
        }
    }
}

/// Konfiguration fuer den Status-Empfang
#[derive(Debug, Clone)]
pub struct SignalingConfig {
    /// Adresse des Listen-Sockets
    pub bind_addr: SocketAddr,
    /// Seriell oder parallel
    pub modus: SitzungsModus,
    /// Abfrageintervall des Piep-Tasks fuer das Abbruch-Signal
    pub piep_abfrage: Duration,
}

impl Default for SignalingConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 9696)),
            modus: SitzungsModus::Seriell,
            piep_abfrage: STANDARD_ABFRAGE_INTERVALL,
        }
    }
}

/// Gemeinsamer Server-Zustand (thread-safe, Arc-geteilt)
pub struct SignalingState {
    /// Server-Konfiguration
    pub config: SignalingConfig,
    /// Sprachausgabe (TTS-Dienst)
    pub ansager: Arc<dyn Ansager>,
    /// Tonausgabe fuer den Piep-Takt
    pub tongeber: Arc<dyn TonGeber>,
    /// Prometheus-Zaehler
    pub metriken: StatustonMetrics,
}

impl SignalingState {
    pub fn neu(
        config: SignalingConfig,
        ansager: Arc<dyn Ansager>,
        tongeber: Arc<dyn TonGeber>,
        metriken: StatustonMetrics,
    ) -> Self {
        Self {
            config,
            ansager,
            tongeber,
            metriken,
        }
    }
}
