//! Server-Konfiguration
//!
//! Wird beim Start aus einer TOML-Datei geladen. Alle Felder haben
//! sinnvolle Standardwerte, sodass der Server ohne Konfigurationsdatei
//! lauffaehig ist.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use statuston_audio::{abfrage_begrenzen, TonKonfig};
use statuston_observability::logging::log_level_gueltig;
use statuston_signaling::{SignalingConfig, SitzungsModus};
use statuston_voice::TtsKonfig;

/// Vollstaendige Server-Konfiguration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Netzwerk-Einstellungen
    pub netzwerk: NetzwerkEinstellungen,
    /// TTS-Dienst
    pub tts: TtsEinstellungen,
    /// Piepton
    pub ton: TonEinstellungen,
    /// Logging-Einstellungen
    pub logging: LoggingEinstellungen,
    /// Observability-Einstellungen (Metriken)
    pub observability: ObservabilityEinstellungen,
}

/// Netzwerk-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetzwerkEinstellungen {
    /// Bind-Adresse fuer den Status-Empfang
    pub bind_adresse: String,
    /// Port fuer den Status-Empfang
    pub port: u16,
    /// "seriell" (eine Verbindung nach der anderen) oder "parallel"
    pub modus: String,
}

impl Default for NetzwerkEinstellungen {
    fn default() -> Self {
        Self {
            bind_adresse: "0.0.0.0".into(),
            port: 9696,
            modus: "seriell".into(),
        }
    }
}

/// TTS-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TtsEinstellungen {
    /// Basis-URL des TTS-Dienstes
    pub url: String,
    /// Zeitlimit pro Ansage in Millisekunden
    pub timeout_ms: u64,
}

impl Default for TtsEinstellungen {
    fn default() -> Self {
        Self {
            url: "http://localhost:8000".into(),
            timeout_ms: 10_000,
        }
    }
}

/// Ton-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TonEinstellungen {
    /// Vorgerenderte Klangdatei (wird per paplay abgespielt)
    pub klang_datei: String,
    /// Frequenz des Ersatz-Sinustons
    pub frequenz_hz: u32,
    /// Dauer des Ersatz-Sinustons
    pub dauer_sek: f32,
    /// Verstaerkung des Ersatz-Sinustons in dB
    pub verstaerkung_db: f32,
    /// Wie oft der Piep-Task auf Abbruch prueft
    pub abfrage_intervall_ms: u64,
}

impl Default for TonEinstellungen {
    fn default() -> Self {
        let ton = TonKonfig::default();
        Self {
            klang_datei: ton.klang_datei.to_string_lossy().into_owned(),
            frequenz_hz: ton.frequenz_hz,
            dauer_sek: ton.dauer_sek,
            verstaerkung_db: ton.verstaerkung_db,
            abfrage_intervall_ms: 10,
        }
    }
}

/// Logging-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingEinstellungen {
    /// Log-Level: "trace", "debug", "info", "warn", "error"
    pub level: String,
    /// Format: "json" oder "text"
    pub format: String,
}

impl Default for LoggingEinstellungen {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

/// Observability-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityEinstellungen {
    /// Aktiviert den Metrik-Endpunkt
    pub aktiviert: bool,
    /// Port fuer `/metrics`
    pub port: u16,
}

impl Default for ObservabilityEinstellungen {
    fn default() -> Self {
        Self {
            aktiviert: false,
            port: 9697,
        }
    }
}

impl ServerConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei.
    /// Gibt die Standardkonfiguration zurueck wenn die Datei nicht existiert.
    pub fn laden(pfad: &str) -> anyhow::Result<Self> {
        match std::fs::read_to_string(pfad) {
            Ok(inhalt) => {
                let config: Self = toml::from_str(&inhalt)
                    .map_err(|e| anyhow::anyhow!("Konfigurationsfehler in '{pfad}': {e}"))?;
                config
                    .validieren()
                    .with_context(|| format!("Konfigurationsfehler in '{pfad}'"))?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    pfad = pfad,
                    "Konfigurationsdatei nicht gefunden, verwende Standardwerte"
                );
                Ok(Self::default())
            }
            Err(e) => Err(anyhow::anyhow!(
                "Konfigurationsdatei '{pfad}' nicht lesbar: {e}"
            )),
        }
    }

    /// Prueft Werte, die serde allein nicht abfangen kann
    pub fn validieren(&self) -> anyhow::Result<()> {
        if !log_level_gueltig(&self.logging.level) {
            anyhow::bail!(
                "Ungueltiges Log-Level '{}' (erlaubt: trace, debug, info, warn, error)",
                self.logging.level
            );
        }
        Ok(())
    }

    /// Abfrageintervall des Piep-Tasks, begrenzt auf 1..=10 ms
    pub fn piep_abfrage(&self) -> Duration {
        let gewuenscht = Duration::from_millis(self.ton.abfrage_intervall_ms);
        let begrenzt = abfrage_begrenzen(gewuenscht);
        if begrenzt != gewuenscht {
            tracing::warn!(
                gewuenscht_ms = self.ton.abfrage_intervall_ms,
                verwendet_ms = begrenzt.as_millis() as u64,
                "abfrage_intervall_ms ausserhalb von 1..=10, Wert wird begrenzt"
            );
        }
        begrenzt
    }

    /// Gibt die vollstaendige Bind-Adresse fuer den Status-Empfang zurueck
    pub fn status_bind_adresse(&self) -> String {
        format!("{}:{}", self.netzwerk.bind_adresse, self.netzwerk.port)
    }

    /// Gibt die Bind-Adresse fuer den Observability-Server zurueck
    pub fn observability_bind_adresse(&self) -> String {
        format!("{}:{}", self.netzwerk.bind_adresse, self.observability.port)
    }

    /// Uebersetzt die Netzwerk-Sektion fuer den Status-Server
    pub fn signaling_config(&self) -> anyhow::Result<SignalingConfig> {
        let bind_addr: SocketAddr = self
            .status_bind_adresse()
            .parse()
            .with_context(|| format!("Ungueltige Bind-Adresse '{}'", self.status_bind_adresse()))?;
        let modus: SitzungsModus = self.netzwerk.modus.parse()?;

        Ok(SignalingConfig {
            bind_addr,
            modus,
            piep_abfrage: self.piep_abfrage(),
        })
    }

    pub fn tts_konfig(&self) -> TtsKonfig {
        TtsKonfig {
            basis_url: self.tts.url.clone(),
            timeout: Duration::from_millis(self.tts.timeout_ms),
        }
    }

    pub fn ton_konfig(&self) -> TonKonfig {
        TonKonfig {
            klang_datei: PathBuf::from(&self.ton.klang_datei),
            frequenz_hz: self.ton.frequenz_hz,
            dauer_sek: self.ton.dauer_sek,
            verstaerkung_db: self.ton.verstaerkung_db,
            ..TonKonfig::default()
        }
    }
}
