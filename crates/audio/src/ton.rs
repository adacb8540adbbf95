//! Piepton ueber externe Audio-Werkzeuge
//!
//! Ein einzelner Ton wird nicht selbst synthetisiert, sondern an externe
//! Programme delegiert. Die Strategien werden der Reihe nach versucht,
//! bis eine erfolgreich ist:
//!
//! 1. vorgerenderte Klangdatei (`paplay bip.wav`), falls vorhanden
//! 2. `sox` direkt auf das ALSA-Standardgeraet
//! 3. `play` (ebenfalls aus dem sox-Paket)
//! 4. Terminalglocke als letzter Ausweg

use std::ffi::OsStr;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::error::{AudioError, AudioResult};

// ---------------------------------------------------------------------------
// TonGeber
// ---------------------------------------------------------------------------

/// Spielt einen einzelnen kurzen Ton ab
#[async_trait]
pub trait TonGeber: Send + Sync {
    /// Spielt genau einen Ton. Kehrt zurueck, sobald der Ton fertig ist.
    async fn ton_abspielen(&self) -> AudioResult<()>;
}

// ---------------------------------------------------------------------------
// Konfiguration
// ---------------------------------------------------------------------------

/// Parameter fuer den Standard-Piepton
#[derive(Debug, Clone, PartialEq)]
pub struct TonKonfig {
    /// Vorgerenderte Klangdatei
    pub klang_datei: PathBuf,
    /// Player fuer die Klangdatei
    pub datei_player: String,
    /// Frequenz des Sinustons
    pub frequenz_hz: u32,
    /// Tondauer in Sekunden
    pub dauer_sek: f32,
    /// Verstaerkung in dB (negativ = leiser)
    pub verstaerkung_db: f32,
}

impl Default for TonKonfig {
    fn default() -> Self {
        Self {
            klang_datei: PathBuf::from("bip.wav"),
            datei_player: "paplay".into(),
            frequenz_hz: 800,
            dauer_sek: 0.3,
            verstaerkung_db: -5.0,
        }
    }
}

// ---------------------------------------------------------------------------
// TonStrategie
// ---------------------------------------------------------------------------

/// Eine Art, einen Ton zu erzeugen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TonStrategie {
    /// Klangdatei mit einem Player abspielen; uebersprungen wenn die Datei fehlt
    Datei { player: String, pfad: PathBuf },
    /// Beliebiges Kommando, Erfolg = Exit-Status 0
    Kommando {
        programm: String,
        argumente: Vec<String>,
    },
    /// BEL-Zeichen auf stdout
    Terminalglocke,
}

impl TonStrategie {
    /// Kurzer Name fuer Log-Ausgaben
    pub fn name(&self) -> &str {
        match self {
            Self::Datei { player, .. } => player,
            Self::Kommando { programm, .. } => programm,
            Self::Terminalglocke => "terminalglocke",
        }
    }

    async fn ausfuehren(&self) -> AudioResult<()> {
        match self {
            Self::Datei { player, pfad } => {
                if !tokio::fs::try_exists(pfad).await.unwrap_or(false) {
                    return Err(AudioError::DateiFehlt(pfad.display().to_string()));
                }
                kommando_ausfuehren(player, [pfad.as_os_str()]).await
            }
            Self::Kommando {
                programm,
                argumente,
            } => kommando_ausfuehren(programm, argumente).await,
            Self::Terminalglocke => {
                let mut stdout = tokio::io::stdout();
                stdout.write_all(b"\x07").await?;
                stdout.flush().await?;
                Ok(())
            }
        }
    }
}

/// Startet ein externes Programm ohne Ein-/Ausgabe und wartet auf das Ende
///
/// Wird das Future verworfen (Piep-Task abgebrochen), beendet `kill_on_drop`
/// den Kindprozess.
async fn kommando_ausfuehren<I, S>(programm: &str, argumente: I) -> AudioResult<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let status = Command::new(programm)
        .args(argumente)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .status()
        .await
        .map_err(|quelle| AudioError::StartFehler {
            programm: programm.to_string(),
            quelle,
        })?;

    if status.success() {
        Ok(())
    } else {
        Err(AudioError::ExitStatus {
            programm: programm.to_string(),
            code: status.code(),
        })
    }
}

// ---------------------------------------------------------------------------
// TonKette
// ---------------------------------------------------------------------------

/// Geordnete Liste von Ton-Strategien, die erste erfolgreiche gewinnt
#[derive(Debug, Clone)]
pub struct TonKette {
    strategien: Vec<TonStrategie>,
}

impl TonKette {
    pub fn neu(strategien: Vec<TonStrategie>) -> Self {
        Self { strategien }
    }

    /// Standard-Kette: Klangdatei, sox, play, Terminalglocke
    pub fn standard(konfig: &TonKonfig) -> Self {
        let synth = [
            "synth".to_string(),
            konfig.dauer_sek.to_string(),
            "sine".to_string(),
            konfig.frequenz_hz.to_string(),
            "gain".to_string(),
            konfig.verstaerkung_db.to_string(),
        ];

        let mut sox = vec![
            "-n".to_string(),
            "-t".to_string(),
            "alsa".to_string(),
            "default".to_string(),
        ];
        sox.extend(synth.iter().cloned());

        let mut play = vec!["-n".to_string()];
        play.extend(synth.iter().cloned());

        Self::neu(vec![
            TonStrategie::Datei {
                player: konfig.datei_player.clone(),
                pfad: konfig.klang_datei.clone(),
            },
            TonStrategie::Kommando {
                programm: "sox".into(),
                argumente: sox,
            },
            TonStrategie::Kommando {
                programm: "play".into(),
                argumente: play,
            },
            TonStrategie::Terminalglocke,
        ])
    }

    pub fn strategien(&self) -> &[TonStrategie] {
        &self.strategien
    }
}

#[async_trait]
impl TonGeber for TonKette {
    async fn ton_abspielen(&self) -> AudioResult<()> {
        for strategie in &self.strategien {
            match strategie.ausfuehren().await {
                Ok(()) => {
                    tracing::trace!(strategie = strategie.name(), "Ton abgespielt");
                    return Ok(());
                }
                Err(e) => {
                    tracing::debug!(
                        strategie = strategie.name(),
                        fehler = %e,
                        "Ton-Strategie fehlgeschlagen, naechste wird versucht"
                    );
                }
            }
        }

        Err(AudioError::AlleStrategienFehlgeschlagen {
            anzahl: self.strategien.len(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
