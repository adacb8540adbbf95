//! Piep-Task – periodischer Ton mit fester Rate
//!
//! Ein `PiepTask` ist an genau eine Rate gebunden. Soll sich die Rate
//! aendern, wird der alte Task gestoppt (und abgewartet) und ein neuer
//! gestartet.
//!
//! ## Zustaende
//! ```text
//! Bereit -> Laeuft -> Abbrechend -> Gestoppt
//! ```
//!
//! Zwischen zwei Toenen wartet der Task `1/rate` Sekunden, fragt das
//! Abbruch-Token dabei aber alle `abfrage` (Standard 10 ms) ab. Die
//! Abbruch-Latenz ist damit unabhaengig von der Rate begrenzt. Ein gerade
//! laufender Ton wird beim Abbruch verworfen.

use std::num::NonZeroU8;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::ton::TonGeber;

/// Standard-Abfrageintervall fuer das Abbruch-Token
pub const STANDARD_ABFRAGE_INTERVALL: Duration = Duration::from_millis(10);

/// Kleinstes zulaessiges Abfrageintervall
const MIN_ABFRAGE_INTERVALL: Duration = Duration::from_millis(1);

/// Groesstes zulaessiges Abfrageintervall, zugleich die maximale Abbruch-Latenz
pub const MAX_ABFRAGE_INTERVALL: Duration = Duration::from_millis(10);

/// Begrenzt ein Abfrageintervall auf 1..=10 ms
pub fn abfrage_begrenzen(abfrage: Duration) -> Duration {
    abfrage.clamp(MIN_ABFRAGE_INTERVALL, MAX_ABFRAGE_INTERVALL)
}

// ---------------------------------------------------------------------------
// PiepZustand
// ---------------------------------------------------------------------------

/// Lebenszyklus eines Piep-Tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PiepZustand {
    /// Erstellt, Task wurde noch nicht geplant
    Bereit = 0,
    /// Spielt Toene im Takt
    Laeuft = 1,
    /// Abbruch angefordert, Task hat ihn noch nicht bestaetigt
    Abbrechend = 2,
    /// Endzustand, es wird kein Ton mehr gespielt
    Gestoppt = 3,
}

impl PiepZustand {
    fn aus_u8(wert: u8) -> Self {
        match wert {
            0 => Self::Bereit,
            1 => Self::Laeuft,
            2 => Self::Abbrechend,
            _ => Self::Gestoppt,
        }
    }
}

/// Zwischen Handle und Task geteilter Zustand
#[derive(Debug)]
struct Geteilt {
    zustand: AtomicU8,
    pieps: AtomicU64,
}

impl Geteilt {
    fn neu() -> Self {
        Self {
            zustand: AtomicU8::new(PiepZustand::Bereit as u8),
            pieps: AtomicU64::new(0),
        }
    }

    fn setzen(&self, zustand: PiepZustand) {
        self.zustand.store(zustand as u8, Ordering::SeqCst);
    }

    fn lesen(&self) -> PiepZustand {
        PiepZustand::aus_u8(self.zustand.load(Ordering::SeqCst))
    }
}

// ---------------------------------------------------------------------------
// PiepTask
// ---------------------------------------------------------------------------

/// Handle auf einen laufenden Piep-Task
///
/// Wird das Handle ohne [`PiepTask::stoppen`] verworfen, wird der Task
/// trotzdem abgebrochen (aber nicht abgewartet).
#[derive(Debug)]
pub struct PiepTask {
    rate: NonZeroU8,
    abbruch: CancellationToken,
    geteilt: Arc<Geteilt>,
    handle: Option<JoinHandle<()>>,
}

impl PiepTask {
    /// Startet einen neuen Piep-Task auf der aktuellen tokio-Runtime
    pub fn starten(rate: NonZeroU8, tongeber: Arc<dyn TonGeber>, abfrage: Duration) -> Self {
        let abbruch = CancellationToken::new();
        let geteilt = Arc::new(Geteilt::neu());

        let handle = tokio::spawn(piep_schleife(
            rate,
            tongeber,
            abfrage_begrenzen(abfrage),
            abbruch.clone(),
            Arc::clone(&geteilt),
        ));

        Self {
            rate,
            abbruch,
            geteilt,
            handle: Some(handle),
        }
    }

    /// Pieps pro Sekunde
    pub fn rate(&self) -> NonZeroU8 {
        self.rate
    }

    /// Abstand zwischen Ende eines Tons und Beginn des naechsten
    pub fn intervall(&self) -> Duration {
        intervall_fuer(self.rate)
    }

    pub fn zustand(&self) -> PiepZustand {
        self.geteilt.lesen()
    }

    /// Anzahl erfolgreich abgespielter Toene
    pub fn anzahl_pieps(&self) -> u64 {
        self.geteilt.pieps.load(Ordering::SeqCst)
    }

    /// Bricht den Task ab und wartet, bis er `Gestoppt` erreicht hat
    ///
    /// Nach der Rueckkehr wird von diesem Task garantiert kein Ton mehr
    /// gestartet.
    pub async fn stoppen(mut self) -> PiepZustand {
        if self.geteilt.lesen() != PiepZustand::Gestoppt {
            self.geteilt.setzen(PiepZustand::Abbrechend);
        }
        self.abbruch.cancel();

        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                tracing::warn!(rate = self.rate.get(), fehler = %e, "Piep-Task unerwartet beendet");
            }
        }

        self.geteilt.setzen(PiepZustand::Gestoppt);
        PiepZustand::Gestoppt
    }
}

impl Drop for PiepTask {
    fn drop(&mut self) {
        self.abbruch.cancel();
    }
}

fn intervall_fuer(rate: NonZeroU8) -> Duration {
    Duration::from_secs_f64(1.0 / f64::from(rate.get()))
}

// ---------------------------------------------------------------------------
// Task-Schleife
// ---------------------------------------------------------------------------

async fn piep_schleife(
    rate: NonZeroU8,
    tongeber: Arc<dyn TonGeber>,
    abfrage: Duration,
    abbruch: CancellationToken,
    geteilt: Arc<Geteilt>,
) {
    let intervall = intervall_fuer(rate);
    geteilt.setzen(PiepZustand::Laeuft);
    tracing::debug!(rate = rate.get(), intervall_ms = intervall.as_millis() as u64, "Piep-Task gestartet");

    while !abbruch.is_cancelled() {
        tokio::select! {
            biased;
            _ = abbruch.cancelled() => break,
            ergebnis = tongeber.ton_abspielen() => match ergebnis {
                Ok(()) => {
                    geteilt.pieps.fetch_add(1, Ordering::SeqCst);
                }
                Err(e) => {
                    tracing::warn!(rate = rate.get(), fehler = %e, "Piepton fehlgeschlagen");
                }
            },
        }

        if abwarten(intervall, abfrage, &abbruch).await {
            break;
        }
    }

    geteilt.setzen(PiepZustand::Gestoppt);
    tracing::debug!(
        rate = rate.get(),
        pieps = geteilt.pieps.load(Ordering::SeqCst),
        "Piep-Task gestoppt"
    );
}

/// Wartet `intervall` in Schritten von hoechstens `abfrage`
///
/// Gibt `true` zurueck, wenn waehrenddessen abgebrochen wurde.
async fn abwarten(intervall: Duration, abfrage: Duration, abbruch: &CancellationToken) -> bool {
    let ende = Instant::now() + intervall;
    loop {
        if abbruch.is_cancelled() {
            return true;
        }
        let jetzt = Instant::now();
        if jetzt >= ende {
            return false;
        }
        tokio::time::sleep(abfrage.min(ende - jetzt)).await;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
