//! Aufzeichnende Attrappen fuer Ton- und Sprachausgabe (nur Tests)

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use statuston_audio::{AudioResult, TonGeber};
use statuston_observability::StatustonMetrics;
use statuston_voice::{Ansager, VoiceError, VoiceResult};

use crate::server_state::{SignalingConfig, SignalingState};

/// Merkt sich alle angesagten Texte
#[derive(Default)]
pub struct ProtokollAnsager {
    texte: Mutex<Vec<String>>,
    fehlschlagen: bool,
}

impl ProtokollAnsager {
    pub fn fehlerhaft() -> Self {
        Self {
            fehlschlagen: true,
            ..Default::default()
        }
    }

    pub fn texte(&self) -> Vec<String> {
        self.texte.lock().unwrap().clone()
    }
}

#[async_trait]
impl Ansager for ProtokollAnsager {
    async fn ansagen(&self, text: &str) -> VoiceResult<()> {
        self.texte.lock().unwrap().push(text.to_string());
        if self.fehlschlagen {
            return Err(VoiceError::Status(503));
        }
        Ok(())
    }
}

/// Zaehlt Toene und die hoechste Zahl gleichzeitig laufender Toene
#[derive(Default)]
pub struct ProtokollTon {
    aufrufe: AtomicUsize,
    aktiv: AtomicUsize,
    max_aktiv: AtomicUsize,
    dauer: Duration,
}

impl ProtokollTon {
    pub fn mit_dauer(dauer: Duration) -> Self {
        Self {
            dauer,
            ..Default::default()
        }
    }

    pub fn aufrufe(&self) -> usize {
        self.aufrufe.load(Ordering::SeqCst)
    }

    pub fn aktiv(&self) -> usize {
        self.aktiv.load(Ordering::SeqCst)
    }

    pub fn max_aktiv(&self) -> usize {
        self.max_aktiv.load(Ordering::SeqCst)
    }
}

/// Zaehlt `aktiv` herunter, auch wenn der Ton abgebrochen wird
struct AktivWaechter<'a>(&'a AtomicUsize);

impl Drop for AktivWaechter<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl TonGeber for ProtokollTon {
    async fn ton_abspielen(&self) -> AudioResult<()> {
        self.aufrufe.fetch_add(1, Ordering::SeqCst);
        let jetzt = self.aktiv.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_aktiv.fetch_max(jetzt, Ordering::SeqCst);
        let _waechter = AktivWaechter(&self.aktiv);

        if !self.dauer.is_zero() {
            tokio::time::sleep(self.dauer).await;
        }
        Ok(())
    }
}

/// Server-Zustand mit den gegebenen Attrappen und frischen Metriken
pub fn test_state(
    ansager: Arc<ProtokollAnsager>,
    ton: Arc<ProtokollTon>,
) -> Arc<SignalingState> {
    Arc::new(SignalingState::neu(
        SignalingConfig::default(),
        ansager,
        ton,
        StatustonMetrics::neu().unwrap(),
    ))
}
