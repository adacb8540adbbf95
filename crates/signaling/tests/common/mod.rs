//! Gemeinsame Attrappen fuer die TCP-Integrationstests

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use statuston_audio::{AudioResult, TonGeber};
use statuston_observability::StatustonMetrics;
use statuston_signaling::{SignalingConfig, SignalingState, SitzungsModus, StatusServer};
use statuston_voice::{Ansager, VoiceResult};
use tokio::sync::watch;
use tokio::task::JoinHandle;

#[derive(Default)]
pub struct TextSammler {
    texte: Mutex<Vec<String>>,
}

impl TextSammler {
    pub fn texte(&self) -> Vec<String> {
        self.texte.lock().unwrap().clone()
    }
}

#[async_trait]
impl Ansager for TextSammler {
    async fn ansagen(&self, text: &str) -> VoiceResult<()> {
        self.texte.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct TonZaehler {
    aufrufe: AtomicUsize,
}

impl TonZaehler {
    pub fn aufrufe(&self) -> usize {
        self.aufrufe.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TonGeber for TonZaehler {
    async fn ton_abspielen(&self) -> AudioResult<()> {
        self.aufrufe.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(5)).await;
        Ok(())
    }
}

pub struct LaufenderServer {
    pub adresse: SocketAddr,
    pub state: Arc<SignalingState>,
    pub ansager: Arc<TextSammler>,
    pub ton: Arc<TonZaehler>,
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<statuston_core::Result<()>>,
}

impl LaufenderServer {
    pub async fn starten(modus: SitzungsModus) -> Self {
        let ansager = Arc::new(TextSammler::default());
        let ton = Arc::new(TonZaehler::default());
        let state = Arc::new(SignalingState::neu(
            SignalingConfig {
                bind_addr: "127.0.0.1:0".parse().unwrap(),
                modus,
                ..Default::default()
            },
            ansager.clone(),
            ton.clone(),
            StatustonMetrics::neu().unwrap(),
        ));

        let server = StatusServer::binden(Arc::clone(&state)).await.unwrap();
        let adresse = server.lokale_adresse().unwrap();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(server.starten(shutdown_rx));

        Self {
            adresse,
            state,
            ansager,
            ton,
            shutdown_tx,
            handle,
        }
    }

    /// Wartet bis `bedingung` erfuellt ist (max. 5 s)
    pub async fn warten_bis(&self, bedingung: impl Fn(&Self) -> bool) {
        let frist = tokio::time::Instant::now() + Duration::from_secs(5);
        while !bedingung(self) {
            assert!(
                tokio::time::Instant::now() < frist,
                "Bedingung nicht rechtzeitig erfuellt"
            );
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    pub async fn stoppen(self) {
        self.shutdown_tx.send(true).unwrap();
        let ergebnis = tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("Server hat nicht rechtzeitig gestoppt")
            .unwrap();
        assert!(ergebnis.is_ok());
    }
}
