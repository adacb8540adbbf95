//! statuston-server – Bibliotheks-Root
//!
//! Deklariert alle Server-Module und stellt den oeffentlichen Einstiegspunkt
//! fuer Integrationstests bereit.

pub mod config;
pub mod demo;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use config::ServerConfig;
use statuston_audio::TonKette;
use statuston_observability::{observability_server_starten, StatustonMetrics};
use statuston_signaling::{SignalingState, StatusServer};
use statuston_voice::TtsClient;
use tokio::sync::watch;

/// Haelt den laufenden Server-Zustand zusammen
pub struct Server {
    pub config: ServerConfig,
}

impl Server {
    /// Erstellt einen neuen Server aus der gegebenen Konfiguration
    pub fn neu(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Baut den gemeinsamen Zustand aus der Konfiguration
    pub fn state_aufbauen(&self) -> Result<Arc<SignalingState>> {
        let signaling = self.config.signaling_config()?;
        let ansager = Arc::new(TtsClient::neu(self.config.tts_konfig()));
        let tongeber = Arc::new(TonKette::standard(&self.config.ton_konfig()));
        let metriken = StatustonMetrics::neu().context("Metriken konnten nicht registriert werden")?;

        Ok(Arc::new(SignalingState::neu(
            signaling, ansager, tongeber, metriken,
        )))
    }

    /// Startet alle Server-Subsysteme und laeuft bis zum Shutdown-Signal
    ///
    /// Reihenfolge:
    /// 1. Zustand aufbauen (TTS-Client, Ton-Kette, Metriken)
    /// 2. Observability-Server starten (falls aktiviert)
    /// 3. TCP-Listener binden – Fehler hier beenden den Prozess
    /// 4. Verbindungen annehmen bis Ctrl-C
    pub async fn starten(self) -> Result<()> {
        let state = self.state_aufbauen()?;

        tracing::info!(
            adresse = %state.config.bind_addr,
            modus = ?state.config.modus,
            tts = %self.config.tts.url,
            "Server startet"
        );

        if self.config.observability.aktiviert {
            let adresse: SocketAddr = self
                .config
                .observability_bind_adresse()
                .parse()
                .context("Ungueltige Observability-Adresse")?;
            let metriken = state.metriken.clone();
            tokio::spawn(async move {
                if let Err(e) = observability_server_starten(adresse, metriken).await {
                    tracing::error!(fehler = %e, "Observability-Server beendet");
                }
            });
        }

        let server = StatusServer::binden(Arc::clone(&state)).await?;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let server_task = tokio::spawn(server.starten(shutdown_rx));

        tracing::info!("Server laeuft. Warte auf Shutdown-Signal (Ctrl-C)...");
        tokio::signal::ctrl_c().await?;
        tracing::info!("Shutdown-Signal empfangen, Server wird beendet");

        // Fehlende Empfaenger heissen: Server-Task ist schon beendet
        let _ = shutdown_tx.send(true);
        server_task
            .await
            .context("Server-Task abgebrochen")??;

        Ok(())
    }
}
