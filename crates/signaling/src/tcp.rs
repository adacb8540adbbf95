//! TCP-Listener – Bindet Socket, akzeptiert Verbindungen
//!
//! Der `StatusServer` bindet einen TCP-Socket und uebergibt jede
//! eingehende Verbindung an eine [`ClientConnection`].
//!
//! ## Concurrency-Modell
//! - [`SitzungsModus::Seriell`]: Die Verbindung wird direkt in der
//!   Accept-Loop abgearbeitet. Weitere Clients warten im Backlog des
//!   Sockets, bis die aktuelle Sitzung beendet ist.
//! - [`SitzungsModus::Parallel`]: Jede Verbindung laeuft in einem eigenen
//!   Task in einem `JoinSet`. Beim Shutdown werden alle Tasks abgewartet,
//!   damit kein Piep-Task den Server ueberlebt.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use statuston_core::{Result, StatustonError};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinSet;

use crate::connection::ClientConnection;
use crate::server_state::{SignalingState, SitzungsModus};

/// TCP-Server fuer Statusframes
pub struct StatusServer {
    state: Arc<SignalingState>,
    listener: TcpListener,
}

impl StatusServer {
    /// Bindet den Listen-Socket an `state.config.bind_addr`
    ///
    /// Schlaegt das Binden fehl, ist das fatal fuer den Prozess.
    pub async fn binden(state: Arc<SignalingState>) -> Result<Self> {
        let bind_addr = state.config.bind_addr;
        let listener = TcpListener::bind(bind_addr)
            .await
            .map_err(|quelle| StatustonError::Bind {
                adresse: bind_addr.to_string(),
                quelle,
            })?;
        Ok(Self { state, listener })
    }

    /// Tatsaechlich gebundene Adresse (relevant bei Port 0)
    pub fn lokale_adresse(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Akzeptiert Verbindungen bis `shutdown_rx` ein `true`-Signal empfaengt
    pub async fn starten(self, mut shutdown_rx: watch::Receiver<bool>) -> Result<()> {
        let modus = self.state.config.modus;
        tracing::info!(
            adresse = %self.lokale_adresse()?,
            modus = ?modus,
            "Statuston-Server gestartet"
        );

        let mut sitzungen: JoinSet<()> = JoinSet::new();

        loop {
            if *shutdown_rx.borrow() {
                break;
            }

            tokio::select! {
                // Neue eingehende Verbindung
                result = self.listener.accept() => {
                    match result {
                        Ok((stream, peer_addr)) => {
                            tracing::debug!(peer = %peer_addr, "Verbindung akzeptiert");

                            let verbindung = ClientConnection::neu(
                                Arc::clone(&self.state),
                                peer_addr,
                            );
                            let shutdown_rx_clone = shutdown_rx.clone();

                            match modus {
                                SitzungsModus::Seriell => {
                                    verbindung.verarbeiten(stream, shutdown_rx_clone).await;
                                }
                                SitzungsModus::Parallel => {
                                    sitzungen.spawn(async move {
                                        verbindung.verarbeiten(stream, shutdown_rx_clone).await;
                                    });
                                }
                            }
                        }
                        Err(e) => {
                            tracing::error!(fehler = %e, "TCP-Accept-Fehler");
                            tokio::time::sleep(Duration::from_millis(10)).await;
                        }
                    }
                }

                // Beendete Sitzungen einsammeln
                Some(ergebnis) = sitzungen.join_next() => {
                    if let Err(e) = ergebnis {
                        tracing::error!(fehler = %e, "Sitzungs-Task abgebrochen");
                    }
                }

                // Shutdown-Signal
                Ok(()) = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        tracing::info!("Statuston-Server: Shutdown-Signal empfangen");
                        break;
                    }
                }
            }
        }

        while let Some(ergebnis) = sitzungen.join_next().await {
            if let Err(e) = ergebnis {
                tracing::error!(fehler = %e, "Sitzungs-Task abgebrochen");
            }
        }

        tracing::info!("Statuston-Server gestoppt");
        Ok(())
    }
}
