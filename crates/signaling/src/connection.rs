//! Client-Connection – Verwaltet eine einzelne TCP-Verbindung
//!
//! Liest 3-Byte-Statusframes via [`StatusCodec`] und reicht jeden Frame
//! an die [`Sitzung`] weiter. Der Frame wird vollstaendig verarbeitet,
//! bevor der naechste gelesen wird.
//!
//! ## Ende einer Sitzung
//! - Client schliesst die Verbindung (auch mitten in einem Frame)
//! - Lesefehler auf dem Socket
//! - Shutdown-Signal des Servers
//!
//! In allen Faellen wird ein laufender Piep-Task gestoppt und abgewartet.

use futures_util::StreamExt;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::AsyncRead;
use tokio_util::codec::FramedRead;

use statuston_protocol::StatusCodec;

use crate::server_state::SignalingState;
use crate::sitzung::Sitzung;

/// Grund, warum eine Verbindung beendet wurde
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrennungsGrund {
    /// Client hat die Verbindung geschlossen
    ClientGetrennt,
    /// Lesefehler auf dem Socket
    Lesefehler,
    /// Server faehrt herunter
    Shutdown,
}

/// Verarbeitet eine einzelne Status-Verbindung
pub struct ClientConnection {
    state: Arc<SignalingState>,
    peer_addr: SocketAddr,
}

impl ClientConnection {
    pub fn neu(state: Arc<SignalingState>, peer_addr: SocketAddr) -> Self {
        Self { state, peer_addr }
    }

    /// Startet die Verbindungs-Verarbeitungsschleife
    ///
    /// Laeuft bis der Client trennt oder `shutdown_rx` ein `true` liefert.
    /// Generisch ueber den Lese-Stream, damit Tests `tokio::io::duplex`
    /// verwenden koennen.
    pub async fn verarbeiten<R>(
        self,
        reader: R,
        mut shutdown_rx: tokio::sync::watch::Receiver<bool>,
    ) -> TrennungsGrund
    where
        R: AsyncRead + Unpin,
    {
        let peer_addr = self.peer_addr;
        let metriken = &self.state.metriken;

        let mut sitzung = Sitzung::neu(&self.state);
        let sitzungs_id = sitzung.id();
        metriken.aktive_sitzungen.inc();
        tracing::info!(peer = %peer_addr, sitzung = %sitzungs_id, "Neue Verbindung");

        let mut frames = FramedRead::new(reader, StatusCodec::new());

        let grund = if *shutdown_rx.borrow() {
            TrennungsGrund::Shutdown
        } else {
            loop {
                tokio::select! {
                    frame = frames.next() => {
                        match frame {
                            Some(Ok(frame)) => {
                                sitzung.frame_verarbeiten(frame).await;
                            }
                            Some(Err(e)) => {
                                tracing::warn!(
                                    peer = %peer_addr,
                                    fehler = %e,
                                    "Frame-Lesefehler"
                                );
                                break TrennungsGrund::Lesefehler;
                            }
                            None => {
                                tracing::info!(peer = %peer_addr, "Verbindung vom Client getrennt");
                                break TrennungsGrund::ClientGetrennt;
                            }
                        }
                    }

                    Ok(()) = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            tracing::debug!(peer = %peer_addr, "Shutdown-Signal, Verbindung wird getrennt");
                            break TrennungsGrund::Shutdown;
                        }
                    }
                }
            }
        };

        sitzung.beenden().await;
        metriken.aktive_sitzungen.dec();
        tracing::info!(
            peer = %peer_addr,
            sitzung = %sitzungs_id,
            grund = ?grund,
            "Sitzung beendet"
        );
        grund
    }
}
