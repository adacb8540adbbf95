//! statuston-sender – spielt den Demo-Ablauf gegen einen laufenden Server
//!
//! Aufruf: `statuston-sender [host:port]` (Standard: 127.0.0.1:9696)

use anyhow::{Context, Result};
use statuston_observability::logging_initialisieren;
use statuston_server::demo::{ablauf_senden, demo_ablauf, SENDE_ABSTAND, STANDARD_ZIEL};
use tokio::net::TcpStream;

#[tokio::main]
async fn main() -> Result<()> {
    logging_initialisieren("info", "text")?;

    let ziel = std::env::args()
        .nth(1)
        .unwrap_or_else(|| STANDARD_ZIEL.to_string());

    let stream = TcpStream::connect(&ziel)
        .await
        .with_context(|| format!("Verbindung zu {ziel} fehlgeschlagen"))?;
    tracing::info!(ziel = %ziel, "Verbunden");

    let frames = demo_ablauf();
    ablauf_senden(stream, &frames, SENDE_ABSTAND).await?;

    tracing::info!(anzahl = frames.len(), "Demo-Ablauf gesendet");
    Ok(())
}
