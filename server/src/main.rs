//! Statuston Server – Einstiegspunkt
//!
//! Laedt die Konfiguration, initialisiert das Logging und startet den Server.

use anyhow::Result;
use statuston_observability::logging_initialisieren;
use statuston_server::{config::ServerConfig, Server};

#[tokio::main]
async fn main() -> Result<()> {
    // Konfigurationsdatei-Pfad aus Umgebungsvariable oder Standard
    let config_pfad = std::env::var("STATUSTON_CONFIG").unwrap_or_else(|_| "config.toml".into());

    // Konfiguration laden (Standardwerte falls Datei fehlt)
    let config = ServerConfig::laden(&config_pfad)?;

    logging_initialisieren(&config.logging.level, &config.logging.format)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %config_pfad,
        "Statuston Server wird initialisiert"
    );

    let server = Server::neu(config);
    if let Err(e) = server.starten().await {
        tracing::error!(fehler = %e, "Server mit Fehler beendet");
        return Err(e);
    }

    Ok(())
}
