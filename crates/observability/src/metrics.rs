//! Prometheus-kompatible Metriken fuer Statuston
//!
//! Registrierte Metriken:
//! - `statuston_frames_total` – Counter: Dekodierte Statusframes
//! - `statuston_ansagen_total` – Counter: Ausgeloeste Sprachansagen
//! - `statuston_ansage_fehler_total` – Counter: Fehlgeschlagene TTS-Aufrufe
//! - `statuston_piep_neustarts_total` – Counter: Wechsel der Piep-Rate
//! - `statuston_aktive_sitzungen` – Gauge: Aktuell verbundene Sender

use anyhow::Result;
use axum::{extract::State, response::IntoResponse, routing::get, Router};
use prometheus::{Encoder, IntCounter, IntGauge, Opts, Registry, TextEncoder};
use std::sync::Arc;

/// Alle Statuston-Prometheus-Metriken
///
/// Klonen ist billig, alle Klone zaehlen in dieselbe Registry.
#[derive(Clone)]
pub struct StatustonMetrics {
    pub registry: Arc<Registry>,

    pub frames_total: IntCounter,
    pub ansagen_total: IntCounter,
    pub ansage_fehler_total: IntCounter,
    pub piep_neustarts_total: IntCounter,
    pub aktive_sitzungen: IntGauge,
}

impl StatustonMetrics {
    /// Erstellt und registriert alle Metriken in einer neuen Registry
    pub fn neu() -> Result<Self> {
        let registry = Registry::new();

        let frames_total = IntCounter::with_opts(Opts::new(
            "statuston_frames_total",
            "Anzahl dekodierter Statusframes",
        ))?;
        registry.register(Box::new(frames_total.clone()))?;

        let ansagen_total = IntCounter::with_opts(Opts::new(
            "statuston_ansagen_total",
            "Anzahl ausgeloester Sprachansagen",
        ))?;
        registry.register(Box::new(ansagen_total.clone()))?;

        let ansage_fehler_total = IntCounter::with_opts(Opts::new(
            "statuston_ansage_fehler_total",
            "Anzahl fehlgeschlagener TTS-Aufrufe",
        ))?;
        registry.register(Box::new(ansage_fehler_total.clone()))?;

        let piep_neustarts_total = IntCounter::with_opts(Opts::new(
            "statuston_piep_neustarts_total",
            "Anzahl Wechsel der Piep-Rate",
        ))?;
        registry.register(Box::new(piep_neustarts_total.clone()))?;

        let aktive_sitzungen = IntGauge::with_opts(Opts::new(
            "statuston_aktive_sitzungen",
            "Anzahl aktuell verbundener Sender",
        ))?;
        registry.register(Box::new(aktive_sitzungen.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            frames_total,
            ansagen_total,
            ansage_fehler_total,
            piep_neustarts_total,
            aktive_sitzungen,
        })
    }

    /// Exportiert alle Metriken im Prometheus-Textformat
    pub fn exportieren(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

/// Axum-Router fuer den `/metrics`-Endpunkt
pub fn metrics_router(metriken: StatustonMetrics) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metriken)
}

async fn metrics_handler(State(metriken): State<StatustonMetrics>) -> impl IntoResponse {
    match metriken.exportieren() {
        Ok(text) => (
            axum::http::StatusCode::OK,
            [(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(err) => {
            tracing::error!("Metriken-Export fehlgeschlagen: {err}");
            axum::http::StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
