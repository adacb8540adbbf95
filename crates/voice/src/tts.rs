//! Text-to-Speech ueber den lokalen TTS-Dienst
//!
//! Der Dienst erwartet `GET /tts?text=<prozentkodierter Text>`, rendert den
//! Text und spielt ihn auf dem Server-Host ab. Der Antwortkoerper (die
//! WAV-Datei) wird hier nicht gelesen.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{VoiceError, VoiceResult};

/// Standard-Zeitlimit pro Ansage
pub const STANDARD_TIMEOUT: Duration = Duration::from_secs(10);

/// Spricht einen Text aus
#[async_trait]
pub trait Ansager: Send + Sync {
    /// Kehrt zurueck, wenn die Ansage erledigt oder gescheitert ist
    async fn ansagen(&self, text: &str) -> VoiceResult<()>;
}

/// Konfiguration des TTS-Clients
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TtsKonfig {
    /// Basis-URL des Dienstes, ohne `/tts`
    pub basis_url: String,
    /// Zeitlimit pro Anfrage
    pub timeout: Duration,
}

impl Default for TtsKonfig {
    fn default() -> Self {
        Self {
            basis_url: "http://localhost:8000".into(),
            timeout: STANDARD_TIMEOUT,
        }
    }
}

/// HTTP-Client fuer den TTS-Dienst
#[derive(Debug, Clone)]
pub struct TtsClient {
    client: reqwest::Client,
    basis_url: String,
    timeout: Duration,
}

impl TtsClient {
    pub fn neu(konfig: TtsKonfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            basis_url: konfig.basis_url.trim_end_matches('/').to_string(),
            timeout: konfig.timeout,
        }
    }

    /// Baut die Anfrage-URL fuer einen Text
    pub fn url_fuer(&self, text: &str) -> String {
        format!("{}/tts?text={}", self.basis_url, urlencoding::encode(text))
    }
}

#[async_trait]
impl Ansager for TtsClient {
    async fn ansagen(&self, text: &str) -> VoiceResult<()> {
        let url = self.url_fuer(text);
        tracing::debug!(text, url = %url, "TTS-Anfrage");

        let antwort = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await?;

        if !antwort.status().is_success() {
            return Err(VoiceError::Status(antwort.status().as_u16()));
        }
        Ok(())
    }
}
