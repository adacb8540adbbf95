//! statuston-voice – Sprachansagen
//!
//! Die Sprachsynthese selbst passiert in einem externen HTTP-Dienst, der den
//! Text rendert und auf dem Host abspielt. Dieses Crate kapselt nur den
//! Aufruf.
//!
//! ## Module
//! - [`tts`] – `Ansager`-Trait und HTTP-Client fuer `GET /tts?text=...`
//! - [`error`] – Fehlertypen

pub mod error;
pub mod tts;

pub use error::{VoiceError, VoiceResult};
pub use tts::{Ansager, TtsClient, TtsKonfig};
