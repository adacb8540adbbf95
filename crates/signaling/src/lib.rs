//! statuston-signaling – Status-Empfang ueber TCP
//!
//! Dieser Crate nimmt 3-Byte-Statusframes entgegen und setzt sie in
//! Sprachansagen und einen Piep-Takt um.
//!
//! ## Architektur
//!
//! ```text
//! TCP Listener (StatusServer)
//!     |  seriell oder ein Task pro Verbindung
//!     v
//! ClientConnection
//!     |  FramedRead<StatusCodec>
//!     v
//! Sitzung (letzter Frame + hoechstens ein PiepTask)
//!     |
//!     +-- PiepTask          (Takt bei Rate > 0)
//!     +-- AnsageDispatcher  (Stop / Accepted / Rejected / Geschwindigkeit)
//! ```

pub mod ansage;
pub mod connection;
pub mod server_state;
pub mod sitzung;
pub mod tcp;

#[cfg(test)]
mod testhilfen;

// Bequeme Re-Exporte
pub use ansage::{ansage_bestimmen, Ansage, AnsageDispatcher};
pub use connection::{ClientConnection, TrennungsGrund};
pub use server_state::{SignalingConfig, SignalingState, SitzungsModus};
pub use sitzung::{FrameReaktion, Sitzung};
pub use tcp::StatusServer;
