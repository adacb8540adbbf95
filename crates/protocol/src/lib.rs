//! statuston-protocol – Wire-Format der Statusframes
//!
//! Ein Frame besteht aus genau drei Rohbytes ohne Laengenfeld,
//! Trennzeichen oder Pruefsumme:
//!
//! ```text
//! +---------+-----------+-----------+
//! | speed   | mission   | piep_rate |
//! +---------+-----------+-----------+
//!   Byte 0    Byte 1      Byte 2
//! ```

pub mod wire;

pub use wire::{MissionsZustand, StatusCodec, StatusFrame, FRAME_GROESSE};
