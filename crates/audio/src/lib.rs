//! statuston-audio – Tonausgabe
//!
//! - Fallback-Kette externer Audio-Werkzeuge fuer einen kurzen Piepton
//! - Piep-Task: periodischer Ton mit fernbefohlener Rate, schnell abbrechbar

pub mod error;
pub mod piep;
pub mod ton;

// Bequeme Re-Exporte der wichtigsten Typen
pub use error::{AudioError, AudioResult};
pub use piep::{
    abfrage_begrenzen, PiepTask, PiepZustand, MAX_ABFRAGE_INTERVALL, STANDARD_ABFRAGE_INTERVALL,
};
pub use ton::{TonGeber, TonKette, TonKonfig, TonStrategie};
