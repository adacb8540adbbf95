//! Wire-Format fuer die Status-Verbindung
//!
//! Jeder Frame ist exakt [`FRAME_GROESSE`] Bytes lang. Die Felder werden
//! positionsweise gelesen, es gibt keine Validierung ausser dem
//! Wertebereich, den ein Byte ohnehin hat. Unbekannte Missionszustaende
//! werden nicht abgelehnt, sondern wie "kein Zustand" behandelt.
//!
//! Der Server sendet nie Daten zurueck. Eine Verbindung endet mit EOF;
//! ein unvollstaendiger letzter Frame gilt ebenfalls als Sitzungsende.

use bytes::{Buf, BufMut, BytesMut};
use std::io;
use tokio_util::codec::{Decoder, Encoder};

// ---------------------------------------------------------------------------
// Konstanten
// ---------------------------------------------------------------------------

/// Groesse eines Statusframes in Bytes
pub const FRAME_GROESSE: usize = 3;

// ---------------------------------------------------------------------------
// MissionsZustand
// ---------------------------------------------------------------------------

/// Missionszustand aus Byte 1 eines Frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MissionsZustand {
    /// 0 – keine Missionsmeldung
    #[default]
    Keine,
    /// 1 – Mission angenommen
    Angenommen,
    /// 2 – Mission abgelehnt
    Abgelehnt,
    /// Jeder andere Wert; wird wie `Keine` angesagt, bleibt aber fuer den
    /// Frame-Vergleich erhalten
    Unbekannt(u8),
}

impl MissionsZustand {
    /// Dekodiert das Rohbyte (nie fehlschlagend)
    pub fn aus_byte(byte: u8) -> Self {
        match byte {
            0 => Self::Keine,
            1 => Self::Angenommen,
            2 => Self::Abgelehnt,
            andere => Self::Unbekannt(andere),
        }
    }

    /// Gibt das Rohbyte zurueck
    pub fn als_byte(self) -> u8 {
        match self {
            Self::Keine => 0,
            Self::Angenommen => 1,
            Self::Abgelehnt => 2,
            Self::Unbekannt(byte) => byte,
        }
    }
}

// ---------------------------------------------------------------------------
// StatusFrame
// ---------------------------------------------------------------------------

/// Ein dekodierter Statusframe
///
/// Nach dem Dekodieren unveraenderlich; es gibt genau drei Felder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusFrame {
    /// Geschwindigkeit, 0 = gestoppt
    pub speed: u8,
    /// Missionszustand
    pub mission: MissionsZustand,
    /// Pieps pro Sekunde, 0 = still
    pub piep_rate: u8,
}

impl StatusFrame {
    /// Erstellt einen Frame aus den Rohwerten
    pub fn neu(speed: u8, mission: u8, piep_rate: u8) -> Self {
        Self::aus_bytes([speed, mission, piep_rate])
    }

    /// Dekodiert drei Bytes positionsweise. Schlaegt nie fehl.
    pub fn aus_bytes(bytes: [u8; FRAME_GROESSE]) -> Self {
        Self {
            speed: bytes[0],
            mission: MissionsZustand::aus_byte(bytes[1]),
            piep_rate: bytes[2],
        }
    }

    /// Gibt die drei Wire-Bytes zurueck
    pub fn als_bytes(&self) -> [u8; FRAME_GROESSE] {
        [self.speed, self.mission.als_byte(), self.piep_rate]
    }
}

impl std::fmt::Display for StatusFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}, {})",
            self.speed,
            self.mission.als_byte(),
            self.piep_rate
        )
    }
}

// ---------------------------------------------------------------------------
// StatusCodec
// ---------------------------------------------------------------------------

/// tokio-util Codec fuer die 3-Byte-Statusframes
///
/// Der Server liest mit `FramedRead`, das Sender-Werkzeug schreibt mit
/// `FramedWrite`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusCodec;

impl StatusCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Decoder for StatusCodec {
    type Item = StatusFrame;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.len() < FRAME_GROESSE {
            src.reserve(FRAME_GROESSE - src.len());
            return Ok(None);
        }

        let bytes = [src[0], src[1], src[2]];
        src.advance(FRAME_GROESSE);
        Ok(Some(StatusFrame::aus_bytes(bytes)))
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(frame) = self.decode(src)? {
            return Ok(Some(frame));
        }

        // Kurzer letzter Lesevorgang: Sitzungsende, kein Fehler
        if !src.is_empty() {
            tracing::debug!(
                rest_bytes = src.len(),
                "Unvollstaendiger Frame am Verbindungsende verworfen"
            );
            src.clear();
        }
        Ok(None)
    }
}

impl Encoder<StatusFrame> for StatusCodec {
    type Error = io::Error;

    fn encode(&mut self, item: StatusFrame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(FRAME_GROESSE);
        dst.put_slice(&item.als_bytes());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
