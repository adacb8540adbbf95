//! Demo-Ablauf fuer `statuston-sender`
//!
//! Eine feste Folge von Statusframes, die alle Faelle einmal durchspielt:
//! stabile Geschwindigkeit, langsamer und schneller Piep-Takt, Piep-Stopp,
//! Mission angenommen/abgelehnt und Stop.

use std::time::Duration;

use futures_util::SinkExt;
use statuston_protocol::{StatusCodec, StatusFrame};
use tokio::io::AsyncWrite;
use tokio_util::codec::FramedWrite;

/// Abstand zwischen zwei Frames
pub const SENDE_ABSTAND: Duration = Duration::from_millis(100);

/// Standardziel des Senders
pub const STANDARD_ZIEL: &str = "127.0.0.1:9696";

/// (speed, mission, piep_rate)
const ABLAUF: [(u8, u8, u8); 40] = [
    // Stabile Geschwindigkeit, dann Piepen ohne neue Ansage
    (30, 0, 0),
    (30, 0, 0),
    (30, 0, 5),
    (30, 0, 5),
    (30, 0, 5),
    (30, 0, 5),
    (30, 0, 5),
    (30, 0, 5),
    (30, 0, 5),
    (30, 0, 5),
    (30, 0, 5),
    (30, 0, 5),
    (30, 2, 5),
    (30, 0, 5),
    // Geschwindigkeitswechsel
    (50, 0, 0),
    (50, 0, 0),
    (50, 1, 0),
    (50, 0, 0),
    // Stop
    (0, 0, 0),
    (0, 0, 0),
    // Langsamer Takt
    (60, 0, 1),
    (60, 0, 1),
    (60, 0, 1),
    // Schneller Takt
    (60, 0, 5),
    (60, 0, 5),
    (60, 0, 5),
    // Piep-Stopp
    (60, 0, 0),
    (60, 0, 0),
    // Geschwindigkeitswechsel mit Takt
    (80, 0, 2),
    (80, 0, 2),
    (80, 1, 2),
    // Stop mit Takt
    (0, 0, 2),
    (0, 0, 2),
    (40, 0, 0),
    (40, 0, 0),
    // Sehr schneller Takt
    (40, 0, 10),
    (40, 0, 10),
    (40, 0, 0),
    (40, 1, 0),
    // Abschluss
    (0, 0, 0),
];

/// Die komplette Demo-Folge
pub fn demo_ablauf() -> Vec<StatusFrame> {
    ABLAUF
        .iter()
        .map(|&(speed, mission, piep_rate)| StatusFrame::neu(speed, mission, piep_rate))
        .collect()
}

/// Bitmuster eines Frames, z.B. `00011110 00000000 00000101`
pub fn bitmuster(frame: &StatusFrame) -> String {
    frame
        .als_bytes()
        .iter()
        .map(|b| format!("{b:08b}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Schreibt die Frames mit festem Abstand auf `ziel`
pub async fn ablauf_senden<W>(
    ziel: W,
    frames: &[StatusFrame],
    abstand: Duration,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut sink = FramedWrite::new(ziel, StatusCodec::new());

    for frame in frames {
        sink.send(*frame).await?;
        tracing::info!(
            speed = frame.speed,
            mission = frame.mission.als_byte(),
            piep_rate = frame.piep_rate,
            bits = %bitmuster(frame),
            "Frame gesendet"
        );
        tokio::time::sleep(abstand).await;
    }
    Ok(())
}
