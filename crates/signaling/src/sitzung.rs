//! Sitzungszustand einer Verbindung
//!
//! Die `Sitzung` gehoert exklusiv der Verbindungsschleife und wird nie
//! nebenlaeufig angefasst. Sie kennt den zuletzt gesehenen Frame und
//! besitzt hoechstens einen laufenden [`PiepTask`].
//!
//! Pro Frame, in dieser Reihenfolge:
//! 1. Piep-Rate geaendert (oder erster Frame): alten Task stoppen und
//!    abwarten, bei Rate > 0 neuen Task starten
//! 2. Ansage bestimmen und ggf. sprechen
//! 3. Frame als letzten Frame merken, auch wenn nichts passiert ist

use std::num::NonZeroU8;
use std::sync::Arc;
use std::time::Duration;

use statuston_audio::{PiepTask, TonGeber};
use statuston_core::SitzungsId;
use statuston_observability::StatustonMetrics;
use statuston_protocol::StatusFrame;

use crate::ansage::{Ansage, AnsageDispatcher};
use crate::server_state::SignalingState;

/// Was ein einzelner Frame ausgeloest hat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameReaktion {
    /// Gesprochene Ansage, falls eine faellig war
    pub ansage: Option<Ansage>,
    /// True wenn der Piep-Task ersetzt oder beendet wurde
    pub piep_gewechselt: bool,
}

/// Zustand einer einzelnen Status-Verbindung
pub struct Sitzung {
    id: SitzungsId,
    letzter_frame: Option<StatusFrame>,
    piep_task: Option<PiepTask>,
    dispatcher: AnsageDispatcher,
    tongeber: Arc<dyn TonGeber>,
    piep_abfrage: Duration,
    metriken: StatustonMetrics,
}

impl Sitzung {
    pub fn neu(state: &SignalingState) -> Self {
        Self {
            id: SitzungsId::new(),
            letzter_frame: None,
            piep_task: None,
            dispatcher: AnsageDispatcher::neu(
                Arc::clone(&state.ansager),
                state.metriken.clone(),
            ),
            tongeber: Arc::clone(&state.tongeber),
            piep_abfrage: state.config.piep_abfrage,
            metriken: state.metriken.clone(),
        }
    }

    pub fn id(&self) -> SitzungsId {
        self.id
    }

    pub fn letzter_frame(&self) -> Option<&StatusFrame> {
        self.letzter_frame.as_ref()
    }

    /// Rate des laufenden Piep-Tasks, `None` wenn still
    pub fn aktive_piep_rate(&self) -> Option<u8> {
        self.piep_task.as_ref().map(|t| t.rate().get())
    }

    /// Verarbeitet einen dekodierten Frame
    pub async fn frame_verarbeiten(&mut self, cur: StatusFrame) -> FrameReaktion {
        self.metriken.frames_total.inc();
        tracing::trace!(sitzung = %self.id, frame = %cur, "Frame empfangen");

        let rate_geaendert = self
            .letzter_frame
            .map_or(true, |prev| prev.piep_rate != cur.piep_rate);

        let mut reaktion = FrameReaktion::default();
        if rate_geaendert {
            reaktion.piep_gewechselt = self.piep_wechseln(cur.piep_rate).await;
        }

        reaktion.ansage = self
            .dispatcher
            .verarbeiten(self.letzter_frame.as_ref(), &cur)
            .await;

        self.letzter_frame = Some(cur);
        reaktion
    }

    /// Ersetzt den Piep-Task; der alte ist vor dem Start des neuen gestoppt
    ///
    /// Gibt true zurueck, wenn ein Task gestoppt oder gestartet wurde.
    async fn piep_wechseln(&mut self, rate: u8) -> bool {
        let mut gewechselt = false;

        if let Some(alt) = self.piep_task.take() {
            let alte_rate = alt.rate().get();
            alt.stoppen().await;
            tracing::debug!(sitzung = %self.id, rate = alte_rate, "Piep-Takt gestoppt");
            gewechselt = true;
        }

        if let Some(rate) = NonZeroU8::new(rate) {
            self.piep_task = Some(PiepTask::starten(
                rate,
                Arc::clone(&self.tongeber),
                self.piep_abfrage,
            ));
            tracing::info!(sitzung = %self.id, rate = rate.get(), "Piep-Takt gestartet");
            gewechselt = true;
        }

        if gewechselt {
            self.metriken.piep_neustarts_total.inc();
        }
        gewechselt
    }

    /// Beendet die Sitzung; ein laufender Piep-Task ist danach gestoppt
    pub async fn beenden(mut self) {
        if let Some(task) = self.piep_task.take() {
            let rate = task.rate().get();
            task.stoppen().await;
            tracing::debug!(sitzung = %self.id, rate, "Piep-Takt zum Sitzungsende gestoppt");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testhilfen::{test_state, ProtokollAnsager, ProtokollTon};
    use statuston_audio::STANDARD_ABFRAGE_INTERVALL;

    fn f(speed: u8, mission: u8, piep_rate: u8) -> StatusFrame {
        StatusFrame::neu(speed, mission, piep_rate)
    }

    fn aufbau(
        ton: ProtokollTon,
    ) -> (
        Sitzung,
        Arc<ProtokollAnsager>,
        Arc<ProtokollTon>,
        Arc<SignalingState>,
    ) {
        let ansager = Arc::new(ProtokollAnsager::default());
        let ton = Arc::new(ton);
        let state = test_state(Arc::clone(&ansager), Arc::clone(&ton));
        let sitzung = Sitzung::neu(&state);
        (sitzung, ansager, ton, state)
    }

    #[tokio::test(start_paused = true)]
    async fn erster_frame_ohne_piep() {
        let (mut sitzung, ansager, ton, _state) = aufbau(ProtokollTon::default());

        let r = sitzung.frame_verarbeiten(f(30, 0, 0)).await;
        assert_eq!(r.ansage, Some(Ansage::Geschwindigkeit(30)));
        assert!(!r.piep_gewechselt);
        assert_eq!(sitzung.aktive_piep_rate(), None);

        // Szenario A: Wiederholung loest nichts aus
        let r = sitzung.frame_verarbeiten(f(30, 0, 0)).await;
        assert_eq!(r, FrameReaktion::default());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(ansager.texte(), vec!["30"]);
        assert_eq!(ton.aufrufe(), 0);
        sitzung.beenden().await;
    }

    #[tokio::test(start_paused = true)]
    async fn nur_rate_geaendert_startet_piep_ohne_ansage() {
        // Szenario B
        let (mut sitzung, ansager, ton, state) = aufbau(ProtokollTon::default());

        sitzung.frame_verarbeiten(f(30, 0, 0)).await;
        let r = sitzung.frame_verarbeiten(f(30, 0, 5)).await;

        assert_eq!(r.ansage, None);
        assert!(r.piep_gewechselt);
        assert_eq!(sitzung.aktive_piep_rate(), Some(5));
        assert_eq!(ansager.texte(), vec!["30"]);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert!(ton.aufrufe() >= 4, "aufrufe = {}", ton.aufrufe());
        assert_eq!(state.metriken.piep_neustarts_total.get(), 1);
        sitzung.beenden().await;
    }

    #[tokio::test(start_paused = true)]
    async fn gleiche_rate_startet_nicht_neu() {
        let (mut sitzung, _ansager, _ton, state) = aufbau(ProtokollTon::default());

        for _ in 0..5 {
            sitzung.frame_verarbeiten(f(60, 0, 2)).await;
        }
        // Ansage-Aenderung bei gleicher Rate beruehrt den Takt nicht
        let r = sitzung.frame_verarbeiten(f(60, 1, 2)).await;
        assert!(!r.piep_gewechselt);
        assert_eq!(r.ansage, Some(Ansage::Angenommen));

        assert_eq!(state.metriken.piep_neustarts_total.get(), 1);
        assert_eq!(state.metriken.frames_total.get(), 6);
        sitzung.beenden().await;
    }

    #[tokio::test(start_paused = true)]
    async fn ratenwechsel_ohne_ueberlappung() {
        // Szenario D
        let (mut sitzung, _ansager, ton, _state) =
            aufbau(ProtokollTon::mit_dauer(Duration::from_millis(5)));

        sitzung.frame_verarbeiten(f(60, 0, 1)).await;
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(sitzung.aktive_piep_rate(), Some(1));

        let r = sitzung.frame_verarbeiten(f(60, 0, 5)).await;
        assert!(r.piep_gewechselt);
        assert_eq!(r.ansage, None);
        assert_eq!(sitzung.aktive_piep_rate(), Some(5));

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(ton.max_aktiv(), 1);
        sitzung.beenden().await;
    }

    #[tokio::test(start_paused = true)]
    async fn rate_null_stoppt_den_takt() {
        let (mut sitzung, _ansager, ton, _state) = aufbau(ProtokollTon::default());

        sitzung.frame_verarbeiten(f(60, 0, 5)).await;
        tokio::time::sleep(Duration::from_millis(500)).await;

        let start = tokio::time::Instant::now();
        let r = sitzung.frame_verarbeiten(f(60, 0, 0)).await;
        assert!(start.elapsed() <= STANDARD_ABFRAGE_INTERVALL);
        assert!(r.piep_gewechselt);
        assert_eq!(sitzung.aktive_piep_rate(), None);

        let nach_stopp = ton.aufrufe();
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(ton.aufrufe(), nach_stopp);
        sitzung.beenden().await;
    }

    #[tokio::test(start_paused = true)]
    async fn rate_null_mitten_im_ton_stoppt_sofort() {
        let (mut sitzung, _ansager, ton, _state) =
            aufbau(ProtokollTon::mit_dauer(Duration::from_millis(150)));

        sitzung.frame_verarbeiten(f(60, 0, 2)).await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(ton.aktiv(), 1);

        let start = tokio::time::Instant::now();
        sitzung.frame_verarbeiten(f(60, 0, 0)).await;
        assert!(start.elapsed() <= STANDARD_ABFRAGE_INTERVALL);
        assert_eq!(ton.aktiv(), 0);
        assert_eq!(ton.max_aktiv(), 1);
        sitzung.beenden().await;
    }

    #[tokio::test(start_paused = true)]
    async fn beenden_stoppt_laufenden_takt() {
        // Szenario E auf Sitzungsebene
        let (mut sitzung, _ansager, ton, _state) =
            aufbau(ProtokollTon::mit_dauer(Duration::from_millis(50)));

        sitzung.frame_verarbeiten(f(20, 0, 10)).await;
        tokio::time::sleep(Duration::from_millis(420)).await;
        assert!(ton.aufrufe() > 0);

        sitzung.beenden().await;
        assert_eq!(ton.aktiv(), 0);

        let nach_ende = ton.aufrufe();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(ton.aufrufe(), nach_ende);
    }

    #[tokio::test(start_paused = true)]
    async fn letzter_frame_wird_immer_gemerkt() {
        let (mut sitzung, _ansager, _ton, _state) = aufbau(ProtokollTon::default());

        sitzung.frame_verarbeiten(f(30, 2, 0)).await;
        sitzung.frame_verarbeiten(f(30, 0, 0)).await;
        assert_eq!(sitzung.letzter_frame(), Some(&f(30, 0, 0)));
        sitzung.beenden().await;
    }
}
