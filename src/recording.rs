//! Recording session state driven by overlay events.

use crate::overlay::{OverlayEvent, OverlayHandle};
use log::{debug, info};
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordingState {
    Recording,
    Paused,
    Stopped,
}

#[derive(Debug)]
pub struct RecordingSession {
    state: RecordingState,
    muted: bool,
    started_at: Instant,
    paused_since: Option<Instant>,
    paused_total: Duration,
    stopped_at: Option<Instant>,
    events: flume::Receiver<OverlayEvent>,
    overlay: OverlayHandle,
}

impl RecordingSession {
    pub fn start(events: flume::Receiver<OverlayEvent>, overlay: OverlayHandle, now: Instant) -> Self {
        info!("Recording started");
        RecordingSession {
            state: RecordingState::Recording,
            muted: false,
            started_at: now,
            paused_since: None,
            paused_total: Duration::ZERO,
            stopped_at: None,
            events,
            overlay,
        }
    }

    pub fn state(&self) -> RecordingState {
        self.state
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Frames should be captured and written.
    pub fn is_capturing(&self) -> bool {
        self.state == RecordingState::Recording
    }

    /// Apply every queued overlay event. Returns the number of events handled.
    pub fn process_events(&mut self, now: Instant) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events.try_recv() {
            self.handle_event(event, now);
            handled += 1;
        }
        handled
    }

    pub fn handle_event(&mut self, event: OverlayEvent, now: Instant) {
        use RecordingState::*;

        match (self.state, event) {
            (Stopped, _) => debug!("Ignoring {event:?}, recording already stopped"),
            (Recording, OverlayEvent::Pause) => {
                self.state = Paused;
                self.paused_since = Some(now);
                info!("Recording paused");
            }
            (Paused, OverlayEvent::Resume) => {
                self.end_pause(now);
                self.state = Recording;
                info!("Recording resumed");
            }
            (_, OverlayEvent::Stop) => {
                self.end_pause(now);
                self.state = Stopped;
                self.stopped_at = Some(now);
                info!("Recording stopped after {:?}", self.elapsed(now));
            }
            (_, OverlayEvent::ToggleMute) => {
                self.muted = !self.muted;
                self.overlay.set_muted(self.muted);
                info!("Audio {}", if self.muted { "muted" } else { "unmuted" });
            }
            (state, event) => debug!("Ignoring {event:?} while {state:?}"),
        }
    }

    fn end_pause(&mut self, now: Instant) {
        if let Some(since) = self.paused_since.take() {
            self.paused_total += now.saturating_duration_since(since);
        }
    }

    /// Recorded time, not counting pauses.
    pub fn elapsed(&self, now: Instant) -> Duration {
        let end = self.stopped_at.or(self.paused_since).unwrap_or(now);
        end.saturating_duration_since(self.started_at)
            .saturating_sub(self.paused_total)
    }

    /// Push elapsed time and mute state to the overlay.
    pub fn tick(&self, now: Instant) {
        self.overlay.update_timer(self.elapsed(now));
        self.overlay.set_muted(self.muted);
    }
}
