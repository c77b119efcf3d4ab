//! Headless model of the recording overlay: the control bar emits events, the
//! recording side feeds it elapsed time and mute state.

use log::debug;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlayEvent {
    Stop,
    Pause,
    Resume,
    ToggleMute,
}

/// What the overlay currently shows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OverlayView {
    pub visible: bool,
    pub paused: bool,
    pub muted: bool,
    pub timer_text: String,
}

#[derive(Debug)]
pub struct RecordingOverlay {
    events: flume::Sender<OverlayEvent>,
    view: Arc<Mutex<OverlayView>>,
}

/// Cloneable handle used by the recording side to update the display.
#[derive(Clone, Debug)]
pub struct OverlayHandle {
    view: Arc<Mutex<OverlayView>>,
}

impl RecordingOverlay {
    pub fn new() -> (RecordingOverlay, flume::Receiver<OverlayEvent>) {
        let (tx, rx) = flume::unbounded();
        let overlay = RecordingOverlay {
            events: tx,
            view: Default::default(),
        };
        (overlay, rx)
    }

    pub fn handle(&self) -> OverlayHandle {
        OverlayHandle {
            view: Arc::clone(&self.view),
        }
    }

    pub fn view(&self) -> OverlayView {
        self.view.lock().clone()
    }

    pub fn show(&self) {
        let mut view = self.view.lock();
        view.visible = true;
        view.timer_text = format_elapsed(Duration::ZERO);
    }

    pub fn hide(&self) {
        self.view.lock().visible = false;
    }

    pub fn on_stop_clicked(&self) {
        self.emit(OverlayEvent::Stop);
        self.hide();
    }

    pub fn on_pause_clicked(&self) {
        let paused = {
            let mut view = self.view.lock();
            view.paused = !view.paused;
            view.paused
        };

        self.emit(if paused {
            OverlayEvent::Pause
        } else {
            OverlayEvent::Resume
        });
    }

    pub fn on_mute_clicked(&self) {
        {
            let mut view = self.view.lock();
            view.muted = !view.muted;
        }
        self.emit(OverlayEvent::ToggleMute);
    }

    fn emit(&self, event: OverlayEvent) {
        if self.events.send(event).is_err() {
            debug!("Dropping {event:?}, recording side is gone");
        }
    }
}

impl OverlayHandle {
    pub fn update_timer(&self, elapsed: Duration) {
        self.view.lock().timer_text = format_elapsed(elapsed);
    }

    pub fn set_muted(&self, muted: bool) {
        self.view.lock().muted = muted;
    }
}

/// `HH:MM:SS`, hours keep counting past 99.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, secs % 3600 / 60, secs % 60)
}
