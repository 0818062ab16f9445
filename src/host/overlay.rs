use super::{HostSurface, SurfaceOutput};
use crate::recording::RecordingState;
use crate::runtime::CoreEvent;

/// Overlay that can republish its visual state.
pub trait Updatable {
    fn refresh(&self, surface: &mut dyn HostSurface);
}

/// Overlay that turns user input into core events.
pub trait Clickable {
    fn on_click(&self) -> Option<CoreEvent>;

    fn on_long_click(&self) -> Option<CoreEvent> {
        None
    }
}

/// The injected dismiss-all button.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClearAllButton;

impl Clickable for ClearAllButton {
    fn on_click(&self) -> Option<CoreEvent> {
        Some(CoreEvent::DismissAll)
    }
}

/// Quick-record tile: short press plays/stops, long press records.
#[derive(Debug, Default, Clone, Copy)]
pub struct QuickRecordTile {
    state: RecordingState,
}

impl QuickRecordTile {
    pub fn new(state: RecordingState) -> Self {
        Self { state }
    }
}

impl Updatable for QuickRecordTile {
    fn refresh(&self, surface: &mut dyn HostSurface) {
        surface.emit(SurfaceOutput::RecordTile {
            state: self.state,
            label: self.state.label(),
        });
    }
}

impl Clickable for QuickRecordTile {
    fn on_click(&self) -> Option<CoreEvent> {
        Some(CoreEvent::ShortPress)
    }

    fn on_long_click(&self) -> Option<CoreEvent> {
        Some(CoreEvent::LongPress)
    }
}
