//! The narrow, typed seam between the coordination core and the host it augments.
//!
//! The core never reaches into host internals. It emits [`SurfaceOutput`]
//! requests to a [`HostSurface`], receives typed events, and lets concrete
//! overlays plug in through the [`Updatable`] and [`Clickable`] capabilities.

mod instrument;
mod overlay;
#[cfg(test)]
pub(crate) mod testing;

pub(crate) use instrument::panic_message;
pub use instrument::{install_all, FnPoint, InstallReport, InstrumentationPoint};
pub use overlay::{ClearAllButton, Clickable, QuickRecordTile, Updatable};

use crate::charge::Argb;
use crate::layout::OverlayPlacement;
use crate::memory::ResourceSample;
use crate::recording::RecordingState;
use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayElement {
    ClearButton,
    ResourceBar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentAction {
    Start,
    Stop,
}

/// Every request the core hands to the rendering and service collaborators.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "output", rename_all = "snake_case")]
pub enum SurfaceOutput {
    Overlay {
        element: OverlayElement,
        placement: OverlayPlacement,
    },
    ResourceUsage {
        used: String,
        free: String,
        ratio: f32,
    },
    PercentageText {
        text: String,
    },
    PercentageColor {
        color: Argb,
    },
    PercentageAlpha {
        alpha: f32,
    },
    NavigationClearAll {
        enabled: bool,
    },
    RecordTile {
        state: RecordingState,
        label: &'static str,
    },
    RecordingIntent {
        action: IntentAction,
        #[serde(skip_serializing_if = "Option::is_none")]
        sampling_rate: Option<u32>,
    },
    Playback {
        action: IntentAction,
        #[serde(skip_serializing_if = "Option::is_none")]
        path: Option<PathBuf>,
    },
    DismissTask {
        stack: u64,
        task: u64,
    },
    Error {
        kind: &'static str,
        message: String,
    },
}

impl SurfaceOutput {
    pub fn resource_usage(sample: &ResourceSample) -> Self {
        Self::ResourceUsage {
            used: sample.formatted_used.clone(),
            free: sample.formatted_free.clone(),
            ratio: sample.used_ratio,
        }
    }
}

/// Rendering collaborator. Implementations must not call back into the core.
pub trait HostSurface: Send {
    fn emit(&mut self, output: SurfaceOutput);
}

/// Forward outputs to a writer thread. A gone receiver drops them silently.
impl HostSurface for Sender<SurfaceOutput> {
    fn emit(&mut self, output: SurfaceOutput) {
        let _ = self.send(output);
    }
}
