//! Collaborators the recording controller talks to. Requests are fire-and-forget:
//! outcomes come back later as status broadcasts or completion events.

use crate::host::{HostSurface, IntentAction, SurfaceOutput};
use crate::runtime::{CoreEvent, EventSender};
use anyhow::Result;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Capture quality, carried to the recording service as a sampling rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RecordingQuality {
    Low,
    #[default]
    Medium,
    High,
}

impl RecordingQuality {
    pub fn sampling_rate(self) -> u32 {
        match self {
            Self::Low => 8_000,
            Self::Medium => 22_050,
            Self::High => 44_100,
        }
    }

    pub fn from_sampling_rate(rate: i64) -> Option<Self> {
        match rate {
            8_000 => Some(Self::Low),
            22_050 => Some(Self::Medium),
            44_100 => Some(Self::High),
            _ => None,
        }
    }
}

/// External recording service. Both calls only dispatch an intent.
pub trait RecordingBackend: Send {
    fn start_recording(&mut self, quality: RecordingQuality) -> Result<()>;
    fn stop_recording(&mut self) -> Result<()>;
}

/// Backend that forwards start/stop requests to the host as recording intents.
pub struct IntentBackend<S> {
    surface: S,
}

impl<S: HostSurface> IntentBackend<S> {
    pub fn new(surface: S) -> Self {
        Self { surface }
    }
}

impl<S: HostSurface> RecordingBackend for IntentBackend<S> {
    fn start_recording(&mut self, quality: RecordingQuality) -> Result<()> {
        self.surface.emit(SurfaceOutput::RecordingIntent {
            action: IntentAction::Start,
            sampling_rate: Some(quality.sampling_rate()),
        });
        Ok(())
    }

    fn stop_recording(&mut self) -> Result<()> {
        self.surface.emit(SurfaceOutput::RecordingIntent {
            action: IntentAction::Stop,
            sampling_rate: None,
        });
        Ok(())
    }
}

/// Media subsystem used to play the last recording back.
pub trait MediaPlayer: Send {
    /// Open and start `path`. An error means nothing is playing.
    fn start(&mut self, path: &Path, on_complete: CompletionNotifier) -> Result<()>;
    /// Stop and free the current player, if any.
    fn release(&mut self);
}

/// Storage probe used to re-validate the recorded file before acting on a press.
pub trait FileProbe: Send {
    fn exists(&self, path: &Path) -> bool;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FsProbe;

impl FileProbe for FsProbe {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}

/// Handed to the media subsystem; posts completion back onto the control thread.
#[derive(Debug, Clone)]
pub struct CompletionNotifier {
    tx: EventSender,
    playback: u64,
}

impl CompletionNotifier {
    pub(crate) fn new(tx: EventSender, playback: u64) -> Self {
        Self { tx, playback }
    }

    pub fn playback(&self) -> u64 {
        self.playback
    }

    /// Safe to call from any thread, and after the runtime has gone away.
    pub fn notify(&self) {
        let _ = self.tx.send(CoreEvent::PlaybackCompleted {
            playback: Some(self.playback),
        });
    }
}
