//! Record/playback session state machine behind the quick-record tile.
//!
//! Presses come from the user, status changes from the external recording
//! service, completions from the media subsystem and fires from the auto-stop
//! timer. All of them are applied on the control thread, so whichever arrives
//! first wins and the later one meets already-updated state.

mod ports;
#[cfg(test)]
mod tests;

pub use ports::{
    CompletionNotifier, FileProbe, FsProbe, IntentBackend, MediaPlayer, RecordingBackend,
    RecordingQuality,
};

use crate::error::CoreError;
use crate::{log_debug, Component};
use crate::runtime::EventSender;
use crate::scheduler::TimerSlot;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

pub const MILLIS_PER_HOUR: u64 = 3_600_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordingState {
    #[default]
    Idle,
    Recording,
    JustRecorded,
    NoRecording,
    Playing,
}

impl RecordingState {
    /// Tile label for the state.
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "Quick record",
            Self::Recording => "Recording",
            Self::JustRecorded => "Recorded",
            Self::NoRecording => "Record",
            Self::Playing => "Playing",
        }
    }
}

/// Status values broadcast by the recording service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecordingStatus {
    Idle,
    Started {
        #[serde(default)]
        filename: Option<PathBuf>,
    },
    Stopped,
    Error {
        #[serde(default)]
        message: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordingEvent {
    ShortPress,
    LongPress,
    Status(RecordingStatus),
    AutoStopFired { generation: u64 },
    PlaybackCompleted { playback: Option<u64> },
}

/// Collaborators borrowed for the duration of one event.
pub struct RecordingPorts<'a> {
    pub backend: &'a mut dyn RecordingBackend,
    pub player: &'a mut dyn MediaPlayer,
    pub files: &'a dyn FileProbe,
}

pub struct RecordingController {
    state: RecordingState,
    file_path: Option<PathBuf>,
    quality: RecordingQuality,
    auto_stop_delay: Duration,
    started_at: Option<Instant>,
    auto_stop: TimerSlot,
    active_playback: Option<u64>,
    playback_seq: u64,
    events: EventSender,
}

impl RecordingController {
    pub fn new(quality: RecordingQuality, auto_stop_delay: Duration, events: EventSender) -> Self {
        Self {
            state: RecordingState::Idle,
            file_path: None,
            quality,
            auto_stop_delay,
            started_at: None,
            auto_stop: TimerSlot::new(),
            active_playback: None,
            playback_seq: 0,
            events,
        }
    }

    pub fn state(&self) -> RecordingState {
        self.state
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn quality(&self) -> RecordingQuality {
        self.quality
    }

    pub fn auto_stop_delay(&self) -> Duration {
        self.auto_stop_delay
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at
    }

    pub fn auto_stop_timer(&self) -> &TimerSlot {
        &self.auto_stop
    }

    pub fn active_playback(&self) -> Option<u64> {
        self.active_playback
    }

    pub fn set_quality(&mut self, quality: RecordingQuality) {
        self.quality = quality;
    }

    /// Takes effect the next time a recording starts.
    pub fn set_auto_stop_delay(&mut self, delay: Duration) {
        self.auto_stop_delay = delay;
    }

    /// Apply one event. Returns an error worth surfacing; the state is already
    /// consistent when it does.
    pub fn handle(
        &mut self,
        event: RecordingEvent,
        ports: &mut RecordingPorts<'_>,
        now: Instant,
    ) -> Option<CoreError> {
        match event {
            RecordingEvent::ShortPress => self.on_short_press(ports),
            RecordingEvent::LongPress => self.on_long_press(ports, now),
            RecordingEvent::Status(status) => self.on_status(status, ports, now),
            RecordingEvent::AutoStopFired { generation } => self.on_auto_stop(generation, ports),
            RecordingEvent::PlaybackCompleted { playback } => {
                self.on_playback_completed(playback, ports);
                None
            }
        }
    }

    /// Release the player and drop the timer. Used on host teardown.
    pub fn teardown(&mut self, ports: &mut RecordingPorts<'_>) {
        if self.active_playback.take().is_some() {
            ports.player.release();
        }
        self.auto_stop.cancel();
    }

    fn on_short_press(&mut self, ports: &mut RecordingPorts<'_>) -> Option<CoreError> {
        self.revalidate_recorded_file(ports);
        match self.state {
            RecordingState::Recording => self.request_stop(ports),
            RecordingState::NoRecording => None,
            RecordingState::Idle | RecordingState::JustRecorded => self.start_playback(ports),
            RecordingState::Playing => {
                self.enter(RecordingState::Idle, ports);
                None
            }
        }
    }

    fn on_long_press(&mut self, ports: &mut RecordingPorts<'_>, now: Instant) -> Option<CoreError> {
        self.revalidate_recorded_file(ports);
        match self.state {
            RecordingState::NoRecording | RecordingState::Idle | RecordingState::JustRecorded => {
                if let Err(err) = ports.backend.start_recording(self.quality) {
                    return Some(CoreError::RecordingBackend {
                        message: format!("start request failed: {err:#}"),
                    });
                }
                self.enter(RecordingState::Recording, ports);
                self.arm_auto_stop(now);
                None
            }
            RecordingState::Recording | RecordingState::Playing => None,
        }
    }

    fn on_status(
        &mut self,
        status: RecordingStatus,
        ports: &mut RecordingPorts<'_>,
        now: Instant,
    ) -> Option<CoreError> {
        match status {
            RecordingStatus::Idle => {
                self.enter(RecordingState::Idle, ports);
                None
            }
            RecordingStatus::Started { filename } => {
                if let Some(path) = filename {
                    self.file_path = Some(path);
                }
                self.enter(RecordingState::Recording, ports);
                self.started_at = Some(now);
                self.arm_auto_stop(now);
                None
            }
            RecordingStatus::Stopped => {
                self.enter(RecordingState::JustRecorded, ports);
                None
            }
            RecordingStatus::Error { message } => {
                self.enter(RecordingState::NoRecording, ports);
                Some(CoreError::RecordingBackend {
                    message: message.unwrap_or_else(|| "unknown error".to_string()),
                })
            }
        }
    }

    fn on_auto_stop(&mut self, generation: u64, ports: &mut RecordingPorts<'_>) -> Option<CoreError> {
        if !self.auto_stop.accept_fire(generation) {
            log_debug(Component::Recording, "auto-stop fire ignored: timer no longer armed");
            return None;
        }
        if self.state != RecordingState::Recording {
            return None;
        }
        log_debug(Component::Recording, "auto-stop delay elapsed; requesting stop");
        self.request_stop(ports)
    }

    fn on_playback_completed(&mut self, playback: Option<u64>, ports: &mut RecordingPorts<'_>) {
        if self.state != RecordingState::Playing {
            return;
        }
        if playback.is_some() && playback != self.active_playback {
            log_debug(Component::Recording, "stale playback completion ignored");
            return;
        }
        self.enter(RecordingState::Idle, ports);
    }

    /// Demotes any state to `NoRecording` when the recorded file is unset or gone.
    fn revalidate_recorded_file(&mut self, ports: &mut RecordingPorts<'_>) {
        if self.state == RecordingState::NoRecording {
            return;
        }
        let present = self
            .file_path
            .as_deref()
            .is_some_and(|path| ports.files.exists(path));
        if !present {
            log_debug(Component::Recording, "recorded file missing; no recording available");
            self.enter(RecordingState::NoRecording, ports);
        }
    }

    fn request_stop(&mut self, ports: &mut RecordingPorts<'_>) -> Option<CoreError> {
        ports
            .backend
            .stop_recording()
            .err()
            .map(|err| CoreError::RecordingBackend {
                message: format!("stop request failed: {err:#}"),
            })
    }

    fn start_playback(&mut self, ports: &mut RecordingPorts<'_>) -> Option<CoreError> {
        let path = self.file_path.clone()?;
        self.playback_seq += 1;
        let notifier = CompletionNotifier::new(self.events.clone(), self.playback_seq);
        match ports.player.start(&path, notifier) {
            Ok(()) => {
                self.active_playback = Some(self.playback_seq);
                self.enter(RecordingState::Playing, ports);
                None
            }
            Err(err) => {
                ports.player.release();
                Some(CoreError::PlaybackOpen {
                    path,
                    reason: format!("{err:#}"),
                })
            }
        }
    }

    fn arm_auto_stop(&mut self, now: Instant) {
        self.auto_stop.cancel();
        if !self.auto_stop_delay.is_zero() {
            self.auto_stop.schedule(now, self.auto_stop_delay);
        }
    }

    fn enter(&mut self, next: RecordingState, ports: &mut RecordingPorts<'_>) {
        if self.state == RecordingState::Playing && next != RecordingState::Playing {
            self.active_playback = None;
            ports.player.release();
        }
        if next != RecordingState::Recording {
            self.auto_stop.cancel();
            self.started_at = None;
        }
        if self.state != next {
            log_debug(
                Component::Recording,
                &format!("state {:?} -> {next:?}", self.state),
            );
        }
        self.state = next;
    }
}
