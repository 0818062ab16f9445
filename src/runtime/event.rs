use crate::charge::{Argb, BatteryData, IconProfile};
use crate::config::ConfigChange;
use crate::layout::Orientation;
use crate::recording::RecordingStatus;
use crate::scheduler::TimerId;
use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};

/// Producer half of the control thread's queue.
pub type EventSender = Sender<CoreEvent>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickTarget {
    ClearButton,
    RecordTile,
}

/// Everything the core reacts to. Foreign callbacks only ever enqueue one of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CoreEvent {
    Shown {
        #[serde(default = "default_true")]
        has_tasks: bool,
    },
    Hidden,
    Destroyed,
    ConfigChanged(ConfigChange),
    DisplayChanged {
        orientation: Orientation,
        #[serde(default = "default_true")]
        phone_ui: bool,
    },
    Battery(BatteryData),
    IconProfile(IconProfile),
    /// Explicit resting colour for the battery percentage.
    PercentColor {
        color: Argb,
    },
    RecordingStatus(RecordingStatus),
    DismissAll,
    ItemDismissed,
    ShortPress,
    LongPress,
    Click {
        target: ClickTarget,
        #[serde(default)]
        long: bool,
    },
    PlaybackCompleted {
        #[serde(default)]
        playback: Option<u64>,
    },
    TimerFired {
        timer: TimerId,
        generation: u64,
    },
}

fn default_true() -> bool {
    true
}
