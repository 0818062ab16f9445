//! Startup preferences and runtime preference changes.

mod change;
mod defaults;
mod validation;

use crate::charge::{Argb, ChargingStyle};
use crate::recording::RecordingQuality;
use clap::Parser;

pub use change::{AppliedChange, ConfigChange, PrefValue, Preferences};
pub use defaults::{
    DEFAULT_AUTO_STOP_HOURS, DEFAULT_CHARGING_COLOR, DEFAULT_CLEAR_BUTTON_GRAVITY, DEFAULT_DENSITY,
    DEFAULT_MARGIN_BOTTOM_DP, DEFAULT_MARGIN_TOP_DP, DEFAULT_PERCENT_COLOR,
    DEFAULT_RESOURCE_BAR_GRAVITY, MAX_AUTO_STOP_HOURS, MAX_DENSITY, MAX_MARGIN_DP, MIN_DENSITY,
};

/// Persisted preferences that seed an overlay context.
#[derive(Debug, Parser, Clone)]
#[command(about = "Surface augment runtime", author, version)]
pub struct AppConfig {
    /// Clear-all button gravity (0 off, 1 navigation bar, else gravity flags)
    #[arg(
        long = "clear-button-gravity",
        env = "SURFACE_AUGMENT_CLEAR_BUTTON_GRAVITY",
        default_value_t = DEFAULT_CLEAR_BUTTON_GRAVITY
    )]
    pub clear_button_gravity: i64,

    /// Memory bar gravity (0 off, else gravity flags)
    #[arg(
        long = "ram-bar-gravity",
        env = "SURFACE_AUGMENT_RAM_BAR_GRAVITY",
        default_value_t = DEFAULT_RESOURCE_BAR_GRAVITY
    )]
    pub ram_bar_gravity: i64,

    /// Top margin for top-anchored overlays (dp)
    #[arg(long = "margin-top-dp", default_value_t = DEFAULT_MARGIN_TOP_DP)]
    pub margin_top_dp: u32,

    /// Bottom margin for bottom-anchored overlays (dp)
    #[arg(long = "margin-bottom-dp", default_value_t = DEFAULT_MARGIN_BOTTOM_DP)]
    pub margin_bottom_dp: u32,

    /// Navigation bar sits on the left when rotated
    #[arg(long = "left-handed", default_value_t = false)]
    pub left_handed: bool,

    /// Pixels per dp
    #[arg(long, default_value_t = DEFAULT_DENSITY)]
    pub density: f32,

    /// Start in landscape orientation
    #[arg(long, default_value_t = false)]
    pub landscape: bool,

    /// Host uses a tablet (non phone-shaped) presentation
    #[arg(long, default_value_t = false)]
    pub tablet: bool,

    /// Quick-record capture quality
    #[arg(long = "recording-quality", value_enum, default_value_t = RecordingQuality::Medium)]
    pub recording_quality: RecordingQuality,

    /// Stop a recording automatically after this many hours (0 disables)
    #[arg(long = "auto-stop-hours", default_value_t = DEFAULT_AUTO_STOP_HOURS)]
    pub auto_stop_hours: u32,

    /// Battery percentage style while charging
    #[arg(long = "charging-style", value_enum, default_value_t = ChargingStyle::None)]
    pub charging_style: ChargingStyle,

    /// Battery percentage colour while charging (#RRGGBB or #AARRGGBB)
    #[arg(long = "charging-color", default_value_t = DEFAULT_CHARGING_COLOR)]
    pub charging_color: Argb,

    /// Resting battery percentage colour (#RRGGBB or #AARRGGBB)
    #[arg(long = "percent-color", default_value_t = DEFAULT_PERCENT_COLOR)]
    pub percent_color: Argb,

    /// Text appended to the battery level
    #[arg(long = "percent-sign", default_value = "")]
    pub percent_sign: String,

    /// Enable file logging (debug)
    #[arg(long = "logs", env = "SURFACE_AUGMENT_LOGS", default_value_t = false)]
    pub logs: bool,

    /// Disable all file logging (overrides --logs and log env vars)
    #[arg(
        long = "no-logs",
        env = "SURFACE_AUGMENT_NO_LOGS",
        default_value_t = false
    )]
    pub no_logs: bool,
}

impl AppConfig {
    pub fn logging_enabled(&self) -> bool {
        self.logs && !self.no_logs
    }
}
