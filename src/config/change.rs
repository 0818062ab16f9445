use super::defaults::{
    DEFAULT_AUTO_STOP_HOURS, DEFAULT_CHARGING_COLOR, DEFAULT_CLEAR_BUTTON_GRAVITY,
    DEFAULT_MARGIN_BOTTOM_DP, DEFAULT_MARGIN_TOP_DP, DEFAULT_RESOURCE_BAR_GRAVITY,
    MAX_AUTO_STOP_HOURS, MAX_MARGIN_DP, MAX_PERCENT_SIGN_CHARS,
};
use super::AppConfig;
use crate::charge::{Argb, ChargingStyle};
use crate::error::CoreError;
use crate::layout::{AnchorGravity, Handedness, LayoutMetrics, Orientation};
use crate::recording::{RecordingQuality, MILLIS_PER_HOUR};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// A raw preference value as the host stores it. Any JSON value decodes, so a
/// malformed field is rejected by its parser instead of failing the whole change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrefValue {
    Bool(bool),
    Int(i64),
    Text(String),
    Other(serde_json::Value),
}

impl PrefValue {
    fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            Self::Text(text) => text.trim().parse().ok(),
            Self::Bool(_) | Self::Other(_) => None,
        }
    }

    fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            Self::Int(0) => Some(false),
            Self::Int(1) => Some(true),
            Self::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
            Self::Int(_) | Self::Other(_) => None,
        }
    }
}

impl fmt::Display for PrefValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
            Self::Other(value) => write!(f, "{value}"),
        }
    }
}

/// A partial preference update. Absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigChange {
    pub clear_button_gravity: Option<PrefValue>,
    pub resource_bar_gravity: Option<PrefValue>,
    pub margin_top_dp: Option<PrefValue>,
    pub margin_bottom_dp: Option<PrefValue>,
    pub recording_quality: Option<PrefValue>,
    pub auto_stop_hours: Option<PrefValue>,
    pub left_handed: Option<PrefValue>,
    pub charging_style: Option<PrefValue>,
    pub charging_color: Option<PrefValue>,
    pub percent_sign: Option<PrefValue>,
}

/// Which concerns an applied change touched, plus the values that fell back.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AppliedChange {
    pub layout: bool,
    pub recording: bool,
    pub charge: bool,
    pub errors: Vec<CoreError>,
}

/// Live preference state held by an overlay context.
#[derive(Debug, Clone, PartialEq)]
pub struct Preferences {
    pub clear_button: AnchorGravity,
    pub resource_bar: AnchorGravity,
    pub margin_top_dp: u32,
    pub margin_bottom_dp: u32,
    pub handedness: Handedness,
    pub orientation: Orientation,
    pub phone_ui: bool,
    pub density: f32,
    pub recording_quality: RecordingQuality,
    pub auto_stop_hours: u32,
    pub charging_style: ChargingStyle,
    pub charging_color: Argb,
    pub percent_color: Argb,
    pub percent_sign: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            clear_button: default_clear_button(),
            resource_bar: default_resource_bar(),
            margin_top_dp: DEFAULT_MARGIN_TOP_DP,
            margin_bottom_dp: DEFAULT_MARGIN_BOTTOM_DP,
            handedness: Handedness::Right,
            orientation: Orientation::Portrait,
            phone_ui: true,
            density: super::DEFAULT_DENSITY,
            recording_quality: RecordingQuality::Medium,
            auto_stop_hours: DEFAULT_AUTO_STOP_HOURS,
            charging_style: ChargingStyle::None,
            charging_color: DEFAULT_CHARGING_COLOR,
            percent_color: super::DEFAULT_PERCENT_COLOR,
            percent_sign: String::new(),
        }
    }
}

impl Preferences {
    /// Seed from a validated config. Unknown gravity codes fall back to defaults.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            clear_button: AnchorGravity::from_code(config.clear_button_gravity)
                .unwrap_or_else(default_clear_button),
            resource_bar: AnchorGravity::from_code(config.ram_bar_gravity)
                .filter(|gravity| *gravity != AnchorGravity::Merged)
                .unwrap_or_else(default_resource_bar),
            margin_top_dp: config.margin_top_dp,
            margin_bottom_dp: config.margin_bottom_dp,
            handedness: Handedness::from_left_handed(config.left_handed),
            orientation: if config.landscape {
                Orientation::Landscape
            } else {
                Orientation::Portrait
            },
            phone_ui: !config.tablet,
            density: config.density,
            recording_quality: config.recording_quality,
            auto_stop_hours: config.auto_stop_hours,
            charging_style: config.charging_style,
            charging_color: config.charging_color,
            percent_color: config.percent_color,
            percent_sign: config.percent_sign.clone(),
        }
    }

    pub fn auto_stop_delay(&self) -> Duration {
        Duration::from_millis(u64::from(self.auto_stop_hours) * MILLIS_PER_HOUR)
    }

    pub fn layout_metrics(&self) -> LayoutMetrics {
        LayoutMetrics::new(self.margin_top_dp, self.margin_bottom_dp)
    }

    /// Merge `change` in. Malformed values are replaced by their documented
    /// default and reported; they never abort the rest of the change.
    pub fn apply(&mut self, change: &ConfigChange) -> AppliedChange {
        let mut applied = AppliedChange::default();

        if let Some(raw) = &change.clear_button_gravity {
            self.clear_button = parse_or_default(
                &mut applied.errors,
                "clear_button_gravity",
                raw,
                |v| v.as_int().and_then(AnchorGravity::from_code),
                default_clear_button(),
            );
            applied.layout = true;
        }
        if let Some(raw) = &change.resource_bar_gravity {
            self.resource_bar = parse_or_default(
                &mut applied.errors,
                "resource_bar_gravity",
                raw,
                |v| {
                    v.as_int()
                        .and_then(AnchorGravity::from_code)
                        .filter(|gravity| *gravity != AnchorGravity::Merged)
                },
                default_resource_bar(),
            );
            applied.layout = true;
        }
        if let Some(raw) = &change.margin_top_dp {
            self.margin_top_dp = parse_or_default(
                &mut applied.errors,
                "margin_top_dp",
                raw,
                parse_margin,
                DEFAULT_MARGIN_TOP_DP,
            );
            applied.layout = true;
        }
        if let Some(raw) = &change.margin_bottom_dp {
            self.margin_bottom_dp = parse_or_default(
                &mut applied.errors,
                "margin_bottom_dp",
                raw,
                parse_margin,
                DEFAULT_MARGIN_BOTTOM_DP,
            );
            applied.layout = true;
        }
        if let Some(raw) = &change.left_handed {
            self.handedness = parse_or_default(
                &mut applied.errors,
                "left_handed",
                raw,
                |v| v.as_bool().map(Handedness::from_left_handed),
                Handedness::Right,
            );
            applied.layout = true;
        }
        if let Some(raw) = &change.recording_quality {
            self.recording_quality = parse_or_default(
                &mut applied.errors,
                "recording_quality",
                raw,
                parse_quality,
                RecordingQuality::Medium,
            );
            applied.recording = true;
        }
        if let Some(raw) = &change.auto_stop_hours {
            self.auto_stop_hours = parse_or_default(
                &mut applied.errors,
                "auto_stop_hours",
                raw,
                |v| {
                    v.as_int()
                        .and_then(|hours| u32::try_from(hours).ok())
                        .filter(|hours| *hours <= MAX_AUTO_STOP_HOURS)
                },
                DEFAULT_AUTO_STOP_HOURS,
            );
            applied.recording = true;
        }
        if let Some(raw) = &change.charging_style {
            self.charging_style = parse_or_default(
                &mut applied.errors,
                "charging_style",
                raw,
                parse_charging_style,
                ChargingStyle::None,
            );
            applied.charge = true;
        }
        if let Some(raw) = &change.charging_color {
            self.charging_color = parse_or_default(
                &mut applied.errors,
                "charging_color",
                raw,
                parse_color,
                DEFAULT_CHARGING_COLOR,
            );
            applied.charge = true;
        }
        if let Some(raw) = &change.percent_sign {
            self.percent_sign = parse_or_default(
                &mut applied.errors,
                "percent_sign",
                raw,
                |v| match v {
                    PrefValue::Text(sign) if sign.chars().count() <= MAX_PERCENT_SIGN_CHARS => {
                        Some(sign.clone())
                    }
                    _ => None,
                },
                String::new(),
            );
            applied.charge = true;
        }
        applied
    }
}

fn default_clear_button() -> AnchorGravity {
    AnchorGravity::from_code(DEFAULT_CLEAR_BUTTON_GRAVITY).unwrap_or(AnchorGravity::TopRight)
}

fn default_resource_bar() -> AnchorGravity {
    AnchorGravity::from_code(DEFAULT_RESOURCE_BAR_GRAVITY).unwrap_or(AnchorGravity::Suppressed)
}

fn parse_or_default<T: fmt::Debug>(
    errors: &mut Vec<CoreError>,
    key: &'static str,
    raw: &PrefValue,
    parse: impl FnOnce(&PrefValue) -> Option<T>,
    fallback: T,
) -> T {
    match parse(raw) {
        Some(value) => value,
        None => {
            errors.push(CoreError::ConfigParse {
                key,
                value: raw.to_string(),
                fallback: format!("{fallback:?}"),
            });
            fallback
        }
    }
}

fn parse_margin(raw: &PrefValue) -> Option<u32> {
    raw.as_int()
        .and_then(|dp| u32::try_from(dp).ok())
        .filter(|dp| *dp <= MAX_MARGIN_DP)
}

/// Accepts a sampling rate or a quality name.
fn parse_quality(raw: &PrefValue) -> Option<RecordingQuality> {
    if let Some(rate) = raw.as_int() {
        return RecordingQuality::from_sampling_rate(rate);
    }
    match raw {
        PrefValue::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
            "low" => Some(RecordingQuality::Low),
            "medium" => Some(RecordingQuality::Medium),
            "high" => Some(RecordingQuality::High),
            _ => None,
        },
        _ => None,
    }
}

/// Accepts the host's 0/1/2 codes or a style name.
fn parse_charging_style(raw: &PrefValue) -> Option<ChargingStyle> {
    match raw.as_int() {
        Some(0) => return Some(ChargingStyle::None),
        Some(1) => return Some(ChargingStyle::Static),
        Some(2) => return Some(ChargingStyle::Animated),
        Some(_) => return None,
        None => {}
    }
    match raw {
        PrefValue::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
            "none" => Some(ChargingStyle::None),
            "static" => Some(ChargingStyle::Static),
            "animated" => Some(ChargingStyle::Animated),
            _ => None,
        },
        _ => None,
    }
}

/// Accepts a packed ARGB integer or a hex string.
fn parse_color(raw: &PrefValue) -> Option<Argb> {
    match raw {
        PrefValue::Int(value) => u32::try_from(*value)
            .ok()
            .or_else(|| i32::try_from(*value).ok().map(|signed| signed as u32))
            .map(Argb),
        PrefValue::Text(text) => text.parse().ok(),
        PrefValue::Bool(_) | PrefValue::Other(_) => None,
    }
}
