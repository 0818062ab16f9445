//! Battery percentage colouring, including the pulsing charge animation.
//!
//! The pulse is a step function advanced by the frame timer on the control
//! thread. Stopping it always leaves the resting colour applied.

mod color;

pub use color::{pulse_color, Argb, HALF_CYCLE};

use crate::host::{HostSurface, SurfaceOutput};
use crate::{log_debug, Component};
use crate::scheduler::TimerSlot;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Interval between animation frames.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(33);

pub const LOW_PROFILE_ALPHA: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatteryData {
    pub level: u8,
    pub charging: bool,
}

impl BatteryData {
    /// Charging and not yet full.
    pub fn is_filling(&self) -> bool {
        self.charging && self.level < 100
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ChargingStyle {
    #[default]
    None,
    Static,
    Animated,
}

/// Status-bar icon colouring as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct IconProfile {
    #[serde(default)]
    pub coloring_enabled: bool,
    #[serde(default)]
    pub icon_color: Option<Argb>,
    #[serde(default)]
    pub follow_stock_color: bool,
    #[serde(default)]
    pub stock_color: Option<Argb>,
    #[serde(default)]
    pub low_profile: bool,
}

#[derive(Debug, Clone, Copy)]
struct Pulse {
    started_at: Instant,
    base: Argb,
    charge: Argb,
}

pub struct ChargeIndicator {
    battery: Option<BatteryData>,
    style: ChargingStyle,
    default_color: Argb,
    base_color: Argb,
    charge_color: Argb,
    percent_sign: String,
    pulse: Option<Pulse>,
    frame: TimerSlot,
    applied_color: Option<Argb>,
    applied_alpha: Option<f32>,
    applied_text: Option<String>,
}

impl ChargeIndicator {
    /// `default_color` is the resting colour used whenever the host offers no better one.
    pub fn new(style: ChargingStyle, default_color: Argb, charge_color: Argb) -> Self {
        Self {
            battery: None,
            style,
            default_color,
            base_color: default_color,
            charge_color,
            percent_sign: String::new(),
            pulse: None,
            frame: TimerSlot::new(),
            applied_color: None,
            applied_alpha: None,
            applied_text: None,
        }
    }

    pub fn battery(&self) -> Option<BatteryData> {
        self.battery
    }

    pub fn style(&self) -> ChargingStyle {
        self.style
    }

    pub fn base_color(&self) -> Argb {
        self.base_color
    }

    pub fn charge_color(&self) -> Argb {
        self.charge_color
    }

    pub fn is_animating(&self) -> bool {
        self.pulse.is_some()
    }

    /// Last colour handed to the surface.
    pub fn current_color(&self) -> Option<Argb> {
        self.applied_color
    }

    pub fn frame_timer(&self) -> &TimerSlot {
        &self.frame
    }

    pub fn on_battery(&mut self, data: BatteryData, now: Instant, surface: &mut dyn HostSurface) {
        self.battery = Some(data);
        self.update(now, surface);
    }

    pub fn set_style(&mut self, style: ChargingStyle, now: Instant, surface: &mut dyn HostSurface) {
        self.style = style;
        self.update(now, surface);
    }

    pub fn set_percent_sign(&mut self, sign: &str, now: Instant, surface: &mut dyn HostSurface) {
        self.percent_sign = sign.to_string();
        self.update(now, surface);
    }

    /// Explicit colour command. A running pulse is cancelled before the new colour lands.
    pub fn set_base_color(&mut self, color: Argb, now: Instant, surface: &mut dyn HostSurface) {
        self.base_color = color;
        self.stop_pulse(surface);
        self.update(now, surface);
    }

    pub fn set_charge_color(&mut self, color: Argb, now: Instant, surface: &mut dyn HostSurface) {
        self.charge_color = color;
        self.stop_pulse(surface);
        self.update(now, surface);
    }

    pub fn on_icon_profile(
        &mut self,
        profile: IconProfile,
        now: Instant,
        surface: &mut dyn HostSurface,
    ) {
        let color = match (profile.coloring_enabled, profile.icon_color) {
            (true, Some(icon)) => icon,
            _ if profile.follow_stock_color => profile.stock_color.unwrap_or(self.default_color),
            _ => self.default_color,
        };
        let alpha = if profile.low_profile {
            LOW_PROFILE_ALPHA
        } else {
            1.0
        };
        if self.applied_alpha != Some(alpha) {
            self.applied_alpha = Some(alpha);
            surface.emit(SurfaceOutput::PercentageAlpha { alpha });
        }
        if color != self.base_color {
            self.set_base_color(color, now, surface);
        }
    }

    /// Advance the pulse. Fires from a cancelled or replaced frame timer are ignored.
    pub fn on_frame(&mut self, generation: u64, now: Instant, surface: &mut dyn HostSurface) {
        if !self.frame.accept_fire(generation) {
            return;
        }
        let Some(pulse) = self.pulse else {
            return;
        };
        let elapsed = now.saturating_duration_since(pulse.started_at);
        self.apply_color(pulse_color(pulse.base, pulse.charge, elapsed), surface);
        self.frame.schedule(now, FRAME_INTERVAL);
    }

    /// Stop any pulse and drop the frame timer.
    pub fn teardown(&mut self, surface: &mut dyn HostSurface) {
        self.stop_pulse(surface);
    }

    fn update(&mut self, now: Instant, surface: &mut dyn HostSurface) {
        let Some(battery) = self.battery else {
            return;
        };
        let text = format!("{}{}", battery.level, self.percent_sign);
        if self.applied_text.as_deref() != Some(text.as_str()) {
            self.applied_text = Some(text.clone());
            surface.emit(SurfaceOutput::PercentageText { text });
        }

        if !battery.is_filling() {
            self.stop_pulse(surface);
            self.apply_color(self.base_color, surface);
            return;
        }
        match self.style {
            ChargingStyle::Static => {
                self.cancel_pulse();
                self.apply_color(self.charge_color, surface);
            }
            ChargingStyle::Animated => self.start_pulse(now, surface),
            ChargingStyle::None => {
                self.stop_pulse(surface);
                self.apply_color(self.base_color, surface);
            }
        }
    }

    fn start_pulse(&mut self, now: Instant, surface: &mut dyn HostSurface) {
        if self.pulse.is_some() {
            return;
        }
        log_debug(Component::Charge, "pulse started");
        self.pulse = Some(Pulse {
            started_at: now,
            base: self.base_color,
            charge: self.charge_color,
        });
        self.apply_color(self.base_color, surface);
        self.frame.schedule(now, FRAME_INTERVAL);
    }

    /// Stop the pulse and rest on the base colour.
    fn stop_pulse(&mut self, surface: &mut dyn HostSurface) {
        if self.cancel_pulse() {
            self.apply_color(self.base_color, surface);
        }
    }

    fn cancel_pulse(&mut self) -> bool {
        if self.pulse.take().is_none() {
            return false;
        }
        log_debug(Component::Charge, "pulse stopped");
        self.frame.cancel();
        true
    }

    fn apply_color(&mut self, color: Argb, surface: &mut dyn HostSurface) {
        if self.applied_color == Some(color) {
            return;
        }
        self.applied_color = Some(color);
        surface.emit(SurfaceOutput::PercentageColor { color });
    }
}
