use anyhow::{bail, Context, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Packed 0xAARRGGBB colour.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Argb(pub u32);

impl Argb {
    pub const WHITE: Argb = Argb(0xFFFF_FFFF);
    pub const GREEN: Argb = Argb(0xFF00_FF00);

    pub fn channels(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    pub fn from_channels(channels: [u8; 4]) -> Self {
        Self(u32::from_be_bytes(channels))
    }

    /// Per-channel linear interpolation; `t` is clamped to `[0, 1]`.
    pub fn lerp(self, to: Argb, t: f32) -> Argb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let from = self.channels();
        let to = to.channels();
        let mut out = [0u8; 4];
        for i in 0..4 {
            let delta = i32::from(to[i]) - i32::from(from[i]);
            let value = i32::from(from[i]) + (delta as f32 * t) as i32;
            out[i] = value.clamp(0, 255) as u8;
        }
        Argb::from_channels(out)
    }
}

impl fmt::Debug for Argb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Argb(#{:08X})", self.0)
    }
}

impl fmt::Display for Argb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08X}", self.0)
    }
}

impl FromStr for Argb {
    type Err = anyhow::Error;

    /// Accepts `#RRGGBB` (opaque) or `#AARRGGBB`; the `#` is optional.
    fn from_str(s: &str) -> Result<Self> {
        let hex = s.trim().trim_start_matches('#');
        let value = u32::from_str_radix(hex, 16).with_context(|| format!("invalid colour {s:?}"))?;
        match hex.len() {
            6 => Ok(Argb(0xFF00_0000 | value)),
            8 => Ok(Argb(value)),
            _ => bail!("colour {s:?} must be #RRGGBB or #AARRGGBB"),
        }
    }
}

impl Serialize for Argb {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Argb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Packed(u32),
            Hex(String),
        }
        match Raw::deserialize(deserializer)? {
            Raw::Packed(value) => Ok(Argb(value)),
            Raw::Hex(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Time for one sweep from the base colour to the charge colour.
pub const HALF_CYCLE: Duration = Duration::from_millis(1000);

/// Colour of the reversing charge pulse after `elapsed`: base at even
/// half-cycle boundaries, charge colour at odd ones.
pub fn pulse_color(base: Argb, charge: Argb, elapsed: Duration) -> Argb {
    let half = HALF_CYCLE.as_millis();
    let elapsed = elapsed.as_millis();
    let cycle = elapsed / half;
    let fraction = (elapsed % half) as f32 / half as f32;
    let t = if cycle % 2 == 0 { fraction } else { 1.0 - fraction };
    base.lerp(charge, t)
}
