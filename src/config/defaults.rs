use crate::charge::Argb;
use crate::layout::codes;

pub const DEFAULT_CLEAR_BUTTON_GRAVITY: i64 = codes::TOP | codes::RIGHT;
pub const DEFAULT_RESOURCE_BAR_GRAVITY: i64 = codes::SUPPRESSED;
pub const DEFAULT_MARGIN_TOP_DP: u32 = 77;
pub const DEFAULT_MARGIN_BOTTOM_DP: u32 = 50;
pub const MAX_MARGIN_DP: u32 = 400;
pub const DEFAULT_DENSITY: f32 = 1.0;
pub const MIN_DENSITY: f32 = 0.5;
pub const MAX_DENSITY: f32 = 8.0;
pub const DEFAULT_AUTO_STOP_HOURS: u32 = 1;
pub const MAX_AUTO_STOP_HOURS: u32 = 24;
pub const DEFAULT_PERCENT_COLOR: Argb = Argb::WHITE;
pub const DEFAULT_CHARGING_COLOR: Argb = Argb::GREEN;
pub const MAX_PERCENT_SIGN_CHARS: usize = 4;
