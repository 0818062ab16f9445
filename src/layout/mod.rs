//! Placement of the two overlay elements injected into the host surface.
//!
//! `compute_layout` is a pure function: the runtime re-derives the full margin
//! set whenever an anchor, the orientation, the handedness, a visibility flag,
//! or a configured margin changes.

mod gravity;
#[cfg(test)]
mod tests;

pub use gravity::{codes, AnchorGravity, Handedness, Horizontal, Orientation, Vertical};

use serde::Serialize;

/// Square size of the clear-all button.
pub const ELEMENT_SIZE_DP: u32 = 50;
/// Default horizontal inset of the resource bar.
pub const BAR_MARGIN_DP: u32 = 10;
/// Vertical inset of the resource bar from its anchored edge.
pub const BAR_VERTICAL_MARGIN_DP: u32 = 15;
/// Inner paddings of the resource bar (horizontal, vertical).
pub const BAR_PADDING_DP: (u32, u32) = (4, 1);

/// Configured sizes, all in density-independent pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutMetrics {
    pub margin_top_dp: u32,
    pub margin_bottom_dp: u32,
    pub element_size_dp: u32,
    pub bar_margin_dp: u32,
    pub bar_vertical_margin_dp: u32,
}

impl LayoutMetrics {
    pub fn new(margin_top_dp: u32, margin_bottom_dp: u32) -> Self {
        Self {
            margin_top_dp,
            margin_bottom_dp,
            element_size_dp: ELEMENT_SIZE_DP,
            bar_margin_dp: BAR_MARGIN_DP,
            bar_vertical_margin_dp: BAR_VERTICAL_MARGIN_DP,
        }
    }
}

/// Everything the engine reads. Nothing else influences the result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutInputs {
    pub clear_button: AnchorGravity,
    pub resource_bar: AnchorGravity,
    pub orientation: Orientation,
    pub handedness: Handedness,
    pub clear_button_visible: bool,
    pub resource_bar_visible: bool,
    /// Host presents a phone-shaped surface (system bar moves to the side in landscape).
    pub phone_ui: bool,
    /// Pixels per dp.
    pub density: f32,
    pub metrics: LayoutMetrics,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Margins {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

/// Final parameters for one overlay element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OverlayPlacement {
    pub gravity: AnchorGravity,
    pub visible: bool,
    /// `None` when the anchor is suppressed or merged and no layout was computed.
    pub margins: Option<Margins>,
}

impl OverlayPlacement {
    fn skipped(gravity: AnchorGravity) -> Self {
        Self {
            gravity,
            visible: false,
            margins: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LayoutOutput {
    pub clear_button: OverlayPlacement,
    pub resource_bar: OverlayPlacement,
}

/// Convert dp to whole pixels, truncating like the host does.
pub fn dp_to_px(dp: u32, density: f32) -> u32 {
    let px = dp as f32 * density;
    if px.is_finite() && px > 0.0 {
        px as u32
    } else {
        0
    }
}

struct Pixels {
    top: u32,
    bottom: u32,
    element: u32,
    bar_horizontal: u32,
    bar_vertical: u32,
}

impl Pixels {
    fn from(inputs: &LayoutInputs) -> Self {
        let m = inputs.metrics;
        let d = inputs.density;
        Self {
            top: dp_to_px(m.margin_top_dp, d),
            bottom: dp_to_px(m.margin_bottom_dp, d),
            element: dp_to_px(m.element_size_dp, d),
            bar_horizontal: dp_to_px(m.bar_margin_dp, d),
            bar_vertical: dp_to_px(m.bar_vertical_margin_dp, d),
        }
    }
}

/// System bar sits on a side edge: landscape on a phone-shaped host.
fn side_system_bar(inputs: &LayoutInputs) -> bool {
    inputs.orientation == Orientation::Landscape && inputs.phone_ui
}

/// System bar sits on the bottom edge.
fn bottom_system_bar(inputs: &LayoutInputs) -> bool {
    inputs.orientation == Orientation::Portrait || !inputs.phone_ui
}

fn split_side_extra(handedness: Handedness, extra: u32) -> (u32, u32) {
    match handedness {
        Handedness::Left => (extra, 0),
        Handedness::Right => (0, extra),
    }
}

fn clear_button_margins(inputs: &LayoutInputs, px: &Pixels) -> Margins {
    let anchor = inputs.clear_button;
    let edge = if anchor.on_top() {
        Vertical::Top
    } else {
        Vertical::Bottom
    };
    let extra = if anchor == inputs.handedness.reference_corner(edge) && side_system_bar(inputs)
    {
        px.bottom
    } else {
        0
    };
    let (left, right) = split_side_extra(inputs.handedness, extra);
    if edge == Vertical::Top {
        Margins {
            left,
            top: px.top,
            right,
            bottom: 0,
        }
    } else {
        Margins {
            left,
            top: 0,
            right,
            bottom: if bottom_system_bar(inputs) { px.bottom } else { 0 },
        }
    }
}

fn resource_bar_margins(inputs: &LayoutInputs, px: &Pixels, button_visible: bool) -> Margins {
    let bar_on_top = inputs.resource_bar.on_top();
    let sibling = button_visible && inputs.clear_button.on_top() == bar_on_top;
    let button_on_left = inputs.clear_button.on_left();

    let extra = if side_system_bar(inputs) { px.bottom } else { 0 };
    let (extra_left, extra_right) = split_side_extra(inputs.handedness, extra);

    let left = if sibling && button_on_left {
        px.element
    } else {
        px.bar_horizontal + extra_left
    };
    let right = if sibling && !button_on_left {
        px.element
    } else {
        px.bar_horizontal + extra_right
    };

    if bar_on_top {
        Margins {
            left,
            top: px.bar_vertical + px.top,
            right,
            bottom: 0,
        }
    } else {
        let edge_margin = if bottom_system_bar(inputs) { px.bottom } else { 0 };
        Margins {
            left,
            top: 0,
            right,
            bottom: px.bar_vertical + edge_margin,
        }
    }
}

/// Compute placement for the clear-all button and the resource bar.
pub fn compute_layout(inputs: &LayoutInputs) -> LayoutOutput {
    let px = Pixels::from(inputs);

    let clear_button = if inputs.clear_button.is_positional() {
        OverlayPlacement {
            gravity: inputs.clear_button,
            visible: inputs.clear_button_visible,
            margins: Some(clear_button_margins(inputs, &px)),
        }
    } else {
        OverlayPlacement::skipped(inputs.clear_button)
    };

    let resource_bar = if inputs.resource_bar.is_positional() {
        OverlayPlacement {
            gravity: inputs.resource_bar,
            visible: inputs.resource_bar_visible,
            margins: Some(resource_bar_margins(inputs, &px, clear_button.visible)),
        }
    } else {
        OverlayPlacement::skipped(inputs.resource_bar)
    };

    LayoutOutput {
        clear_button,
        resource_bar,
    }
}
