use serde::{Deserialize, Serialize};

/// Host gravity bits. Composite codes are `horizontal | vertical`.
pub mod codes {
    pub const SUPPRESSED: i64 = 0;
    pub const MERGED: i64 = 1;
    pub const CENTER_HORIZONTAL: i64 = 0x01;
    pub const LEFT: i64 = 0x03;
    pub const RIGHT: i64 = 0x05;
    pub const CENTER_VERTICAL: i64 = 0x10;
    pub const TOP: i64 = 0x30;
    pub const BOTTOM: i64 = 0x50;
    pub const HORIZONTAL_MASK: i64 = 0x07;
    pub const VERTICAL_MASK: i64 = 0x70;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vertical {
    Top,
    Center,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Horizontal {
    Left,
    Center,
    Right,
}

/// Symbolic anchor of an overlay element, plus the two non-positional states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorGravity {
    TopLeft,
    Top,
    TopRight,
    Left,
    Center,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
    /// Feature disabled.
    Suppressed,
    /// Delegated to the host's navigation bar.
    Merged,
}

impl AnchorGravity {
    /// The nine positional anchors, row by row.
    pub const POSITIONS: [AnchorGravity; 9] = [
        AnchorGravity::TopLeft,
        AnchorGravity::Top,
        AnchorGravity::TopRight,
        AnchorGravity::Left,
        AnchorGravity::Center,
        AnchorGravity::Right,
        AnchorGravity::BottomLeft,
        AnchorGravity::Bottom,
        AnchorGravity::BottomRight,
    ];

    /// Decode a host gravity code. Unknown bit patterns yield `None`.
    pub fn from_code(code: i64) -> Option<Self> {
        use codes::*;
        match code {
            SUPPRESSED => return Some(Self::Suppressed),
            MERGED => return Some(Self::Merged),
            _ => {}
        }
        if code & !(HORIZONTAL_MASK | VERTICAL_MASK) != 0 {
            return None;
        }
        let horizontal = match code & HORIZONTAL_MASK {
            0 | CENTER_HORIZONTAL => Horizontal::Center,
            LEFT => Horizontal::Left,
            RIGHT => Horizontal::Right,
            _ => return None,
        };
        let vertical = match code & VERTICAL_MASK {
            0 | CENTER_VERTICAL => Vertical::Center,
            TOP => Vertical::Top,
            BOTTOM => Vertical::Bottom,
            _ => return None,
        };
        Some(Self::from_parts(vertical, horizontal))
    }

    pub fn from_parts(vertical: Vertical, horizontal: Horizontal) -> Self {
        match (vertical, horizontal) {
            (Vertical::Top, Horizontal::Left) => Self::TopLeft,
            (Vertical::Top, Horizontal::Center) => Self::Top,
            (Vertical::Top, Horizontal::Right) => Self::TopRight,
            (Vertical::Center, Horizontal::Left) => Self::Left,
            (Vertical::Center, Horizontal::Center) => Self::Center,
            (Vertical::Center, Horizontal::Right) => Self::Right,
            (Vertical::Bottom, Horizontal::Left) => Self::BottomLeft,
            (Vertical::Bottom, Horizontal::Center) => Self::Bottom,
            (Vertical::Bottom, Horizontal::Right) => Self::BottomRight,
        }
    }

    /// Canonical host code for this anchor.
    pub fn code(self) -> i64 {
        use codes::*;
        let vertical = match self.vertical() {
            Some(Vertical::Top) => TOP,
            Some(Vertical::Bottom) => BOTTOM,
            Some(Vertical::Center) => CENTER_VERTICAL,
            None => {
                return match self {
                    Self::Merged => MERGED,
                    _ => SUPPRESSED,
                }
            }
        };
        let horizontal = match self.horizontal() {
            Some(Horizontal::Left) => LEFT,
            Some(Horizontal::Right) => RIGHT,
            _ if vertical == CENTER_VERTICAL => CENTER_HORIZONTAL,
            _ => 0,
        };
        vertical | horizontal
    }

    /// Whether this anchor takes part in layout at all.
    pub fn is_positional(self) -> bool {
        !matches!(self, Self::Suppressed | Self::Merged)
    }

    pub fn vertical(self) -> Option<Vertical> {
        match self {
            Self::TopLeft | Self::Top | Self::TopRight => Some(Vertical::Top),
            Self::Left | Self::Center | Self::Right => Some(Vertical::Center),
            Self::BottomLeft | Self::Bottom | Self::BottomRight => Some(Vertical::Bottom),
            Self::Suppressed | Self::Merged => None,
        }
    }

    pub fn horizontal(self) -> Option<Horizontal> {
        match self {
            Self::TopLeft | Self::Left | Self::BottomLeft => Some(Horizontal::Left),
            Self::Top | Self::Center | Self::Bottom => Some(Horizontal::Center),
            Self::TopRight | Self::Right | Self::BottomRight => Some(Horizontal::Right),
            Self::Suppressed | Self::Merged => None,
        }
    }

    pub fn on_top(self) -> bool {
        self.vertical() == Some(Vertical::Top)
    }

    pub fn on_left(self) -> bool {
        self.horizontal() == Some(Horizontal::Left)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Which side the host's navigation bar sits on when the screen is rotated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Handedness {
    #[default]
    Right,
    Left,
}

impl Handedness {
    pub fn from_left_handed(left_handed: bool) -> Self {
        if left_handed {
            Self::Left
        } else {
            Self::Right
        }
    }

    /// Corner that collides with the system bar on the given edge.
    pub fn reference_corner(self, vertical: Vertical) -> AnchorGravity {
        let horizontal = match self {
            Self::Left => Horizontal::Left,
            Self::Right => Horizontal::Right,
        };
        let vertical = match vertical {
            Vertical::Top => Vertical::Top,
            _ => Vertical::Bottom,
        };
        AnchorGravity::from_parts(vertical, horizontal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_corner_codes() {
        assert_eq!(AnchorGravity::from_code(51), Some(AnchorGravity::TopLeft));
        assert_eq!(AnchorGravity::from_code(53), Some(AnchorGravity::TopRight));
        assert_eq!(AnchorGravity::from_code(83), Some(AnchorGravity::BottomLeft));
        assert_eq!(
            AnchorGravity::from_code(85),
            Some(AnchorGravity::BottomRight)
        );
        assert_eq!(AnchorGravity::from_code(48), Some(AnchorGravity::Top));
        assert_eq!(AnchorGravity::from_code(80), Some(AnchorGravity::Bottom));
        assert_eq!(AnchorGravity::from_code(17), Some(AnchorGravity::Center));
    }

    #[test]
    fn decodes_special_codes() {
        assert_eq!(AnchorGravity::from_code(0), Some(AnchorGravity::Suppressed));
        assert_eq!(AnchorGravity::from_code(1), Some(AnchorGravity::Merged));
    }

    #[test]
    fn rejects_unknown_bits() {
        assert_eq!(AnchorGravity::from_code(0x800), None);
        assert_eq!(AnchorGravity::from_code(0x07), None);
        assert_eq!(AnchorGravity::from_code(-3), None);
    }

    #[test]
    fn positional_codes_round_trip() {
        for anchor in AnchorGravity::POSITIONS {
            assert_eq!(AnchorGravity::from_code(anchor.code()), Some(anchor));
        }
    }

    #[test]
    fn reference_corner_follows_handedness() {
        assert_eq!(
            Handedness::Right.reference_corner(Vertical::Top),
            AnchorGravity::TopRight
        );
        assert_eq!(
            Handedness::Left.reference_corner(Vertical::Bottom),
            AnchorGravity::BottomLeft
        );
    }
}
