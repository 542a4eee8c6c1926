//! Screen-relative corner roles.
//!
//! Each of the four projected corners is labelled bottom/top and left/right by
//! comparing it with the set's own rank thresholds: the second-smallest x and
//! the second-smallest y. Coordinates equal to a threshold count as
//! bottom/left. Labels therefore follow the camera's roll instead of the fixed
//! corner enumeration order.
//!
//! Labels are taken literally on whatever coordinates are passed in: "bottom"
//! means smaller y. The rectifier classifies in its bottom-left-origin frame,
//! where smaller y is visually lower.
use crate::types::Pixel;
use serde::{Deserialize, Serialize};
use std::ops::Index;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CornerRole {
    BottomLeft,
    BottomRight,
    TopLeft,
    TopRight,
}

impl CornerRole {
    pub const ALL: [CornerRole; 4] = [
        CornerRole::BottomLeft,
        CornerRole::BottomRight,
        CornerRole::TopLeft,
        CornerRole::TopRight,
    ];

    pub fn from_sides(bottom: bool, left: bool) -> Self {
        match (bottom, left) {
            (true, true) => CornerRole::BottomLeft,
            (true, false) => CornerRole::BottomRight,
            (false, true) => CornerRole::TopLeft,
            (false, false) => CornerRole::TopRight,
        }
    }

    pub fn is_bottom(self) -> bool {
        matches!(self, CornerRole::BottomLeft | CornerRole::BottomRight)
    }

    pub fn is_left(self) -> bool {
        matches!(self, CornerRole::BottomLeft | CornerRole::TopLeft)
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

fn rank_threshold(mut values: [f64; 4]) -> f64 {
    values.sort_by(f64::total_cmp);
    values[1]
}

/// Label each corner; output slot `i` is the role of `corners[i]`.
pub fn classify(corners: &[Pixel; 4]) -> [CornerRole; 4] {
    let x_split = rank_threshold(corners.map(|c| c[0]));
    let y_split = rank_threshold(corners.map(|c| c[1]));
    corners.map(|c| CornerRole::from_sides(c[1] <= y_split, c[0] <= x_split))
}

/// Four points keyed by role.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CornerQuad {
    pub bottom_left: Pixel,
    pub bottom_right: Pixel,
    pub top_left: Pixel,
    pub top_right: Pixel,
}

impl CornerQuad {
    /// Assemble from labelled corners. Fails unless every role occurs exactly once.
    pub fn from_roles(corners: &[Pixel; 4], roles: &[CornerRole; 4]) -> Option<Self> {
        let mut slots: [Option<Pixel>; 4] = [None; 4];
        for (&p, &role) in corners.iter().zip(roles) {
            let slot = &mut slots[role.index()];
            if slot.is_some() {
                return None;
            }
            *slot = Some(p);
        }
        let [bl, br, tl, tr] = slots;
        Some(Self {
            bottom_left: bl?,
            bottom_right: br?,
            top_left: tl?,
            top_right: tr?,
        })
    }

    /// Points in `CornerRole::ALL` order.
    pub fn points(&self) -> [Pixel; 4] {
        CornerRole::ALL.map(|r| self[r])
    }

    /// Absolute area of the polygon bl → br → tr → tl (shoelace).
    pub fn area(&self) -> f64 {
        let ring = [self.bottom_left, self.bottom_right, self.top_right, self.top_left];
        let mut twice = 0.0;
        for i in 0..4 {
            let (a, b) = (ring[i], ring[(i + 1) % 4]);
            twice += a[0] * b[1] - b[0] * a[1];
        }
        0.5 * twice.abs()
    }
}

impl Index<CornerRole> for CornerQuad {
    type Output = Pixel;

    fn index(&self, role: CornerRole) -> &Pixel {
        match role {
            CornerRole::BottomLeft => &self.bottom_left,
            CornerRole::BottomRight => &self.bottom_right,
            CornerRole::TopLeft => &self.top_left,
            CornerRole::TopRight => &self.top_right,
        }
    }
}
