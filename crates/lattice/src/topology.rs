//! World bounds and (optional) toroidal wraparound.
//!
//! A [`Topology`] is the pure geometry of a world: its dimensions, whether
//! the edges wrap, containment, wrapping, and the minimum-image shortest
//! displacement between two positions. It holds no occupancy state.

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Dimensions and edge behavior of a bounded 2D lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    /// World width in cells.
    pub width: i32,
    /// World height in cells.
    pub height: i32,
    /// When true, the edges wrap and the world is topologically a torus.
    pub torus: bool,
}

impl Topology {
    /// Creates a topology with the given dimensions.
    #[must_use]
    pub const fn new(width: i32, height: i32, torus: bool) -> Self {
        Self {
            width,
            height,
            torus,
        }
    }

    /// True when `pos` lies inside `[0, width) x [0, height)`.
    ///
    /// The bound is half-open and inclusive of zero on both axes.
    #[must_use]
    pub fn contains(&self, pos: IVec2) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    /// Wraps each coordinate modulo its dimension.
    #[must_use]
    pub fn wrap(&self, pos: IVec2) -> IVec2 {
        IVec2::new(pos.x.rem_euclid(self.width), pos.y.rem_euclid(self.height))
    }

    /// Shortest displacement from `a` to `b`.
    ///
    /// Without wraparound this is plain subtraction. On a torus each axis
    /// independently follows the minimum-image convention: the raw
    /// difference is replaced by the wrapped one exactly when its magnitude
    /// strictly exceeds half the dimension, so a tie at exactly half favors
    /// the non-wrapped path. Integer arithmetic throughout, no rounding.
    #[must_use]
    pub fn shortest_way(&self, a: IVec2, b: IVec2) -> IVec2 {
        let mut d = b - a;
        if self.torus {
            if 2 * d.x.abs() > self.width {
                d.x += if d.x > 0 { -self.width } else { self.width };
            }
            if 2 * d.y.abs() > self.height {
                d.y += if d.y > 0 { -self.height } else { self.height };
            }
        }
        d
    }

    /// A uniformly random in-bounds position.
    pub fn random_pos<R: Rng + ?Sized>(&self, rng: &mut R) -> IVec2 {
        IVec2::new(
            rng.gen_range(0..self.width),
            rng.gen_range(0..self.height),
        )
    }
}
