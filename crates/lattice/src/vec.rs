//! Integer vector helpers on top of `glam`.
//!
//! Grid positions and moves are [`glam::IVec2`]; continuous directions are
//! [`glam::Vec2`]. Both are `Copy` with structural equality and hashing, so
//! every operation here returns a new value and never mutates an operand.
//! This module adds the handful of operations glam does not carry:
//! Chebyshev magnitude, per-axis clamping, componentwise floor division,
//! polar angle, and the two random direction constructors.

use glam::{IVec2, Vec2};
use rand::Rng;

/// Grid-vector operations not provided by `glam` itself.
pub trait GridVecExt {
    /// Chebyshev (infinity-norm) magnitude: `max(|x|, |y|)`.
    fn chebyshev(self) -> i32;

    /// Euclidean magnitude as `f32`.
    fn length_f32(self) -> f32;

    /// Polar angle in radians: `atan2(y, x)`.
    fn angle(self) -> f32;

    /// Clamps each component into `[-r, r]`.
    fn clamp_radius(self, r: i32) -> IVec2;

    /// Componentwise floor division (rounds toward negative infinity).
    fn floor_div(self, d: i32) -> IVec2;

    /// True for the zero vector.
    fn is_zero(self) -> bool;
}

impl GridVecExt for IVec2 {
    fn chebyshev(self) -> i32 {
        self.abs().max_element()
    }

    fn length_f32(self) -> f32 {
        self.as_vec2().length()
    }

    fn angle(self) -> f32 {
        let v = self.as_vec2();
        v.y.atan2(v.x)
    }

    fn clamp_radius(self, r: i32) -> IVec2 {
        self.clamp(IVec2::splat(-r), IVec2::splat(r))
    }

    fn floor_div(self, d: i32) -> IVec2 {
        IVec2::new(self.x.div_euclid(d), self.y.div_euclid(d))
    }

    fn is_zero(self) -> bool {
        self == IVec2::ZERO
    }
}

/// One of the 8 grid-adjacent directions or "stay": each axis is sampled
/// independently and uniformly from {-1, 0, 1}.
pub fn random_grid_dir<R: Rng + ?Sized>(rng: &mut R) -> IVec2 {
    IVec2::new(rng.gen_range(-1..=1), rng.gen_range(-1..=1))
}

/// A continuous unit-length direction with uniformly random angle.
pub fn random_unit_dir<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    let angle = rng.gen::<f32>() * std::f32::consts::TAU;
    Vec2::new(angle.cos(), angle.sin())
}
