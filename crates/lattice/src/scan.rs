//! Neighborhood cell enumeration.
//!
//! These functions enumerate the cells of a Chebyshev ball (a square of
//! side `2*radius + 1`) around a center, honoring the topology's bounds:
//! clipped when the world does not wrap, wrapped when it does. They return
//! coordinates only; gathering occupants is the caller's job.
//!
//! Two orderings are offered:
//!
//! - [`box_cells`]: complete but unordered (row-major). Use when ordering
//!   is irrelevant, e.g. broadcast recipient gathering.
//! - [`spiral_cells`]: deterministic nearest-first ring order. The center
//!   comes first, then each ring at distances `1..=radius` in a fixed edge
//!   traversal (top edge left-to-right, bottom edge left-to-right, then the
//!   left and right columns excluding the corners already emitted).
//!   Downstream code may rely on "nearest first", not on the edge order.

use glam::IVec2;

use crate::topology::Topology;

/// Cells within Chebyshev distance `radius` of `center`, unordered.
///
/// Non-toroidal topologies clip to bounds. Toroidal topologies wrap; when
/// `2*radius + 1` meets or exceeds a dimension the scan covers that whole
/// axis exactly once, so the result is always complete and duplicate-free.
#[must_use]
pub fn box_cells(topo: &Topology, center: IVec2, radius: i32) -> Vec<IVec2> {
    assert!(radius >= 0, "scan radius must be non-negative");
    if topo.torus {
        let xs = wrapped_axis(center.x, radius, topo.width);
        let ys = wrapped_axis(center.y, radius, topo.height);
        let mut cells = Vec::with_capacity(xs.len() * ys.len());
        for &y in &ys {
            for &x in &xs {
                cells.push(IVec2::new(x, y));
            }
        }
        cells
    } else {
        let xlo = (center.x - radius).max(0);
        let xhi = (center.x + radius).min(topo.width - 1);
        let ylo = (center.y - radius).max(0);
        let yhi = (center.y + radius).min(topo.height - 1);
        let mut cells = Vec::new();
        for y in ylo..=yhi {
            for x in xlo..=xhi {
                cells.push(IVec2::new(x, y));
            }
        }
        cells
    }
}

/// The distinct wrapped coordinates covered by `[c - r, c + r]` on an axis
/// of length `dim`. Degrades to the full axis when the span covers it.
fn wrapped_axis(c: i32, r: i32, dim: i32) -> Vec<i32> {
    if 2 * r + 1 >= dim {
        (0..dim).collect()
    } else {
        (c - r..=c + r).map(|v| v.rem_euclid(dim)).collect()
    }
}

/// Cells within Chebyshev distance `radius` of `center`, nearest ring
/// first: the center, then each ring `d = 1..=radius` in a fixed traversal.
///
/// Non-toroidal topologies skip out-of-bounds ring cells, so the emitted
/// set always equals [`box_cells`]' set. Each cell appears exactly once.
///
/// # Panics
///
/// On a toroidal topology, panics unless `2*radius + 1 <= min(width,
/// height)`: a larger ring would overlap itself after wrapping and the
/// ordering contract could not be met.
#[must_use]
pub fn spiral_cells(topo: &Topology, center: IVec2, radius: i32) -> Vec<IVec2> {
    assert!(radius >= 0, "scan radius must be non-negative");
    if topo.torus {
        let size = 2 * radius + 1;
        assert!(
            size <= topo.width && size <= topo.height,
            "sorted toroidal scan radius {radius} exceeds world {}x{}",
            topo.width,
            topo.height,
        );
    }

    let mut cells = Vec::new();
    let mut emit = |cell: IVec2| {
        if topo.torus {
            cells.push(topo.wrap(cell));
        } else if topo.contains(cell) {
            cells.push(cell);
        }
    };

    emit(center);
    for d in 1..=radius {
        let (xlo, xhi) = (center.x - d, center.x + d);
        let (ylo, yhi) = (center.y - d, center.y + d);
        for x in xlo..=xhi {
            emit(IVec2::new(x, ylo));
        }
        for x in xlo..=xhi {
            emit(IVec2::new(x, yhi));
        }
        for y in ylo + 1..yhi {
            emit(IVec2::new(xlo, y));
        }
        for y in ylo + 1..yhi {
            emit(IVec2::new(xhi, y));
        }
    }
    cells
}
