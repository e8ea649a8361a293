//! # Lattice
//!
//! Bounded 2D grid substrate for discrete multi-agent simulations.
//!
//! Lattice owns the purely spatial half of the engine: integer vector
//! helpers, the bounded (optionally toroidal) topology, per-cell occupancy
//! storage, and deterministic neighborhood enumeration. It knows nothing
//! about agents, ticks, or events; those live in `swarmgrid-core`, which
//! instantiates [`Grid`] with its own id type.
//!
//! ## Quick Start
//!
//! ```
//! use glam::IVec2;
//! use lattice::{Grid, Topology, scan};
//!
//! let topo = Topology::new(100, 100, true);
//! let mut grid: Grid<u64> = Grid::new(100, 100);
//!
//! grid.insert(IVec2::new(50, 50), 7);
//! assert_eq!(grid.at(IVec2::new(50, 50)), &[7]);
//!
//! // All cells within Chebyshev distance 2, nearest ring first.
//! let cells = scan::spiral_cells(&topo, IVec2::new(50, 50), 2);
//! assert_eq!(cells.len(), 25);
//! assert_eq!(cells[0], IVec2::new(50, 50));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod grid;
pub mod scan;
pub mod topology;
pub mod vec;

// Re-exports for convenience
pub use grid::Grid;
pub use topology::Topology;
pub use vec::{random_grid_dir, random_unit_dir, GridVecExt};
