//! # Swarmgrid Core
//!
//! Discrete-time, grid-based multi-agent simulation engine.
//!
//! A [`World`] is a bounded (optionally toroidal) 2D lattice populated by
//! autonomous agents that move, collide, and exchange deferred events each
//! tick. Behaviors implement the [`Agent`] trait's lifecycle hooks and act
//! through the [`AgentCtx`] handed to each hook; the world is the sole
//! mutation surface, so its invariants (grid/position consistency, id
//! uniqueness, active ⊆ registered) hold at every API boundary.
//!
//! Spatial storage and neighborhood enumeration live in the [`lattice`]
//! crate; this crate adds the agent registry, the movement/collision
//! protocol, the deferred event queue, and the tick state machine.
//!
//! ## Usage
//!
//! ```
//! use swarmgrid_core::{
//!     agents::{Wall, Wanderer},
//!     AgentSpec, GroupId, Placement, World, WorldConfig,
//! };
//! use glam::IVec2;
//!
//! let mut world = World::new(WorldConfig::with_size(50, 50).with_seed(42)).unwrap();
//!
//! let wall_group = GroupId::new(0);
//! world.add_agent(
//!     Box::new(Wall::new(wall_group)),
//!     Placement::At(IVec2::new(25, 25)),
//! ).unwrap();
//! let spec = AgentSpec::new().with_collision_group(wall_group);
//! world.add_agent(
//!     Box::new(Wanderer::new().with_spec(spec)),
//!     Placement::Random,
//! ).unwrap();
//!
//! for _ in 0..100 {
//!     world.step();
//! }
//! assert_eq!(world.time(), 100);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export the spatial substrate
pub use lattice;

pub mod agent;
pub mod agents;
pub mod color;
pub mod config;
pub mod ctx;
pub mod event;
pub mod world;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use agent::{Agent, AgentId, AgentSpec, GroupId, GroupSet};
pub use color::Color;
pub use config::WorldConfig;
pub use ctx::AgentCtx;
pub use event::{EventKind, Payload};
pub use world::{Placement, ScanOrder, World, WorldError};
