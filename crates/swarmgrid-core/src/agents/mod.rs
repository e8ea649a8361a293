//! Ready-made agent behaviors.
//!
//! These cover common building blocks of grid scenarios (inert scenery,
//! random walkers, a crowd-averse repulser) and double as
//! working examples of the [`Agent`](crate::agent::Agent) API. Scenario
//! code composes them with its own behaviors; nothing in the engine
//! depends on them.

mod repulser;
mod wall;
mod wanderer;

pub use repulser::Repulser;
pub use wall::Wall;
pub use wanderer::Wanderer;
