//! Uniform random walker.

use lattice::random_grid_dir;

use crate::agent::{Agent, AgentSpec};
use crate::color::Color;
use crate::ctx::AgentCtx;

/// An agent that takes one uniformly random grid step (or stays) each
/// tick. Group and collision tags come from its spec, so a `Wanderer` can
/// be made to respect walls or to pass through everything.
#[derive(Debug, Clone)]
pub struct Wanderer {
    spec: AgentSpec,
}

impl Wanderer {
    /// A blue wanderer with no group or collision tags.
    #[must_use]
    pub fn new() -> Self {
        Self {
            spec: AgentSpec::new().with_color(Color::BLUE),
        }
    }

    /// Replaces the spec wholesale.
    #[must_use]
    pub fn with_spec(mut self, spec: AgentSpec) -> Self {
        self.spec = spec;
        self
    }
}

impl Default for Wanderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for Wanderer {
    fn spec(&self) -> AgentSpec {
        self.spec.clone()
    }

    fn step(&mut self, ctx: &mut AgentCtx<'_>) {
        let dir = random_grid_dir(ctx.rng());
        // Blocked or out-of-bounds moves are routine for a random walk.
        let _ = ctx.move_rel(dir);
    }
}
