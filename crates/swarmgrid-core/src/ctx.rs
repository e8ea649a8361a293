//! Per-hook agent context.
//!
//! An [`AgentCtx`] is handed to every lifecycle hook: the agent's id plus a
//! mutable handle on the world it is registered with. It is the only way a
//! behavior touches the world, which keeps all agent-to-agent interaction
//! on the world's move/scan/emit surface. The geometry helpers mirror the
//! world API but are anchored at the agent's own position.
//!
//! Helpers on an unplaced agent degrade instead of failing: moves return
//! false, scans come back empty, and broadcast emission is a no-op.

use glam::{IVec2, Vec2};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use lattice::{random_grid_dir, GridVecExt};

use crate::agent::{AgentId, GroupId, GroupSet};
use crate::color::Color;
use crate::event::{EventKind, Payload};
use crate::world::{ScanOrder, World};

/// Capability handle scoped to one agent for the duration of one hook.
pub struct AgentCtx<'w> {
    world: &'w mut World,
    id: AgentId,
}

impl<'w> AgentCtx<'w> {
    pub(crate) fn new(world: &'w mut World, id: AgentId) -> Self {
        Self { world, id }
    }

    /// This agent's id.
    #[must_use]
    pub fn id(&self) -> AgentId {
        self.id
    }

    /// Read access to the world.
    #[must_use]
    pub fn world(&self) -> &World {
        self.world
    }

    /// Mutable access to the world, for operations the helpers below do
    /// not cover (adding or removing other agents, world-level emission).
    pub fn world_mut(&mut self) -> &mut World {
        self.world
    }

    /// The world-owned deterministic RNG.
    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        self.world.rng_mut()
    }

    /// Current tick count.
    #[must_use]
    pub fn time(&self) -> u64 {
        self.world.time()
    }

    // -------------------------------------------------------------------------
    // Geometry
    // -------------------------------------------------------------------------

    /// This agent's position, if placed.
    #[must_use]
    pub fn pos(&self) -> Option<IVec2> {
        self.world.position(self.id)
    }

    /// Shortest displacement from this agent to `pos`.
    #[must_use]
    pub fn vec_to(&self, pos: IVec2) -> Option<IVec2> {
        self.pos().map(|own| self.world.shortest_way(own, pos))
    }

    /// Euclidean distance to `pos` along the shortest way.
    #[must_use]
    pub fn dist(&self, pos: IVec2) -> Option<f32> {
        self.vec_to(pos).map(GridVecExt::length_f32)
    }

    /// Chebyshev distance to `pos` along the shortest way.
    #[must_use]
    pub fn inf_dist(&self, pos: IVec2) -> Option<i32> {
        self.vec_to(pos).map(GridVecExt::chebyshev)
    }

    // -------------------------------------------------------------------------
    // Movement
    // -------------------------------------------------------------------------

    /// Moves to an absolute position. See [`World::move_agent`].
    pub fn move_to(&mut self, pos: IVec2) -> bool {
        self.world.move_agent(self.id, pos)
    }

    /// Moves by a relative offset.
    pub fn move_rel(&mut self, delta: IVec2) -> bool {
        self.world.move_agent_relative(self.id, delta)
    }

    /// Takes one best-effort 8-neighborhood step along a continuous
    /// direction.
    ///
    /// With `minor` and `major` the direction's axis magnitudes, the full
    /// diagonal step is taken with probability `minor / major`; otherwise
    /// only the dominant axis moves. Over many calls the average heading
    /// approaches the true direction even though each step is one of the 8
    /// grid neighbors. The zero direction degenerates to a stay-in-place
    /// move; callers that need guaranteed motion must special-case it.
    pub fn move_in_dir(&mut self, dir: Vec2) -> bool {
        if dir == Vec2::ZERO {
            return self.move_rel(IVec2::ZERO);
        }
        let (x_abs, y_abs) = (dir.x.abs(), dir.y.abs());
        let x_is_major = x_abs > y_abs;
        let (minor, major) = if x_is_major {
            (y_abs, x_abs)
        } else {
            (x_abs, y_abs)
        };
        let diagonal_p = if major > 0.0 { minor / major } else { 0.0 };
        let diagonal = self.rng().gen::<f32>() < diagonal_p;

        let mut step = IVec2::new(
            if dir.x < 0.0 { -1 } else { 1 },
            if dir.y < 0.0 { -1 } else { 1 },
        );
        if !diagonal {
            if x_is_major {
                step.y = 0;
            } else {
                step.x = 0;
            }
        }
        self.move_rel(step)
    }

    /// Steps toward `pos` along the shortest way.
    pub fn move_towards(&mut self, pos: IVec2) -> bool {
        match self.vec_to(pos) {
            Some(dir) => self.move_in_dir(dir.as_vec2()),
            None => false,
        }
    }

    /// Steps away from `pos`. When standing exactly on `pos` (no repulsion
    /// direction), falls back to a uniformly random grid direction.
    pub fn move_away_from(&mut self, pos: IVec2) -> bool {
        let Some(own) = self.pos() else {
            return false;
        };
        let dir = self.world.shortest_way(pos, own);
        if dir.is_zero() {
            let fallback = random_grid_dir(self.rng());
            self.move_in_dir(fallback.as_vec2())
        } else {
            self.move_in_dir(dir.as_vec2())
        }
    }

    // -------------------------------------------------------------------------
    // Scans & events
    // -------------------------------------------------------------------------

    /// All other agents within Chebyshev distance `radius` of this agent.
    ///
    /// Like [`World::box_scan`] centered on the agent, minus the agent
    /// itself (matched by id, so cell-sharing neighbors are kept).
    #[must_use]
    pub fn box_scan(
        &self,
        radius: i32,
        order: ScanOrder,
        group: Option<GroupId>,
    ) -> Vec<AgentId> {
        let Some(own) = self.pos() else {
            return Vec::new();
        };
        let mut found = self.world.box_scan(own, radius, order, group);
        found.retain(|id| *id != self.id);
        found
    }

    /// Broadcasts to every other agent within `radius`, tagged with this
    /// agent's current position as [`EventKind::Origin`].
    ///
    /// Recipients are gathered with an unordered scan (broadcast order is
    /// irrelevant); delivery happens in this tick's post-step phase.
    pub fn emit_event(&mut self, radius: i32, payload: Payload, group: Option<GroupId>) {
        let Some(own) = self.pos() else {
            return;
        };
        let recipients = self.box_scan(radius, ScanOrder::Unordered, group);
        self.world
            .emit_event(recipients, EventKind::Origin(own), payload);
    }

    // -------------------------------------------------------------------------
    // Self-management
    // -------------------------------------------------------------------------

    /// Makes this agent eligible for `step` calls again.
    pub fn activate(&mut self) {
        self.world.activate(self.id);
    }

    /// Excludes this agent from `step` calls; position and registration
    /// are kept.
    pub fn deactivate(&mut self) {
        self.world.deactivate(self.id);
    }

    /// Removes this agent from the world. `cleanup` fires as the current
    /// hook's loan of the behavior ends.
    pub fn remove_self(&mut self) {
        self.world.remove_agent(self.id);
    }

    /// Sets this agent's render color.
    pub fn set_color(&mut self, color: Color) {
        self.world.set_color(self.id, color);
    }

    /// This agent's current render color.
    #[must_use]
    pub fn color(&self) -> Option<Color> {
        self.world.color(self.id)
    }

    /// Mutable access to this agent's declared group tags.
    pub fn groups_mut(&mut self) -> Option<&mut GroupSet> {
        self.world.groups_mut(self.id)
    }

    /// Mutable access to this agent's collision tags.
    pub fn collision_groups_mut(&mut self) -> Option<&mut GroupSet> {
        self.world.collision_groups_mut(self.id)
    }
}
