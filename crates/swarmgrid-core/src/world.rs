//! The world: agent registry, spatial index, movement, scans, and the tick
//! state machine.
//!
//! # Tick contract
//!
//! One [`World::step`] is two phases followed by bookkeeping:
//!
//! 1. **Act**: the active id set is snapshotted, then each id still active
//!    when its turn comes gets its `step` hook. Agents may move, scan,
//!    emit, add, remove, activate, or deactivate mid-iteration; the
//!    snapshot-then-recheck discipline keeps that well-defined.
//! 2. **Deliver**: the event queue accumulated during the act phase is
//!    swapped out and delivered to each still-registered recipient. Events
//!    emitted by a `receive_event` handler go to the *next* tick's queue.
//!
//! Then `time` advances, and reaching `max_steps` ends the world.
//!
//! # Invariants
//!
//! - An agent with a recorded position appears in exactly that cell's
//!   bag, exactly once, and in no other cell.
//! - Agent ids are never reused within a world's lifetime.
//! - Every active id is a registered id.
//!
//! All three are maintained at every public API boundary; they are checked
//! wholesale by the test helpers.
//!
//! # Hook dispatch
//!
//! Behaviors are stored as `Box<dyn Agent>` in registry slots. For the
//! duration of a hook call the box is taken out of its slot (a loan), so
//! the hook can receive `&mut World` through its [`AgentCtx`] without
//! aliasing the behavior it is running on. A hook observing its own agent
//! through the world sees the registry entry (groups, color, position) as
//! usual; only the behavior box is absent. If the agent was removed while
//! its box was on loan, `cleanup` fires as the loan ends.

use std::collections::{BTreeMap, BTreeSet};

use glam::IVec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::{debug, trace};

use lattice::{scan, Grid, Topology};

use crate::agent::{Agent, AgentId, GroupId, GroupSet};
use crate::color::Color;
use crate::config::WorldConfig;
use crate::ctx::AgentCtx;
use crate::event::{EventKind, Payload, QueuedEvent};

// =============================================================================
// Supporting types
// =============================================================================

/// Error constructing a world.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorldError {
    /// Width or height was not positive.
    #[error("world dimensions must be positive, got {width}x{height}")]
    InvalidDimensions {
        /// Requested width.
        width: i32,
        /// Requested height.
        height: i32,
    },
    /// Placement position outside a world that does not wrap.
    #[error("placement position out of bounds: {pos}")]
    OutOfBounds {
        /// The rejected position.
        pos: IVec2,
    },
}

/// Where `add_agent` places a new agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// At this position. Wrapped first on a torus; out of bounds
    /// otherwise is a rejected add.
    At(IVec2),
    /// At a uniformly random in-bounds position.
    Random,
    /// Registered but not placed; the agent has no position until moved in
    /// by other means. Useful for bookkeeping agents.
    Unplaced,
}

/// Ordering of a [`World::box_scan`] result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOrder {
    /// Deterministic nearest-first spiral; on a torus the radius must
    /// satisfy `2r + 1 <= min(width, height)`.
    Nearest,
    /// Complete but unspecified order; cheaper, and the right choice when
    /// ordering is irrelevant (e.g. broadcast recipient gathering).
    Unordered,
}

/// Registry entry for one agent.
struct AgentEntry {
    /// The behavior box; `None` while on loan to a running hook.
    behavior: Option<Box<dyn Agent>>,
    group_ids: GroupSet,
    group_collision_ids: GroupSet,
    color: Color,
    pos: Option<IVec2>,
}

// =============================================================================
// World
// =============================================================================

/// A bounded (optionally toroidal) 2D lattice of autonomous agents.
pub struct World {
    topo: Topology,
    grid: Grid<AgentId>,
    entries: BTreeMap<AgentId, AgentEntry>,
    active: BTreeSet<AgentId>,
    queue: Vec<QueuedEvent>,
    time: u64,
    ended: bool,
    max_steps: Option<u64>,
    next_id: u64,
    rng: ChaCha8Rng,
    seed: u64,
}

impl World {
    /// Creates an empty world from `config`.
    ///
    /// # Errors
    ///
    /// [`WorldError::InvalidDimensions`] when either dimension is not
    /// positive.
    pub fn new(config: WorldConfig) -> Result<Self, WorldError> {
        if config.width <= 0 || config.height <= 0 {
            return Err(WorldError::InvalidDimensions {
                width: config.width,
                height: config.height,
            });
        }
        Ok(Self {
            topo: Topology::new(config.width, config.height, config.torus),
            grid: Grid::new(config.width, config.height),
            entries: BTreeMap::new(),
            active: BTreeSet::new(),
            queue: Vec::new(),
            time: 0,
            ended: false,
            max_steps: config.max_steps,
            next_id: 0,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            seed: config.seed,
        })
    }

    // -------------------------------------------------------------------------
    // Agent lifecycle
    // -------------------------------------------------------------------------

    /// Registers a behavior, places it per `placement`, marks it active,
    /// and runs its `initialize` hook. Returns the assigned id.
    ///
    /// # Errors
    ///
    /// [`WorldError::OutOfBounds`] when `Placement::At` names an
    /// out-of-bounds position on a non-toroidal world (on a torus the
    /// position wraps). Nothing is registered and no id is consumed.
    pub fn add_agent(
        &mut self,
        behavior: Box<dyn Agent>,
        placement: Placement,
    ) -> Result<AgentId, WorldError> {
        let spec = behavior.spec();
        let pos = match placement {
            Placement::At(p) => {
                let p = if self.topo.torus { self.topo.wrap(p) } else { p };
                if !self.topo.contains(p) {
                    return Err(WorldError::OutOfBounds { pos: p });
                }
                Some(p)
            }
            Placement::Random => Some(self.topo.random_pos(&mut self.rng)),
            Placement::Unplaced => None,
        };

        let id = AgentId::new(self.next_id);
        self.next_id += 1;
        if let Some(p) = pos {
            self.grid.insert(p, id);
        }

        self.entries.insert(
            id,
            AgentEntry {
                behavior: Some(behavior),
                group_ids: spec.group_ids,
                group_collision_ids: spec.group_collision_ids,
                color: spec.color,
                pos,
            },
        );
        self.active.insert(id);
        debug!(%id, ?pos, "agent added");

        self.run_hook(id, |agent, ctx| agent.initialize(ctx));
        Ok(id)
    }

    /// Removes an agent: runs its `cleanup` hook, clears its position and
    /// grid entry, and evicts it from the registry and active set.
    ///
    /// Returns false for an unknown id (stale removals are not errors).
    pub fn remove_agent(&mut self, id: AgentId) -> bool {
        if !self.entries.contains_key(&id) {
            return false;
        }
        // Hook runs while the agent is still registered and placed. If the
        // agent's behavior is currently on loan (it is removing itself from
        // inside a hook), cleanup fires when that loan ends instead.
        self.run_cleanup_hook(id);
        let Some(mut entry) = self.entries.remove(&id) else {
            return true;
        };
        self.active.remove(&id);
        if let Some(pos) = entry.pos.take() {
            self.grid.remove(pos, id);
        }
        debug!(%id, "agent removed");
        true
    }

    /// Marks an agent eligible for `step` calls. False for unknown ids.
    pub fn activate(&mut self, id: AgentId) -> bool {
        if self.entries.contains_key(&id) {
            self.active.insert(id);
            true
        } else {
            false
        }
    }

    /// Excludes an agent from `step` calls without removing it.
    pub fn deactivate(&mut self, id: AgentId) {
        self.active.remove(&id);
    }

    // -------------------------------------------------------------------------
    // Movement & collision
    // -------------------------------------------------------------------------

    /// Moves an agent to `to`, returning whether the move happened.
    ///
    /// Fails (false, no state change) when:
    /// - the id is unknown, or the agent is unplaced;
    /// - `to` is out of bounds and the world does not wrap;
    /// - any occupant of the destination cell carries a group tag in the
    ///   mover's collision set (with an empty collision set no occupant can
    ///   block the move).
    pub fn move_agent(&mut self, id: AgentId, to: IVec2) -> bool {
        let Some(entry) = self.entries.get(&id) else {
            return false;
        };
        let Some(from) = entry.pos else {
            return false;
        };
        let to = if self.topo.contains(to) {
            to
        } else if self.topo.torus {
            self.topo.wrap(to)
        } else {
            return false;
        };
        if self.would_collide(to, &entry.group_collision_ids) {
            return false;
        }

        self.grid.remove(from, id);
        self.grid.insert(to, id);
        if let Some(entry) = self.entries.get_mut(&id) {
            entry.pos = Some(to);
        }
        true
    }

    /// Moves an agent by `delta` relative to its current position.
    pub fn move_agent_relative(&mut self, id: AgentId, delta: IVec2) -> bool {
        match self.position(id) {
            Some(pos) => self.move_agent(id, pos + delta),
            None => false,
        }
    }

    /// True when any occupant of `pos` declares a group tag in `collision`.
    fn would_collide(&self, pos: IVec2, collision: &GroupSet) -> bool {
        if collision.is_empty() {
            return false;
        }
        self.grid.at(pos).iter().any(|occupant| {
            self.entries
                .get(occupant)
                .is_some_and(|e| !e.group_ids.is_disjoint(collision))
        })
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// The occupants of the cell at `pos`, in insertion order.
    ///
    /// On a torus the position wraps; out of bounds otherwise is an empty
    /// slice.
    #[must_use]
    pub fn at(&self, pos: IVec2) -> &[AgentId] {
        if self.topo.contains(pos) {
            self.grid.at(pos)
        } else if self.topo.torus {
            self.grid.at(self.topo.wrap(pos))
        } else {
            &[]
        }
    }

    /// An agent's current position, if it is registered and placed.
    #[must_use]
    pub fn position(&self, id: AgentId) -> Option<IVec2> {
        self.entries.get(&id).and_then(|e| e.pos)
    }

    /// All agents within Chebyshev distance `radius` of `center`.
    ///
    /// `ScanOrder::Nearest` yields cell contents in deterministic
    /// nearest-first spiral order; `ScanOrder::Unordered` is complete but
    /// unordered. With a `group` filter only agents declaring that tag are
    /// returned.
    ///
    /// # Panics
    ///
    /// `ScanOrder::Nearest` on a torus panics unless
    /// `2*radius + 1 <= min(width, height)`.
    #[must_use]
    pub fn box_scan(
        &self,
        center: IVec2,
        radius: i32,
        order: ScanOrder,
        group: Option<GroupId>,
    ) -> Vec<AgentId> {
        let cells = match order {
            ScanOrder::Nearest => scan::spiral_cells(&self.topo, center, radius),
            ScanOrder::Unordered => scan::box_cells(&self.topo, center, radius),
        };
        let mut found = Vec::new();
        for cell in cells {
            for &id in self.grid.at(cell) {
                let keep = match group {
                    Some(g) => self
                        .entries
                        .get(&id)
                        .is_some_and(|e| e.group_ids.contains(&g)),
                    None => true,
                };
                if keep {
                    found.push(id);
                }
            }
        }
        found
    }

    /// Shortest displacement from `a` to `b` (minimum-image on a torus).
    #[must_use]
    pub fn shortest_way(&self, a: IVec2, b: IVec2) -> IVec2 {
        self.topo.shortest_way(a, b)
    }

    // -------------------------------------------------------------------------
    // Events
    // -------------------------------------------------------------------------

    /// Queues an event for delivery in this tick's post-step phase.
    ///
    /// Performs no delivery itself. Recipients removed before the delivery
    /// phase are silently skipped.
    pub fn emit_event(&mut self, recipients: Vec<AgentId>, kind: EventKind, payload: Payload) {
        self.queue.push(QueuedEvent {
            recipients,
            kind,
            payload,
        });
    }

    // -------------------------------------------------------------------------
    // Tick state machine
    // -------------------------------------------------------------------------

    /// Advances the world one tick. A no-op once the world has ended.
    pub fn step(&mut self) {
        if self.ended {
            return;
        }

        // Act phase: snapshot, then re-check each id right before its hook
        // so agents deactivated or removed earlier this tick are skipped.
        let snapshot: Vec<AgentId> = self.active.iter().copied().collect();
        for id in snapshot {
            if self.active.contains(&id) {
                self.run_hook(id, |agent, ctx| agent.step(ctx));
            }
        }

        // Delivery phase: swap the queue out first so emissions from
        // receive_event handlers land in the next tick's queue.
        let events = std::mem::take(&mut self.queue);
        if !events.is_empty() {
            trace!(count = events.len(), time = self.time, "delivering events");
        }
        for event in events {
            for &recipient in &event.recipients {
                if self.entries.contains_key(&recipient) {
                    self.run_hook(recipient, |agent, ctx| {
                        agent.receive_event(ctx, event.kind, &event.payload);
                    });
                }
            }
        }

        self.time += 1;
        if let Some(max) = self.max_steps {
            if self.time >= max {
                self.end();
            }
        }
    }

    /// Ends the world: sets the terminal flag and removes every remaining
    /// agent (each gets its `cleanup` hook). Absorbing; safe to call twice.
    pub fn end(&mut self) {
        self.ended = true;
        let ids: Vec<AgentId> = self.entries.keys().copied().collect();
        for id in ids {
            self.remove_agent(id);
        }
        debug!(time = self.time, "world ended");
    }

    // -------------------------------------------------------------------------
    // Hook dispatch
    // -------------------------------------------------------------------------

    /// Runs a hook with the agent's behavior box on loan. Skips silently
    /// when the id is unknown or the box is already on loan. If the agent
    /// was removed during the hook, fires `cleanup` before dropping it.
    fn run_hook<F>(&mut self, id: AgentId, f: F)
    where
        F: FnOnce(&mut dyn Agent, &mut AgentCtx<'_>),
    {
        self.dispatch(id, f, true)
    }

    /// Like `run_hook` but for `cleanup` itself, which must not re-fire on
    /// the removed-during-hook path.
    fn run_cleanup_hook(&mut self, id: AgentId) {
        self.dispatch(id, |agent, ctx| agent.cleanup(ctx), false);
    }

    fn dispatch<F>(&mut self, id: AgentId, f: F, cleanup_on_removal: bool)
    where
        F: FnOnce(&mut dyn Agent, &mut AgentCtx<'_>),
    {
        let Some(entry) = self.entries.get_mut(&id) else {
            return;
        };
        let Some(mut behavior) = entry.behavior.take() else {
            return;
        };
        {
            let mut ctx = AgentCtx::new(self, id);
            f(behavior.as_mut(), &mut ctx);
        }
        if let Some(entry) = self.entries.get_mut(&id) {
            entry.behavior = Some(behavior);
        } else if cleanup_on_removal {
            let mut ctx = AgentCtx::new(self, id);
            behavior.cleanup(&mut ctx);
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Current tick count.
    #[must_use]
    pub fn time(&self) -> u64 {
        self.time
    }

    /// True once the world has reached its terminal state.
    #[must_use]
    pub fn ended(&self) -> bool {
        self.ended
    }

    /// World width in cells.
    #[must_use]
    pub fn width(&self) -> i32 {
        self.topo.width
    }

    /// World height in cells.
    #[must_use]
    pub fn height(&self) -> i32 {
        self.topo.height
    }

    /// True when the edges wrap.
    #[must_use]
    pub fn is_torus(&self) -> bool {
        self.topo.torus
    }

    /// The world's topology.
    #[must_use]
    pub fn topology(&self) -> Topology {
        self.topo
    }

    /// The RNG seed this world was built with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of registered agents.
    #[must_use]
    pub fn agent_count(&self) -> usize {
        self.entries.len()
    }

    /// True when the id is registered.
    #[must_use]
    pub fn contains(&self, id: AgentId) -> bool {
        self.entries.contains_key(&id)
    }

    /// True when the id will receive `step` calls.
    #[must_use]
    pub fn is_active(&self, id: AgentId) -> bool {
        self.active.contains(&id)
    }

    /// Registered agent ids in ascending order.
    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.entries.keys().copied()
    }

    /// An agent's current color, if registered.
    #[must_use]
    pub fn color(&self, id: AgentId) -> Option<Color> {
        self.entries.get(&id).map(|e| e.color)
    }

    /// Sets an agent's color. False for unknown ids.
    pub fn set_color(&mut self, id: AgentId, color: Color) -> bool {
        match self.entries.get_mut(&id) {
            Some(entry) => {
                entry.color = color;
                true
            }
            None => false,
        }
    }

    /// An agent's declared group tags.
    #[must_use]
    pub fn groups(&self, id: AgentId) -> Option<&GroupSet> {
        self.entries.get(&id).map(|e| &e.group_ids)
    }

    /// Mutable access to an agent's declared group tags.
    pub fn groups_mut(&mut self, id: AgentId) -> Option<&mut GroupSet> {
        self.entries.get_mut(&id).map(|e| &mut e.group_ids)
    }

    /// An agent's collision tags.
    #[must_use]
    pub fn collision_groups(&self, id: AgentId) -> Option<&GroupSet> {
        self.entries.get(&id).map(|e| &e.group_collision_ids)
    }

    /// Mutable access to an agent's collision tags.
    pub fn collision_groups_mut(&mut self, id: AgentId) -> Option<&mut GroupSet> {
        self.entries.get_mut(&id).map(|e| &mut e.group_collision_ids)
    }

    /// Read access to the occupancy grid, for rendering consumers: cell
    /// dimensions and per-cell occupant lists. Pair with [`World::color`]
    /// for each occupant's render hint.
    #[must_use]
    pub fn grid(&self) -> &Grid<AgentId> {
        &self.grid
    }

    /// The world-owned deterministic RNG.
    ///
    /// Behaviors draw from it (via [`AgentCtx::rng`]) so a run replays
    /// exactly under the same seed and agent schedule.
    pub fn rng_mut(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("topology", &self.topo)
            .field("agents", &self.entries.len())
            .field("active", &self.active.len())
            .field("pending_events", &self.queue.len())
            .field("time", &self.time)
            .field("ended", &self.ended)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentSpec;

    /// Inert behavior with configurable tags.
    struct Tagged {
        spec: AgentSpec,
    }

    impl Tagged {
        fn plain() -> Box<Self> {
            Box::new(Self {
                spec: AgentSpec::new(),
            })
        }

        fn grouped(group: u32) -> Box<Self> {
            Box::new(Self {
                spec: AgentSpec::new().with_group(GroupId::new(group)),
            })
        }

        fn colliding(collides_with: u32) -> Box<Self> {
            Box::new(Self {
                spec: AgentSpec::new().with_collision_group(GroupId::new(collides_with)),
            })
        }
    }

    impl Agent for Tagged {
        fn spec(&self) -> AgentSpec {
            self.spec.clone()
        }
    }

    fn world(width: i32, height: i32) -> World {
        World::new(WorldConfig::with_size(width, height)).unwrap()
    }

    fn torus_world(width: i32, height: i32) -> World {
        World::new(WorldConfig::with_size(width, height).toroidal()).unwrap()
    }

    mod construction_tests {
        use super::*;

        #[test]
        fn new_world_is_empty_and_running() {
            let w = world(10, 10);
            assert_eq!(w.time(), 0);
            assert!(!w.ended());
            assert_eq!(w.agent_count(), 0);
        }

        #[test]
        fn rejects_non_positive_dimensions() {
            let err = World::new(WorldConfig::with_size(0, 10)).unwrap_err();
            assert_eq!(
                err,
                WorldError::InvalidDimensions {
                    width: 0,
                    height: 10
                }
            );
            assert!(World::new(WorldConfig::with_size(5, -1)).is_err());
        }
    }

    mod registry_tests {
        use super::*;

        #[test]
        fn ids_are_monotonic_and_never_reused() {
            let mut w = world(10, 10);
            let a = w.add_agent(Tagged::plain(), Placement::At(IVec2::new(1, 1))).unwrap();
            let b = w.add_agent(Tagged::plain(), Placement::At(IVec2::new(2, 2))).unwrap();
            assert!(a < b);
            assert!(w.remove_agent(a));
            let c = w.add_agent(Tagged::plain(), Placement::At(IVec2::new(3, 3))).unwrap();
            assert!(c > b);
        }

        #[test]
        fn add_places_and_activates() {
            let mut w = world(10, 10);
            let pos = IVec2::new(4, 7);
            let id = w.add_agent(Tagged::plain(), Placement::At(pos)).unwrap();
            assert_eq!(w.position(id), Some(pos));
            assert_eq!(w.at(pos), &[id]);
            assert!(w.is_active(id));
        }

        #[test]
        fn out_of_bounds_placement_is_rejected() {
            let mut w = world(10, 10);
            let err = w
                .add_agent(Tagged::plain(), Placement::At(IVec2::new(10, 3)))
                .unwrap_err();
            assert_eq!(
                err,
                WorldError::OutOfBounds {
                    pos: IVec2::new(10, 3)
                }
            );
            assert_eq!(w.agent_count(), 0);
            // the failed add consumed no id
            let id = w
                .add_agent(Tagged::plain(), Placement::At(IVec2::new(1, 1)))
                .unwrap();
            assert_eq!(id, AgentId::new(0));
        }

        #[test]
        fn torus_placement_wraps_instead_of_failing() {
            let mut w = torus_world(10, 10);
            let id = w
                .add_agent(Tagged::plain(), Placement::At(IVec2::new(-1, 10)))
                .unwrap();
            assert_eq!(w.position(id), Some(IVec2::new(9, 0)));
        }

        #[test]
        fn unplaced_agent_has_no_position() {
            let mut w = world(10, 10);
            let id = w.add_agent(Tagged::plain(), Placement::Unplaced).unwrap();
            assert_eq!(w.position(id), None);
            assert!(w.is_active(id));
            assert!(!w.move_agent(id, IVec2::new(1, 1)));
        }

        #[test]
        fn random_placement_is_in_bounds() {
            let mut w = world(6, 4);
            for _ in 0..50 {
                let id = w.add_agent(Tagged::plain(), Placement::Random).unwrap();
                let pos = w.position(id).unwrap();
                assert!(pos.x >= 0 && pos.x < 6 && pos.y >= 0 && pos.y < 4);
            }
        }

        #[test]
        fn remove_clears_grid_and_registry() {
            let mut w = world(10, 10);
            let pos = IVec2::new(3, 3);
            let id = w.add_agent(Tagged::plain(), Placement::At(pos)).unwrap();
            assert!(w.remove_agent(id));
            assert!(w.at(pos).is_empty());
            assert!(!w.contains(id));
            assert!(!w.is_active(id));
            // stale removal is not an error
            assert!(!w.remove_agent(id));
        }

        #[test]
        fn deactivate_keeps_position_and_registry() {
            let mut w = world(10, 10);
            let pos = IVec2::new(5, 5);
            let id = w.add_agent(Tagged::plain(), Placement::At(pos)).unwrap();
            w.deactivate(id);
            assert!(!w.is_active(id));
            assert!(w.contains(id));
            assert_eq!(w.position(id), Some(pos));
            assert!(w.activate(id));
            assert!(w.is_active(id));
        }
    }

    mod movement_tests {
        use super::*;

        #[test]
        fn move_updates_grid_and_position() {
            let mut w = world(10, 10);
            let from = IVec2::new(2, 2);
            let to = IVec2::new(3, 2);
            let id = w.add_agent(Tagged::plain(), Placement::At(from)).unwrap();
            assert!(w.move_agent(id, to));
            assert!(w.at(from).is_empty());
            assert_eq!(w.at(to), &[id]);
            assert_eq!(w.position(id), Some(to));
        }

        #[test]
        fn move_to_zero_edge_is_allowed() {
            // The containment bound is inclusive of zero on both axes.
            let mut w = world(10, 10);
            let id = w.add_agent(Tagged::plain(), Placement::At(IVec2::new(1, 1))).unwrap();
            assert!(w.move_agent(id, IVec2::new(0, 1)));
            assert!(w.move_agent(id, IVec2::new(0, 0)));
            assert_eq!(w.position(id), Some(IVec2::ZERO));
        }

        #[test]
        fn out_of_bounds_move_fails_without_torus() {
            let mut w = world(10, 10);
            let from = IVec2::new(9, 9);
            let id = w.add_agent(Tagged::plain(), Placement::At(from)).unwrap();
            assert!(!w.move_agent(id, IVec2::new(10, 9)));
            assert!(!w.move_agent(id, IVec2::new(9, -1)));
            assert_eq!(w.position(id), Some(from));
            assert_eq!(w.at(from), &[id]);
        }

        #[test]
        fn out_of_bounds_move_wraps_on_torus() {
            let mut w = torus_world(10, 10);
            let id = w.add_agent(Tagged::plain(), Placement::At(IVec2::new(9, 0))).unwrap();
            assert!(w.move_agent(id, IVec2::new(10, -1)));
            assert_eq!(w.position(id), Some(IVec2::new(0, 9)));
        }

        #[test]
        fn relative_move() {
            let mut w = world(10, 10);
            let id = w.add_agent(Tagged::plain(), Placement::At(IVec2::new(5, 5))).unwrap();
            assert!(w.move_agent_relative(id, IVec2::new(-1, 2)));
            assert_eq!(w.position(id), Some(IVec2::new(4, 7)));
        }

        #[test]
        fn unknown_id_cannot_move() {
            let mut w = world(10, 10);
            assert!(!w.move_agent(AgentId::new(99), IVec2::new(1, 1)));
        }
    }

    mod collision_tests {
        use super::*;

        #[test]
        fn blocked_by_matching_group() {
            let mut w = world(10, 10);
            let wall_pos = IVec2::new(5, 5);
            w.add_agent(Tagged::grouped(0), Placement::At(wall_pos)).unwrap();
            let mover = w.add_agent(Tagged::colliding(0), Placement::At(IVec2::new(4, 5))).unwrap();
            assert!(!w.move_agent(mover, wall_pos));
            assert_eq!(w.position(mover), Some(IVec2::new(4, 5)));
        }

        #[test]
        fn empty_collision_set_ignores_occupants() {
            let mut w = world(10, 10);
            let wall_pos = IVec2::new(5, 5);
            w.add_agent(Tagged::grouped(0), Placement::At(wall_pos)).unwrap();
            let mover = w.add_agent(Tagged::plain(), Placement::At(IVec2::new(4, 5))).unwrap();
            assert!(w.move_agent(mover, wall_pos));
            assert_eq!(w.at(wall_pos).len(), 2);
        }

        #[test]
        fn non_matching_groups_do_not_block() {
            let mut w = world(10, 10);
            let target = IVec2::new(5, 5);
            w.add_agent(Tagged::grouped(3), Placement::At(target)).unwrap();
            let mover = w.add_agent(Tagged::colliding(0), Placement::At(IVec2::new(4, 5))).unwrap();
            assert!(w.move_agent(mover, target));
        }

        #[test]
        fn wall_scenario() {
            // 100x100, mover collides with group 0, wall at (51,50).
            let mut w = world(100, 100);
            let mover = w.add_agent(Tagged::colliding(0), Placement::At(IVec2::new(50, 50))).unwrap();
            w.add_agent(Tagged::grouped(0), Placement::At(IVec2::new(51, 50))).unwrap();
            assert!(!w.move_agent_relative(mover, IVec2::new(1, 0)));
            assert_eq!(w.position(mover), Some(IVec2::new(50, 50)));
        }
    }

    mod scan_tests {
        use super::*;

        #[test]
        fn nearest_scan_orders_by_ring() {
            let mut w = world(20, 20);
            let center = IVec2::new(10, 10);
            let far = w.add_agent(Tagged::plain(), Placement::At(IVec2::new(12, 10))).unwrap();
            let near = w.add_agent(Tagged::plain(), Placement::At(IVec2::new(11, 10))).unwrap();
            let here = w.add_agent(Tagged::plain(), Placement::At(center)).unwrap();
            assert_eq!(
                w.box_scan(center, 2, ScanOrder::Nearest, None),
                vec![here, near, far]
            );
        }

        #[test]
        fn group_filter_applies_after_gathering() {
            let mut w = world(20, 20);
            let center = IVec2::new(10, 10);
            w.add_agent(Tagged::plain(), Placement::At(center)).unwrap();
            let tagged = w.add_agent(Tagged::grouped(7), Placement::At(IVec2::new(11, 11))).unwrap();
            let found = w.box_scan(center, 2, ScanOrder::Unordered, Some(GroupId::new(7)));
            assert_eq!(found, vec![tagged]);
        }

        #[test]
        fn unordered_scan_matches_nearest_set() {
            let mut w = world(15, 15);
            for i in 0..20 {
                w.add_agent(
                    Tagged::plain(),
                    Placement::At(IVec2::new(i % 15, (i * 3) % 15)),
                ).unwrap();
            }
            let center = IVec2::new(7, 7);
            let mut a = w.box_scan(center, 4, ScanOrder::Nearest, None);
            let mut b = w.box_scan(center, 4, ScanOrder::Unordered, None);
            a.sort_unstable();
            b.sort_unstable();
            assert_eq!(a, b);
        }

        #[test]
        fn torus_scan_sees_across_edge() {
            let mut w = torus_world(10, 10);
            let beyond = w.add_agent(Tagged::plain(), Placement::At(IVec2::new(9, 9))).unwrap();
            let found = w.box_scan(IVec2::new(0, 0), 1, ScanOrder::Nearest, None);
            assert_eq!(found, vec![beyond]);
        }
    }

    mod lifecycle_tests {
        use super::*;

        #[test]
        fn step_advances_time() {
            let mut w = world(5, 5);
            w.step();
            w.step();
            assert_eq!(w.time(), 2);
        }

        #[test]
        fn max_steps_ends_world_and_removes_agents() {
            let mut w = World::new(WorldConfig::with_size(5, 5).with_max_steps(5)).unwrap();
            w.add_agent(Tagged::plain(), Placement::Random).unwrap();
            for _ in 0..6 {
                w.step();
            }
            assert!(w.ended());
            assert_eq!(w.time(), 5);
            assert_eq!(w.agent_count(), 0);
            // absorbing: further steps change nothing
            w.step();
            assert_eq!(w.time(), 5);
        }

        #[test]
        fn explicit_end_is_absorbing() {
            let mut w = world(5, 5);
            w.add_agent(Tagged::plain(), Placement::Random).unwrap();
            w.end();
            assert!(w.ended());
            assert_eq!(w.agent_count(), 0);
            w.end();
            w.step();
            assert_eq!(w.time(), 0);
        }
    }
}
