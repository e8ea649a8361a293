//! Agent identity, group tags, and the behavior trait.
//!
//! An agent is a type-erased behavior (`Box<dyn Agent>`) registered with a
//! [`World`](crate::world::World). The world assigns each agent a unique
//! [`AgentId`] at registration and drives the four lifecycle hooks; all
//! spatial operations go through the [`AgentCtx`] handed to each hook, so
//! behaviors never hold a reference to the world or to each other.
//!
//! # Group tags
//!
//! Collision semantics are expressed through two independent tag sets:
//! `group_ids` is what an agent declares itself to be, and
//! `group_collision_ids` is what it refuses to share a cell with. A
//! behavior states both in its [`AgentSpec`]; the world clones the spec
//! into a per-agent registry entry at `add_agent` time, so two agents built
//! from the same behavior type can never alias a shared mutable set.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::ctx::AgentCtx;
use crate::event::{EventKind, Payload};

/// Unique identifier for a registered agent.
///
/// Ids are assigned from a monotonically increasing counter and are never
/// reused within a world's lifetime, so a stale id held across a removal
/// simply stops resolving.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentId(u64);

impl AgentId {
    /// Creates an `AgentId` from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AgentId({})", self.0)
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for AgentId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

/// Group membership / collision tag.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupId(u32);

impl GroupId {
    /// Creates a `GroupId` from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// The raw value of this tag.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GroupId({})", self.0)
    }
}

impl From<u32> for GroupId {
    fn from(id: u32) -> Self {
        Self::new(id)
    }
}

/// An agent's set of group tags. `BTreeSet` keeps iteration deterministic.
pub type GroupSet = BTreeSet<GroupId>;

/// Static configuration a behavior declares at registration time.
///
/// The world copies the spec into its own registry entry, after which the
/// sets belong to that one agent and can be mutated through
/// [`AgentCtx::groups_mut`] without affecting any sibling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentSpec {
    /// Tags this agent declares itself to be.
    pub group_ids: GroupSet,
    /// Tags this agent refuses to co-occupy a cell with.
    pub group_collision_ids: GroupSet,
    /// Initial render hint.
    pub color: Color,
}

impl AgentSpec {
    /// An empty spec: no groups, no collisions, default color.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a declared group tag.
    #[must_use]
    pub fn with_group(mut self, group: GroupId) -> Self {
        self.group_ids.insert(group);
        self
    }

    /// Adds a collision tag.
    #[must_use]
    pub fn with_collision_group(mut self, group: GroupId) -> Self {
        self.group_collision_ids.insert(group);
        self
    }

    /// Sets the initial color.
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

/// A polymorphic agent behavior.
///
/// All hooks default to no-ops; implementors override what they need. Each
/// hook receives an [`AgentCtx`] scoped to the agent, which exposes the
/// world's movement, scan, and event API plus geometry helpers.
///
/// Hooks run strictly within a tick's call stack: `step` during the act
/// phase, `receive_event` during the deferred delivery phase, `initialize`
/// inside `add_agent`, and `cleanup` inside `remove_agent`.
pub trait Agent {
    /// Declares initial group memberships and color.
    ///
    /// Called exactly once, inside `add_agent`, before `initialize`.
    fn spec(&self) -> AgentSpec {
        AgentSpec::default()
    }

    /// Runs right after the agent is registered and placed.
    fn initialize(&mut self, _ctx: &mut AgentCtx<'_>) {}

    /// Runs once per tick while the agent is active.
    fn step(&mut self, _ctx: &mut AgentCtx<'_>) {}

    /// Receives a deferred event during the post-step delivery phase.
    fn receive_event(&mut self, _ctx: &mut AgentCtx<'_>, _kind: EventKind, _payload: &Payload) {}

    /// Runs as the agent is being removed from the world.
    fn cleanup(&mut self, _ctx: &mut AgentCtx<'_>) {}
}
