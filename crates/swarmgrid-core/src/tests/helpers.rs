//! Shared test behaviors and invariant checks.

use std::cell::RefCell;
use std::rc::Rc;

use glam::IVec2;

use crate::agent::{Agent, AgentId, AgentSpec};
use crate::config::WorldConfig;
use crate::ctx::AgentCtx;
use crate::event::{EventKind, Payload};
use crate::world::{Placement, World};

// =============================================================================
// Invariant checks
// =============================================================================

/// Asserts grid/position consistency and that every active id is registered
/// across the whole world.
pub fn assert_consistent(world: &World) {
    let mut placed = 0usize;
    for id in world.agent_ids() {
        if let Some(pos) = world.position(id) {
            placed += 1;
            let here = world.at(pos).iter().filter(|o| **o == id).count();
            assert_eq!(here, 1, "agent {id} must appear exactly once at {pos}");
        }
        if world.is_active(id) {
            assert!(world.contains(id), "active id {id} must be registered");
        }
    }
    // No orphaned grid entries: every occupant is a registered agent whose
    // recorded position is that cell.
    let mut occupants = 0usize;
    for (cell, bag) in world.grid().iter() {
        for id in bag {
            occupants += 1;
            assert_eq!(
                world.position(*id),
                Some(cell),
                "grid occupant {id} at {cell} must record that position"
            );
        }
    }
    assert_eq!(occupants, placed, "grid occupancy must match placed agents");
}

// =============================================================================
// Shared log
// =============================================================================

/// Chronological log shared between test behaviors and the test body.
pub type Log = Rc<RefCell<Vec<String>>>;

/// A fresh, empty log.
pub fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

// =============================================================================
// Probe behaviors
// =============================================================================

/// Logs every hook invocation as `<hook>:<id>`.
pub struct Probe {
    log: Log,
}

impl Probe {
    pub fn new(log: &Log) -> Box<Self> {
        Box::new(Self {
            log: Rc::clone(log),
        })
    }
}

impl Agent for Probe {
    fn initialize(&mut self, ctx: &mut AgentCtx<'_>) {
        self.log.borrow_mut().push(format!("init:{}", ctx.id()));
    }

    fn step(&mut self, ctx: &mut AgentCtx<'_>) {
        self.log.borrow_mut().push(format!("step:{}", ctx.id()));
    }

    fn receive_event(&mut self, ctx: &mut AgentCtx<'_>, _kind: EventKind, _payload: &Payload) {
        self.log.borrow_mut().push(format!("recv:{}", ctx.id()));
    }

    fn cleanup(&mut self, ctx: &mut AgentCtx<'_>) {
        self.log.borrow_mut().push(format!("cleanup:{}", ctx.id()));
    }
}

/// Broadcasts within `radius` every tick, logging like a [`Probe`].
pub struct Emitter {
    log: Log,
    radius: i32,
}

impl Emitter {
    pub fn new(log: &Log, radius: i32) -> Box<Self> {
        Box::new(Self {
            log: Rc::clone(log),
            radius,
        })
    }
}

impl Agent for Emitter {
    fn step(&mut self, ctx: &mut AgentCtx<'_>) {
        self.log.borrow_mut().push(format!("step:{}", ctx.id()));
        ctx.emit_event(self.radius, Payload::none(), None);
    }
}

/// Runs an arbitrary closure as its step hook.
pub struct Scripted<F: FnMut(&mut AgentCtx<'_>)> {
    action: F,
}

impl<F: FnMut(&mut AgentCtx<'_>)> Scripted<F> {
    pub fn new(action: F) -> Box<Self> {
        Box::new(Self { action })
    }
}

impl<F: FnMut(&mut AgentCtx<'_>)> Agent for Scripted<F> {
    fn step(&mut self, ctx: &mut AgentCtx<'_>) {
        (self.action)(ctx);
    }
}

/// An agent with no behavior at all.
pub struct Inert;

impl Agent for Inert {}

impl Inert {
    pub fn boxed() -> Box<Self> {
        Box::new(Self)
    }
}

/// Inert agent carrying a custom spec.
pub struct SpecHolder {
    pub spec: AgentSpec,
}

impl SpecHolder {
    pub fn boxed(spec: AgentSpec) -> Box<Self> {
        Box::new(Self { spec })
    }
}

impl Agent for SpecHolder {
    fn spec(&self) -> AgentSpec {
        self.spec.clone()
    }
}

// =============================================================================
// World factories
// =============================================================================

/// A small deterministic world.
pub fn test_world(size: i32, seed: u64) -> World {
    World::new(WorldConfig::with_size(size, size).with_seed(seed)).unwrap()
}

/// Adds `count` probes on a diagonal, returning their ids.
pub fn add_probe_row(world: &mut World, log: &Log, count: i32) -> Vec<AgentId> {
    (0..count)
        .map(|i| world.add_agent(Probe::new(log), Placement::At(IVec2::new(i, i))).unwrap())
        .collect()
}
