//! Deferred event records.
//!
//! Agents never call each other directly: an emission appends a
//! [`QueuedEvent`] to the world's per-tick queue, and the world delivers it
//! to each still-registered recipient after every agent has finished its
//! `step` for that tick. An emitter therefore never observes a reaction
//! within the same tick, and events emitted from a `receive_event` handler
//! land in the *next* tick's queue.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use glam::IVec2;

use crate::agent::AgentId;

/// What kind of event a record carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A proximity broadcast, tagged with the emitter's position at the
    /// moment of emission. This is the kind produced by
    /// [`AgentCtx::emit_event`](crate::ctx::AgentCtx::emit_event).
    Origin(IVec2),
    /// An application-defined event tag for world-level emission.
    Tag(u32),
}

/// Optional type-erased event payload.
///
/// Payloads are shared (`Arc`) between all recipients of one emission;
/// handlers read them through [`Payload::downcast_ref`]. An absent payload
/// models a pure signal.
#[derive(Clone, Default)]
pub struct Payload(Option<Arc<dyn Any + Send + Sync>>);

impl Payload {
    /// A payload-less signal.
    #[must_use]
    pub fn none() -> Self {
        Self(None)
    }

    /// Wraps a value as a shared payload.
    #[must_use]
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Some(Arc::new(value)))
    }

    /// The payload as `T`, if present and of that type.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.as_deref().and_then(|value| value.downcast_ref())
    }

    /// True when no payload was attached.
    #[must_use]
    pub fn is_none(&self) -> bool {
        self.0.is_none()
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(_) => f.write_str("Payload(..)"),
            None => f.write_str("Payload(none)"),
        }
    }
}

/// A pending emission: recipients plus the event itself.
#[derive(Debug, Clone)]
pub(crate) struct QueuedEvent {
    pub recipients: Vec<AgentId>,
    pub kind: EventKind,
    pub payload: Payload,
}
