//! Inert collision scenery.

use crate::agent::{Agent, AgentSpec, GroupId};
use crate::color::Color;

/// An agent that never acts: it declares a group tag and occupies its
/// cell, blocking anything that lists that tag in its collision set.
#[derive(Debug, Clone)]
pub struct Wall {
    group: GroupId,
    color: Color,
}

impl Wall {
    /// A wall declaring `group`, drawn white.
    #[must_use]
    pub fn new(group: GroupId) -> Self {
        Self {
            group,
            color: Color::WHITE,
        }
    }

    /// Overrides the render color.
    #[must_use]
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

impl Agent for Wall {
    fn spec(&self) -> AgentSpec {
        AgentSpec::new().with_group(self.group).with_color(self.color)
    }
}
