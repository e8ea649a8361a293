//! Crowd-averse walker.

use glam::IVec2;
use rand::Rng;

use lattice::random_grid_dir;

use crate::agent::{Agent, AgentSpec};
use crate::color::Color;
use crate::ctx::AgentCtx;
use crate::world::ScanOrder;

/// An agent that first walks to a rally point, then keeps its distance
/// from neighbors: each tick it scans around itself and flees a randomly
/// chosen neighbor (with a small chance of a random step instead), turning
/// red while crowded and blue while alone.
#[derive(Debug, Clone)]
pub struct Repulser {
    scan_radius: i32,
    target: Option<IVec2>,
    reached_target: bool,
}

impl Repulser {
    /// A repulser scanning within `scan_radius`.
    #[must_use]
    pub fn new(scan_radius: i32) -> Self {
        Self {
            scan_radius,
            target: None,
            reached_target: false,
        }
    }
}

impl Agent for Repulser {
    fn spec(&self) -> AgentSpec {
        AgentSpec::new().with_color(Color::YELLOW)
    }

    fn initialize(&mut self, ctx: &mut AgentCtx<'_>) {
        // Rally a bit off center so toroidal flight paths are visible.
        self.target = Some(IVec2::new(
            ctx.world().width() / 4,
            ctx.world().height() / 4,
        ));
    }

    fn step(&mut self, ctx: &mut AgentCtx<'_>) {
        let Some(target) = self.target else {
            return;
        };
        if !self.reached_target {
            ctx.move_towards(target);
            self.reached_target = ctx.pos() == Some(target);
            return;
        }

        let near = ctx.box_scan(self.scan_radius, ScanOrder::Nearest, None);
        if near.is_empty() {
            ctx.set_color(Color::BLUE);
            return;
        }
        ctx.set_color(Color::RED);
        if ctx.rng().gen::<f32>() < 0.2 {
            let dir = random_grid_dir(ctx.rng());
            ctx.move_rel(dir);
        } else {
            let pick = ctx.rng().gen_range(0..near.len());
            if let Some(pos) = ctx.world().position(near[pick]) {
                ctx.move_away_from(pos);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;
    use crate::world::{Placement, World};

    #[test]
    fn test_repulser_reaches_rally_point() {
        let mut world = World::new(WorldConfig::with_size(40, 40).with_seed(3)).unwrap();
        let id = world.add_agent(Box::new(Repulser::new(5)), Placement::At(IVec2::new(30, 30))).unwrap();
        for _ in 0..80 {
            world.step();
        }
        // Alone in the world: once rallied at (10, 10) it never moves again.
        assert_eq!(world.position(id), Some(IVec2::new(10, 10)));
        assert_eq!(world.color(id), Some(Color::BLUE));
    }

    #[test]
    fn test_crowded_repulsers_spread_out() {
        let mut world = World::new(
            WorldConfig::with_size(30, 30).toroidal().with_seed(11),
        )
        .unwrap();
        let stack = IVec2::new(7, 7); // the shared rally point
        let ids: Vec<_> = (0..4)
            .map(|_| world.add_agent(Box::new(Repulser::new(4)), Placement::At(stack)).unwrap())
            .collect();
        for _ in 0..60 {
            world.step();
        }
        // They cannot all still share the rally cell.
        let positions: std::collections::HashSet<_> = ids
            .iter()
            .map(|id| {
                let p = world.position(*id).unwrap();
                (p.x, p.y)
            })
            .collect();
        assert!(positions.len() > 1);
    }
}
