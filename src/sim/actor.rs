//! Actor entities and their motion against arena bounds
//!
//! An actor is anything the simulations move each tick: the obby runner, the
//! battle combatants and their bullets, the racing car, the goal star. Health
//! and scalar speed stay in the owning simulation; the actor carries only the
//! shared kinematic state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;

/// A movable entity owned by one simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actor {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Facing angle in radians (only the racing car steers, others leave it 0)
    pub angle: f32,
    pub half_extents: Vec2,
    /// Cleared on death/expiry/pickup; dead actors are skipped and then purged
    pub alive: bool,
}

impl Actor {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            angle: 0.0,
            half_extents: size * 0.5,
            alive: true,
        }
    }

    /// Bounding box at the current position
    pub fn aabb(&self) -> Aabb {
        Aabb {
            min: self.pos - self.half_extents,
            max: self.pos + self.half_extents,
        }
    }

    pub fn overlaps(&self, other: &Actor) -> bool {
        self.aabb().overlaps(&other.aabb())
    }

    /// Integrate velocity into position
    pub fn integrate(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }

    /// Clamp the actor inside `bounds`, zeroing the velocity component at any
    /// edge it was pushed back from. Player actors use this.
    pub fn clamp_to(&mut self, bounds: &Aabb) {
        let lo = bounds.min + self.half_extents;
        let hi = bounds.max - self.half_extents;

        if self.pos.x < lo.x {
            self.pos.x = lo.x;
            self.vel.x = self.vel.x.max(0.0);
        } else if self.pos.x > hi.x {
            self.pos.x = hi.x;
            self.vel.x = self.vel.x.min(0.0);
        }

        if self.pos.y < lo.y {
            self.pos.y = lo.y;
            self.vel.y = self.vel.y.max(0.0);
        } else if self.pos.y > hi.y {
            self.pos.y = hi.y;
            self.vel.y = self.vel.y.min(0.0);
        }
    }

    /// Reflect the actor off the walls of `bounds` with the given restitution.
    /// Autonomous actors (battle enemies) use this instead of clamping.
    pub fn bounce_in(&mut self, bounds: &Aabb, restitution: f32) {
        let lo = bounds.min + self.half_extents;
        let hi = bounds.max - self.half_extents;

        if self.pos.x < lo.x {
            self.pos.x = lo.x;
            self.vel.x = -self.vel.x * restitution;
        } else if self.pos.x > hi.x {
            self.pos.x = hi.x;
            self.vel.x = -self.vel.x * restitution;
        }

        if self.pos.y < lo.y {
            self.pos.y = lo.y;
            self.vel.y = -self.vel.y * restitution;
        } else if self.pos.y > hi.y {
            self.pos.y = hi.y;
            self.vel.y = -self.vel.y * restitution;
        }
    }
}
