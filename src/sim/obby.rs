//! Obby (platformer) simulation
//!
//! Gravity, platforms, one goal star. Jumping is gated on a per-tick ground
//! contact flag set by collision resolution, not on penetration math. The
//! only terminal state is the win; there is no way to lose an obby run.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::actor::Actor;
use super::arena::{Arena, obby_platforms};
use super::game::{InputState, Minigame, Outcome, SimEvent};
use super::timer::TimerRegistry;
use crate::tuning::ObbyTuning;

const PLAYER_SPAWN: Vec2 = Vec2::new(100.0, 450.0);
const PLAYER_SIZE: Vec2 = Vec2::new(32.0, 48.0);
const STAR_SPAWN: Vec2 = Vec2::new(680.0, 100.0);
const STAR_SIZE: Vec2 = Vec2::new(24.0, 24.0);
/// Below this landing speed a bounce settles to rest
const REST_SPEED: f32 = 20.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
enum ObbyTimer {
    Complete,
}

/// Platformer state
#[derive(Debug, Clone)]
pub struct ObbySim {
    pub arena: Arena,
    pub platforms: Vec<Aabb>,
    pub player: Actor,
    pub star: Actor,
    /// Ground contact flag for the current tick
    pub on_ground: bool,
    outcome: Option<Outcome>,
    elapsed: f32,
    timers: TimerRegistry<ObbyTimer>,
    events: Vec<SimEvent>,
    disposed: bool,
    tuning: ObbyTuning,
}

impl ObbySim {
    pub fn new(tuning: ObbyTuning) -> Self {
        Self {
            arena: Arena::default(),
            platforms: obby_platforms(),
            player: Actor::new(PLAYER_SPAWN, PLAYER_SIZE),
            star: Actor::new(STAR_SPAWN, STAR_SIZE),
            on_ground: false,
            outcome: None,
            elapsed: 0.0,
            timers: TimerRegistry::new(),
            events: Vec::new(),
            disposed: false,
            tuning,
        }
    }

    /// Push an actor out of any platform it penetrates. Returns true if the
    /// actor ended the tick resting on top of one.
    fn resolve_platforms(actor: &mut Actor, platforms: &[Aabb], restitution: f32) -> bool {
        let mut grounded = false;

        for platform in platforms {
            let Some(push) = actor.aabb().resolution(platform) else {
                continue;
            };
            actor.pos += push;

            if push.y < 0.0 {
                // Landed from above
                grounded = true;
                if actor.vel.y > 0.0 {
                    let bounced = -actor.vel.y * restitution;
                    actor.vel.y = if bounced.abs() < REST_SPEED { 0.0 } else { bounced };
                }
            } else if push.y > 0.0 {
                // Head bump on the underside
                actor.vel.y = actor.vel.y.max(0.0);
            } else {
                actor.vel.x = 0.0;
            }
        }

        grounded
    }
}

impl Minigame for ObbySim {
    fn tick(&mut self, input: &InputState, dt: f32) {
        if self.disposed {
            return;
        }
        self.elapsed += dt;

        let mut fired = Vec::new();
        self.timers.advance(self.elapsed, &mut fired);
        for timer in fired {
            match timer {
                ObbyTimer::Complete => self.events.push(SimEvent::Completed),
            }
        }

        if self.outcome.is_some() {
            return;
        }

        // Horizontal input, jump only from the ground
        self.player.vel.x = if input.left {
            -self.tuning.move_speed
        } else if input.right {
            self.tuning.move_speed
        } else {
            0.0
        };
        if input.up && self.on_ground {
            self.player.vel.y = -self.tuning.jump_impulse;
        }

        self.player.vel.y += self.tuning.gravity * dt;
        self.star.vel.y += self.tuning.gravity * dt;

        self.player.integrate(dt);
        self.star.integrate(dt);

        self.on_ground = Self::resolve_platforms(
            &mut self.player,
            &self.platforms,
            self.tuning.player_restitution,
        );
        Self::resolve_platforms(&mut self.star, &self.platforms, self.tuning.star_restitution);

        self.player.clamp_to(&self.arena.bounds);
        self.star.clamp_to(&self.arena.bounds);

        // Resting on the arena floor counts as ground contact too
        if self.player.pos.y + self.player.half_extents.y >= self.arena.bounds.max.y {
            self.on_ground = true;
        }

        if self.star.alive && self.player.overlaps(&self.star) {
            self.star.alive = false;
            self.outcome = Some(Outcome::Won);
            self.events.push(SimEvent::StarCollected);
            self.events.push(SimEvent::Won);
            self.timers.clear();
            self.timers
                .once(self.elapsed, self.tuning.win_delay, ObbyTimer::Complete);
            log::info!("Obby cleared in {:.1}s", self.elapsed);
        }
    }

    fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    fn dispose(&mut self) {
        self.timers.clear();
        self.events.clear();
        self.star.alive = false;
        self.disposed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    fn run(sim: &mut ObbySim, input: InputState, secs: f32) -> Vec<SimEvent> {
        let mut events = Vec::new();
        let steps = (secs / SIM_DT).round() as usize;
        for _ in 0..steps {
            sim.tick(&input, SIM_DT);
            events.extend(sim.drain_events());
        }
        events
    }

    #[test]
    fn test_player_falls_and_lands() {
        let mut sim = ObbySim::new(ObbyTuning::default());
        run(&mut sim, InputState::default(), 3.0);

        // Spawn is above the ground slab; gravity settles the player onto it
        assert!(sim.on_ground);
        let ground_top = sim.platforms[0].min.y;
        assert!((sim.player.pos.y + sim.player.half_extents.y - ground_top).abs() < 1.0);
    }

    #[test]
    fn test_jump_only_applies_on_ground() {
        let mut sim = ObbySim::new(ObbyTuning::default());
        run(&mut sim, InputState::default(), 3.0);
        assert!(sim.on_ground);

        let jump = InputState {
            up: true,
            ..Default::default()
        };
        sim.tick(&jump, SIM_DT);
        assert!(sim.player.vel.y < -400.0);

        // Airborne now; holding jump must not re-apply the impulse
        sim.tick(&jump, SIM_DT);
        let vy_airborne = sim.player.vel.y;
        sim.tick(&jump, SIM_DT);
        assert!(sim.player.vel.y > vy_airborne, "gravity keeps integrating, no new impulse");
    }

    #[test]
    fn test_star_overlap_wins_once() {
        let mut sim = ObbySim::new(ObbyTuning::default());
        sim.player.pos = sim.star.pos;
        sim.tick(&InputState::default(), SIM_DT);

        assert_eq!(sim.outcome(), Some(Outcome::Won));
        assert!(!sim.star.alive);
        let events = sim.drain_events();
        assert!(events.contains(&SimEvent::StarCollected));
        assert!(events.contains(&SimEvent::Won));

        // Completion arrives once, after the delay
        let events = run(&mut sim, InputState::default(), 2.5);
        assert_eq!(
            events.iter().filter(|e| **e == SimEvent::Completed).count(),
            1
        );

        // Later overlaps and ticks change nothing
        let events = run(&mut sim, InputState::default(), 1.0);
        assert!(events.is_empty());
        assert_eq!(sim.outcome(), Some(Outcome::Won));
    }

    #[test]
    fn test_terminal_freezes_motion() {
        let mut sim = ObbySim::new(ObbyTuning::default());
        sim.player.pos = sim.star.pos;
        sim.tick(&InputState::default(), SIM_DT);
        assert_eq!(sim.outcome(), Some(Outcome::Won));

        let frozen_pos = sim.player.pos;
        let push = InputState {
            right: true,
            ..Default::default()
        };
        run(&mut sim, push, 1.0);
        assert_eq!(sim.player.pos, frozen_pos);
    }

    #[test]
    fn test_dispose_cancels_pending_completion() {
        let mut sim = ObbySim::new(ObbyTuning::default());
        sim.player.pos = sim.star.pos;
        sim.tick(&InputState::default(), SIM_DT);
        sim.drain_events();

        sim.dispose();
        let events = run(&mut sim, InputState::default(), 3.0);
        assert!(events.is_empty(), "no event may fire after teardown");
    }
}
