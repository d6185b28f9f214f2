//! Racing (checkpoint lap) simulation
//!
//! A scalar-speed car with asymmetric throttle/brake rates and speed-gated
//! steering, lapping an oval through four ordered checkpoint gates. The gate
//! order is strict: a checkpoint only arms once every earlier one is armed,
//! so cutting the track backwards can never credit a lap.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::actor::Actor;
use super::arena::{Arena, TrackLayout};
use super::game::{InputState, Minigame, Outcome, SimEvent};
use super::timer::TimerRegistry;
use crate::tuning::RacingTuning;

const CAR_SIZE: Vec2 = Vec2::new(24.0, 16.0);

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
enum RacingTimer {
    Complete,
    BoostReset(usize),
}

/// Checkpoint racer state
#[derive(Debug, Clone)]
pub struct RacingSim {
    pub arena: Arena,
    pub track: TrackLayout,
    pub car: Actor,
    /// Signed scalar speed; negative while reversing
    pub speed: f32,
    /// Ordered gate flags, reset at the start of every lap
    pub checkpoints: Vec<bool>,
    pub lap: u32,
    /// Cosmetic pad glow state, reset by a one-shot timer
    pub pad_lit: Vec<bool>,
    outcome: Option<Outcome>,
    elapsed: f32,
    timers: TimerRegistry<RacingTimer>,
    events: Vec<SimEvent>,
    disposed: bool,
    tuning: RacingTuning,
}

impl RacingSim {
    pub fn new(tuning: RacingTuning) -> Self {
        Self::with_track(TrackLayout::oval(), tuning)
    }

    pub fn with_track(track: TrackLayout, tuning: RacingTuning) -> Self {
        let mut car = Actor::new(track.start_pos, CAR_SIZE);
        car.angle = track.start_angle;
        let checkpoints = vec![false; track.checkpoints.len()];
        let pad_lit = vec![false; track.boost_pads.len()];

        Self {
            arena: Arena::default(),
            track,
            car,
            speed: 0.0,
            checkpoints,
            lap: 0,
            pad_lit,
            outcome: None,
            elapsed: 0.0,
            timers: TimerRegistry::new(),
            events: Vec::new(),
            disposed: false,
            tuning,
        }
    }

    fn win(&mut self) {
        self.outcome = Some(Outcome::Won);
        self.events.push(SimEvent::Won);
        self.timers.clear();
        self.timers
            .once(self.elapsed, self.tuning.win_delay, RacingTimer::Complete);
        log::info!("Race won after {:.1}s", self.elapsed);
    }
}

impl Minigame for RacingSim {
    fn tick(&mut self, input: &InputState, dt: f32) {
        if self.disposed {
            return;
        }
        self.elapsed += dt;

        let mut fired = Vec::new();
        self.timers.advance(self.elapsed, &mut fired);
        for timer in fired {
            match timer {
                RacingTimer::Complete => self.events.push(SimEvent::Completed),
                RacingTimer::BoostReset(pad) => {
                    if let Some(lit) = self.pad_lit.get_mut(pad) {
                        *lit = false;
                    }
                    self.events.push(SimEvent::BoostReset { pad });
                }
            }
        }

        if self.outcome.is_some() {
            return;
        }

        let t = self.tuning;

        // Passive friction only while the throttle is idle
        if !input.up && !input.down {
            let decel = t.friction * dt;
            self.speed = if self.speed > 0.0 {
                (self.speed - decel).max(0.0)
            } else {
                (self.speed + decel).min(0.0)
            };
        }
        if input.up {
            self.speed = (self.speed + t.acceleration * dt).min(t.max_speed);
        }
        if input.down {
            self.speed =
                (self.speed - t.acceleration * 2.0 * dt).max(-t.max_speed * t.reverse_factor);
        }

        // Steering needs motion; no in-place rotation
        if self.speed.abs() > t.min_steer_speed {
            if input.left {
                self.car.angle -= t.steer_rate * dt;
            }
            if input.right {
                self.car.angle += t.steer_rate * dt;
            }
        }

        self.car.vel = Vec2::new(self.car.angle.cos(), self.car.angle.sin()) * self.speed;
        self.car.integrate(dt);
        self.car.clamp_to(&self.arena.bounds);

        // Boost pads: additive speed, cosmetic glow with a timed reset
        for pad in 0..self.track.boost_pads.len() {
            if !self.car.aabb().overlaps(&self.track.boost_pads[pad]) {
                continue;
            }
            self.speed = (self.speed + t.boost_bonus).min(t.max_speed + t.boost_bonus);
            if !self.pad_lit[pad] {
                self.pad_lit[pad] = true;
                self.events.push(SimEvent::BoostActivated { pad });
                self.timers
                    .once(self.elapsed, t.boost_reset, RacingTimer::BoostReset(pad));
            }
        }

        // Ordered checkpoint gates; at most one arms per tick
        let pos = self.car.pos;
        for i in 0..self.checkpoints.len() {
            let armed_prior = i == 0 || self.checkpoints[i - 1];
            if !self.checkpoints[i] && armed_prior && self.track.checkpoints[i].contains_point(pos)
            {
                self.checkpoints[i] = true;
                self.events.push(SimEvent::CheckpointReached { index: i });
                break;
            }
        }

        // Crossing the finish with every gate armed credits the lap
        if self.checkpoints[self.checkpoints.len() - 1] && self.track.finish().contains_point(pos)
        {
            self.lap += 1;
            self.checkpoints.fill(false);
            self.events.push(SimEvent::LapCompleted { lap: self.lap });
            log::debug!("Lap {} done at {:.1}s", self.lap, self.elapsed);

            if self.lap >= t.laps_to_win && self.outcome.is_none() {
                self.win();
            }
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
        self.car.alive = false;
        self.disposed = true;
    }
}
