//! Battle (arena shooter) simulation
//!
//! One player against five bouncing enemies. The player's fire is
//! rate-limited against simulated time; enemies volley on a repeating timer;
//! every bullet carries a time-to-live and disappears when it runs out, hit
//! or not. This is the only mode with a loss path.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::actor::Actor;
use super::arena::Arena;
use super::game::{InputState, Minigame, Outcome, SimEvent};
use super::timer::TimerRegistry;
use crate::tuning::BattleTuning;

const PLAYER_SPAWN: Vec2 = Vec2::new(400.0, 500.0);
const PLAYER_SIZE: Vec2 = Vec2::new(32.0, 32.0);
const ENEMY_SIZE: Vec2 = Vec2::new(32.0, 32.0);
const BULLET_SIZE: Vec2 = Vec2::new(8.0, 8.0);
/// Player bullets leave the muzzle a little above center
const MUZZLE_OFFSET: f32 = 20.0;

const ENEMY_SPAWNS: [Vec2; 5] = [
    Vec2::new(100.0, 100.0),
    Vec2::new(700.0, 100.0),
    Vec2::new(100.0, 200.0),
    Vec2::new(700.0, 200.0),
    Vec2::new(400.0, 150.0),
];

/// The player's movement region, clamping the actor center
const PLAY_MIN: Vec2 = Vec2::new(40.0, 40.0);
const PLAY_MAX: Vec2 = Vec2::new(760.0, 560.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletOwner {
    Player,
    Enemy,
}

/// A live projectile; removed on impact or when `ttl` runs out
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub actor: Actor,
    pub owner: BulletOwner,
    pub ttl: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
enum BattleTimer {
    Volley,
    Complete,
    Close,
}

/// Arena shooter state
#[derive(Debug, Clone)]
pub struct BattleSim {
    pub arena: Arena,
    pub player: Actor,
    pub health: i32,
    pub enemies: Vec<Actor>,
    pub bullets: Vec<Bullet>,
    pub enemies_remaining: u32,
    /// Decaying impulse from the last hit, added on top of input movement
    knockback: Vec2,
    last_shot: f32,
    outcome: Option<Outcome>,
    elapsed: f32,
    timers: TimerRegistry<BattleTimer>,
    events: Vec<SimEvent>,
    disposed: bool,
    tuning: BattleTuning,
}

impl BattleSim {
    pub fn new(seed: u64, tuning: BattleTuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);

        let enemies: Vec<Actor> = ENEMY_SPAWNS
            .iter()
            .map(|&pos| {
                let mut enemy = Actor::new(pos, ENEMY_SIZE);
                enemy.vel = Vec2::new(
                    rng.random_range(-100.0..=100.0),
                    rng.random_range(50.0..=150.0),
                );
                enemy
            })
            .collect();
        let enemies_remaining = enemies.len() as u32;

        let mut timers = TimerRegistry::new();
        timers.every(0.0, tuning.volley_period, BattleTimer::Volley);

        Self {
            arena: Arena::default(),
            player: Actor::new(PLAYER_SPAWN, PLAYER_SIZE),
            health: tuning.player_health,
            enemies,
            bullets: Vec::new(),
            enemies_remaining,
            knockback: Vec2::ZERO,
            last_shot: f32::NEG_INFINITY,
            outcome: None,
            elapsed: 0.0,
            timers,
            events: Vec::new(),
            disposed: false,
            tuning,
        }
    }

    /// Every alive enemy fires one straight-line bullet at the player's
    /// current position.
    fn volley(&mut self) {
        let target = self.player.pos;
        let mut spawned = Vec::new();

        for enemy in self.enemies.iter().filter(|e| e.alive) {
            let dir = (target - enemy.pos).normalize_or(Vec2::Y);
            let mut actor = Actor::new(enemy.pos, BULLET_SIZE);
            actor.vel = dir * self.tuning.enemy_bullet_speed;
            spawned.push(Bullet {
                actor,
                owner: BulletOwner::Enemy,
                ttl: self.tuning.enemy_bullet_ttl,
            });
        }

        self.bullets.extend(spawned);
    }

    /// Apply one hit from `source`: fixed damage, knockback away from the
    /// source, loss terminal at zero health.
    fn hit_player(&mut self, source: Vec2) {
        if self.outcome.is_some() {
            return;
        }

        self.health = (self.health - self.tuning.hit_damage).max(0);
        let dir = (self.player.pos - source).normalize_or(Vec2::NEG_Y);
        self.knockback = dir * self.tuning.knockback;
        self.events.push(SimEvent::PlayerHit {
            health: self.health,
        });

        if self.health == 0 {
            self.outcome = Some(Outcome::Lost);
            self.events.push(SimEvent::Lost);
            self.timers.clear();
            self.timers
                .once(self.elapsed, self.tuning.end_delay, BattleTimer::Close);
            log::info!("Battle lost after {:.1}s", self.elapsed);
        }
    }

    fn win(&mut self) {
        self.outcome = Some(Outcome::Won);
        self.events.push(SimEvent::Won);
        self.timers.clear();
        self.timers
            .once(self.elapsed, self.tuning.end_delay, BattleTimer::Complete);
        log::info!("Battle won after {:.1}s", self.elapsed);
    }
}

impl Minigame for BattleSim {
    fn tick(&mut self, input: &InputState, dt: f32) {
        if self.disposed {
            return;
        }
        self.elapsed += dt;

        let mut fired = Vec::new();
        self.timers.advance(self.elapsed, &mut fired);
        for timer in fired {
            match timer {
                BattleTimer::Volley => {
                    if self.outcome.is_none() {
                        self.volley();
                    }
                }
                BattleTimer::Complete => self.events.push(SimEvent::Completed),
                BattleTimer::Close => self.events.push(SimEvent::Closed),
            }
        }

        if self.outcome.is_some() {
            return;
        }

        // Movement: polled input plus the decaying knockback term
        let speed = self.tuning.player_speed;
        let input_vel = Vec2::new(
            if input.left {
                -speed
            } else if input.right {
                speed
            } else {
                0.0
            },
            if input.up {
                -speed
            } else if input.down {
                speed
            } else {
                0.0
            },
        );
        self.knockback *= (1.0 - self.tuning.knockback_damping * dt).max(0.0);
        self.player.vel = input_vel + self.knockback;
        self.player.integrate(dt);
        self.player.pos = self.player.pos.clamp(PLAY_MIN, PLAY_MAX);

        for enemy in &mut self.enemies {
            enemy.integrate(dt);
            enemy.bounce_in(&self.arena.bounds, 1.0);
        }

        for bullet in &mut self.bullets {
            bullet.actor.integrate(dt);
            bullet.ttl -= dt;
        }

        // Rate-limited player fire
        if input.fire && self.elapsed - self.last_shot >= self.tuning.fire_cooldown {
            self.last_shot = self.elapsed;
            let mut actor = Actor::new(
                self.player.pos - Vec2::new(0.0, MUZZLE_OFFSET),
                BULLET_SIZE,
            );
            actor.vel = Vec2::new(0.0, -self.tuning.player_bullet_speed);
            self.bullets.push(Bullet {
                actor,
                owner: BulletOwner::Player,
                ttl: self.tuning.player_bullet_ttl,
            });
        }

        // Player bullets vs enemies
        for bullet in &mut self.bullets {
            if bullet.owner != BulletOwner::Player || !bullet.actor.alive {
                continue;
            }
            for enemy in &mut self.enemies {
                if enemy.alive && bullet.actor.overlaps(enemy) {
                    bullet.actor.alive = false;
                    enemy.alive = false;
                    self.enemies_remaining -= 1;
                    self.events.push(SimEvent::EnemyDestroyed {
                        x: enemy.pos.x,
                        y: enemy.pos.y,
                    });
                    break;
                }
            }
        }
        if self.enemies_remaining == 0 && self.outcome.is_none() {
            self.win();
        }

        // Enemy bullets and enemy bodies vs player
        if self.outcome.is_none() {
            let mut hits: Vec<Vec2> = Vec::new();
            for bullet in &mut self.bullets {
                if bullet.owner == BulletOwner::Enemy
                    && bullet.actor.alive
                    && bullet.actor.overlaps(&self.player)
                {
                    bullet.actor.alive = false;
                    hits.push(bullet.actor.pos);
                }
            }
            for enemy in &self.enemies {
                if enemy.alive && enemy.overlaps(&self.player) {
                    hits.push(enemy.pos);
                }
            }
            for source in hits {
                self.hit_player(source);
            }
        }

        self.bullets.retain(|b| b.actor.alive && b.ttl > 0.0);
        self.enemies.retain(|e| e.alive);
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
        self.bullets.clear();
        self.enemies.clear();
        self.disposed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    fn run(sim: &mut BattleSim, input: InputState, secs: f32) -> Vec<SimEvent> {
        let mut events = Vec::new();
        let steps = (secs / SIM_DT).round() as usize;
        for _ in 0..steps {
            sim.tick(&input, SIM_DT);
            events.extend(sim.drain_events());
        }
        events
    }

    fn enemy_bullet_at(pos: Vec2, ttl: f32) -> Bullet {
        Bullet {
            actor: Actor::new(pos, BULLET_SIZE),
            owner: BulletOwner::Enemy,
            ttl,
        }
    }

    #[test]
    fn test_fire_rate_limit() {
        let mut sim = BattleSim::new(7, BattleTuning::default());
        // Isolate the rate limiter from stray bullet-enemy impacts
        sim.enemies.clear();

        let fire = InputState {
            fire: true,
            ..Default::default()
        };
        run(&mut sim, fire, 1.0);

        // One shot up front, then one per 250ms window
        assert_eq!(sim.bullets.len(), 4);
    }

    #[test]
    fn test_bullet_ttl_expires_without_impact() {
        let mut sim = BattleSim::new(7, BattleTuning::default());
        sim.enemies.clear();

        let fire = InputState {
            fire: true,
            ..Default::default()
        };
        sim.tick(&fire, SIM_DT);
        assert_eq!(sim.bullets.len(), 1);

        run(&mut sim, InputState::default(), 2.1);
        assert!(sim.bullets.is_empty(), "TTL must purge bullets that hit nothing");
    }

    #[test]
    fn test_enemy_volley_aims_at_player() {
        let mut sim = BattleSim::new(7, BattleTuning::default());
        run(&mut sim, InputState::default(), 2.05);

        let enemy_bullets: Vec<&Bullet> = sim
            .bullets
            .iter()
            .filter(|b| b.owner == BulletOwner::Enemy)
            .collect();
        assert_eq!(enemy_bullets.len(), sim.enemies.len());

        for bullet in enemy_bullets {
            let to_player = sim.player.pos - bullet.actor.pos;
            assert!(
                bullet.actor.vel.dot(to_player) > 0.0,
                "enemy bullets fly toward the player's position at fire time"
            );
        }
    }

    #[test]
    fn test_hits_drain_health_and_floor_at_zero() {
        let mut sim = BattleSim::new(7, BattleTuning::default());
        sim.enemies.clear();
        sim.timers.clear();

        let mut lost = 0;
        for i in 0..6 {
            sim.bullets
                .push(enemy_bullet_at(sim.player.pos - Vec2::new(10.0, 0.0), 1.0));
            sim.tick(&InputState::default(), SIM_DT);
            lost += sim
                .drain_events()
                .iter()
                .filter(|e| **e == SimEvent::Lost)
                .count();
            let expected = (100 - 20 * (i as i32 + 1)).max(0);
            assert_eq!(sim.health, expected);
        }

        assert_eq!(sim.health, 0);
        assert_eq!(sim.outcome(), Some(Outcome::Lost));
        assert_eq!(lost, 1, "loss terminal fires exactly once");

        // Close callback event arrives once after the end delay
        let events = run(&mut sim, InputState::default(), 2.5);
        assert_eq!(
            events.iter().filter(|e| **e == SimEvent::Closed).count(),
            1
        );
    }

    #[test]
    fn test_knockback_pushes_away_from_source() {
        let mut sim = BattleSim::new(7, BattleTuning::default());
        sim.enemies.clear();
        sim.timers.clear();

        // Hit from the left knocks the player rightward
        sim.bullets
            .push(enemy_bullet_at(sim.player.pos - Vec2::new(10.0, 0.0), 1.0));
        sim.tick(&InputState::default(), SIM_DT);

        let x_before = sim.player.pos.x;
        sim.tick(&InputState::default(), SIM_DT);
        assert!(sim.player.pos.x > x_before);
    }

    #[test]
    fn test_same_tick_win_beats_loss() {
        let mut sim = BattleSim::new(7, BattleTuning::default());
        sim.timers.clear();
        sim.health = 20;

        // Keep one stationary enemy with a player bullet already inside it,
        // and an enemy bullet inside the player: both rules trigger this tick.
        let survivor = Actor::new(Vec2::new(200.0, 200.0), ENEMY_SIZE);
        sim.enemies = vec![survivor.clone()];
        sim.enemies_remaining = 1;
        sim.bullets = vec![
            Bullet {
                actor: Actor::new(survivor.pos, BULLET_SIZE),
                owner: BulletOwner::Player,
                ttl: 1.0,
            },
            enemy_bullet_at(sim.player.pos, 1.0),
        ];

        sim.tick(&InputState::default(), SIM_DT);

        assert_eq!(sim.outcome(), Some(Outcome::Won));
        assert_eq!(sim.health, 20, "the losing trigger is ignored after the win");
    }

    #[test]
    fn test_terminal_freezes_counters() {
        let mut sim = BattleSim::new(7, BattleTuning::default());
        sim.health = 20;
        sim.bullets.push(enemy_bullet_at(sim.player.pos, 1.0));
        sim.tick(&InputState::default(), SIM_DT);
        assert_eq!(sim.outcome(), Some(Outcome::Lost));

        let health = sim.health;
        let remaining = sim.enemies_remaining;
        run(&mut sim, InputState { fire: true, ..Default::default() }, 1.0);
        assert_eq!(sim.health, health);
        assert_eq!(sim.enemies_remaining, remaining);
    }

    #[test]
    fn test_dispose_silences_pending_close() {
        let mut sim = BattleSim::new(7, BattleTuning::default());
        sim.health = 20;
        sim.bullets.push(enemy_bullet_at(sim.player.pos, 1.0));
        sim.tick(&InputState::default(), SIM_DT);
        sim.drain_events();

        sim.dispose();
        let events = run(&mut sim, InputState::default(), 3.0);
        assert!(events.is_empty());
        assert!(sim.bullets.is_empty() && sim.enemies.is_empty());
    }

    #[cfg(test)]
    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn health_is_never_negative_and_matches_hit_count(hits in 0usize..12) {
                let mut sim = BattleSim::new(7, BattleTuning::default());
                sim.enemies.clear();
                sim.timers.clear();

                for _ in 0..hits {
                    sim.bullets
                        .push(enemy_bullet_at(sim.player.pos - Vec2::new(10.0, 0.0), 1.0));
                    sim.tick(&InputState::default(), SIM_DT);
                }

                // Hits past the loss terminal are ignored
                let effective = hits.min(5) as i32;
                prop_assert_eq!(sim.health, (100 - 20 * effective).max(0));
            }
        }
    }
}
