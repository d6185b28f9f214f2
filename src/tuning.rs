//! Data-driven game balance
//!
//! Every gameplay rate, threshold and delay lives here as the default of a
//! serde struct, so a host can rebalance a mode from a JSON file without
//! touching simulation code. Defaults reproduce the hub's shipped balance.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Obby (platformer) balance
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ObbyTuning {
    /// Downward acceleration, units/s^2
    pub gravity: f32,
    /// Horizontal run speed, units/s
    pub move_speed: f32,
    /// Upward jump impulse, units/s
    pub jump_impulse: f32,
    /// Landing restitution for the player
    pub player_restitution: f32,
    /// Landing restitution for the goal star
    pub star_restitution: f32,
    /// Seconds between the win and the completion callback
    pub win_delay: f32,
}

impl Default for ObbyTuning {
    fn default() -> Self {
        Self {
            gravity: 300.0,
            move_speed: 160.0,
            jump_impulse: 500.0,
            player_restitution: 0.2,
            star_restitution: 0.3,
            win_delay: 2.0,
        }
    }
}

/// Battle (arena shooter) balance
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BattleTuning {
    pub player_speed: f32,
    pub player_health: i32,
    /// Damage per hit, from bullets and body contact alike
    pub hit_damage: i32,
    /// Knockback impulse magnitude, units/s
    pub knockback: f32,
    /// Exponential decay rate of the knockback term, 1/s
    pub knockback_damping: f32,
    /// Minimum seconds between player shots
    pub fire_cooldown: f32,
    pub player_bullet_speed: f32,
    pub player_bullet_ttl: f32,
    /// Seconds between enemy volleys
    pub volley_period: f32,
    pub enemy_bullet_speed: f32,
    pub enemy_bullet_ttl: f32,
    /// Seconds between a terminal state and its callback
    pub end_delay: f32,
}

impl Default for BattleTuning {
    fn default() -> Self {
        Self {
            player_speed: 200.0,
            player_health: 100,
            hit_damage: 20,
            knockback: 200.0,
            knockback_damping: 5.0,
            fire_cooldown: 0.25,
            player_bullet_speed: 400.0,
            player_bullet_ttl: 2.0,
            volley_period: 2.0,
            enemy_bullet_speed: 150.0,
            enemy_bullet_ttl: 3.0,
            end_delay: 2.0,
        }
    }
}

/// Racing (checkpoint lap) balance
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RacingTuning {
    pub max_speed: f32,
    /// Forward acceleration, units/s^2; braking runs at twice this
    pub acceleration: f32,
    /// Passive deceleration toward zero when no throttle is held
    pub friction: f32,
    /// Steering rate, radians/s
    pub steer_rate: f32,
    /// Steering has no effect at or below this speed magnitude
    pub min_steer_speed: f32,
    /// Reverse speed bound as a fraction of max_speed
    pub reverse_factor: f32,
    /// Speed added by a boost pad, capped at max_speed + boost_bonus
    pub boost_bonus: f32,
    /// Seconds until a pad's visual cue resets
    pub boost_reset: f32,
    pub laps_to_win: u32,
    pub win_delay: f32,
}

impl Default for RacingTuning {
    fn default() -> Self {
        Self {
            max_speed: 300.0,
            acceleration: 300.0,
            friction: 120.0,
            steer_rate: std::f32::consts::PI,
            min_steer_speed: 10.0,
            reverse_factor: 0.5,
            boost_bonus: 100.0,
            boost_reset: 0.5,
            laps_to_win: 3,
            win_delay: 2.0,
        }
    }
}

/// Tycoon (incremental economy) balance
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TycoonTuning {
    pub start_money: u64,
    pub start_income: u64,
    pub win_threshold: u64,
    /// Seconds between passive income ticks
    pub income_period: f32,
    /// Seconds between cosmetic coin sparkles
    pub sparkle_period: f32,
    /// Multiplicative cost escalation per purchase (floored)
    pub cost_growth: f64,
    /// Multiplicative income escalation per purchase (floored)
    pub income_growth: f64,
    pub win_delay: f32,
}

impl Default for TycoonTuning {
    fn default() -> Self {
        Self {
            start_money: 10,
            start_income: 1,
            win_threshold: 10_000,
            income_period: 1.0,
            sparkle_period: 0.5,
            cost_growth: 1.5,
            income_growth: 1.2,
            win_delay: 3.0,
        }
    }
}

/// All balance tables
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub obby: ObbyTuning,
    pub battle: BattleTuning,
    pub racing: RacingTuning,
    pub tycoon: TycoonTuning,
}

impl Tuning {
    /// Load a JSON override file; missing sections fall back to defaults
    pub fn load(path: &Path) -> Result<Self, TuningError> {
        let json = fs::read_to_string(path)?;
        let tuning = serde_json::from_str(&json)?;
        log::info!("Loaded tuning overrides from {}", path.display());
        Ok(tuning)
    }

    pub fn save(&self, path: &Path) -> Result<(), TuningError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_round_trip() {
        let tuning = Tuning::default();
        let json = serde_json::to_string(&tuning).unwrap();
        let back: Tuning = serde_json::from_str(&json).unwrap();
        assert_eq!(back.battle.hit_damage, tuning.battle.hit_damage);
        assert_eq!(back.tycoon.win_threshold, tuning.tycoon.win_threshold);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let json = r#"{"racing": {"max_speed": 400.0, "acceleration": 300.0,
            "friction": 120.0, "steer_rate": 3.14159, "min_steer_speed": 10.0,
            "reverse_factor": 0.5, "boost_bonus": 100.0, "boost_reset": 0.5,
            "laps_to_win": 3, "win_delay": 2.0}}"#;
        let tuning: Tuning = serde_json::from_str(json).unwrap();
        assert_eq!(tuning.racing.max_speed, 400.0);
        assert_eq!(tuning.battle.player_health, 100);
    }
}
