//! Tick-driven minigame simulations
//!
//! All gameplay logic lives here. This module must stay pure and host-agnostic:
//! - Variable per-tick delta for integration, simulation-elapsed time for pacing
//! - Seeded RNG only
//! - No rendering or platform dependencies
//!
//! Each minigame is a plain data-owning struct implementing [`Minigame`]:
//! `tick` advances the rules, `drain_events` hands typed events to the host,
//! `dispose` tears down timers and actors.

pub mod aabb;
pub mod actor;
pub mod arena;
pub mod battle;
pub mod game;
pub mod obby;
pub mod racing;
pub mod timer;
pub mod tycoon;

pub use aabb::Aabb;
pub use actor::Actor;
pub use arena::{Arena, PlotSpec, TrackLayout};
pub use battle::BattleSim;
pub use game::{InputState, Minigame, Outcome, SimEvent};
pub use obby::ObbySim;
pub use racing::RacingSim;
pub use timer::{TimerId, TimerRegistry};
pub use tycoon::TycoonSim;
