//! Game Portal - an arcade mini-game hub simulation core
//!
//! Core modules:
//! - `sim`: Tick-driven minigame simulations (physics, collisions, timers)
//! - `portal`: Session layer mounting one minigame and delivering callbacks
//! - `api`: Mock backend collaborator (stats, shop, leaderboard)
//! - `highscores`: Local best-times board
//! - `tuning`: Data-driven game balance

pub mod api;
pub mod highscores;
pub mod portal;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use portal::{GameMode, Session};
pub use tuning::Tuning;

/// Shared configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, matching the hub's render loop)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Arena dimensions shared by every minigame
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;
}
