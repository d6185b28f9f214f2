//! The minigame contract between simulations and their host
//!
//! A minigame is a plain struct the host constructs, ticks with polled input,
//! drains for events, and disposes on unmount. Rendering is somebody else's
//! job: the host reads actor positions off the concrete simulation and feeds
//! the drained events to whatever presentation layer it has.

use serde::{Deserialize, Serialize};

/// Polled input state for one tick. No buffering, no combo semantics; the
/// host samples its input device and hands the booleans over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

/// Terminal result of a simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Won,
    Lost,
}

/// Events drained by the host each tick.
///
/// `Completed`/`Closed` are the delayed end-of-game signals the session layer
/// turns into the external callbacks; everything else is presentation fodder.
#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    /// Terminal win entered (immediate, for HUD banners)
    Won,
    /// Terminal loss entered (immediate)
    Lost,
    /// Win delay elapsed; the session invokes `on_game_complete`
    Completed,
    /// Loss delay elapsed; the session invokes `on_close`
    Closed,
    /// Obby goal star picked up
    StarCollected,
    /// Battle enemy destroyed at the given position
    EnemyDestroyed { x: f32, y: f32 },
    /// Battle player took a hit; `health` is the post-hit value
    PlayerHit { health: i32 },
    /// Racing gate passed in order
    CheckpointReached { index: usize },
    /// Racing lap credited
    LapCompleted { lap: u32 },
    /// Racing boost pad entered (cosmetic cue on)
    BoostActivated { pad: usize },
    /// Boost pad cue reset after its flash interval
    BoostReset { pad: usize },
    /// Tycoon plot upgraded to `level`
    PlotUpgraded { plot: usize, level: u32 },
    /// Tycoon cosmetic floating coin at the given position
    CoinSparkle { x: f32, y: f32 },
}

/// The capability set the host drives a minigame through
pub trait Minigame {
    /// Advance the simulation by `dt` seconds of real time
    fn tick(&mut self, input: &InputState, dt: f32);

    /// Take the events produced since the last drain
    fn drain_events(&mut self) -> Vec<SimEvent>;

    /// Terminal outcome, if the simulation has reached one
    fn outcome(&self) -> Option<Outcome>;

    /// Tear down: cancel all timers, discard all actors. Every later `tick`
    /// is a no-op and no event, delayed or otherwise, fires afterwards.
    fn dispose(&mut self);
}

impl<G: Minigame + ?Sized> Minigame for Box<G> {
    fn tick(&mut self, input: &InputState, dt: f32) {
        (**self).tick(input, dt)
    }

    fn drain_events(&mut self) -> Vec<SimEvent> {
        (**self).drain_events()
    }

    fn outcome(&self) -> Option<Outcome> {
        (**self).outcome()
    }

    fn dispose(&mut self) {
        (**self).dispose()
    }
}
