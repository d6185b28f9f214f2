//! Session layer: mounts one minigame and delivers its callbacks
//!
//! A `Session` is the hub's view of a running minigame: it ticks the
//! simulation, relays drained events to the caller, and turns the delayed
//! `Completed`/`Closed` events into the external `on_game_complete`/`on_close`
//! callbacks, at most one invocation per session. Dropping a session disposes
//! the simulation, mirroring view unmount.

use serde::{Deserialize, Serialize};

use crate::sim::{BattleSim, InputState, Minigame, ObbySim, Outcome, RacingSim, SimEvent, TycoonSim};
use crate::tuning::Tuning;

/// The hub's minigame catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    Obby,
    Battle,
    Racing,
    Tycoon,
}

impl GameMode {
    pub fn all() -> [GameMode; 4] {
        [
            GameMode::Obby,
            GameMode::Battle,
            GameMode::Racing,
            GameMode::Tycoon,
        ]
    }

    /// Display title, as shown in the hub's modal header
    pub fn title(self) -> &'static str {
        match self {
            GameMode::Obby => "Obby Challenge",
            GameMode::Battle => "Battle Arena",
            GameMode::Racing => "Speed Racing",
            GameMode::Tycoon => "Money Tycoon",
        }
    }

    /// Catalog id used by the backend API
    pub fn game_id(self) -> &'static str {
        match self {
            GameMode::Obby => "obby-1",
            GameMode::Battle => "battle-1",
            GameMode::Racing => "race-1",
            GameMode::Tycoon => "tycoon-1",
        }
    }

    /// Build a fresh simulation for this mode
    pub fn create(self, seed: u64, tuning: &Tuning) -> Box<dyn Minigame> {
        match self {
            GameMode::Obby => Box::new(ObbySim::new(tuning.obby)),
            GameMode::Battle => Box::new(BattleSim::new(seed, tuning.battle)),
            GameMode::Racing => Box::new(RacingSim::new(tuning.racing)),
            GameMode::Tycoon => Box::new(TycoonSim::new(seed, tuning.tycoon)),
        }
    }
}

/// One mounted minigame plus its completion callbacks
pub struct Session<G: Minigame> {
    game: G,
    on_game_complete: Option<Box<dyn FnMut()>>,
    on_close: Option<Box<dyn FnMut()>>,
    delivered: bool,
}

impl Session<Box<dyn Minigame>> {
    /// Mount a minigame by catalog mode
    pub fn start(mode: GameMode, seed: u64, tuning: &Tuning) -> Self {
        log::info!("Starting {} (seed {})", mode.title(), seed);
        Self::new(mode.create(seed, tuning))
    }
}

impl<G: Minigame> Session<G> {
    pub fn new(game: G) -> Self {
        Self {
            game,
            on_game_complete: None,
            on_close: None,
            delivered: false,
        }
    }

    /// Register the win callback (invoked at most once)
    pub fn on_game_complete(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_game_complete = Some(Box::new(f));
        self
    }

    /// Register the loss callback (invoked at most once)
    pub fn on_close(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_close = Some(Box::new(f));
        self
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    /// Mutable access for the rendering adapter and direct player actions
    /// (e.g. tycoon purchases driven by a UI)
    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.game.outcome()
    }

    /// True once a completion/close callback has been delivered
    pub fn finished(&self) -> bool {
        self.delivered
    }

    /// Advance the simulation and relay its events. The first terminal event
    /// triggers the matching callback; everything after is relay only.
    pub fn tick(&mut self, input: &InputState, dt: f32) -> Vec<SimEvent> {
        self.game.tick(input, dt);
        let events = self.game.drain_events();

        for event in &events {
            match event {
                SimEvent::Completed if !self.delivered => {
                    self.delivered = true;
                    if let Some(cb) = self.on_game_complete.as_mut() {
                        cb();
                    }
                }
                SimEvent::Closed if !self.delivered => {
                    self.delivered = true;
                    if let Some(cb) = self.on_close.as_mut() {
                        cb();
                    }
                }
                _ => {}
            }
        }

        events
    }
}

impl<G: Minigame> Drop for Session<G> {
    fn drop(&mut self) {
        // Unmount semantics: timers cancelled and actors discarded whether or
        // not the game reached a terminal state
        self.game.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::tuning::{BattleTuning, ObbyTuning};
    use glam::Vec2;
    use std::cell::Cell;
    use std::rc::Rc;

    fn run<G: Minigame>(session: &mut Session<G>, secs: f32) {
        let steps = (secs / SIM_DT).round() as usize;
        for _ in 0..steps {
            session.tick(&InputState::default(), SIM_DT);
        }
    }

    #[test]
    fn test_complete_callback_fires_exactly_once() {
        let completions = Rc::new(Cell::new(0u32));
        let seen = completions.clone();

        let mut session =
            Session::new(ObbySim::new(ObbyTuning::default())).on_game_complete(move || {
                seen.set(seen.get() + 1);
            });

        // Force the win and ride out the delay plus some slack
        let star_pos = session.game().star.pos;
        session.game_mut().player.pos = star_pos;
        run(&mut session, 3.0);

        assert_eq!(session.outcome(), Some(Outcome::Won));
        assert!(session.finished());
        assert_eq!(completions.get(), 1);

        run(&mut session, 2.0);
        assert_eq!(completions.get(), 1);
    }

    #[test]
    fn test_close_callback_on_loss() {
        let closes = Rc::new(Cell::new(0u32));
        let seen = closes.clone();

        let mut session = Session::new(BattleSim::new(3, BattleTuning::default()))
            .on_close(move || seen.set(seen.get() + 1));

        // Drain the player's health with point-blank enemy bullets
        for _ in 0..5 {
            let pos = session.game().player.pos - Vec2::new(10.0, 0.0);
            session.game_mut().bullets.push(crate::sim::battle::Bullet {
                actor: crate::sim::Actor::new(pos, Vec2::new(8.0, 8.0)),
                owner: crate::sim::battle::BulletOwner::Enemy,
                ttl: 1.0,
            });
            session.tick(&InputState::default(), SIM_DT);
        }
        assert_eq!(session.outcome(), Some(Outcome::Lost));

        run(&mut session, 2.5);
        assert_eq!(closes.get(), 1);
    }

    #[test]
    fn test_drop_before_terminal_invokes_nothing() {
        let completions = Rc::new(Cell::new(0u32));
        let seen = completions.clone();

        {
            let mut session =
                Session::new(ObbySim::new(ObbyTuning::default())).on_game_complete(move || {
                    seen.set(seen.get() + 1);
                });
            run(&mut session, 1.0);
            // Session dropped mid-game here
        }

        assert_eq!(completions.get(), 0);
    }

    #[test]
    fn test_drop_after_win_but_before_delay_invokes_nothing() {
        let completions = Rc::new(Cell::new(0u32));
        let seen = completions.clone();

        {
            let mut session =
                Session::new(ObbySim::new(ObbyTuning::default())).on_game_complete(move || {
                    seen.set(seen.get() + 1);
                });
            let star_pos = session.game().star.pos;
            session.game_mut().player.pos = star_pos;
            session.tick(&InputState::default(), SIM_DT);
            assert_eq!(session.outcome(), Some(Outcome::Won));
            // Dropped before the 2s completion delay elapses
        }

        assert_eq!(completions.get(), 0);
    }

    #[test]
    fn test_every_mode_mounts_and_ticks() {
        let tuning = Tuning::default();
        for mode in GameMode::all() {
            let mut session = Session::start(mode, 42, &tuning);
            run(&mut session, 0.5);
            assert_eq!(session.outcome(), None, "{} ended too early", mode.title());
        }
    }

    #[test]
    fn test_catalog_ids_are_stable() {
        assert_eq!(GameMode::Obby.game_id(), "obby-1");
        assert_eq!(GameMode::Racing.game_id(), "race-1");
        assert_eq!(GameMode::Battle.title(), "Battle Arena");
        assert_eq!(GameMode::all().len(), 4);
    }
}
