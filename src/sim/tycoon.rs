//! Tycoon (incremental economy) simulation
//!
//! Money accrues on a one-second timer; the player spends it upgrading plots,
//! each purchase compounding the plot's next cost (×1.5) and payout (×1.2).
//! All currency is unsigned integer math; the growth formulas floor like the
//! original hub. Winning is checked on income ticks only.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arena::tycoon_plots;
use super::game::{InputState, Minigame, Outcome, SimEvent};
use super::timer::TimerRegistry;
use crate::tuning::TycoonTuning;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
enum TycoonTimer {
    Income,
    Sparkle,
    Complete,
}

/// One building plot: upgrade cost, income added per upgrade, level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plot {
    pub cost: u64,
    pub income: u64,
    pub level: u32,
}

/// Incremental economy state
#[derive(Debug, Clone)]
pub struct TycoonSim {
    pub money: u64,
    pub money_per_second: u64,
    pub plots: Vec<Plot>,
    /// Plot the polled input cursor is on
    pub selected: usize,
    prev_left: bool,
    prev_right: bool,
    prev_fire: bool,
    outcome: Option<Outcome>,
    elapsed: f32,
    timers: TimerRegistry<TycoonTimer>,
    events: Vec<SimEvent>,
    disposed: bool,
    rng: Pcg32,
    tuning: TycoonTuning,
}

impl TycoonSim {
    pub fn new(seed: u64, tuning: TycoonTuning) -> Self {
        let mut timers = TimerRegistry::new();
        timers.every(0.0, tuning.income_period, TycoonTimer::Income);
        timers.every(0.0, tuning.sparkle_period, TycoonTimer::Sparkle);

        Self {
            money: tuning.start_money,
            money_per_second: tuning.start_income,
            plots: tycoon_plots()
                .into_iter()
                .map(|spec| Plot {
                    cost: spec.cost,
                    income: spec.income,
                    level: 0,
                })
                .collect(),
            selected: 0,
            prev_left: false,
            prev_right: false,
            prev_fire: false,
            outcome: None,
            elapsed: 0.0,
            timers,
            events: Vec::new(),
            disposed: false,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
        }
    }

    /// Buy an upgrade for `plot` if the money is there. Insufficient funds
    /// leave everything untouched.
    pub fn try_upgrade(&mut self, plot: usize) -> bool {
        if self.disposed || self.outcome.is_some() {
            return false;
        }
        let Some(p) = self.plots.get_mut(plot) else {
            return false;
        };
        if self.money < p.cost {
            return false;
        }

        self.money -= p.cost;
        self.money_per_second += p.income;
        p.level += 1;
        p.cost = (p.cost as f64 * self.tuning.cost_growth).floor() as u64;
        p.income = (p.income as f64 * self.tuning.income_growth).floor() as u64;
        let level = p.level;

        self.events.push(SimEvent::PlotUpgraded { plot, level });
        log::debug!(
            "Plot {} upgraded to level {} (income {}/s)",
            plot,
            level,
            self.money_per_second
        );
        true
    }

    fn income_tick(&mut self) {
        self.money += self.money_per_second;

        if self.money >= self.tuning.win_threshold && self.outcome.is_none() {
            self.outcome = Some(Outcome::Won);
            self.events.push(SimEvent::Won);
            self.timers.clear();
            self.timers
                .once(self.elapsed, self.tuning.win_delay, TycoonTimer::Complete);
            log::info!("Empire built: {} money after {:.0}s", self.money, self.elapsed);
        }
    }

    fn sparkle(&mut self) {
        // Pure decoration; spawns only once the economy is rolling
        if self.money_per_second > self.tuning.start_income {
            let x = self.rng.random_range(100.0..=700.0);
            let y = self.rng.random_range(400.0..=500.0);
            self.events.push(SimEvent::CoinSparkle { x, y });
        }
    }
}

impl Minigame for TycoonSim {
    fn tick(&mut self, input: &InputState, dt: f32) {
        if self.disposed {
            return;
        }
        self.elapsed += dt;

        let mut fired = Vec::new();
        self.timers.advance(self.elapsed, &mut fired);
        for timer in fired {
            match timer {
                TycoonTimer::Income => self.income_tick(),
                TycoonTimer::Sparkle => self.sparkle(),
                TycoonTimer::Complete => self.events.push(SimEvent::Completed),
            }
        }

        // Edge-detect the polled cursor/buy input
        let left = input.left && !self.prev_left;
        let right = input.right && !self.prev_right;
        let fire = input.fire && !self.prev_fire;
        self.prev_left = input.left;
        self.prev_right = input.right;
        self.prev_fire = input.fire;

        if self.outcome.is_some() {
            return;
        }

        if left {
            self.selected = self.selected.saturating_sub(1);
        }
        if right {
            self.selected = (self.selected + 1).min(self.plots.len().saturating_sub(1));
        }
        if fire {
            self.try_upgrade(self.selected);
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
        self.disposed = true;
    }
}
