//! Scheduled-timer registry
//!
//! Gameplay pacing (enemy volleys, income ticks, delayed completion) runs on
//! timers owned by the simulation instance, evaluated against
//! simulation-elapsed time. A one-shot entry fires at most once and is then
//! discarded; a repeating entry fires every period until cancelled. `clear`
//! invalidates every outstanding handle synchronously, so nothing can fire
//! against a disposed instance.

use serde::{Deserialize, Serialize};

pub type TimerId = u32;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TimerEntry<A> {
    id: TimerId,
    fire_at: f32,
    period: Option<f32>,
    action: A,
}

/// Timer registry generic over a per-simulation action enum
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerRegistry<A> {
    entries: Vec<TimerEntry<A>>,
    next_id: TimerId,
}

impl<A> Default for TimerRegistry<A> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }
}

impl<A: Copy> TimerRegistry<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a one-shot timer `delay` seconds from `now`
    pub fn once(&mut self, now: f32, delay: f32, action: A) -> TimerId {
        self.push(now + delay, None, action)
    }

    /// Schedule a repeating timer firing every `period` seconds from `now`
    pub fn every(&mut self, now: f32, period: f32, action: A) -> TimerId {
        self.push(now + period, Some(period), action)
    }

    fn push(&mut self, fire_at: f32, period: Option<f32>, action: A) -> TimerId {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(TimerEntry {
            id,
            fire_at,
            period,
            action,
        });
        id
    }

    /// Cancel a timer by handle. Returns false if it already fired or was
    /// cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Drop every outstanding timer. Called at teardown and on terminal
    /// transitions.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Collect every action due at `now` into `fired`, in firing order.
    ///
    /// A repeating timer that fell more than one period behind fires once per
    /// elapsed period, so a large tick cannot swallow income or volley beats.
    pub fn advance(&mut self, now: f32, fired: &mut Vec<A>) {
        // (fire_at, insertion id) orders simultaneous firings deterministically
        let mut due: Vec<(f32, TimerId, A)> = Vec::new();

        for entry in &mut self.entries {
            while entry.fire_at <= now {
                due.push((entry.fire_at, entry.id, entry.action));
                match entry.period {
                    Some(period) => entry.fire_at += period,
                    None => break,
                }
            }
        }

        self.entries
            .retain(|e| e.period.is_some() || e.fire_at > now);

        due.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal).then(a.1.cmp(&b.1)));
        fired.extend(due.into_iter().map(|(_, _, a)| a));
    }
}
