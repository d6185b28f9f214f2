//! Mock backend collaborator
//!
//! The hub's "API service" is a stub: hard-coded catalog data returned after
//! an artificial delay. The delay runs on a clock the host advances alongside
//! the simulation, so nothing here blocks or touches wall time. Calls hand
//! back a [`Deferred`] that yields its result-or-error once the latency has
//! elapsed. The simulation core never depends on this module.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::portal::GameMode;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("unknown player: {0}")]
    UnknownPlayer(String),
    #[error("unknown item: {0}")]
    UnknownItem(String),
    #[error("insufficient coins: have {have}, need {need}")]
    InsufficientCoins { have: u64, need: u64 },
}

/// Simulated round-trip latencies, seconds
mod latency {
    pub const PLAYER_STATS: f32 = 0.5;
    pub const GAME_LIST: f32 = 0.2;
    pub const ACHIEVEMENTS: f32 = 0.25;
    pub const LEADERBOARD: f32 = 0.4;
    pub const GAME_STATS: f32 = 0.3;
    pub const PURCHASE: f32 = 1.0;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub user_id: String,
    pub username: String,
    pub display_name: String,
    pub total_wins: u32,
    pub total_games_played: u32,
    pub coins: u64,
    pub level: u32,
    pub experience: u64,
    pub join_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiniGameInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub mode: GameMode,
    pub difficulty: String,
    pub max_players: u32,
    /// Seconds
    pub average_play_time: u32,
    pub total_players: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Reward {
    Coins(u64),
    Cosmetic(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub name: String,
    pub description: String,
    pub unlocked: bool,
    pub progress: u32,
    pub max_progress: u32,
    pub reward: Reward,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub username: String,
    pub display_name: String,
    pub wins: u32,
    pub level: u32,
    pub score: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShopCategory {
    Cosmetic,
    Boost,
    Special,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopItem {
    pub id: String,
    pub name: String,
    pub price: u64,
    pub category: ShopCategory,
}

/// Per-mode record for one player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameStats {
    pub mode: GameMode,
    pub wins: u32,
    pub losses: u32,
    /// Fastest winning run, seconds
    pub best_time: Option<f32>,
    pub total_plays: u32,
    /// Percent
    pub win_rate: u32,
}

/// A response that becomes available once its latency elapses
#[derive(Debug, Clone)]
pub struct Deferred<T> {
    ready_at: f32,
    result: Option<Result<T, ApiError>>,
}

impl<T> Deferred<T> {
    pub fn is_ready(&self, now: f32) -> bool {
        now >= self.ready_at && self.result.is_some()
    }

    /// Take the result if the latency has elapsed; `None` while in flight
    pub fn try_take(&mut self, now: f32) -> Option<Result<T, ApiError>> {
        if now >= self.ready_at {
            self.result.take()
        } else {
            None
        }
    }
}

/// The stub backend. Owns the mock player and catalogs; mutating calls apply
/// their effect up front and only the response is delayed.
#[derive(Debug, Clone)]
pub struct MockApi {
    clock: f32,
    stats: PlayerStats,
    games: Vec<MiniGameInfo>,
    achievements: Vec<Achievement>,
    shop: Vec<ShopItem>,
    game_stats: Vec<GameStats>,
}

impl Default for MockApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            clock: 0.0,
            stats: PlayerStats {
                user_id: "12345".into(),
                username: "TestPlayer".into(),
                display_name: "Test Player".into(),
                total_wins: 42,
                total_games_played: 156,
                coins: 2500,
                level: 15,
                experience: 14_750,
                join_date: "2023-01-15".into(),
            },
            games: vec![
                MiniGameInfo {
                    id: "obby-1".into(),
                    name: "Mega Obby Challenge".into(),
                    description: "Navigate through challenging parkour platforms!".into(),
                    mode: GameMode::Obby,
                    difficulty: "Hard".into(),
                    max_players: 20,
                    average_play_time: 900,
                    total_players: 15_420,
                },
                MiniGameInfo {
                    id: "race-1".into(),
                    name: "Neon Speed Circuit".into(),
                    description: "Race the oval with speed boost pads!".into(),
                    mode: GameMode::Racing,
                    difficulty: "Medium".into(),
                    max_players: 8,
                    average_play_time: 300,
                    total_players: 8_945,
                },
                MiniGameInfo {
                    id: "battle-1".into(),
                    name: "Laser Tag Arena".into(),
                    description: "Intense arena battles against five hunters!".into(),
                    mode: GameMode::Battle,
                    difficulty: "Expert".into(),
                    max_players: 16,
                    average_play_time: 480,
                    total_players: 12_456,
                },
                MiniGameInfo {
                    id: "tycoon-1".into(),
                    name: "Robo Factory Tycoon".into(),
                    description: "Build and expand your manufacturing empire!".into(),
                    mode: GameMode::Tycoon,
                    difficulty: "Easy".into(),
                    max_players: 4,
                    average_play_time: 1800,
                    total_players: 6_789,
                },
            ],
            achievements: vec![
                Achievement {
                    id: "first-win".into(),
                    name: "First Victory".into(),
                    description: "Win your first game in any mode".into(),
                    unlocked: true,
                    progress: 1,
                    max_progress: 1,
                    reward: Reward::Coins(100),
                },
                Achievement {
                    id: "speed-demon".into(),
                    name: "Speed Demon".into(),
                    description: "Complete a racing track in under 2 minutes".into(),
                    unlocked: false,
                    progress: 3,
                    max_progress: 5,
                    reward: Reward::Cosmetic("speed-trail".into()),
                },
                Achievement {
                    id: "obby-master".into(),
                    name: "Obby Master".into(),
                    description: "Complete 50 obby levels without falling".into(),
                    unlocked: false,
                    progress: 23,
                    max_progress: 50,
                    reward: Reward::Coins(500),
                },
            ],
            shop: vec![
                ShopItem {
                    id: "neon-trail".into(),
                    name: "Neon Trail".into(),
                    price: 100,
                    category: ShopCategory::Cosmetic,
                },
                ShopItem {
                    id: "speed-boost".into(),
                    name: "Speed Boost".into(),
                    price: 50,
                    category: ShopCategory::Boost,
                },
                ShopItem {
                    id: "golden-crown".into(),
                    name: "Golden Crown".into(),
                    price: 500,
                    category: ShopCategory::Cosmetic,
                },
                ShopItem {
                    id: "shield-boost".into(),
                    name: "Protection Shield".into(),
                    price: 150,
                    category: ShopCategory::Boost,
                },
                ShopItem {
                    id: "rainbow-aura".into(),
                    name: "Rainbow Aura".into(),
                    price: 300,
                    category: ShopCategory::Special,
                },
            ],
            game_stats: Vec::new(),
        }
    }

    /// Advance the latency clock; the host calls this alongside its frame loop
    pub fn advance(&mut self, dt: f32) {
        self.clock += dt;
    }

    pub fn now(&self) -> f32 {
        self.clock
    }

    fn defer<T>(&self, latency: f32, result: Result<T, ApiError>) -> Deferred<T> {
        Deferred {
            ready_at: self.clock + latency,
            result: Some(result),
        }
    }

    pub fn player_stats(&self, user_id: &str) -> Deferred<PlayerStats> {
        let result = if user_id == self.stats.user_id {
            Ok(self.stats.clone())
        } else {
            Err(ApiError::UnknownPlayer(user_id.to_owned()))
        };
        self.defer(latency::PLAYER_STATS, result)
    }

    pub fn game_list(&self) -> Deferred<Vec<MiniGameInfo>> {
        self.defer(latency::GAME_LIST, Ok(self.games.clone()))
    }

    pub fn achievements(&self, user_id: &str) -> Deferred<Vec<Achievement>> {
        let result = if user_id == self.stats.user_id {
            Ok(self.achievements.clone())
        } else {
            Err(ApiError::UnknownPlayer(user_id.to_owned()))
        };
        self.defer(latency::ACHIEVEMENTS, result)
    }

    pub fn game_stats(&self, user_id: &str) -> Deferred<Vec<GameStats>> {
        let result = if user_id == self.stats.user_id {
            Ok(self.game_stats.clone())
        } else {
            Err(ApiError::UnknownPlayer(user_id.to_owned()))
        };
        self.defer(latency::GAME_STATS, result)
    }

    /// Global leaderboard: two mock rivals plus the mock player
    pub fn leaderboard(&self) -> Deferred<Vec<LeaderboardEntry>> {
        let rows = vec![
            LeaderboardEntry {
                rank: 1,
                username: "ProGamer123".into(),
                display_name: "Pro Gamer".into(),
                wins: 156,
                level: 25,
                score: 2340,
            },
            LeaderboardEntry {
                rank: 2,
                username: "SpeedRunner99".into(),
                display_name: "Speed Runner".into(),
                wins: 142,
                level: 23,
                score: 2195,
            },
            LeaderboardEntry {
                rank: 3,
                username: self.stats.username.clone(),
                display_name: self.stats.display_name.clone(),
                wins: self.stats.total_wins,
                level: self.stats.level,
                score: 1876,
            },
        ];
        self.defer(latency::LEADERBOARD, Ok(rows))
    }

    /// Buy a shop item, validating the coin balance. Returns the updated
    /// player stats.
    pub fn purchase(&mut self, item_id: &str) -> Deferred<PlayerStats> {
        let Some(item) = self.shop.iter().find(|i| i.id == item_id) else {
            return self.defer(
                latency::PURCHASE,
                Err(ApiError::UnknownItem(item_id.to_owned())),
            );
        };
        if self.stats.coins < item.price {
            return self.defer(
                latency::PURCHASE,
                Err(ApiError::InsufficientCoins {
                    have: self.stats.coins,
                    need: item.price,
                }),
            );
        }

        self.stats.coins -= item.price;
        log::info!("Purchased {} for {} coins", item.name, item.price);
        self.defer(latency::PURCHASE, Ok(self.stats.clone()))
    }

    /// Record a finished session: win/loss tallies, reward coins and
    /// experience, per-mode record. Returns the updated player stats.
    pub fn record_result(&mut self, mode: GameMode, won: bool, play_time: f32) -> Deferred<PlayerStats> {
        self.stats.total_games_played += 1;
        if won {
            self.stats.total_wins += 1;
            self.stats.coins += 50;
            self.stats.experience += 100;
        } else {
            self.stats.coins += 10;
            self.stats.experience += 25;
        }

        let idx = match self.game_stats.iter().position(|g| g.mode == mode) {
            Some(idx) => idx,
            None => {
                self.game_stats.push(GameStats {
                    mode,
                    wins: 0,
                    losses: 0,
                    best_time: None,
                    total_plays: 0,
                    win_rate: 0,
                });
                self.game_stats.len() - 1
            }
        };
        let entry = &mut self.game_stats[idx];
        entry.total_plays += 1;
        if won {
            entry.wins += 1;
            entry.best_time = Some(match entry.best_time {
                Some(best) => best.min(play_time),
                None => play_time,
            });
        } else {
            entry.losses += 1;
        }
        entry.win_rate = entry.wins * 100 / entry.total_plays;

        self.defer(latency::PLAYER_STATS, Ok(self.stats.clone()))
    }
}
