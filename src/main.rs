//! Game Portal headless driver
//!
//! Mounts each minigame in turn and autoplays it with a scripted policy at
//! the fixed timestep. No renderer, just the session/simulation/callback
//! path end to end. Results land in the local best-times board and the mock
//! backend.
//!
//! Usage: `game-portal [obby|battle|racing|tycoon ...]` (default: all modes)

use std::cell::Cell;
use std::env;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use game_portal::api::{ApiError, Deferred, MockApi};
use game_portal::consts::SIM_DT;
use game_portal::sim::{
    BattleSim, InputState, Minigame, ObbySim, Outcome, RacingSim, TycoonSim,
};
use game_portal::{GameMode, HighScores, Session, Tuning};

struct PlayResult {
    outcome: Option<Outcome>,
    /// Seconds from mount to the terminal transition (or to timeout)
    time_secs: f32,
}

fn main() {
    env_logger::init();

    let tuning = match env::var("GAME_PORTAL_TUNING") {
        Ok(path) => Tuning::load(PathBuf::from(path).as_path()).unwrap_or_else(|err| {
            log::warn!("Falling back to default tuning: {err}");
            Tuning::default()
        }),
        Err(_) => Tuning::default(),
    };

    let modes = parse_modes();
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let mut api = MockApi::new();
    let pending = api.game_list();
    let catalog = await_response(&mut api, pending).expect("mock catalog is infallible");
    println!("=== Game Portal ===");
    for game in &catalog {
        println!("  {:<22} [{}] {} players", game.name, game.difficulty, game.total_players);
    }
    println!();

    let scores_path = env::var("GAME_PORTAL_SCORES")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("best_times.json"));
    let mut scores = HighScores::load(&scores_path);

    for mode in modes {
        let result = autoplay(mode, seed, &tuning);
        let won = result.outcome == Some(Outcome::Won);

        match result.outcome {
            Some(Outcome::Won) => {
                println!("{:<14} won in {:.1}s", mode.title(), result.time_secs);
                if let Some(rank) = scores.add_time(mode, result.time_secs) {
                    println!("{:<14} new best-time rank #{rank}", "");
                }
            }
            Some(Outcome::Lost) => {
                println!("{:<14} lost after {:.1}s", mode.title(), result.time_secs)
            }
            None => println!("{:<14} timed out after {:.0}s", mode.title(), result.time_secs),
        }

        let pending = api.record_result(mode, won, result.time_secs);
        match await_response(&mut api, pending) {
            Ok(stats) => log::info!(
                "Recorded {}: {} wins / {} played",
                mode.game_id(),
                stats.total_wins,
                stats.total_games_played
            ),
            Err(err) => log::warn!("Failed to record result: {err}"),
        }
    }

    if let Err(err) = scores.save(&scores_path) {
        log::warn!("Could not save best times: {err}");
    }

    println!("\n=== Leaderboard ===");
    let pending = api.leaderboard();
    if let Ok(rows) = await_response(&mut api, pending) {
        for row in rows {
            println!("  #{} {:<16} {} wins (lv {})", row.rank, row.username, row.wins, row.level);
        }
    }
}

fn parse_modes() -> Vec<GameMode> {
    let requested: Vec<GameMode> = env::args()
        .skip(1)
        .filter_map(|arg| match arg.to_lowercase().as_str() {
            "obby" => Some(GameMode::Obby),
            "battle" => Some(GameMode::Battle),
            "racing" => Some(GameMode::Racing),
            "tycoon" => Some(GameMode::Tycoon),
            other => {
                log::warn!("Unknown mode '{other}' ignored");
                None
            }
        })
        .collect();

    if requested.is_empty() {
        GameMode::all().to_vec()
    } else {
        requested
    }
}

/// Spin the mock API clock until a deferred response lands
fn await_response<T>(api: &mut MockApi, mut pending: Deferred<T>) -> Result<T, ApiError> {
    loop {
        if let Some(result) = pending.try_take(api.now()) {
            return result;
        }
        api.advance(SIM_DT);
    }
}

fn autoplay(mode: GameMode, seed: u64, tuning: &Tuning) -> PlayResult {
    match mode {
        GameMode::Obby => drive(ObbySim::new(tuning.obby), 120.0, obby_pilot()),
        GameMode::Battle => drive(BattleSim::new(seed, tuning.battle), 120.0, battle_pilot()),
        GameMode::Racing => drive(RacingSim::new(tuning.racing), 180.0, racing_pilot()),
        GameMode::Tycoon => drive(TycoonSim::new(seed, tuning.tycoon), 900.0, tycoon_pilot()),
    }
}

/// Tick a session under a scripted policy until its callback fires or the
/// timeout runs out
fn drive<G: Minigame>(
    game: G,
    timeout_secs: f32,
    mut pilot: impl FnMut(&mut G) -> InputState,
) -> PlayResult {
    let delivered = Rc::new(Cell::new(false));
    let on_complete = delivered.clone();
    let on_close = delivered.clone();

    let mut session = Session::new(game)
        .on_game_complete(move || on_complete.set(true))
        .on_close(move || on_close.set(true));

    let mut elapsed = 0.0f32;
    let mut terminal_at = None;

    while !session.finished() && elapsed < timeout_secs {
        let input = pilot(session.game_mut());
        session.tick(&input, SIM_DT);
        elapsed += SIM_DT;
        if terminal_at.is_none() && session.outcome().is_some() {
            terminal_at = Some(elapsed);
        }
    }

    PlayResult {
        outcome: session.outcome(),
        time_secs: terminal_at.unwrap_or(elapsed),
    }
}

/// Obby: hop along a fixed waypoint ladder up to the star
fn obby_pilot() -> impl FnMut(&mut ObbySim) -> InputState {
    // (target x, height the player must be at before advancing)
    const WAYPOINTS: [(f32, f32); 3] = [(600.0, 430.0), (750.0, 300.0), (680.0, f32::MAX)];
    let mut stage = 0usize;

    move |sim| {
        let (target_x, reach_y) = WAYPOINTS[stage.min(WAYPOINTS.len() - 1)];
        let dx = target_x - sim.player.pos.x;

        if stage + 1 < WAYPOINTS.len() && sim.on_ground && dx.abs() < 24.0 && sim.player.pos.y < reach_y
        {
            stage += 1;
        }

        InputState {
            left: dx < -8.0,
            right: dx > 8.0,
            up: sim.on_ground,
            ..Default::default()
        }
    }
}

/// Battle: keep firing and slide under the nearest enemy
fn battle_pilot() -> impl FnMut(&mut BattleSim) -> InputState {
    move |sim| {
        let nearest = sim
            .enemies
            .iter()
            .filter(|e| e.alive)
            .min_by(|a, b| {
                let da = (a.pos - sim.player.pos).length_squared();
                let db = (b.pos - sim.player.pos).length_squared();
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|e| e.pos);

        let dx = nearest.map(|p| p.x - sim.player.pos.x).unwrap_or(0.0);
        InputState {
            fire: true,
            left: dx < -12.0,
            right: dx > 12.0,
            up: sim.player.pos.y > 520.0,
            down: sim.player.pos.y < 480.0,
            ..Default::default()
        }
    }
}

/// Racing: full throttle toward the next unarmed gate
fn racing_pilot() -> impl FnMut(&mut RacingSim) -> InputState {
    move |sim| {
        let next = sim
            .checkpoints
            .iter()
            .position(|armed| !armed)
            .unwrap_or(0);
        let target = sim.track.checkpoints[next].center();

        let to = target - sim.car.pos;
        let desired = to.y.atan2(to.x);
        let mut diff = desired - sim.car.angle;
        while diff > std::f32::consts::PI {
            diff -= std::f32::consts::TAU;
        }
        while diff < -std::f32::consts::PI {
            diff += std::f32::consts::TAU;
        }

        InputState {
            up: true,
            left: diff < -0.05,
            right: diff > 0.05,
            ..Default::default()
        }
    }
}

/// Tycoon: greedily buy whatever is affordable, cheapest plot first
fn tycoon_pilot() -> impl FnMut(&mut TycoonSim) -> InputState {
    move |sim| {
        let affordable = (0..sim.plots.len())
            .filter(|&i| sim.plots[i].cost <= sim.money)
            .min_by_key(|&i| sim.plots[i].cost);
        if let Some(plot) = affordable {
            // Direct purchase path, the same one a UI button would use
            sim.try_upgrade(plot);
        }
        InputState::default()
    }
}
