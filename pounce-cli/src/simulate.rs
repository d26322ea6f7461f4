//! Simulate command - autopilot hunters against the computer evader
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: build_config(), play_games(), report_results()
//! - Level 3: play_single_game(), compute_statistics()
//! - Level 4: formatting utilities

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use pounce_core::{
    play_out, Difficulty, Engine, EvaderControl, GameConfig, GameOutcome, HunterAutopilot, Reach, Winner,
};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct SimulateArgs {
    /// Number of games to play
    #[arg(long, default_value = "10")]
    pub games: usize,

    /// Difficulty tier, 1 (smallest evader) to 5
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    pub difficulty: Option<u8>,

    /// Evader reach tier, 1 (short) to 3 (long)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=3))]
    pub reach: Option<u8>,

    /// Base configuration JSON file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Maximum hunter turns per game
    #[arg(long, default_value = "100")]
    pub max_rounds: u32,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug)]
struct GameRecord {
    game_number: usize,
    winner: Option<Winner>,
    rounds: u32,
    captures: u32,
    longest_chain: u32,
    camping_removals: u32,
}

/// Aggregated simulation results
#[derive(Clone, Debug)]
struct SimulationResults {
    games: Vec<GameRecord>,
    evader_wins: usize,
    hunter_wins: usize,
    unfinished: usize,
    avg_rounds: f32,
    avg_chain: f32,
    camping_removals: u32,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run simulate command
///
/// 1. Build the game configuration
/// 2. Play every game
/// 3. Report results
pub fn run(args: SimulateArgs, seed: Option<u64>) -> Result<()> {
    let config = build_config(&args)?;

    tracing::info!(
        "Starting simulation: {} games, difficulty={:?}, reach={:?}",
        args.games,
        config.difficulty,
        config.reach
    );

    let results = play_games(&config, &args, seed);

    report_results(&results, &args);

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Load the base config and apply tier overrides
fn build_config(args: &SimulateArgs) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => GameConfig::default(),
    };
    // Simulations always drive the evader with the planner
    config.evader_control = EvaderControl::Computer;

    if let Some(level) = args.difficulty {
        let tier = Difficulty::from_level(level).context("Unknown difficulty tier")?;
        config = config.with_difficulty(tier);
    }
    if let Some(level) = args.reach {
        let tier = Reach::from_level(level).context("Unknown reach tier")?;
        config = config.with_reach(tier);
    }
    Ok(config)
}

/// Play all games, each with its own seed drawn from the master RNG
fn play_games(config: &GameConfig, args: &SimulateArgs, seed: Option<u64>) -> SimulationResults {
    let mut rng = create_rng(seed);
    let autopilot = HunterAutopilot::default();
    let mut games = Vec::with_capacity(args.games);

    for game_num in 0..args.games {
        let game_seed: u64 = rng.gen();
        let record = play_single_game(config, &autopilot, game_num + 1, args.max_rounds, game_seed);

        tracing::info!(
            "Game {}: {} ({} rounds)",
            record.game_number,
            winner_label(record.winner),
            record.rounds
        );

        games.push(record);
    }

    compute_statistics(games)
}

/// Report simulation results
fn report_results(results: &SimulationResults, args: &SimulateArgs) {
    if args.json {
        print_json_results(results);
    } else {
        print_text_results(results);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn play_single_game(
    config: &GameConfig,
    autopilot: &HunterAutopilot,
    game_number: usize,
    max_rounds: u32,
    seed: u64,
) -> GameRecord {
    let mut engine = Engine::with_seed(config.clone(), seed);
    let outcome = play_out(&mut engine, autopilot, max_rounds);
    record_from(game_number, &outcome)
}

fn record_from(game_number: usize, outcome: &GameOutcome) -> GameRecord {
    GameRecord {
        game_number,
        winner: outcome.winner,
        rounds: outcome.rounds,
        captures: outcome.stats.capture_chains.iter().sum(),
        longest_chain: outcome.stats.longest_chain(),
        camping_removals: outcome.stats.camping_removals,
    }
}

/// Compute aggregate statistics from game records
fn compute_statistics(games: Vec<GameRecord>) -> SimulationResults {
    let evader_wins = games.iter().filter(|g| g.winner == Some(Winner::Evader)).count();
    let hunter_wins = games.iter().filter(|g| g.winner == Some(Winner::Hunters)).count();
    let unfinished = games.iter().filter(|g| g.winner.is_none()).count();

    let total_rounds: u32 = games.iter().map(|g| g.rounds).sum();
    let total_captures: u32 = games.iter().map(|g| g.captures).sum();
    let (avg_rounds, avg_chain) = if games.is_empty() {
        (0.0, 0.0)
    } else {
        let n = games.len() as f32;
        (total_rounds as f32 / n, total_captures as f32 / n)
    };

    SimulationResults {
        camping_removals: games.iter().map(|g| g.camping_removals).sum(),
        games,
        evader_wins,
        hunter_wins,
        unfinished,
        avg_rounds,
        avg_chain,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Create RNG from seed or random
fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn winner_label(winner: Option<Winner>) -> &'static str {
    match winner {
        Some(Winner::Evader) => "evader",
        Some(Winner::Hunters) => "hunters",
        None => "unfinished",
    }
}

fn percent(count: usize, total: usize) -> f32 {
    if total > 0 {
        count as f32 / total as f32 * 100.0
    } else {
        0.0
    }
}

/// Print results as JSON
fn print_json_results(results: &SimulationResults) {
    #[derive(serde::Serialize)]
    struct JsonGame {
        game_number: usize,
        winner: &'static str,
        rounds: u32,
        captures: u32,
        longest_chain: u32,
        camping_removals: u32,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        total_games: usize,
        evader_wins: usize,
        hunter_wins: usize,
        unfinished: usize,
        avg_rounds: f32,
        avg_captures_per_game: f32,
        camping_removals: u32,
        games: Vec<JsonGame>,
    }

    let output = JsonOutput {
        total_games: results.games.len(),
        evader_wins: results.evader_wins,
        hunter_wins: results.hunter_wins,
        unfinished: results.unfinished,
        avg_rounds: results.avg_rounds,
        avg_captures_per_game: results.avg_chain,
        camping_removals: results.camping_removals,
        games: results
            .games
            .iter()
            .map(|g| JsonGame {
                game_number: g.game_number,
                winner: winner_label(g.winner),
                rounds: g.rounds,
                captures: g.captures,
                longest_chain: g.longest_chain,
                camping_removals: g.camping_removals,
            })
            .collect(),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

/// Print results as text
fn print_text_results(results: &SimulationResults) {
    let total = results.games.len();

    println!("\n=== Simulation Results ===");
    println!("Total games:   {}", total);
    println!(
        "Evader wins:   {} ({:.1}%)",
        results.evader_wins,
        percent(results.evader_wins, total)
    );
    println!(
        "Hunter wins:   {} ({:.1}%)",
        results.hunter_wins,
        percent(results.hunter_wins, total)
    );
    println!(
        "Unfinished:    {} ({:.1}%)",
        results.unfinished,
        percent(results.unfinished, total)
    );
    println!("Avg rounds:    {:.1}", results.avg_rounds);
    println!("Avg captures:  {:.2}", results.avg_chain);
    println!("Camping outs:  {}", results.camping_removals);

    println!("\nGame details:");
    for game in &results.games {
        println!(
            "  Game {}: {} in {} rounds (longest chain {})",
            game.game_number,
            winner_label(game.winner),
            game.rounds,
            game.longest_chain
        );
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn record(winner: Option<Winner>, rounds: u32, captures: u32) -> GameRecord {
        GameRecord {
            game_number: 1,
            winner,
            rounds,
            captures,
            longest_chain: captures,
            camping_removals: 1,
        }
    }

    #[test]
    fn test_compute_statistics_empty() {
        let results = compute_statistics(vec![]);
        assert_eq!(results.evader_wins, 0);
        assert_eq!(results.hunter_wins, 0);
        assert_eq!(results.unfinished, 0);
        assert_eq!(results.avg_rounds, 0.0);
    }

    #[test]
    fn test_compute_statistics() {
        let games = vec![
            record(Some(Winner::Evader), 10, 5),
            record(Some(Winner::Hunters), 20, 1),
            record(None, 30, 0),
        ];
        let results = compute_statistics(games);
        assert_eq!(results.evader_wins, 1);
        assert_eq!(results.hunter_wins, 1);
        assert_eq!(results.unfinished, 1);
        assert_eq!(results.avg_rounds, 20.0);
        assert_eq!(results.avg_chain, 2.0);
        assert_eq!(results.camping_removals, 3);
    }

    #[test]
    fn test_seeded_games_repeat() {
        let config = GameConfig::default();
        let autopilot = HunterAutopilot::default();
        let a = play_single_game(&config, &autopilot, 1, 20, 99);
        let b = play_single_game(&config, &autopilot, 1, 20, 99);
        assert_eq!(a.winner, b.winner);
        assert_eq!(a.rounds, b.rounds);
        assert_eq!(a.captures, b.captures);
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(1, 4), 25.0);
        assert_eq!(percent(3, 0), 0.0);
    }
}
