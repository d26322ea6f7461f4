//! Save-file commands: create a fresh game, inspect an existing one

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use pounce_core::{
    camping, save, Engine, GameConfig, GameState, PendingStep, Status, Turn, Winner,
};

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

#[derive(Args)]
pub struct NewArgs {
    /// Where to write the save file
    #[arg(long, short, value_name = "FILE")]
    pub output: PathBuf,

    /// Configuration JSON file (defaults apply to missing fields)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct InspectArgs {
    /// Save file to read
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Print the decoded state as JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// COMMANDS
// ============================================================================

pub fn run_new(args: NewArgs, seed: Option<u64>) -> Result<()> {
    let config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    let rng = match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    };
    let engine = Engine::new(config, rng);
    let blob = engine.serialize().context("Failed to encode new game")?;
    std::fs::write(&args.output, blob)
        .with_context(|| format!("Failed to write save: {}", args.output.display()))?;

    tracing::info!("Wrote new game to {}", args.output.display());
    Ok(())
}

pub fn run_inspect(args: InspectArgs) -> Result<()> {
    let state = load_state(&args.file)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        print!("{}", describe(&state));
    }
    Ok(())
}

// ============================================================================
// HELPERS
// ============================================================================

fn load_state(path: &Path) -> Result<GameState> {
    let blob = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read save: {}", path.display()))?;
    save::decode(&blob).with_context(|| format!("Failed to load save: {}", path.display()))
}

/// Human-readable summary of a saved game
fn describe(state: &GameState) -> String {
    let mut out = String::new();
    let config = state.config();

    let status = match (state.winner(), state.turn()) {
        (Some(Winner::Evader), _) => "evader won".to_string(),
        (Some(Winner::Hunters), _) => match state.winning_triple() {
            Some([a, b, c]) => format!("hunters won (triangle {a}, {b}, {c})"),
            None => "hunters won".to_string(),
        },
        (None, Turn::Evader) => "evader to move".to_string(),
        (None, Turn::Hunters) => format!("hunters to move ({} left)", state.hunters_to_act()),
    };
    out.push_str(&format!("Status:     {}\n", status));
    if let Some(step) = state.pending() {
        out.push_str(&format!("Pending:    {}\n", pending_label(step)));
    }
    out.push_str(&format!(
        "Config:     difficulty {:?}, reach {:?}, evader {:?}\n",
        config.difficulty, config.reach, config.evader_control
    ));

    let evader = state.evader();
    out.push_str(&format!(
        "Evader:     ({:.1}, {:.1}) size {:.0} range {:.0}\n",
        evader.position().x,
        evader.position().y,
        evader.body.size,
        evader.strike_range()
    ));

    out.push_str("Hunters:\n");
    for (i, hunter) in state.hunters().iter().enumerate() {
        let traits = hunter.traits();
        let warning = camping::warning(state, i).level();
        out.push_str(&format!(
            "  {} {} {:<9} ({:>6.1}, {:>6.1}) {:<13} camping {}\n",
            i,
            traits.symbol,
            traits.name,
            hunter.position().x,
            hunter.position().y,
            status_label(hunter.status),
            warning
        ));
    }

    let stats = state.stats();
    out.push_str(&format!(
        "Stats:      {} games, {} moves, {} chains (longest {}, avg {:.2}), {} camping, {} triangles\n",
        stats.games_started,
        stats.moves,
        stats.capture_chains.len(),
        stats.longest_chain(),
        stats.average_chain(),
        stats.camping_removals,
        stats.triangles_formed
    ));
    out.push_str(&format!("History:    {} turns recorded\n", state.history().turns_recorded()));
    out
}

fn status_label(status: Status) -> &'static str {
    match status {
        Status::Active => "active",
        Status::Incapacitated => "incapacitated",
        Status::Eliminated => "eliminated",
    }
}

fn pending_label(step: &PendingStep) -> String {
    match step {
        PendingStep::Thinking { .. } => "evader thinking".to_string(),
        PendingStep::EvaderMove => "evader move settling".to_string(),
        PendingStep::ChainStep { target } => format!("chain strike on hunter {target}"),
        PendingStep::AwaitingCaptureChoice { candidates } => {
            format!("capture choice between {candidates:?}")
        }
        PendingStep::HunterMove { hunter } => format!("hunter {hunter} move settling"),
    }
}
