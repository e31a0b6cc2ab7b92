use anyhow::{bail, Context};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rand::{rngs::StdRng, SeedableRng};
use rollout_2048::engine::Grid;
use rollout_2048::montecarlo::{MoveSearch, SearchConfig};
use std::io::{self, BufRead, Write};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "rollout-2048", about = "Monte Carlo 2048 move advisor")]
struct Args {
    /// Initial grid: 16 comma-separated values, left to right, top to bottom
    #[arg(long, conflicts_with = "new_game")]
    board: Option<String>,

    /// Start from an empty grid with two random tiles instead of reading one
    #[arg(long)]
    new_game: bool,

    /// Simulation time per move in milliseconds
    #[arg(long)]
    budget_ms: Option<u64>,

    /// Worker threads for the search (default: all cores)
    #[arg(long)]
    threads: Option<usize>,

    /// Seed for tile spawns and search RNGs
    #[arg(long)]
    seed: Option<u64>,

    /// Random games played after each candidate move
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(1..))]
    playouts: u32,

    /// Random directions tried per cycle before a random game ends
    #[arg(long, default_value_t = 50)]
    attempts: u32,

    /// Stop after this many moves
    #[arg(long)]
    steps: Option<u64>,

    /// Show a status line instead of printing every grid
    #[arg(long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut grid = if args.new_game {
        Grid::EMPTY.with_random_tile(&mut rng).with_random_tile(&mut rng)
    } else {
        let text = match &args.board {
            Some(text) => text.clone(),
            None => prompt("Enter board state separated by comma, left to right, top to bottom:\n")?,
        };
        parse_grid(&text).context("Could not parse board state")?
    };
    let budget_ms = match args.budget_ms {
        Some(ms) => ms,
        None => prompt("Enter simulation time per move in ms: ")?
            .trim()
            .parse::<u64>()
            .context("Could not parse simulation time")?,
    };

    let cfg = SearchConfig {
        playouts_per_trial: args.playouts,
        max_move_attempts: args.attempts,
        threads: args.threads,
        seed: args.seed,
    };
    let mut search = MoveSearch::with_config(cfg)?;

    let pb = if args.quiet {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner} {elapsed_precise} | Moves: {msg}")?
                .tick_chars("⠁⠃⠇⠧⠷⠿⠻⠟⠯⠷⠧⠇⠃"),
        );
        pb.enable_steady_tick(Duration::from_millis(120));
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();
    let mut move_count: u64 = 0;
    loop {
        if pb.is_none() {
            println!("Current board");
            println!("{grid}");
        }
        let Some(dir) = search.choose_move(&grid, budget_ms) else { break };
        if pb.is_none() {
            println!("Direction: {dir}");
            println!("-------------");
        }
        if !grid.apply_move(dir) {
            break;
        }
        grid.spawn_random_tile(&mut rng);
        move_count += 1;
        if let Some(pb) = &pb {
            let rate = move_count as f64 / start.elapsed().as_secs_f64().max(1e-6);
            pb.set_message(format!("{} | moves/sec: {:.1} | highest tile: {}", move_count, rate, grid.highest_tile()));
        }
        if args.steps.is_some_and(|limit| move_count >= limit) {
            break;
        }
    }

    if let Some(pb) = pb { pb.finish_and_clear(); }
    if args.quiet {
        println!("{grid}");
    }
    println!("Game finished");
    println!("Moves: {} | highest tile: {}", move_count, grid.highest_tile());
    Ok(())
}

fn prompt(message: &str) -> anyhow::Result<String> {
    print!("{message}");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line).context("failed to read from stdin")?;
    Ok(line)
}

/// Parse 16 comma-separated integers, row-major.
fn parse_grid(text: &str) -> anyhow::Result<Grid> {
    let values = text
        .trim()
        .split(',')
        .map(|v| v.trim().parse::<u32>().with_context(|| format!("invalid cell value {v:?}")))
        .collect::<anyhow::Result<Vec<u32>>>()?;
    if values.len() != 16 {
        bail!("expected 16 values, got {}", values.len());
    }
    Ok(Grid::from_flat_sequence(&values)?)
}
