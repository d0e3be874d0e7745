use clap::Parser;
use exponentile::engine::Board;
use exponentile::game::{self, GameConfig, GameError, GameSummary};
use exponentile::render::NullRenderer;
use exponentile::search::{Lookahead, LookaheadConfig, RandomStrategy, Strategy};
use indicatif::{ProgressBar, ProgressStyle};
use rand::{rngs::StdRng, SeedableRng};
use rayon::prelude::*;
use std::time::{Duration, Instant};

#[derive(Debug, Parser)]
#[command(name = "batch", about = "Play many independent exponentile games in parallel")]
struct Args {
    /// Number of games to play
    #[arg(long, default_value_t = 1000)]
    games: u64,

    /// Worker threads (default: half the available cores)
    #[arg(long)]
    threads: Option<usize>,

    /// Board side length (0 uses the default of 8)
    #[arg(long, default_value_t = 8)]
    size: usize,

    /// Lookahead depth
    #[arg(long, default_value_t = 2)]
    depth: usize,

    /// Pick moves at random instead of searching
    #[arg(long)]
    random: bool,

    /// Base seed; game i uses seed + i
    #[arg(long)]
    seed: Option<u64>,

    /// Per-game: stop after this many moves
    #[arg(long)]
    steps: Option<u64>,

    /// Suppress the progress bar and per-game lines
    #[arg(long)]
    quiet: bool,
}

fn default_threads() -> usize {
    std::thread::available_parallelism().map(|n| (n.get() / 2).max(1)).unwrap_or(1)
}

fn run_one(args: &Args, seed: u64) -> Result<GameSummary, GameError> {
    let mut rng = StdRng::seed_from_u64(seed);
    // Keep the strategy's draws apart from the board's refills.
    let strategy_rng = StdRng::seed_from_u64(seed.rotate_left(32) ^ 0x9E37_79B9_7F4A_7C15);
    let mut strategy: Box<dyn Strategy> = if args.random {
        Box::new(RandomStrategy::with_rng(strategy_rng))
    } else {
        Box::new(Lookahead::with_config(LookaheadConfig { depth: args.depth }, strategy_rng))
    };
    let mut board = Board::new(args.size, &mut rng);
    let cfg = GameConfig { max_steps: args.steps, ..Default::default() };
    game::play(&mut board, &mut strategy, &mut rng, &mut NullRenderer, &cfg)
}

fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("warn"));
    let args = Args::parse();

    let threads = args.threads.unwrap_or_else(default_threads);
    let base_seed = args.seed.unwrap_or_else(rand::random);
    log::info!("{} games on {} threads, base seed {}", args.games, threads, base_seed);
    let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;

    let pb = if !args.quiet {
        let pb = ProgressBar::new(args.games);
        pb.set_style(
            ProgressStyle::with_template("{spinner} {elapsed_precise} [{bar:40}] {pos}/{len} | {msg}")?
                .tick_chars("⠁⠃⠇⠧⠷⠿⠻⠟⠯⠷⠧⠇⠃"),
        );
        pb.enable_steady_tick(Duration::from_millis(120));
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();
    let results: Vec<(u64, Result<GameSummary, GameError>)> = pool.install(|| {
        (0..args.games)
            .into_par_iter()
            .map(|i| {
                let res = run_one(&args, base_seed.wrapping_add(i));
                if let Some(pb) = &pb {
                    if let Ok(s) = &res {
                        pb.set_message(format!("last score: {}", s.score));
                    }
                    pb.inc(1);
                }
                (i, res)
            })
            .collect()
    });
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    let elapsed = start.elapsed().as_secs_f64().max(1e-6);

    let mut finished: Vec<GameSummary> = Vec::with_capacity(results.len());
    let mut stuck = 0u64;
    for (i, res) in results {
        match res {
            Ok(s) => {
                if !args.quiet {
                    println!(
                        "game {:>5} | moves: {:>6} | score: {:>10} | highest tile: {:>7} | reshuffles: {}",
                        i, s.steps, s.score, s.highest_tile, s.reshuffles
                    );
                }
                finished.push(s);
            }
            Err(e) => {
                log::warn!("game {i}: {e}");
                stuck += 1;
            }
        }
    }

    if finished.is_empty() {
        anyhow::bail!("no game finished ({stuck} stuck)");
    }
    let scores = finished.iter().map(|s| s.score);
    let min = scores.clone().min().unwrap_or(0);
    let max = scores.clone().max().unwrap_or(0);
    let mean = scores.map(|s| s as f64).sum::<f64>() / finished.len() as f64;
    let best_tile = finished.iter().map(|s| s.highest_tile).max().unwrap_or(0);
    let total_moves: u64 = finished.iter().map(|s| s.steps).sum();
    println!(
        "Games: {} ({} stuck) | score min/mean/max: {}/{:.1}/{} | best tile: {} | moves/sec: {:.1}",
        finished.len(),
        stuck,
        min,
        mean,
        max,
        best_tile,
        total_moves as f64 / elapsed
    );
    Ok(())
}
