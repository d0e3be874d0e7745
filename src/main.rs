use clap::Parser;
use exponentile::engine::Board;
use exponentile::game::{self, GameConfig};
use exponentile::render::{BoardRenderer, ConsoleRenderer, LogRenderer};
use exponentile::search::{Lookahead, LookaheadConfig, RandomStrategy, Strategy};
use rand::{rngs::StdRng, SeedableRng};

#[derive(Debug, Parser)]
#[command(name = "exponentile", about = "Play one exponentile game and print the board as it goes")]
struct Args {
    /// Board side length (0 uses the default of 8)
    #[arg(long, default_value_t = 8)]
    size: usize,

    /// Lookahead depth
    #[arg(long, default_value_t = 2)]
    depth: usize,

    /// Pick moves at random instead of searching
    #[arg(long)]
    random: bool,

    /// Seed for reproducible games
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many moves
    #[arg(long)]
    steps: Option<u64>,

    /// Only print the final board and score (per-move boards go to the debug log)
    #[arg(long)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    let args = Args::parse();

    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("seed {seed}");
    let mut rng = StdRng::seed_from_u64(seed);
    let strategy_rng = StdRng::seed_from_u64(seed.wrapping_add(1));
    let mut strategy: Box<dyn Strategy> = if args.random {
        Box::new(RandomStrategy::with_rng(strategy_rng))
    } else {
        Box::new(Lookahead::with_config(LookaheadConfig { depth: args.depth }, strategy_rng))
    };

    let mut board = Board::new(args.size, &mut rng);
    let mut renderer: Box<dyn BoardRenderer> = if args.quiet {
        Box::new(LogRenderer::default())
    } else {
        println!("{board}");
        Box::new(ConsoleRenderer)
    };
    let cfg = GameConfig { max_steps: args.steps, render_moves: true, ..Default::default() };
    let summary = game::play(&mut board, &mut strategy, &mut rng, renderer.as_mut(), &cfg)?;

    if args.quiet {
        println!("{board}");
    }
    println!(
        "Moves made: {}, score: {}, highest tile: {}, ({:?})",
        summary.steps, summary.score, summary.highest_tile, summary.elapsed
    );
    Ok(())
}
