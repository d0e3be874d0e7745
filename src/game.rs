//! Reference driver: play one board to the end with a given strategy.

use std::time::{Duration, Instant};

use crate::engine::{Board, RandomBound, Score, Tile};
use crate::render::BoardRenderer;
use crate::search::Strategy;

/// Knobs for [`play`].
///
/// - `max_steps`: stop after this many moves (None plays until no move is left).
/// - `max_reshuffles`: how many fresh boards to try when the opening position has no move.
/// - `render_moves`: also render the board after every move.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub max_steps: Option<u64>,
    pub max_reshuffles: u32,
    pub render_moves: bool,
}

impl Default for GameConfig {
    fn default() -> Self { Self { max_steps: None, max_reshuffles: 10, render_moves: false } }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameSummary {
    pub score: Score,
    pub steps: u64,
    pub highest_tile: Tile,
    pub reshuffles: u32,
    pub elapsed: Duration,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("no opening move after {attempts} reshuffles")]
    Stuck { attempts: u32 },
}

/// Ask `strategy` for moves and apply them to `board` until none is left or
/// the step cap is hit.
///
/// If the very first request finds no move, the board is rendered, reshuffled
/// and retried, up to `cfg.max_reshuffles` times.
///
/// ```
/// use exponentile::engine::Board;
/// use exponentile::game::{play, GameConfig};
/// use exponentile::render::NullRenderer;
/// use exponentile::search::RandomStrategy;
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mut rng = StdRng::seed_from_u64(10);
/// let mut board = Board::new(8, &mut rng);
/// let mut strategy = RandomStrategy::with_rng(StdRng::seed_from_u64(11));
/// let cfg = GameConfig { max_steps: Some(20), ..Default::default() };
/// let summary = play(&mut board, &mut strategy, &mut rng, &mut NullRenderer, &cfg).unwrap();
/// assert!(summary.steps <= 20);
/// assert_eq!(summary.score, board.score());
/// ```
pub fn play<S, R>(
    board: &mut Board,
    strategy: &mut S,
    rng: &mut R,
    renderer: &mut dyn BoardRenderer,
    cfg: &GameConfig,
) -> Result<GameSummary, GameError>
where
    S: Strategy + ?Sized,
    R: RandomBound + ?Sized,
{
    let start = Instant::now();
    let mut reshuffles = 0u32;
    let mut steps = 0u64;
    loop {
        if cfg.max_steps.is_some_and(|limit| steps >= limit) {
            break;
        }
        let Some(mv) = strategy.next_move(board) else {
            if steps > 0 {
                break;
            }
            log::debug!("no opening move, reshuffling ({reshuffles} so far)");
            renderer.render(board);
            if reshuffles >= cfg.max_reshuffles {
                return Err(GameError::Stuck { attempts: reshuffles });
            }
            board.reshuffle(rng);
            reshuffles += 1;
            continue;
        };
        board.apply_move(mv, rng);
        steps += 1;
        if cfg.render_moves {
            renderer.render(board);
        }
    }
    Ok(GameSummary {
        score: board.score(),
        steps,
        highest_tile: board.highest_tile(),
        reshuffles,
        elapsed: start.elapsed(),
    })
}
