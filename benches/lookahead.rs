use criterion::{criterion_group, criterion_main, Criterion};
use exponentile::engine::Board;
use exponentile::search::{Lookahead, LookaheadConfig};
use rand::{rngs::StdRng, SeedableRng};
use std::hint::black_box;

fn corpus() -> Vec<Board> {
    let mut rng = StdRng::seed_from_u64(7777);
    (0..8).map(|_| Board::new(8, &mut rng)).collect()
}

fn bench_lookahead(c: &mut Criterion) {
    let boards = corpus();

    for depth in [1usize, 2] {
        let mut la = Lookahead::with_config(LookaheadConfig { depth }, StdRng::seed_from_u64(5));
        c.bench_function(&format!("lookahead/depth{depth}"), |bch| {
            bch.iter(|| {
                let mut acc = 0u64;
                for bd in &boards {
                    if let Some((_, score)) = la.best_move_with_score(bd) {
                        acc += score;
                    }
                }
                black_box(acc)
            })
        });
    }
}

criterion_group!(lookahead, bench_lookahead);
criterion_main!(lookahead);
