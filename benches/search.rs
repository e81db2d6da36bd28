use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use ur_arena::dice::Dice;
use ur_arena::expectimax::{Expectimax, SearchConfig};
use ur_arena::game::{GameState, apply_move, legal_moves, pass_turn};

/// Midgame positions reached by always playing the first legal move.
fn corpus() -> Vec<(GameState, u8)> {
    let mut rng = fastrand::Rng::with_seed(4242);
    let mut state = GameState::new();
    let mut positions = Vec::new();
    for _ in 0..48 {
        if state.is_over() {
            break;
        }
        let roll = Dice::STANDARD.roll(&mut rng);
        match legal_moves(&state, roll).get(0) {
            Some(piece) => {
                positions.push((state, roll));
                apply_move(&mut state, piece, roll);
            }
            None => pass_turn(&mut state),
        }
    }
    positions
}

fn bench_choose(c: &mut Criterion) {
    let positions = corpus();

    for depth in [1, 2] {
        let mut search = Expectimax::new(SearchConfig::depth(depth));
        c.bench_function(&format!("expectimax/choose_depth{depth}"), |b| {
            b.iter(|| {
                let mut acc = 0usize;
                for (state, roll) in &positions {
                    acc ^= search.choose(state, *roll).unwrap_or(0);
                }
                black_box(acc)
            })
        });
    }

    let mut par = Expectimax::new(SearchConfig::depth(2).with_parallel(true));
    c.bench_function("expectimax/choose_depth2_par", |b| {
        b.iter(|| {
            let mut acc = 0usize;
            for (state, roll) in &positions {
                acc ^= par.choose(state, *roll).unwrap_or(0);
            }
            black_box(acc)
        })
    });
}

criterion_group!(benches, bench_choose);
criterion_main!(benches);
