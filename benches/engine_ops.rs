use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use game_2048::engine::{Board, Move, TileId};
use game_2048::game::GameState;
use rand::{rngs::StdRng, SeedableRng};
use std::hint::black_box;

fn corpus() -> Vec<Board> {
    let mut rng = StdRng::seed_from_u64(42);
    let mut boards = Vec::new();
    // Empty and two-tile starts
    boards.push(Board::EMPTY);
    let mut b = Board::EMPTY.with_random_tile(&mut rng, TileId(0)).with_random_tile(&mut rng, TileId(1));
    boards.push(b.clone());
    // Derive a variety of densities deterministically
    let seq = [Move::Left, Move::Up, Move::Right, Move::Down];
    for i in 0..20 {
        let (nb, _) = b.shift(seq[i % seq.len()]);
        if !nb.same_layout(&b) {
            b = nb.with_random_tile(&mut rng, TileId(i as u64 + 2));
        }
        boards.push(b.clone());
    }
    boards
}

fn bench_shift(c: &mut Criterion) {
    for dir in Move::ALL {
        c.bench_function(&format!("shift/{dir}"), |bch| {
            let boards = corpus();
            bch.iter(|| {
                let mut acc = 0u64;
                for bd in &boards {
                    acc ^= bd.shift(dir).1;
                }
                black_box(acc)
            })
        });
    }
}

fn bench_game_ops(c: &mut Criterion) {
    c.bench_function("board/with_random_tile", |bch| {
        bch.iter_batched(
            || (Board::EMPTY, StdRng::seed_from_u64(7)),
            |(mut bd, mut rng)| {
                for i in 0..16 {
                    bd = bd.with_random_tile(&mut rng, TileId(i));
                }
                black_box(bd)
            },
            BatchSize::SmallInput,
        )
    });
    c.bench_function("game/make_move_cycle", |bch| {
        bch.iter_batched(
            || {
                let mut rng = StdRng::seed_from_u64(9);
                (GameState::new_game(0, &mut rng), rng)
            },
            |(mut state, mut rng)| {
                for i in 0..64 {
                    state = state.make_move(Move::ALL[i % 4], &mut rng).state;
                }
                black_box(state)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_queries(c: &mut Criterion) {
    c.bench_function("query/has_possible_moves", |bch| {
        let boards = corpus();
        bch.iter(|| boards.iter().filter(|bd| bd.has_possible_moves()).count())
    });
    c.bench_function("query/highest_tile", |bch| {
        let boards = corpus();
        bch.iter(|| boards.iter().map(Board::highest_tile).max())
    });
}

criterion_group!(engine_ops, bench_shift, bench_game_ops, bench_queries);
criterion_main!(engine_ops);
