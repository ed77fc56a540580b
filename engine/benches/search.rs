use criterion::{black_box, criterion_group, criterion_main, Criterion};
use futures::executor::block_on;
use minimax_chess::{best_moves, find_ai_move, rate_at_depth, Board, MaterialRater};

pub fn benchmark_search(c: &mut Criterion) {
    let board = Board::initial();

    c.bench_function("best moves early game depth 2", |b| {
        b.iter(|| {
            best_moves(
                black_box(&board),
                &rate_at_depth(MaterialRater::CHAMPION, 1),
            )
        })
    });

    c.bench_function("find ai move early game depth 2", |b| {
        b.iter(|| {
            block_on(find_ai_move(
                black_box(&board),
                MaterialRater::CHAMPION,
                2,
                0.0,
            ))
        })
    });
}

criterion_group!(benches, benchmark_search);
criterion_main!(benches);
