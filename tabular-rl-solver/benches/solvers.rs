use criterion::{black_box, criterion_group, criterion_main, Criterion};

use tabular_rl_env::{GridMdp, GridPos};
use tabular_rl_solver::{best_policy, value_iteration, DEFAULT_TOLERANCE};

fn four_by_three() -> GridMdp {
    GridMdp::new(
        vec![
            vec![Some(-0.04), Some(-0.04), Some(-0.04), Some(1.0)],
            vec![Some(-0.04), None, Some(-0.04), Some(-1.0)],
            vec![Some(-0.04), Some(-0.04), Some(-0.04), Some(-0.04)],
        ],
        [GridPos::new(3, 2), GridPos::new(3, 1)],
        GridPos::new(0, 0),
        0.9,
    )
    .unwrap()
}

fn bench_solvers(c: &mut Criterion) {
    let grid = four_by_three();

    c.bench_function("value_iteration_4x3", |b| {
        b.iter(|| value_iteration(black_box(&grid), DEFAULT_TOLERANCE).unwrap());
    });

    let utility = value_iteration(&grid, DEFAULT_TOLERANCE).unwrap();
    c.bench_function("best_policy_4x3", |b| {
        b.iter(|| best_policy(black_box(&grid), black_box(&utility)).unwrap());
    });
}

criterion_group!(benches, bench_solvers);
criterion_main!(benches);
