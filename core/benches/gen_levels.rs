use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use runes_core::*;

fn bench_generate(c: &mut Criterion) {
    let generator = SeededLevelGenerator::from_config(&GameConfig::default());
    c.bench_function("generate_levels_1_to_50", |b| {
        b.iter(|| {
            for level in 1..=50 {
                black_box(generator.generate(black_box(level)));
            }
        })
    });

    let large = SeededLevelGenerator::new((64, 64), DemonPolicy::new(400), "ABC");
    c.bench_function("generate_64x64", |b| b.iter(|| black_box(large.generate(black_box(2000)))));
}

fn bench_summon(c: &mut Criterion) {
    let generator = SeededLevelGenerator::from_config(&GameConfig::default());
    let grids: Vec<_> = (1..=50).map(|level| generator.generate(level)).collect();
    c.bench_function("summon_every_rune", |b| {
        b.iter(|| {
            for grid in &grids {
                for rune in Rune::all() {
                    let mut grid = grid.clone();
                    black_box(summon(&mut grid, rune));
                }
            }
        })
    });
}

criterion_group!(benches, bench_generate, bench_summon);
criterion_main!(benches);
