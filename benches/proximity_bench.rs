//! Performance benchmarks for the proximity tracker

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use kasane::cards::{CardRegistry, CardSample, EntitySnapshot};
use kasane::color::palette::{BLUE, GREEN, RED, YELLOW};
use kasane::color::{Color, MixingEngine, RuleSet};
use kasane::core::{EntityId, TrackerConfig, Vec3};
use kasane::tracker::{EffectPool, ProximityTracker};

/// Cards scattered over a 1m square table, colored with the four primaries
fn table(count: u64, seed: u64) -> (EntitySnapshot, CardRegistry) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let primaries = [RED, BLUE, GREEN, YELLOW];

    let snapshot: EntitySnapshot = (0..count)
        .map(|i| {
            let position = Vec3::new(rng.gen_range(0.0..1.0), 0.0, rng.gen_range(0.0..1.0));
            (EntityId(i), CardSample::tracked(position))
        })
        .collect();

    let mut cards = CardRegistry::new(0.0);
    cards.observe(0.0, &snapshot);
    for i in 0..count {
        cards.apply_color(EntityId(i), primaries[(i % 4) as usize], 0.0);
    }
    (snapshot, cards)
}

fn benchmark_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("tracker_evaluate");

    for count in [8u64, 32, 128].iter() {
        let (snapshot, cards) = table(*count, 42);
        let config = TrackerConfig {
            overlap_distance: 0.1,
            ..TrackerConfig::default()
        };
        let mut tracker = ProximityTracker::new(config, MixingEngine::default());
        let mut effects = EffectPool::new();
        let mut now = 0.0;

        group.bench_with_input(BenchmarkId::new("cards", count), count, |b, _| {
            b.iter(|| {
                now += 0.016;
                black_box(tracker.evaluate(now, &snapshot, &cards, &mut effects));
            });
        });
    }

    group.finish();
}

fn benchmark_resolve(c: &mut Criterion) {
    let table = RuleSet::Extended.table();
    let a = Color::rgb(0.3, 0.6, 0.9);

    c.bench_function("resolve_listed", |b| {
        b.iter(|| table.resolve(black_box(&RED), black_box(&BLUE)))
    });

    c.bench_function("resolve_average", |b| {
        b.iter(|| table.resolve(black_box(&a), black_box(&YELLOW)))
    });
}

criterion_group!(benches, benchmark_evaluate, benchmark_resolve);
criterion_main!(benches);
