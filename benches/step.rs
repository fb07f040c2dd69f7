//! Benchmarks for the per-frame step and startup work.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use handswarm::config::{ShapeConfig, SwarmConfig};
use handswarm::gesture::{GestureClassifier, GestureState};
use handswarm::landmarks::HandDetection;
use handswarm::particle::Motif;
use handswarm::shape::{ShapeField, ShapeStrategy};
use handswarm::simulation::Swarm;
use handswarm::time::FrameTime;

fn config(count: usize) -> SwarmConfig {
    SwarmConfig {
        shape: ShapeConfig {
            particle_count: count,
            outer_count: count * 3 / 4,
            seed: Some(42),
            ..Default::default()
        },
        ..Default::default()
    }
}

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("step");

    for gesture in [GestureState::None, GestureState::Open, GestureState::Fist] {
        group.bench_function(gesture.as_str(), |b| {
            let mut swarm = Swarm::new(&config(10_000));
            let mut frame = 0u64;
            b.iter(|| {
                frame += 1;
                black_box(swarm.step(gesture, FrameTime::at_rate(frame, 60.0)).len())
            })
        });
    }

    group.finish();
}

fn bench_step_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("step_scaling");

    for count in [1_000, 6_000, 10_000, 50_000] {
        group.bench_with_input(BenchmarkId::new("particles", count), &count, |b, &count| {
            let mut swarm = Swarm::new(&config(count));
            let mut frame = 0u64;
            b.iter(|| {
                frame += 1;
                black_box(swarm.step(GestureState::Fist, FrameTime::at_rate(frame, 60.0)).len())
            })
        });
    }

    group.finish();
}

fn bench_shape_field(c: &mut Criterion) {
    let mut group = c.benchmark_group("shape_field");
    let mut motifs = vec![Motif::Outer; 4500];
    motifs.extend(std::iter::repeat(Motif::Inner).take(1500));

    for strategy in [ShapeStrategy::Parametric, ShapeStrategy::Rejection] {
        let shape = ShapeConfig {
            strategy,
            seed: Some(7),
            ..Default::default()
        };
        group.bench_function(format!("{:?}", strategy), |b| {
            b.iter(|| black_box(ShapeField::generate(&shape, &motifs)))
        });
    }

    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let hands = [HandDetection::synthetic(0.6, 0.95), HandDetection::synthetic(0.05, 0.97)];
    c.bench_function("classify_ranked", |b| {
        let mut classifier = GestureClassifier::default();
        b.iter(|| black_box(classifier.classify_ranked(black_box(&hands))))
    });
}

criterion_group!(
    benches,
    bench_step,
    bench_step_scaling,
    bench_shape_field,
    bench_classify
);
criterion_main!(benches);
