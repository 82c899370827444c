use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;
use std::hint::black_box;
use trajvis_geometry::config::CameraConfig;
use trajvis_geometry::parallel::ExecutionStrategy;
use trajvis_geometry::{CorrectionPipeline, Point2};

fn gen_points(n: usize) -> Vec<Point2> {
    let mut rng = rand::rng();
    (0..n)
        .map(|_| Point2::new(rng.random_range(0.0..1280.0), rng.random_range(0.0..720.0)))
        .collect()
}

fn bench_project_points(c: &mut Criterion) {
    let mut group = c.benchmark_group("project_points");

    let config = CameraConfig {
        enable_correction: true,
        enable_transform: true,
        ..CameraConfig::preset("camera3").unwrap()
    };
    let pipeline = CorrectionPipeline::from_config(&config).unwrap();

    for n in [1_000, 100_000].iter() {
        let src = gen_points(*n);
        let mut dst = vec![Point2::default(); *n];

        for (name, strategy) in [
            ("serial", ExecutionStrategy::Serial),
            ("parallel", ExecutionStrategy::ParallelElements),
            ("chunks", ExecutionStrategy::Chunks(4096)),
        ] {
            group.bench_with_input(BenchmarkId::new(name, n), &src, |b, src| {
                b.iter(|| {
                    pipeline
                        .project_points(black_box(src), black_box(&mut dst), strategy)
                        .unwrap();
                })
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_project_points);
criterion_main!(benches);
