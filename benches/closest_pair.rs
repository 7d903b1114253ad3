
use criterion::black_box;
use criterion::criterion_group;
use criterion::criterion_main;
use criterion::BenchmarkId;
use criterion::Criterion;
use criterion::Throughput;

pub fn bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("closest_pair");

    for point_count in [100, 1_000, 10_000] {
        let points = generator::uniform_points(1000.0, point_count, 0);
        let mut clusters = csp2d::singletons(&points);
        clusters.sort_by(|a, b| f64::total_cmp(&a.centroid().x, &b.centroid().x));

        group.throughput(Throughput::Elements(point_count as u64));
        group.bench_with_input(BenchmarkId::new("fast", point_count), &clusters, |b, clusters| {
            b.iter(|| csp2d::fast_closest_pair(black_box(clusters)))
        });
        if point_count <= 1_000 {
            group.bench_with_input(
                BenchmarkId::new("slow", point_count),
                &clusters,
                |b, clusters| b.iter(|| csp2d::slow_closest_pair(black_box(clusters))),
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench);
criterion_main!(benches);
