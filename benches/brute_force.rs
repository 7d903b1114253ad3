
use criterion::black_box;
use criterion::criterion_group;
use criterion::criterion_main;
use criterion::Criterion;
use csp2d::Select as _;

pub fn bench(c: &mut Criterion) {
    let points = generator::uniform_points(100.0, 10, 0);

    let core_count = num_cpus::get();
    let mut group = c.benchmark_group("brute_force");
    group.sample_size(10);

    for thread_count in [1, 2, 4, 8, 16] {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(thread_count)
            .spawn_handler(|thread| {
                let mut b = std::thread::Builder::new();
                if let Some(name) = thread.name() {
                    b = b.name(name.to_owned());
                }
                if let Some(stack_size) = thread.stack_size() {
                    b = b.stack_size(stack_size);
                }
                b.spawn(move || {
                    let core_idx = thread.index() % core_count;
                    core_affinity::set_for_current(core_affinity::CoreId { id: core_idx });
                    thread.run();
                })?;
                Ok(())
            })
            .build()
            .unwrap();
        group.bench_function(&thread_count.to_string(), |b| {
            pool.install(|| {
                b.iter(|| {
                    csp2d::BruteForce { container_count: 3 }
                        .select(black_box(&points[..]))
                        .unwrap()
                })
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench);
criterion_main!(benches);
