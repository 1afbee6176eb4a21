use criterion::{criterion_group, criterion_main, Criterion, black_box};
use piesearch::{CozyPosition, Engine, Restrictions};

fn bench_search(c: &mut Criterion) {
    let start = CozyPosition::startpos();
    c.bench_function("search_depth_5_startpos", |ben| {
        ben.iter(|| {
            let mut engine = Engine::new();
            engine.set_info_sink(|_| {});
            let r = engine.search(black_box(&start), &Restrictions::depth(5));
            black_box(r.nodes)
        })
    });

    let kiwipete = CozyPosition::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1").unwrap();
    let mut group = c.benchmark_group("search_threads_kiwipete");
    group.sample_size(10);
    for threads in [1usize, 2, 4] {
        group.bench_function(format!("{threads}"), |ben| {
            let mut engine = Engine::new();
            engine.set_info_sink(|_| {});
            engine.set_threads(threads).unwrap();
            ben.iter(|| {
                engine.reset();
                black_box(engine.search(&kiwipete, &Restrictions::depth(6)).nodes)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_search);
criterion_main!(benches);
