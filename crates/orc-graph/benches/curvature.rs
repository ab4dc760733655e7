use criterion::{black_box, criterion_group, criterion_main, Criterion};
use orc_core::rng::RngHandle;
use orc_graph::{all_pairs_shortest_paths, gen_coauthorship, hyperedge_curvature, CurvatureParams};
use orc_transport::SuccessiveShortestPath;

fn curvature_bench(c: &mut Criterion) {
    let mut rng = RngHandle::from_seed(123);
    let graph = gen_coauthorship(120, 60, 4, &mut rng).unwrap();
    let matrix = all_pairs_shortest_paths(&graph);
    let solver = SuccessiveShortestPath::default();
    let params = CurvatureParams::default();
    c.bench_function("hyperedge_curvature", |b| {
        b.iter(|| {
            for id in graph.hyperedge_ids() {
                let value = hyperedge_curvature(&graph, &id, &matrix, &solver, &params).unwrap();
                black_box(value);
            }
        });
    });
}

criterion_group!(benches, curvature_bench);
criterion_main!(benches);
