// Benchmark for canon accumulation and property aggregation
// Run with: cargo bench -p gcodeprops-canon

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gcodeprops_canon::{
    ArcSpec, Canon, FileInfo, InterpreterState, ProgramAccumulator, PropertyAggregator,
};
use gcodeprops_core::{MeasurementSystem, Position};

fn pocket_pass(acc: &mut ProgramAccumulator, passes: usize) {
    acc.set_feed_rate(1500.0);
    for i in 0..passes {
        let z = -(i as f64) * 0.5;
        acc.next_line(&InterpreterState::at_line(i as i64 * 3 + 1));
        acc.straight_traverse(Position::xyz(10.0, 0.0, z));
        acc.next_line(&InterpreterState::at_line(i as i64 * 3 + 2));
        acc.arc_feed(&ArcSpec {
            end_first: 10.0,
            end_second: 0.0,
            center_first: 0.0,
            center_second: 0.0,
            rotation: 1,
            end_axial: z,
            a: 0.0,
            b: 0.0,
            c: 0.0,
            u: 0.0,
            v: 0.0,
            w: 0.0,
        });
        acc.next_line(&InterpreterState::at_line(i as i64 * 3 + 3));
        acc.straight_feed(Position::xyz(0.0, 0.0, z));
    }
}

fn bench_accumulate(c: &mut Criterion) {
    c.bench_function("accumulate 1k circular passes", |b| {
        b.iter(|| {
            let mut acc = ProgramAccumulator::new();
            pocket_pass(&mut acc, black_box(1000));
            assert!(acc.arc_feeds().count() >= 128_000);
        });
    });
}

fn bench_aggregate(c: &mut Criterion) {
    let mut acc = ProgramAccumulator::new();
    pocket_pass(&mut acc, 1000);
    let program = acc.into_program();
    let file = FileInfo {
        name: "bench.ngc".to_string(),
        size_bytes: 0,
    };
    let aggregator = PropertyAggregator::new(MeasurementSystem::Imperial);
    c.bench_function("aggregate 1k circular passes", |b| {
        b.iter(|| {
            let props = aggregator.compute(black_box(&program), &file);
            assert!(props.feed_distance > 0.0);
        });
    });
}

criterion_group!(benches, bench_accumulate, bench_aggregate);
criterion_main!(benches);
