use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use folio_core::{resolve_index, ActivationLine, Region};

/// Landing-page shaped document: a few dozen groups of varying height
fn groups(count: usize) -> Vec<Region> {
    let mut top = 0.0;
    (0..count)
        .map(|i| {
            let height = if i % 7 == 3 { 0.0 } else { 200.0 + (i % 5) as f32 * 90.0 };
            let region = Region::measured(format!("group-{i}"), i as u32, top, height);
            top += height;
            region
        })
        .collect()
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    let line = ActivationLine::pixels(8.0);

    for count in [8usize, 40, 200] {
        let regions = groups(count);
        let bottom = regions.last().and_then(|r| r.geometry).map_or(0.0, |g| g.bottom());

        group.bench_with_input(BenchmarkId::from_parameter(count), &regions, |b, regions| {
            let mut offset = 0.0;
            b.iter(|| {
                offset = (offset + 37.0) % bottom.max(1.0);
                black_box(resolve_index(black_box(offset), 800.0, regions, line))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_resolve);
criterion_main!(benches);
