//! Benchmarks for the reactive runtime.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use filament_core::Runtime;

fn bench_cell_create(c: &mut Criterion) {
    let rt = Runtime::new();
    c.bench_function("cell_create", |b| {
        b.iter(|| black_box(rt.create_cell(0i32)))
    });
}

fn bench_cell_read(c: &mut Criterion) {
    let rt = Runtime::new();
    let cell = rt.create_cell(42i32);
    c.bench_function("cell_read", |b| b.iter(|| black_box(cell.read())));
}

fn bench_cell_write_unwatched(c: &mut Criterion) {
    let rt = Runtime::new();
    let cell = rt.create_cell(0i32);
    c.bench_function("cell_write_unwatched", |b| {
        b.iter(|| cell.write(black_box(42)))
    });
}

fn bench_derived_read_cached(c: &mut Criterion) {
    let rt = Runtime::new();
    let cell = rt.create_cell(42i32);
    let cell_clone = cell.clone();
    let derived = rt.create_derived(move || cell_clone.read() * 2);

    // First read to fill the cache.
    let _ = derived.read();

    c.bench_function("derived_read_cached", |b| {
        b.iter(|| black_box(derived.read()))
    });
}

fn bench_derived_read_stale(c: &mut Criterion) {
    let rt = Runtime::new();
    let cell = rt.create_cell(0i32);
    let cell_clone = cell.clone();
    let derived = rt.create_derived(move || cell_clone.read() * 2);

    let mut i = 0i32;
    c.bench_function("derived_read_stale", |b| {
        b.iter(|| {
            cell.write(i);
            i += 1;
            black_box(derived.read())
        })
    });
}

fn bench_derived_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("derived_chain");

    for depth in [1, 5, 10, 20] {
        group.bench_with_input(BenchmarkId::new("depth", depth), &depth, |b, &depth| {
            let rt = Runtime::new();
            let cell = rt.create_cell(1i32);

            let mut current = {
                let cell = cell.clone();
                rt.create_derived(move || cell.read() + 1)
            };
            for _ in 1..depth {
                let prev = current.clone();
                current = rt.create_derived(move || prev.read() + 1);
            }

            b.iter(|| {
                cell.write(black_box(1));
                black_box(current.read())
            })
        });
    }

    group.finish();
}

fn bench_effect_trigger(c: &mut Criterion) {
    let rt = Runtime::new();
    let cell = rt.create_cell(0i32);
    let cell_clone = cell.clone();
    let _effect = rt.create_effect(move || {
        black_box(cell_clone.read());
    });

    let mut i = 0i32;
    c.bench_function("effect_trigger", |b| {
        b.iter(|| {
            cell.write(i);
            i += 1;
        })
    });
}

fn bench_diamond_propagation(c: &mut Criterion) {
    let rt = Runtime::new();
    let cell = rt.create_cell(0i32);

    let cell_for_derived = cell.clone();
    let derived = rt.create_derived(move || cell_for_derived.read() * 2);

    let cell_clone = cell.clone();
    let derived_clone = derived.clone();
    let _effect = rt.create_effect(move || {
        black_box(cell_clone.read() + derived_clone.read());
    });

    let mut i = 0i32;
    c.bench_function("diamond_propagation", |b| {
        b.iter(|| {
            cell.write(i);
            i += 1;
        })
    });
}

fn bench_many_effects(c: &mut Criterion) {
    let mut group = c.benchmark_group("many_effects");

    for count in [10, 100, 500] {
        group.bench_with_input(BenchmarkId::new("trigger", count), &count, |b, &count| {
            let rt = Runtime::new();
            let cell = rt.create_cell(0i32);

            let effects: Vec<_> = (0..count)
                .map(|_| {
                    let cell = cell.clone();
                    rt.create_effect(move || {
                        black_box(cell.read());
                    })
                })
                .collect();

            let mut i = 0i32;
            b.iter(|| {
                cell.write(i);
                i += 1;
            });

            for effect in &effects {
                effect.dispose();
            }
        });
    }

    group.finish();
}

criterion_group!(
    cell_benches,
    bench_cell_create,
    bench_cell_read,
    bench_cell_write_unwatched,
);

criterion_group!(
    derived_benches,
    bench_derived_read_cached,
    bench_derived_read_stale,
    bench_derived_chain,
);

criterion_group!(
    effect_benches,
    bench_effect_trigger,
    bench_diamond_propagation,
    bench_many_effects,
);

criterion_main!(cell_benches, derived_benches, effect_benches);
