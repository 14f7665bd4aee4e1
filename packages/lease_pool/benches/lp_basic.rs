//! Basic benchmarks for the `lease_pool` package.

#![allow(
    missing_docs,
    reason = "No need for API documentation in benchmark code"
)]

use std::hint::black_box;
use std::num::NonZero;

use criterion::{Criterion, criterion_group, criterion_main};
use lease_pool::LeasePool;
use new_zealand::nz;

criterion_group!(benches, entrypoint);
criterion_main!(benches);

const CAPACITY: NonZero<usize> = nz!(8);
const SINGLE: NonZero<usize> = nz!(1);
const LARGE: NonZero<usize> = nz!(1000);

fn entrypoint(c: &mut Criterion) {
    let mut cycle_group = c.benchmark_group("lp_cycle");

    cycle_group.bench_function("acquire_release", |b| {
        let pool = LeasePool::new(CAPACITY, Vec::<u8>::new);

        b.iter(|| {
            let lease = pool.acquire();
            black_box(&*lease);
        });
    });

    cycle_group.bench_function("try_acquire_hit", |b| {
        let pool = LeasePool::new(CAPACITY, Vec::<u8>::new);

        b.iter(|| {
            let lease = pool.try_acquire();
            black_box(lease.is_some());
        });
    });

    cycle_group.bench_function("try_acquire_miss", |b| {
        let pool = LeasePool::new(SINGLE, Vec::<u8>::new);
        let _held = pool.acquire();

        b.iter(|| {
            black_box(pool.try_acquire().is_none());
        });
    });

    cycle_group.finish();

    let mut fill_group = c.benchmark_group("lp_fill");

    fill_group.bench_function("one", |b| {
        b.iter(|| {
            drop(black_box(LeasePool::new(SINGLE, Vec::<u8>::new)));
        });
    });

    fill_group.bench_function("one_thousand", |b| {
        b.iter(|| {
            drop(black_box(LeasePool::new(LARGE, Vec::<u8>::new)));
        });
    });

    fill_group.finish();
}
