//! # Event Deduplication Benchmarks
//!
//! | Benchmark | Measures |
//! |-----------|----------|
//! | `hg-01-handle-event/stream/unique` | insert path only |
//! | `hg-01-handle-event/stream/gossip` | mixed insert and duplicate lookups |
//! | `hg-01-window-advance/evict_half` | eviction cost by resident set size |

use criterion::{criterion_group, criterion_main, Criterion};
use hg_tests::benchmarks::hg_01_event_deduplication;

fn benches(c: &mut Criterion) {
    hg_01_event_deduplication::register_benchmarks(c);
}

criterion_group!(deduplication, benches);
criterion_main!(deduplication);
