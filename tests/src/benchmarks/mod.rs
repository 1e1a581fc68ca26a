//! # Hashgraph Intake Benchmarks
//!
//! Throughput of the intake stages under realistic gossip redundancy.
