//! # dekker-rs: Dekker's mutual exclusion in Rust
//!
//! **`dekker-rs`** implements Dekker's algorithm --- mutual exclusion between
//! exactly two threads using only shared memory and atomic read/write
//! operations. No OS locks, no semaphores, no blocking primitives.
//!
//! ## How it works
//!
//! Each party owns an **intent flag** it raises before entering the critical
//! section; a shared **turn indicator** breaks the tie when both flags go up
//! at once. A party that finds the turn elsewhere withdraws its flag and
//! spins (cooperatively yielding) until the turn arrives, which is what makes
//! the algorithm deadlock-free and starvation-free. All shared accesses are
//! sequentially consistent, giving the single global order the classical
//! correctness proof relies on.
//!
//! ## Key Components
//!
//! - **Manager-Centric API**: all operations go through the
//!   [`Dekker`][crate::protocol::Dekker] manager, which owns the shared state
//!   for one run and the diagnostic sink.
//! - **Occupancy Oracle**: an instrumentation counter tracks how many parties
//!   are inside the section; any reading above 1 is recorded as a violation
//!   without halting the run.
//! - **Structured Tracing**: every protocol step is reported as a
//!   [`TraceEvent`][crate::trace::TraceEvent] through a serialized,
//!   line-numbered [`TraceSink`][crate::trace::TraceSink].
//!
//! ## Basic Usage
//!
//! ```rust
//! use dekker_rs::harness::RunOptions;
//! use dekker_rs::protocol::Dekker;
//!
//! // One manager per run; state never leaks across runs.
//! let dekker = Dekker::silent();
//!
//! // Two parties, 5 entry/exit cycles each, no artificial delays.
//! let report = dekker.run(&RunOptions::contended(5));
//!
//! assert_eq!(report.final_value, 10); // 2 × iterations
//! assert!(report.passed());
//! ```
//!
//! ## Core Components
//!
//! - **[`protocol`]**: the heart of the crate --- the entry/exit procedures.
//! - **[`state`]**: the shared atomics (flags, turn, resource, occupancy).
//! - **[`harness`]**: spawns both parties, joins them, and verdicts the run.
//! - **[`trace`]**: the diagnostic sink abstraction.
//!
//! This crate deliberately does **not** generalize to more than two parties:
//! Dekker's algorithm is only sound for two (the N-party case needs a
//! different algorithm, e.g. Lamport's bakery).

pub mod harness;
pub mod party;
pub mod protocol;
pub mod state;
pub mod trace;
pub mod types;
pub mod workload;
