//! Generic parallel execution framework
//!
//! Owns system resource decisions (how many workers) and execution strategy
//! (sequential vs. a bounded crossbeam worker pool). It knows nothing about
//! images or OCR.
//!
//! Results are streamed to a single consumer running on the calling thread in
//! the order workers finish them. Workers only ever send; any accumulator the
//! consumer keeps is never shared with them.
//!
//! ```text
//! producer ──work──▶ [bounded] ──▶ worker 0..N ──result──▶ [bounded] ──▶ consumer (caller thread)
//! ```
//!
//! # Example
//!
//! ```rust
//! use scan_image::parallel::ExecutionStrategy;
//!
//! let workers = ExecutionStrategy::calculate_optimal_workers(0, 100);
//! let strategy = ExecutionStrategy::for_workload(10, workers);
//!
//! let mut total = 0;
//! strategy
//!     .execute((1..=10u32).collect::<Vec<_>>(), |n, _worker_id| n * 2, |doubled| total += doubled)
//!     .unwrap();
//! assert_eq!(total, 110);
//! ```

pub mod core;

pub use self::core::ExecutionStrategy;
