//! Regression tracking for an external ordering solver.
//!
//! For each test case the solver is run a fixed number of times; its reported
//! score is compared with the best score ever recorded for that case, and the
//! side-car baseline is rewritten only when a run strictly improves on it.

pub mod baseline;
pub mod config;
pub mod discovery;
pub mod engine;
pub mod error;
pub mod invoker;
pub mod model;
pub mod parser;
pub mod report;

pub use config::{harness_root, ConfigFile, HarnessConfig};
pub use engine::{run_suite, CaseOutcome, Engine, SessionAccumulator, SuiteCounts, SuiteReport};
pub use error::{BenchError, BenchResult};
pub use invoker::{ProcessSolver, Solver};
pub use model::{Baseline, BestFraction, SessionSummary, SolverResult, TestCase, Verdict};
pub use report::{ReportFormat, Reporter};
