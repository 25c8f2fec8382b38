//! Data model shared by the engine, the baseline store and the reporter.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// One benchmark input and the side-car file holding its best-known result.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestCase {
    /// File name of the input; stable across runs.
    pub name: String,
    pub input_path: PathBuf,
    pub baseline_path: PathBuf,
}

impl TestCase {
    /// Derive a test case from its input file. The baseline lives next to the
    /// input with `baseline_extension` in place of the input's extension.
    pub fn from_input(input_path: impl Into<PathBuf>, baseline_extension: &str) -> Self {
        let input_path = input_path.into();
        let name = input_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| input_path.display().to_string());
        let baseline_path = input_path.with_extension(baseline_extension);
        Self {
            name,
            input_path,
            baseline_path,
        }
    }

    pub fn input(&self) -> &Path {
        &self.input_path
    }
}

/// Outcome of a single solver invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverResult {
    pub score: f64,
    pub ordering: Vec<i64>,
}

/// Persisted best-known result for a test case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Baseline {
    pub score: f64,
    pub ordering: Vec<i64>,
}

impl Baseline {
    /// Floor used when no baseline file exists yet.
    pub fn zero() -> Self {
        Self::default()
    }
}

impl From<SolverResult> for Baseline {
    fn from(r: SolverResult) -> Self {
        Self {
            score: r.score,
            ordering: r.ordering,
        }
    }
}

/// How close the session's best came to the all-time best.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BestFraction {
    Ratio(f64),
    /// The final baseline score is zero, so the ratio is undefined.
    Degenerate,
}

impl BestFraction {
    pub fn compute(session_best: f64, final_best: f64) -> Self {
        if final_best == 0.0 {
            Self::Degenerate
        } else {
            Self::Ratio(session_best / final_best)
        }
    }

    pub fn ratio(self) -> Option<f64> {
        match self {
            Self::Ratio(r) => Some(r),
            Self::Degenerate => None,
        }
    }
}

impl fmt::Display for BestFraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ratio(r) => write!(f, "{r:?}"),
            Self::Degenerate => f.write_str("n/a"),
        }
    }
}

impl Serialize for BestFraction {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Ratio(r) => serializer.serialize_f64(*r),
            Self::Degenerate => serializer.serialize_none(),
        }
    }
}

/// Session result relative to the stored baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// A run beat the baseline; the baseline was rewritten.
    Improved,
    Matched,
    Regressed,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Improved => "improved",
            Self::Matched => "matched",
            Self::Regressed => "regressed",
        })
    }
}

/// Per-test-case report record.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub test_name: String,
    pub input_line_count: usize,
    #[serde(serialize_with = "serialize_secs")]
    pub average_duration: Duration,
    pub best_score_this_session: f64,
    pub best_fraction_of_best: BestFraction,
    pub baseline_score: f64,
    pub final_score: f64,
    pub runs: usize,
    pub verdict: Verdict,
}

fn serialize_secs<S: serde::Serializer>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(d.as_secs_f64())
}
