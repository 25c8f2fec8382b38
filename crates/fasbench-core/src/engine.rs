//! Regression engine: runs the solver against one test case a fixed number of
//! times, folds the results against the stored baseline and persists the new
//! best when (and only when) a run strictly beat it.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, info_span, warn};

use crate::baseline;
use crate::discovery::line_count;
use crate::error::{BenchError, BenchResult};
use crate::invoker::Solver;
use crate::model::{Baseline, BestFraction, SessionSummary, SolverResult, TestCase, Verdict};
use crate::parser;

/// Fold state threaded through the runs of one session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionAccumulator {
    best: Baseline,
    dirty: bool,
    session_best: Option<f64>,
    runs: usize,
}

impl SessionAccumulator {
    pub fn start(baseline: Baseline) -> Self {
        Self {
            best: baseline,
            dirty: false,
            session_best: None,
            runs: 0,
        }
    }

    /// Fold one run in. Only a strictly greater score replaces the best, so
    /// on ties the earliest ordering wins.
    #[must_use]
    pub fn absorb(self, result: SolverResult) -> Self {
        let session_best = Some(match self.session_best {
            Some(b) if b >= result.score => b,
            _ => result.score,
        });
        let runs = self.runs + 1;
        if result.score > self.best.score {
            Self {
                best: result.into(),
                dirty: true,
                session_best,
                runs,
            }
        } else {
            Self {
                session_best,
                runs,
                ..self
            }
        }
    }

    /// Best result known after the runs absorbed so far (stored or new).
    pub fn best(&self) -> &Baseline {
        &self.best
    }

    /// True once some run has beaten the stored baseline.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn session_best(&self) -> Option<f64> {
        self.session_best
    }

    pub fn runs(&self) -> usize {
        self.runs
    }
}

pub struct Engine<S> {
    solver: S,
    runs: usize,
}

impl<S: Solver> Engine<S> {
    pub fn new(solver: S, runs: usize) -> BenchResult<Self> {
        if runs == 0 {
            return Err(BenchError::config("runs must be >= 1"));
        }
        Ok(Self { solver, runs })
    }

    pub fn runs(&self) -> usize {
        self.runs
    }

    /// Evaluate one test case. Any solver or parse failure aborts the whole
    /// case: no summary is produced and the baseline is left untouched.
    pub fn evaluate(&self, tc: &TestCase) -> BenchResult<SessionSummary> {
        let stored = baseline::load(&tc.baseline_path)?.unwrap_or_else(Baseline::zero);
        let baseline_score = stored.score;
        let input_line_count = line_count(tc.input())?;

        let started = Instant::now();
        let acc = (0..self.runs).try_fold(SessionAccumulator::start(stored), |acc, run| {
            let raw = self.solver.solve(tc.input())?;
            let result = parser::parse(&raw)?;
            debug!(run, score = result.score, len = result.ordering.len(), "run complete");
            Ok::<_, BenchError>(acc.absorb(result))
        })?;
        let average_duration = started.elapsed().div_f64(self.runs as f64);

        let session_best = acc
            .session_best()
            .ok_or_else(|| BenchError::config("session finished without runs"))?;
        let final_score = acc.best().score;

        if acc.is_dirty() {
            baseline::save(&tc.baseline_path, acc.best())?;
        }

        let verdict = if acc.is_dirty() {
            Verdict::Improved
        } else if session_best == baseline_score {
            Verdict::Matched
        } else {
            Verdict::Regressed
        };

        Ok(SessionSummary {
            test_name: tc.name.clone(),
            input_line_count,
            average_duration,
            best_score_this_session: session_best,
            best_fraction_of_best: BestFraction::compute(session_best, final_score),
            baseline_score,
            final_score,
            runs: acc.runs(),
            verdict,
        })
    }
}

/// Result of evaluating one test case within a suite.
#[derive(Debug)]
pub enum CaseOutcome {
    Evaluated(SessionSummary),
    Failed { test_name: String, error: BenchError },
}

impl CaseOutcome {
    pub fn test_name(&self) -> &str {
        match self {
            Self::Evaluated(s) => &s.test_name,
            Self::Failed { test_name, .. } => test_name,
        }
    }

    pub fn summary(&self) -> Option<&SessionSummary> {
        match self {
            Self::Evaluated(s) => Some(s),
            Self::Failed { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SuiteCounts {
    pub total: usize,
    pub improved: usize,
    pub matched: usize,
    pub regressed: usize,
    pub failed: usize,
}

#[derive(Debug, Default)]
pub struct SuiteReport {
    pub outcomes: Vec<CaseOutcome>,
    /// Cases never attempted because an earlier failure stopped the suite.
    pub skipped: usize,
}

impl SuiteReport {
    pub fn counts(&self) -> SuiteCounts {
        let mut c = SuiteCounts {
            total: self.outcomes.len(),
            ..SuiteCounts::default()
        };
        for o in &self.outcomes {
            match o {
                CaseOutcome::Evaluated(s) => match s.verdict {
                    Verdict::Improved => c.improved += 1,
                    Verdict::Matched => c.matched += 1,
                    Verdict::Regressed => c.regressed += 1,
                },
                CaseOutcome::Failed { .. } => c.failed += 1,
            }
        }
        c
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &BenchError)> {
        self.outcomes.iter().filter_map(|o| match o {
            CaseOutcome::Failed { test_name, error } => Some((test_name.as_str(), error)),
            CaseOutcome::Evaluated(_) => None,
        })
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }
}

/// Evaluate `cases` in order. Each outcome is handed to `emit` as soon as it
/// is known. A failing case is recorded and the suite moves on, unless
/// `fail_fast` is set. Only an error from `emit` itself aborts the suite.
pub fn run_suite<S, F>(
    engine: &Engine<S>,
    cases: &[TestCase],
    fail_fast: bool,
    mut emit: F,
) -> BenchResult<SuiteReport>
where
    S: Solver,
    F: FnMut(&CaseOutcome) -> BenchResult<()>,
{
    let mut report = SuiteReport::default();

    for (i, tc) in cases.iter().enumerate() {
        let span = info_span!("case", name = %tc.name);
        let _enter = span.enter();

        let outcome = match engine.evaluate(tc) {
            Ok(summary) => {
                info!(
                    verdict = %summary.verdict,
                    best = summary.best_score_this_session,
                    baseline = summary.baseline_score,
                    "evaluated"
                );
                CaseOutcome::Evaluated(summary)
            }
            Err(error) => {
                warn!(kind = error.kind(), error = %error, "test case failed");
                CaseOutcome::Failed {
                    test_name: tc.name.clone(),
                    error,
                }
            }
        };

        emit(&outcome)?;
        let failed = matches!(outcome, CaseOutcome::Failed { .. });
        report.outcomes.push(outcome);

        if failed && fail_fast {
            report.skipped = cases.len() - i - 1;
            break;
        }
    }

    Ok(report)
}
