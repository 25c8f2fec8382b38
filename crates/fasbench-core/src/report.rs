//! Report sink: one record per evaluated test case.
//!
//! Text records are tab-separated in a fixed order: name, input line count,
//! average seconds per run, best score this session, best-fraction-of-best.

use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;

use crate::engine::{CaseOutcome, SuiteCounts};
use crate::error::{BenchError, BenchResult};
use crate::model::SessionSummary;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

pub struct Reporter<W> {
    out: W,
    format: ReportFormat,
}

#[derive(Serialize)]
struct FailureRecord<'a> {
    test_name: &'a str,
    error_kind: &'static str,
    error: String,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, format: ReportFormat) -> Self {
        Self { out, format }
    }

    /// Emit the record for a finished case. Failed cases produce no text
    /// record; in JSON mode they are written with their error.
    pub fn emit(&mut self, outcome: &CaseOutcome) -> BenchResult<()> {
        match (self.format, outcome) {
            (ReportFormat::Text, CaseOutcome::Evaluated(s)) => {
                let line = text_line(s);
                writeln!(self.out, "{line}").map_err(sink_error)?;
            }
            (ReportFormat::Text, CaseOutcome::Failed { .. }) => {}
            (ReportFormat::Json, CaseOutcome::Evaluated(s)) => self.write_json(s)?,
            (ReportFormat::Json, CaseOutcome::Failed { test_name, error }) => {
                self.write_json(&FailureRecord {
                    test_name,
                    error_kind: error.kind(),
                    error: error.to_string(),
                })?;
            }
        }
        self.out.flush().map_err(sink_error)
    }

    fn write_json<T: Serialize>(&mut self, record: &T) -> BenchResult<()> {
        serde_json::to_writer(&mut self.out, record)
            .map_err(|e| sink_error(std::io::Error::other(e)))?;
        writeln!(self.out).map_err(sink_error)
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

fn sink_error(e: std::io::Error) -> BenchError {
    BenchError::io(PathBuf::from("<report>"), e)
}

/// Tab-separated record for one summary.
pub fn text_line(s: &SessionSummary) -> String {
    format!(
        "{}\t{}\t{:?}\t{:?}\t{}",
        s.test_name,
        s.input_line_count,
        s.average_duration.as_secs_f64(),
        s.best_score_this_session,
        s.best_fraction_of_best,
    )
}

/// One-line totals, e.g. `5 cases: 1 improved, 3 matched, 0 regressed, 1 failed`.
pub fn totals_line(c: &SuiteCounts) -> String {
    format!(
        "{} cases: {} improved, {} matched, {} regressed, {} failed",
        c.total, c.improved, c.matched, c.regressed, c.failed
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BestFraction, Verdict};
    use std::time::Duration;

    fn summary(ratio: BestFraction) -> SessionSummary {
        SessionSummary {
            test_name: "tiny.data".into(),
            input_line_count: 4,
            average_duration: Duration::from_millis(250),
            best_score_this_session: 7.0,
            best_fraction_of_best: ratio,
            baseline_score: 0.0,
            final_score: 7.0,
            runs: 1,
            verdict: Verdict::Improved,
        }
    }

    #[test]
    fn text_record_has_fixed_field_order() {
        let line = text_line(&summary(BestFraction::Ratio(1.0)));
        assert_eq!(line, "tiny.data\t4\t0.25\t7.0\t1.0");
    }

    #[test]
    fn degenerate_ratio_renders_sentinel() {
        let line = text_line(&summary(BestFraction::Degenerate));
        assert!(line.ends_with("\tn/a"), "{line}");
    }

    #[test]
    fn text_mode_skips_failures() {
        let mut r = Reporter::new(Vec::new(), ReportFormat::Text);
        r.emit(&CaseOutcome::Evaluated(summary(BestFraction::Ratio(0.5))))
            .unwrap();
        r.emit(&CaseOutcome::Failed {
            test_name: "bad.data".into(),
            error: BenchError::malformed("missing ordering line"),
        })
        .unwrap();
        let out = String::from_utf8(r.into_inner()).unwrap();
        assert_eq!(out, "tiny.data\t4\t0.25\t7.0\t0.5\n");
    }

    #[test]
    fn json_mode_writes_one_object_per_line() {
        let mut r = Reporter::new(Vec::new(), ReportFormat::Json);
        r.emit(&CaseOutcome::Evaluated(summary(BestFraction::Degenerate)))
            .unwrap();
        r.emit(&CaseOutcome::Failed {
            test_name: "bad.data".into(),
            error: BenchError::malformed("missing ordering line"),
        })
        .unwrap();
        let out = String::from_utf8(r.into_inner()).unwrap();
        let lines: Vec<serde_json::Value> = out
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["test_name"], "tiny.data");
        assert_eq!(lines[0]["average_duration"], 0.25);
        assert!(lines[0]["best_fraction_of_best"].is_null());
        assert_eq!(lines[0]["verdict"], "improved");
        assert_eq!(lines[1]["error_kind"], "malformed_output");
    }

    #[test]
    fn totals_line_lists_every_bucket() {
        let c = SuiteCounts {
            total: 5,
            improved: 1,
            matched: 3,
            regressed: 0,
            failed: 1,
        };
        assert_eq!(
            totals_line(&c),
            "5 cases: 1 improved, 3 matched, 0 regressed, 1 failed"
        );
    }
}
