//! Parsing of the solver's two-line stdout contract:
//!
//! ```text
//! Score: 12.5
//! Ordering: [3 1 2 0]
//! ```
//!
//! Labels are discarded. No check is made that the ordering is a permutation.

use crate::error::{BenchError, BenchResult};
use crate::model::SolverResult;

pub fn parse(raw: &str) -> BenchResult<SolverResult> {
    let mut lines = raw.lines();

    let score_line = lines
        .next()
        .filter(|l| !l.trim().is_empty())
        .ok_or_else(|| BenchError::malformed("missing score line"))?;
    let ordering_line = lines
        .next()
        .filter(|l| !l.trim().is_empty())
        .ok_or_else(|| BenchError::malformed("missing ordering line"))?;

    if let Some(extra) = lines.find(|l| !l.trim().is_empty()) {
        return Err(BenchError::malformed(format!(
            "unexpected trailing output: {extra:?}"
        )));
    }

    Ok(SolverResult {
        score: parse_score(score_line)?,
        ordering: parse_ordering(ordering_line)?,
    })
}

fn strip_label<'a>(line: &'a str, what: &str) -> BenchResult<&'a str> {
    line.split_once(':')
        .map(|(_, value)| value.trim())
        .ok_or_else(|| BenchError::malformed(format!("{what} line has no label: {line:?}")))
}

fn parse_score(line: &str) -> BenchResult<f64> {
    let value = strip_label(line, "score")?;
    let score: f64 = value
        .parse()
        .map_err(|_| BenchError::malformed(format!("score is not a number: {value:?}")))?;
    if !score.is_finite() {
        return Err(BenchError::malformed(format!("score is not finite: {value}")));
    }
    Ok(score)
}

fn parse_ordering(line: &str) -> BenchResult<Vec<i64>> {
    let value = strip_label(line, "ordering")?;
    let inner = value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .ok_or_else(|| BenchError::malformed(format!("ordering is not bracketed: {value:?}")))?;

    inner
        .split_whitespace()
        .map(|tok| {
            tok.parse::<i64>()
                .map_err(|_| BenchError::malformed(format!("ordering token is not an integer: {tok:?}")))
        })
        .collect()
}
