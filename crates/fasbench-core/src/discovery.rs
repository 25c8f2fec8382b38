//! Test-case discovery. Order is always sorted by name so runs are
//! reproducible and their reports diffable.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{BenchError, BenchResult};
use crate::model::TestCase;

/// Every file in `dir` with extension `input_extension`.
pub fn discover(
    dir: &Path,
    input_extension: &str,
    baseline_extension: &str,
) -> BenchResult<Vec<TestCase>> {
    let entries = std::fs::read_dir(dir).map_err(|e| BenchError::Discovery {
        path: dir.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut inputs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| BenchError::io(dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) == Some(input_extension) {
            inputs.push(path);
        }
    }

    if inputs.is_empty() {
        warn!(dir = %dir.display(), ext = input_extension, "no test cases found");
    }

    Ok(from_paths(inputs, baseline_extension))
}

/// Test cases for explicitly named inputs, deduplicated and sorted. Paths that
/// resolve to the same file count once; unresolvable paths are kept as given.
pub fn from_paths<I>(paths: I, baseline_extension: &str) -> Vec<TestCase>
where
    I: IntoIterator<Item = PathBuf>,
{
    let unique: BTreeSet<PathBuf> = paths
        .into_iter()
        .map(|p| std::fs::canonicalize(&p).unwrap_or(p))
        .collect();
    let mut cases: Vec<TestCase> = unique
        .into_iter()
        .map(|p| TestCase::from_input(p, baseline_extension))
        .collect();
    cases.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.input_path.cmp(&b.input_path)));
    cases
}

/// Count lines the way the report defines input size: trailing empty lines
/// do not count.
pub fn line_count(path: &Path) -> BenchResult<usize> {
    let bytes = std::fs::read(path).map_err(|e| BenchError::io(path, e))?;
    let end = bytes
        .iter()
        .rposition(|b| !matches!(b, b'\n' | b'\r'))
        .map_or(0, |i| i + 1);
    let content = &bytes[..end];
    if content.is_empty() {
        return Ok(0);
    }
    Ok(content.iter().filter(|b| **b == b'\n').count() + 1)
}
