//! Side-car baseline files: one pretty-printed JSON record per test case.
//!
//! A missing file is the "absent" baseline, not an error. A file that exists
//! but does not decode is fatal for its test case.

use std::path::Path;

use tracing::{debug, info};

use crate::error::{BenchError, BenchResult};
use crate::model::Baseline;

pub fn load(path: &Path) -> BenchResult<Option<Baseline>> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no baseline yet");
            return Ok(None);
        }
        Err(e) => return Err(BenchError::io(path, e)),
    };

    let baseline: Baseline =
        serde_json::from_str(&content).map_err(|e| BenchError::BaselineCorrupt {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    if !baseline.score.is_finite() {
        return Err(BenchError::BaselineCorrupt {
            path: path.to_path_buf(),
            reason: format!("score is not finite: {}", baseline.score),
        });
    }

    Ok(Some(baseline))
}

/// Overwrite the baseline at `path` in place. An existing file keeps its
/// permissions, and a symlinked baseline updates the file it points to.
pub fn save(path: &Path, baseline: &Baseline) -> BenchResult<()> {
    let mut content = serde_json::to_string_pretty(baseline).map_err(|e| {
        BenchError::io(path, std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })?;
    content.push('\n');

    std::fs::write(path, content).map_err(|e| BenchError::io(path, e))?;

    info!(path = %path.display(), score = baseline.score, "saved baseline");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_is_absent() {
        let dir = tempdir().unwrap();
        assert_eq!(load(&dir.path().join("none.json")).unwrap(), None);
    }

    #[test]
    fn save_then_load_is_identical() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("case.json");
        let b = Baseline {
            score: 1234.5678,
            ordering: vec![4, 0, 3, 1, 2],
        };
        save(&path, &b).unwrap();
        assert_eq!(load(&path).unwrap(), Some(b));
    }

    #[test]
    fn saved_file_is_pretty_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("case.json");
        save(
            &path,
            &Baseline {
                score: 7.0,
                ordering: vec![0, 1],
            },
        )
        .unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n  \"score\": 7.0"), "got: {text}");
        assert!(text.ends_with("}\n"));
        let v: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v["ordering"], serde_json::json!([0, 1]));
    }

    #[test]
    fn save_overwrites_prior_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("case.json");
        std::fs::write(&path, "{\"score\": 1.0, \"ordering\": [9, 9, 9, 9, 9, 9]}").unwrap();
        let b = Baseline {
            score: 2.0,
            ordering: vec![1],
        };
        save(&path, &b).unwrap();
        assert_eq!(load(&path).unwrap(), Some(b));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn rewrite_keeps_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("case.json");
        std::fs::write(&path, "{\"score\": 1.0, \"ordering\": []}").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        save(
            &path,
            &Baseline {
                score: 3.0,
                ordering: vec![0],
            },
        )
        .unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o644);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_baseline_updates_its_target() {
        let dir = tempdir().unwrap();
        let real = dir.path().join("real.json");
        let link = dir.path().join("case.json");
        std::fs::write(&real, "{\"score\": 1.0, \"ordering\": []}").unwrap();
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let b = Baseline {
            score: 4.5,
            ordering: vec![1, 0],
        };
        save(&link, &b).unwrap();

        assert!(std::fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(load(&real).unwrap(), Some(b));
    }

    #[test]
    fn corrupt_file_is_fatal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("case.json");
        std::fs::write(&path, "{\"score\": \"high\"}").unwrap();
        let err = load(&path).unwrap_err();
        assert!(matches!(err, BenchError::BaselineCorrupt { .. }), "{err}");
    }

    #[test]
    fn integer_score_in_file_is_accepted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("case.json");
        std::fs::write(&path, "{\"score\": 10, \"ordering\": []}").unwrap();
        assert_eq!(load(&path).unwrap().unwrap().score, 10.0);
    }
}
