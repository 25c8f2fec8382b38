//! Harness configuration: defaults, optional YAML file, then overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{BenchError, BenchResult};

pub const DEFAULT_INPUT_EXTENSION: &str = "data";
pub const DEFAULT_BASELINE_EXTENSION: &str = "json";
pub const HOME_ENV: &str = "FASBENCH_HOME";

#[derive(Debug, Clone, PartialEq)]
pub struct HarnessConfig {
    pub solver: PathBuf,
    pub solver_args: Vec<String>,
    pub testcases_dir: PathBuf,
    pub runs: usize,
    pub timeout: Option<Duration>,
    pub input_extension: String,
    pub baseline_extension: String,
    pub fail_fast: bool,
}

impl HarnessConfig {
    /// Defaults rooted at `root`: the solver is `root/fas` and the corpus is
    /// `root/testcases`.
    pub fn rooted_at(root: &Path) -> Self {
        Self {
            solver: root.join("fas"),
            solver_args: Vec::new(),
            testcases_dir: root.join("testcases"),
            runs: 1,
            timeout: None,
            input_extension: DEFAULT_INPUT_EXTENSION.to_string(),
            baseline_extension: DEFAULT_BASELINE_EXTENSION.to_string(),
            fail_fast: false,
        }
    }

    /// Apply a config file. Relative paths in the file resolve against the
    /// file's own directory.
    pub fn apply(mut self, file: ConfigFile, base_dir: &Path) -> BenchResult<Self> {
        if let Some(s) = file.solver {
            self.solver = base_dir.join(s);
        }
        if let Some(a) = file.solver_args {
            self.solver_args = a;
        }
        if let Some(d) = file.testcases_dir {
            self.testcases_dir = base_dir.join(d);
        }
        if let Some(r) = file.runs {
            self.runs = r;
        }
        if let Some(t) = file.timeout_secs {
            let timeout = Duration::try_from_secs_f64(t)
                .map_err(|e| BenchError::config(format!("timeout_secs {t}: {e}")))?;
            self.timeout = Some(timeout);
        }
        if let Some(e) = file.input_extension {
            self.input_extension = e;
        }
        if let Some(e) = file.baseline_extension {
            self.baseline_extension = e;
        }
        if let Some(f) = file.fail_fast {
            self.fail_fast = f;
        }
        Ok(self)
    }

    pub fn validate(&self) -> BenchResult<()> {
        if self.runs == 0 {
            return Err(BenchError::config("runs must be >= 1"));
        }
        if self.timeout.is_some_and(|t| t.is_zero()) {
            return Err(BenchError::config("timeout must be > 0"));
        }
        if self.input_extension == self.baseline_extension {
            return Err(BenchError::config(format!(
                "input and baseline extensions must differ (both '{}')",
                self.input_extension
            )));
        }
        Ok(())
    }
}

/// On-disk YAML form. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub solver: Option<PathBuf>,
    pub solver_args: Option<Vec<String>>,
    pub testcases_dir: Option<PathBuf>,
    pub runs: Option<usize>,
    pub timeout_secs: Option<f64>,
    pub input_extension: Option<String>,
    pub baseline_extension: Option<String>,
    pub fail_fast: Option<bool>,
}

impl ConfigFile {
    pub fn parse(content: &str) -> BenchResult<Self> {
        serde_yaml::from_str(content).map_err(|e| BenchError::config(e.to_string()))
    }

    pub fn load(path: &Path) -> BenchResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| BenchError::config(format!("cannot read {}: {e}", path.display())))?;
        Self::parse(&content)
    }
}

/// Directory the harness treats as its home: `$FASBENCH_HOME`, else the
/// parent of the directory holding the running executable.
pub fn harness_root() -> PathBuf {
    if let Some(home) = std::env::var_os(HOME_ENV) {
        return PathBuf::from(home);
    }
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().and_then(Path::parent).map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}
