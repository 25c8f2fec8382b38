//! Solver invocation: one blocking subprocess per call.
//!
//! The input file is connected to the child's stdin; stdout is captured in
//! full and returned as text. Exit status is not interpreted beyond telling
//! a normal exit apart from a signal-terminated one.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::{BenchError, BenchResult};

/// Cap on retained stderr, to avoid holding unbounded diagnostics.
const STDERR_CAP: usize = 4096;

/// Something that turns one input file into raw solver output.
pub trait Solver {
    fn solve(&self, input: &Path) -> BenchResult<String>;
}

impl<S: Solver + ?Sized> Solver for &S {
    fn solve(&self, input: &Path) -> BenchResult<String> {
        (**self).solve(input)
    }
}

/// External solver executable.
#[derive(Debug, Clone)]
pub struct ProcessSolver {
    program: PathBuf,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl ProcessSolver {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: None,
        }
    }

    pub fn with_args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Kill the solver if it has not exited within `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Solver for ProcessSolver {
    fn solve(&self, input: &Path) -> BenchResult<String> {
        let stdin = File::open(input).map_err(|e| BenchError::io(input, e))?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::from(stdin))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| BenchError::Spawn {
                program: self.program.clone(),
                source: e,
            })?;

        // Drain both pipes while waiting so a chatty solver cannot block on a
        // full pipe buffer.
        let stdout = drain(child.stdout.take(), usize::MAX);
        let stderr = drain(child.stderr.take(), STDERR_CAP);

        let started = Instant::now();
        let status = match self.timeout {
            Some(limit) => match child.wait_timeout(limit) {
                Ok(Some(status)) => status,
                Ok(None) => {
                    let _ = child.kill();
                    let _ = child.wait(); // reap
                    warn!(input = %input.display(), ?limit, "solver timed out, killed");
                    return Err(BenchError::Timeout { after: limit });
                }
                Err(e) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(BenchError::io(&self.program, e));
                }
            },
            None => child.wait().map_err(|e| BenchError::io(&self.program, e))?,
        };

        let out = join(stdout).map_err(|e| BenchError::io(&self.program, e))?;
        let err = join(stderr).unwrap_or_default();
        debug!(
            input = %input.display(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            status = %status,
            "solver finished"
        );

        if status.code().is_none() {
            return Err(BenchError::Signaled {
                status: status.to_string(),
                stderr: String::from_utf8_lossy(&err).into_owned(),
            });
        }
        if !status.success() {
            warn!(input = %input.display(), status = %status, "solver exited non-zero; using its output");
        }

        String::from_utf8(out).map_err(|e| BenchError::malformed(format!("output is not UTF-8: {e}")))
    }
}

type Drain = Option<JoinHandle<std::io::Result<Vec<u8>>>>;

fn drain<R: Read + Send + 'static>(pipe: Option<R>, cap: usize) -> Drain {
    pipe.map(|mut p| {
        std::thread::spawn(move || {
            let mut buf = Vec::new();
            (&mut p).take(cap as u64).read_to_end(&mut buf)?;
            // Keep reading past the cap so the child never blocks on a full pipe.
            std::io::copy(&mut p, &mut std::io::sink())?;
            Ok(buf)
        })
    })
}

fn join(handle: Drain) -> std::io::Result<Vec<u8>> {
    match handle {
        Some(h) => h
            .join()
            .unwrap_or_else(|_| Err(std::io::Error::other("pipe reader panicked"))),
        None => Ok(Vec::new()),
    }
}

/// Extension trait to add `wait_timeout` to `Child`.
trait ChildExt {
    fn wait_timeout(&mut self, timeout: Duration) -> std::io::Result<Option<ExitStatus>>;
}

impl ChildExt for Child {
    fn wait_timeout(&mut self, timeout: Duration) -> std::io::Result<Option<ExitStatus>> {
        let start = Instant::now();
        let poll_interval = Duration::from_millis(10);

        loop {
            match self.try_wait()? {
                Some(status) => return Ok(Some(status)),
                None => {
                    if start.elapsed() >= timeout {
                        return Ok(None);
                    }
                    std::thread::sleep(poll_interval);
                }
            }
        }
    }
}
