use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use fasbench_core::report::totals_line;
use fasbench_core::{
    discovery, harness_root, run_suite, ConfigFile, Engine, HarnessConfig, ProcessSolver, Reporter,
};
use tracing::{info, warn};

use crate::cli::args::RunArgs;
use crate::exit_codes::{EXIT_CASE_FAILED, EXIT_SUCCESS};

/// Merge precedence: harness defaults → --config file → flags / env.
pub(crate) fn resolve_config(args: &RunArgs, root: &Path) -> Result<HarnessConfig> {
    let mut cfg = HarnessConfig::rooted_at(root);

    if let Some(path) = &args.config {
        let file = ConfigFile::load(path)?;
        let base = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        cfg = cfg
            .apply(file, base)
            .with_context(|| format!("invalid config file {}", path.display()))?;
    }

    if let Some(s) = &args.solver {
        cfg.solver = s.clone();
    }
    if let Some(d) = &args.testcases_dir {
        cfg.testcases_dir = d.clone();
    }
    if let Some(n) = args.runs {
        cfg.runs = n;
    }
    if let Some(t) = args.timeout_secs {
        let timeout = Duration::try_from_secs_f64(t)
            .with_context(|| format!("--timeout-secs {t} is not a valid duration"))?;
        cfg.timeout = Some(timeout);
    }
    if args.fail_fast {
        cfg.fail_fast = true;
    }

    cfg.validate()?;
    Ok(cfg)
}

pub(crate) fn run(args: RunArgs) -> Result<i32> {
    let cfg = resolve_config(&args, &harness_root())?;

    let cases = if args.inputs.is_empty() {
        discovery::discover(
            &cfg.testcases_dir,
            &cfg.input_extension,
            &cfg.baseline_extension,
        )?
    } else {
        discovery::from_paths(args.inputs.iter().cloned(), &cfg.baseline_extension)
    };

    info!(
        solver = %cfg.solver.display(),
        cases = cases.len(),
        runs = cfg.runs,
        timeout = ?cfg.timeout,
        "starting suite"
    );

    let solver = ProcessSolver::new(&cfg.solver)
        .with_args(cfg.solver_args.iter().cloned())
        .with_timeout(cfg.timeout);
    let engine = Engine::new(solver, cfg.runs)?;

    let mut reporter = Reporter::new(std::io::stdout().lock(), args.format.into());
    let report = run_suite(&engine, &cases, cfg.fail_fast, |o| reporter.emit(o))
        .context("writing report")?;

    for (name, error) in report.failures() {
        eprintln!("FAILED {name}: {error}");
    }
    if report.skipped > 0 {
        warn!(skipped = report.skipped, "stopped early (--fail-fast)");
    }

    let counts = report.counts();
    info!("{}", totals_line(&counts));

    let code = if counts.failed > 0 || (args.fail_on_regression && counts.regressed > 0) {
        EXIT_CASE_FAILED
    } else {
        EXIT_SUCCESS
    };
    Ok(code)
}
