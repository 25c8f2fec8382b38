//! `fasbench baseline show`: read-only view of stored baselines.

use anyhow::{Context, Result};
use fasbench_core::{baseline, TestCase};
use serde_json::json;

use crate::cli::args::{BaselineShowArgs, OutputFormat};
use crate::exit_codes::EXIT_SUCCESS;

pub fn cmd_baseline_show(args: BaselineShowArgs) -> Result<i32> {
    for input in &args.inputs {
        let tc = TestCase::from_input(input, &args.baseline_extension);
        let stored = baseline::load(&tc.baseline_path)
            .with_context(|| format!("reading baseline for {}", tc.name))?;

        match args.format {
            OutputFormat::Text => match &stored {
                Some(b) => println!("{}\t{:?}\t{}", tc.name, b.score, b.ordering.len()),
                None => println!("{}\tabsent", tc.name),
            },
            OutputFormat::Json => {
                let record = json!({
                    "test_name": tc.name,
                    "baseline_path": tc.baseline_path.display().to_string(),
                    "baseline": stored,
                });
                println!("{record}");
            }
        }
    }
    Ok(EXIT_SUCCESS)
}
