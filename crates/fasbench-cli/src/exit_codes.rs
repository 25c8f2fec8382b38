//! Process exit codes. These are part of the CLI contract.

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_CASE_FAILED: i32 = 1; // A test case failed (or regressed with --fail-on-regression)
pub const EXIT_CONFIG_ERROR: i32 = 2; // Bad configuration, missing corpus, or broken report sink
