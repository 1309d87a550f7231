//! tilesift-test - Regression test framework for tilesift
//!
//! This crate provides the regression test harness shared by every crate's
//! `tests/` directory, plus builders for synthetic slides and masks:
//!
//! - **Compare** (default): checks record failures, `cleanup()` reports them
//! - **Display**: additionally writes intermediate rasters to `tests/regout`
//!
//! # Usage
//!
//! ```ignore
//! use tilesift_test::RegParams;
//!
//! let mut rp = RegParams::new("grid");
//! rp.compare_values(9.0, grid.tile_count() as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "compare" or "display"

mod error;
mod params;
pub mod synth;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

/// Get the path to the workspace root
fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // tilesift-test is at crates/tilesift-test, so go up two directories
    format!("{}/../..", manifest_dir)
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> String {
    format!("{}/tests/regout", workspace_root())
}
