//! Regression test parameters and operations

use crate::error::{TestError, TestResult};
use crate::regout_dir;
use std::fs;
use tilesift_core::{ImageFormat, Raster};

/// Regression test mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegTestMode {
    /// Compare computed results against expectations (default)
    #[default]
    Compare,
    /// Compare, and also write intermediate rasters for visual inspection
    Display,
}

impl RegTestMode {
    /// Parse mode from the `REGTEST_MODE` environment variable
    pub fn from_env() -> Self {
        match std::env::var("REGTEST_MODE")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "display" => Self::Display,
            _ => Self::Compare,
        }
    }
}

/// Regression test parameters
///
/// Tracks the state of a regression test: the test name, the index of the
/// current check, the mode, and every recorded failure. Checks never panic;
/// call [`RegParams::cleanup`] at the end and assert on its verdict.
pub struct RegParams {
    /// Name of the test (e.g., "grid")
    pub test_name: String,
    /// Current check index (incremented before each check)
    index: usize,
    /// Test mode
    pub mode: RegTestMode,
    /// Overall success status
    success: bool,
    /// Recorded failures
    failures: Vec<String>,
}

impl RegParams {
    /// Create new regression test parameters
    ///
    /// The mode is taken from the `REGTEST_MODE` environment variable.
    pub fn new(test_name: &str) -> Self {
        let mode = RegTestMode::from_env();

        eprintln!();
        eprintln!("////////////////////////////////////////////////");
        eprintln!("////////////////   {}_reg   ///////////////", test_name);
        eprintln!("////////////////////////////////////////////////");
        eprintln!("Mode: {:?}", mode);

        Self {
            test_name: test_name.to_string(),
            index: 0,
            mode,
            success: true,
            failures: Vec::new(),
        }
    }

    /// Get the current check index
    pub fn index(&self) -> usize {
        self.index
    }

    /// Check if in display mode
    pub fn display(&self) -> bool {
        self.mode == RegTestMode::Display
    }

    fn fail(&mut self, msg: String) {
        eprintln!("{}", msg);
        self.failures.push(msg);
        self.success = false;
    }

    /// Compare two floating-point values
    ///
    /// Returns `true` if `actual` is within `delta` of `expected`.
    pub fn compare_values(&mut self, expected: f64, actual: f64, delta: f64) -> bool {
        self.index += 1;
        let diff = (expected - actual).abs();

        if diff > delta {
            self.fail(format!(
                "Failure in {}_reg: value comparison for index {}\n\
                 difference = {} but allowed delta = {}\n\
                 expected = {}, actual = {}",
                self.test_name, self.index, diff, delta, expected, actual
            ));
            false
        } else {
            true
        }
    }

    /// Compare two rasters for exact equality
    pub fn compare_raster(&mut self, r1: &Raster, r2: &Raster) -> bool {
        self.index += 1;

        if !r1.sizes_equal(r2) {
            self.fail(format!(
                "Failure in {}_reg: raster comparison for index {} - dimension mismatch {:?} vs {:?}",
                self.test_name,
                self.index,
                r1.dimensions(),
                r2.dimensions()
            ));
            return false;
        }

        let mismatch = r1
            .data()
            .iter()
            .zip(r2.data())
            .position(|(a, b)| a != b);
        if let Some(pos) = mismatch {
            let w = r1.width() as usize;
            self.fail(format!(
                "Failure in {}_reg: raster comparison for index {} - pixel mismatch at ({}, {})",
                self.test_name,
                self.index,
                pos % w,
                pos / w
            ));
            return false;
        }

        true
    }

    /// Compare two byte strings
    pub fn compare_strings(&mut self, data1: &[u8], data2: &[u8]) -> bool {
        self.index += 1;

        if data1 != data2 {
            self.fail(format!(
                "Failure in {}_reg: string comparison for index {}\n\
                 sizes: {} vs {}",
                self.test_name,
                self.index,
                data1.len(),
                data2.len()
            ));
            false
        } else {
            true
        }
    }

    /// Write a raster for visual inspection.
    ///
    /// Only writes in display mode; returns the path written, if any.
    pub fn write_artifact(&self, raster: &Raster, label: &str) -> TestResult<Option<String>> {
        if !self.display() {
            return Ok(None);
        }

        let dir = regout_dir();
        fs::create_dir_all(&dir).map_err(|e| TestError::DirectoryCreate {
            path: dir.clone(),
            message: e.to_string(),
        })?;

        let path = format!(
            "{}/{}.{}.{}",
            dir,
            self.test_name,
            label,
            ImageFormat::Png.extension()
        );
        tilesift_io::write_image(raster, &path, ImageFormat::Png).map_err(|e| {
            TestError::ImageWrite {
                path: path.clone(),
                message: e.to_string(),
            }
        })?;
        eprintln!("Wrote: {}", path);
        Ok(Some(path))
    }

    /// Clean up and report results
    ///
    /// Returns `true` if all checks passed.
    pub fn cleanup(self) -> bool {
        if self.success {
            eprintln!("SUCCESS: {}_reg", self.test_name);
        } else {
            eprintln!("FAILURE: {}_reg", self.test_name);
            for failure in &self.failures {
                eprintln!("  {}", failure);
            }
        }
        eprintln!();

        self.success
    }

    /// Check if all checks have passed so far
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Get list of failures
    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilesift_core::Rgb;

    #[test]
    fn test_compare_values_success() {
        let mut rp = RegParams::new("test");
        assert!(rp.compare_values(100.0, 100.0, 0.0));
        assert!(rp.compare_values(100.0, 100.5, 1.0));
        assert_eq!(rp.index(), 2);
        assert!(rp.is_success());
    }

    #[test]
    fn test_compare_values_failure() {
        let mut rp = RegParams::new("test");
        assert!(!rp.compare_values(100.0, 200.0, 0.0));
        assert!(!rp.is_success());
        assert_eq!(rp.failures().len(), 1);
    }

    #[test]
    fn test_compare_raster() {
        let mut rp = RegParams::new("test");
        let a = Raster::new_filled(3, 3, Rgb::WHITE).unwrap();
        let mut m = a.to_mut();
        assert!(rp.compare_raster(&a, &a.clone()));
        m.set_rgb(2, 1, Rgb::BLACK).unwrap();
        assert!(!rp.compare_raster(&a, &m.into()));
        assert!(rp.failures()[0].contains("(2, 1)"));
        assert!(!rp.compare_raster(&a, &Raster::new(3, 4).unwrap()));
    }

    #[test]
    fn test_compare_strings() {
        let mut rp = RegParams::new("test");
        assert!(rp.compare_strings(b"abc", b"abc"));
        assert!(!rp.compare_strings(b"abc", b"abd"));
        assert!(!rp.cleanup());
    }
}
