//! JPEG patch output

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tilesift_core::Raster;
use tilesift_io::IoResult;
use tilesift_io::jpeg::write_jpeg;

/// Writes kept tiles as `<dir>/<tile_name>.jpg`.
#[derive(Debug, Clone)]
pub struct PatchWriter {
    dir: PathBuf,
    quality: u8,
}

impl PatchWriter {
    /// Create `dir` (and parents) if needed.
    pub fn create(dir: impl Into<PathBuf>, quality: u8) -> IoResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, quality })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn patch_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.jpg", name))
    }

    /// Encode one patch; returns the file written.
    pub fn write(&self, name: &str, patch: &Raster) -> IoResult<PathBuf> {
        let path = self.patch_path(name);
        let mut writer = BufWriter::new(File::create(&path)?);
        write_jpeg(patch, &mut writer, self.quality)?;
        writer.flush()?;
        Ok(path)
    }
}
