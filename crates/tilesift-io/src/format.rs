//! Image format detection
//!
//! Detects image formats by examining magic numbers in the file header.

use crate::{IoError, IoResult};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tilesift_core::ImageFormat;

/// Magic numbers for image format detection
mod magic {
    /// PNG: 89 50 4E 47 0D 0A 1A 0A
    pub const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    /// JPEG: FF D8 FF
    pub const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF];

    /// TIFF little-endian: II 2A 00
    pub const TIFF_LE: &[u8] = &[0x49, 0x49, 0x2A, 0x00];

    /// TIFF big-endian: MM 00 2A
    pub const TIFF_BE: &[u8] = &[0x4D, 0x4D, 0x00, 0x2A];

    /// BigTIFF little-endian: II 2B 00
    pub const BIGTIFF_LE: &[u8] = &[0x49, 0x49, 0x2B, 0x00];

    /// BigTIFF big-endian: MM 00 2B
    pub const BIGTIFF_BE: &[u8] = &[0x4D, 0x4D, 0x00, 0x2B];

    /// Graymap and pixmap magics, ASCII and binary
    pub const PNM: [&[u8]; 4] = [b"P2", b"P3", b"P5", b"P6"];
}

/// Detect image format from a file path
pub fn detect_format<P: AsRef<Path>>(path: P) -> IoResult<ImageFormat> {
    let mut file = File::open(path)?;
    let mut header = [0u8; 8];
    let mut filled = 0;
    while filled < header.len() {
        let n = file.read(&mut header[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    detect_format_from_bytes(&header[..filled])
}

/// Detect image format from bytes
pub fn detect_format_from_bytes(data: &[u8]) -> IoResult<ImageFormat> {
    if data.len() < 2 {
        return Err(IoError::InvalidData(
            "not enough data to detect format".to_string(),
        ));
    }

    if data.starts_with(magic::PNG) {
        return Ok(ImageFormat::Png);
    }

    if data.starts_with(magic::JPEG) {
        return Ok(ImageFormat::Jpeg);
    }

    if [magic::TIFF_LE, magic::TIFF_BE, magic::BIGTIFF_LE, magic::BIGTIFF_BE]
        .iter()
        .any(|m| data.starts_with(m))
    {
        return Ok(ImageFormat::Tiff);
    }

    if magic::PNM.iter().any(|m| data.starts_with(m)) {
        return Ok(ImageFormat::Pnm);
    }

    Err(IoError::UnsupportedFormat(
        "unknown image format".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_png() {
        let data = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];
        assert_eq!(detect_format_from_bytes(&data).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn test_detect_jpeg() {
        let data = [0xFF, 0xD8, 0xFF, 0xE0];
        assert_eq!(detect_format_from_bytes(&data).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_detect_tiff() {
        assert_eq!(
            detect_format_from_bytes(&[0x49, 0x49, 0x2A, 0x00, 8, 0]).unwrap(),
            ImageFormat::Tiff
        );
        assert_eq!(
            detect_format_from_bytes(&[0x4D, 0x4D, 0x00, 0x2B]).unwrap(),
            ImageFormat::Tiff
        );
    }

    #[test]
    fn test_detect_pnm() {
        assert_eq!(detect_format_from_bytes(b"P6\n4 4\n255\n").unwrap(), ImageFormat::Pnm);
        assert_eq!(detect_format_from_bytes(b"P3 1 1").unwrap(), ImageFormat::Pnm);
        // bitmaps are not handled
        assert!(detect_format_from_bytes(b"P4\n").is_err());
    }

    #[test]
    fn test_detect_short_or_unknown() {
        assert!(matches!(
            detect_format_from_bytes(b"P"),
            Err(IoError::InvalidData(_))
        ));
        assert!(matches!(
            detect_format_from_bytes(b"GIF89a"),
            Err(IoError::UnsupportedFormat(_))
        ));
    }
}
