//! tilesift-io - Raster image I/O
//!
//! Reading and writing of the formats a slide tiling run touches:
//!
//! - PNM: graymaps and pixmaps, used for segmentation masks
//! - PNG: lossless artifacts
//! - JPEG: patches and thumbnails, with selectable quality
//! - TIFF: full-resolution slide scans
//!
//! Every decoder produces an RGB [`Raster`]; alpha and extra precision are
//! dropped on read.

mod error;
pub mod format;

#[cfg(feature = "jpeg")]
pub mod jpeg;
#[cfg(feature = "png-format")]
pub mod png;
#[cfg(feature = "pnm")]
pub mod pnm;
#[cfg(feature = "tiff-format")]
pub mod tiff;

pub use error::{IoError, IoResult};
pub use format::{detect_format, detect_format_from_bytes};
pub use tilesift_core::ImageFormat;

use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Seek, Write};
use std::path::Path;
use tilesift_core::Raster;

/// Build a raster from interleaved 8-bit samples.
///
/// `channels` is 1 (gray), 2 (gray + alpha), 3 (RGB) or 4 (RGBA).
pub(crate) fn raster_from_samples(
    width: u32,
    height: u32,
    channels: usize,
    samples: &[u8],
    format: ImageFormat,
) -> IoResult<Raster> {
    let expected = width as usize * height as usize * channels;
    if samples.len() < expected {
        return Err(IoError::InvalidData(format!(
            "expected {} samples for {}x{}x{}, got {}",
            expected,
            width,
            height,
            channels,
            samples.len()
        )));
    }
    let samples = &samples[..expected];

    let raster = match channels {
        3 => Raster::from_rgb_bytes(width, height, samples)?,
        1 | 2 | 4 => {
            let rgb: Vec<u8> = samples
                .chunks_exact(channels)
                .flat_map(|p| match channels {
                    4 => [p[0], p[1], p[2]],
                    _ => [p[0]; 3],
                })
                .collect();
            Raster::from_rgb_bytes(width, height, &rgb)?
        }
        n => {
            return Err(IoError::InvalidData(format!(
                "unsupported channel count {}",
                n
            )));
        }
    };

    let mut raster = raster.into_mut();
    raster.set_informat(format);
    Ok(raster.into())
}

/// Read an image from a file path, detecting the format from its header.
pub fn read_image<P: AsRef<Path>>(path: P) -> IoResult<Raster> {
    let path = path.as_ref();
    let format = detect_format(path)?;
    let file = File::open(path)?;
    read_image_format(BufReader::new(file), format)
}

/// Read an image held in memory.
pub fn read_image_mem(data: &[u8]) -> IoResult<Raster> {
    let format = detect_format_from_bytes(data)?;
    read_image_format(Cursor::new(data), format)
}

/// Read an image in a known format.
#[allow(unused_variables)]
pub fn read_image_format<R: std::io::BufRead + Seek>(
    reader: R,
    format: ImageFormat,
) -> IoResult<Raster> {
    match format {
        #[cfg(feature = "pnm")]
        ImageFormat::Pnm => pnm::read_pnm(reader),
        #[cfg(feature = "png-format")]
        ImageFormat::Png => png::read_png(reader),
        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => jpeg::read_jpeg(reader),
        #[cfg(feature = "tiff-format")]
        ImageFormat::Tiff => tiff::read_tiff(reader),
        other => Err(IoError::UnsupportedFormat(format!(
            "no reader for {:?}",
            other
        ))),
    }
}

/// Write an image to a file path.
///
/// JPEG output uses [`jpeg::DEFAULT_QUALITY`].
pub fn write_image<P: AsRef<Path>>(
    raster: &Raster,
    path: P,
    format: ImageFormat,
) -> IoResult<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_image_format(raster, &mut writer, format)?;
    writer.flush()?;
    Ok(())
}

/// Encode an image into a byte vector.
pub fn write_image_mem(raster: &Raster, format: ImageFormat) -> IoResult<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    write_image_format(raster, &mut cursor, format)?;
    Ok(cursor.into_inner())
}

/// Encode an image in the given format.
#[allow(unused_variables)]
pub fn write_image_format<W: Write + Seek>(
    raster: &Raster,
    writer: W,
    format: ImageFormat,
) -> IoResult<()> {
    match format {
        #[cfg(feature = "pnm")]
        ImageFormat::Pnm => pnm::write_pnm(raster, writer),
        #[cfg(feature = "png-format")]
        ImageFormat::Png => png::write_png(raster, writer),
        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => jpeg::write_jpeg(raster, writer, jpeg::DEFAULT_QUALITY),
        #[cfg(feature = "tiff-format")]
        ImageFormat::Tiff => tiff::write_tiff(raster, writer),
        other => Err(IoError::UnsupportedFormat(format!(
            "no writer for {:?}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilesift_core::Rgb;

    #[test]
    fn test_samples_gray_and_rgba() {
        let gray = raster_from_samples(2, 1, 1, &[7, 9], ImageFormat::Png).unwrap();
        assert_eq!(gray.get_rgb(1, 0), Some(Rgb::new(9, 9, 9)));

        let rgba =
            raster_from_samples(1, 1, 4, &[1, 2, 3, 0], ImageFormat::Tiff).unwrap();
        assert_eq!(rgba.get_rgb(0, 0), Some(Rgb::new(1, 2, 3)));
        assert_eq!(rgba.informat(), ImageFormat::Tiff);
    }

    #[test]
    fn test_samples_short_buffer() {
        assert!(matches!(
            raster_from_samples(2, 2, 3, &[0; 11], ImageFormat::Png),
            Err(IoError::InvalidData(_))
        ));
        assert!(raster_from_samples(1, 1, 5, &[0; 5], ImageFormat::Png).is_err());
    }

    #[test]
    fn test_unknown_format() {
        let r = Raster::new(2, 2).unwrap();
        assert!(matches!(
            write_image_mem(&r, ImageFormat::Unknown),
            Err(IoError::UnsupportedFormat(_))
        ));
    }
}
