//! PNG image format support

use crate::{IoError, IoResult, raster_from_samples};
use png::{BitDepth, ColorType, Decoder, Encoder, Transformations};
use std::io::{BufRead, Seek, Write};
use tilesift_core::{ImageFormat, Raster};

/// Read a PNG image
///
/// Palette and sub-byte images are expanded and 16-bit samples are
/// stripped to 8 bits. Alpha is discarded.
pub fn read_png<R: BufRead + Seek>(reader: R) -> IoResult<Raster> {
    let mut decoder = Decoder::new(reader);
    decoder.set_transformations(Transformations::normalize_to_color8());
    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::DecodeError(format!("PNG decode error: {}", e)))?;

    let info = reader.info();
    let (width, height) = (info.width, info.height);

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("failed to get output buffer size".to_string()))?;
    let mut buf = vec![0; buf_size];
    let output_info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::DecodeError(format!("PNG frame error: {}", e)))?;

    let channels = match output_info.color_type {
        ColorType::Grayscale => 1,
        ColorType::GrayscaleAlpha => 2,
        ColorType::Rgb => 3,
        ColorType::Rgba => 4,
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported PNG output format: {:?} {:?}",
                other, output_info.bit_depth
            )));
        }
    };
    if output_info.bit_depth != BitDepth::Eight {
        return Err(IoError::UnsupportedFormat(format!(
            "unexpected PNG output depth: {:?}",
            output_info.bit_depth
        )));
    }

    // Rows may be padded; repack to a tight interleaved buffer
    let row_len = width as usize * channels;
    let line_size = output_info.line_size;
    let mut samples = Vec::with_capacity(row_len * height as usize);
    for y in 0..height as usize {
        let start = y * line_size;
        samples.extend_from_slice(&buf[start..start + row_len]);
    }

    raster_from_samples(width, height, channels, &samples, ImageFormat::Png)
}

/// Write a PNG image as 8-bit RGB
pub fn write_png<W: Write>(raster: &Raster, writer: W) -> IoResult<()> {
    let mut encoder = Encoder::new(writer, raster.width(), raster.height());
    encoder.set_color(ColorType::Rgb);
    encoder.set_depth(BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(format!("PNG header error: {}", e)))?;
    writer
        .write_image_data(&raster.to_rgb_bytes())
        .map_err(|e| IoError::EncodeError(format!("PNG write error: {}", e)))?;
    writer
        .finish()
        .map_err(|e| IoError::EncodeError(format!("PNG finish error: {}", e)))?;
    Ok(())
}
