//! JPEG image format support
//!
//! Decoding uses `jpeg-decoder`, encoding uses `jpeg-encoder`. Grayscale
//! and RGB baseline/progressive images are read; CMYK is converted to RGB
//! without color management.

use crate::{IoError, IoResult, raster_from_samples};
use jpeg_decoder::{Decoder, PixelFormat};
use std::io::{Read, Write};
use tilesift_core::{ImageFormat, Raster};

/// Quality used when no explicit quality is requested.
pub const DEFAULT_QUALITY: u8 = 90;

/// Read a JPEG image from a reader.
pub fn read_jpeg<R: Read>(reader: R) -> IoResult<Raster> {
    let mut decoder = Decoder::new(reader);
    let pixels = decoder
        .decode()
        .map_err(|e| IoError::DecodeError(format!("JPEG decode error: {}", e)))?;
    let info = decoder
        .info()
        .ok_or_else(|| IoError::DecodeError("JPEG header missing".to_string()))?;
    let (width, height) = (u32::from(info.width), u32::from(info.height));

    match info.pixel_format {
        PixelFormat::L8 => raster_from_samples(width, height, 1, &pixels, ImageFormat::Jpeg),
        PixelFormat::RGB24 => raster_from_samples(width, height, 3, &pixels, ImageFormat::Jpeg),
        PixelFormat::CMYK32 => {
            let rgb: Vec<u8> = pixels
                .chunks_exact(4)
                .flat_map(|p| {
                    let k = u32::from(p[3]);
                    [p[0], p[1], p[2]].map(|c| (u32::from(c) * k / 255) as u8)
                })
                .collect();
            raster_from_samples(width, height, 3, &rgb, ImageFormat::Jpeg)
        }
        other => Err(IoError::UnsupportedFormat(format!(
            "unsupported JPEG pixel format: {:?}",
            other
        ))),
    }
}

/// Write a JPEG image at the given quality (1-100).
pub fn write_jpeg<W: Write>(raster: &Raster, writer: W, quality: u8) -> IoResult<()> {
    if !(1..=100).contains(&quality) {
        return Err(IoError::EncodeError(format!(
            "JPEG quality {} outside 1..=100",
            quality
        )));
    }
    let (width, height) = raster.dimensions();
    let (w, h) = match (u16::try_from(width), u16::try_from(height)) {
        (Ok(w), Ok(h)) => (w, h),
        _ => {
            return Err(IoError::EncodeError(format!(
                "JPEG dimensions {}x{} exceed 65535",
                width, height
            )));
        }
    };

    let encoder = jpeg_encoder::Encoder::new(writer, quality);
    encoder
        .encode(&raster.to_rgb_bytes(), w, h, jpeg_encoder::ColorType::Rgb)
        .map_err(|e| IoError::EncodeError(format!("JPEG encode error: {}", e)))
}
