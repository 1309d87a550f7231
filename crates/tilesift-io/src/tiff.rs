//! TIFF image format support
//!
//! Reads the first page of 8- and 16-bit gray, gray+alpha, RGB and RGBA
//! TIFF files, which covers the full-resolution level of tiled slide
//! scans. Writes uncompressed 8-bit RGB.

use crate::{IoError, IoResult, raster_from_samples};
use std::io::{Read, Seek, Write};
use tiff::ColorType;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::TiffEncoder;
use tiff::encoder::colortype::RGB8;
use tilesift_core::{ImageFormat, Raster};

/// Read the first page of a TIFF image
pub fn read_tiff<R: Read + Seek>(reader: R) -> IoResult<Raster> {
    let mut decoder = Decoder::new(reader)
        .map_err(|e| IoError::DecodeError(format!("TIFF decode error: {}", e)))?;

    let (width, height) = decoder
        .dimensions()
        .map_err(|e| IoError::DecodeError(format!("TIFF dimensions: {}", e)))?;
    let color_type = decoder
        .colortype()
        .map_err(|e| IoError::DecodeError(format!("TIFF colortype: {}", e)))?;

    let channels = match color_type {
        ColorType::Gray(8 | 16) => 1,
        ColorType::GrayA(8 | 16) => 2,
        ColorType::RGB(8 | 16) => 3,
        ColorType::RGBA(8 | 16) => 4,
        _ => {
            return Err(IoError::UnsupportedFormat(format!(
                "unsupported TIFF color type: {:?}",
                color_type
            )));
        }
    };

    let image_data = decoder
        .read_image()
        .map_err(|e| IoError::DecodeError(format!("Failed to read TIFF image data: {}", e)))?;

    match image_data {
        DecodingResult::U8(data) => {
            raster_from_samples(width, height, channels, &data, ImageFormat::Tiff)
        }
        DecodingResult::U16(data) => {
            let narrowed: Vec<u8> = data.iter().map(|&s| (s >> 8) as u8).collect();
            raster_from_samples(width, height, channels, &narrowed, ImageFormat::Tiff)
        }
        _ => Err(IoError::UnsupportedFormat(format!(
            "unsupported TIFF sample type for {:?}",
            color_type
        ))),
    }
}

/// Write an uncompressed RGB TIFF image
pub fn write_tiff<W: Write + Seek>(raster: &Raster, writer: W) -> IoResult<()> {
    let mut encoder = TiffEncoder::new(writer)
        .map_err(|e| IoError::EncodeError(format!("TIFF encoder error: {}", e)))?;
    encoder
        .write_image::<RGB8>(raster.width(), raster.height(), &raster.to_rgb_bytes())
        .map_err(|e| IoError::EncodeError(format!("TIFF write error: {}", e)))?;
    Ok(())
}
