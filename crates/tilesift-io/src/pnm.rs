//! PNM (graymap/pixmap) format support
//!
//! Reads ASCII and binary graymaps (`P2`, `P5`) and pixmaps (`P3`, `P6`)
//! with any maxval up to 65535. Samples are rescaled to 8 bits. Writing
//! always produces a binary pixmap (`P6`) with maxval 255.

use crate::{IoError, IoResult, raster_from_samples};
use std::io::{Read, Write};
use tilesift_core::{ImageFormat, Raster};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    GrayAscii,
    RgbAscii,
    GrayBinary,
    RgbBinary,
}

impl Kind {
    fn from_magic(magic: &[u8]) -> Option<Self> {
        match magic {
            b"P2" => Some(Self::GrayAscii),
            b"P3" => Some(Self::RgbAscii),
            b"P5" => Some(Self::GrayBinary),
            b"P6" => Some(Self::RgbBinary),
            _ => None,
        }
    }

    fn channels(self) -> usize {
        match self {
            Self::GrayAscii | Self::GrayBinary => 1,
            Self::RgbAscii | Self::RgbBinary => 3,
        }
    }
}

/// Cursor over the header tokens of a PNM stream.
struct Tokens<'a> {
    data: &'a [u8],
    pos: usize,
}

impl Tokens<'_> {
    fn skip_whitespace_and_comments(&mut self) {
        while let Some(&b) = self.data.get(self.pos) {
            if b == b'#' {
                while let Some(&c) = self.data.get(self.pos) {
                    self.pos += 1;
                    if c == b'\n' || c == b'\r' {
                        break;
                    }
                }
            } else if b.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn next_u32(&mut self, what: &str) -> IoResult<u32> {
        self.skip_whitespace_and_comments();
        let start = self.pos;
        while self.data.get(self.pos).is_some_and(u8::is_ascii_digit) {
            self.pos += 1;
        }
        std::str::from_utf8(&self.data[start..self.pos])
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| IoError::InvalidData(format!("PNM: bad {} at byte {}", what, start)))
    }
}

fn rescale(sample: u32, maxval: u32) -> u8 {
    if maxval == 255 {
        sample.min(255) as u8
    } else {
        ((sample.min(maxval) * 255 + maxval / 2) / maxval) as u8
    }
}

/// Read a PNM image.
pub fn read_pnm<R: Read>(mut reader: R) -> IoResult<Raster> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;

    let kind = data
        .get(..2)
        .and_then(Kind::from_magic)
        .ok_or_else(|| IoError::UnsupportedFormat("PNM: unsupported magic".to_string()))?;

    let mut tokens = Tokens { data: &data, pos: 2 };
    let width = tokens.next_u32("width")?;
    let height = tokens.next_u32("height")?;
    let maxval = tokens.next_u32("maxval")?;
    if width == 0 || height == 0 {
        return Err(IoError::InvalidData(format!(
            "PNM: zero dimension {}x{}",
            width, height
        )));
    }
    if maxval == 0 || maxval > 65535 {
        return Err(IoError::InvalidData(format!("PNM: maxval {} out of range", maxval)));
    }

    let count = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(kind.channels()))
        .ok_or_else(|| {
            IoError::InvalidData(format!("PNM: dimensions {}x{} too large", width, height))
        })?;
    let mut samples = Vec::new();

    match kind {
        Kind::GrayAscii | Kind::RgbAscii => {
            // every ASCII sample takes at least two bytes
            samples.reserve(count.min(data.len() / 2));
            for _ in 0..count {
                samples.push(rescale(tokens.next_u32("sample")?, maxval));
            }
        }
        Kind::GrayBinary | Kind::RgbBinary => {
            // exactly one whitespace byte separates the header from the raster
            let start = tokens.pos + 1;
            let wide = maxval > 255;
            let needed = if wide { count.checked_mul(2) } else { Some(count) };
            let body = needed
                .and_then(|n| data.get(start..start.checked_add(n)?))
                .ok_or_else(|| {
                    IoError::InvalidData(format!(
                        "PNM: truncated raster for {}x{} image",
                        width, height
                    ))
                })?;
            samples.reserve(count);
            if wide {
                samples.extend(
                    body.chunks_exact(2)
                        .map(|b| rescale(u32::from(u16::from_be_bytes([b[0], b[1]])), maxval)),
                );
            } else {
                samples.extend(body.iter().map(|&b| rescale(u32::from(b), maxval)));
            }
        }
    }

    raster_from_samples(width, height, kind.channels(), &samples, ImageFormat::Pnm)
}

/// Write a binary pixmap (`P6`).
pub fn write_pnm<W: Write>(raster: &Raster, mut writer: W) -> IoResult<()> {
    write!(writer, "P6\n{} {}\n255\n", raster.width(), raster.height())?;
    writer.write_all(&raster.to_rgb_bytes())?;
    writer.flush()?;
    Ok(())
}
