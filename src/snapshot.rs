//! JPEG snapshots of composited frames.

use crate::image::{ColorFormat, Image};
use anyhow::{ensure, Context, Result};
use jpeg_encoder::{ColorType, Encoder, SamplingFactor};
use log::debug;
use std::io::Cursor;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct SnapshotEncoder {
    width: u16,
    height: u16,
    quality: u8,
}

impl SnapshotEncoder {
    pub fn new(w: u32, h: u32, quality: u8) -> Result<Self> {
        ensure!(w <= u16::MAX as u32 && h <= u16::MAX as u32, "image dimension cannot be larger than 65535");
        ensure!(w > 0 && h > 0, "image dimension cannot be zero");

        Ok(SnapshotEncoder {
            width: w as u16,
            height: h as u16,
            quality: quality.clamp(1, 100),
        })
    }

    pub fn resolution(&self) -> (u32, u32) {
        (self.width as u32, self.height as u32)
    }

    pub fn encode(&mut self, img: Image<&[u8]>) -> Result<Vec<u8>> {
        ensure!(
            self.width as u32 == img.width && self.height as u32 == img.height,
            "image resolution changed from {}x{} to {}x{}",
            self.width,
            self.height,
            img.width,
            img.height
        );

        let buf_len = max_buffer_size(self.width, self.height).context("image too large")?;
        let mut cursor = Cursor::new(Vec::with_capacity(buf_len));

        let mut encoder = Encoder::new(&mut cursor, self.quality);
        encoder.set_sampling_factor(SamplingFactor::R_4_2_0);

        let color_type = color_format_to_color_type(img.color_format);

        // The encoder wants tightly packed rows.
        if img.stride as usize == img.row_bytes() {
            encoder.encode(&img.data[..img.row_bytes() * img.height as usize], self.width, self.height, color_type)?;
        } else {
            let mut packed = Vec::with_capacity(img.row_bytes() * img.height as usize);
            for y in 0..img.height {
                packed.extend_from_slice(img.row(y));
            }
            encoder.encode(&packed, self.width, self.height, color_type)?;
        }

        Ok(cursor.into_inner())
    }

    /// Encode `img` and write it to `dir/frame_{index:05}.jpg`.
    pub fn write(&mut self, img: Image<&[u8]>, dir: &Path, index: u64) -> Result<PathBuf> {
        let encoded = self.encode(img)?;
        let path = dir.join(format!("frame_{index:05}.jpg"));
        std::fs::write(&path, &encoded).with_context(|| format!("unable to write {}", path.display()))?;
        debug!("Wrote {} ({} bytes)", path.display(), encoded.len());
        Ok(path)
    }
}

fn color_format_to_color_type(fmt: ColorFormat) -> ColorType {
    match fmt {
        ColorFormat::Bgra8888 => ColorType::Bgra,
        ColorFormat::Rgba8888 => ColorType::Rgba,
    }
}

fn max_buffer_size(width: u16, height: u16) -> Option<usize> {
    let padded_w = (width as usize).checked_next_multiple_of(16)?;
    let padded_h = (height as usize).checked_next_multiple_of(16)?;

    padded_w.checked_mul(padded_h)?.checked_mul(6)?.checked_add(2048)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageBuf;

    #[test]
    fn encodes_padded_frame() {
        let mut img = ImageBuf::alloc(20, 10, Some(96), ColorFormat::Bgra8888);
        img.data.fill(0x80);

        let mut encoder = SnapshotEncoder::new(20, 10, 90).unwrap();
        let jpeg = encoder.encode(img.as_ref()).unwrap();

        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
        assert_eq!(&jpeg[jpeg.len() - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn rejects_resolution_change() {
        let img = ImageBuf::alloc(8, 8, None, ColorFormat::Bgra8888);
        let mut encoder = SnapshotEncoder::new(16, 16, 90).unwrap();
        assert!(encoder.encode(img.as_ref()).is_err());
    }

    #[test]
    fn rejects_oversized() {
        assert!(SnapshotEncoder::new(70_000, 10, 90).is_err());
        assert!(SnapshotEncoder::new(0, 10, 90).is_err());
    }
}
