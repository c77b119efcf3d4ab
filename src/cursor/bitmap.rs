use crate::util::AsUsize;

/// Raw bits of an OS bitmap, rows top to bottom.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitmapData {
    pub width: u32,
    pub height: u32,
    /// Bytes per row
    pub stride: u32,
    pub bits_per_pixel: u16,
    pub data: Vec<u8>,
}

impl BitmapData {
    /// Returns `None` for a zero-sized bitmap or a buffer shorter than `height * stride`.
    pub fn new(
        width: u32,
        height: u32,
        stride: u32,
        bits_per_pixel: u16,
        data: Vec<u8>,
    ) -> Option<Self> {
        let size = height.checked_mul(stride)?;
        if size == 0 || width == 0 || data.len() < size.as_usize() {
            return None;
        }

        Some(BitmapData {
            width,
            height,
            stride,
            bits_per_pixel,
            data,
        })
    }

    /// Number of bytes an extractor allocates for a bitmap of this shape.
    pub fn byte_len(&self) -> usize {
        self.height.as_usize() * self.stride.as_usize()
    }

    pub fn row(&self, y: u32) -> &[u8] {
        let start = y.as_usize() * self.stride.as_usize();
        &self.data[start..start + self.stride.as_usize()]
    }

    /// Bit `x` of row `y` in a 1bpp bitmap, most significant bit first.
    #[inline]
    pub fn bit(&self, x: u32, y: u32) -> bool {
        let byte = self.row(y)[(x / 8).as_usize()];
        (byte >> (7 - x % 8)) & 1 != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_sized_bitmap_has_no_data() {
        assert!(BitmapData::new(0, 0, 0, 32, vec![]).is_none());
        assert!(BitmapData::new(16, 0, 2, 1, vec![]).is_none());
        assert!(BitmapData::new(16, 16, 2, 1, vec![0; 31]).is_none());
        assert!(BitmapData::new(16, 16, 2, 1, vec![0; 32]).is_some());
    }

    #[test]
    fn bits_are_msb_first_and_honor_stride() {
        // 12 pixels wide, rows padded to 4 bytes
        let data = vec![0b1000_0000, 0b0001_0000, 0xFF, 0xFF, 0b0000_0001, 0, 0, 0];
        let bmp = BitmapData::new(12, 2, 4, 1, data).unwrap();

        assert!(bmp.bit(0, 0));
        assert!(!bmp.bit(1, 0));
        assert!(bmp.bit(11, 0));
        assert!(!bmp.bit(10, 0));
        assert!(bmp.bit(7, 1));
        assert!(!bmp.bit(0, 1));
    }
}
