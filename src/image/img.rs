use crate::image::ColorFormat;
use crate::util::AsUsize;
use bytemuck::{Pod, Zeroable};
use std::ops::{Deref, DerefMut};

/// One pixel of a [`ColorFormat::Bgra8888`] image.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Bgra {
    pub b: u8,
    pub g: u8,
    pub r: u8,
    pub a: u8,
}

impl Bgra {
    pub const TRANSPARENT: Bgra = Bgra::new(0, 0, 0, 0);
    pub const BLACK: Bgra = Bgra::new(0, 0, 0, 0xFF);
    pub const WHITE: Bgra = Bgra::new(0xFF, 0xFF, 0xFF, 0xFF);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Bgra { b, g, r, a }
    }
}

/// A 2D image with an explicit stride. `T` is the backing storage.
#[derive(Clone, Debug)]
pub struct Image<T> {
    pub width: u32,
    pub height: u32,
    /// Bytes per row
    pub stride: u32,
    pub color_format: ColorFormat,
    pub data: T,
}

pub type ImageBuf = Image<Vec<u8>>;

impl<T> Image<T> {
    pub fn new(width: u32, height: u32, stride: u32, color_format: ColorFormat, data: T) -> Self {
        Image {
            width,
            height,
            stride,
            color_format,
            data,
        }
    }

    pub fn row_bytes(&self) -> usize {
        (self.width * self.color_format.bytes_per_pixel()).as_usize()
    }
}

impl<T: Deref<Target = [u8]>> Image<T> {
    /// Panics if the image metadata does not describe the backing storage.
    pub fn validate(&self) {
        assert!(
            self.row_bytes() <= self.stride.as_usize(),
            "stride {} is smaller than a row of {} bytes",
            self.stride,
            self.row_bytes()
        );

        let required = self.stride.as_usize() * self.height.as_usize();
        assert!(
            required <= self.data.len(),
            "image of {}x{} needs {required} bytes but only has {}",
            self.width,
            self.height,
            self.data.len()
        );
    }

    pub fn as_ref(&self) -> Image<&[u8]> {
        Image {
            width: self.width,
            height: self.height,
            stride: self.stride,
            color_format: self.color_format,
            data: &self.data,
        }
    }

    /// Pixel row `y` without the stride padding.
    pub fn row(&self, y: u32) -> &[u8] {
        let start = (y * self.stride).as_usize();
        &self.data[start..start + self.row_bytes()]
    }

    pub fn bgra_row(&self, y: u32) -> &[Bgra] {
        assert_eq!(self.color_format, ColorFormat::Bgra8888);
        bytemuck::cast_slice(self.row(y))
    }

    pub fn pixel(&self, x: u32, y: u32) -> Bgra {
        self.bgra_row(y)[x.as_usize()]
    }

    /// Copy into a tightly packed buffer.
    pub fn copied(&self) -> ImageBuf {
        let mut dst = ImageBuf::alloc(self.width, self.height, None, self.color_format);
        for y in 0..self.height {
            dst.row_mut(y).copy_from_slice(self.row(y));
        }
        dst
    }
}

impl<T: DerefMut<Target = [u8]>> Image<T> {
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let start = (y * self.stride).as_usize();
        let len = self.row_bytes();
        &mut self.data[start..start + len]
    }

    pub fn bgra_row_mut(&mut self, y: u32) -> &mut [Bgra] {
        assert_eq!(self.color_format, ColorFormat::Bgra8888);
        bytemuck::cast_slice_mut(self.row_mut(y))
    }
}

impl ImageBuf {
    /// Allocate a zeroed image. `stride` defaults to a tightly packed row.
    pub fn alloc(width: u32, height: u32, stride: Option<u32>, color_format: ColorFormat) -> Self {
        let stride = stride.unwrap_or(width * color_format.bytes_per_pixel());
        let data = vec![0; stride.as_usize() * height.as_usize()];
        Image::new(width, height, stride, color_format, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copied_drops_stride_padding() {
        let mut img = ImageBuf::alloc(2, 2, Some(12), ColorFormat::Bgra8888);
        img.bgra_row_mut(1)[1] = Bgra::WHITE;
        img.data[8] = 0x55; // padding byte

        let packed = img.copied();
        assert_eq!(packed.stride, 8);
        assert_eq!(packed.data.len(), 16);
        assert_eq!(packed.pixel(1, 1), Bgra::WHITE);
        assert_eq!(packed.pixel(0, 0), Bgra::TRANSPARENT);
    }

    #[test]
    #[should_panic]
    fn validate_rejects_short_buffer() {
        let img = Image::new(4, 4, 16, ColorFormat::Bgra8888, vec![0u8; 32]);
        img.validate();
    }
}
