use crate::cursor::{BitmapData, CursorPlatform, Point};
use crate::image::{Bgra, ColorFormat, Image, ImageBuf};
use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unable to query icon info")]
    NoIconInfo,
    #[error("cursor has no usable bitmap data")]
    NoBitmapData,
}

/// Decoded cursor pixels in [`ColorFormat::Bgra8888`].
#[derive(Clone, Debug)]
pub struct DecodedCursorImage {
    pub image: ImageBuf,
    pub monochrome: bool,
}

impl DecodedCursorImage {
    pub fn width(&self) -> u32 {
        self.image.width
    }

    pub fn height(&self) -> u32 {
        self.image.height
    }
}

#[derive(Clone, Debug)]
pub struct DecodedCursor {
    pub image: DecodedCursorImage,
    pub hotspot: Point,
}

/// Decode a duplicated icon. Both bitmaps of the icon are released before returning.
pub fn decode_icon<P>(platform: &mut P, icon: &P::Icon) -> Result<DecodedCursor, DecodeError>
where
    P: CursorPlatform + ?Sized,
{
    let info = platform
        .query_icon_info(icon)
        .ok_or(DecodeError::NoIconInfo)?;

    let color = info.color.as_ref().and_then(|x| platform.extract_bitmap(x));
    let mask = info.mask.as_ref().and_then(|x| platform.extract_bitmap(x));
    let hotspot = info.hotspot;
    drop(info);

    let image = color
        .and_then(|color| color_cursor(color, mask.as_ref()))
        .map(|image| DecodedCursorImage {
            image,
            monochrome: false,
        })
        .or_else(|| {
            mask.as_ref()
                .and_then(monochrome_cursor)
                .map(|image| DecodedCursorImage {
                    image,
                    monochrome: true,
                })
        })
        .ok_or(DecodeError::NoBitmapData)?;

    Ok(DecodedCursor { image, hotspot })
}

/// Color cursor from a 32bpp bitmap. When the color bits carry no alpha at all,
/// alpha comes from the AND mask instead (bit set means transparent).
///
/// Returns `None` for bitmaps below 32bpp.
pub fn color_cursor(color: BitmapData, mask: Option<&BitmapData>) -> Option<ImageBuf> {
    if color.bits_per_pixel < 32 || color.stride < color.width * 4 {
        return None;
    }

    let mut image = Image::new(
        color.width,
        color.height,
        color.stride,
        ColorFormat::Bgra8888,
        color.data,
    );

    let Some(mask) = mask else {
        return Some(image);
    };

    let has_alpha = (0..image.height).any(|y| image.bgra_row(y).iter().any(|px| px.a != 0));
    if has_alpha {
        return Some(image);
    }

    let rows = u32::min(mask.height, image.height);
    let cols = u32::min(u32::min(mask.width, mask.stride * 8), image.width);
    for y in 0..rows {
        let row = image.bgra_row_mut(y);
        for x in 0..cols {
            row[x as usize].a = if mask.bit(x, y) { 0 } else { 0xFF };
        }
    }

    Some(image)
}

/// Monochrome cursor from a mask bitmap holding the AND mask above the XOR mask.
pub fn monochrome_cursor(mask: &BitmapData) -> Option<ImageBuf> {
    let width = mask.width;
    let height = mask.height / 2;
    if width == 0 || height == 0 || mask.stride * 8 < width {
        return None;
    }

    let mut image = ImageBuf::alloc(width, height, None, ColorFormat::Bgra8888);
    for y in 0..height {
        let row = image.bgra_row_mut(y);
        for (x, px) in (0..width).zip(row.iter_mut()) {
            *px = monochrome_pixel(mask.bit(x, y), mask.bit(x, y + height));
        }
    }

    Some(image)
}

#[inline]
fn monochrome_pixel(and: bool, xor: bool) -> Bgra {
    match (and, xor) {
        (false, true) => Bgra::WHITE,
        (false, false) => Bgra::BLACK,
        // inverts the screen on the OS; drawn as white
        (true, true) => Bgra::WHITE,
        (true, false) => Bgra::TRANSPARENT,
    }
}
