//! Bundled image assets, such as the replacement cursor drawn while the captured
//! window is unfocused.

use crate::cursor::Point;
use crate::graphics::{enter_graphics, Graphics, TextureHandle, TextureUsage};
use crate::image::{convert_color, premultiply_alpha, ColorFormat, Image, ImageBuf};
use anyhow::{Context, Result};
use log::warn;
use std::path::{Path, PathBuf};

/// Resolves asset names against the directory assets are shipped in.
#[derive(Clone, Debug)]
pub struct AssetLocator {
    root: PathBuf,
}

impl AssetLocator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        AssetLocator { root: root.into() }
    }

    /// Path of the asset `name`, if it exists.
    pub fn find(&self, name: &str) -> Option<PathBuf> {
        let path = self.root.join(name);
        path.is_file().then_some(path)
    }
}

/// Replacement cursor texture, owned by the capture session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CustomCursor {
    pub texture: TextureHandle,
    pub width: u32,
    pub height: u32,
}

impl CustomCursor {
    /// Always the center of the image; the asset format carries no hotspot.
    pub fn hotspot(&self) -> Point {
        Point::new((self.width / 2) as i32, (self.height / 2) as i32)
    }

    /// Must be called inside an entered graphics context.
    pub fn destroy<G: Graphics + ?Sized>(self, gfx: &mut G) {
        if let Err(e) = gfx.destroy_texture(self.texture) {
            warn!("Unable to destroy custom cursor texture: {e}");
        }
    }
}

/// Decode an encoded image into premultiplied BGRA.
pub fn decode_premultiplied(bytes: &[u8]) -> Result<ImageBuf> {
    let rgba = ::image::load_from_memory(bytes)
        .context("unable to decode image")?
        .to_rgba8();
    let (width, height) = rgba.dimensions();

    let src = Image::new(width, height, width * 4, ColorFormat::Rgba8888, rgba.into_raw());
    let mut dst = ImageBuf::alloc(width, height, None, ColorFormat::Bgra8888);
    convert_color(&src, &mut dst);
    premultiply_alpha(&mut dst);

    Ok(dst)
}

pub fn upload_custom_cursor<G>(gfx: &mut G, image: &ImageBuf) -> Result<CustomCursor>
where
    G: Graphics + ?Sized,
{
    let mut gfx = enter_graphics(gfx);

    let texture = gfx.create_texture(
        image.width,
        image.height,
        image.color_format,
        TextureUsage::Static,
    )?;
    if let Err(e) = gfx.set_image(texture, &image.as_ref()) {
        let _ = gfx.destroy_texture(texture);
        return Err(e.into());
    }

    Ok(CustomCursor {
        texture,
        width: image.width,
        height: image.height,
    })
}

pub fn load_custom_cursor<G>(gfx: &mut G, path: &Path) -> Result<CustomCursor>
where
    G: Graphics + ?Sized,
{
    let bytes = std::fs::read(path).with_context(|| format!("unable to read {}", path.display()))?;
    let image = decode_premultiplied(&bytes)
        .with_context(|| format!("unable to load {}", path.display()))?;

    upload_custom_cursor(gfx, &image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::SoftwareGraphics;
    use crate::image::Bgra;
    use std::io::Cursor;

    fn png(pixels: &[[u8; 4]], width: u32) -> Vec<u8> {
        let height = pixels.len() as u32 / width;
        let mut img = ::image::RgbaImage::new(width, height);
        for (i, px) in pixels.iter().enumerate() {
            let i = i as u32;
            img.put_pixel(i % width, i / width, ::image::Rgba(*px));
        }

        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ::image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn png_is_converted_to_premultiplied_bgra() {
        let bytes = png(&[[255, 0, 0, 255], [200, 100, 50, 128]], 2);
        let img = decode_premultiplied(&bytes).unwrap();

        assert_eq!(img.color_format, ColorFormat::Bgra8888);
        assert_eq!(img.pixel(0, 0), Bgra::new(255, 0, 0, 255));
        assert_eq!(img.pixel(1, 0), Bgra::new(100, 50, 25, 128));
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(decode_premultiplied(b"not an image").is_err());
    }

    #[test]
    fn upload_creates_static_texture() {
        let mut gfx = SoftwareGraphics::new();
        let img = decode_premultiplied(&png(&[[0, 0, 0, 255]; 6], 3)).unwrap();

        let custom = upload_custom_cursor(&mut gfx, &img).unwrap();

        assert_eq!((custom.width, custom.height), (3, 2));
        assert_eq!(custom.hotspot(), Point::new(1, 1));
        assert_eq!(gfx.texture_size(custom.texture), Some((3, 2)));
        assert!(!gfx.is_entered());
    }

    #[test]
    fn missing_asset_is_not_found() {
        let assets = AssetLocator::new("/nonexistent-asset-dir");
        assert!(assets.find("cursor.png").is_none());
    }
}
