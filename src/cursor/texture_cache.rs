use crate::graphics::{Graphics, GraphicsError, TextureHandle, TextureUsage};
use crate::image::ColorFormat;
use log::{debug, warn};
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CachedTexture {
    pub width: u32,
    pub height: u32,
    pub texture: TextureHandle,
}

/// Cursor textures keyed by size.
///
/// Cursors come in a handful of standard sizes, so entries are looked up linearly
/// and kept until the session ends.
#[derive(Debug, Default)]
pub struct TextureCache {
    entries: SmallVec<[CachedTexture; 4]>,
}

impl TextureCache {
    pub fn new() -> Self {
        Default::default()
    }

    /// Texture of exactly `width`x`height`, created on first use.
    /// Must be called inside an entered graphics context.
    pub fn acquire<G>(
        &mut self,
        gfx: &mut G,
        width: u32,
        height: u32,
    ) -> Result<TextureHandle, GraphicsError>
    where
        G: Graphics + ?Sized,
    {
        if let Some(entry) = self
            .entries
            .iter()
            .find(|x| x.width == width && x.height == height)
        {
            return Ok(entry.texture);
        }

        let texture =
            gfx.create_texture(width, height, ColorFormat::Bgra8888, TextureUsage::Dynamic)?;
        self.entries.push(CachedTexture {
            width,
            height,
            texture,
        });
        debug!("Cached new {width}x{height} cursor texture");

        Ok(texture)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CachedTexture> {
        self.entries.iter()
    }

    /// Destroy every cached texture. Must be called inside an entered graphics context.
    pub fn release_all<G>(&mut self, gfx: &mut G)
    where
        G: Graphics + ?Sized,
    {
        for entry in self.entries.drain(..) {
            if let Err(e) = gfx.destroy_texture(entry.texture) {
                warn!(
                    "Unable to destroy {}x{} cursor texture: {e}",
                    entry.width, entry.height
                );
            }
        }
    }
}
