use crate::graphics::{BlendMode, Graphics, GraphicsError, TextureHandle, TextureUsage};
use crate::image::{Bgra, ColorFormat, Image, ImageBuf};
use crate::util::AsUsize;
use log::trace;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GraphicsStats {
    pub textures_created: usize,
    pub textures_destroyed: usize,
    pub uploads: usize,
    pub draws: usize,
}

#[derive(Debug)]
struct SoftTexture {
    image: ImageBuf,
}

/// CPU implementation of [`Graphics`] that composites onto a bound BGRA frame.
#[derive(Debug, Default)]
pub struct SoftwareGraphics {
    textures: Vec<Option<SoftTexture>>,
    target: Option<ImageBuf>,
    depth: u32,
    stats: GraphicsStats,
}

impl SoftwareGraphics {
    pub fn new() -> Self {
        Default::default()
    }

    /// Bind `frame` as the target of subsequent draws.
    pub fn bind_target(&mut self, frame: ImageBuf) {
        assert_eq!(
            frame.color_format,
            ColorFormat::Bgra8888,
            "only BGRA render targets are supported"
        );
        frame.validate();
        self.target = Some(frame);
    }

    pub fn take_target(&mut self) -> Option<ImageBuf> {
        self.target.take()
    }

    pub fn target(&self) -> Option<&ImageBuf> {
        self.target.as_ref()
    }

    pub fn stats(&self) -> GraphicsStats {
        self.stats
    }

    pub fn live_textures(&self) -> usize {
        self.textures.iter().filter(|x| x.is_some()).count()
    }

    pub fn is_entered(&self) -> bool {
        self.depth > 0
    }

    pub fn texture_size(&self, texture: TextureHandle) -> Option<(u32, u32)> {
        self.get(texture)
            .ok()
            .map(|x| (x.image.width, x.image.height))
    }

    pub fn texture_image(&self, texture: TextureHandle) -> Option<&ImageBuf> {
        self.get(texture).ok().map(|x| &x.image)
    }

    fn ensure_entered(&self) -> Result<(), GraphicsError> {
        if self.depth == 0 {
            return Err(GraphicsError::NotEntered);
        }
        Ok(())
    }

    fn get(&self, texture: TextureHandle) -> Result<&SoftTexture, GraphicsError> {
        self.textures
            .get(texture.0.as_usize())
            .and_then(Option::as_ref)
            .ok_or(GraphicsError::UnknownTexture(texture))
    }

    fn get_mut(&mut self, texture: TextureHandle) -> Result<&mut SoftTexture, GraphicsError> {
        self.textures
            .get_mut(texture.0.as_usize())
            .and_then(Option::as_mut)
            .ok_or(GraphicsError::UnknownTexture(texture))
    }
}

impl Graphics for SoftwareGraphics {
    fn enter(&mut self) {
        self.depth += 1;
    }

    fn leave(&mut self) {
        debug_assert!(self.depth > 0, "leave without enter");
        self.depth = self.depth.saturating_sub(1);
    }

    fn create_texture(
        &mut self,
        width: u32,
        height: u32,
        format: ColorFormat,
        usage: TextureUsage,
    ) -> Result<TextureHandle, GraphicsError> {
        self.ensure_entered()?;
        if width == 0 || height == 0 {
            return Err(GraphicsError::ZeroSize(width, height));
        }

        let handle = TextureHandle(self.textures.len() as u32);
        self.textures.push(Some(SoftTexture {
            image: ImageBuf::alloc(width, height, None, format),
        }));
        self.stats.textures_created += 1;

        trace!("created {width}x{height} {usage:?} texture {handle:?}");
        Ok(handle)
    }

    fn set_image(
        &mut self,
        texture: TextureHandle,
        image: &Image<&[u8]>,
    ) -> Result<(), GraphicsError> {
        self.ensure_entered()?;
        image.validate();

        let tex = self.get_mut(texture)?;
        let expected = (tex.image.width, tex.image.height);
        let actual = (image.width, image.height);
        if expected != actual {
            return Err(GraphicsError::SizeMismatch { expected, actual });
        }
        if tex.image.color_format != image.color_format {
            return Err(GraphicsError::FormatMismatch {
                expected: tex.image.color_format,
                actual: image.color_format,
            });
        }

        for y in 0..image.height {
            tex.image.row_mut(y).copy_from_slice(image.row(y));
        }
        self.stats.uploads += 1;

        Ok(())
    }

    fn destroy_texture(&mut self, texture: TextureHandle) -> Result<(), GraphicsError> {
        self.ensure_entered()?;

        let slot = self
            .textures
            .get_mut(texture.0.as_usize())
            .filter(|x| x.is_some())
            .ok_or(GraphicsError::UnknownTexture(texture))?;
        *slot = None;
        self.stats.textures_destroyed += 1;

        Ok(())
    }

    fn draw_sprite(
        &mut self,
        texture: TextureHandle,
        x: i32,
        y: i32,
        blend: BlendMode,
    ) -> Result<(), GraphicsError> {
        let Some(target) = self.target.as_mut() else {
            return Err(GraphicsError::NoTarget);
        };
        let src = &self
            .textures
            .get(texture.0.as_usize())
            .and_then(Option::as_ref)
            .ok_or(GraphicsError::UnknownTexture(texture))?
            .image;

        if src.color_format != target.color_format {
            return Err(GraphicsError::FormatMismatch {
                expected: target.color_format,
                actual: src.color_format,
            });
        }

        match blend {
            BlendMode::SrcAlphaOver => blit_src_alpha_over(target, src, x, y),
        }
        self.stats.draws += 1;

        Ok(())
    }
}

fn blit_src_alpha_over(dst: &mut ImageBuf, src: &ImageBuf, x: i32, y: i32) {
    // clip the sprite rectangle against the target
    let x0 = i64::from(x).max(0);
    let y0 = i64::from(y).max(0);
    let x1 = (i64::from(x) + i64::from(src.width)).min(i64::from(dst.width));
    let y1 = (i64::from(y) + i64::from(src.height)).min(i64::from(dst.height));
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    let src_x = (x0 - i64::from(x)) as usize;
    let len = (x1 - x0) as usize;

    for dst_y in y0..y1 {
        let src_y = (dst_y - i64::from(y)) as u32;
        let src_row = &src.bgra_row(src_y)[src_x..src_x + len];
        let dst_row = &mut dst.bgra_row_mut(dst_y as u32)[x0 as usize..x0 as usize + len];

        for (d, s) in dst_row.iter_mut().zip(src_row) {
            *d = blend_src_alpha_over(*s, *d);
        }
    }
}

#[inline]
fn blend_src_alpha_over(src: Bgra, dst: Bgra) -> Bgra {
    let a = u32::from(src.a);
    let mix = |s: u8, d: u8| ((u32::from(s) * a + u32::from(d) * (255 - a) + 127) / 255) as u8;

    Bgra {
        b: mix(src.b, dst.b),
        g: mix(src.g, dst.g),
        r: mix(src.r, dst.r),
        a: mix(src.a, dst.a),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::enter_graphics;

    fn solid(width: u32, height: u32, px: Bgra) -> ImageBuf {
        let mut img = ImageBuf::alloc(width, height, None, ColorFormat::Bgra8888);
        for y in 0..height {
            img.bgra_row_mut(y).fill(px);
        }
        img
    }

    fn upload(gfx: &mut SoftwareGraphics, img: &ImageBuf) -> TextureHandle {
        let mut gfx = enter_graphics(gfx);
        let tex = gfx
            .create_texture(img.width, img.height, img.color_format, TextureUsage::Dynamic)
            .unwrap();
        gfx.set_image(tex, &img.as_ref()).unwrap();
        tex
    }

    #[test]
    fn texture_ops_require_entered_context() {
        let mut gfx = SoftwareGraphics::new();

        let err = gfx
            .create_texture(4, 4, ColorFormat::Bgra8888, TextureUsage::Static)
            .unwrap_err();
        assert!(matches!(err, GraphicsError::NotEntered));

        {
            let mut scope = enter_graphics(&mut gfx);
            assert!(scope.is_entered());
            scope
                .create_texture(4, 4, ColorFormat::Bgra8888, TextureUsage::Static)
                .unwrap();
        }
        assert!(!gfx.is_entered());
    }

    #[test]
    fn opaque_sprite_replaces_and_transparent_keeps() {
        let mut gfx = SoftwareGraphics::new();
        gfx.bind_target(solid(4, 4, Bgra::new(10, 20, 30, 0xFF)));

        let mut sprite = ImageBuf::alloc(2, 1, None, ColorFormat::Bgra8888);
        sprite.bgra_row_mut(0)[0] = Bgra::WHITE;
        sprite.bgra_row_mut(0)[1] = Bgra::TRANSPARENT;
        let tex = upload(&mut gfx, &sprite);

        gfx.draw_sprite(tex, 1, 2, BlendMode::SrcAlphaOver).unwrap();

        let frame = gfx.take_target().unwrap();
        assert_eq!(frame.pixel(1, 2), Bgra::WHITE);
        assert_eq!(frame.pixel(2, 2), Bgra::new(10, 20, 30, 0xFF));
        assert_eq!(frame.pixel(0, 0), Bgra::new(10, 20, 30, 0xFF));
    }

    #[test]
    fn half_alpha_mixes() {
        let out = blend_src_alpha_over(Bgra::new(255, 0, 0, 128), Bgra::new(0, 0, 255, 255));
        assert_eq!(out.r, 128);
        assert_eq!(out.b, 127);
    }

    #[test]
    fn sprite_is_clipped_at_edges() {
        let mut gfx = SoftwareGraphics::new();
        gfx.bind_target(solid(3, 3, Bgra::BLACK));
        let tex = upload(&mut gfx, &solid(2, 2, Bgra::WHITE));

        gfx.draw_sprite(tex, -1, 2, BlendMode::SrcAlphaOver).unwrap();
        gfx.draw_sprite(tex, 10, 10, BlendMode::SrcAlphaOver).unwrap();

        let frame = gfx.take_target().unwrap();
        assert_eq!(frame.pixel(0, 2), Bgra::WHITE);
        assert_eq!(frame.pixel(1, 2), Bgra::BLACK);
        assert_eq!(frame.pixel(0, 1), Bgra::BLACK);
        assert_eq!(gfx.stats().draws, 2);
    }

    #[test]
    fn draw_without_target_fails() {
        let mut gfx = SoftwareGraphics::new();
        let tex = upload(&mut gfx, &solid(1, 1, Bgra::WHITE));
        assert!(matches!(
            gfx.draw_sprite(tex, 0, 0, BlendMode::SrcAlphaOver),
            Err(GraphicsError::NoTarget)
        ));
    }
}
