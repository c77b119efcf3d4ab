//! Rendering-context capability used by the cursor subsystem.
//!
//! Texture creation, upload and destruction are only valid while the context is
//! entered. [`enter_graphics`] returns a guard that leaves the context when it is
//! dropped, so every exit path (including early returns on decode failure)
//! releases it.

mod software;

pub use software::{GraphicsStats, SoftwareGraphics};

use crate::image::{ColorFormat, Image};
use std::ops::{Deref, DerefMut};
use thiserror::Error;

/// Opaque handle to a texture owned by a [`Graphics`] backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub(crate) u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureUsage {
    /// Uploaded once.
    Static,
    /// Re-uploaded whenever the content changes.
    Dynamic,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendMode {
    /// `src * src_alpha + dst * (1 - src_alpha)`
    SrcAlphaOver,
}

#[derive(Debug, Error)]
pub enum GraphicsError {
    #[error("graphics context was not entered")]
    NotEntered,
    #[error("texture {0:?} does not exist")]
    UnknownTexture(TextureHandle),
    #[error("cannot create an empty {0}x{1} texture")]
    ZeroSize(u32, u32),
    #[error("image is {actual:?} but texture is {expected:?}")]
    SizeMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
    #[error("image format {actual:?} does not match texture format {expected:?}")]
    FormatMismatch {
        expected: ColorFormat,
        actual: ColorFormat,
    },
    #[error("no render target is bound")]
    NoTarget,
}

pub trait Graphics {
    /// Acquire the rendering context. Calls nest.
    fn enter(&mut self) {}

    /// Release the rendering context acquired by [`Graphics::enter`].
    fn leave(&mut self) {}

    fn create_texture(
        &mut self,
        width: u32,
        height: u32,
        format: ColorFormat,
        usage: TextureUsage,
    ) -> Result<TextureHandle, GraphicsError>;

    /// Replace the whole content of `texture`.
    fn set_image(
        &mut self,
        texture: TextureHandle,
        image: &Image<&[u8]>,
    ) -> Result<(), GraphicsError>;

    fn destroy_texture(&mut self, texture: TextureHandle) -> Result<(), GraphicsError>;

    /// Draw `texture` unscaled with its top-left corner at (`x`, `y`) of the current target.
    fn draw_sprite(
        &mut self,
        texture: TextureHandle,
        x: i32,
        y: i32,
        blend: BlendMode,
    ) -> Result<(), GraphicsError>;
}

/// Guard returned by [`enter_graphics`].
#[must_use]
pub struct GraphicsScope<'a, G: Graphics + ?Sized> {
    gfx: &'a mut G,
}

pub fn enter_graphics<G: Graphics + ?Sized>(gfx: &mut G) -> GraphicsScope<'_, G> {
    gfx.enter();
    GraphicsScope { gfx }
}

impl<G: Graphics + ?Sized> Deref for GraphicsScope<'_, G> {
    type Target = G;

    fn deref(&self) -> &G {
        self.gfx
    }
}

impl<G: Graphics + ?Sized> DerefMut for GraphicsScope<'_, G> {
    fn deref_mut(&mut self) -> &mut G {
        self.gfx
    }
}

impl<G: Graphics + ?Sized> Drop for GraphicsScope<'_, G> {
    fn drop(&mut self) {
        self.gfx.leave();
    }
}
