//! Cursor capture: sample the OS cursor each frame, decode its icon into a
//! BGRA texture, and composite it onto captured frames.

mod bitmap;
mod capture;
mod compositor;
mod decode;
mod platform;
mod sampler;
mod texture_cache;

pub use bitmap::BitmapData;
pub use capture::CursorCapture;
pub use compositor::{CursorCompositor, CursorSource, DrawParams, DrawPlan};
pub use decode::{
    color_cursor, decode_icon, monochrome_cursor, DecodeError, DecodedCursor,
    DecodedCursorImage,
};
pub use platform::{CursorId, CursorInfo, CursorPlatform, IconInfo};
pub use sampler::{CursorSampler, CursorState, SamplerState};
pub use texture_cache::{CachedTexture, TextureCache};

/// A position in screen or output space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }
}
