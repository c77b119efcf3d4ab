use crate::asset::CustomCursor;
use crate::cursor::{CursorState, Point};
use crate::graphics::{BlendMode, Graphics, TextureHandle};
use log::{trace, warn};

/// Where the captured area sits relative to the screen, and how big it is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrawParams {
    pub x_offset: i32,
    pub y_offset: i32,
    pub width: i32,
    pub height: i32,
    /// Prefer the custom cursor, e.g. because the captured window is not focused
    /// and the system glyph does not belong to it.
    pub force_custom: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorSource {
    Custom,
    System,
}

/// The outcome of the per-frame drawing policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawPlan {
    pub source: CursorSource,
    pub texture: Option<TextureHandle>,
    /// Logical pointer position in output space.
    pub position: Point,
    pub hotspot: Point,
    pub inside: bool,
}

impl DrawPlan {
    /// Top-left corner of the sprite.
    pub fn draw_at(&self) -> Point {
        Point::new(
            self.position.x.saturating_sub(self.hotspot.x),
            self.position.y.saturating_sub(self.hotspot.y),
        )
    }
}

#[derive(Debug, Default)]
pub struct CursorCompositor {
    last_valid: Option<Point>,
}

impl CursorCompositor {
    pub fn new() -> Self {
        Default::default()
    }

    /// Most recent output-space position that was inside the captured area.
    pub fn last_valid_position(&self) -> Option<Point> {
        self.last_valid
    }

    /// Decide what to draw this frame. `None` means the cursor never entered the
    /// captured area, so there is nowhere sensible to put it.
    pub fn plan(
        &mut self,
        cursor: &CursorState,
        custom: Option<&CustomCursor>,
        params: &DrawParams,
    ) -> Option<DrawPlan> {
        let x = cursor.position.x.saturating_add(params.x_offset);
        let y = cursor.position.y.saturating_add(params.y_offset);

        let inside = x >= 0 && x <= params.width && y >= 0 && y <= params.height;
        if inside {
            self.last_valid = Some(Point::new(x, y));
        }

        let system = DrawPlan {
            source: CursorSource::System,
            texture: cursor.texture,
            position: Point::new(x, y),
            hotspot: cursor.hotspot,
            inside,
        };

        if inside && !params.force_custom {
            return Some(system);
        }

        let position = if inside {
            Point::new(x, y)
        } else {
            // park the cursor on the edge closest to where it left
            let last = self.last_valid?;
            Point::new(clamp(last.x, params.width), clamp(last.y, params.height))
        };

        Some(match custom {
            Some(custom) => DrawPlan {
                source: CursorSource::Custom,
                texture: Some(custom.texture),
                position,
                hotspot: custom.hotspot(),
                inside,
            },
            None => DrawPlan { position, ..system },
        })
    }

    /// Blend the cursor onto the current target. Returns whether anything was drawn.
    pub fn draw<G>(
        &mut self,
        gfx: &mut G,
        cursor: &CursorState,
        custom: Option<&CustomCursor>,
        params: &DrawParams,
    ) -> bool
    where
        G: Graphics + ?Sized,
    {
        let Some(plan) = self.plan(cursor, custom, params) else {
            trace!("Cursor never entered the captured area, not drawing");
            return false;
        };

        let at = plan.draw_at();
        trace!(
            "Cursor plan: {:?} force={} inside={} pos=({}, {}) draw=({}, {}) visible={}",
            plan.source,
            params.force_custom,
            plan.inside,
            plan.position.x,
            plan.position.y,
            at.x,
            at.y,
            cursor.visible
        );

        let texture = match plan.texture {
            Some(texture) if cursor.visible => texture,
            _ => return false,
        };

        match gfx.draw_sprite(texture, at.x, at.y, BlendMode::SrcAlphaOver) {
            Ok(()) => true,
            Err(e) => {
                warn!("Unable to draw cursor: {e}");
                false
            }
        }
    }
}

fn clamp(v: i32, max: i32) -> i32 {
    let v = if v < 0 { 0 } else { v };
    if v > max {
        max
    } else {
        v
    }
}
