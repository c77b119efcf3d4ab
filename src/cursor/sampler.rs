use crate::cursor::{decode_icon, CursorId, CursorPlatform, DecodedCursor, Point, TextureCache};
use crate::graphics::{enter_graphics, Graphics, TextureHandle};
use log::{debug, trace, warn};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SamplerState {
    /// No cursor observed yet.
    #[default]
    Unknown,
    Tracking(CursorId),
}

/// What the compositor needs to know about the system cursor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CursorState {
    /// Screen position of the last successful query.
    pub position: Point,
    pub visible: bool,
    pub monochrome: bool,
    pub hotspot: Point,
    /// Texture holding the last successfully decoded glyph.
    pub texture: Option<TextureHandle>,
    /// Size of `texture`.
    pub size: (u32, u32),
}

/// Polls the OS cursor once per frame and re-decodes its glyph only when the identity changes.
#[derive(Debug, Default)]
pub struct CursorSampler {
    state: SamplerState,
    cursor: CursorState,
    /// The glyph of the tracked identity decoded and uploaded.
    decoded: bool,
    decodes: usize,
}

impl CursorSampler {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn state(&self) -> SamplerState {
        self.state
    }

    pub fn cursor(&self) -> &CursorState {
        &self.cursor
    }

    /// Number of decode attempts so far.
    pub fn decodes(&self) -> usize {
        self.decodes
    }

    pub fn poll<P, G>(&mut self, platform: &mut P, gfx: &mut G, cache: &mut TextureCache)
    where
        P: CursorPlatform + ?Sized,
        G: Graphics + ?Sized,
    {
        let Some(info) = platform.query_cursor() else {
            trace!("Cursor query failed, hiding cursor this frame");
            self.cursor.visible = false;
            return;
        };

        self.cursor.position = info.position;

        if self.state != SamplerState::Tracking(info.id) {
            self.decoded = match platform.duplicate_icon(info.id) {
                Some(icon) => {
                    let ok = self.capture_icon(platform, gfx, cache, &icon);
                    drop(icon);
                    ok
                }
                None => {
                    debug!("Unable to duplicate cursor {:?}", info.id);
                    false
                }
            };
            self.state = SamplerState::Tracking(info.id);
        }

        self.cursor.visible = self.decoded && info.showing;
    }

    /// Decode `icon` and upload it. On failure the previous texture and hotspot stay untouched.
    fn capture_icon<P, G>(
        &mut self,
        platform: &mut P,
        gfx: &mut G,
        cache: &mut TextureCache,
        icon: &P::Icon,
    ) -> bool
    where
        P: CursorPlatform + ?Sized,
        G: Graphics + ?Sized,
    {
        let mut gfx = enter_graphics(gfx);

        self.decodes += 1;
        let DecodedCursor { image, hotspot } = match decode_icon(platform, icon) {
            Ok(x) => x,
            Err(e) => {
                debug!("Unable to decode cursor: {e}");
                return false;
            }
        };

        let size = (image.width(), image.height());
        let texture = match self.cursor.texture {
            Some(texture) if self.cursor.size == size => texture,
            _ => match cache.acquire(&mut *gfx, size.0, size.1) {
                Ok(texture) => texture,
                Err(e) => {
                    warn!("Unable to get a {}x{} cursor texture: {e}", size.0, size.1);
                    return false;
                }
            },
        };

        if let Err(e) = gfx.set_image(texture, &image.image.as_ref()) {
            warn!("Unable to upload cursor image: {e}");
            return false;
        }

        debug!(
            "Captured {}x{} {} cursor, hotspot ({}, {})",
            size.0,
            size.1,
            if image.monochrome { "monochrome" } else { "color" },
            hotspot.x,
            hotspot.y
        );

        self.cursor.texture = Some(texture);
        self.cursor.size = size;
        self.cursor.hotspot = hotspot;
        self.cursor.monochrome = image.monochrome;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::CursorInfo;
    use crate::graphics::SoftwareGraphics;
    use crate::image::Bgra;
    use crate::platform::scripted::{solid_color, uniform_mask, ScriptedCursor, ScriptedPlatform};

    const ARROW: CursorId = CursorId(1);
    const BEAM: CursorId = CursorId(2);
    const BROKEN: CursorId = CursorId(3);

    fn platform() -> ScriptedPlatform {
        ScriptedPlatform::new()
            .with_cursor(
                ARROW,
                ScriptedCursor {
                    hotspot: Point::new(1, 2),
                    color: Some(solid_color(32, 32, Bgra::WHITE, 32)),
                    mask: Some(uniform_mask(32, 32, false, false)),
                },
            )
            .with_cursor(
                BEAM,
                ScriptedCursor {
                    hotspot: Point::new(8, 16),
                    color: None,
                    mask: Some(uniform_mask(48, 48, false, true)),
                },
            )
            .with_cursor(
                BROKEN,
                ScriptedCursor {
                    hotspot: Point::new(5, 5),
                    color: None,
                    mask: None,
                },
            )
    }

    struct Harness {
        platform: ScriptedPlatform,
        gfx: SoftwareGraphics,
        cache: TextureCache,
        sampler: CursorSampler,
    }

    impl Harness {
        fn new() -> Self {
            Harness {
                platform: platform(),
                gfx: SoftwareGraphics::new(),
                cache: TextureCache::new(),
                sampler: CursorSampler::new(),
            }
        }

        fn poll(&mut self) {
            self.sampler
                .poll(&mut self.platform, &mut self.gfx, &mut self.cache);
        }
    }

    #[test]
    fn unchanged_identity_never_redecodes() {
        let mut h = Harness::new();
        h.platform.push_position(ARROW, 10, 10);
        h.platform.push_position(ARROW, 20, 30);
        h.platform.push_position(ARROW, 400, 7);

        h.poll();
        assert_eq!(h.platform.stats().icon_queries, 1);

        h.poll();
        h.poll();
        assert_eq!(h.platform.stats().icon_queries, 1);
        assert_eq!(h.sampler.decodes(), 1);
        assert_eq!(h.sampler.cursor().position, Point::new(400, 7));
        assert_eq!(h.sampler.state(), SamplerState::Tracking(ARROW));
        assert!(h.sampler.cursor().visible);
    }

    #[test]
    fn identity_change_decodes_and_resizes() {
        let mut h = Harness::new();
        h.platform.push_position(ARROW, 0, 0);
        h.platform.push_position(BEAM, 0, 0);
        h.platform.push_position(ARROW, 0, 0);

        h.poll();
        let arrow_tex = h.sampler.cursor().texture.unwrap();
        assert_eq!(h.sampler.cursor().hotspot, Point::new(1, 2));
        assert!(!h.sampler.cursor().monochrome);

        h.poll();
        let beam = h.sampler.cursor().clone();
        assert_eq!(beam.size, (48, 48));
        assert_eq!(beam.hotspot, Point::new(8, 16));
        assert!(beam.monochrome);
        assert_ne!(beam.texture, Some(arrow_tex));

        h.poll();
        assert_eq!(h.sampler.cursor().texture, Some(arrow_tex));
        assert_eq!(h.sampler.decodes(), 3);
        assert_eq!(h.cache.len(), 2);
        assert!(!h.gfx.is_entered());
    }

    #[test]
    fn decode_failure_keeps_previous_texture() {
        let mut h = Harness::new();
        h.platform.push_position(ARROW, 0, 0);
        h.platform.push_position(BROKEN, 3, 3);

        h.poll();
        let before = h.sampler.cursor().clone();

        h.poll();
        let after = h.sampler.cursor();
        assert!(!after.visible);
        assert_eq!(after.texture, before.texture);
        assert_eq!(after.hotspot, before.hotspot);
        assert_eq!(after.position, Point::new(3, 3));
        assert!(!h.gfx.is_entered());

        let stats = h.platform.stats();
        assert_eq!(stats.live_icons, 0);
        assert_eq!(stats.live_bitmaps, 0);
    }

    #[test]
    fn query_failure_hides_for_one_frame() {
        let mut h = Harness::new();
        h.platform.push_position(ARROW, 5, 5);
        h.platform.push_frame(None);
        h.platform.push_position(ARROW, 6, 6);

        h.poll();
        assert!(h.sampler.cursor().visible);

        h.poll();
        assert!(!h.sampler.cursor().visible);
        assert_eq!(h.sampler.cursor().position, Point::new(5, 5));
        assert!(h.sampler.cursor().texture.is_some());

        h.poll();
        assert!(h.sampler.cursor().visible);
        assert_eq!(h.sampler.decodes(), 1);
    }

    #[test]
    fn hidden_flag_forces_invisible() {
        let mut h = Harness::new();
        h.platform.push_frame(Some(CursorInfo {
            position: Point::new(1, 1),
            showing: false,
            id: ARROW,
        }));

        h.poll();
        assert!(!h.sampler.cursor().visible);
        assert!(h.sampler.cursor().texture.is_some());
    }

    #[test]
    fn unknown_identity_is_invisible() {
        let mut h = Harness::new();
        h.platform.push_position(CursorId(99), 1, 1);

        h.poll();
        assert!(!h.sampler.cursor().visible);
        assert_eq!(h.sampler.state(), SamplerState::Tracking(CursorId(99)));
        assert_eq!(h.platform.stats().icon_queries, 0);
    }
}
