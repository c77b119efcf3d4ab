use crate::asset::{load_custom_cursor, AssetLocator, CustomCursor};
use crate::config::CaptureConfig;
use crate::cursor::{
    CursorCompositor, CursorPlatform, CursorSampler, CursorState, DrawParams, TextureCache,
};
use crate::graphics::{enter_graphics, Graphics};
use anyhow::Context;
use log::{info, warn};

/// Per-session cursor capture state. Owns every texture it creates; release them
/// with [`CursorCapture::free`].
#[derive(Debug)]
pub struct CursorCapture<P: CursorPlatform> {
    platform: P,
    sampler: CursorSampler,
    cache: TextureCache,
    compositor: CursorCompositor,
    custom: Option<CustomCursor>,
}

impl<P: CursorPlatform> CursorCapture<P> {
    pub fn new(platform: P) -> Self {
        CursorCapture {
            platform,
            sampler: CursorSampler::new(),
            cache: TextureCache::new(),
            compositor: CursorCompositor::new(),
            custom: None,
        }
    }

    /// Start a session, loading the configured custom cursor. A missing or broken
    /// asset is logged and the session falls back to the system cursor.
    pub fn init<G>(platform: P, gfx: &mut G, config: &CaptureConfig) -> Self
    where
        G: Graphics + ?Sized,
    {
        let mut capture = Self::new(platform);

        let Some(name) = config.custom_cursor.as_deref() else {
            return capture;
        };

        let assets = AssetLocator::new(&config.asset_dir);
        let loaded = assets
            .find(name)
            .with_context(|| format!("{name} not found in {}", config.asset_dir.display()))
            .and_then(|path| load_custom_cursor(gfx, &path));

        match loaded {
            Ok(custom) => {
                info!(
                    "Loaded custom cursor {name}: {}x{}",
                    custom.width, custom.height
                );
                capture.custom = Some(custom);
            }
            Err(e) => warn!("Custom cursor unavailable, using the system cursor: {e:#}"),
        }

        capture
    }

    /// Replace the custom cursor, returning the previous one to the caller.
    pub fn replace_custom_cursor(&mut self, custom: Option<CustomCursor>) -> Option<CustomCursor> {
        std::mem::replace(&mut self.custom, custom)
    }

    /// Sample the OS cursor. Call once per frame.
    pub fn capture<G>(&mut self, gfx: &mut G)
    where
        G: Graphics + ?Sized,
    {
        self.sampler
            .poll(&mut self.platform, gfx, &mut self.cache);
    }

    /// Draw the cursor onto the current target. Returns whether anything was drawn.
    pub fn draw<G>(&mut self, gfx: &mut G, params: &DrawParams) -> bool
    where
        G: Graphics + ?Sized,
    {
        self.compositor
            .draw(gfx, self.sampler.cursor(), self.custom.as_ref(), params)
    }

    /// Tear the session down, destroying all cached textures and the custom cursor.
    pub fn free<G>(mut self, gfx: &mut G)
    where
        G: Graphics + ?Sized,
    {
        let mut gfx = enter_graphics(gfx);

        let cached = self.cache.len();
        self.cache.release_all(&mut *gfx);
        if let Some(custom) = self.custom.take() {
            custom.destroy(&mut *gfx);
        }

        info!(
            "Cursor capture finished after {} decodes, released {cached} cached textures",
            self.sampler.decodes()
        );
    }

    pub fn cursor(&self) -> &CursorState {
        self.sampler.cursor()
    }

    pub fn sampler(&self) -> &CursorSampler {
        &self.sampler
    }

    pub fn cache(&self) -> &TextureCache {
        &self.cache
    }

    pub fn compositor(&self) -> &CursorCompositor {
        &self.compositor
    }

    pub fn custom_cursor(&self) -> Option<&CustomCursor> {
        self.custom.as_ref()
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }
}
