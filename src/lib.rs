pub mod asset;
pub mod config;
pub mod cursor;
pub mod graphics;
pub mod image;
pub mod overlay;
pub mod platform;
pub mod recording;
pub mod snapshot;
pub mod util;
