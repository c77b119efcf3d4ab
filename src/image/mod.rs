mod color_converter;
mod color_format;
mod img;

pub use color_converter::{convert_color, premultiply_alpha};
pub use color_format::ColorFormat;
pub use img::{Bgra, Image, ImageBuf};
