#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorFormat {
    // 0xAABBGGRR in little-endian
    Rgba8888,

    // 0xAARRGGBB in little-endian
    Bgra8888,
}

impl ColorFormat {
    pub fn bytes_per_pixel(self) -> u32 {
        match self {
            ColorFormat::Rgba8888 | ColorFormat::Bgra8888 => 4,
        }
    }
}
