use crate::cursor::{BitmapData, Point};

/// Identity of an OS cursor glyph. Equality means "same glyph", content is never compared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CursorId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CursorInfo {
    pub position: Point,
    /// The OS reports the cursor as showing.
    pub showing: bool,
    pub id: CursorId,
}

/// Bitmaps making up an icon. Dropping a bitmap releases the OS handle.
#[derive(Debug)]
pub struct IconInfo<B> {
    pub hotspot: Point,
    pub color: Option<B>,
    pub mask: Option<B>,
}

/// OS cursor queries needed by the sampler and the icon decoder.
pub trait CursorPlatform {
    /// A duplicated icon, released when dropped.
    type Icon;
    /// A bitmap handle, released when dropped.
    type Bitmap;

    /// Current cursor state, or `None` if the query failed this frame.
    fn query_cursor(&mut self) -> Option<CursorInfo>;

    /// Duplicate the icon behind `id`, since the original may be invalidated by later OS calls.
    fn duplicate_icon(&mut self, id: CursorId) -> Option<Self::Icon>;

    fn query_icon_info(&mut self, icon: &Self::Icon) -> Option<IconInfo<Self::Bitmap>>;

    /// Raw bits of `bitmap`, or `None` when it holds no data.
    fn extract_bitmap(&mut self, bitmap: &Self::Bitmap) -> Option<BitmapData>;
}
