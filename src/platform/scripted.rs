//! A [`CursorPlatform`] that replays a scripted sequence of cursor states.
//!
//! Used for headless runs of the capture loop and in tests, where the handle
//! bookkeeping is observable through [`ScriptedPlatform::stats`].

use crate::cursor::{BitmapData, CursorId, CursorInfo, CursorPlatform, IconInfo, Point};
use crate::image::Bgra;
use std::cell::Cell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

/// Bitmaps returned for a scripted cursor glyph.
#[derive(Clone, Debug)]
pub struct ScriptedCursor {
    pub hotspot: Point,
    pub color: Option<BitmapData>,
    pub mask: Option<BitmapData>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScriptStats {
    pub cursor_queries: usize,
    /// Number of icon info queries, i.e. decode attempts.
    pub icon_queries: usize,
    pub live_icons: isize,
    pub live_bitmaps: isize,
}

#[derive(Debug, Default)]
struct Counters {
    cursor_queries: Cell<usize>,
    icon_queries: Cell<usize>,
    live_icons: Cell<isize>,
    live_bitmaps: Cell<isize>,
}

fn bump(cell: &Cell<isize>, delta: isize) {
    cell.set(cell.get() + delta);
}

#[derive(Debug)]
pub struct ScriptedIcon {
    id: CursorId,
    counters: Rc<Counters>,
}

impl Drop for ScriptedIcon {
    fn drop(&mut self) {
        bump(&self.counters.live_icons, -1);
    }
}

#[derive(Debug)]
pub struct ScriptedBitmap {
    data: BitmapData,
    counters: Rc<Counters>,
}

impl Drop for ScriptedBitmap {
    fn drop(&mut self) {
        bump(&self.counters.live_bitmaps, -1);
    }
}

#[derive(Debug, Default)]
pub struct ScriptedPlatform {
    cursors: HashMap<CursorId, ScriptedCursor>,
    frames: VecDeque<Option<CursorInfo>>,
    last: Option<CursorInfo>,
    counters: Rc<Counters>,
}

impl ScriptedPlatform {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_cursor(mut self, id: CursorId, cursor: ScriptedCursor) -> Self {
        self.cursors.insert(id, cursor);
        self
    }

    /// Queue the result of one future `query_cursor` call; `None` makes that query fail.
    pub fn push_frame(&mut self, frame: Option<CursorInfo>) {
        self.frames.push_back(frame);
    }

    pub fn push_position(&mut self, id: CursorId, x: i32, y: i32) {
        self.push_frame(Some(CursorInfo {
            position: Point::new(x, y),
            showing: true,
            id,
        }));
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn stats(&self) -> ScriptStats {
        ScriptStats {
            cursor_queries: self.counters.cursor_queries.get(),
            icon_queries: self.counters.icon_queries.get(),
            live_icons: self.counters.live_icons.get(),
            live_bitmaps: self.counters.live_bitmaps.get(),
        }
    }

    fn bitmap(&self, data: &Option<BitmapData>) -> Option<ScriptedBitmap> {
        let data = data.clone()?;
        bump(&self.counters.live_bitmaps, 1);
        Some(ScriptedBitmap {
            data,
            counters: Rc::clone(&self.counters),
        })
    }
}

impl CursorPlatform for ScriptedPlatform {
    type Icon = ScriptedIcon;
    type Bitmap = ScriptedBitmap;

    /// Once the script runs out, the last successful state repeats.
    fn query_cursor(&mut self) -> Option<CursorInfo> {
        let c = &self.counters.cursor_queries;
        c.set(c.get() + 1);

        match self.frames.pop_front() {
            Some(Some(info)) => {
                self.last = Some(info);
                Some(info)
            }
            Some(None) => None,
            None => self.last,
        }
    }

    fn duplicate_icon(&mut self, id: CursorId) -> Option<ScriptedIcon> {
        if !self.cursors.contains_key(&id) {
            return None;
        }

        bump(&self.counters.live_icons, 1);
        Some(ScriptedIcon {
            id,
            counters: Rc::clone(&self.counters),
        })
    }

    fn query_icon_info(&mut self, icon: &ScriptedIcon) -> Option<IconInfo<ScriptedBitmap>> {
        let c = &self.counters.icon_queries;
        c.set(c.get() + 1);

        let cursor = self.cursors.get(&icon.id)?;
        Some(IconInfo {
            hotspot: cursor.hotspot,
            color: self.bitmap(&cursor.color),
            mask: self.bitmap(&cursor.mask),
        })
    }

    fn extract_bitmap(&mut self, bitmap: &ScriptedBitmap) -> Option<BitmapData> {
        Some(bitmap.data.clone())
    }
}

/// A mask bitmap (AND above XOR) with every bit of each half set to `and` / `xor`.
/// Panics on a zero size.
pub fn uniform_mask(width: u32, height: u32, and: bool, xor: bool) -> BitmapData {
    let stride = word_aligned_stride(width, 1);
    let half = (stride * height) as usize;
    let fill = |bit: bool| if bit { 0xFF } else { 0x00 };

    let mut data = vec![fill(and); half];
    data.resize(half * 2, fill(xor));

    BitmapData::new(width, height * 2, stride, 1, data).expect("non-empty mask")
}

/// A color bitmap of the given depth. Only 32bpp bitmaps carry `px`, others are zeroed.
/// Panics on a zero size.
pub fn solid_color(width: u32, height: u32, px: Bgra, bits_per_pixel: u16) -> BitmapData {
    let stride = word_aligned_stride(width, bits_per_pixel);
    let mut data = vec![0u8; (stride * height) as usize];
    if bits_per_pixel == 32 {
        for chunk in data.chunks_exact_mut(4) {
            chunk.copy_from_slice(bytemuck::bytes_of(&px));
        }
    }

    BitmapData::new(width, height, stride, bits_per_pixel, data).expect("non-empty bitmap")
}

/// The classic monochrome arrow: black outline, white fill, hotspot at the tip.
pub fn arrow_cursor() -> ScriptedCursor {
    const SIZE: u32 = 32;
    const GLYPH: [&str; 19] = [
        "X",
        "XX",
        "X.X",
        "X..X",
        "X...X",
        "X....X",
        "X.....X",
        "X......X",
        "X.......X",
        "X........X",
        "X.....XXXXX",
        "X..X..X",
        "X.X X..X",
        "XX  X..X",
        "X    X..X",
        "     X..X",
        "      X..X",
        "      X..X",
        "       XX",
    ];

    let stride = word_aligned_stride(SIZE, 1) as usize;
    let rows = SIZE as usize;
    // transparent everywhere: AND set, XOR clear
    let mut data = vec![0xFF; stride * rows];
    data.resize(stride * rows * 2, 0);

    for (y, line) in GLYPH.iter().enumerate() {
        for (x, ch) in line.bytes().enumerate() {
            let bit = 0x80u8 >> (x % 8);
            let xor_bit = match ch {
                b'X' => false,
                b'.' => true,
                _ => continue,
            };
            data[y * stride + x / 8] &= !bit;
            if xor_bit {
                data[(y + rows) * stride + x / 8] |= bit;
            }
        }
    }

    ScriptedCursor {
        hotspot: Point::new(0, 0),
        color: None,
        mask: BitmapData::new(SIZE, SIZE * 2, stride as u32, 1, data),
    }
}

fn word_aligned_stride(width: u32, bits_per_pixel: u16) -> u32 {
    (width * u32::from(bits_per_pixel)).div_ceil(16) * 2
}
