use crate::cursor::{BitmapData, CursorId, CursorInfo, CursorPlatform, IconInfo, Point};
use crate::util::NonSend;
use std::ffi::c_void;
use std::marker::PhantomData;
use std::mem::{size_of, zeroed};
use windows::Win32::Graphics::Gdi::*;
use windows::Win32::UI::WindowsAndMessaging::*;

/// Cursor queries through user32/GDI.
#[derive(Debug, Default)]
pub struct Win32CursorPlatform {
    _guard: PhantomData<NonSend>,
}

impl Win32CursorPlatform {
    pub fn new() -> Self {
        Default::default()
    }
}

/// Icon created by `CopyIcon`, destroyed on drop.
#[derive(Debug)]
pub struct OwnedIcon(HICON);

impl Drop for OwnedIcon {
    fn drop(&mut self) {
        // SAFETY: the icon was created by CopyIcon and is owned by us
        unsafe {
            let _ = DestroyIcon(self.0);
        }
    }
}

/// Bitmap returned by `GetIconInfo`, deleted on drop.
#[derive(Debug)]
pub struct OwnedBitmap(HBITMAP);

impl OwnedBitmap {
    fn new(hbmp: HBITMAP) -> Option<Self> {
        if hbmp.is_invalid() {
            None
        } else {
            Some(OwnedBitmap(hbmp))
        }
    }
}

impl Drop for OwnedBitmap {
    fn drop(&mut self) {
        // SAFETY: GetIconInfo hands ownership of both bitmaps to the caller
        unsafe {
            DeleteObject(self.0);
        }
    }
}

impl CursorPlatform for Win32CursorPlatform {
    type Icon = OwnedIcon;
    type Bitmap = OwnedBitmap;

    fn query_cursor(&mut self) -> Option<CursorInfo> {
        // SAFETY: FFI, CURSORINFO is initialized with its size
        let cursor_info = unsafe {
            let mut cursor_info: CURSORINFO = zeroed();
            cursor_info.cbSize = size_of::<CURSORINFO>() as u32;
            GetCursorInfo(&mut cursor_info).ok()?;
            cursor_info
        };

        Some(CursorInfo {
            position: Point::new(cursor_info.ptScreenPos.x, cursor_info.ptScreenPos.y),
            showing: (cursor_info.flags.0 & CURSOR_SHOWING.0) != 0,
            id: CursorId(cursor_info.hCursor.0 as u64),
        })
    }

    fn duplicate_icon(&mut self, id: CursorId) -> Option<OwnedIcon> {
        if id.0 == 0 {
            return None;
        }

        // SAFETY: CopyIcon validates the handle and fails on stale ones
        let icon = unsafe { CopyIcon(HICON(id.0 as isize)) }.ok()?;
        Some(OwnedIcon(icon))
    }

    fn query_icon_info(&mut self, icon: &OwnedIcon) -> Option<IconInfo<OwnedBitmap>> {
        // SAFETY: FFI, the icon is alive for the duration of the call
        let iconinfo = unsafe {
            let mut iconinfo: ICONINFO = zeroed();
            GetIconInfo(icon.0, &mut iconinfo).ok()?;
            iconinfo
        };

        Some(IconInfo {
            hotspot: Point::new(iconinfo.xHotspot as i32, iconinfo.yHotspot as i32),
            color: OwnedBitmap::new(iconinfo.hbmColor),
            mask: OwnedBitmap::new(iconinfo.hbmMask),
        })
    }

    fn extract_bitmap(&mut self, bitmap: &OwnedBitmap) -> Option<BitmapData> {
        // SAFETY: FFI, `bmp` and `buf` outlive the calls writing into them
        unsafe {
            let mut bmp: BITMAP = zeroed();
            let ret = GetObjectW(
                bitmap.0,
                size_of::<BITMAP>() as i32,
                Some(&mut bmp as *mut BITMAP as *mut c_void),
            );
            if ret == 0 {
                return None;
            }

            let size = bmp.bmHeight.checked_mul(bmp.bmWidthBytes)?;
            if size <= 0 {
                return None;
            }

            let mut buf = vec![0u8; size as usize];
            let copied = GetBitmapBits(bitmap.0, size, buf.as_mut_ptr() as *mut c_void);
            if copied == 0 {
                return None;
            }

            BitmapData::new(
                bmp.bmWidth.try_into().ok()?,
                bmp.bmHeight.try_into().ok()?,
                bmp.bmWidthBytes.try_into().ok()?,
                bmp.bmBitsPixel,
                buf,
            )
        }
    }
}
