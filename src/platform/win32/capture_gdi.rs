use crate::image::{ColorFormat, Image, ImageBuf};
use crate::util::NonSend;
use anyhow::{ensure, Context, Result};
use std::marker::PhantomData;
use windows::Win32::Foundation::*;
use windows::Win32::Graphics::Gdi::*;
use windows::Win32::UI::WindowsAndMessaging::*;

/// Grabs the primary monitor through a GDI DIB section. The cursor is not part of the grab.
#[derive(Debug)]
pub struct GdiDesktopCapture {
    _guard: PhantomData<NonSend>,
    hdc: HDC,
    memdc: HDC,
    width: u32,
    height: u32,
    bitmap: HBITMAP,
    bitmap_data: *mut u8,
    old_bitmap: HGDIOBJ,
}

impl GdiDesktopCapture {
    pub fn new() -> Result<GdiDesktopCapture> {
        // SAFETY: FFI
        unsafe {
            //FIXME: Resource leak on early return

            let hdc = GetDC(HWND(0));
            ensure!(!hdc.is_invalid(), "unable to get desktop DC");

            let memdc = CreateCompatibleDC(hdc);
            ensure!(!memdc.is_invalid(), "unable to create compatible DC");

            let width = GetSystemMetrics(SM_CXSCREEN);
            let height = GetSystemMetrics(SM_CYSCREEN);
            ensure!(width > 0 && height > 0, "unable to query screen size");

            let width = width as u32;
            let height = height as u32;

            // negate height to produce top-bottom bitmap
            let bitmapinfo = BITMAPINFO {
                bmiHeader: BITMAPINFOHEADER {
                    biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
                    biWidth: width as i32,
                    biHeight: -(height as i32),
                    biPlanes: 1,
                    biBitCount: 32,
                    biCompression: BI_RGB.0,
                    biSizeImage: 0,
                    biXPelsPerMeter: 0,
                    biYPelsPerMeter: 0,
                    biClrUsed: 0,
                    biClrImportant: 0,
                },
                bmiColors: std::mem::zeroed(),
            };

            let mut bitmap_data = std::ptr::null_mut();

            let bitmap = CreateDIBSection(
                hdc,
                &bitmapinfo,
                DIB_RGB_COLORS,
                &mut bitmap_data,
                HANDLE(0),
                0,
            )
            .context("unable to create DIB section")?;

            let old_bitmap = SelectObject(memdc, bitmap);

            Ok(GdiDesktopCapture {
                _guard: Default::default(),
                hdc,
                memdc,
                width,
                height,
                bitmap,
                bitmap_data: bitmap_data as *mut u8,
                old_bitmap,
            })
        }
    }

    pub fn resolution(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Copy the current desktop into a new BGRA frame.
    pub fn grab(&mut self) -> Result<ImageBuf> {
        let stride = self.width * 4;

        // SAFETY: FFI; the DIB section stays selected into memdc until drop
        let slice = unsafe {
            BitBlt(
                self.memdc,
                0,
                0,
                self.width as i32,
                self.height as i32,
                self.hdc,
                0,
                0,
                SRCCOPY,
            )
            .context("failed to BitBlt")?;

            let _ = GdiFlush();

            let bytes = stride as usize * self.height as usize;
            std::slice::from_raw_parts(self.bitmap_data, bytes)
        };

        let frame = Image::new(self.width, self.height, stride, ColorFormat::Bgra8888, slice);
        Ok(frame.copied())
    }
}

impl Drop for GdiDesktopCapture {
    fn drop(&mut self) {
        // SAFETY: FFI
        unsafe {
            SelectObject(self.memdc, self.old_bitmap);

            ReleaseDC(HWND(0), self.hdc);

            DeleteObject(self.bitmap);
            DeleteDC(self.memdc);
        }
    }
}
