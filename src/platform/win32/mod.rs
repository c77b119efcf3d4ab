mod capture_gdi;
mod cursor;
mod init_dpi;

pub use capture_gdi::GdiDesktopCapture;
pub use cursor::{OwnedBitmap, OwnedIcon, Win32CursorPlatform};
pub use init_dpi::init_dpi;
