use log::warn;
use windows::Win32::UI::HiDpi::*;

/// Make cursor positions and desktop captures use physical pixels.
pub fn init_dpi() {
    // SAFETY: FFI function without any unsafety
    let ret = unsafe { SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2) };

    if let Err(e) = ret {
        warn!("Unable to enable per-monitor DPI awareness: {e}");
    }
}
