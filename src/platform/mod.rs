pub mod scripted;

#[cfg(windows)]
pub mod win32;
