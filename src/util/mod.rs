mod as_usize;
mod nonsend;
mod performance_monitor;
mod timer;

pub use as_usize::AsUsize;
pub use nonsend::NonSend;
pub use performance_monitor::{PerformanceMonitor, PerformanceStats};
pub use timer::Timer;
