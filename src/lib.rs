pub mod capture;
pub mod config;
pub mod x11;

pub use capture::{capture_active_monitor, CaptureOutcome};
pub use config::CaptureConfig;
pub use monshot_core::{HeadLayout, MonitorSelection, MonitorSource, Point, Rect};
