//! Display-free half of monshot: monitor geometry, the monitor fallback
//! order, and turning a raw Z-pixmap into a PNG.

pub mod error;
pub mod geometry;
pub mod monitor;
pub mod pixels;

pub use error::SaveError;
pub use geometry::{Point, Rect};
pub use monitor::{resolve_monitor, HeadLayout, MonitorSelection, MonitorSource};
pub use pixels::{
    encode_png, save_png, scanline_stride, zpixmap_to_rgba, PixelLayout, ZPixmap,
};
