//! X server side: connection bootstrap, Xinerama head discovery and the
//! root-window `GetImage` fetch.

use std::env::var_os;

use log::{debug, warn};
use monshot_core::{scanline_stride, HeadLayout, PixelLayout, Point, Rect, ZPixmap};
use x11rb::connection::{Connection, RequestConnection};
use x11rb::errors::{ConnectError, ConnectionError, ReplyError};
use x11rb::protocol::xinerama::{self, ConnectionExt as _, ScreenInfo};
use x11rb::protocol::xproto::{ConnectionExt as _, Format, ImageFormat, ImageOrder, Screen};
use x11rb::rust_connection::RustConnection;

#[derive(Debug, thiserror::Error)]
pub enum X11Error {
    #[error("failed to connect to the X server: {0}")]
    Connect(#[from] ConnectError),

    #[error("X connection error: {0}")]
    Connection(#[from] ConnectionError),

    #[error("X request failed: {0}")]
    Reply(#[from] ReplyError),

    #[error("unsupported image format: depth {depth}, {bits_per_pixel} bits per pixel")]
    UnsupportedFormat { depth: u8, bits_per_pixel: u8 },

    #[error("rectangle {rect} does not fit the X protocol coordinate range")]
    OutOfRange { rect: Rect },
}

pub type X11Result<T> = Result<T, X11Error>;

/// Pixels fetched from the root window, still in server layout.
#[derive(Debug)]
pub struct CapturedImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub stride: usize,
    pub layout: PixelLayout,
}

impl CapturedImage {
    pub fn as_zpixmap(&self) -> ZPixmap<'_> {
        ZPixmap {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.stride,
            layout: self.layout,
        }
    }
}

pub struct X11Session {
    conn: RustConnection,
    screen_num: usize,
}

impl X11Session {
    /// Connects to `display`, or `$DISPLAY` when `None`.
    pub fn connect(display: Option<&str>) -> X11Result<Self> {
        if wayland_detect() {
            warn!("running under Wayland, the XWayland root window may not show native windows");
        }
        let (conn, screen_num) = x11rb::connect(display)?;
        debug!("connected to X server, default screen {screen_num}");
        Ok(Self { conn, screen_num })
    }

    fn screen(&self) -> &Screen {
        &self.conn.setup().roots[self.screen_num]
    }

    pub fn root_rect(&self) -> Rect {
        let screen = self.screen();
        Rect::fullscreen(
            screen.width_in_pixels as u32,
            screen.height_in_pixels as u32,
        )
    }

    /// Queries Xinerama for the monitor list. The pointer is only read when
    /// the extension is active.
    pub fn head_layout(&self) -> X11Result<HeadLayout> {
        if self
            .conn
            .extension_information(xinerama::X11_EXTENSION_NAME)?
            .is_none()
        {
            warn!("Xinerama extension is not available, using fullscreen");
            return Ok(HeadLayout::Inactive);
        }

        let active = self.conn.xinerama_is_active()?.reply()?;
        if active.state == 0 {
            debug!("Xinerama is inactive");
            return Ok(HeadLayout::Inactive);
        }

        let root = self.screen().root;
        let pointer = self.conn.query_pointer(root)?.reply()?;
        let cursor = Point::new(pointer.root_x.into(), pointer.root_y.into());

        let screens = self.conn.xinerama_query_screens()?.reply()?;
        let heads: Vec<Rect> = screens.screen_info.iter().map(head_rect).collect();
        debug!("Xinerama reports {} monitors, cursor at {cursor:?}", heads.len());

        Ok(HeadLayout::Heads { cursor, heads })
    }

    /// Fetches `rect` of the root window as a Z-pixmap.
    pub fn fetch_image(&self, rect: Rect, plane_mask: u32) -> X11Result<CapturedImage> {
        let (x, y, width, height) = protocol_rect(rect)?;

        let reply = self
            .conn
            .get_image(
                ImageFormat::Z_PIXMAP,
                self.screen().root,
                x,
                y,
                width,
                height,
                plane_mask,
            )?
            .reply()?;

        let setup = self.conn.setup();
        let (layout, stride) = pixmap_layout(
            setup.image_byte_order,
            &setup.pixmap_formats,
            reply.depth,
            rect.width,
        )?;
        debug!(
            "fetched {} bytes, depth {}, stride {stride}, {layout:?}",
            reply.data.len(),
            reply.depth
        );

        Ok(CapturedImage {
            data: reply.data,
            width: rect.width,
            height: rect.height,
            stride,
            layout,
        })
    }
}

/// Narrows `rect` to the protocol's `i16` origin and `u16` size.
fn protocol_rect(rect: Rect) -> X11Result<(i16, i16, u16, u16)> {
    let out_of_range = |_| X11Error::OutOfRange { rect };
    Ok((
        i16::try_from(rect.x).map_err(out_of_range)?,
        i16::try_from(rect.y).map_err(out_of_range)?,
        u16::try_from(rect.width).map_err(out_of_range)?,
        u16::try_from(rect.height).map_err(out_of_range)?,
    ))
}

/// Pixel layout and row stride for a Z-pixmap of `depth`. Only 32 bits per
/// pixel is supported.
fn pixmap_layout(
    byte_order: ImageOrder,
    formats: &[Format],
    depth: u8,
    width: u32,
) -> X11Result<(PixelLayout, usize)> {
    let format = formats
        .iter()
        .find(|f| f.depth == depth)
        .ok_or(X11Error::UnsupportedFormat {
            depth,
            bits_per_pixel: 0,
        })?;
    if format.bits_per_pixel != 32 {
        return Err(X11Error::UnsupportedFormat {
            depth,
            bits_per_pixel: format.bits_per_pixel,
        });
    }

    let layout = if byte_order == ImageOrder::MSB_FIRST {
        PixelLayout::Xrgb
    } else {
        PixelLayout::Bgrx
    };
    let stride = scanline_stride(width, format.bits_per_pixel, format.scanline_pad);
    Ok((layout, stride))
}

fn head_rect(info: &ScreenInfo) -> Rect {
    Rect::new(
        info.x_org.into(),
        info.y_org.into(),
        info.width.into(),
        info.height.into(),
    )
}

/// Checks `XDG_SESSION_TYPE` and `WAYLAND_DISPLAY`.
fn wayland_detect() -> bool {
    let is_wayland_session = var_os("XDG_SESSION_TYPE")
        .map(|v| v.to_string_lossy().eq_ignore_ascii_case("wayland"))
        .unwrap_or(false);

    let has_wayland_display = var_os("WAYLAND_DISPLAY")
        .map(|v| !v.is_empty())
        .unwrap_or(false);

    is_wayland_session || has_wayland_display
}
