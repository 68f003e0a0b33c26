//! Picks the monitor rectangle to capture.
//!
//! The X side only gathers facts into a [`HeadLayout`]; the decision lives
//! here so the fallback order can be exercised without a display server.

use log::{info, warn};

use crate::geometry::{Point, Rect};

/// What the multi-head extension reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadLayout {
    /// Extension missing, or present but reporting inactive.
    Inactive,
    /// Extension active. `heads` keeps the server's order.
    Heads { cursor: Point, heads: Vec<Rect> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorSource {
    ExtensionInactive,
    UnderCursor { index: usize },
    FirstHead,
    NoHeads,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorSelection {
    pub rect: Rect,
    pub source: MonitorSource,
}

/// Resolve the monitor holding the cursor, falling back to the first head and
/// then to the whole root window. The returned rectangle always lies within
/// `root`.
pub fn resolve_monitor(layout: &HeadLayout, root: Rect) -> MonitorSelection {
    let (rect, source) = match layout {
        HeadLayout::Inactive => (root, MonitorSource::ExtensionInactive),
        HeadLayout::Heads { cursor, heads } => pick_head(*cursor, heads, root),
    };

    let rect = match rect.intersect(&root) {
        Some(clipped) => {
            if clipped != rect {
                warn!("monitor {rect} exceeds the root window, clipped to {clipped}");
            }
            clipped
        }
        None => {
            warn!("monitor {rect} lies outside the root window, using fullscreen");
            root
        }
    };

    MonitorSelection { rect, source }
}

fn pick_head(cursor: Point, heads: &[Rect], root: Rect) -> (Rect, MonitorSource) {
    if let Some((index, head)) = heads
        .iter()
        .enumerate()
        .find(|(_, head)| head.contains(cursor))
    {
        info!(
            "cursor is on monitor {index}: {}x{} at position ({},{})",
            head.width, head.height, cursor.x, cursor.y
        );
        return (*head, MonitorSource::UnderCursor { index });
    }

    match heads.first() {
        Some(first) => {
            warn!(
                "cursor ({},{}) is not on any of {} monitors, using the first one",
                cursor.x,
                cursor.y,
                heads.len()
            );
            (*first, MonitorSource::FirstHead)
        }
        None => {
            warn!("no monitors reported, using fullscreen");
            (root, MonitorSource::NoHeads)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> Rect {
        Rect::fullscreen(3840, 1080)
    }

    fn dual_heads() -> Vec<Rect> {
        vec![Rect::new(0, 0, 1920, 1080), Rect::new(1920, 0, 1920, 1080)]
    }

    #[test]
    fn inactive_extension_uses_fullscreen() {
        let sel = resolve_monitor(&HeadLayout::Inactive, root());
        assert_eq!(sel.rect, root());
        assert_eq!(sel.source, MonitorSource::ExtensionInactive);
    }

    #[test]
    fn picks_head_under_cursor() {
        let layout = HeadLayout::Heads {
            cursor: Point::new(2500, 300),
            heads: dual_heads(),
        };
        let sel = resolve_monitor(&layout, root());
        assert_eq!(sel.rect, Rect::new(1920, 0, 1920, 1080));
        assert_eq!(sel.source, MonitorSource::UnderCursor { index: 1 });
    }

    #[test]
    fn boundary_pixel_belongs_to_right_monitor() {
        let layout = HeadLayout::Heads {
            cursor: Point::new(1920, 0),
            heads: dual_heads(),
        };
        let sel = resolve_monitor(&layout, root());
        assert_eq!(sel.source, MonitorSource::UnderCursor { index: 1 });
    }

    #[test]
    fn overlapping_heads_prefer_server_order() {
        // cloned outputs report the same rectangle twice
        let heads = vec![Rect::new(0, 0, 1920, 1080), Rect::new(0, 0, 1920, 1080)];
        let layout = HeadLayout::Heads {
            cursor: Point::new(10, 10),
            heads,
        };
        let sel = resolve_monitor(&layout, Rect::fullscreen(1920, 1080));
        assert_eq!(sel.source, MonitorSource::UnderCursor { index: 0 });
    }

    #[test]
    fn no_matching_head_uses_first() {
        let layout = HeadLayout::Heads {
            cursor: Point::new(5000, 5000),
            heads: dual_heads(),
        };
        let sel = resolve_monitor(&layout, root());
        assert_eq!(sel.rect, Rect::new(0, 0, 1920, 1080));
        assert_eq!(sel.source, MonitorSource::FirstHead);
    }

    #[test]
    fn no_heads_uses_fullscreen() {
        let layout = HeadLayout::Heads {
            cursor: Point::new(10, 10),
            heads: Vec::new(),
        };
        let sel = resolve_monitor(&layout, root());
        assert_eq!(sel.rect, root());
        assert_eq!(sel.source, MonitorSource::NoHeads);
    }

    #[test]
    fn head_is_clipped_to_root() {
        let layout = HeadLayout::Heads {
            cursor: Point::new(100, 100),
            heads: vec![Rect::new(0, 0, 4000, 1200)],
        };
        let sel = resolve_monitor(&layout, root());
        assert_eq!(sel.rect, root());
        assert_eq!(sel.source, MonitorSource::UnderCursor { index: 0 });
    }

    #[test]
    fn head_outside_root_falls_back_to_fullscreen() {
        let layout = HeadLayout::Heads {
            cursor: Point::new(-10, -10),
            heads: vec![Rect::new(-1000, -1000, 500, 500)],
        };
        let sel = resolve_monitor(&layout, root());
        assert_eq!(sel.rect, root());
        assert_eq!(sel.source, MonitorSource::FirstHead);
    }

    #[test]
    fn empty_head_falls_back_to_fullscreen() {
        let layout = HeadLayout::Heads {
            cursor: Point::new(5, 5),
            heads: vec![Rect::new(100, 100, 0, 0)],
        };
        let sel = resolve_monitor(&layout, root());
        assert_eq!(sel.rect, root());
        assert_eq!(sel.source, MonitorSource::FirstHead);
    }
}
