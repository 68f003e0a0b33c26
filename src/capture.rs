use std::path::PathBuf;

use anyhow::{Context, Result};
use log::info;
use monshot_core::{resolve_monitor, save_png, zpixmap_to_rgba, MonitorSelection};

use crate::config::CaptureConfig;
use crate::x11::X11Session;

#[derive(Debug, Clone)]
pub struct CaptureOutcome {
    pub selection: MonitorSelection,
    pub path: PathBuf,
}

/// Captures the monitor under the cursor and writes it to `config.output`.
pub fn capture_active_monitor(config: &CaptureConfig) -> Result<CaptureOutcome> {
    let session =
        X11Session::connect(config.display.as_deref()).context("failed to open X display")?;

    let root = session.root_rect();
    println!("width, height:  {} {}", root.width, root.height);

    let layout = session.head_layout().context("failed to get monitor")?;
    let selection = resolve_monitor(&layout, root);
    info!("capturing {} ({:?})", selection.rect, selection.source);

    let captured = session
        .fetch_image(selection.rect, config.plane_mask)
        .context("failed to get screen image")?;
    let img = zpixmap_to_rgba(&captured.as_zpixmap());

    save_png(&img, &config.output).context("failed to save image")?;
    info!("saved screenshot to {}", config.output.display());

    Ok(CaptureOutcome {
        selection,
        path: config.output.clone(),
    })
}
