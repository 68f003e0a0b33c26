use monshot::{capture_active_monitor, CaptureConfig};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = CaptureConfig::default().with_output("monitor.png");
    let outcome = capture_active_monitor(&config)?;
    println!(
        "Saved {} ({}, {:?})",
        outcome.path.display(),
        outcome.selection.rect,
        outcome.selection.source
    );
    Ok(())
}
