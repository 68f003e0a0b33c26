use env_logger::Env;
use log::{error, info};

use monshot::{capture_active_monitor, CaptureConfig};

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    info!("starting monshot");

    if let Err(e) = capture_active_monitor(&CaptureConfig::default()) {
        error!("{e:#}");
        std::process::exit(1);
    }
}
