//! Torch-lit overlay in a native window (winit + softbuffer).
//!
//! Run: cargo run --bin torches
//! Keys: c clear, s swap embers, t toggle flicker, Esc quit. Click moves an ember.

use std::time::Duration;

use lumigrid_demos::TorchScene;
use lumigrid_winit::{WinitConfig, WinitDriver};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let driver = WinitDriver::new(WinitConfig {
        title: "lumigrid torches".into(),
        width: 960,
        height: 720,
        tick: Some(Duration::from_millis(120)),
        ..Default::default()
    });

    if let Err(e) = driver.run(TorchScene::new(42)) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
