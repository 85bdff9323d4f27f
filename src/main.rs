use std::time::Duration;

use hudscan::executor::driver::EnigoDriver;
use hudscan::executor::mouse::Mouse;
use hudscan::perception::{sampler, screen};
use hudscan::{load_calibration, HudScanResult, Pipeline};

fn main() -> HudScanResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Load .env file if present (ignore error if not found)
    let _ = dotenvy::dotenv();

    let calibration = load_calibration()?;
    let resolution = screen::display_resolution()?;
    tracing::info!(%resolution, "display resolution");
    // Fail fast before the loop starts; there is no default profile.
    calibration.profile(resolution)?;

    let sampler = sampler::live_sampler()?;
    let pipeline = Pipeline::new(&calibration, &sampler);

    // Actuation capability is decided once at startup; a missing driver
    // leaves detection fully functional.
    let mouse = Mouse::open(EnigoDriver::new());
    if !mouse.is_enabled() {
        tracing::warn!("running detection-only");
    }

    let interval = std::env::var("HUDSCAN_INTERVAL_MS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(1000);

    // Sampling is too slow to poll continuously; the loop enforces a pace.
    loop {
        match pipeline.detect(resolution) {
            Ok(outcome) => println!("{}", serde_json::to_string(&outcome)?),
            Err(e) => tracing::error!(error = %e, "detection cycle failed"),
        }
        std::thread::sleep(Duration::from_millis(interval));
    }
}
