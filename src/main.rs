use anyhow::Result;
use clap::Parser;
use medassist::media::FileMediaDevice;
use medassist::{BackendClient, Config, HttpBackendClient, MediaDevice, StreamConstraints};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "medassist", about = "AI medical assistant pipeline")]
struct Args {
    /// Path to the configuration file (without extension)
    #[arg(long, default_value = "config/medassist")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("medassist v0.1.0");
    info!("Backend API: {}", cfg.backend.base_url);
    info!(
        "Capture constraints: {}x{}@{}fps, {}Hz audio",
        cfg.media.width, cfg.media.height, cfg.media.frame_rate, cfg.media.sample_rate
    );
    info!("Recognition locale: {}", cfg.speech.locale);

    let client = HttpBackendClient::new(&cfg.backend);
    match client.health().await {
        Ok(health) => info!("Backend reachable: {}", health.status),
        Err(e) => warn!("Backend unreachable: {}", e),
    }

    // Probe a fixture recording if one is present
    let fixture_path = "tests/fixtures/sample-consultation.wav";
    if std::path::Path::new(fixture_path).exists() {
        let device = FileMediaDevice::new(fixture_path);
        let stream = device
            .open(&StreamConstraints::audio_only(cfg.media.sample_rate))
            .await?;
        info!(
            "Fixture loaded, {} active track(s); ready for capture",
            stream.active_tracks()
        );
    } else {
        info!("No fixture found at {}", fixture_path);
        info!(
            "To probe file-backed capture, place a .wav file at: {}",
            fixture_path
        );
    }

    Ok(())
}
