//! Command-line argument parsing.
//!
//! Running without arguments starts the plain interactive generator.

use clap::Parser;
use log::info;

use crate::params::RecordingConfig;

/// Command line arguments
#[derive(Parser, Debug, Default)]
#[command(name = "Noisecaster")]
#[command(about = "Keyboard-driven visual static and noisy sawtooth", long_about = None)]
pub struct Args {
    /// Record frames and audio to ./recording (duration in seconds), then quit
    #[arg(long, value_name = "SECONDS")]
    pub record: Option<f32>,

    /// Run video-only without opening an audio device
    #[arg(long)]
    pub no_audio: bool,
}

impl Args {
    /// Create recording configuration if recording mode is enabled
    pub fn recording_config(&self) -> Option<RecordingConfig> {
        self.record.filter(|secs| *secs > 0.0).map(|duration| {
            info!("Recording mode: {:.1}s", duration);
            RecordingConfig::new(duration)
        })
    }
}
