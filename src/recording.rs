//! Recording mode: presented frames to PNG files for a fixed duration.
//!
//! Audio is captured separately by the playback callback (see
//! [`crate::audio::create_wav_recorder`]).

use std::time::{Duration, Instant};

use anyhow::Context as _;
use log::{error, info};

use crate::params::RecordingConfig;
use crate::visual::FrameBuffer;

/// Frame capture state for one recording session
pub struct FrameRecorder {
    config: RecordingConfig,
    frames_written: usize,
    started: Option<Instant>,
}

impl FrameRecorder {
    /// Create output directories for frames and audio
    pub fn new(config: RecordingConfig) -> anyhow::Result<Self> {
        std::fs::create_dir_all(config.frames_dir()).with_context(|| {
            format!("Failed to create frames directory {}", config.frames_dir().display())
        })?;
        info!(
            "Recording {:.1}s to {}",
            config.duration_secs,
            config.output_dir.display()
        );
        Ok(Self {
            config,
            frames_written: 0,
            started: None,
        })
    }

    pub fn frames_written(&self) -> usize {
        self.frames_written
    }

    /// Save one frame; the recording clock starts with the first capture
    pub fn capture(&mut self, frame: &FrameBuffer) {
        self.started.get_or_insert_with(Instant::now);

        let path = self.config.frame_path(self.frames_written);
        if let Err(e) = frame.to_rgba_image().save(&path) {
            error!("Failed to save frame {}: {}", self.frames_written, e);
        }
        self.frames_written += 1;
    }

    /// Whether the configured duration has elapsed since the first capture
    pub fn is_finished(&self) -> bool {
        self.is_finished_at(Instant::now())
    }

    fn is_finished_at(&self, now: Instant) -> bool {
        let duration = Duration::from_secs_f32(self.config.duration_secs.max(0.0));
        match self.started {
            Some(start) => now.duration_since(start) >= duration,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config(name: &str, duration_secs: f32) -> RecordingConfig {
        let mut config = RecordingConfig::new(duration_secs);
        config.output_dir = std::env::temp_dir().join(format!(
            "noisecaster-{}-{}",
            name,
            std::process::id()
        ));
        config
    }

    #[test]
    fn test_capture_writes_numbered_png() {
        let config = temp_config("capture", 1.0);
        let mut recorder = FrameRecorder::new(config.clone()).unwrap();

        let frame = FrameBuffer::new(8, 4);
        recorder.capture(&frame);
        recorder.capture(&frame);

        assert_eq!(recorder.frames_written(), 2);
        let saved = image::open(config.frame_path(1)).unwrap().to_rgba8();
        assert_eq!(saved.dimensions(), (8, 4));
        assert_eq!(saved.get_pixel(0, 0).0, [0, 0, 0, 255]);

        std::fs::remove_dir_all(&config.output_dir).unwrap();
    }

    #[test]
    fn test_finishes_after_duration() {
        let config = temp_config("duration", 0.5);
        let mut recorder = FrameRecorder::new(config.clone()).unwrap();
        assert!(!recorder.is_finished());

        recorder.capture(&FrameBuffer::new(2, 2));
        let start = recorder.started.unwrap();
        assert!(!recorder.is_finished_at(start + Duration::from_millis(100)));
        assert!(recorder.is_finished_at(start + Duration::from_millis(500)));

        std::fs::remove_dir_all(&config.output_dir).unwrap();
    }
}
