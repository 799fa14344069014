//! Rendering and recording configuration.

use std::path::PathBuf;

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window and frame buffer width (pixels)
    pub window_width: u32,

    /// Window and frame buffer height (pixels)
    pub window_height: u32,

    /// Window title
    pub title: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 640,
            window_height: 480,
            title: "Noisecaster".to_string(),
        }
    }
}

/// Recording mode configuration
#[derive(Debug, Clone)]
pub struct RecordingConfig {
    /// Duration to record (seconds)
    pub duration_secs: f32,

    /// Output directory for frames and audio
    pub output_dir: PathBuf,
}

impl RecordingConfig {
    pub fn new(duration_secs: f32) -> Self {
        Self {
            duration_secs,
            output_dir: PathBuf::from("recording"),
        }
    }

    /// Frame directory path
    pub fn frames_dir(&self) -> PathBuf {
        self.output_dir.join("frames")
    }

    /// Path of a single captured frame
    pub fn frame_path(&self, frame_num: usize) -> PathBuf {
        self.frames_dir().join(format!("frame_{:05}.png", frame_num))
    }

    /// Audio file path
    pub fn audio_path(&self) -> PathBuf {
        self.output_dir.join("audio.wav")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_paths() {
        let config = RecordingConfig::new(2.0);
        assert_eq!(config.audio_path(), PathBuf::from("recording/audio.wav"));
        assert_eq!(
            config.frame_path(7),
            PathBuf::from("recording/frames/frame_00007.png")
        );
    }
}
