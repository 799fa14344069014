//! Frame driver: lifecycle state, input dispatch, and per-frame noise rendering.
//!
//! The driver owns everything on the main thread that is independent of the
//! window system, so the lifecycle can be exercised without a display.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use rand::Rng;

use crate::input::{Command, InputMapper};
use crate::params::RenderConfig;
use crate::store::ParameterStore;
use crate::visual::{FrameBuffer, PixelNoiseEngine};

/// Driver lifecycle; transitions only move forward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Nothing acquired yet
    Idle,
    /// Window up, playback started (either may be degraded)
    Running,
    /// Quit observed; releasing playback and GPU resources
    ShuttingDown,
    /// Terminal
    Terminated,
}

/// Sliding-window frame rate tracker
pub struct FpsTracker {
    frame_times: VecDeque<Duration>,
    last_frame: Instant,
    last_report: Instant,
}

impl FpsTracker {
    const WINDOW: usize = 60;

    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            frame_times: VecDeque::with_capacity(Self::WINDOW + 1),
            last_frame: now,
            last_report: now,
        }
    }

    pub fn record_frame(&mut self) {
        self.record_frame_at(Instant::now());
    }

    fn record_frame_at(&mut self, now: Instant) {
        let frame_time = now - self.last_frame;
        self.last_frame = now;

        self.frame_times.push_back(frame_time);
        if self.frame_times.len() > Self::WINDOW {
            self.frame_times.pop_front();
        }

        // Report once per second
        if now - self.last_report > Duration::from_secs(1) {
            debug!("FPS: {:.1}", self.current_fps());
            self.last_report = now;
        }
    }

    pub fn current_fps(&self) -> f32 {
        if self.frame_times.is_empty() {
            return 0.0;
        }

        let total: Duration = self.frame_times.iter().sum();
        let avg_frame_time = total.as_secs_f32() / self.frame_times.len() as f32;

        if avg_frame_time > 0.0 {
            1.0 / avg_frame_time
        } else {
            0.0
        }
    }
}

impl Default for FpsTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Main-thread frame driver
pub struct Driver<R> {
    state: DriverState,
    store: Arc<ParameterStore>,
    mapper: InputMapper<R>,
    pixel_engine: PixelNoiseEngine,
    frame: FrameBuffer,
    rng: R,
    fps: FpsTracker,
}

impl<R: Rng> Driver<R> {
    /// `input_rng` feeds key randomization, `pixel_rng` the noise frames
    pub fn new(
        config: &RenderConfig,
        store: Arc<ParameterStore>,
        input_rng: R,
        pixel_rng: R,
    ) -> Self {
        Self {
            state: DriverState::Idle,
            store,
            mapper: InputMapper::new(input_rng),
            pixel_engine: PixelNoiseEngine::new(),
            frame: FrameBuffer::new(config.window_width, config.window_height),
            rng: pixel_rng,
            fps: FpsTracker::new(),
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == DriverState::Running
    }

    pub fn store(&self) -> &Arc<ParameterStore> {
        &self.store
    }

    /// Idle → Running
    pub fn start(&mut self) {
        if self.state == DriverState::Idle {
            self.state = DriverState::Running;
            info!("Running");
        } else {
            warn!("Ignoring start in state {:?}", self.state);
        }
    }

    /// Dispatch one input command; returns `true` once shutdown has begun
    pub fn handle_command(&mut self, command: Command) -> bool {
        if !self.is_running() {
            return self.state != DriverState::Idle;
        }
        if self.mapper.dispatch(command, &self.store) {
            self.begin_shutdown();
        }
        !self.is_running()
    }

    /// Refresh the frame buffer from the latest bias snapshot
    pub fn render_frame(&mut self) -> &FrameBuffer {
        let bias = self.store.snapshot().bias;
        self.pixel_engine.render(&mut self.frame, &bias, &mut self.rng);
        self.fps.record_frame();
        &self.frame
    }

    pub fn frames_rendered(&self) -> u64 {
        self.pixel_engine.frames_rendered()
    }

    /// Idle/Running → ShuttingDown
    pub fn begin_shutdown(&mut self) {
        match self.state {
            DriverState::Idle | DriverState::Running => {
                self.state = DriverState::ShuttingDown;
                info!("Shutting down after {} frames", self.frames_rendered());
            }
            DriverState::ShuttingDown | DriverState::Terminated => {}
        }
    }

    /// ShuttingDown → Terminated
    pub fn finish(&mut self) {
        if self.state == DriverState::ShuttingDown {
            self.state = DriverState::Terminated;
        }
    }
}
