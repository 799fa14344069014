//! Noisecaster - full-screen colored static and a noisy sawtooth
//!
//! Both are driven by a handful of parameters that single key presses
//! scramble while everything keeps running.

use std::sync::Arc;

use clap::Parser;
use log::{error, info, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use noisecaster::audio::{create_wav_recorder, AudioSystem, WavRecorder};
use noisecaster::cli::Args;
use noisecaster::driver::{Driver, DriverState};
use noisecaster::input::Command;
use noisecaster::params::{AudioConfig, RecordingConfig, RenderConfig};
use noisecaster::recording::FrameRecorder;
use noisecaster::rendering::RenderSystem;
use noisecaster::store::ParameterStore;

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,

    // Generation
    driver: Driver<SmallRng>,
    audio: Option<AudioSystem>,

    // Configuration
    render_config: RenderConfig,
    audio_config: AudioConfig,
    audio_enabled: bool,

    // Recording mode
    recording: Option<RecordingConfig>,
    frame_recorder: Option<FrameRecorder>,
}

impl App {
    fn new(args: &Args) -> Self {
        let render_config = RenderConfig::default();
        let store = Arc::new(ParameterStore::default());
        let driver = Driver::new(
            &render_config,
            store,
            SmallRng::from_entropy(),
            SmallRng::from_entropy(),
        );

        Self {
            window: None,
            render_system: None,
            driver,
            audio: None,
            render_config,
            audio_config: AudioConfig::default(),
            audio_enabled: !args.no_audio,
            recording: args.recording_config(),
            frame_recorder: None,
        }
    }

    /// Open the WAV sink for recording mode; failures only disable audio capture
    fn open_wav_recorder(&self) -> Option<WavRecorder> {
        let recording = self.recording.as_ref()?;
        match create_wav_recorder(recording, &self.audio_config) {
            Ok(recorder) => Some(recorder),
            Err(e) => {
                error!("Audio recording disabled: {:#}", e);
                None
            }
        }
    }

    fn start_recording(&mut self) {
        let Some(recording) = self.recording.clone() else {
            return;
        };
        match FrameRecorder::new(recording) {
            Ok(recorder) => self.frame_recorder = Some(recorder),
            Err(e) => {
                error!("Recording disabled: {:#}", e);
                self.recording = None;
            }
        }
    }

    fn start_audio(&mut self) {
        if !self.audio_enabled {
            info!("Audio disabled, running video-only");
            return;
        }
        let recorder = self.open_wav_recorder();
        let store = Arc::clone(self.driver.store());
        match AudioSystem::new(&self.audio_config, store, recorder) {
            Ok(audio) => self.audio = Some(audio),
            Err(e) => error!("Audio unavailable, running video-only: {:#}", e),
        }
    }

    /// Pause playback and release every device; safe to call more than once
    fn shutdown(&mut self) {
        if self.driver.state() == DriverState::Terminated {
            return;
        }
        self.driver.begin_shutdown();

        if let Some(audio) = self.audio.take() {
            audio.shutdown();
        }
        if let Some(recorder) = self.frame_recorder.take() {
            info!("Recorded {} frames", recorder.frames_written());
        }
        self.render_system = None;
        self.window = None;

        self.driver.finish();
        info!("Terminated");
    }

    fn quit(&mut self, event_loop: &ActiveEventLoop) {
        self.driver.begin_shutdown();
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.driver.state() != DriverState::Idle {
            return; // Already initialized
        }

        let window_attributes = Window::default_attributes()
            .with_title(self.render_config.title.clone())
            .with_resizable(false)
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("Window could not be created: {}", e);
                self.quit(event_loop);
                return;
            }
        };

        match pollster::block_on(RenderSystem::new(
            Arc::clone(&window),
            self.render_config.window_width,
            self.render_config.window_height,
        )) {
            Ok(render_system) => self.render_system = Some(render_system),
            Err(e) => error!("Surface unavailable, frames will not be shown: {:#}", e),
        }

        self.start_recording();
        self.start_audio();

        info!("Noisecaster is running!");
        info!("J/R/V: color bias  D: clarity  Q: noise steps  T: tone  Esc: quit");

        self.window = Some(window);
        self.driver.start();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => self.quit(event_loop),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        logical_key,
                        ..
                    },
                ..
            } => {
                if let Some(command) = Command::from_key(&logical_key) {
                    if self.driver.handle_command(command) {
                        event_loop.exit();
                    }
                }
            }
            WindowEvent::Resized(size) => {
                if let Some(render_system) = &mut self.render_system {
                    render_system.resize(size.width, size.height);
                }
            }
            WindowEvent::RedrawRequested => self.render_frame(event_loop),
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.shutdown();
    }
}

impl App {
    /// Render a single frame: refresh noise, upload, present
    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        if !self.driver.is_running() {
            return;
        }

        let frame = self.driver.render_frame();

        if let Some(render_system) = &mut self.render_system {
            match render_system.draw(frame) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    error!("GPU out of memory, dropping the surface");
                    self.render_system = None;
                }
                Err(e) => warn!("Render error: {:?}", e),
            }
        }

        if let Some(recorder) = &mut self.frame_recorder {
            recorder.capture(frame);
            if recorder.is_finished() {
                info!("Recording complete");
                self.quit(event_loop);
            }
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    info!("Noisecaster - procedural noise generator");
    info!("Initializing systems...");

    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(e) => {
            error!("Could not initialize windowing: {}", e);
            return;
        }
    };
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(&args);
    if let Err(e) = event_loop.run_app(&mut app) {
        error!("Event loop error: {}", e);
    }
    app.shutdown();
}
