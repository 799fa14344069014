//! Playback stream feeding the synthesis engine from the parameter store.

use std::fs::File;
use std::io::BufWriter;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context as _};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use log::{error, info, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use super::synthesis::SynthEngine;
use crate::params::{AudioConfig, RecordingConfig};
use crate::store::ParameterStore;

/// Frames the mono scratch covers in one pass; larger callbacks are filled in passes
const MAX_PASS_FRAMES: usize = 8192;

/// WAV writer shared with the audio callback in recording mode
pub type WavRecorder = Arc<Mutex<hound::WavWriter<BufWriter<File>>>>;

/// Create the WAV file receiving every synthesized sample
pub fn create_wav_recorder(
    recording: &RecordingConfig,
    audio: &AudioConfig,
) -> anyhow::Result<WavRecorder> {
    let spec = hound::WavSpec {
        channels: audio.channels,
        sample_rate: audio.sample_rate_hz,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let path = recording.audio_path();
    let writer = hound::WavWriter::create(&path, spec)
        .with_context(|| format!("Failed to create WAV file {}", path.display()))?;
    Ok(Arc::new(Mutex::new(writer)))
}

/// Append one mono block to the recording without ever blocking.
///
/// A contended block is skipped in the file only.
fn record_block(recorder: &WavRecorder, samples: &[i16]) {
    if let Ok(mut writer) = recorder.try_lock() {
        for &sample in samples {
            let _ = writer.write_sample(sample);
        }
    }
}

/// Write the WAV header once the callback no longer holds the writer.
///
/// Returns `false` when the header could not be written here.
fn finalize_recorder(recorder: WavRecorder) -> bool {
    let writer = match Arc::try_unwrap(recorder) {
        Ok(mutex) => mutex.into_inner(),
        Err(_) => {
            warn!("WAV writer still shared at shutdown; header left to drop");
            return false;
        }
    };
    match writer {
        Ok(writer) => match writer.finalize() {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to finalize WAV file: {}", e);
                false
            }
        },
        Err(_) => {
            error!("WAV writer poisoned; recording may be truncated");
            false
        }
    }
}

/// Copy each mono sample into every channel of its interleaved output frame
pub fn write_interleaved<T>(mono: &[i16], out: &mut [T], channels: usize)
where
    T: cpal::Sample + cpal::FromSample<i16>,
{
    for (frame, &sample) in out.chunks_exact_mut(channels.max(1)).zip(mono) {
        frame.fill(T::from_sample(sample));
    }
}

/// Whether a device config range covers the requested rate, format and channels
pub fn range_matches(range: &cpal::SupportedStreamConfigRange, config: &AudioConfig) -> bool {
    range.channels() == config.channels
        && range.sample_format() == cpal::SampleFormat::I16
        && range.min_sample_rate().0 <= config.sample_rate_hz
        && range.max_sample_rate().0 >= config.sample_rate_hz
}

/// Whether a device accepts the requested fixed buffer size
pub fn buffer_size_supported(buffer_size: &cpal::SupportedBufferSize, frames: u32) -> bool {
    match buffer_size {
        cpal::SupportedBufferSize::Range { min, max } => (*min..=*max).contains(&frames),
        cpal::SupportedBufferSize::Unknown => false,
    }
}

fn buffer_size_for(
    supported: &cpal::SupportedBufferSize,
    config: &AudioConfig,
) -> cpal::BufferSize {
    if buffer_size_supported(supported, config.block_size) {
        cpal::BufferSize::Fixed(config.block_size)
    } else {
        warn!(
            "Fixed buffer of {} frames not supported, using device default",
            config.block_size
        );
        cpal::BufferSize::Default
    }
}

/// Pick the stream configuration and sample format to open.
///
/// Mono i16 at the requested rate when the device lists it, otherwise the
/// device's own default output config. The engine keeps synthesizing at the
/// requested rate either way.
fn negotiate_stream_config(
    device: &cpal::Device,
    config: &AudioConfig,
) -> anyhow::Result<(cpal::StreamConfig, cpal::SampleFormat)> {
    let ranges: Vec<_> = match device.supported_output_configs() {
        Ok(ranges) => ranges.collect(),
        Err(e) => {
            warn!("Could not query output configs: {}", e);
            Vec::new()
        }
    };

    if let Some(range) = ranges.iter().find(|r| range_matches(r, config)) {
        let stream_config = cpal::StreamConfig {
            channels: config.channels,
            sample_rate: cpal::SampleRate(config.sample_rate_hz),
            buffer_size: buffer_size_for(range.buffer_size(), config),
        };
        return Ok((stream_config, cpal::SampleFormat::I16));
    }

    let default = device
        .default_output_config()
        .context("No default output config")?;
    warn!(
        "Device lacks {}Hz / i16 / {}ch; using its default {}Hz / {:?} / {}ch",
        config.sample_rate_hz,
        config.channels,
        default.sample_rate().0,
        default.sample_format(),
        default.channels()
    );
    let mut stream_config = default.config();
    stream_config.buffer_size = buffer_size_for(default.buffer_size(), config);
    Ok((stream_config, default.sample_format()))
}

/// Everything the audio callback owns
struct CallbackState {
    engine: SynthEngine,
    rng: SmallRng,
    store: Arc<ParameterStore>,
    recorder: Option<WavRecorder>,
    /// Mono block the engine renders into, allocated once
    scratch: Vec<i16>,
}

impl CallbackState {
    fn new(
        config: &AudioConfig,
        store: Arc<ParameterStore>,
        recorder: Option<WavRecorder>,
        rng: SmallRng,
    ) -> Self {
        let scratch_len = (config.block_size as usize).max(MAX_PASS_FRAMES);
        Self {
            engine: SynthEngine::new(config),
            rng,
            store,
            recorder,
            scratch: vec![0; scratch_len],
        }
    }

    /// Fill one device buffer of `channels`-interleaved samples
    fn render<T>(&mut self, data: &mut [T], channels: usize)
    where
        T: cpal::Sample + cpal::FromSample<i16>,
    {
        let channels = channels.max(1);
        // One snapshot per block
        let params = self.store.snapshot().synth;

        for out in data.chunks_mut(self.scratch.len() * channels) {
            let mono = &mut self.scratch[..out.len() / channels];
            self.engine.fill_block(&params, &mut self.rng, mono);
            write_interleaved(mono, out, channels);

            if let Some(ref recorder) = self.recorder {
                record_block(recorder, mono);
            }
        }
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    stream_config: &cpal::StreamConfig,
    mut state: CallbackState,
) -> Result<cpal::Stream, cpal::BuildStreamError>
where
    T: cpal::SizedSample + cpal::FromSample<i16>,
{
    let channels = usize::from(stream_config.channels);
    device.build_output_stream(
        stream_config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| state.render(data, channels),
        |err| error!("Audio stream error: {}", err),
        None,
    )
}

/// Audio system owning the playback stream
pub struct AudioSystem {
    /// Audio output stream (kept alive; dropping it releases the device)
    stream: cpal::Stream,

    /// Recording sink shared with the callback
    recorder: Option<WavRecorder>,

    playing: bool,
}

impl AudioSystem {
    /// Open the default output device and start playback
    pub fn new(
        config: &AudioConfig,
        store: Arc<ParameterStore>,
        recorder: Option<WavRecorder>,
    ) -> anyhow::Result<Self> {
        config
            .validate()
            .map_err(|e| anyhow!("Invalid audio config: {}", e))?;

        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .context("No audio output device found")?;

        let (stream_config, sample_format) = negotiate_stream_config(&device, config)?;

        info!(
            "Audio: {} @ {}Hz, {} channel(s), {:?}, buffer {:?} ({:.1}ms requested)",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            stream_config.sample_rate.0,
            stream_config.channels,
            sample_format,
            stream_config.buffer_size,
            config.block_duration_s() * 1000.0
        );

        let state = CallbackState::new(
            config,
            store,
            recorder.clone(),
            SmallRng::from_entropy(),
        );

        let stream = match sample_format {
            cpal::SampleFormat::I16 => build_stream::<i16>(&device, &stream_config, state),
            cpal::SampleFormat::F32 => build_stream::<f32>(&device, &stream_config, state),
            cpal::SampleFormat::U16 => build_stream::<u16>(&device, &stream_config, state),
            other => anyhow::bail!("Unsupported output sample format {:?}", other),
        }
        .context("Failed to build audio stream")?;

        stream.play().context("Failed to start audio stream")?;

        Ok(Self {
            stream,
            recorder,
            playing: true,
        })
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Pause playback; the callback stops being invoked
    pub fn pause(&mut self) {
        if !self.playing {
            return;
        }
        match self.stream.pause() {
            Ok(()) => self.playing = false,
            Err(e) => warn!("Failed to pause audio stream: {}", e),
        }
    }

    /// Pause, release the device, and finalize any recording
    pub fn shutdown(mut self) {
        self.pause();
        let Self {
            stream, recorder, ..
        } = self;
        // The callback's writer clone goes with the stream
        drop(stream);

        if let Some(recorder) = recorder {
            finalize_recorder(recorder);
        }
        info!("Audio stopped");
    }
}
