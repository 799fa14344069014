//! End-to-end scenarios across input, parameter store, and both engines.

use std::sync::Arc;
use std::thread;

use noisecaster::audio::SynthEngine;
use noisecaster::driver::{Driver, DriverState};
use noisecaster::input::{Command, InputMapper};
use noisecaster::params::{audio_constants, AudioConfig, RenderConfig};
use noisecaster::store::ParameterStore;
use rand::rngs::mock::StepRng;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn default_parameters_fill_one_block() {
    let store = ParameterStore::default();
    let config = AudioConfig::default();
    let mut engine = SynthEngine::new(&config);
    let mut block = vec![0i16; config.block_size as usize];

    let params = store.snapshot().synth;
    engine.fill_block(&params, &mut StdRng::seed_from_u64(1), &mut block);

    // Loose bound: noise < 1 and saw * tone < 1
    let bound = (audio_constants::AMPLITUDE * (1.0 + (255 / 2 * 2) as f32 / 255.0)) as i32;
    assert!(block.iter().all(|&s| i32::from(s).abs() <= bound));
    assert_eq!(engine.sample_clock(), 2048);
}

#[test]
fn zero_clarity_key_is_corrected_before_audio() {
    let store = ParameterStore::default();
    let mut mapper = InputMapper::new(StepRng::new(0, 0));

    assert!(!mapper.dispatch(Command::RandomizeClarity, &store));
    let params = store.snapshot().synth;
    assert_eq!(params.clarity_level.get(), 1);

    let mut engine = SynthEngine::new(&AudioConfig::default());
    let mut block = vec![0i16; 2048];
    engine.fill_block(&params, &mut StdRng::seed_from_u64(3), &mut block);

    // Noise collapses to 0; only the ramp remains
    assert!(block.iter().all(|&s| s >= 0));
}

#[test]
fn key_presses_reach_both_engines() {
    let config = RenderConfig {
        window_width: 32,
        window_height: 24,
        ..RenderConfig::default()
    };
    let store = Arc::new(ParameterStore::default());
    let mut driver = Driver::new(
        &config,
        Arc::clone(&store),
        StdRng::seed_from_u64(10),
        StdRng::seed_from_u64(20),
    );
    driver.start();

    for command in [
        Command::RandomizeRed,
        Command::RandomizeGreen,
        Command::RandomizeBlue,
        Command::RandomizeNoiseSteps,
        Command::RandomizeTone,
    ] {
        assert!(!driver.handle_command(command));
    }

    let snapshot = store.snapshot();
    let frame = driver.render_frame();
    for &pixel in &frame.pixels {
        let red = (pixel >> 16) & 0xFF;
        let green = (pixel >> 8) & 0xFF;
        let blue = pixel & 0xFF;
        assert!(red >= u32::from(snapshot.bias.red.min));
        assert!(red < u32::from(snapshot.bias.red.min) + snapshot.bias.red.span());
        assert!(green >= u32::from(snapshot.bias.green.min));
        assert!(blue >= u32::from(snapshot.bias.blue.min));
    }

    // Audio reads the same store from another thread
    let audio_store = Arc::clone(&store);
    let steps = thread::spawn(move || {
        let params = audio_store.snapshot().synth;
        let mut engine = SynthEngine::new(&AudioConfig::default());
        let mut block = vec![0i16; 256];
        engine.fill_block(&params, &mut StdRng::seed_from_u64(4), &mut block);
        params.noise_amplitude_steps
    })
    .join()
    .unwrap();
    assert_eq!(steps, snapshot.synth.noise_amplitude_steps);

    assert!(driver.handle_command(Command::Quit));
    driver.finish();
    assert_eq!(driver.state(), DriverState::Terminated);
}
