//! Keyboard input mapped to parameter randomization.
//!
//! Each mapped key replaces one parameter group with fresh random values and
//! publishes the result as a new snapshot.

use rand::Rng;
use winit::keyboard::{Key, NamedKey};

use crate::params::{ChannelBias, BIAS_LIMIT};
use crate::store::{ParamSnapshot, ParameterStore};

/// Discrete user commands recognized by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// J: randomize the red bias pair
    RandomizeRed,
    /// R: randomize the green bias pair
    RandomizeGreen,
    /// V: randomize the blue bias pair
    RandomizeBlue,
    /// D: randomize the noise clarity
    RandomizeClarity,
    /// Q: randomize the noise amplitude steps
    RandomizeNoiseSteps,
    /// T: randomize tone level and frequency
    RandomizeTone,
    /// Escape or window close
    Quit,
}

impl Command {
    /// Map a key symbol to a command; unmapped keys yield `None`
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let mut chars = symbol.chars();
        let c = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        match c.to_ascii_lowercase() {
            'j' => Some(Self::RandomizeRed),
            'r' => Some(Self::RandomizeGreen),
            'v' => Some(Self::RandomizeBlue),
            'd' => Some(Self::RandomizeClarity),
            'q' => Some(Self::RandomizeNoiseSteps),
            't' => Some(Self::RandomizeTone),
            _ => None,
        }
    }

    /// Map a logical winit key to a command
    pub fn from_key(key: &Key) -> Option<Self> {
        match key {
            Key::Named(NamedKey::Escape) => Some(Self::Quit),
            Key::Character(symbol) => Self::from_symbol(symbol.as_str()),
            _ => None,
        }
    }
}

/// Random bias pair, both values in `[0, BIAS_LIMIT)`
pub fn random_bias<R: Rng + ?Sized>(rng: &mut R) -> ChannelBias {
    ChannelBias::new(rng.gen_range(0..BIAS_LIMIT), rng.gen_range(0..BIAS_LIMIT))
}

/// Apply a randomizing command to a snapshot in place.
///
/// `Quit` leaves the snapshot untouched.
pub fn randomize<R: Rng + ?Sized>(command: Command, snapshot: &mut ParamSnapshot, rng: &mut R) {
    match command {
        Command::RandomizeRed => snapshot.bias.red = random_bias(rng),
        Command::RandomizeGreen => snapshot.bias.green = random_bias(rng),
        Command::RandomizeBlue => snapshot.bias.blue = random_bias(rng),
        Command::RandomizeClarity => snapshot.synth.set_clarity_level(rng.gen_range(0..1000)),
        Command::RandomizeNoiseSteps => snapshot.synth.noise_amplitude_steps = rng.gen_range(1..=4),
        Command::RandomizeTone => {
            snapshot.synth.tone = rng.gen_range(0..15) as f32 / 5.0;
            let numerator = rng.gen_range(0..1000) as f32;
            let denominator = rng.gen_range(1..200) as f32;
            snapshot.synth.tone_frequency_hz = numerator / denominator;
        }
        Command::Quit => {}
    }
}

/// Translate input into parameter updates on the shared store
pub struct InputMapper<R> {
    rng: R,
}

impl<R: Rng> InputMapper<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Publish the effect of `command`; returns `true` if it requests quit
    pub fn dispatch(&mut self, command: Command, store: &ParameterStore) -> bool {
        if command == Command::Quit {
            return true;
        }
        let rng = &mut self.rng;
        store.update(|snapshot| randomize(command, snapshot, rng));
        log::debug!("{:?} -> {:?}", command, store.snapshot());
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_symbol_mapping() {
        assert_eq!(Command::from_symbol("j"), Some(Command::RandomizeRed));
        assert_eq!(Command::from_symbol("R"), Some(Command::RandomizeGreen));
        assert_eq!(Command::from_symbol("v"), Some(Command::RandomizeBlue));
        assert_eq!(Command::from_symbol("d"), Some(Command::RandomizeClarity));
        assert_eq!(Command::from_symbol("q"), Some(Command::RandomizeNoiseSteps));
        assert_eq!(Command::from_symbol("t"), Some(Command::RandomizeTone));
        assert_eq!(Command::from_symbol("x"), None);
        assert_eq!(Command::from_symbol("jj"), None);
        assert_eq!(Command::from_symbol(""), None);
    }

    #[test]
    fn test_escape_quits() {
        assert_eq!(
            Command::from_key(&Key::Named(NamedKey::Escape)),
            Some(Command::Quit)
        );
        assert_eq!(Command::from_key(&Key::Named(NamedKey::Space)), None);
    }

    #[test]
    fn test_randomized_ranges() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut snapshot = ParamSnapshot::default();

        for _ in 0..500 {
            randomize(Command::RandomizeRed, &mut snapshot, &mut rng);
            randomize(Command::RandomizeClarity, &mut snapshot, &mut rng);
            randomize(Command::RandomizeNoiseSteps, &mut snapshot, &mut rng);
            randomize(Command::RandomizeTone, &mut snapshot, &mut rng);

            assert!(snapshot.bias.red.min < BIAS_LIMIT);
            assert!(snapshot.bias.red.max < BIAS_LIMIT);
            assert!((1..1000).contains(&snapshot.synth.clarity_level.get()));
            assert!((1..=4).contains(&snapshot.synth.noise_amplitude_steps));
            assert!((0.0..3.0).contains(&snapshot.synth.tone));
            assert!(snapshot.synth.tone_frequency_hz.is_finite());
            assert!(snapshot.synth.tone_frequency_hz >= 0.0);
        }
    }

    #[test]
    fn test_zero_clarity_draw_is_stored_as_one() {
        // StepRng(0, 0) always yields zero, the low end of every range
        let mut rng = StepRng::new(0, 0);
        let mut snapshot = ParamSnapshot::default();

        randomize(Command::RandomizeClarity, &mut snapshot, &mut rng);
        assert_eq!(snapshot.synth.clarity_level.get(), 1);
    }

    #[test]
    fn test_tone_denominator_excludes_zero() {
        let mut rng = StepRng::new(0, 0);
        let mut snapshot = ParamSnapshot::default();

        randomize(Command::RandomizeTone, &mut snapshot, &mut rng);
        assert_eq!(snapshot.synth.tone, 0.0);
        // 0 / 1, not 0 / 0
        assert_eq!(snapshot.synth.tone_frequency_hz, 0.0);
    }

    #[test]
    fn test_dispatch_changes_only_target_group() {
        let store = ParameterStore::default();
        let mut mapper = InputMapper::new(StdRng::seed_from_u64(8));

        assert!(!mapper.dispatch(Command::RandomizeBlue, &store));
        let snapshot = store.snapshot();
        assert_eq!(snapshot.synth, ParamSnapshot::default().synth);
        assert_eq!(snapshot.bias.red, ChannelBias::default());
        assert_eq!(snapshot.bias.green, ChannelBias::default());

        assert!(mapper.dispatch(Command::Quit, &store));
        assert_eq!(store.snapshot(), snapshot);
    }
}
