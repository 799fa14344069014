//! Noisecaster library - keyboard-driven procedural noise, seen and heard

pub mod audio;
pub mod cli;
pub mod driver;
pub mod input;
pub mod params;
pub mod recording;
pub mod rendering;
pub mod store;
pub mod visual;
