//! Bloodlane library - envelope-triggered keycap visualizer

pub mod analysis;
pub mod audio;
pub mod cli;
pub mod controls;
pub mod error;
pub mod geometry;
pub mod keycap;
pub mod params;
pub mod particles;
pub mod rendering;
pub mod spawner;
pub mod visualizer;

pub use error::{BloodlaneError, Result};
