/// Configuration and shared types for sonoscope.
///
/// This crate contains the analysis/capture configuration surface and the
/// feature bundle types shared across the sonoscope workspace.

pub mod config;
pub mod features;

pub use config::{AnalysisConfig, CaptureConfig, DeviceSelector, SonoConfig, load_config};
pub use features::TrackFeatures;
