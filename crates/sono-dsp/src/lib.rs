// Signal-processing pipeline for sonoscope: transform, framing, features.

pub mod features;
pub mod fft;
pub mod mel;
pub mod spectral;
pub mod stft;
pub mod temporal;

pub use features::extract_features;
pub use fft::{FftEngine, fft};
pub use mel::{MelFilterbank, mfcc};
pub use spectral::{spectral_centroid, spectral_rolloff};
pub use stft::{Spectrogram, Stft, compute_stft};
pub use temporal::{rms, zcr};
