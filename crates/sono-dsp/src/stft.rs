use sono_core::config::AnalysisConfig;

use crate::fft::FftEngine;

/// Spectrogramme d'amplitude : une rangée de magnitudes par trame,
/// en ordre temporel croissant.
#[derive(Clone, Debug)]
pub struct Spectrogram {
    /// Magnitudes par trame (`fft_size/2 + 1` valeurs chacune).
    pub frames: Vec<Vec<f32>>,
    /// Longueur du transform qui a produit les bins.
    pub fft_size: usize,
    /// Taux d'échantillonnage du signal source, en Hz.
    pub sample_rate: u32,
    /// Pas entre trames, en échantillons.
    pub hop_len: usize,
}

impl Spectrogram {
    /// Nombre de trames.
    #[must_use]
    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    /// Nombre de bins par trame (`fft_size/2 + 1`).
    #[must_use]
    pub fn num_bins(&self) -> usize {
        self.fft_size / 2 + 1
    }

    /// Largeur d'un bin en Hz.
    #[must_use]
    pub fn bin_hz(&self) -> f32 {
        self.sample_rate as f32 / self.fft_size as f32
    }

    /// Position temporelle du début d'une trame, en secondes.
    #[must_use]
    pub fn frame_to_seconds(&self, frame_idx: usize) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        (frame_idx * self.hop_len) as f32 / self.sample_rate as f32
    }

    /// `true` si aucune trame n'a été produite.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// Fenêtre de Hann symétrique : `w[i] = 0.5 × (1 − cos(2π·i / (n − 1)))`.
///
/// # Example
/// ```
/// use sono_dsp::stft::hann_window;
/// let w = hann_window(8);
/// assert!(w[0].abs() < 1e-6);
/// assert!((w[3] - w[4]).abs() < 1e-6); // symmetric around the center
/// ```
#[must_use]
pub fn hann_window(win_len: usize) -> Vec<f32> {
    match win_len {
        0 => Vec::new(),
        // the symmetric formula divides by n - 1
        1 => vec![1.0],
        n => (0..n)
            .map(|i| {
                0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / (n as f32 - 1.0)).cos())
            })
            .collect(),
    }
}

/// Transformée court-terme : fenêtrage de Hann + transform par trame.
///
/// Réutilise le plan et les buffers entre trames.
///
/// # Example
/// ```
/// use sono_dsp::stft::Stft;
/// let mut stft = Stft::new(256, 128, 256);
/// let signal = vec![0.0f32; 1024];
/// let spec = stft.spectrogram(&signal, 48_000);
/// assert_eq!(spec.num_frames(), 7); // (1024 - 256) / 128 + 1
/// assert_eq!(spec.num_bins(), 129);
/// ```
pub struct Stft {
    win_len: usize,
    hop_len: usize,
    window: Vec<f32>,
    engine: FftEngine,
    frame_buf: Vec<f32>,
}

impl Stft {
    /// Create a short-time transform stage.
    ///
    /// `fft_size` below `win_len` is raised to `win_len`; above it, frames are
    /// zero-padded to the transform length.
    ///
    /// # Panics
    /// Panics if `win_len` or `hop_len` is 0.
    #[must_use]
    pub fn new(win_len: usize, hop_len: usize, fft_size: usize) -> Self {
        assert!(win_len > 0, "win_len must be > 0");
        assert!(hop_len > 0, "hop_len must be > 0");

        let fft_size = fft_size.max(win_len);
        Self {
            win_len,
            hop_len,
            window: hann_window(win_len),
            engine: FftEngine::new(fft_size),
            frame_buf: vec![0.0; win_len],
        }
    }

    /// Build a stage from an [`AnalysisConfig`] (clamped beforehand by the
    /// caller; see [`AnalysisConfig::clamp_all`]).
    ///
    /// # Panics
    /// Panics if the config carries a zero `win_len` or `hop_len`.
    #[must_use]
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.win_len, config.hop_len, config.effective_fft_size())
    }

    /// Compute the magnitude spectrogram of `signal`.
    ///
    /// Frame count is `(len − win_len)/hop_len + 1`, clamped to zero when the
    /// signal is shorter than the window — an empty spectrogram, never an
    /// underflowing count.
    pub fn spectrogram(&mut self, signal: &[f32], sample_rate: u32) -> Spectrogram {
        let num_frames = if signal.len() < self.win_len {
            0
        } else {
            (signal.len() - self.win_len) / self.hop_len + 1
        };

        let mut frames = Vec::with_capacity(num_frames);
        for f in 0..num_frames {
            let start = f * self.hop_len;
            let segment = &signal[start..start + self.win_len];

            for ((slot, &s), &w) in self.frame_buf.iter_mut().zip(segment).zip(&self.window) {
                *slot = s * w;
            }
            frames.push(self.engine.magnitudes(&self.frame_buf));
        }

        Spectrogram {
            frames,
            fft_size: self.engine.fft_size(),
            sample_rate,
            hop_len: self.hop_len,
        }
    }

    /// Window length in samples.
    #[must_use]
    pub fn win_len(&self) -> usize {
        self.win_len
    }

    /// Hop length in samples.
    #[must_use]
    pub fn hop_len(&self) -> usize {
        self.hop_len
    }
}

/// Spectrogramme en un appel, transform de la taille de la fenêtre.
///
/// # Panics
/// Panics if `win_len` or `hop_len` is 0.
#[must_use]
pub fn compute_stft(
    signal: &[f32],
    sample_rate: u32,
    win_len: usize,
    hop_len: usize,
) -> Spectrogram {
    Stft::new(win_len, hop_len, win_len).spectrogram(signal, sample_rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signal_shorter_than_window_yields_zero_frames() {
        let spec = compute_stft(&[0.1f32; 100], 48_000, 256, 128);
        assert_eq!(spec.num_frames(), 0);
        assert!(spec.is_empty());
    }

    #[test]
    fn empty_signal_yields_zero_frames() {
        let spec = compute_stft(&[], 48_000, 256, 128);
        assert_eq!(spec.num_frames(), 0);
    }

    #[test]
    fn exact_window_length_yields_one_frame() {
        let spec = compute_stft(&[0.5f32; 256], 48_000, 256, 128);
        assert_eq!(spec.num_frames(), 1);
        assert_eq!(spec.frames[0].len(), 129);
    }

    #[test]
    fn frame_count_follows_hop_arithmetic() {
        // (1024 + 3·512 − 1024) / 512 + 1 = 4
        let signal = vec![0.0f32; 1024 + 3 * 512];
        let spec = compute_stft(&signal, 48_000, 1024, 512);
        assert_eq!(spec.num_frames(), 4);
        assert_eq!(spec.num_bins(), 513);
    }

    #[test]
    fn frames_ascend_in_time() {
        // First window silent, second window loud: energy must appear in
        // frame 1, not frame 0.
        let mut signal = vec![0.0f32; 8];
        signal[4..].fill(1.0);
        let spec = compute_stft(&signal, 8_000, 4, 4);
        assert_eq!(spec.num_frames(), 2);

        let energy = |frame: &[f32]| frame.iter().sum::<f32>();
        assert!(energy(&spec.frames[0]) < 1e-6);
        assert!(energy(&spec.frames[1]) > 0.1);
    }

    #[test]
    fn hann_window_shape() {
        let w = hann_window(16);
        assert_eq!(w.len(), 16);
        assert!(w[0].abs() < 1e-6);
        assert!(w[15].abs() < 1e-6);
        for i in 0..16 {
            assert!((w[i] - w[15 - i]).abs() < 1e-6, "asymmetric at {i}");
            assert!((0.0..=1.0).contains(&w[i]));
        }
    }

    #[test]
    fn hann_window_degenerate_lengths() {
        assert!(hann_window(0).is_empty());
        assert_eq!(hann_window(1), vec![1.0]);
    }

    #[test]
    fn zero_padded_transform_grows_bin_count() {
        let mut stft = Stft::new(64, 32, 256);
        let spec = stft.spectrogram(&[0.3f32; 64], 48_000);
        assert_eq!(spec.num_frames(), 1);
        assert_eq!(spec.num_bins(), 129);
        assert_eq!(spec.frames[0].len(), 129);
    }

    #[test]
    fn undersized_fft_request_is_raised_to_window() {
        let mut stft = Stft::new(128, 64, 32);
        assert_eq!(stft.win_len(), 128);
        assert_eq!(stft.hop_len(), 64);
        let spec = stft.spectrogram(&[0.0f32; 128], 48_000);
        assert_eq!(spec.fft_size, 128);
    }

    #[test]
    fn spectrogram_metadata_helpers() {
        let spec = Spectrogram {
            frames: vec![vec![0.0; 513]; 3],
            fft_size: 1024,
            sample_rate: 48_000,
            hop_len: 512,
        };
        assert!((spec.bin_hz() - 46.875).abs() < 1e-4);
        assert!((spec.frame_to_seconds(2) - 1024.0 / 48_000.0).abs() < 1e-6);
        assert_eq!(spec.num_bins(), 513);
        assert_eq!(spec.num_frames(), 3);
    }
}
