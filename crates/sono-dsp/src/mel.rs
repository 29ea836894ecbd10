use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex, PoisonError};

use crate::stft::Spectrogram;

/// Conversion Hz → mel : `2595 × log10(1 + hz/700)`.
///
/// # Example
/// ```
/// use sono_dsp::mel::hz_to_mel;
/// assert!(hz_to_mel(0.0).abs() < 1e-6);
/// ```
#[inline]
#[must_use]
pub fn hz_to_mel(hz: f32) -> f32 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

/// Conversion mel → Hz, inverse de [`hz_to_mel`].
#[inline]
#[must_use]
pub fn mel_to_hz(mel: f32) -> f32 {
    700.0 * (10.0f32.powf(mel / 2595.0) - 1.0)
}

/// Banc de filtres triangulaires espacés sur l'échelle mel.
///
/// Matrice `n_mel × (fft_size/2 + 1)` de poids, fonction pure de
/// `(sample_rate, fft_size, n_mel)` : deux constructions avec les mêmes
/// paramètres produisent des poids identiques.
///
/// # Example
/// ```
/// use sono_dsp::mel::MelFilterbank;
/// let fb = MelFilterbank::new(48_000, 1024, 26);
/// assert_eq!(fb.num_bands(), 26);
/// assert_eq!(fb.num_bins(), 513);
/// ```
pub struct MelFilterbank {
    sample_rate: u32,
    fft_size: usize,
    weights: Vec<Vec<f32>>,
}

/// Filterbanks are pure functions of their parameters, so completed builds
/// are shared process-wide, keyed by `(sample_rate, fft_size, n_mel)`.
static FILTERBANK_CACHE: LazyLock<Mutex<HashMap<(u32, usize, usize), Arc<MelFilterbank>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

impl MelFilterbank {
    /// Construct the filterbank: `n_mel + 2` mel-evenly-spaced points between
    /// 0 Hz and Nyquist, mapped to bin indices, then triangular rise/fall
    /// weights between consecutive boundaries.
    ///
    /// # Panics
    /// Panics if `sample_rate`, `fft_size` or `n_mel` is 0.
    #[must_use]
    pub fn new(sample_rate: u32, fft_size: usize, n_mel: usize) -> Self {
        assert!(sample_rate > 0, "sample_rate must be > 0");
        assert!(fft_size > 0, "fft_size must be > 0");
        assert!(n_mel > 0, "n_mel must be > 0");

        let n_bins = fft_size / 2 + 1;
        let max_mel = hz_to_mel(sample_rate as f32 / 2.0);
        let min_mel = hz_to_mel(0.0);

        // boundary frequencies in Hz, mel-evenly spaced
        let hz_points: Vec<f32> = (0..n_mel + 2)
            .map(|i| mel_to_hz(min_mel + (max_mel - min_mel) * i as f32 / (n_mel + 1) as f32))
            .collect();

        let bin_indices: Vec<usize> = hz_points
            .iter()
            .map(|&hz| ((fft_size + 1) as f32 * hz / sample_rate as f32).floor() as usize)
            .collect();

        let mut weights = vec![vec![0.0f32; n_bins]; n_mel];
        for m in 1..=n_mel {
            let left = bin_indices[m - 1];
            let center = bin_indices[m];
            let right = bin_indices[m + 1];

            let row = &mut weights[m - 1];
            for k in left..center.min(n_bins) {
                row[k] = (k - left) as f32 / (center - left) as f32;
            }
            for k in center..right.min(n_bins) {
                row[k] = (right - k) as f32 / (right - center) as f32;
            }
        }

        Self {
            sample_rate,
            fft_size,
            weights,
        }
    }

    /// Fetch the filterbank for this parameter triple from the process-wide
    /// cache, building it on first use.
    ///
    /// # Panics
    /// Panics if `sample_rate`, `fft_size` or `n_mel` is 0.
    #[must_use]
    pub fn cached(sample_rate: u32, fft_size: usize, n_mel: usize) -> Arc<Self> {
        let mut cache = FILTERBANK_CACHE
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            cache
                .entry((sample_rate, fft_size, n_mel))
                .or_insert_with(|| {
                    log::debug!(
                        "Construction du banc mel ({sample_rate} Hz, fft {fft_size}, {n_mel} bandes)"
                    );
                    Arc::new(Self::new(sample_rate, fft_size, n_mel))
                }),
        )
    }

    /// Énergies mel brutes : produit scalaire du spectre avec chaque filtre.
    #[must_use]
    pub fn mel_energies(&self, spectrum: &[f32]) -> Vec<f32> {
        self.weights
            .iter()
            .map(|row| {
                row.iter()
                    .zip(spectrum)
                    .map(|(&w, &mag)| w * mag)
                    .sum::<f32>()
            })
            .collect()
    }

    /// Énergies mel passées au log avec plancher : `ln(e + 1e-10)`.
    ///
    /// Never emits `-inf`, even for an all-zero spectrum.
    #[must_use]
    pub fn log_mel_energies(&self, spectrum: &[f32]) -> Vec<f32> {
        self.mel_energies(spectrum)
            .into_iter()
            .map(|e| (e + 1e-10).ln())
            .collect()
    }

    /// Number of mel bands (weight matrix rows).
    #[must_use]
    pub fn num_bands(&self) -> usize {
        self.weights.len()
    }

    /// Number of spectrum bins each filter spans (`fft_size/2 + 1`).
    #[must_use]
    pub fn num_bins(&self) -> usize {
        self.fft_size / 2 + 1
    }

    /// The triangular weight matrix, `n_mel` rows of `num_bins()` columns.
    #[must_use]
    pub fn weights(&self) -> &[Vec<f32>] {
        &self.weights
    }

    /// Sample rate the filterbank was built for.
    #[must_use]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

/// Coefficients cepstraux par trame.
///
/// Par trame : énergies log-mel projetées sur la base cosinus non normalisée
/// (DCT-II), `coeff[i] = Σ_m log_e[m] × cos(π·i·(m + 0.5)/n_mel)`, les
/// `n_mfcc` premiers coefficients retenus.
///
/// # Panics
/// Panics if `n_mel` is 0 or the spectrogram carries a zero `fft_size` or
/// `sample_rate`.
#[must_use]
pub fn mfcc(spectrogram: &Spectrogram, n_mel: usize, n_mfcc: usize) -> Vec<Vec<f32>> {
    if spectrogram.frames.is_empty() {
        return Vec::new();
    }
    let filterbank = MelFilterbank::cached(spectrogram.sample_rate, spectrogram.fft_size, n_mel);

    spectrogram
        .frames
        .iter()
        .map(|frame| dct_ii(&filterbank.log_mel_energies(frame), n_mfcc))
        .collect()
}

/// Unnormalized DCT-II, first `n_mfcc` coefficients.
fn dct_ii(log_energies: &[f32], n_mfcc: usize) -> Vec<f32> {
    let n_mel = log_energies.len();
    (0..n_mfcc)
        .map(|i| {
            log_energies
                .iter()
                .enumerate()
                .map(|(m, &e)| {
                    e * (std::f32::consts::PI * i as f32 * (m as f32 + 0.5) / n_mel as f32).cos()
                })
                .sum()
        })
        .collect()
}
