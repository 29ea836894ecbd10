use crate::stft::Spectrogram;

/// Centroïde spectral par trame, en Hz.
///
/// Par trame : Σ(k·bin_hz·magnitude) / Σ(magnitude). En dessous d'un seuil
/// de silence (somme ≤ 1e-6) la trame vaut 0.0 plutôt qu'un NaN.
///
/// # Example
/// ```
/// use sono_dsp::spectral::spectral_centroid;
/// use sono_dsp::stft::Spectrogram;
///
/// let spec = Spectrogram {
///     frames: vec![vec![0.0, 1.0, 0.0]], // all magnitude in bin 1
///     fft_size: 4,
///     sample_rate: 8,
///     hop_len: 2,
/// };
/// let centroids = spectral_centroid(&spec);
/// assert!((centroids[0] - 2.0).abs() < 1e-6); // bin 1 × (8/4) Hz
/// ```
#[must_use]
pub fn spectral_centroid(spectrogram: &Spectrogram) -> Vec<f32> {
    let bin_hz = spectrogram.bin_hz();
    spectrogram
        .frames
        .iter()
        .map(|frame| centroid_frame(frame, bin_hz))
        .collect()
}

fn centroid_frame(frame: &[f32], bin_hz: f32) -> f32 {
    let mut weighted_sum = 0.0f32;
    let mut magnitude_sum = 0.0f32;

    for (k, &mag) in frame.iter().enumerate() {
        weighted_sum += k as f32 * bin_hz * mag;
        magnitude_sum += mag;
    }

    if magnitude_sum > 1e-6 {
        weighted_sum / magnitude_sum
    } else {
        0.0
    }
}

/// Fréquence de rolloff par trame, en Hz.
///
/// Par trame : seuil = `rolloff_pct` × Σ(magnitude) ; premier bin dont la
/// somme cumulée atteint le seuil. Si le seuil n'est jamais atteint, le
/// dernier bin est retenu.
#[must_use]
pub fn spectral_rolloff(spectrogram: &Spectrogram, rolloff_pct: f32) -> Vec<f32> {
    let bin_hz = spectrogram.bin_hz();
    spectrogram
        .frames
        .iter()
        .map(|frame| rolloff_frame(frame, bin_hz, rolloff_pct))
        .collect()
}

fn rolloff_frame(frame: &[f32], bin_hz: f32, rolloff_pct: f32) -> f32 {
    if frame.is_empty() {
        return 0.0;
    }

    // same accumulation order as the scan below, so a 1.0 threshold is
    // reached exactly at the last bin of an all-positive frame
    let total: f32 = frame.iter().sum();
    let threshold = rolloff_pct * total;

    let mut cumulative = 0.0f32;
    let mut roll_bin = frame.len() - 1;
    for (k, &mag) in frame.iter().enumerate() {
        cumulative += mag;
        if cumulative >= threshold {
            roll_bin = k;
            break;
        }
    }

    roll_bin as f32 * bin_hz
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stft::compute_stft;

    fn toy_spectrogram(frames: Vec<Vec<f32>>) -> Spectrogram {
        Spectrogram {
            frames,
            fft_size: 4, // 3 bins, bin_hz = 2.0
            sample_rate: 8,
            hop_len: 2,
        }
    }

    #[test]
    fn centroid_of_pure_tone_lands_within_one_bin() {
        // sine at exactly bin 32: f = 32 × (8192/1024) = 256 Hz
        let sample_rate = 8192u32;
        let n = 1024usize;
        let f = 256.0f32;
        let signal: Vec<f32> = (0..n)
            .map(|i| (2.0 * std::f32::consts::PI * f * i as f32 / sample_rate as f32).sin())
            .collect();

        let spec = compute_stft(&signal, sample_rate, n, n);
        assert_eq!(spec.num_frames(), 1);

        let bin_width = spec.bin_hz();
        let centroids = spectral_centroid(&spec);
        assert!(
            (centroids[0] - f).abs() < bin_width,
            "centroid {} not within {} Hz of {}",
            centroids[0],
            bin_width,
            f
        );
    }

    #[test]
    fn centroid_of_silence_is_zero() {
        let spec = toy_spectrogram(vec![vec![0.0, 0.0, 0.0]]);
        assert_eq!(spectral_centroid(&spec), vec![0.0]);
    }

    #[test]
    fn centroid_of_empty_spectrogram_is_empty() {
        let spec = toy_spectrogram(vec![]);
        assert!(spectral_centroid(&spec).is_empty());
    }

    #[test]
    fn rolloff_full_threshold_selects_last_bin() {
        let spec = toy_spectrogram(vec![vec![1.0, 2.0, 3.0], vec![0.5, 0.5, 0.5]]);
        let rolloffs = spectral_rolloff(&spec, 1.0);
        // last bin (index 2) × 2 Hz for every frame
        assert_eq!(rolloffs, vec![4.0, 4.0]);
    }

    #[test]
    fn rolloff_half_threshold_stops_mid_spectrum() {
        // cumulative [1, 2, 3, 4]; threshold 2 reached at bin 1
        let spec = Spectrogram {
            frames: vec![vec![1.0, 1.0, 1.0, 1.0]],
            fft_size: 6,
            sample_rate: 12,
            hop_len: 3,
        };
        let rolloffs = spectral_rolloff(&spec, 0.5);
        assert!((rolloffs[0] - 2.0).abs() < 1e-6); // bin 1 × 2 Hz
    }

    #[test]
    fn rolloff_of_silent_frame_is_first_bin() {
        // zero energy: threshold 0 is met immediately at bin 0
        let spec = toy_spectrogram(vec![vec![0.0, 0.0, 0.0]]);
        assert_eq!(spectral_rolloff(&spec, 0.99), vec![0.0]);
    }

    #[test]
    fn rolloff_of_empty_spectrogram_is_empty() {
        let spec = toy_spectrogram(vec![]);
        assert!(spectral_rolloff(&spec, 0.99).is_empty());
    }
}
