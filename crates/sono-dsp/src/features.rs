use sono_core::config::AnalysisConfig;
use sono_core::features::TrackFeatures;

use crate::mel::mfcc;
use crate::spectral::{spectral_centroid, spectral_rolloff};
use crate::stft::Stft;
use crate::temporal::{self, rms, zcr};

/// Pipeline complet sur un signal mono : RMS/ZCR globaux, puis RMS, ZCR,
/// centroïde, rolloff et coefficients cepstraux par trame.
///
/// Chaque appel recalcule tout sur l'entrée complète. Les paramètres sont
/// bornés via [`AnalysisConfig::clamp_all`] avant usage, donc une config
/// dégénérée produit un résultat vide plutôt qu'un panic.
///
/// # Example
/// ```
/// use sono_core::config::AnalysisConfig;
/// use sono_dsp::features::extract_features;
///
/// let samples = vec![0.0f32; 4096];
/// let features = extract_features(&samples, 48_000, &AnalysisConfig::default());
/// assert_eq!(features.num_frames, 7); // (4096 - 1024) / 512 + 1
/// assert_eq!(features.rms_frames.len(), 7);
/// assert_eq!(features.mfcc[0].len(), 13);
/// ```
#[must_use]
pub fn extract_features(
    samples: &[f32],
    sample_rate: u32,
    config: &AnalysisConfig,
) -> TrackFeatures {
    let mut config = config.clone();
    config.clamp_all();

    let rms_rows = temporal::rms_frames(samples, config.win_len, config.hop_len);
    let zcr_rows = temporal::zcr_frames(samples, config.win_len, config.hop_len);

    // zero sample rate carries no frequency axis: time-domain only
    if sample_rate == 0 {
        return TrackFeatures {
            num_samples: samples.len(),
            rms: rms(samples),
            zcr: zcr(samples),
            num_frames: rms_rows.len(),
            rms_frames: rms_rows,
            zcr_frames: zcr_rows,
            ..TrackFeatures::default()
        };
    }

    let mut stft = Stft::from_config(&config);
    let spectrogram = stft.spectrogram(samples, sample_rate);

    let centroid_hz = spectral_centroid(&spectrogram);
    let rolloff_hz = spectral_rolloff(&spectrogram, config.rolloff_pct);
    let mfcc_rows = mfcc(&spectrogram, config.n_mel, config.n_mfcc);

    log::debug!(
        "Extraction : {} échantillons @ {sample_rate} Hz → {} trames",
        samples.len(),
        spectrogram.num_frames()
    );

    TrackFeatures {
        sample_rate,
        num_samples: samples.len(),
        duration_secs: samples.len() as f32 / sample_rate as f32,
        rms: rms(samples),
        zcr: zcr(samples),
        num_frames: spectrogram.num_frames(),
        rms_frames: rms_rows,
        zcr_frames: zcr_rows,
        centroid_hz,
        rolloff_hz,
        mfcc: mfcc_rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, amplitude: f32, sample_rate: u32, secs: f32) -> Vec<f32> {
        let n = (sample_rate as f32 * secs) as usize;
        (0..n)
            .map(|i| {
                amplitude * (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate as f32).sin()
            })
            .collect()
    }

    #[test]
    fn full_pipeline_on_a_pure_tone() {
        let sample_rate = 8_192u32;
        let samples = sine(256.0, 0.8, sample_rate, 2.0);
        let features = extract_features(&samples, sample_rate, &AnalysisConfig::default());

        assert_eq!(features.num_samples, 16_384);
        assert!((features.duration_secs - 2.0).abs() < 1e-6);
        // sine RMS = A/√2
        assert!((features.rms - 0.8 / 2.0f32.sqrt()).abs() < 0.01);
        // 256 Hz tone crosses zero 2·f times per second
        assert!((features.zcr - 0.0625).abs() < 0.005);

        assert_eq!(features.num_frames, 31); // (16384 - 1024) / 512 + 1
        assert_eq!(features.rms_frames.len(), 31);
        assert_eq!(features.zcr_frames.len(), 31);
        assert_eq!(features.centroid_hz.len(), 31);
        assert_eq!(features.rolloff_hz.len(), 31);
        assert_eq!(features.mfcc.len(), 31);
        assert_eq!(features.mfcc[0].len(), 13);

        // a steady tone keeps the same energy in every window (32 whole periods)
        for &r in &features.rms_frames {
            assert!((r - 0.8 / 2.0f32.sqrt()).abs() < 0.01, "frame RMS {r} drifted");
        }

        // centroid hugs the tone on every frame
        let bin_hz = sample_rate as f32 / 1024.0;
        for &c in &features.centroid_hz {
            assert!((c - 256.0).abs() < bin_hz, "centroid {c} drifted");
        }
    }

    #[test]
    fn empty_signal_produces_empty_features() {
        let features = extract_features(&[], 48_000, &AnalysisConfig::default());
        assert_eq!(features.num_frames, 0);
        assert!(features.centroid_hz.is_empty());
        assert!(features.mfcc.is_empty());
        assert!(features.rms.abs() < f32::EPSILON);
    }

    #[test]
    fn short_signal_keeps_time_domain_features() {
        // shorter than the window: no frames, but RMS/ZCR still computed
        let features = extract_features(&[0.5f32; 100], 48_000, &AnalysisConfig::default());
        assert_eq!(features.num_frames, 0);
        assert!(features.rms_frames.is_empty());
        assert!((features.rms - 0.5).abs() < 1e-6);
    }

    #[test]
    fn zero_sample_rate_degrades_to_time_domain() {
        let features = extract_features(&[0.5f32, -0.5, 0.5, -0.5], 0, &AnalysisConfig::default());
        assert_eq!(features.num_frames, 0);
        assert!((features.rms - 0.5).abs() < 1e-6);
        assert!((features.zcr - 0.75).abs() < 1e-6);
    }

    #[test]
    fn degenerate_config_is_clamped_not_fatal() {
        let config = AnalysisConfig {
            win_len: 0,
            hop_len: 0,
            ..AnalysisConfig::default()
        };
        // clamps to win 16 / hop 1 instead of panicking
        let features = extract_features(&[0.1f32; 64], 8_000, &config);
        assert_eq!(features.num_frames, 49); // (64 - 16) / 1 + 1
        assert_eq!(features.rms_frames.len(), features.num_frames);
    }
}
