use serde::Serialize;

/// Bundle de caractéristiques extraites d'un signal mono complet.
///
/// Les champs scalaires (`rms`, `zcr`) décrivent le signal entier ; les
/// vecteurs portent une valeur par trame d'analyse, dans l'ordre temporel.
#[derive(Clone, Debug, Default, Serialize)]
pub struct TrackFeatures {
    /// Taux d'échantillonnage du signal analysé, en Hz.
    pub sample_rate: u32,
    /// Nombre d'échantillons mono analysés.
    pub num_samples: usize,
    /// Durée du signal, en secondes.
    pub duration_secs: f32,
    /// Énergie quadratique moyenne du signal entier.
    pub rms: f32,
    /// Taux de passage par zéro du signal entier [0.0, 1.0].
    pub zcr: f32,
    /// Nombre de trames d'analyse produites.
    pub num_frames: usize,
    /// Énergie quadratique moyenne par trame.
    pub rms_frames: Vec<f32>,
    /// Taux de passage par zéro par trame.
    pub zcr_frames: Vec<f32>,
    /// Centroïde spectral par trame, en Hz.
    pub centroid_hz: Vec<f32>,
    /// Fréquence de rolloff par trame, en Hz.
    pub rolloff_hz: Vec<f32>,
    /// Coefficients cepstraux par trame (`num_frames` lignes de `n_mfcc`).
    pub mfcc: Vec<Vec<f32>>,
}

impl TrackFeatures {
    /// Moyenne du centroïde sur toutes les trames, 0.0 si aucune trame.
    #[must_use]
    pub fn centroid_mean(&self) -> f32 {
        mean(&self.centroid_hz)
    }

    /// Moyenne du rolloff sur toutes les trames, 0.0 si aucune trame.
    #[must_use]
    pub fn rolloff_mean(&self) -> f32 {
        mean(&self.rolloff_hz)
    }

    /// Moyenne de chaque coefficient cepstral sur toutes les trames.
    ///
    /// Retourne un vecteur vide si aucune trame n'a été produite.
    #[must_use]
    pub fn mfcc_means(&self) -> Vec<f32> {
        let Some(first) = self.mfcc.first() else {
            return Vec::new();
        };
        let n = first.len();
        let mut sums = vec![0.0f32; n];
        for row in &self.mfcc {
            for (acc, &c) in sums.iter_mut().zip(row) {
                *acc += c;
            }
        }
        let count = self.mfcc.len() as f32;
        for acc in &mut sums {
            *acc /= count;
        }
        sums
    }
}

#[inline]
fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let count = values.len() as f32;
    values.iter().sum::<f32>() / count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn means_of_empty_features_are_zero() {
        let features = TrackFeatures::default();
        assert!((features.centroid_mean() - 0.0).abs() < f32::EPSILON);
        assert!((features.rolloff_mean() - 0.0).abs() < f32::EPSILON);
        assert!(features.mfcc_means().is_empty());
    }

    #[test]
    fn per_frame_means_average_rows() {
        let features = TrackFeatures {
            centroid_hz: vec![100.0, 300.0],
            rolloff_hz: vec![1000.0, 3000.0],
            mfcc: vec![vec![1.0, 2.0], vec![3.0, 4.0]],
            ..TrackFeatures::default()
        };
        assert!((features.centroid_mean() - 200.0).abs() < 1e-6);
        assert!((features.rolloff_mean() - 2000.0).abs() < 1e-6);
        let means = features.mfcc_means();
        assert_eq!(means.len(), 2);
        assert!((means[0] - 2.0).abs() < 1e-6);
        assert!((means[1] - 3.0).abs() < 1e-6);
    }
}
