/// Énergie quadratique moyenne : `sqrt(mean(x²))`. Entrée vide → 0.0.
///
/// # Example
/// ```
/// use sono_dsp::temporal::rms;
/// assert!((rms(&[0.5, -0.5, 0.5, -0.5]) - 0.5).abs() < 1e-6);
/// assert!(rms(&[]).abs() < f32::EPSILON);
/// ```
#[must_use]
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_sq: f32 = samples.iter().map(|s| s * s).sum();
    (sum_sq / samples.len() as f32).sqrt()
}

/// Taux de passage par zéro : fraction de changements de signe.
///
/// Un échantillon de signe nul prolonge la série courante sans compter de
/// passage ; la comparaison se fait contre le dernier échantillon dont le
/// signe a été retenu, pas contre l'échantillon immédiatement précédent.
/// Entrée vide → 0.0.
///
/// # Example
/// ```
/// use sono_dsp::temporal::zcr;
/// assert!((zcr(&[1.0, -1.0, 1.0, -1.0]) - 0.75).abs() < 1e-6);
/// ```
#[must_use]
pub fn zcr(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let mut crossings = 0usize;
    let mut run_len = 1usize;

    for i in 1..samples.len() {
        let current = sign(samples[i]);
        let anchor = sign(samples[i - run_len]);

        if current == 0 || current == anchor {
            run_len += 1;
        } else {
            crossings += 1;
            run_len = 1;
        }
    }

    crossings as f32 / samples.len() as f32
}

#[inline]
fn sign(x: f32) -> i8 {
    i8::from(x > 0.0) - i8::from(x < 0.0)
}

/// RMS par trame de `win_len` échantillons tous les `hop_len`.
///
/// Signal plus court que la fenêtre → aucune trame. `win_len` ou `hop_len`
/// nul → aucune trame.
#[must_use]
pub fn rms_frames(samples: &[f32], win_len: usize, hop_len: usize) -> Vec<f32> {
    if win_len == 0 || hop_len == 0 {
        return Vec::new();
    }
    samples.windows(win_len).step_by(hop_len).map(rms).collect()
}

/// ZCR par trame, mêmes conventions de fenêtrage que [`rms_frames`].
#[must_use]
pub fn zcr_frames(samples: &[f32], win_len: usize, hop_len: usize) -> Vec<f32> {
    if win_len == 0 || hop_len == 0 {
        return Vec::new();
    }
    samples.windows(win_len).step_by(hop_len).map(zcr).collect()
}
