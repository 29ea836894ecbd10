use realfft::RealFftPlanner;
use realfft::num_complex::Complex;

/// Moteur de transformée réelle → complexe, plan et buffers pré-alloués.
///
/// La sortie est le spectre unilatéral brut (`fft_size/2 + 1` bins), sans
/// normalisation. Les trames plus courtes que `fft_size` sont complétées
/// par des zéros, les plus longues tronquées.
///
/// # Example
/// ```
/// use sono_dsp::fft::FftEngine;
/// let mut engine = FftEngine::new(256);
/// let spectrum = engine.forward(&[0.0f32; 256]);
/// assert_eq!(spectrum.len(), 129); // N/2 + 1
/// ```
pub struct FftEngine {
    fft_size: usize,
    input_buf: Vec<f32>,
    spectrum_buf: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    plan: std::sync::Arc<dyn realfft::RealToComplex<f32>>,
}

impl FftEngine {
    /// Create an engine for transforms of length `fft_size`.
    ///
    /// # Panics
    /// Panics if `fft_size` is 0.
    #[must_use]
    pub fn new(fft_size: usize) -> Self {
        assert!(fft_size > 0, "FFT size must be > 0");

        let mut planner = RealFftPlanner::<f32>::new();
        let plan = planner.plan_fft_forward(fft_size);

        let input_buf = plan.make_input_vec();
        let spectrum_buf = plan.make_output_vec();
        let scratch = plan.make_scratch_vec();

        Self {
            fft_size,
            input_buf,
            spectrum_buf,
            scratch,
            plan,
        }
    }

    /// One-sided complex spectrum of `frame` (`fft_size/2 + 1` values).
    pub fn forward(&mut self, frame: &[f32]) -> Vec<Complex<f32>> {
        self.run(frame);
        self.spectrum_buf.clone()
    }

    /// Magnitude of each bin of the one-sided spectrum.
    ///
    /// # Example
    /// ```
    /// use sono_dsp::fft::FftEngine;
    /// let mut engine = FftEngine::new(8);
    /// // DC-only signal: all energy lands in bin 0
    /// let mags = engine.magnitudes(&[1.0f32; 8]);
    /// assert!((mags[0] - 8.0).abs() < 1e-4);
    /// ```
    pub fn magnitudes(&mut self, frame: &[f32]) -> Vec<f32> {
        self.run(frame);
        self.spectrum_buf
            .iter()
            .map(|c| (c.re * c.re + c.im * c.im).sqrt())
            .collect()
    }

    fn run(&mut self, frame: &[f32]) {
        let n = self.fft_size.min(frame.len());

        for (i, slot) in self.input_buf.iter_mut().enumerate() {
            *slot = if i < n { frame[i] } else { 0.0 };
        }

        if self
            .plan
            .process_with_scratch(&mut self.input_buf, &mut self.spectrum_buf, &mut self.scratch)
            .is_err()
        {
            for c in &mut self.spectrum_buf {
                *c = Complex::new(0.0, 0.0);
            }
        }
    }

    /// Transform length.
    #[must_use]
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Number of one-sided spectrum bins (`fft_size/2 + 1`).
    #[must_use]
    pub fn num_bins(&self) -> usize {
        self.fft_size / 2 + 1
    }
}

/// Transformée unilatérale d'une séquence réelle de longueur quelconque.
///
/// `N` n'a pas besoin d'être une puissance de deux. Une entrée vide
/// produit une sortie vide.
///
/// # Example
/// ```
/// use sono_dsp::fft::fft;
/// assert_eq!(fft(&[]).len(), 0);
/// assert_eq!(fft(&[0.0; 7]).len(), 4); // ⌊7/2⌋ + 1
/// ```
#[must_use]
pub fn fft(input: &[f32]) -> Vec<Complex<f32>> {
    if input.is_empty() {
        return Vec::new();
    }
    FftEngine::new(input.len()).forward(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_length_is_half_plus_one() {
        for n in [1usize, 2, 7, 64, 100, 1024] {
            let signal = vec![0.5f32; n];
            assert_eq!(fft(&signal).len(), n / 2 + 1, "N = {n}");
        }
    }

    #[test]
    fn empty_input_yields_empty_spectrum() {
        assert!(fft(&[]).is_empty());
    }

    #[test]
    fn dc_signal_concentrates_in_bin_zero() {
        let spectrum = fft(&[1.0f32; 16]);
        // unnormalized transform: bin 0 carries the plain sample sum
        assert!((spectrum[0].re - 16.0).abs() < 1e-4);
        assert!(spectrum[0].im.abs() < 1e-4);
        for bin in &spectrum[1..] {
            assert!(bin.norm() < 1e-4);
        }
    }

    #[test]
    fn single_tone_peaks_at_its_bin() {
        // 4 cycles over 64 samples: energy in bin 4
        let n = 64usize;
        let signal: Vec<f32> = (0..n)
            .map(|i| (2.0 * std::f32::consts::PI * 4.0 * i as f32 / n as f32).sin())
            .collect();
        let spectrum = fft(&signal);

        let magnitudes: Vec<f32> = spectrum.iter().map(|c| c.norm()).collect();
        let peak_bin = magnitudes
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(i, _)| i);
        assert_eq!(peak_bin, Some(4));
        // sin at an exact bin: magnitude N/2
        assert!((magnitudes[4] - 32.0).abs() < 1e-2);
    }

    #[test]
    fn engine_zero_pads_short_frames() {
        let mut engine = FftEngine::new(32);
        let padded = engine.forward(&[1.0f32; 8]);
        let mut manual = [0.0f32; 32];
        manual[..8].fill(1.0);
        let reference = fft(&manual);
        for (a, b) in padded.iter().zip(&reference) {
            assert!((a.re - b.re).abs() < 1e-5);
            assert!((a.im - b.im).abs() < 1e-5);
        }
    }

    #[test]
    fn engine_reports_bin_count() {
        let engine = FftEngine::new(1024);
        assert_eq!(engine.fft_size(), 1024);
        assert_eq!(engine.num_bins(), 513);
    }
}
