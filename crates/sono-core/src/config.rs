use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Paramètres d'analyse spectrale et cepstrale.
///
/// Sérialisable en TOML. Chaque champ a une valeur par défaut saine.
///
/// # Example
/// ```
/// use sono_core::config::AnalysisConfig;
/// let config = AnalysisConfig::default();
/// assert_eq!(config.n_mel, 26);
/// assert_eq!(config.n_mfcc, 13);
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct AnalysisConfig {
    /// Longueur de fenêtre du transform court-terme, en échantillons.
    pub win_len: usize,
    /// Pas entre deux fenêtres consécutives, en échantillons.
    pub hop_len: usize,
    /// Taille du transform. `None` = dérivée de `win_len`.
    /// Si supérieure à `win_len`, la fenêtre est complétée par des zéros.
    pub fft_size: Option<usize>,
    /// Nombre de bandes du banc de filtres mel.
    pub n_mel: usize,
    /// Nombre de coefficients cepstraux retenus.
    pub n_mfcc: usize,
    /// Fraction d'énergie pour le seuil de rolloff [0.0, 1.0].
    pub rolloff_pct: f32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            win_len: 1024,
            hop_len: 512,
            fft_size: None,
            n_mel: 26,
            n_mfcc: 13,
            rolloff_pct: 0.99,
        }
    }
}

impl AnalysisConfig {
    /// Transform length actually used: `fft_size` when set, `win_len` otherwise.
    ///
    /// Never smaller than `win_len` (a shorter transform would truncate frames).
    ///
    /// # Example
    /// ```
    /// use sono_core::config::AnalysisConfig;
    /// let mut config = AnalysisConfig::default();
    /// assert_eq!(config.effective_fft_size(), 1024);
    /// config.fft_size = Some(2048);
    /// assert_eq!(config.effective_fft_size(), 2048);
    /// ```
    #[must_use]
    pub fn effective_fft_size(&self) -> usize {
        self.fft_size.unwrap_or(self.win_len).max(self.win_len)
    }

    /// Clamp all numeric fields to their valid ranges.
    /// Called after TOML deserialization to prevent out-of-range values.
    pub fn clamp_all(&mut self) {
        self.win_len = self.win_len.clamp(16, 1 << 16);
        self.hop_len = self.hop_len.max(1);
        if let Some(n) = self.fft_size {
            self.fft_size = Some(n.max(self.win_len));
        }
        self.n_mel = self.n_mel.clamp(2, 128);
        self.n_mfcc = self.n_mfcc.clamp(1, 64);
        self.rolloff_pct = self.rolloff_pct.clamp(0.0, 1.0);
    }
}

/// Sélection du périphérique d'entrée pour la capture.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum DeviceSelector {
    /// Périphérique d'entrée par défaut de l'hôte.
    #[default]
    Default,
    /// Périphérique désigné par son nom exact (voir `sonoscope devices`).
    ByName(String),
}

/// Paramètres de la session de capture micro.
///
/// # Example
/// ```
/// use sono_core::config::CaptureConfig;
/// let config = CaptureConfig::default();
/// assert_eq!(config.sample_rate, 48_000);
/// assert_eq!(config.frames_per_buffer, 512);
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct CaptureConfig {
    /// Taux d'échantillonnage demandé au périphérique, en Hz.
    pub sample_rate: u32,
    /// Taille du buffer matériel, en frames.
    pub frames_per_buffer: u32,
    /// Périphérique d'entrée. `Default` = périphérique par défaut de l'hôte.
    pub device: DeviceSelector,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000,
            frames_per_buffer: 512,
            device: DeviceSelector::Default,
        }
    }
}

impl CaptureConfig {
    /// Clamp numeric fields to hardware-plausible ranges.
    pub fn clamp_all(&mut self) {
        self.sample_rate = self.sample_rate.clamp(8_000, 192_000);
        self.frames_per_buffer = self.frames_per_buffer.clamp(32, 8_192);
    }
}

/// Configuration complète : analyse + capture.
///
/// # Example
/// ```
/// use sono_core::config::SonoConfig;
/// let config = SonoConfig::default();
/// assert_eq!(config.analysis.rolloff_pct, 0.99);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct SonoConfig {
    /// Paramètres du pipeline d'extraction.
    pub analysis: AnalysisConfig,
    /// Paramètres de la session de capture.
    pub capture: CaptureConfig,
}

impl SonoConfig {
    /// Clamp both sections.
    pub fn clamp_all(&mut self) {
        self.analysis.clamp_all();
        self.capture.clamp_all();
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    analysis: Option<AnalysisSection>,
    capture: Option<CaptureSection>,
}

/// Analysis section of the TOML config, all fields optional for partial override.
#[derive(Deserialize)]
struct AnalysisSection {
    win_len: Option<usize>,
    hop_len: Option<usize>,
    fft_size: Option<usize>,
    n_mel: Option<usize>,
    n_mfcc: Option<usize>,
    rolloff_pct: Option<f32>,
}

/// Capture section of the TOML config, all fields optional.
#[derive(Deserialize)]
struct CaptureSection {
    sample_rate: Option<u32>,
    frames_per_buffer: Option<u32>,
    device: Option<String>,
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use sono_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("sonoscope.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<SonoConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;

    let file: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("Erreur de parsing TOML dans {}", path.display()))?;

    let mut config = SonoConfig::default();

    if let Some(a) = file.analysis {
        if let Some(v) = a.win_len {
            config.analysis.win_len = v;
        }
        if let Some(v) = a.hop_len {
            config.analysis.hop_len = v;
        }
        if let Some(v) = a.fft_size {
            config.analysis.fft_size = Some(v);
        }
        if let Some(v) = a.n_mel {
            config.analysis.n_mel = v;
        }
        if let Some(v) = a.n_mfcc {
            config.analysis.n_mfcc = v;
        }
        if let Some(v) = a.rolloff_pct {
            config.analysis.rolloff_pct = v;
        }
    }

    if let Some(c) = file.capture {
        if let Some(v) = c.sample_rate {
            config.capture.sample_rate = v;
        }
        if let Some(v) = c.frames_per_buffer {
            config.capture.frames_per_buffer = v;
        }
        if let Some(v) = c.device {
            config.capture.device = DeviceSelector::ByName(v);
        }
    }

    config.clamp_all();
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_match_reference_values() {
        let config = SonoConfig::default();
        assert_eq!(config.analysis.win_len, 1024);
        assert_eq!(config.analysis.hop_len, 512);
        assert_eq!(config.analysis.fft_size, None);
        assert_eq!(config.analysis.n_mel, 26);
        assert_eq!(config.analysis.n_mfcc, 13);
        assert!((config.analysis.rolloff_pct - 0.99).abs() < f32::EPSILON);
        assert_eq!(config.capture.sample_rate, 48_000);
        assert_eq!(config.capture.frames_per_buffer, 512);
        assert_eq!(config.capture.device, DeviceSelector::Default);
    }

    #[test]
    fn effective_fft_size_never_below_win_len() {
        let mut config = AnalysisConfig {
            fft_size: Some(256),
            ..AnalysisConfig::default()
        };
        assert_eq!(config.effective_fft_size(), 1024);
        config.fft_size = Some(4096);
        assert_eq!(config.effective_fft_size(), 4096);
    }

    #[test]
    fn clamp_repairs_degenerate_values() {
        let mut config = AnalysisConfig {
            win_len: 0,
            hop_len: 0,
            fft_size: Some(1),
            n_mel: 0,
            n_mfcc: 0,
            rolloff_pct: 3.0,
        };
        config.clamp_all();
        assert_eq!(config.win_len, 16);
        assert_eq!(config.hop_len, 1);
        assert_eq!(config.fft_size, Some(16));
        assert_eq!(config.n_mel, 2);
        assert_eq!(config.n_mfcc, 1);
        assert!((config.rolloff_pct - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn load_partial_toml_keeps_defaults_elsewhere() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[analysis]\nwin_len = 2048\n\n[capture]\ndevice = \"USB Audio\"\n"
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.analysis.win_len, 2048);
        // untouched fields fall back to defaults
        assert_eq!(config.analysis.hop_len, 512);
        assert_eq!(config.analysis.n_mel, 26);
        assert_eq!(
            config.capture.device,
            DeviceSelector::ByName("USB Audio".to_string())
        );
        assert_eq!(config.capture.sample_rate, 48_000);
    }

    #[test]
    fn load_clamps_out_of_range_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[analysis]\nrolloff_pct = 42.0\nn_mel = 100000\n").unwrap();

        let config = load_config(file.path()).unwrap();
        assert!((config.analysis.rolloff_pct - 1.0).abs() < f32::EPSILON);
        assert_eq!(config.analysis.n_mel, 128);
    }

    #[test]
    fn load_missing_file_is_an_error() {
        assert!(load_config(Path::new("/nonexistent/sonoscope.toml")).is_err());
    }
}
