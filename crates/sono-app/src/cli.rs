use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// sonoscope — extraction de caractéristiques acoustiques.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyser un fichier audio (WAV, MP3, FLAC, OGG, AAC).
    Analyze(AnalyzeArgs),
    /// Capturer le micro puis analyser la dernière seconde retenue.
    Listen(ListenArgs),
    /// Lister les périphériques d'entrée disponibles.
    Devices,
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Fichier audio à analyser.
    pub file: PathBuf,

    /// Fichier de configuration TOML.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Longueur de fenêtre en échantillons. Défaut : 1024.
    #[arg(long)]
    pub win_len: Option<usize>,

    /// Pas entre fenêtres en échantillons. Défaut : 512.
    #[arg(long)]
    pub hop_len: Option<usize>,

    /// Taille du transform (complétée par des zéros si > fenêtre).
    #[arg(long)]
    pub fft_size: Option<usize>,

    /// Nombre de bandes mel. Défaut : 26.
    #[arg(long)]
    pub n_mel: Option<usize>,

    /// Nombre de coefficients cepstraux. Défaut : 13.
    #[arg(long)]
    pub n_mfcc: Option<usize>,

    /// Fraction d'énergie pour le rolloff [0, 1]. Défaut : 0.99.
    #[arg(long)]
    pub rolloff_pct: Option<f32>,

    /// Rapport JSON complet (valeurs par trame) sur stdout.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ListenArgs {
    /// Durée d'écoute en secondes (l'anneau retient la dernière seconde).
    #[arg(long, default_value_t = 3)]
    pub secs: u64,

    /// Périphérique d'entrée par nom exact (voir `sonoscope devices`).
    #[arg(long)]
    pub device: Option<String>,

    /// Taux d'échantillonnage demandé en Hz. Défaut : 48000.
    #[arg(long)]
    pub sample_rate: Option<u32>,

    /// Taille du buffer matériel en frames. Défaut : 512.
    #[arg(long)]
    pub frames_per_buffer: Option<u32>,

    /// Fichier de configuration TOML.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Rapport JSON complet sur stdout.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}
