use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use sono_audio::session::CaptureSession;
use sono_core::config::{AnalysisConfig, CaptureConfig, DeviceSelector, SonoConfig, load_config};
use sono_dsp::features::extract_features;

pub mod cli;
pub mod report;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Dispatcher la commande
    match cli.command {
        cli::Commands::Analyze(args) => run_analyze(&args),
        cli::Commands::Listen(args) => run_listen(&args),
        cli::Commands::Devices => run_devices(),
    }
}

/// Décode un fichier et imprime le rapport d'analyse.
fn run_analyze(args: &cli::AnalyzeArgs) -> Result<()> {
    let config = resolve_analysis_config(args)?;
    let (samples, sample_rate) = sono_audio::decode_file(&args.file)?;
    let features = extract_features(&samples, sample_rate, &config);

    if args.json {
        println!("{}", report::to_json(&features)?);
    } else {
        println!("Fichier        : {}", args.file.display());
        report::print_summary(&features);
    }
    Ok(())
}

/// Capture le micro pendant `--secs` puis analyse ce que l'anneau retient.
fn run_listen(args: &cli::ListenArgs) -> Result<()> {
    let (analysis, capture) = resolve_listen_config(args)?;

    let mut session = CaptureSession::new(capture);
    session.start()?;
    println!("Capture en cours ({} s)...", args.secs);
    std::thread::sleep(Duration::from_secs(args.secs));

    // short grace period in case the first hardware buffers are still in flight
    let mut samples = session.drain();
    for _ in 0..10 {
        if !samples.is_empty() {
            break;
        }
        std::thread::sleep(Duration::from_millis(50));
        samples = session.drain();
    }
    session.stop();

    if samples.is_empty() {
        anyhow::bail!("Aucun échantillon capturé — périphérique muet ?");
    }

    let features = extract_features(&samples, session.sample_rate(), &analysis);
    if args.json {
        println!("{}", report::to_json(&features)?);
    } else {
        report::print_summary(&features);
    }
    Ok(())
}

/// Imprime la table des périphériques d'entrée.
fn run_devices() -> Result<()> {
    let devices = sono_audio::list_input_devices()?;
    if devices.is_empty() {
        println!("Aucun périphérique d'entrée détecté.");
        return Ok(());
    }

    println!("Périphériques d'entrée :");
    for info in devices {
        println!(
            "  {} — {} Hz, {} canaux",
            info.name, info.default_sample_rate, info.channels
        );
    }
    Ok(())
}

/// Config d'analyse : TOML si fourni, puis overrides CLI, puis bornage.
fn resolve_analysis_config(args: &cli::AnalyzeArgs) -> Result<AnalysisConfig> {
    let mut config = match args.config {
        Some(ref path) => load_config(path)?.analysis,
        None => AnalysisConfig::default(),
    };

    if let Some(v) = args.win_len {
        config.win_len = v;
    }
    if let Some(v) = args.hop_len {
        config.hop_len = v;
    }
    if let Some(v) = args.fft_size {
        config.fft_size = Some(v);
    }
    if let Some(v) = args.n_mel {
        config.n_mel = v;
    }
    if let Some(v) = args.n_mfcc {
        config.n_mfcc = v;
    }
    if let Some(v) = args.rolloff_pct {
        config.rolloff_pct = v;
    }

    config.clamp_all();
    Ok(config)
}

/// Configs d'analyse + capture pour `listen`, avec overrides CLI.
fn resolve_listen_config(args: &cli::ListenArgs) -> Result<(AnalysisConfig, CaptureConfig)> {
    let config = match args.config {
        Some(ref path) => load_config(path)?,
        None => SonoConfig::default(),
    };
    let mut capture = config.capture;

    if let Some(v) = args.sample_rate {
        capture.sample_rate = v;
    }
    if let Some(v) = args.frames_per_buffer {
        capture.frames_per_buffer = v;
    }
    if let Some(ref name) = args.device {
        capture.device = DeviceSelector::ByName(name.clone());
    }
    capture.clamp_all();

    Ok((config.analysis, capture))
}
