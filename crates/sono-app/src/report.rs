use anyhow::{Context, Result};
use sono_core::features::TrackFeatures;

/// Résumé texte d'un bundle de caractéristiques.
pub fn print_summary(features: &TrackFeatures) {
    println!(
        "Durée          : {:.2} s ({} échantillons @ {} Hz)",
        features.duration_secs, features.num_samples, features.sample_rate
    );
    println!("RMS            : {:.4}", features.rms);
    println!("ZCR            : {:.4}", features.zcr);
    println!("Trames         : {}", features.num_frames);

    if features.num_frames == 0 {
        println!("(signal plus court que la fenêtre d'analyse)");
        return;
    }

    println!("Centroïde moy. : {:.1} Hz", features.centroid_mean());
    println!("Rolloff moy.   : {:.1} Hz", features.rolloff_mean());

    let mfcc_means = features.mfcc_means();
    let rendered: Vec<String> = mfcc_means.iter().map(|c| format!("{c:.2}")).collect();
    println!("MFCC moyens    : [{}]", rendered.join(", "));
}

/// Rapport JSON complet, valeurs par trame incluses.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn to_json(features: &TrackFeatures) -> Result<String> {
    serde_json::to_string_pretty(features).context("Échec de sérialisation du rapport")
}
