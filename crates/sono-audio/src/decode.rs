use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Décode un fichier audio en échantillons mono f32 + taux d'échantillonnage.
///
/// WAV, MP3, FLAC, OGG, AAC via symphonia. Les canaux sont repliés en mono
/// par moyenne, la même politique que la capture. Les paquets corrompus sont
/// journalisés puis ignorés ; le signal décodé jusque-là est conservé.
///
/// # Errors
/// Returns an error if the file cannot be opened, probed, or carries no
/// usable audio track.
///
/// # Example
/// ```no_run
/// use sono_audio::decode::decode_file;
/// let (samples, sample_rate) = decode_file("clip.wav").unwrap();
/// assert!(sample_rate > 0);
/// ```
pub fn decode_file(path: impl AsRef<Path>) -> Result<(Vec<f32>, u32)> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Impossible d'ouvrir le fichier audio : {}", path.display()))?;
    let mss = MediaSourceStream::new(
        Box::new(file),
        symphonia::core::io::MediaSourceStreamOptions::default(),
    );

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .context("Format audio non reconnu")?;

    let mut format = probed.format;
    let track = format.default_track().context("Aucune piste audio")?;

    let sample_rate = track
        .codec_params
        .sample_rate
        .context("Taux d'échantillonnage absent du flux")?;
    let channels = track
        .codec_params
        .channels
        .map_or(1, symphonia::core::audio::Channels::count);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .context("Impossible de créer le décodeur")?;

    let track_id = track.id;
    let mut samples: Vec<f32> = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;
    let mut buf_frames: usize = 0;

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(symphonia::core::errors::Error::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => {
                log::warn!("Lecture de paquet interrompue : {e}");
                break;
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(e) => {
                log::warn!("Paquet corrompu ignoré : {e}");
                continue;
            }
        };

        // reallocate the sample buffer only when a packet outgrows it
        let spec = *decoded.spec();
        let num_frames = decoded.capacity();
        if sample_buf.is_none() || num_frames > buf_frames {
            sample_buf = Some(SampleBuffer::<f32>::new(num_frames as u64, spec));
            buf_frames = num_frames;
        }
        let Some(buf) = sample_buf.as_mut() else {
            continue;
        };
        buf.copy_interleaved_ref(decoded);

        for frame in buf.samples().chunks_exact(channels) {
            let mono: f32 = frame.iter().sum::<f32>() / channels as f32;
            samples.push(mono);
        }
    }

    log::info!(
        "Décodé {} échantillons mono @ {sample_rate} Hz depuis {}",
        samples.len(),
        path.display()
    );

    Ok((samples, sample_rate))
}
