use std::sync::{Arc, Mutex, PoisonError};

use cpal::traits::{DeviceTrait, StreamTrait};
use sono_core::config::CaptureConfig;

use crate::device::resolve_input_device;
use crate::error::CaptureError;
use crate::ring::SampleRing;

/// Session de capture micro, détenue par l'appelant.
///
/// Cycle de vie explicite : `new` → `start` → (`drain`/`flush`)* → `stop`.
/// Le callback temps réel de l'hôte audio replie chaque frame entrelacée en
/// mono par moyenne des canaux, hors verrou, dans un tampon réutilisé, puis
/// ajoute le bloc au complet à l'anneau ; le mutex n'est tenu que pour cette
/// étape ajout-et-rognage. L'anneau retient au plus une seconde d'audio (les
/// plus anciens échantillons cèdent la place) et le consommateur le vide
/// depuis son propre thread via [`drain`].
///
/// Lâcher la session arrête le flux.
///
/// [`drain`]: CaptureSession::drain
///
/// # Example
/// ```no_run
/// use sono_core::config::CaptureConfig;
/// use sono_audio::session::CaptureSession;
///
/// let mut session = CaptureSession::new(CaptureConfig::default());
/// session.start().unwrap();
/// std::thread::sleep(std::time::Duration::from_secs(1));
/// let samples = session.drain();
/// session.stop();
/// ```
pub struct CaptureSession {
    config: CaptureConfig,
    ring: Arc<Mutex<SampleRing>>,
    stream: Option<cpal::Stream>,
}

impl CaptureSession {
    /// Session au repos ; aucun périphérique n'est touché avant `start`.
    ///
    /// La configuration est bornée via [`CaptureConfig::clamp_all`].
    #[must_use]
    pub fn new(config: CaptureConfig) -> Self {
        let mut config = config;
        config.clamp_all();
        let ring = Arc::new(Mutex::new(SampleRing::for_one_second(config.sample_rate)));
        Self {
            config,
            ring,
            stream: None,
        }
    }

    /// Ouvre le flux d'entrée et démarre la capture.
    ///
    /// # Errors
    /// [`CaptureError::AlreadyRunning`] si un flux est déjà ouvert ;
    /// [`CaptureError::NoInputDevice`] / [`CaptureError::DeviceNotFound`] si
    /// le périphérique configuré n'existe pas ;
    /// [`CaptureError::UnsupportedFormat`] si le périphérique ne fournit pas
    /// le taux demandé en f32 ;
    /// [`CaptureError::StreamError`] si l'ouverture ou le démarrage échoue.
    /// Aucun de ces cas ne termine le processus.
    pub fn start(&mut self) -> Result<(), CaptureError> {
        if self.stream.is_some() {
            return Err(CaptureError::AlreadyRunning);
        }

        let device = resolve_input_device(&self.config.device)?;
        let stream_config = negotiate_stream_config(
            &device,
            self.config.sample_rate,
            self.config.frames_per_buffer,
        )?;
        let channels = stream_config.channels as usize;

        let ring = Arc::clone(&self.ring);
        let mut mono_buf = Vec::with_capacity(self.config.frames_per_buffer as usize);
        let stream = device
            .build_input_stream(
                &stream_config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    // downmix hors verrou : le mutex ne couvre que push_slice
                    downmix_into(&mut mono_buf, data, channels);
                    ring.lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .push_slice(&mono_buf);
                },
                |err| log::error!("Erreur de stream audio : {err}"),
                None,
            )
            .map_err(|e| CaptureError::StreamError(e.to_string()))?;

        stream.play().map_err(|e| CaptureError::StreamError(e.to_string()))?;

        let name = device.name().unwrap_or_else(|_| String::from("<sans nom>"));
        log::info!(
            "Capture démarrée sur {name} : {} Hz, {channels} canaux, buffer {}",
            self.config.sample_rate,
            self.config.frames_per_buffer
        );
        self.stream = Some(stream);
        Ok(())
    }

    /// Prend tout le contenu de l'anneau (plus ancien en premier) et le vide.
    ///
    /// Session au repos ou aucun callback depuis le dernier appel → vecteur
    /// vide, jamais une erreur.
    pub fn drain(&mut self) -> Vec<f32> {
        self.ring
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain()
    }

    /// Jette le contenu de l'anneau sans le retourner.
    pub fn flush(&mut self) {
        self.ring
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Ferme le flux. Sans effet si la capture est déjà arrêtée.
    ///
    /// La fermeture du flux cpal se synchronise avec un éventuel callback en
    /// cours ; l'anneau reste lisible après l'arrêt.
    pub fn stop(&mut self) {
        if let Some(stream) = self.stream.take() {
            drop(stream);
            log::info!("Capture arrêtée");
        }
    }

    /// `true` entre un `start` réussi et le `stop` correspondant.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.stream.is_some()
    }

    /// Taux d'échantillonnage demandé, en Hz.
    #[must_use]
    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate
    }

    /// Configuration effective (après bornage).
    #[must_use]
    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }
}

/// Pick an f32 input config at the requested rate, preferring stereo.
fn negotiate_stream_config(
    device: &cpal::Device,
    sample_rate: u32,
    frames_per_buffer: u32,
) -> Result<cpal::StreamConfig, CaptureError> {
    let ranges = device
        .supported_input_configs()
        .map_err(|e| CaptureError::UnsupportedFormat(e.to_string()))?;

    let mut chosen: Option<cpal::SupportedStreamConfigRange> = None;
    for range in ranges {
        if range.sample_format() != cpal::SampleFormat::F32 {
            continue;
        }
        if sample_rate < range.min_sample_rate().0 || sample_rate > range.max_sample_rate().0 {
            continue;
        }
        if range.channels() == 2 {
            chosen = Some(range);
            break;
        }
        if chosen.is_none() {
            chosen = Some(range);
        }
    }

    let Some(range) = chosen else {
        return Err(CaptureError::UnsupportedFormat(format!(
            "{sample_rate} Hz f32 indisponible sur ce périphérique"
        )));
    };

    Ok(cpal::StreamConfig {
        channels: range.channels(),
        sample_rate: cpal::SampleRate(sample_rate),
        buffer_size: cpal::BufferSize::Fixed(frames_per_buffer),
    })
}

/// Replie un buffer entrelacé en mono par moyenne des canaux, dans `out`.
///
/// `out` est vidé puis reçoit une valeur par frame complète ; une frame
/// finale incomplète est ignorée. `channels == 0` laisse `out` vide.
fn downmix_into(out: &mut Vec<f32>, data: &[f32], channels: usize) {
    out.clear();
    if channels == 0 {
        return;
    }
    out.extend(
        data.chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32),
    );
}
