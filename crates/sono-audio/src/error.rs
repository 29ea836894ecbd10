use thiserror::Error;

/// Errors originating from the capture layer.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// `start()` called while a stream is already open.
    #[error("Capture déjà en cours")]
    AlreadyRunning,

    /// No default input device on the host.
    #[error("Aucun périphérique audio d'entrée trouvé")]
    NoInputDevice,

    /// The requested device name matches nothing.
    #[error("Périphérique d'entrée introuvable : {0}")]
    DeviceNotFound(String),

    /// The device cannot deliver the requested format.
    #[error("Format audio non supporté : {0}")]
    UnsupportedFormat(String),

    /// Stream build or start failure.
    #[error("Erreur de stream audio : {0}")]
    StreamError(String),

    /// Host device enumeration failure.
    #[error("Échec d'énumération des périphériques : {0}")]
    DeviceEnumeration(String),
}
