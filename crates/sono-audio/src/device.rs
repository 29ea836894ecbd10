use cpal::traits::{DeviceTrait, HostTrait};
use sono_core::config::DeviceSelector;

use crate::error::CaptureError;

/// Description d'un périphérique d'entrée tel que vu par l'hôte.
#[derive(Clone, Debug)]
pub struct InputDeviceInfo {
    /// Nom exact, utilisable avec `DeviceSelector::ByName`.
    pub name: String,
    /// Taux d'échantillonnage par défaut, en Hz.
    pub default_sample_rate: u32,
    /// Nombre de canaux de la configuration par défaut.
    pub channels: u16,
}

/// Énumère les périphériques d'entrée de l'hôte par défaut.
///
/// Les périphériques sans configuration d'entrée exploitable sont ignorés
/// avec un avertissement plutôt que de faire échouer l'énumération.
///
/// # Errors
/// Returns [`CaptureError::DeviceEnumeration`] if the host cannot list its
/// devices at all.
pub fn list_input_devices() -> Result<Vec<InputDeviceInfo>, CaptureError> {
    let host = cpal::default_host();
    let devices = host
        .input_devices()
        .map_err(|e| CaptureError::DeviceEnumeration(e.to_string()))?;

    let mut infos = Vec::new();
    for device in devices {
        let name = device
            .name()
            .unwrap_or_else(|_| String::from("<sans nom>"));
        match device.default_input_config() {
            Ok(config) => infos.push(InputDeviceInfo {
                name,
                default_sample_rate: config.sample_rate().0,
                channels: config.channels(),
            }),
            Err(e) => log::warn!("Périphérique {name} ignoré : {e}"),
        }
    }
    Ok(infos)
}

/// Résout un sélecteur en périphérique cpal concret.
///
/// # Errors
/// [`CaptureError::NoInputDevice`] when the host has no default input,
/// [`CaptureError::DeviceNotFound`] when a named device matches nothing.
pub fn resolve_input_device(selector: &DeviceSelector) -> Result<cpal::Device, CaptureError> {
    let host = cpal::default_host();
    match selector {
        DeviceSelector::Default => host
            .default_input_device()
            .ok_or(CaptureError::NoInputDevice),
        DeviceSelector::ByName(wanted) => {
            let devices = host
                .input_devices()
                .map_err(|e| CaptureError::DeviceEnumeration(e.to_string()))?;
            for device in devices {
                if device.name().is_ok_and(|name| name == *wanted) {
                    return Ok(device);
                }
            }
            Err(CaptureError::DeviceNotFound(wanted.clone()))
        }
    }
}
