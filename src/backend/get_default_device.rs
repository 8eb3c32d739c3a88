use cpal::{
    Device,
    traits::{DeviceTrait, HostTrait},
};

use crate::recorder::AcquireError;

pub fn get_default_input_device(host: &cpal::Host) -> Result<Device, AcquireError> {
    match host.default_input_device() {
        Some(device) => Ok(device),
        None => {
            tracing::error!("Failed to get default input device");
            Err(AcquireError::DeviceUnavailable(
                "No default input device found".to_string(),
            ))
        }
    }
}

/// Finds an input device whose name matches `name`, ignoring case and
/// surrounding whitespace.
pub fn find_input_device(host: &cpal::Host, name: &str) -> Result<Device, AcquireError> {
    let devices = match host.input_devices() {
        Ok(devices) => devices,
        Err(e) => {
            tracing::error!("Error listing input devices: {:?}", e);
            return Err(AcquireError::DeviceUnavailable(
                "Error listing input devices".to_string(),
            ));
        }
    };

    let wanted = name.trim().to_lowercase();
    for device in devices {
        let device_name = device.name().unwrap_or(String::from("UNKNOWN"));
        tracing::debug!("Found input device: {}", device_name);

        if device_name.trim().to_lowercase() == wanted {
            return Ok(device);
        }
    }

    tracing::error!("Input device '{}' not found", name);
    Err(AcquireError::DeviceUnavailable(format!(
        "Input device '{name}' not found"
    )))
}
