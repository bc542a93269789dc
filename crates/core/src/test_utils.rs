//! Test helpers

use std::collections::HashMap;

use crate::{device::DeviceManager, matrix::MatrixDimensions, Error, Result};

/// In-memory device manager which records every delivered frame.
#[derive(Debug, Default)]
pub struct MemoryDeviceManager {
    devices: HashMap<String, MatrixDimensions>,
    /// Delivered frames in the order of sending.
    pub sent_frames: Vec<(String, Vec<u8>)>,
    /// Number of the custom frame activations.
    pub activations: usize,
    /// Makes every send attempt fail with the transport error.
    pub fail_sends: bool,
}

impl MemoryDeviceManager {
    /// Registers a new device with the given matrix shape.
    #[must_use]
    pub fn with_device(mut self, device_id: &str, dimensions: MatrixDimensions) -> Self {
        self.devices.insert(device_id.to_owned(), dimensions);
        self
    }

    /// Returns the last frame delivered to the given device.
    pub fn last_frame(&self, device_id: &str) -> Option<&[u8]> {
        self.sent_frames
            .iter()
            .rev()
            .find(|(id, _)| id == device_id)
            .map(|(_, frame)| frame.as_slice())
    }
}

impl DeviceManager for MemoryDeviceManager {
    fn device_matrix(&mut self, device_id: &str) -> Result<MatrixDimensions> {
        self.devices
            .get(device_id)
            .copied()
            .ok_or(Error::DeviceNotFound)
    }

    fn send_frame(&mut self, device_id: &str, frame: &[u8]) -> Result<()> {
        if !self.devices.contains_key(device_id) {
            return Err(Error::DeviceNotFound);
        }
        if self.fail_sends {
            return Err(Error::Transport);
        }

        self.sent_frames.push((device_id.to_owned(), frame.to_vec()));
        Ok(())
    }

    fn activate_custom_frame(&mut self, _device_id: &str) -> Result<()> {
        self.activations += 1;
        Ok(())
    }
}
