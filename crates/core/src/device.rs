//! Device session on top of the external device manager.

use alloc::{format, string::String};

use crate::{
    color::Color,
    frame::encode_frame,
    lighting::LightingBuffer,
    matrix::{KeyPosition, MatrixDimensions},
    Result,
};

/// Bus name of the device daemon.
pub const DAEMON_SERVICE: &str = "org.razer";
/// Prefix of the device object path, the device identifier is appended to it.
pub const DEVICE_PATH_PREFIX: &str = "/org/razer/device/";
/// Interface providing the custom lighting methods.
pub const LIGHTING_INTERFACE: &str = "razer.device.lighting.chroma";
/// Method which takes the encoded frame as a single byte array argument.
pub const SET_KEY_ROW_METHOD: &str = "setKeyRow";
/// Method which makes the device show the previously uploaded frame.
pub const SET_CUSTOM_METHOD: &str = "setCustom";

/// Returns the daemon object path of the given device.
pub fn device_object_path(device_id: &str) -> String {
    format!("{DEVICE_PATH_PREFIX}{device_id}")
}

/// External device management service.
///
/// Implementations own the actual IPC with the device daemon, device discovery is out of
/// the scope of this trait.
pub trait DeviceManager {
    /// Returns the LED matrix shape of the given device.
    fn device_matrix(&mut self, device_id: &str) -> Result<MatrixDimensions>;
    /// Delivers the encoded frame to the given device.
    fn send_frame(&mut self, device_id: &str, frame: &[u8]) -> Result<()>;
    /// Asks the device to show the last delivered frame.
    ///
    /// Daemons that apply frames immediately don't need to override this method.
    fn activate_custom_frame(&mut self, _device_id: &str) -> Result<()> {
        Ok(())
    }
}

impl<T: ?Sized + DeviceManager> DeviceManager for &mut T {
    fn device_matrix(&mut self, device_id: &str) -> Result<MatrixDimensions> {
        T::device_matrix(self, device_id)
    }

    fn send_frame(&mut self, device_id: &str, frame: &[u8]) -> Result<()> {
        T::send_frame(self, device_id, frame)
    }

    fn activate_custom_frame(&mut self, device_id: &str) -> Result<()> {
        T::activate_custom_frame(self, device_id)
    }
}

/// A single device with its own lighting buffer.
///
/// The session exclusively owns the buffer, so the lighting state of different devices
/// can never alias.
#[derive(Debug)]
pub struct DeviceSession<M> {
    manager: M,
    device_id: String,
    lighting: LightingBuffer,
}

impl<M: DeviceManager> DeviceSession<M> {
    /// Queries the device matrix shape and allocates a blank lighting buffer for it.
    pub fn open(mut manager: M, device_id: impl Into<String>) -> Result<Self> {
        let device_id = device_id.into();
        let dimensions = manager.device_matrix(&device_id)?;
        let lighting = LightingBuffer::new(dimensions)?;

        log::debug!(
            "Opened device {} with {}x{} matrix",
            device_id,
            dimensions.rows(),
            dimensions.cols()
        );
        Ok(Self {
            manager,
            device_id,
            lighting,
        })
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn dimensions(&self) -> MatrixDimensions {
        self.lighting.dimensions()
    }

    pub fn lighting(&self) -> &LightingBuffer {
        &self.lighting
    }

    pub fn lighting_mut(&mut self) -> &mut LightingBuffer {
        &mut self.lighting
    }

    /// Sets the color of the key with the given linear index.
    pub fn set_key_light(&mut self, key: usize, color: Color) -> Result<()> {
        self.lighting.set(key, color)
    }

    /// Sets the color of the key at the given position.
    pub fn set_key_light_at(&mut self, position: KeyPosition, color: Color) -> Result<()> {
        self.lighting.set_at(position, color)
    }

    /// Returns the color of the key with the given linear index.
    pub fn key_light(&self, key: usize) -> Result<Color> {
        self.lighting.get(key)
    }

    /// Sends the current lighting state to the device and starts a new blank frame.
    ///
    /// The buffer is reset only after the frame has been delivered, so a failed draw can be
    /// retried without losing the pending changes.
    pub fn draw(&mut self) -> Result<()> {
        let frame = encode_frame(&self.lighting)?;
        self.manager.send_frame(&self.device_id, &frame)?;
        self.manager.activate_custom_frame(&self.device_id)?;

        log::debug!("Sent {} bytes frame to {}", frame.len(), self.device_id);
        self.lighting.reset();
        Ok(())
    }

    /// Closes the session and returns the device manager back.
    pub fn into_manager(self) -> M {
        self.manager
    }
}
