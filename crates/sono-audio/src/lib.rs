// Audio I/O for sonoscope: capture session, device plumbing, file decode.

pub mod decode;
pub mod device;
pub mod error;
pub mod ring;
pub mod session;

pub use decode::decode_file;
pub use device::{InputDeviceInfo, list_input_devices, resolve_input_device};
pub use error::CaptureError;
pub use ring::SampleRing;
pub use session::CaptureSession;
