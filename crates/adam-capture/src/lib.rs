//! adam-capture — Acquisition of the front and side photos.
//!
//! Provides the capture wizard state machine, the shutter countdown,
//! data-URL encoding of captured images, and V4L2-based camera access.

pub mod camera;
pub mod countdown;
pub mod frame;
pub mod photo;
pub mod wizard;

pub use camera::{Camera, CameraError, DeviceInfo, FrameSource, PixelFormat};
pub use countdown::Countdown;
pub use frame::Frame;
pub use photo::{CapturedImage, PhotoError};
pub use wizard::{CapturePair, CaptureWizard, Step, View, WizardError};
