//! V4L2 camera capture via the `v4l` crate.

use crate::frame::{self, Frame};
use std::io;
use std::path::Path;
use thiserror::Error;
use v4l::buffer::Type as BufType;
use v4l::io::traits::CaptureStream;
use v4l::capability::Capabilities;
use v4l::prelude::*;
use v4l::video::Capture;
use v4l::FourCC;

/// Requested capture size; drivers may negotiate something else.
const REQUESTED_WIDTH: u32 = 1280;
const REQUESTED_HEIGHT: u32 = 720;
const DARK_THRESHOLD: f32 = 0.95;

#[derive(Error, Debug)]
pub enum CameraError {
    #[error("device not found: {0}")]
    DeviceNotFound(String),
    #[error("capture failed: {0}")]
    CaptureFailed(String),
    #[error("device busy")]
    DeviceBusy,
    #[error("format negotiation failed: {0}")]
    FormatNegotiationFailed(String),
    #[error("streaming not supported")]
    StreamingNotSupported,
    #[error("all {0} captured frames were too dark")]
    TooDark(usize),
}

/// Anything that can take a still photo.
pub trait FrameSource: Send {
    /// Capture one usable (non-dark) frame.
    fn capture_still(&mut self) -> Result<Frame, CameraError>;

    /// Throw away `count` frames so exposure can settle.
    fn discard(&mut self, count: usize) -> Result<(), CameraError>;
}

/// Info about a discovered V4L2 device.
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub path: String,
    pub name: String,
    pub driver: String,
    pub bus: String,
}

/// Negotiated pixel format for the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// YUYV 4:2:2 packed (2 bytes/pixel).
    Yuyv,
    /// Motion-JPEG, one JPEG image per buffer.
    Mjpeg,
    /// 8-bit grayscale.
    Grey,
}

impl PixelFormat {
    fn from_fourcc(fourcc: FourCC) -> Option<Self> {
        match &fourcc.repr {
            b"MJPG" => Some(PixelFormat::Mjpeg),
            b"YUYV" => Some(PixelFormat::Yuyv),
            b"GREY" => Some(PixelFormat::Grey),
            _ => None,
        }
    }
}

/// Linux `EBUSY`.
const EBUSY: i32 = 16;

/// Wraps an I/O error from the driver as a capture failure with `what` as context.
fn capture_err(what: &'static str) -> impl FnOnce(io::Error) -> CameraError {
    move |e| CameraError::CaptureFailed(format!("{what}: {e}"))
}

fn format_err(what: &'static str) -> impl FnOnce(io::Error) -> CameraError {
    move |e| CameraError::FormatNegotiationFailed(format!("{what}: {e}"))
}

/// Open `path` and return it with its capabilities if it can capture video.
fn open_capture_device(path: &str) -> Result<(Device, Capabilities), CameraError> {
    let device = Device::with_path(path).map_err(|e| match e.raw_os_error() {
        Some(EBUSY) => CameraError::DeviceBusy,
        _ => CameraError::DeviceNotFound(format!("{path}: {e}")),
    })?;
    let caps = device.query_caps().map_err(capture_err("query capabilities"))?;
    if !caps.capabilities.contains(v4l::capability::Flags::VIDEO_CAPTURE) {
        return Err(CameraError::StreamingNotSupported);
    }
    Ok((device, caps))
}

/// V4L2 camera device handle.
pub struct Camera {
    device: Device,
    pub width: u32,
    pub height: u32,
    pub device_path: String,
    pub fourcc: FourCC,
    pixel_format: PixelFormat,
    max_attempts: usize,
}

impl Camera {
    /// Open a V4L2 camera device by path (e.g., "/dev/video0").
    ///
    /// A still capture gives up after `max_attempts` dark frames.
    pub fn open(device_path: &str, max_attempts: usize) -> Result<Self, CameraError> {
        if !Path::new(device_path).exists() {
            return Err(CameraError::DeviceNotFound(device_path.to_string()));
        }
        let (device, caps) = open_capture_device(device_path)?;
        tracing::info!(device = device_path, driver = %caps.driver, card = %caps.card, "opened camera");

        // MJPG is the only way most webcams reach 720p; YUYV and GREY are
        // accepted if the driver falls back to them.
        let mut wanted = device.format().map_err(format_err("read format"))?;
        wanted.fourcc = FourCC::new(b"MJPG");
        wanted.width = REQUESTED_WIDTH;
        wanted.height = REQUESTED_HEIGHT;
        let negotiated = device.set_format(&wanted).map_err(format_err("set format"))?;

        let pixel_format = PixelFormat::from_fourcc(negotiated.fourcc).ok_or_else(|| {
            CameraError::FormatNegotiationFailed(format!(
                "driver offered {:?}; only MJPG, YUYV and GREY are handled",
                negotiated.fourcc
            ))
        })?;
        tracing::info!(
            width = negotiated.width,
            height = negotiated.height,
            format = ?pixel_format,
            "negotiated format"
        );

        Ok(Self {
            device,
            width: negotiated.width,
            height: negotiated.height,
            device_path: device_path.to_string(),
            fourcc: negotiated.fourcc,
            pixel_format,
            max_attempts: max_attempts.max(1),
        })
    }

    /// Decode one driver buffer into packed RGB plus its dimensions.
    fn buf_to_rgb(&self, buf: &[u8]) -> Result<(Vec<u8>, u32, u32), CameraError> {
        let converted = match self.pixel_format {
            PixelFormat::Mjpeg => {
                let decoded = image::load_from_memory_with_format(buf, image::ImageFormat::Jpeg)
                    .map_err(|e| CameraError::CaptureFailed(format!("MJPG decode: {e}")))?
                    .to_rgb8();
                let (w, h) = decoded.dimensions();
                return Ok((decoded.into_raw(), w, h));
            }
            PixelFormat::Yuyv => frame::yuyv_to_rgb(buf, self.width, self.height),
            PixelFormat::Grey => frame::grey_to_rgb(buf, self.width, self.height),
        };
        converted
            .map(|rgb| (rgb, self.width, self.height))
            .map_err(|e| CameraError::CaptureFailed(format!("{:?} conversion: {e}", self.pixel_format)))
    }

    fn stream(&self) -> Result<MmapStream<'_>, CameraError> {
        MmapStream::with_buffers(&self.device, BufType::VideoCapture, 4).map_err(capture_err("create mmap stream"))
    }

    /// Capture-capable devices among `/dev/video0` to `/dev/video15`.
    pub fn list_devices() -> Vec<DeviceInfo> {
        (0..16)
            .map(|i| format!("/dev/video{i}"))
            .filter(|path| Path::new(path).exists())
            .filter_map(|path| {
                let (_, caps) = open_capture_device(&path).ok()?;
                Some(DeviceInfo {
                    path,
                    name: caps.card,
                    driver: caps.driver,
                    bus: caps.bus,
                })
            })
            .collect()
    }
}

impl FrameSource for Camera {
    /// Attempts up to `max_attempts` raw captures and returns the first
    /// frame that is not dark.
    fn capture_still(&mut self) -> Result<Frame, CameraError> {
        let mut stream = self.stream()?;
        for _ in 0..self.max_attempts {
            let (buf, meta) = stream.next().map_err(capture_err("dequeue buffer"))?;

            // MJPG buffers are larger than the image they carry.
            let used = (meta.bytesused as usize).min(buf.len());
            let payload = if used > 0 { &buf[..used] } else { buf };
            let (rgb, width, height) = self.buf_to_rgb(payload)?;

            if frame::is_dark_frame(&rgb, DARK_THRESHOLD) {
                tracing::debug!(seq = meta.sequence, "skipping dark frame");
                continue;
            }
            return Frame::from_rgb(rgb, width, height, meta.sequence)
                .map_err(|e| CameraError::CaptureFailed(e.to_string()));
        }
        Err(CameraError::TooDark(self.max_attempts))
    }

    fn discard(&mut self, count: usize) -> Result<(), CameraError> {
        if count == 0 {
            return Ok(());
        }
        let mut stream = self.stream()?;
        for _ in 0..count {
            stream.next().map_err(capture_err("dequeue buffer"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_format_from_fourcc() {
        assert_eq!(PixelFormat::from_fourcc(FourCC::new(b"MJPG")), Some(PixelFormat::Mjpeg));
        assert_eq!(PixelFormat::from_fourcc(FourCC::new(b"YUYV")), Some(PixelFormat::Yuyv));
        assert_eq!(PixelFormat::from_fourcc(FourCC::new(b"GREY")), Some(PixelFormat::Grey));
        assert_eq!(PixelFormat::from_fourcc(FourCC::new(b"H264")), None);
    }

    #[test]
    fn test_open_missing_device() {
        assert!(matches!(
            Camera::open("/dev/adam-no-such-camera", 3),
            Err(CameraError::DeviceNotFound(_))
        ));
    }

    #[test]
    fn test_driver_errors_keep_context() {
        let err = capture_err("dequeue buffer")(io::Error::from_raw_os_error(5));
        assert!(err.to_string().starts_with("capture failed: dequeue buffer: "));
        let err = format_err("set format")(io::Error::from_raw_os_error(22));
        assert!(matches!(err, CameraError::FormatNegotiationFailed(m) if m.starts_with("set format: ")));
    }
}
