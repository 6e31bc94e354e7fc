use adam_capture::{Camera, CameraError, CapturedImage, FrameSource, PhotoError};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("camera error: {0}")]
    Camera(#[from] CameraError),
    #[error("encoding error: {0}")]
    Photo(#[from] PhotoError),
    #[error("camera thread exited")]
    ChannelClosed,
}

/// Messages sent from the capture session to the camera thread.
enum EngineRequest {
    Shoot {
        reply: oneshot::Sender<Result<CapturedImage, EngineError>>,
    },
}

/// Clone-safe handle to the camera thread.
#[derive(Clone)]
pub struct EngineHandle {
    tx: mpsc::Sender<EngineRequest>,
}

impl EngineHandle {
    /// Take one still photo, JPEG-encoded as a data URL.
    pub async fn shoot(&self) -> Result<CapturedImage, EngineError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(EngineRequest::Shoot { reply: reply_tx })
            .await
            .map_err(|_| EngineError::ChannelClosed)?;
        reply_rx.await.map_err(|_| EngineError::ChannelClosed)?
    }
}

/// Open the configured V4L2 device and start the camera thread.
pub fn open_camera(
    device: &str,
    max_attempts: usize,
    warmup_frames: usize,
    jpeg_quality: u8,
) -> Result<EngineHandle, EngineError> {
    let camera = Camera::open(device, max_attempts)?;
    tracing::info!(
        device,
        width = camera.width,
        height = camera.height,
        fourcc = ?camera.fourcc,
        "camera opened"
    );
    spawn_engine(camera, warmup_frames, jpeg_quality)
}

/// Run `source` on a dedicated OS thread.
///
/// Discards warmup frames synchronously first, so a camera that cannot
/// stream fails here rather than on the first shot.
pub fn spawn_engine<S: FrameSource + 'static>(
    mut source: S,
    warmup_frames: usize,
    jpeg_quality: u8,
) -> Result<EngineHandle, EngineError> {
    if warmup_frames > 0 {
        tracing::info!(count = warmup_frames, "discarding warmup frames");
        source.discard(warmup_frames)?;
    }

    let (tx, mut rx) = mpsc::channel::<EngineRequest>(4);

    std::thread::Builder::new()
        .name("adam-camera".into())
        .spawn(move || {
            tracing::info!("camera thread started");
            while let Some(req) = rx.blocking_recv() {
                match req {
                    EngineRequest::Shoot { reply } => {
                        let result = shoot(&mut source, jpeg_quality);
                        let _ = reply.send(result);
                    }
                }
            }
            tracing::info!("camera thread exiting");
        })
        .expect("failed to spawn camera thread");

    Ok(EngineHandle { tx })
}

fn shoot<S: FrameSource>(source: &mut S, jpeg_quality: u8) -> Result<CapturedImage, EngineError> {
    let frame = source.capture_still()?;
    tracing::debug!(
        seq = frame.sequence,
        width = frame.width,
        height = frame.height,
        brightness = frame.avg_brightness(),
        "shutter frame captured"
    );
    Ok(CapturedImage::from_frame(&frame, jpeg_quality)?)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use adam_capture::Frame;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Frame source producing a flat grey picture; counts discarded frames.
    pub(crate) struct FakeSource {
        pub discarded: Arc<AtomicUsize>,
        pub fail: bool,
        seq: u32,
    }

    impl FakeSource {
        pub(crate) fn new() -> Self {
            Self {
                discarded: Arc::default(),
                fail: false,
                seq: 0,
            }
        }
    }

    impl FrameSource for FakeSource {
        fn capture_still(&mut self) -> Result<Frame, CameraError> {
            if self.fail {
                return Err(CameraError::TooDark(3));
            }
            self.seq += 1;
            Frame::from_rgb(vec![150; 16 * 16 * 3], 16, 16, self.seq)
                .map_err(|e| CameraError::CaptureFailed(e.to_string()))
        }

        fn discard(&mut self, count: usize) -> Result<(), CameraError> {
            self.discarded.fetch_add(count, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_shoot_returns_jpeg() {
        let source = FakeSource::new();
        let discarded = source.discarded.clone();
        let engine = spawn_engine(source, 4, 85).unwrap();
        assert_eq!(discarded.load(Ordering::SeqCst), 4);

        let image = engine.shoot().await.unwrap();
        assert_eq!(image.mime(), "image/jpeg");

        // A cloned handle talks to the same thread.
        let again = engine.clone().shoot().await.unwrap();
        assert_eq!(again.mime(), "image/jpeg");
    }

    #[tokio::test]
    async fn test_camera_failure_is_reported() {
        let mut source = FakeSource::new();
        source.fail = true;
        let engine = spawn_engine(source, 0, 85).unwrap();
        let err = engine.shoot().await.unwrap_err();
        assert!(matches!(err, EngineError::Camera(CameraError::TooDark(3))));
    }

    #[test]
    fn test_open_missing_device_fails_fast() {
        let err = open_camera("/dev/adam-test-missing", 3, 0, 90).err().unwrap();
        assert!(matches!(err, EngineError::Camera(CameraError::DeviceNotFound(_))));
    }
}
