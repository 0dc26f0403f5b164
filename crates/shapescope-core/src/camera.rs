use crate::frame::{frame_from_rgb, mirror, Frame, FrameError};
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
use nokhwa::{Camera, NokhwaError};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("could not open camera {index}: {source}")]
    Open {
        index: u32,
        #[source]
        source: NokhwaError,
    },

    #[error("camera read failed: {0}")]
    Read(#[source] NokhwaError),

    #[error("could not decode camera frame: {0}")]
    Decode(#[source] NokhwaError),

    #[error("could not load image: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error("frame source already released")]
    Released,
}

/// Produces one color frame per call until the stream ends.
pub trait FrameSource {
    fn next_frame(&mut self) -> Result<Frame, SourceError>;

    /// Frees the underlying device. Calling it again does nothing.
    fn release(&mut self);
}

pub struct CameraSource {
    camera: Option<Camera>,
    mirror: bool,
}

impl CameraSource {
    pub fn open(device_id: u32, mirror: bool) -> Result<Self, SourceError> {
        let index = CameraIndex::Index(device_id);
        let format_type = RequestedFormatType::AbsoluteHighestFrameRate;
        let requested = RequestedFormat::new::<RgbFormat>(format_type);

        let open_err = |source| SourceError::Open {
            index: device_id,
            source,
        };
        let mut camera = Camera::new(index, requested).map_err(open_err)?;
        camera.open_stream().map_err(open_err)?;

        let format = camera.camera_format();
        tracing::info!(
            device_id,
            width = format.width(),
            height = format.height(),
            fps = format.frame_rate(),
            "camera stream open"
        );

        Ok(Self {
            camera: Some(camera),
            mirror,
        })
    }
}

impl FrameSource for CameraSource {
    fn next_frame(&mut self) -> Result<Frame, SourceError> {
        let camera = self.camera.as_mut().ok_or(SourceError::Released)?;
        let buffer = camera.frame().map_err(SourceError::Read)?;
        let decoded = buffer
            .decode_image::<RgbFormat>()
            .map_err(SourceError::Decode)?;

        let frame = frame_from_rgb(decoded.width(), decoded.height(), decoded.as_raw())?;
        Ok(if self.mirror {
            mirror(frame.view())
        } else {
            frame
        })
    }

    fn release(&mut self) {
        if let Some(mut camera) = self.camera.take() {
            if let Err(e) = camera.stop_stream() {
                tracing::warn!(error = %e, "camera did not stop cleanly");
            }
            tracing::info!("camera released");
        }
    }
}

impl Drop for CameraSource {
    fn drop(&mut self) {
        self.release();
    }
}

/// Replays a single image, for tuning thresholds without a camera.
pub struct StillImageSource {
    frame: Option<Frame>,
}

impl StillImageSource {
    pub fn open<P: AsRef<Path>>(path: P, mirror_frames: bool) -> Result<Self, SourceError> {
        let rgb = image::open(path.as_ref())?.to_rgb8();
        let frame = frame_from_rgb(rgb.width(), rgb.height(), rgb.as_raw())?;
        tracing::info!(
            path = %path.as_ref().display(),
            width = rgb.width(),
            height = rgb.height(),
            "still image loaded"
        );
        Ok(Self::from_frame(frame, mirror_frames))
    }

    pub fn from_frame(frame: Frame, mirror_frames: bool) -> Self {
        let frame = if mirror_frames {
            mirror(frame.view())
        } else {
            frame
        };
        Self { frame: Some(frame) }
    }
}

impl FrameSource for StillImageSource {
    fn next_frame(&mut self) -> Result<Frame, SourceError> {
        self.frame.clone().ok_or(SourceError::Released)
    }

    fn release(&mut self) {
        self.frame = None;
    }
}
