//! Camera capture seam.
//!
//! Device access is behind [`CameraDevice`] and [`MediaStream`] so the
//! controller can run against any backend (or a test double). An open stream
//! is owned by a [`CameraSession`], which stops every track when dropped.

use std::io::Cursor;

use async_trait::async_trait;
use image::{codecs::jpeg::JpegEncoder, DynamicImage, RgbaImage};
use thiserror::Error;
use tracing::{debug, warn};

pub const CAPTURE_JPEG_QUALITY: u8 = 90;
pub const CAPTURE_MIME_TYPE: &str = "image/jpeg";
const FALLBACK_FRAME_WIDTH: u32 = 640;
const FALLBACK_FRAME_HEIGHT: u32 = 480;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacingMode {
    User,
    Environment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraConstraints {
    pub facing: FacingMode,
    pub ideal_width: u32,
    pub ideal_height: u32,
}

impl Default for CameraConstraints {
    fn default() -> Self {
        Self {
            facing: FacingMode::Environment,
            ideal_width: 1280,
            ideal_height: 720,
        }
    }
}

/// Mirrors the media element ready states; only `HaveEnoughData` can be captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReadyState {
    HaveNothing,
    HaveMetadata,
    HaveCurrentData,
    HaveFutureData,
    HaveEnoughData,
}

/// One RGBA8 video frame. Zero dimensions mean the stream did not report a size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFrame {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

pub trait MediaStream: Send {
    fn ready_state(&self) -> ReadyState;
    fn current_frame(&mut self) -> anyhow::Result<VideoFrame>;
    fn active_track_count(&self) -> usize;
    fn stop_all_tracks(&mut self);
}

#[async_trait]
pub trait CameraDevice: Send + Sync {
    async fn open(&self, constraints: &CameraConstraints) -> anyhow::Result<Box<dyn MediaStream>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CameraError {
    #[error("Unable to access camera. Please check permissions and try again.")]
    AccessDenied,
    #[error("Camera not ready. Please try again.")]
    NotReady,
    #[error("Camera is still loading. Please wait a moment and try again.")]
    StillLoading,
    #[error("Unable to capture photo. Please try again.")]
    DrawFailed,
    #[error("Failed to capture photo. Please try again.")]
    EncodeFailed,
}

pub struct CameraSession {
    stream: Box<dyn MediaStream>,
}

impl CameraSession {
    pub async fn start(
        device: &dyn CameraDevice,
        constraints: &CameraConstraints,
    ) -> Result<Self, CameraError> {
        let stream = device.open(constraints).await.map_err(|source| {
            warn!(source = ?source, "camera access failed");
            CameraError::AccessDenied
        })?;
        debug!(
            tracks = stream.active_track_count(),
            "camera session started"
        );
        Ok(Self { stream })
    }

    pub fn ready_state(&self) -> ReadyState {
        self.stream.ready_state()
    }

    pub fn active_track_count(&self) -> usize {
        self.stream.active_track_count()
    }

    /// Grabs the current frame and encodes it as JPEG.
    pub fn capture_jpeg(&mut self) -> Result<Vec<u8>, CameraError> {
        if self.stream.ready_state() != ReadyState::HaveEnoughData {
            return Err(CameraError::StillLoading);
        }

        let frame = self.stream.current_frame().map_err(|source| {
            warn!(source = ?source, "failed to read camera frame");
            CameraError::DrawFailed
        })?;
        let raster = rasterize(frame)?;
        encode_jpeg(&raster, CAPTURE_JPEG_QUALITY)
    }

    pub fn stop(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.stream.active_track_count() > 0 {
            self.stream.stop_all_tracks();
            debug!("camera tracks stopped");
        }
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        self.release();
    }
}

fn rasterize(frame: VideoFrame) -> Result<RgbaImage, CameraError> {
    let (width, height) = if frame.width == 0 || frame.height == 0 {
        (FALLBACK_FRAME_WIDTH, FALLBACK_FRAME_HEIGHT)
    } else {
        (frame.width, frame.height)
    };

    RgbaImage::from_raw(width, height, frame.rgba).ok_or_else(|| {
        warn!(width, height, "camera frame buffer does not match its dimensions");
        CameraError::DrawFailed
    })
}

fn encode_jpeg(raster: &RgbaImage, quality: u8) -> Result<Vec<u8>, CameraError> {
    // JPEG has no alpha channel.
    let rgb = DynamicImage::ImageRgba8(raster.clone()).to_rgb8();
    let mut out = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut out, quality)
        .encode_image(&rgb)
        .map_err(|source| {
            warn!(source = %source, "jpeg encoding failed");
            CameraError::EncodeFailed
        })?;
    Ok(out.into_inner())
}

#[cfg(test)]
#[path = "tests/camera_tests.rs"]
mod tests;
