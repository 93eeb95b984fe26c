//! Test doubles for the camera and classifier seams.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use anyhow::anyhow;
use async_trait::async_trait;
use shared::{domain::PlantResult, error::PredictFailure};

use crate::{
    camera::{CameraConstraints, CameraDevice, FacingMode, MediaStream, ReadyState, VideoFrame},
    predict::{IdentifyError, PlantClassifier},
    upload::SelectedImage,
};

pub(crate) struct FakeStream {
    ready: ReadyState,
    frame: Option<VideoFrame>,
    live_tracks: Arc<AtomicUsize>,
}

impl MediaStream for FakeStream {
    fn ready_state(&self) -> ReadyState {
        self.ready
    }

    fn current_frame(&mut self) -> anyhow::Result<VideoFrame> {
        self.frame.clone().ok_or_else(|| anyhow!("no frame"))
    }

    fn active_track_count(&self) -> usize {
        self.live_tracks.load(Ordering::SeqCst)
    }

    fn stop_all_tracks(&mut self) {
        self.live_tracks.store(0, Ordering::SeqCst);
    }
}

pub(crate) struct FakeCamera {
    pub(crate) ready: ReadyState,
    pub(crate) frame: Option<VideoFrame>,
    pub(crate) live_tracks: Arc<AtomicUsize>,
    pub(crate) deny: bool,
}

impl FakeCamera {
    pub(crate) fn granting(frame: VideoFrame) -> Self {
        Self {
            ready: ReadyState::HaveEnoughData,
            frame: Some(frame),
            live_tracks: Arc::new(AtomicUsize::new(0)),
            deny: false,
        }
    }

    pub(crate) fn live_tracks(&self) -> usize {
        self.live_tracks.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CameraDevice for FakeCamera {
    async fn open(&self, constraints: &CameraConstraints) -> anyhow::Result<Box<dyn MediaStream>> {
        assert_eq!(constraints.facing, FacingMode::Environment);
        if self.deny {
            return Err(anyhow!("NotAllowedError: permission denied"));
        }
        self.live_tracks.store(1, Ordering::SeqCst);
        Ok(Box::new(FakeStream {
            ready: self.ready,
            frame: self.frame.clone(),
            live_tracks: Arc::clone(&self.live_tracks),
        }))
    }
}

pub(crate) fn green_frame(width: u32, height: u32) -> VideoFrame {
    let rgba = [34u8, 139, 34, 255]
        .iter()
        .copied()
        .cycle()
        .take((width * height * 4) as usize)
        .collect();
    VideoFrame {
        width,
        height,
        rgba,
    }
}

#[derive(Debug, Clone)]
pub(crate) enum StubReply {
    Plant(PlantResult),
    Status(u16),
    ServerError(String),
    Unreachable,
}

/// Classifier returning a canned reply and recording every image it receives.
pub(crate) struct StubClassifier {
    reply: StubReply,
    pub(crate) received: Mutex<Vec<SelectedImage>>,
}

impl StubClassifier {
    pub(crate) fn new(reply: StubReply) -> Self {
        Self {
            reply,
            received: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.received.lock().map(|r| r.len()).unwrap_or_default()
    }
}

#[async_trait]
impl PlantClassifier for StubClassifier {
    async fn classify(&self, image: &SelectedImage) -> Result<PlantResult, IdentifyError> {
        if let Ok(mut received) = self.received.lock() {
            received.push(image.clone());
        }
        match &self.reply {
            StubReply::Plant(result) => Ok(result.clone()),
            StubReply::Status(status) => Err(IdentifyError::HttpStatus { status: *status }),
            StubReply::ServerError(message) => {
                Err(IdentifyError::Server(PredictFailure::new(message.clone())))
            }
            StubReply::Unreachable => Err(IdentifyError::Unreachable {
                origin: "http://localhost:8000".into(),
                source: anyhow!("connection refused"),
            }),
        }
    }
}

pub(crate) fn sample_plant() -> PlantResult {
    PlantResult {
        plant_name: "Rosa rubiginosa".into(),
        common_names: vec!["Sweet briar".into(), "Eglantine".into()],
        wiki_url: "https://en.wikipedia.org/wiki/Rosa_rubiginosa".into(),
        description: "A species of rose native to Europe and western Asia.".into(),
        care_tips: vec!["It grows best in full sun".into()],
    }
}
