//! Capture/upload controller and identification flow.
//!
//! [`IdentifyController`] owns the staged image, the camera session and the
//! [`IdentifyStatus`]. Each user event maps to one `&mut self` method.
//! Identification is split into [`IdentifyController::begin_identify`],
//! [`PendingIdentification::send`] and [`IdentifyController::finish_identify`]
//! so callers can render the `Loading` state while the request is in flight.

use chrono::Utc;
use shared::domain::PlantResult;
use tracing::{debug, info, warn};

use crate::{
    camera::{CameraConstraints, CameraDevice, CameraError, CameraSession, CAPTURE_MIME_TYPE},
    config::ClientSettings,
    predict::{IdentifyError, PlantClassifier},
    status::IdentifyStatus,
    upload::{ImageSource, Preview, SelectedImage},
    validation::{validate_image, UploadPolicy},
};

pub const NO_SELECTION_MESSAGE: &str = "Please select an image first";

#[derive(Debug, Clone)]
pub struct Selection {
    pub image: SelectedImage,
    pub source: ImageSource,
    pub preview: Preview,
}

/// A request that has been started but not yet settled.
#[derive(Debug, Clone)]
pub struct PendingIdentification {
    generation: u64,
    image: SelectedImage,
}

impl PendingIdentification {
    pub fn image(&self) -> &SelectedImage {
        &self.image
    }

    /// Always yields an outcome, so the caller can always settle `Loading`.
    pub async fn send(self, classifier: &dyn PlantClassifier) -> IdentifyOutcome {
        let result = classifier.classify(&self.image).await;
        IdentifyOutcome {
            generation: self.generation,
            result,
        }
    }
}

#[derive(Debug)]
pub struct IdentifyOutcome {
    generation: u64,
    result: Result<PlantResult, IdentifyError>,
}

impl IdentifyOutcome {
    pub fn result(&self) -> &Result<PlantResult, IdentifyError> {
        &self.result
    }
}

pub struct IdentifyController {
    policy: UploadPolicy,
    camera_constraints: CameraConstraints,
    selection: Option<Selection>,
    status: IdentifyStatus,
    camera: Option<CameraSession>,
    drag_over: bool,
    // Bumped whenever the selection changes; replies for older generations are dropped.
    generation: u64,
    // Generation of the request on the wire. Gates submission independently of
    // `status`, which may show an error while the request is still pending.
    in_flight: Option<u64>,
}

impl Default for IdentifyController {
    fn default() -> Self {
        Self::new(UploadPolicy::default())
    }
}

impl IdentifyController {
    pub fn new(policy: UploadPolicy) -> Self {
        Self {
            policy,
            camera_constraints: CameraConstraints::default(),
            selection: None,
            status: IdentifyStatus::Idle,
            camera: None,
            drag_over: false,
            generation: 0,
            in_flight: None,
        }
    }

    pub fn from_settings(settings: &ClientSettings) -> Self {
        Self::new(settings.upload_policy())
    }

    pub fn with_camera_constraints(mut self, constraints: CameraConstraints) -> Self {
        self.camera_constraints = constraints;
        self
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    pub fn status(&self) -> &IdentifyStatus {
        &self.status
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn selected_image(&self) -> Option<&SelectedImage> {
        self.selection.as_ref().map(|s| &s.image)
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.selection.as_ref().map(|s| &s.preview)
    }

    pub fn is_drag_over(&self) -> bool {
        self.drag_over
    }

    pub fn is_camera_active(&self) -> bool {
        self.camera.is_some()
    }

    pub fn camera_track_count(&self) -> usize {
        self.camera
            .as_ref()
            .map(CameraSession::active_track_count)
            .unwrap_or(0)
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn can_identify(&self) -> bool {
        self.selection.is_some() && self.in_flight.is_none()
    }

    /// File-picker change. Returns whether the image became the selection.
    pub fn select_file(&mut self, image: SelectedImage) -> bool {
        self.offer(image, ImageSource::FilePicker)
    }

    pub fn drag_enter(&mut self) {
        self.drag_over = true;
    }

    pub fn drag_leave(&mut self) {
        self.drag_over = false;
    }

    /// Drop event. Non-image payloads are ignored without touching state.
    pub fn drop_file(&mut self, image: SelectedImage) -> bool {
        self.drag_over = false;
        if !image.is_image_type() {
            debug!(mime = %image.mime_type, "ignoring non-image drop");
            return false;
        }
        self.offer(image, ImageSource::DragDrop)
    }

    fn offer(&mut self, image: SelectedImage, source: ImageSource) -> bool {
        if let Err(err) = validate_image(image.size_bytes(), &image.mime_type, &self.policy) {
            warn!(
                %source,
                file_name = %image.file_name,
                mime = %image.mime_type,
                size_bytes = image.size_bytes(),
                "rejected image: {err}"
            );
            self.status = IdentifyStatus::fail(err.to_string());
            return false;
        }

        info!(
            %source,
            file_name = %image.file_name,
            size_bytes = image.size_bytes(),
            "image selected"
        );
        let preview = Preview::from_image(&image);
        self.selection = Some(Selection {
            image,
            source,
            preview,
        });
        self.status = IdentifyStatus::Idle;
        self.drag_over = false;
        self.generation += 1;
        self.in_flight = None;
        self.stop_camera();
        true
    }

    pub async fn start_camera(&mut self, device: &dyn CameraDevice) -> bool {
        self.stop_camera();
        match CameraSession::start(device, &self.camera_constraints).await {
            Ok(session) => {
                self.camera = Some(session);
                if self.status.error().is_some() {
                    self.status = IdentifyStatus::Idle;
                }
                true
            }
            Err(err) => {
                self.status = IdentifyStatus::fail(err.to_string());
                false
            }
        }
    }

    /// Snapshots the live camera into the selection. The camera is released
    /// once a frame is encoded; on a capture failure the session stays open
    /// for another attempt.
    pub fn capture_photo(&mut self) -> bool {
        let Some(session) = self.camera.as_mut() else {
            self.status = IdentifyStatus::fail(CameraError::NotReady.to_string());
            return false;
        };

        let jpeg = match session.capture_jpeg() {
            Ok(jpeg) => jpeg,
            Err(err) => {
                self.status = IdentifyStatus::fail(err.to_string());
                return false;
            }
        };

        let file_name = format!("plant-photo-{}.jpg", Utc::now().timestamp_millis());
        let accepted = self.offer(
            SelectedImage::new(file_name, CAPTURE_MIME_TYPE, jpeg),
            ImageSource::Camera,
        );
        self.stop_camera();
        accepted
    }

    pub fn stop_camera(&mut self) {
        if let Some(session) = self.camera.take() {
            session.stop();
        }
    }

    pub fn clear(&mut self) {
        self.selection = None;
        self.status = IdentifyStatus::Idle;
        self.drag_over = false;
        self.generation += 1;
        self.in_flight = None;
        self.stop_camera();
    }

    /// Moves to `Loading` and hands back the request to send. Returns `None`
    /// without a selection (setting the error) or while a request is in flight.
    pub fn begin_identify(&mut self) -> Option<PendingIdentification> {
        let Some(selection) = self.selection.as_ref() else {
            self.status = IdentifyStatus::fail(NO_SELECTION_MESSAGE);
            return None;
        };
        if self.in_flight.is_some() {
            debug!("identification already in flight");
            return None;
        }

        let pending = PendingIdentification {
            generation: self.generation,
            image: selection.image.clone(),
        };
        self.status = IdentifyStatus::Loading;
        self.in_flight = Some(self.generation);
        Some(pending)
    }

    pub fn finish_identify(&mut self, outcome: IdentifyOutcome) {
        if outcome.generation != self.generation {
            debug!(
                outcome_generation = outcome.generation,
                current_generation = self.generation,
                "discarding identification for a replaced selection"
            );
            return;
        }

        self.in_flight = None;
        self.status = match outcome.result {
            Ok(result) => {
                info!(plant_name = %result.plant_name, "plant identified");
                IdentifyStatus::Succeeded(result)
            }
            Err(err) => IdentifyStatus::fail(err.user_message()),
        };
    }

    pub async fn identify(&mut self, classifier: &dyn PlantClassifier) {
        if let Some(pending) = self.begin_identify() {
            let outcome = pending.send(classifier).await;
            self.finish_identify(outcome);
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
