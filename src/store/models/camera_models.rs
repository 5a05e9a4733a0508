use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Operational status reported for a camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CameraStatus {
    Online,
    Offline,
    Recording,
    Error,
}

/// Camera model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub id: u32,
    pub name: String,
    pub status: CameraStatus,
    pub stream_url: Option<String>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Camera {
    /// Create a camera with the default Offline status
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            status: CameraStatus::Offline,
            stream_url: None,
            note: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_status(mut self, status: CameraStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_stream_url(mut self, url: impl Into<String>) -> Self {
        self.stream_url = Some(url.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Helper struct for a camera flattened out of its room, as shown on the
/// cross-room camera listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraListing {
    pub room_id: u32,
    pub room_name: String,
    pub display_name: String,
    pub camera: Camera,
}

/// One page of the flattened camera listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraPage {
    pub cameras: Vec<CameraListing>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
}
