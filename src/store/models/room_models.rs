use super::camera_models::Camera;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of an examination room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Active,
    Inactive,
}

/// Examination room model. Cameras are owned by containment: deleting a
/// room removes its cameras with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: u32,
    pub name: String,
    pub status: RoomStatus,
    pub capacity: u32,
    pub floor: Option<u32>,
    pub note: Option<String>,
    pub cameras: Vec<Camera>,
    pub created_at: DateTime<Utc>,
}

impl Room {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            status: RoomStatus::Active,
            capacity: 0,
            floor: None,
            note: None,
            cameras: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_floor(mut self, floor: u32) -> Self {
        self.floor = Some(floor);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_cameras(mut self, cameras: Vec<Camera>) -> Self {
        self.cameras = cameras;
        self
    }
}
