use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Event types emitted by the dashboard store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EventType {
    // Room events
    RoomAdded,
    RoomsDeleted,

    // Camera events
    CameraAdded,
    CamerasDeleted,
    CameraStatusChanged,

    // Behavior events
    SuspiciousBehaviorLogged,
    BehaviorRecorded,

    // System events
    SystemStartup,
    SystemShutdown,
}

impl Display for EventType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RoomAdded => write!(f, "room.added"),
            Self::RoomsDeleted => write!(f, "room.deleted"),
            Self::CameraAdded => write!(f, "camera.added"),
            Self::CamerasDeleted => write!(f, "camera.deleted"),
            Self::CameraStatusChanged => write!(f, "camera.status_changed"),
            Self::SuspiciousBehaviorLogged => write!(f, "behavior.suspicious_logged"),
            Self::BehaviorRecorded => write!(f, "behavior.recorded"),
            Self::SystemStartup => write!(f, "system.startup"),
            Self::SystemShutdown => write!(f, "system.shutdown"),
        }
    }
}

/// Event message structure delivered to dashboard subscribers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreEvent {
    /// Unique event ID
    pub id: Uuid,
    /// Event type
    pub event_type: EventType,
    /// Subject the event concerns (room id, camera id, or behavior subject)
    pub subject_id: Option<String>,
    /// Event timestamp
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Event data payload
    pub payload: serde_json::Value,
}

impl StoreEvent {
    /// Create a new event message
    pub fn new<T: Serialize>(
        event_type: EventType,
        subject_id: Option<String>,
        payload: T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            id: Uuid::new_v4(),
            event_type,
            subject_id,
            timestamp: chrono::Utc::now(),
            payload: serde_json::to_value(payload)?,
        })
    }

    /// Create a new event message with empty payload
    pub fn new_empty(event_type: EventType, subject_id: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_type,
            subject_id,
            timestamp: chrono::Utc::now(),
            payload: serde_json::Value::Null,
        }
    }

    /// Get the routing key for the event
    pub fn routing_key(&self) -> String {
        match &self.subject_id {
            Some(id) => format!("{}.{}", self.event_type, id),
            None => self.event_type.to_string(),
        }
    }
}
