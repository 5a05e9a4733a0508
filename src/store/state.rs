use chrono::{DateTime, Utc};
use std::collections::HashMap;

use super::models::{
    behavior_models::RECORDING_DESCRIPTION, BehaviorEvent, BehaviorKind, Camera, CameraStatus,
    Room, SubjectBehavior,
};

/// Full dashboard state owned by the store. A plain value: transitions are
/// expressed as `reduce(state, action)` so every mutation is testable in
/// isolation.
#[derive(Debug, Clone, PartialEq)]
pub struct ProctoringState {
    pub rooms: Vec<Room>,
    pub behaviors: HashMap<String, SubjectBehavior>,
    pub next_event_id: u64,
}

impl ProctoringState {
    pub fn new() -> Self {
        Self {
            rooms: Vec::new(),
            behaviors: HashMap::new(),
            next_event_id: 1,
        }
    }
}

impl Default for ProctoringState {
    fn default() -> Self {
        Self::new()
    }
}

/// A single atomic transition against the dashboard state.
///
/// Actions carry their own timestamps so that `reduce` stays deterministic.
/// Invalid input (an unknown room id, an id set with no matches) is a no-op,
/// never an error: rejection is the caller's job.
#[derive(Debug, Clone)]
pub enum StoreAction {
    AddRoom {
        room: Room,
    },
    DeleteRooms {
        room_ids: Vec<u32>,
    },
    AddCamera {
        room_id: u32,
        camera: Camera,
    },
    DeleteCameras {
        room_id: u32,
        camera_ids: Vec<u32>,
    },
    SetCameraStatus {
        room_id: u32,
        camera_id: u32,
        status: CameraStatus,
    },
    LogSuspiciousBehavior {
        subject_id: String,
        timestamp: DateTime<Utc>,
        description: String,
        evidence_url: Option<String>,
    },
    RecordBehavior {
        subject_id: String,
        timestamp: DateTime<Utc>,
    },
}

/// Apply one action to the state, returning the next state.
pub fn reduce(mut state: ProctoringState, action: StoreAction) -> ProctoringState {
    match action {
        StoreAction::AddRoom { room } => {
            state.rooms.push(room);
        }

        StoreAction::DeleteRooms { room_ids } => {
            // Owned cameras go with the room
            state.rooms.retain(|room| !room_ids.contains(&room.id));
        }

        StoreAction::AddCamera { room_id, camera } => {
            if let Some(room) = state.rooms.iter_mut().find(|room| room.id == room_id) {
                room.cameras.push(camera);
            }
        }

        StoreAction::DeleteCameras {
            room_id,
            camera_ids,
        } => {
            if let Some(room) = state.rooms.iter_mut().find(|room| room.id == room_id) {
                room.cameras.retain(|camera| !camera_ids.contains(&camera.id));
            }
        }

        StoreAction::SetCameraStatus {
            room_id,
            camera_id,
            status,
        } => {
            if let Some(room) = state.rooms.iter_mut().find(|room| room.id == room_id) {
                if let Some(camera) = room.cameras.iter_mut().find(|c| c.id == camera_id) {
                    camera.status = status;
                }
            }
        }

        StoreAction::LogSuspiciousBehavior {
            subject_id,
            timestamp,
            description,
            evidence_url,
        } => {
            let event_id = state.next_event_id;
            state.next_event_id += 1;

            let behavior = state.behaviors.entry(subject_id).or_default();
            behavior.count += 1;
            behavior.events.push(BehaviorEvent {
                id: event_id,
                kind: BehaviorKind::Suspicious,
                timestamp,
                description,
                evidence_url,
            });
        }

        StoreAction::RecordBehavior {
            subject_id,
            timestamp,
        } => {
            let event_id = state.next_event_id;
            state.next_event_id += 1;

            // Appends only; the suspicious count is untouched
            let behavior = state.behaviors.entry(subject_id).or_default();
            behavior.events.push(BehaviorEvent {
                id: event_id,
                kind: BehaviorKind::Recording,
                timestamp,
                description: RECORDING_DESCRIPTION.to_string(),
                evidence_url: None,
            });
        }
    }

    state
}
