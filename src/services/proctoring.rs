use crate::error::Error;
use crate::messaging::{ChangeNotifier, EventType};
use crate::store::models::{
    AlertLevel, BehaviorEvent, Camera, CameraPage, CameraStatus, Room, RoomStatus, SubjectBehavior,
};
use crate::store::ProctoringStore;
use anyhow::Result;
use log::warn;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::remote_camera::{RemoteCameraClient, RemoteCreateRequest};

/// Longest accepted room or camera display name
const MAX_NAME_LEN: usize = 50;

fn default_capacity() -> u32 {
    80
}

/// Room creation intent as submitted by the dashboard form
#[derive(Debug, Clone, Deserialize)]
pub struct NewRoom {
    pub name: String,
    pub floor: Option<u32>,
    #[serde(default = "default_capacity")]
    pub capacity: u32,
    pub status: Option<RoomStatus>,
    pub note: Option<String>,
}

/// Camera creation intent: a target room plus the camera form fields
#[derive(Debug, Clone, Deserialize)]
pub struct NewCamera {
    pub room_id: u32,
    pub name: String,
    pub note: Option<String>,
}

/// Live-view detail for a single camera: the camera, its room context, and
/// the behavior snapshot the proctoring panel renders
#[derive(Debug, Clone, Serialize)]
pub struct CameraDetail {
    pub room_id: u32,
    pub room_name: String,
    pub camera: Camera,
    pub subject_id: String,
    pub behavior: SubjectBehavior,
    pub alert_level: AlertLevel,
}

/// Behavior snapshot for one subject with its derived alert level
#[derive(Debug, Clone, Serialize)]
pub struct BehaviorReport {
    pub subject_id: String,
    pub count: u32,
    pub alert_level: AlertLevel,
    pub events: Vec<BehaviorEvent>,
}

/// Application service in front of the store: validates every intent before
/// the store is reached (the store itself applies actions unconditionally),
/// allocates ids, and publishes change events after each transition.
pub struct ProctoringService {
    store: Arc<ProctoringStore>,
    notifier: ChangeNotifier,
    remote_cameras: Option<RemoteCameraClient>,
}

impl ProctoringService {
    pub fn new(
        store: Arc<ProctoringStore>,
        notifier: ChangeNotifier,
        remote_cameras: Option<RemoteCameraClient>,
    ) -> Self {
        Self {
            store,
            notifier,
            remote_cameras,
        }
    }

    pub fn store(&self) -> &ProctoringStore {
        &self.store
    }

    // ---- Rooms ----

    pub fn rooms(&self) -> Vec<Room> {
        self.store.rooms()
    }

    /// Distinct floors in use, for the dashboard's per-floor grouping
    pub fn floors(&self) -> Vec<u32> {
        self.store.floors()
    }

    pub fn room(&self, room_id: u32) -> Result<Room> {
        self.store
            .room(room_id)
            .ok_or_else(|| Error::NotFound(format!("Room not found: {}", room_id)).into())
    }

    pub fn create_room(&self, new_room: NewRoom) -> Result<Room> {
        let name = validate_name(&new_room.name, "room")?;

        let id = self.store.next_room_id();
        let mut room = Room::new(id, name)
            .with_capacity(new_room.capacity);
        room.status = new_room.status.unwrap_or(RoomStatus::Active);
        room.floor = new_room.floor;
        room.note = new_room.note;

        self.store.add_room(room.clone());
        self.notify(
            EventType::RoomAdded,
            Some(room.id.to_string()),
            serde_json::json!({ "name": room.name, "floor": room.floor }),
        );

        Ok(room)
    }

    /// Batch delete; unknown ids are skipped. Returns how many rooms were
    /// actually removed.
    pub fn delete_rooms(&self, room_ids: Vec<u32>) -> Result<usize> {
        let deleted = self
            .store
            .rooms()
            .iter()
            .filter(|room| room_ids.contains(&room.id))
            .count();

        self.store.delete_rooms(room_ids.clone());
        self.notify(
            EventType::RoomsDeleted,
            None,
            serde_json::json!({ "room_ids": room_ids, "deleted": deleted }),
        );

        Ok(deleted)
    }

    pub fn suggested_room_name(&self, floor: u32) -> String {
        self.store.suggested_room_name(floor)
    }

    // ---- Cameras ----

    /// Create a camera in the selected room. Goes through the remote
    /// creation endpoint when one is configured; otherwise the camera is
    /// built locally. Any remote failure leaves local state untouched.
    pub async fn create_camera(&self, new_camera: NewCamera) -> Result<Camera> {
        let name = validate_name(&new_camera.name, "camera")?;

        let room = self
            .store
            .room(new_camera.room_id)
            .ok_or_else(|| Error::NotFound("Selected room not found".to_string()))?;

        let camera = match &self.remote_cameras {
            Some(client) => {
                let request = RemoteCreateRequest::new(name, new_camera.note);
                let remote = client.create_camera(&request).await?;

                let id = remote
                    .id
                    .unwrap_or_else(|| self.store.next_camera_id());
                let mut camera = Camera::new(id, remote.name);
                camera.status = remote.status.unwrap_or(CameraStatus::Offline);
                camera.stream_url = remote.stream_url;
                camera.note = remote.note;
                camera
            }
            None => {
                let mut camera = Camera::new(self.store.next_camera_id(), name);
                camera.note = new_camera.note;
                camera
            }
        };

        self.store.add_camera(room.id, camera.clone());
        self.notify(
            EventType::CameraAdded,
            Some(camera.id.to_string()),
            serde_json::json!({ "room_id": room.id, "name": camera.name }),
        );

        Ok(camera)
    }

    /// Batch delete within one room; camera ids that live in other rooms
    /// are untouched. Returns how many cameras were actually removed.
    pub fn delete_cameras(&self, room_id: u32, camera_ids: Vec<u32>) -> Result<usize> {
        let room = self
            .store
            .room(room_id)
            .ok_or_else(|| Error::NotFound(format!("Room not found: {}", room_id)))?;

        let deleted = room
            .cameras
            .iter()
            .filter(|camera| camera_ids.contains(&camera.id))
            .count();

        self.store.delete_cameras(room_id, camera_ids.clone());
        self.notify(
            EventType::CamerasDeleted,
            None,
            serde_json::json!({ "room_id": room_id, "camera_ids": camera_ids, "deleted": deleted }),
        );

        Ok(deleted)
    }

    pub fn set_camera_status(
        &self,
        room_id: u32,
        camera_id: u32,
        status: CameraStatus,
    ) -> Result<Camera> {
        self.store
            .camera(room_id, camera_id)
            .ok_or_else(|| Error::NotFound(format!("Camera not found: {}", camera_id)))?;

        self.store.set_camera_status(room_id, camera_id, status);
        self.notify(
            EventType::CameraStatusChanged,
            Some(camera_id.to_string()),
            serde_json::json!({ "room_id": room_id, "status": status }),
        );

        let (_, camera) = self
            .store
            .camera(room_id, camera_id)
            .ok_or_else(|| Error::NotFound(format!("Camera not found: {}", camera_id)))?;
        Ok(camera)
    }

    pub fn cameras_page(&self, page: usize, per_page: usize) -> CameraPage {
        self.store.cameras_page(page, per_page)
    }

    /// Live-view detail. Behavior is keyed by the camera id rendered as the
    /// subject key, matching what the proctoring panel tracks.
    pub fn camera_detail(&self, room_id: u32, camera_id: u32) -> Result<CameraDetail> {
        let (room, camera) = self
            .store
            .camera(room_id, camera_id)
            .ok_or_else(|| Error::NotFound(format!("Camera not found: {}", camera_id)))?;

        let subject_id = camera.id.to_string();
        let behavior = self.store.behavior(&subject_id);
        let alert_level = AlertLevel::from_count(behavior.count);

        Ok(CameraDetail {
            room_id: room.id,
            room_name: room.name,
            camera,
            subject_id,
            behavior,
            alert_level,
        })
    }

    // ---- Behaviors ----

    pub fn log_suspicious_behavior(
        &self,
        subject_id: &str,
        description: Option<String>,
        evidence_url: Option<String>,
    ) -> Result<BehaviorReport> {
        self.store
            .log_suspicious_behavior(subject_id, description.as_deref(), evidence_url);
        self.notify(
            EventType::SuspiciousBehaviorLogged,
            Some(subject_id.to_string()),
            serde_json::json!({ "description": description }),
        );

        Ok(self.behavior_report(subject_id))
    }

    pub fn record_behavior(&self, subject_id: &str) -> Result<BehaviorReport> {
        self.store.record_behavior(subject_id);
        self.notify(
            EventType::BehaviorRecorded,
            Some(subject_id.to_string()),
            serde_json::Value::Null,
        );

        Ok(self.behavior_report(subject_id))
    }

    pub fn behavior_report(&self, subject_id: &str) -> BehaviorReport {
        let behavior = self.store.behavior(subject_id);
        BehaviorReport {
            subject_id: subject_id.to_string(),
            count: behavior.count,
            alert_level: AlertLevel::from_count(behavior.count),
            events: behavior.events,
        }
    }

    fn notify<T: Serialize>(&self, event_type: EventType, subject_id: Option<String>, payload: T) {
        if let Err(e) = self.notifier.publish(event_type, subject_id, payload) {
            warn!("Failed to publish change event: {}", e);
        }
    }
}

/// Trim and length-check a submitted display name
fn validate_name(name: &str, what: &str) -> Result<String, Error> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation(format!("Please enter a {} name", what)));
    }
    if trimmed.len() > MAX_NAME_LEN {
        return Err(Error::Validation(format!(
            "The {} name must be {} characters or fewer",
            what, MAX_NAME_LEN
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::seed;

    fn service() -> ProctoringService {
        ProctoringService::new(
            Arc::new(ProctoringStore::new()),
            ChangeNotifier::new(16),
            None,
        )
    }

    fn seeded_service() -> ProctoringService {
        ProctoringService::new(
            Arc::new(ProctoringStore::with_state(seed::demo_state())),
            ChangeNotifier::new(16),
            None,
        )
    }

    #[test]
    fn create_room_allocates_sequential_ids() {
        let service = service();

        let first = service
            .create_room(NewRoom {
                name: "Room 101".to_string(),
                floor: Some(1),
                capacity: 80,
                status: None,
                note: None,
            })
            .unwrap();
        let second = service
            .create_room(NewRoom {
                name: "Room 102".to_string(),
                floor: Some(1),
                capacity: 60,
                status: None,
                note: None,
            })
            .unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.status, RoomStatus::Active);
    }

    #[test]
    fn blank_room_name_is_rejected_before_the_store() {
        let service = service();

        let err = service
            .create_room(NewRoom {
                name: "   ".to_string(),
                floor: None,
                capacity: 80,
                status: None,
                note: None,
            })
            .unwrap_err();

        let err = err.downcast::<Error>().unwrap();
        assert!(matches!(err, Error::Validation(ref m) if m == "Please enter a room name"));
        assert!(service.rooms().is_empty());
    }

    #[test]
    fn overlong_name_is_rejected() {
        let service = service();

        let err = service
            .create_room(NewRoom {
                name: "R".repeat(51),
                floor: None,
                capacity: 80,
                status: None,
                note: None,
            })
            .unwrap_err();

        assert!(matches!(
            err.downcast::<Error>().unwrap(),
            Error::Validation(_)
        ));
    }

    #[tokio::test]
    async fn local_camera_creation_defaults_to_offline() {
        let service = seeded_service();

        let camera = service
            .create_camera(NewCamera {
                room_id: 1,
                name: "CAM 101-3".to_string(),
                note: Some("Aisle view".to_string()),
            })
            .await
            .unwrap();

        assert_eq!(camera.id, 9); // seed data tops out at 8
        assert_eq!(camera.status, CameraStatus::Offline);

        let room = service.room(1).unwrap();
        assert_eq!(room.cameras.len(), 3);
    }

    #[tokio::test]
    async fn camera_creation_against_a_missing_room_is_rejected() {
        let service = service();

        let err = service
            .create_camera(NewCamera {
                room_id: 42,
                name: "CAM 1".to_string(),
                note: None,
            })
            .await
            .unwrap_err();

        let err = err.downcast::<Error>().unwrap();
        assert!(matches!(err, Error::NotFound(ref m) if m == "Selected room not found"));
    }

    #[test]
    fn delete_rooms_reports_how_many_existed() {
        let service = seeded_service();
        let deleted = service.delete_rooms(vec![1, 2, 99]).unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(service.rooms().len(), 3);
    }

    #[test]
    fn delete_cameras_requires_the_room_to_exist() {
        let service = service();
        let err = service.delete_cameras(7, vec![1]).unwrap_err();
        assert!(matches!(
            err.downcast::<Error>().unwrap(),
            Error::NotFound(_)
        ));
    }

    #[test]
    fn set_camera_status_round_trips() {
        let service = seeded_service();

        let camera = service
            .set_camera_status(1, 1, CameraStatus::Recording)
            .unwrap();
        assert_eq!(camera.status, CameraStatus::Recording);

        let detail = service.camera_detail(1, 1).unwrap();
        assert_eq!(detail.camera.status, CameraStatus::Recording);
    }

    #[test]
    fn camera_detail_keys_behavior_by_camera_id() {
        let service = seeded_service();

        service
            .log_suspicious_behavior("3", Some("Phone visible".to_string()), None)
            .unwrap();

        let detail = service.camera_detail(2, 3).unwrap();
        assert_eq!(detail.subject_id, "3");
        assert_eq!(detail.behavior.count, 1);
        assert_eq!(detail.alert_level, AlertLevel::Orange);
    }

    #[test]
    fn behavior_report_for_unknown_subject_is_empty() {
        let service = service();
        let report = service.behavior_report("student-999");
        assert_eq!(report.count, 0);
        assert_eq!(report.alert_level, AlertLevel::None);
        assert!(report.events.is_empty());
    }
}
