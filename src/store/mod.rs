use chrono::Utc;
use std::sync::RwLock;
use tracing::info;

pub mod models;
pub mod seed;
pub mod state;

use models::behavior_models::DEFAULT_SUSPICIOUS_DESCRIPTION;
use models::{AlertLevel, Camera, CameraListing, CameraPage, CameraStatus, Room, SubjectBehavior};

pub use state::{reduce, ProctoringState, StoreAction};

/// Single source of truth for rooms, cameras, and behavior logs for the
/// lifetime of the process. All mutations go through `apply`, which runs
/// one `reduce` transition atomically under the write lock; reads hand out
/// cloned snapshots, never references into the locked state.
pub struct ProctoringStore {
    state: RwLock<ProctoringState>,
}

impl ProctoringStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            state: RwLock::new(ProctoringState::new()),
        }
    }

    /// Create a store over a pre-built state (seed data, tests)
    pub fn with_state(state: ProctoringState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }

    /// Apply a single transition atomically
    pub fn apply(&self, action: StoreAction) {
        let mut state = self.state.write().unwrap();
        *state = reduce(std::mem::take(&mut *state), action);
    }

    // ---- Mutations ----

    /// Append a room. The caller pre-validates and pre-allocates the id.
    pub fn add_room(&self, room: Room) {
        info!("Adding room {} ({})", room.id, room.name);
        self.apply(StoreAction::AddRoom { room });
    }

    /// Remove every room whose id is in the set; unknown ids are no-ops.
    /// Owned cameras are removed with their room.
    pub fn delete_rooms(&self, room_ids: Vec<u32>) {
        info!("Deleting rooms {:?}", room_ids);
        self.apply(StoreAction::DeleteRooms { room_ids });
    }

    /// Append a camera to the named room. Silently a no-op if the room does
    /// not exist; callers must validate existence beforehand.
    pub fn add_camera(&self, room_id: u32, camera: Camera) {
        info!("Adding camera {} ({}) to room {}", camera.id, camera.name, room_id);
        self.apply(StoreAction::AddCamera { room_id, camera });
    }

    /// Remove matching cameras from the named room only
    pub fn delete_cameras(&self, room_id: u32, camera_ids: Vec<u32>) {
        info!("Deleting cameras {:?} from room {}", camera_ids, room_id);
        self.apply(StoreAction::DeleteCameras {
            room_id,
            camera_ids,
        });
    }

    /// Update one camera's operational status in place
    pub fn set_camera_status(&self, room_id: u32, camera_id: u32, status: CameraStatus) {
        info!("Setting camera {} in room {} to {:?}", camera_id, room_id, status);
        self.apply(StoreAction::SetCameraStatus {
            room_id,
            camera_id,
            status,
        });
    }

    /// Increment the subject's count and append a suspicious event with the
    /// given or default description. Creates the record on first use.
    pub fn log_suspicious_behavior(
        &self,
        subject_id: &str,
        description: Option<&str>,
        evidence_url: Option<String>,
    ) {
        let description = match description {
            Some(text) if !text.trim().is_empty() => text.to_string(),
            _ => DEFAULT_SUSPICIOUS_DESCRIPTION.to_string(),
        };

        info!("Logging suspicious behavior for subject {}", subject_id);
        self.apply(StoreAction::LogSuspiciousBehavior {
            subject_id: subject_id.to_string(),
            timestamp: Utc::now(),
            description,
            evidence_url,
        });
    }

    /// Append a recording-initiated event without touching the count.
    /// Creates the record on first use.
    pub fn record_behavior(&self, subject_id: &str) {
        info!("Recording behavior for subject {}", subject_id);
        self.apply(StoreAction::RecordBehavior {
            subject_id: subject_id.to_string(),
            timestamp: Utc::now(),
        });
    }

    // ---- Reads ----

    /// Full state snapshot
    pub fn snapshot(&self) -> ProctoringState {
        self.state.read().unwrap().clone()
    }

    /// All rooms in insertion order
    pub fn rooms(&self) -> Vec<Room> {
        self.state.read().unwrap().rooms.clone()
    }

    /// One room by id
    pub fn room(&self, room_id: u32) -> Option<Room> {
        self.state
            .read()
            .unwrap()
            .rooms
            .iter()
            .find(|room| room.id == room_id)
            .cloned()
    }

    /// One camera with its containing room
    pub fn camera(&self, room_id: u32, camera_id: u32) -> Option<(Room, Camera)> {
        let state = self.state.read().unwrap();
        let room = state.rooms.iter().find(|room| room.id == room_id)?;
        let camera = room.cameras.iter().find(|camera| camera.id == camera_id)?;
        Some((room.clone(), camera.clone()))
    }

    /// Flattened cross-room camera listing, windowed to one page.
    /// Pages are 1-based; an out-of-range page yields an empty window.
    pub fn cameras_page(&self, page: usize, per_page: usize) -> CameraPage {
        let state = self.state.read().unwrap();
        let per_page = per_page.max(1);
        let page = page.max(1);

        let listings: Vec<CameraListing> = state
            .rooms
            .iter()
            .flat_map(|room| {
                room.cameras.iter().map(move |camera| CameraListing {
                    room_id: room.id,
                    room_name: room.name.clone(),
                    display_name: format!("{} - {}", room.name, camera.name),
                    camera: camera.clone(),
                })
            })
            .collect();

        let total = listings.len();
        let total_pages = (total + per_page - 1) / per_page;
        let start = (page - 1) * per_page;
        let cameras = listings
            .into_iter()
            .skip(start)
            .take(per_page)
            .collect();

        CameraPage {
            cameras,
            page,
            per_page,
            total,
            total_pages,
        }
    }

    /// Distinct floors with at least one room, ascending
    pub fn floors(&self) -> Vec<u32> {
        let state = self.state.read().unwrap();
        let mut floors: Vec<u32> = state.rooms.iter().filter_map(|room| room.floor).collect();
        floors.sort_unstable();
        floors.dedup();
        floors
    }

    /// Next free room id, allocated `max(existing) + 1`
    pub fn next_room_id(&self) -> u32 {
        let state = self.state.read().unwrap();
        state.rooms.iter().map(|room| room.id).max().unwrap_or(0) + 1
    }

    /// Next free camera id, allocated `max(existing) + 1` across all rooms
    pub fn next_camera_id(&self) -> u32 {
        let state = self.state.read().unwrap();
        state
            .rooms
            .iter()
            .flat_map(|room| room.cameras.iter().map(|camera| camera.id))
            .max()
            .unwrap_or(0)
            + 1
    }

    /// Next floor-scoped room name following the dashboard's numbering
    /// convention: room numbers on floor N start at N*100 + 1
    pub fn suggested_room_name(&self, floor: u32) -> String {
        let state = self.state.read().unwrap();
        let base = floor * 100;
        let highest = state
            .rooms
            .iter()
            .filter(|room| room.floor == Some(floor))
            .filter_map(|room| room.name.split_whitespace().last()?.parse::<u32>().ok())
            .fold(base, u32::max);
        format!("Room {}", highest + 1)
    }

    /// Behavior record for a subject; empty for unknown subjects
    pub fn behavior(&self, subject_id: &str) -> SubjectBehavior {
        self.state
            .read()
            .unwrap()
            .behaviors
            .get(subject_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Derived alert level; `None` for unknown subjects
    pub fn alert_level(&self, subject_id: &str) -> AlertLevel {
        let count = self
            .state
            .read()
            .unwrap()
            .behaviors
            .get(subject_id)
            .map(|behavior| behavior.count)
            .unwrap_or(0);
        AlertLevel::from_count(count)
    }
}

impl Default for ProctoringStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::models::BehaviorKind;

    #[test]
    fn add_then_delete_room_round_trips() {
        let store = ProctoringStore::with_state(seed::demo_state());
        let before = store.rooms();

        let id = store.next_room_id();
        store.add_room(Room::new(id, "Room 301").with_floor(3).with_capacity(40));
        assert_eq!(store.rooms().len(), before.len() + 1);

        store.delete_rooms(vec![id]);
        assert_eq!(store.rooms(), before);
    }

    #[test]
    fn empty_store_scenario_one_room_one_offline_camera() {
        let store = ProctoringStore::new();

        store.add_room(Room::new(1, "Room 101"));
        store.add_camera(1, Camera::new(1, "CAM 1"));

        let rooms = store.rooms();
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].cameras.len(), 1);
        assert_eq!(rooms[0].cameras[0].status, CameraStatus::Offline);
    }

    #[test]
    fn camera_ids_allocate_globally_across_rooms() {
        let store = ProctoringStore::new();
        store.add_room(Room::new(1, "Room 101"));
        store.add_room(Room::new(2, "Room 102"));

        store.add_camera(1, Camera::new(store.next_camera_id(), "CAM 1"));
        store.add_camera(2, Camera::new(store.next_camera_id(), "CAM 2"));

        assert_eq!(store.next_camera_id(), 3);
        let (_, camera) = store.camera(2, 2).expect("camera in second room");
        assert_eq!(camera.name, "CAM 2");
    }

    #[test]
    fn suggested_room_names_follow_floor_numbering() {
        let store = ProctoringStore::new();
        assert_eq!(store.suggested_room_name(1), "Room 101");

        store.add_room(Room::new(1, "Room 104").with_floor(1));
        assert_eq!(store.suggested_room_name(1), "Room 105");
        assert_eq!(store.suggested_room_name(2), "Room 201");
    }

    #[test]
    fn cameras_page_windows_eight_per_page() {
        let store = ProctoringStore::with_state(seed::demo_state());

        let page = store.cameras_page(1, 8);
        assert_eq!(page.total, 8);
        assert_eq!(page.total_pages, 1);
        assert_eq!(page.cameras.len(), 8);
        assert_eq!(page.cameras[0].display_name, "Room 101 - CAM 101-1");

        let page = store.cameras_page(1, 3);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.cameras.len(), 3);

        let page = store.cameras_page(3, 3);
        assert_eq!(page.cameras.len(), 2);

        let page = store.cameras_page(9, 3);
        assert!(page.cameras.is_empty());
    }

    #[test]
    fn default_and_custom_suspicious_descriptions() {
        let store = ProctoringStore::new();

        store.log_suspicious_behavior("student-001", None, None);
        store.log_suspicious_behavior("student-001", Some("Looking at neighbor"), None);

        let behavior = store.behavior("student-001");
        assert_eq!(behavior.count, 2);
        assert_eq!(behavior.events[0].description, "Suspicious behavior detected");
        assert_eq!(behavior.events[1].description, "Looking at neighbor");
    }

    #[test]
    fn recording_leaves_alert_level_alone() {
        let store = ProctoringStore::new();

        store.record_behavior("cam-2");
        assert_eq!(store.alert_level("cam-2"), AlertLevel::None);

        let behavior = store.behavior("cam-2");
        assert_eq!(behavior.events.len(), 1);
        assert_eq!(behavior.events[0].kind, BehaviorKind::Recording);
    }

    #[test]
    fn alert_level_for_unknown_subject_is_none() {
        let store = ProctoringStore::new();
        assert_eq!(store.alert_level("nobody"), AlertLevel::None);
    }

    #[test]
    fn demo_state_matches_the_dashboard_dataset() {
        let store = ProctoringStore::with_state(seed::demo_state());

        let rooms = store.rooms();
        assert_eq!(rooms.len(), 5);
        assert_eq!(
            rooms.iter().map(|r| r.cameras.len()).sum::<usize>(),
            8
        );
        assert_eq!(store.floors(), vec![1, 2]);

        assert_eq!(store.alert_level("student-001"), AlertLevel::Orange);
        assert_eq!(store.alert_level("student-002"), AlertLevel::Red);
        assert_eq!(store.alert_level("student-005"), AlertLevel::None);
        assert_eq!(store.snapshot().behaviors.len(), 32);
    }
}
