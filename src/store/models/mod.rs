pub mod behavior_models;
pub mod camera_models;
pub mod room_models;

pub use behavior_models::{AlertLevel, BehaviorEvent, BehaviorKind, SubjectBehavior};
pub use camera_models::{Camera, CameraListing, CameraPage, CameraStatus};
pub use room_models::{Room, RoomStatus};
