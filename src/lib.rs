pub mod api;
pub mod config;
pub mod error;
pub mod messaging;
pub mod services;
pub mod store;

// Re-export main components for easier use
pub use error::Error;
pub use messaging::{ChangeNotifier, EventType, StoreEvent};
pub use services::{ProctoringService, RemoteCameraClient};
pub use store::{
    models::{AlertLevel, BehaviorEvent, BehaviorKind, Camera, CameraStatus, Room, RoomStatus},
    ProctoringStore,
};
