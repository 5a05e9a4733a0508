//! Demo dataset loaded at startup when `dashboard.seed_demo_data` is set.

use std::collections::HashMap;

use super::models::{Camera, CameraStatus, Room, SubjectBehavior};
use super::state::ProctoringState;

/// Suspicious-behavior counts for the demo student roster, in roster order
const STUDENT_COUNTS: [u32; 32] = [
    2, 6, 1, 4, 0, 7, 3, 0, 2, 5, 1, 0, 4, 6, 2, 0, 1, 3, 0, 5, 2, 0, 1, 4, 0, 3, 2, 0, 1, 6, 0, 2,
];

/// Build the demo dashboard state: five annotated rooms across two floors,
/// eight cameras, and the student behavior roster.
pub fn demo_state() -> ProctoringState {
    let rooms = vec![
        Room::new(1, "Room 101")
            .with_floor(1)
            .with_capacity(80)
            .with_note("Main examination hall - capacity 80 students")
            .with_cameras(vec![
                Camera::new(1, "CAM 101-1")
                    .with_status(CameraStatus::Online)
                    .with_stream_url("rtsp://camera1.example.com/stream")
                    .with_note("Front view camera for Room 101"),
                Camera::new(2, "CAM 101-2")
                    .with_status(CameraStatus::Online)
                    .with_stream_url("rtsp://camera2.example.com/stream")
                    .with_note("Back view camera for Room 101"),
            ]),
        Room::new(2, "Room 102")
            .with_floor(1)
            .with_capacity(80)
            .with_note("Secondary examination room")
            .with_cameras(vec![
                Camera::new(3, "CAM 102-1")
                    .with_status(CameraStatus::Recording)
                    .with_stream_url("rtsp://camera3.example.com/stream")
                    .with_note("Primary camera for Room 102"),
                Camera::new(4, "CAM 102-2")
                    .with_status(CameraStatus::Offline)
                    .with_stream_url("rtsp://camera4.example.com/stream")
                    .with_note("Secondary camera for Room 102 - maintenance required"),
            ]),
        Room::new(3, "Room 103")
            .with_floor(1)
            .with_capacity(80)
            .with_note("Computer lab for digital exams")
            .with_cameras(vec![
                Camera::new(5, "CAM 103-1")
                    .with_status(CameraStatus::Online)
                    .with_stream_url("rtsp://camera5.example.com/stream"),
                Camera::new(6, "CAM 103-2")
                    .with_status(CameraStatus::Online)
                    .with_stream_url("rtsp://camera6.example.com/stream"),
            ]),
        Room::new(4, "Room 201")
            .with_floor(2)
            .with_capacity(80)
            .with_note("Upper floor examination room")
            .with_cameras(vec![Camera::new(7, "CAM 201-1")
                .with_status(CameraStatus::Error)
                .with_stream_url("rtsp://camera7.example.com/stream")
                .with_note("Connection issues - needs IT support")]),
        Room::new(5, "Room 202")
            .with_floor(2)
            .with_capacity(80)
            .with_note("Second upper floor examination room")
            .with_cameras(vec![Camera::new(8, "CAM 201-2")
                .with_status(CameraStatus::Online)
                .with_stream_url("rtsp://camera8.example.com/stream")]),
    ];

    let behaviors: HashMap<String, SubjectBehavior> = STUDENT_COUNTS
        .iter()
        .enumerate()
        .map(|(index, &count)| {
            (
                format!("student-{:03}", index + 1),
                SubjectBehavior {
                    count,
                    events: Vec::new(),
                },
            )
        })
        .collect();

    ProctoringState {
        rooms,
        behaviors,
        next_event_id: 1,
    }
}
