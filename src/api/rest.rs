use crate::config::{ApiConfig, DashboardConfig};
use crate::error::Error;
use crate::services::proctoring::{BehaviorReport, CameraDetail, NewCamera, NewRoom};
use crate::services::ProctoringService;
use crate::store::models::{Camera, CameraPage, CameraStatus, Room};
use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Json, Router,
};
use log::info;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<ProctoringService>,
    pub cameras_per_page: usize,
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub message: String,
    pub status: u16,
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Validation(_) => ApiError {
                message: err.to_string(),
                status: StatusCode::BAD_REQUEST.as_u16(),
            },
            Error::NotFound(_) => ApiError {
                message: err.to_string(),
                status: StatusCode::NOT_FOUND.as_u16(),
            },
            Error::AlreadyExists(_) => ApiError {
                message: err.to_string(),
                status: StatusCode::CONFLICT.as_u16(),
            },
            // Remote failures surface the server-provided message verbatim
            Error::Remote(message) => ApiError {
                message,
                status: StatusCode::BAD_GATEWAY.as_u16(),
            },
            Error::Config(_) => ApiError {
                message: err.to_string(),
                status: StatusCode::BAD_REQUEST.as_u16(),
            },
            _ => ApiError {
                message: err.to_string(),
                status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            },
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        if let Some(err) = err.downcast_ref::<Error>() {
            return (*err).clone().into();
        }

        ApiError {
            message: err.to_string(),
            status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
        }
    }
}

/// Implement IntoResponse for ApiError
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = Json(self);
        (status, body).into_response()
    }
}

/// Room list with the distinct floors in use, so the dashboard can group
/// rooms per floor
#[derive(Debug, Serialize)]
pub struct RoomListResponse {
    pub rooms: Vec<Room>,
    pub floors: Vec<u32>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteRoomsRequest {
    pub room_ids: Vec<u32>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteCamerasRequest {
    pub camera_ids: Vec<u32>,
}

#[derive(Debug, Serialize)]
pub struct DeleteSummary {
    pub deleted: usize,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCameraStatusRequest {
    pub status: CameraStatus,
}

#[derive(Debug, Default, Deserialize)]
pub struct LogBehaviorRequest {
    pub description: Option<String>,
    pub evidence_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SuggestNameQuery {
    pub floor: u32,
}

#[derive(Debug, Serialize)]
pub struct SuggestedName {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

pub struct RestApi {
    config: ApiConfig,
    state: AppState,
}

impl RestApi {
    pub fn new(
        config: &ApiConfig,
        dashboard: &DashboardConfig,
        service: Arc<ProctoringService>,
    ) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            state: AppState {
                service,
                cameras_per_page: dashboard.cameras_per_page,
            },
        })
    }

    pub async fn run(&self) -> Result<()> {
        // Create a CORS layer that allows all origins and preflight requests
        use std::time::Duration;
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
            .allow_credentials(false)
            .max_age(Duration::from_secs(3600));

        // Build the API router with routes
        let app = Router::new()
            .route("/api/health", get(health))
            // Room routes
            .route(
                "/api/rooms",
                get(get_rooms).post(create_room).delete(delete_rooms),
            )
            .route("/api/rooms/suggest-name", get(suggest_room_name))
            .route("/api/rooms/:room_id", get(get_room))
            // Camera routes
            .route("/api/cameras", get(get_cameras).post(create_camera))
            .route("/api/rooms/:room_id/cameras", delete(delete_cameras))
            .route(
                "/api/rooms/:room_id/cameras/:camera_id",
                get(get_camera_detail),
            )
            .route(
                "/api/rooms/:room_id/cameras/:camera_id/status",
                put(update_camera_status),
            )
            // Behavior routes
            .route("/api/subjects/:subject_id/behavior", get(get_behavior))
            .route(
                "/api/subjects/:subject_id/behaviors/suspicious",
                post(log_suspicious_behavior),
            )
            .route(
                "/api/subjects/:subject_id/behaviors/recording",
                post(record_behavior),
            )
            .with_state(self.state.clone())
            // Serve the dashboard bundle
            .fallback_service(ServeDir::new(&self.config.static_dir))
            // Apply CORS middleware to all routes
            .layer(cors);

        // Build the server address
        let addr = self.config.address.clone() + ":" + &self.config.port.to_string();
        let addr: SocketAddr = addr.parse()?;

        // Log that we're starting
        info!("API server listening on {}", addr);

        // Create a listener and start the server
        let listener = TcpListener::bind(addr).await?;

        axum::Server::from_tcp(listener.into_std()?)?
            .serve(app.into_make_service())
            .await?;

        Ok(())
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn get_rooms(State(state): State<AppState>) -> ApiResult<Json<RoomListResponse>> {
    let rooms = state.service.rooms();
    let floors = state.service.floors();
    Ok(Json(RoomListResponse { rooms, floors }))
}

async fn create_room(
    State(state): State<AppState>,
    Json(new_room): Json<NewRoom>,
) -> ApiResult<(StatusCode, Json<Room>)> {
    let room = state.service.create_room(new_room)?;
    Ok((StatusCode::CREATED, Json(room)))
}

async fn delete_rooms(
    State(state): State<AppState>,
    Json(request): Json<DeleteRoomsRequest>,
) -> ApiResult<Json<DeleteSummary>> {
    let deleted = state.service.delete_rooms(request.room_ids)?;
    Ok(Json(DeleteSummary { deleted }))
}

async fn suggest_room_name(
    State(state): State<AppState>,
    Query(query): Query<SuggestNameQuery>,
) -> ApiResult<Json<SuggestedName>> {
    let name = state.service.suggested_room_name(query.floor);
    Ok(Json(SuggestedName { name }))
}

async fn get_room(
    State(state): State<AppState>,
    Path(room_id): Path<u32>,
) -> ApiResult<Json<Room>> {
    let room = state.service.room(room_id)?;
    Ok(Json(room))
}

async fn get_cameras(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<CameraPage>> {
    let page = query.page.unwrap_or(1);
    let per_page = query.per_page.unwrap_or(state.cameras_per_page);
    Ok(Json(state.service.cameras_page(page, per_page)))
}

async fn create_camera(
    State(state): State<AppState>,
    Json(new_camera): Json<NewCamera>,
) -> ApiResult<(StatusCode, Json<Camera>)> {
    let camera = state.service.create_camera(new_camera).await?;
    Ok((StatusCode::CREATED, Json(camera)))
}

async fn delete_cameras(
    State(state): State<AppState>,
    Path(room_id): Path<u32>,
    Json(request): Json<DeleteCamerasRequest>,
) -> ApiResult<Json<DeleteSummary>> {
    let deleted = state.service.delete_cameras(room_id, request.camera_ids)?;
    Ok(Json(DeleteSummary { deleted }))
}

async fn get_camera_detail(
    State(state): State<AppState>,
    Path((room_id, camera_id)): Path<(u32, u32)>,
) -> ApiResult<Json<CameraDetail>> {
    let detail = state.service.camera_detail(room_id, camera_id)?;
    Ok(Json(detail))
}

async fn update_camera_status(
    State(state): State<AppState>,
    Path((room_id, camera_id)): Path<(u32, u32)>,
    Json(request): Json<UpdateCameraStatusRequest>,
) -> ApiResult<Json<Camera>> {
    let camera = state
        .service
        .set_camera_status(room_id, camera_id, request.status)?;
    Ok(Json(camera))
}

async fn get_behavior(
    State(state): State<AppState>,
    Path(subject_id): Path<String>,
) -> ApiResult<Json<BehaviorReport>> {
    Ok(Json(state.service.behavior_report(&subject_id)))
}

async fn log_suspicious_behavior(
    State(state): State<AppState>,
    Path(subject_id): Path<String>,
    Json(request): Json<LogBehaviorRequest>,
) -> ApiResult<Json<BehaviorReport>> {
    let report = state.service.log_suspicious_behavior(
        &subject_id,
        request.description,
        request.evidence_url,
    )?;
    Ok(Json(report))
}

async fn record_behavior(
    State(state): State<AppState>,
    Path(subject_id): Path<String>,
) -> ApiResult<Json<BehaviorReport>> {
    let report = state.service.record_behavior(&subject_id)?;
    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_variants_map_to_statuses() {
        let err: ApiError = Error::Validation("Please enter a room name".to_string()).into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST.as_u16());

        let err: ApiError = Error::NotFound("Room not found: 9".to_string()).into();
        assert_eq!(err.status, StatusCode::NOT_FOUND.as_u16());

        let err: ApiError = Error::Remote("Name taken".to_string()).into();
        assert_eq!(err.status, StatusCode::BAD_GATEWAY.as_u16());
        assert_eq!(err.message, "Name taken");

        let err: ApiError = Error::Internal("boom".to_string()).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR.as_u16());
    }

    #[test]
    fn anyhow_wrapped_domain_errors_keep_their_status() {
        let err = anyhow::Error::from(Error::NotFound("Camera not found: 3".to_string()));
        let api_err: ApiError = err.into();
        assert_eq!(api_err.status, StatusCode::NOT_FOUND.as_u16());
    }
}
