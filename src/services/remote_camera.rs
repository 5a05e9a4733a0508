use crate::config::RemoteCameraConfig;
use crate::error::Error;
use crate::store::models::CameraStatus;
use anyhow::Result;
use log::info;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fallback shown when the endpoint fails without a usable message
const GENERIC_FAILURE: &str = "Camera creation failed";

/// Request payload for the external camera-creation endpoint
#[derive(Debug, Clone, Serialize)]
pub struct RemoteCreateRequest {
    pub name: String,
    pub status: CameraStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl RemoteCreateRequest {
    /// New cameras are always submitted Offline
    pub fn new(name: impl Into<String>, note: Option<String>) -> Self {
        Self {
            name: name.into(),
            status: CameraStatus::Offline,
            note,
        }
    }
}

/// Camera object as returned by the external endpoint
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteCamera {
    pub id: Option<u32>,
    pub name: String,
    pub status: Option<CameraStatus>,
    pub stream_url: Option<String>,
    pub note: Option<String>,
}

/// The response shapes the endpoint is known to produce, decoded once at
/// the boundary instead of probed for properties at the call sites
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ResponseBody {
    Envelope {
        success: bool,
        result: Option<RemoteCamera>,
        message: Option<String>,
    },
    Camera(RemoteCamera),
}

/// Client for the external camera-creation service. One request per
/// creation intent: no retries, no cancellation, bounded by the configured
/// timeout.
pub struct RemoteCameraClient {
    client: reqwest::Client,
    endpoint: String,
}

impl RemoteCameraClient {
    pub fn new(config: &RemoteCameraConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| Error::Remote(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    /// Create a camera on the remote service. All-or-nothing: on any
    /// failure the caller leaves local state untouched and surfaces the
    /// returned message.
    pub async fn create_camera(&self, request: &RemoteCreateRequest) -> Result<RemoteCamera> {
        info!("Creating camera '{}' via {}", request.name, self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| Error::Remote(format!("Camera creation request failed: {}", e)))?;

        let ok = response.status().is_success();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Remote(format!("Failed to read camera creation response: {}", e)))?;

        Ok(decode_response(ok, &body)?)
    }
}

/// Decode the endpoint's response body. `ok` is whether the HTTP status was
/// 2xx; the body may be an enveloped or bare JSON camera, or plain text.
fn decode_response(ok: bool, body: &str) -> Result<RemoteCamera, Error> {
    match serde_json::from_str::<ResponseBody>(body) {
        Ok(ResponseBody::Envelope {
            success,
            result,
            message,
        }) => {
            if ok && success {
                result.ok_or_else(|| {
                    Error::Remote("Camera service reported success without a result".to_string())
                })
            } else {
                Err(Error::Remote(
                    message.unwrap_or_else(|| GENERIC_FAILURE.to_string()),
                ))
            }
        }
        Ok(ResponseBody::Camera(camera)) if ok => Ok(camera),
        Ok(ResponseBody::Camera(_)) => Err(Error::Remote(GENERIC_FAILURE.to_string())),
        // Plain-text body: on failure it is the operator-facing message
        Err(_) => {
            let text = body.trim();
            if ok {
                Err(Error::Remote(format!(
                    "Unexpected response from camera service: {}",
                    text
                )))
            } else if text.is_empty() {
                Err(Error::Remote(GENERIC_FAILURE.to_string()))
            } else {
                Err(Error::Remote(text.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_enveloped_success() {
        let body = r#"{"success": true, "result": {"id": 9, "name": "CAM 9", "status": "Offline", "streamUrl": "rtsp://cam9.example.com/stream"}}"#;
        let camera = decode_response(true, body).expect("enveloped success");
        assert_eq!(camera.id, Some(9));
        assert_eq!(camera.name, "CAM 9");
        assert_eq!(camera.status, Some(CameraStatus::Offline));
        assert_eq!(
            camera.stream_url.as_deref(),
            Some("rtsp://cam9.example.com/stream")
        );
    }

    #[test]
    fn enveloped_failure_surfaces_the_server_message() {
        let body = r#"{"success": false, "message": "Name taken"}"#;
        let err = decode_response(false, body).unwrap_err();
        assert!(matches!(err, Error::Remote(ref m) if m == "Name taken"));
    }

    #[test]
    fn bare_camera_object_is_accepted_on_2xx() {
        let body = r#"{"name": "CAM 3", "note": "hall camera"}"#;
        let camera = decode_response(true, body).expect("bare camera");
        assert_eq!(camera.id, None);
        assert_eq!(camera.note.as_deref(), Some("hall camera"));
    }

    #[test]
    fn plain_text_failure_becomes_the_message() {
        let err = decode_response(false, "service unavailable").unwrap_err();
        assert!(matches!(err, Error::Remote(ref m) if m == "service unavailable"));
    }

    #[test]
    fn empty_failure_body_falls_back_to_a_generic_message() {
        let err = decode_response(false, "").unwrap_err();
        assert!(matches!(err, Error::Remote(ref m) if m == "Camera creation failed"));
    }

    #[test]
    fn enveloped_failure_on_2xx_still_fails() {
        let body = r#"{"success": false, "message": "Quota exceeded"}"#;
        let err = decode_response(true, body).unwrap_err();
        assert!(matches!(err, Error::Remote(ref m) if m == "Quota exceeded"));
    }

    #[test]
    fn request_serializes_with_offline_status() {
        let request = RemoteCreateRequest::new("CAM 1", None);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["status"], "Offline");
        assert!(json.get("note").is_none());
    }
}
