use anyhow::Result;
use exam_proctor::api::RestApi;
use exam_proctor::config;
use exam_proctor::messaging::{ChangeNotifier, EventType};
use exam_proctor::services::{ProctoringService, RemoteCameraClient};
use exam_proctor::store::{seed, ProctoringStore};
use log::{info, warn};
use std::path::PathBuf;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();
    info!("Starting Exam Proctoring Dashboard Service");

    // Load configuration
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = config::load_config(config_path.as_deref())?;
    info!("Configuration loaded");

    // Create the state store, seeded with the demo dataset if configured
    let store = if config.dashboard.seed_demo_data {
        Arc::new(ProctoringStore::with_state(seed::demo_state()))
    } else {
        Arc::new(ProctoringStore::new())
    };
    info!("State store initialized with {} rooms", store.rooms().len());

    // Create the change notifier for subscribed dashboard views
    let notifier = ChangeNotifier::new(config.dashboard.event_channel_capacity);

    // Publish system startup event
    if let Err(e) = notifier.publish(
        EventType::SystemStartup,
        None,
        serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "timestamp": chrono::Utc::now().to_rfc3339()
        }),
    ) {
        warn!("Failed to publish system startup event: {}", e);
    }

    // Camera creation goes through the remote endpoint when configured
    let remote_cameras = if config.remote_cameras.enabled {
        info!(
            "Remote camera creation enabled via {}",
            config.remote_cameras.endpoint
        );
        Some(RemoteCameraClient::new(&config.remote_cameras)?)
    } else {
        None
    };

    let service = Arc::new(ProctoringService::new(store, notifier, remote_cameras));

    // Start the REST API and block until shutdown
    let api = RestApi::new(&config.api, &config.dashboard, service)?;
    api.run().await
}
