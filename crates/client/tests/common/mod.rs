#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use chrono::NaiveDate;
use civic_api::config::ServerConfig;
use civic_api::router::build_app_router;
use civic_api::state::AppState;
use civic_core::project::{LocationType, NewProject, ProjectStatus};
use civic_core::types::LatLng;
use civic_db::MemoryProjectStore;

/// Serve `app` on an ephemeral local port and return its base URL.
pub async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Start the real project API over an in-memory store.
pub async fn spawn_api() -> String {
    let config = ServerConfig {
        host: "127.0.0.1".into(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".into()],
        request_timeout_secs: 30,
        database_url: None,
        db_max_connections: 1,
    };
    let state = AppState::new(Arc::new(MemoryProjectStore::new()), config);
    spawn(build_app_router(state)).await
}

pub fn sample_new(name: &str) -> NewProject {
    NewProject {
        name: name.into(),
        description: "Signal timing upgrade".into(),
        status: ProjectStatus::Planned,
        start_date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2025, 11, 1).unwrap(),
        budget: 320_000.0,
        location_type: LocationType::Point,
        location: LatLng::new(34.1456, -118.1436),
        coordinates: vec![],
        address: "Fair Oaks Ave & Colorado Blvd".into(),
        department: "Transportation".into(),
        tags: vec!["signals".into()],
        color: "#6366F1".into(),
    }
}
