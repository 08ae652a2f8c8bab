//! Test helpers shared by the integration tests.
//!
//! Every helper works inside its own temporary directory holding a part
//! repository, a lock file and a static frontend folder, so tests never
//! touch each other's state.

#![allow(dead_code)]

use std::path::PathBuf;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::util::ServiceExt;

use pdm::config::Config;
use pdm::services::{FileRepository, FileService, LockManager};
use pdm::state::AppState;

/// Sample part files used across tests (name, size in bytes)
pub const SAMPLE_PARTS: &[(&str, usize)] = &[
    ("4200124.mcam", 1234),
    ("4604524.mcam", 987),
    ("4806148.mcam", 2345),
];

/// A temporary workspace for one test
pub struct TestEnv {
    pub dir: TempDir,
}

impl TestEnv {
    /// Workspace seeded with [`SAMPLE_PARTS`]
    pub fn new() -> Self {
        Self::with_parts(SAMPLE_PARTS)
    }

    pub fn with_parts(parts: &[(&str, usize)]) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let env = Self { dir };

        std::fs::create_dir_all(env.repo_path()).unwrap();
        for (name, size) in parts {
            std::fs::write(env.repo_path().join(name), vec![b'G'; *size]).unwrap();
        }

        std::fs::create_dir_all(env.static_path()).unwrap();
        std::fs::write(
            env.static_path().join("index.html"),
            "<!doctype html><html><body>PDM</body></html>",
        )
        .unwrap();

        env
    }

    pub fn repo_path(&self) -> PathBuf {
        self.dir.path().join("repo")
    }

    pub fn locks_path(&self) -> PathBuf {
        self.dir.path().join("locks.json")
    }

    pub fn static_path(&self) -> PathBuf {
        self.dir.path().join("static")
    }

    pub fn file_service(&self) -> FileService {
        let repository = FileRepository::new(self.repo_path()).unwrap();
        let locks = LockManager::new(self.locks_path()).unwrap();
        FileService::new(repository, locks)
    }

    pub fn app_state(&self) -> AppState {
        AppState::new(self.file_service())
    }

    pub fn config(&self) -> Config {
        let mut config = Config::from_env();
        config.repo_path = self.repo_path();
        config.locks_file = self.locks_path();
        config.static_files_dir = self.static_path();
        config
    }

    /// The full application: API, static frontend and middleware
    pub fn app(&self) -> Router {
        pdm::create_app(self.app_state(), &self.config())
    }
}

/// Send a request and return (status, body_string)
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8_lossy(&body).to_string())
}

pub async fn get(app: Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .uri(uri)
        .method("GET")
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> (StatusCode, String) {
    let request = Request::builder()
        .uri(uri)
        .method("POST")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// Serve the app on an ephemeral loopback port and return its base URL
pub async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}
