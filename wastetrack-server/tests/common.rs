#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use axum_test::TestServer;
use wastetrack_config::Config;
use wastetrack_core::database::memory::InMemoryCollectionLogRepository;
use wastetrack_server::{AppState, create_app};

pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub repository: Arc<InMemoryCollectionLogRepository>,
}

pub fn build_test_app(households: &[&str]) -> Result<TestApp> {
    build_test_app_with_config(households, Config::default())
}

pub fn build_test_app_with_config(
    households: &[&str],
    config: Config,
) -> Result<TestApp> {
    let repository = Arc::new(InMemoryCollectionLogRepository::with_households(
        households.iter().copied(),
    ));
    let state = AppState::new(Arc::new(config), repository.clone());
    let server = TestServer::new(create_app(state.clone()))?;

    Ok(TestApp {
        server,
        state,
        repository,
    })
}

/// Build an app whose households already have today's pending rows.
pub async fn build_seeded_app(households: &[&str]) -> Result<TestApp> {
    let app = build_test_app(households)?;
    app.state.seeder().seed().await?;
    Ok(app)
}
