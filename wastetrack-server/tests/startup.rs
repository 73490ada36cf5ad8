use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use wastetrack_config::Config;
use wastetrack_core::domain::CollectionStatus;
use wastetrack_server::{
    AppState,
    infra::startup::{NoopStartupHooks, ProdStartupHooks, StartupHooks},
};

mod common;
use common::{build_test_app, build_test_app_with_config};

struct RecordingHooks {
    called: Arc<AtomicBool>,
}

#[async_trait]
impl StartupHooks for RecordingHooks {
    async fn run(&self, _state: &AppState) -> Result<()> {
        self.called.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[tokio::test]
async fn custom_startup_hooks_receive_state() -> Result<()> {
    let app = build_test_app(&["H001"])?;
    let flag = Arc::new(AtomicBool::new(false));
    let hooks = RecordingHooks {
        called: Arc::clone(&flag),
    };

    hooks.run(&app.state).await?;

    assert!(flag.load(Ordering::SeqCst));
    Ok(())
}

#[tokio::test]
async fn noop_hooks_do_not_seed() -> Result<()> {
    let app = build_test_app(&["H001"])?;

    NoopStartupHooks.run(&app.state).await?;

    assert!(app.repository.logs().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn prod_hooks_seed_before_first_scan() -> Result<()> {
    let app = build_test_app(&["H001", "H002"])?;

    ProdStartupHooks.run(&app.state).await?;
    ProdStartupHooks.run(&app.state).await?;

    let logs = app.repository.logs().await;
    assert_eq!(logs.len(), 2, "second run must not duplicate rows");
    assert!(
        logs.iter()
            .all(|log| log.status == CollectionStatus::Pending)
    );

    let response = app
        .server
        .get("/collect")
        .add_query_param("houseid", "H002")
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "Household H002 status updated to 'collected'.");
    Ok(())
}

#[tokio::test]
async fn fail_fast_seeding_aborts_startup() -> Result<()> {
    let mut config = Config::default();
    config.seeding.fail_fast = true;
    let app = build_test_app_with_config(&["H001"], config)?;
    app.repository.set_unavailable(true);

    assert!(ProdStartupHooks.run(&app.state).await.is_err());
    Ok(())
}

#[tokio::test]
async fn configured_collector_name_is_recorded() -> Result<()> {
    let mut config = Config::default();
    config.collection.collector_name = "Truck 7".to_string();
    let app = build_test_app_with_config(&["H001"], config)?;
    ProdStartupHooks.run(&app.state).await?;

    app.server
        .get("/collect")
        .add_query_param("houseid", "H001")
        .await
        .assert_status_ok();

    let logs = app.repository.logs().await;
    assert_eq!(logs[0].collector_name.as_deref(), Some("Truck 7"));
    Ok(())
}
