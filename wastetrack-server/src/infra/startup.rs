use anyhow::{Result, anyhow};
use async_trait::async_trait;
use tracing::{error, info, warn};

use wastetrack_core::domain::SeedReport;

use crate::infra::app_state::AppState;

/// Work that has to finish before the listener is bound.
#[async_trait]
pub trait StartupHooks: Send + Sync {
    async fn run(&self, state: &AppState) -> Result<()>;
}

/// Seeds today's pending rows according to the `seeding` config section.
#[derive(Debug, Default)]
pub struct ProdStartupHooks;

#[async_trait]
impl StartupHooks for ProdStartupHooks {
    async fn run(&self, state: &AppState) -> Result<()> {
        run_startup_seeding(state).await.map(|_| ())
    }
}

#[derive(Debug, Default)]
pub struct NoopStartupHooks;

#[async_trait]
impl StartupHooks for NoopStartupHooks {
    async fn run(&self, _state: &AppState) -> Result<()> {
        Ok(())
    }
}

/// Returns `Ok(None)` when seeding is disabled or failed without
/// `fail_fast`; the service keeps serving in both cases.
pub async fn run_startup_seeding(state: &AppState) -> Result<Option<SeedReport>> {
    let seeding = &state.config().seeding;
    if !seeding.on_startup {
        info!("startup seeding disabled");
        return Ok(None);
    }

    match state.seeder().seed().await {
        Ok(report) => Ok(Some(report)),
        Err(err) if seeding.fail_fast => {
            Err(anyhow!("daily seeding failed: {err}"))
        }
        Err(err) => {
            error!(error = %err, "daily seeding failed");
            warn!("today's pending rows may be missing until the next seed run");
            Ok(None)
        }
    }
}
