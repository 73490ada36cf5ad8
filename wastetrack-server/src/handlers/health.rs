use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::infra::app_state::AppState;

pub const DATABASE_UNAVAILABLE: &str = "database unavailable";

pub async fn ping_handler() -> Json<Value> {
    info!("Ping endpoint called");
    Json(json!({
        "status": "ok",
        "message": "Waste collection tracker is running",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Database reachability plus today's pending/collected counts.
pub async fn health_handler(
    State(state): State<AppState>,
) -> (StatusCode, Json<Value>) {
    let today = state.collections().today();
    let mut health_status = json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "collection_day": today.to_string(),
        "utc_offset_minutes": today.offset_minutes(),
        "checks": {}
    });

    let repository = state.repository();
    let database = match repository.ping().await {
        Ok(()) => repository.day_summary(today).await,
        Err(err) => Err(err),
    };

    match database {
        Ok(summary) => {
            health_status["checks"]["database"] = json!({
                "status": "healthy",
                "pending": summary.pending,
                "collected": summary.collected,
                "total": summary.total()
            });
            (StatusCode::OK, Json(health_status))
        }
        Err(err) => {
            warn!(error = %err, "health check failed");
            health_status["status"] = json!("unhealthy");
            health_status["checks"]["database"] = json!({
                "status": "unhealthy",
                "error": DATABASE_UNAVAILABLE
            });
            (StatusCode::SERVICE_UNAVAILABLE, Json(health_status))
        }
    }
}
