use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use serde::{Deserialize, Serialize};
use tracing::error;

use wastetrack_core::domain::HouseholdId;

use crate::{
    errors::{AppError, AppResult},
    infra::app_state::AppState,
};

#[derive(Debug, Default, Deserialize)]
pub struct CollectQuery {
    pub houseid: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CollectResponse {
    pub success: bool,
    pub message: String,
}

/// `GET /collect?houseid=<id>`
pub async fn collect_handler(
    State(state): State<AppState>,
    query: Result<Query<CollectQuery>, QueryRejection>,
) -> AppResult<Json<CollectResponse>> {
    let Query(query) = query?;
    let household_id = HouseholdId::parse_optional(query.houseid.as_deref())?;

    let outcome = state
        .collections()
        .mark_collected(&household_id)
        .await
        .map_err(|err| {
            error!(
                household_id = %household_id,
                error = %err,
                "failed to record collection"
            );
            AppError::from(err)
        })?;

    Ok(Json(CollectResponse {
        success: true,
        message: outcome.message(&household_id),
    }))
}
