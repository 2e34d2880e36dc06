use axum::{
    extract::{Path, State},
    response::Json,
};

use super::{ApiError, ApiResult};
use crate::state::AppState;
use tickerpulse_types::{ServiceStatusMap, TrackedService};

/// Cooldown status of every tracked upstream service.
pub async fn get_status(State(state): State<AppState>) -> Json<ServiceStatusMap> {
    Json(state.limits().all_status())
}

/// Administrative clear of one service's cooldown. Returns the fresh snapshot.
pub async fn clear_service_cooldown(
    State(state): State<AppState>,
    Path(service): Path<String>,
) -> ApiResult<Json<ServiceStatusMap>> {
    let service: TrackedService = service.parse().map_err(|e: tickerpulse_types::UnknownService| {
        ApiError::NotFound(e.to_string())
    })?;
    state.limits().record(service).clear_cooldown();
    tracing::info!("[API] Cleared cooldown for {}", service);
    Ok(Json(state.limits().all_status()))
}
