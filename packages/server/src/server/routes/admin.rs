//! Admin-only incident routes

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::common::IncidentId;
use crate::domains::authorities::actions::{
    authorities_for_incident, dispatch_incident, dispatches_for_incident, DispatchInput,
};
use crate::domains::authorities::{Dispatch, ServiceMatch};
use crate::domains::incidents::actions::{
    incident_stats, list_all, search_incidents, triage_dashboard, triage_queue, update_status,
};
use crate::domains::incidents::data::{IncidentStats, StatusUpdateInput};
use crate::domains::incidents::models::IncidentSearch;
use crate::domains::incidents::triage::{DashboardStats, QueueEntry, QueueFilter};
use crate::domains::incidents::{IncidentData, StatusChange};
use crate::server::app::AppState;
use crate::server::error::ApiResult;
use crate::server::middleware::AdminUser;

pub async fn list_incidents_handler(
    Extension(state): Extension<AppState>,
    _admin: AdminUser,
) -> ApiResult<Json<Vec<IncidentData>>> {
    let incidents = list_all(&state.deps).await?;
    Ok(Json(incidents.into_iter().map(IncidentData::from).collect()))
}

pub async fn queue_handler(
    Extension(state): Extension<AppState>,
    _admin: AdminUser,
    Query(filter): Query<QueueFilter>,
) -> ApiResult<Json<Vec<QueueEntry>>> {
    Ok(Json(triage_queue(&filter, &state.deps).await?))
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub incidents: IncidentStats,
    pub dashboard: DashboardStats,
}

pub async fn stats_handler(
    Extension(state): Extension<AppState>,
    _admin: AdminUser,
) -> ApiResult<Json<StatsResponse>> {
    Ok(Json(StatsResponse {
        incidents: incident_stats(&state.deps).await?,
        dashboard: triage_dashboard(&state.deps).await?,
    }))
}

pub async fn search_handler(
    Extension(state): Extension<AppState>,
    _admin: AdminUser,
    Query(filters): Query<IncidentSearch>,
) -> ApiResult<Json<Vec<IncidentData>>> {
    let incidents = search_incidents(&filters, &state.deps).await?;
    Ok(Json(incidents.into_iter().map(IncidentData::from).collect()))
}

pub async fn update_status_handler(
    Extension(state): Extension<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<IncidentId>,
    Json(input): Json<StatusUpdateInput>,
) -> ApiResult<Json<StatusChange>> {
    let change = update_status(
        id,
        input.status,
        input.notes.as_deref(),
        admin.citizen_id,
        &state.deps,
    )
    .await?;

    Ok(Json(change))
}

pub async fn authorities_handler(
    Extension(state): Extension<AppState>,
    _admin: AdminUser,
    Path(id): Path<IncidentId>,
) -> ApiResult<Json<Vec<ServiceMatch>>> {
    Ok(Json(authorities_for_incident(id, &state.deps).await?))
}

pub async fn dispatch_handler(
    Extension(state): Extension<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<IncidentId>,
    Json(input): Json<DispatchInput>,
) -> ApiResult<(StatusCode, Json<Dispatch>)> {
    let dispatch = dispatch_incident(id, input, admin.citizen_id, &state.deps).await?;
    Ok((StatusCode::CREATED, Json(dispatch)))
}

pub async fn dispatches_handler(
    Extension(state): Extension<AppState>,
    _admin: AdminUser,
    Path(id): Path<IncidentId>,
) -> ApiResult<Json<Vec<Dispatch>>> {
    Ok(Json(dispatches_for_incident(id, &state.deps).await?))
}
