use axum::{extract::Extension, http::StatusCode, Json};
use serde::Deserialize;

use crate::domains::incidents::actions::{list_for_citizen, preview_analysis, submit_report};
use crate::domains::incidents::{AiAnalysis, IncidentData, ReportForm};
use crate::server::app::AppState;
use crate::server::error::{ApiError, ApiResult};
use crate::server::middleware::AuthUser;
use crate::server::routes::citizens::current_citizen;

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    pub description: String,
}

/// Classify a description without filing a report
pub async fn analyze_handler(
    Extension(state): Extension<AppState>,
    _user: AuthUser,
    Json(body): Json<AnalyzeRequest>,
) -> ApiResult<Json<AiAnalysis>> {
    let description = body.description.trim();
    if description.is_empty() {
        return Err(ApiError::BadRequest("Description must not be empty".to_string()));
    }

    Ok(Json(preview_analysis(description, &state.deps).await?))
}

pub async fn submit_report_handler(
    Extension(state): Extension<AppState>,
    user: AuthUser,
    Json(form): Json<ReportForm>,
) -> ApiResult<(StatusCode, Json<IncidentData>)> {
    let citizen = current_citizen(&user, &state.deps).await?;
    let incident = submit_report(&citizen, form, &state.deps).await?;

    Ok((StatusCode::CREATED, Json(incident.into())))
}

pub async fn my_incidents_handler(
    Extension(state): Extension<AppState>,
    user: AuthUser,
) -> ApiResult<Json<Vec<IncidentData>>> {
    let incidents = list_for_citizen(user.citizen_id, &state.deps).await?;
    Ok(Json(incidents.into_iter().map(IncidentData::from).collect()))
}
