use axum::{extract::Extension, Json};
use serde::Serialize;

use crate::domains::citizens::models::{ROLE_ADMIN, ROLE_USER};
use crate::domains::citizens::{Citizen, Standing};
use crate::domains::notifications::Notification;
use crate::kernel::ServerDeps;
use crate::server::app::AppState;
use crate::server::error::ApiResult;
use crate::server::middleware::{AdminUser, AuthUser};

/// Profile for the token's identity, created on first sight
pub async fn current_citizen(user: &AuthUser, deps: &ServerDeps) -> ApiResult<Citizen> {
    let role = if user.is_admin { ROLE_ADMIN } else { ROLE_USER };
    let citizen = Citizen::ensure_exists(
        user.citizen_id,
        &user.email,
        &user.display_name,
        role,
        &deps.db_pool,
    )
    .await?;

    if citizen.total_reports < 0 {
        return Ok(Citizen::recount_total_reports(citizen.id, &deps.db_pool).await?);
    }

    Ok(citizen)
}

#[derive(Serialize)]
pub struct ProfileResponse {
    pub citizen: Citizen,
    pub standing: Standing,
    pub unread_notifications: i64,
}

pub async fn me_handler(
    Extension(state): Extension<AppState>,
    user: AuthUser,
) -> ApiResult<Json<ProfileResponse>> {
    let citizen = current_citizen(&user, &state.deps).await?;
    let unread_notifications = Notification::unread_count(citizen.id, &state.deps.db_pool).await?;

    Ok(Json(ProfileResponse {
        standing: citizen.standing(),
        citizen,
        unread_notifications,
    }))
}

pub async fn recommended_citizens_handler(
    Extension(state): Extension<AppState>,
    _admin: AdminUser,
) -> ApiResult<Json<Vec<Citizen>>> {
    Ok(Json(Citizen::find_recommended(&state.deps.db_pool).await?))
}

#[derive(Serialize)]
pub struct SyncResponse {
    pub updated: u64,
}

pub async fn sync_report_counts_handler(
    Extension(state): Extension<AppState>,
    AdminUser(admin): AdminUser,
) -> ApiResult<Json<SyncResponse>> {
    let updated = Citizen::sync_total_reports(&state.deps.db_pool).await?;
    tracing::info!(admin_id = %admin.citizen_id, updated, "Synced citizen report counts");
    Ok(Json(SyncResponse { updated }))
}
