use axum::{
    extract::{Extension, Path},
    Json,
};
use serde::Serialize;

use crate::common::NotificationId;
use crate::domains::notifications::Notification;
use crate::server::app::AppState;
use crate::server::error::{ApiError, ApiResult};
use crate::server::middleware::AuthUser;

#[derive(Serialize)]
pub struct NotificationList {
    pub notifications: Vec<Notification>,
    pub unread_count: i64,
}

pub async fn list_notifications_handler(
    Extension(state): Extension<AppState>,
    user: AuthUser,
) -> ApiResult<Json<NotificationList>> {
    let pool = &state.deps.db_pool;
    let notifications = Notification::find_by_citizen(user.citizen_id, pool).await?;
    let unread_count = Notification::unread_count(user.citizen_id, pool).await?;

    Ok(Json(NotificationList {
        notifications,
        unread_count,
    }))
}

pub async fn mark_read_handler(
    Extension(state): Extension<AppState>,
    user: AuthUser,
    Path(id): Path<NotificationId>,
) -> ApiResult<Json<serde_json::Value>> {
    if !Notification::mark_read(id, user.citizen_id, &state.deps.db_pool).await? {
        return Err(ApiError::NotFound(format!("Notification not found: {}", id)));
    }

    Ok(Json(serde_json::json!({ "id": id, "is_read": true })))
}
