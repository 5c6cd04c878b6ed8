use axum::{
    extract::{Extension, Query},
    Json,
};
use serde::Deserialize;

use crate::domains::authorities::{emergency_contacts, EmergencyContact};
use crate::server::app::AppState;

#[derive(Deserialize)]
pub struct ContactsQuery {
    pub region: Option<String>,
}

/// National helplines. Public.
pub async fn emergency_contacts_handler(
    Extension(state): Extension<AppState>,
    Query(query): Query<ContactsQuery>,
) -> Json<&'static [EmergencyContact]> {
    let region = query
        .region
        .unwrap_or_else(|| state.deps.emergency_region.clone());
    Json(emergency_contacts(&region))
}
