//! Test fixtures for creating test data.
//!
//! These fixtures use the model methods directly to create test data.

use anyhow::Result;
use server_core::common::CitizenId;
use server_core::domains::citizens::models::ROLE_USER;
use server_core::domains::citizens::standing::badge_for_score;
use server_core::domains::citizens::Citizen;
use server_core::domains::incidents::data::{AnalysisInput, ReportForm};
use server_core::domains::incidents::Location;
use sqlx::PgPool;

/// Connaught Place, New Delhi
pub const CONNAUGHT_PLACE: (f64, f64) = (28.6139, 77.2090);

/// Create a citizen with a given score and the badge that score implies
pub async fn create_citizen(pool: &PgPool, name: &str, score: i32) -> Result<Citizen> {
    let id = CitizenId::new();
    Citizen::ensure_exists(id, &format!("{}@example.in", id), name, ROLE_USER, pool).await?;

    let badge = badge_for_score(score);
    sqlx::query("UPDATE citizens SET score = $2, badge = $3, is_recommended = $4 WHERE id = $1")
        .bind(id)
        .bind(score)
        .bind(badge.label())
        .bind(badge.is_recommended())
        .execute(pool)
        .await?;

    Citizen::find_by_id(id, pool)
        .await?
        .ok_or_else(|| anyhow::anyhow!("citizen {} missing after insert", id))
}

/// Report form with client-side analysis, so no background classification runs
pub fn analysed_form(description: &str, category: &str, severity: f64) -> ReportForm {
    ReportForm {
        description: description.to_string(),
        location: Location {
            lat: CONNAUGHT_PLACE.0,
            lng: CONNAUGHT_PLACE.1,
            address: Some("Connaught Place, New Delhi".to_string()),
        },
        analysis: Some(AnalysisInput {
            summary: Some(description.to_string()),
            category: Some(category.to_string()),
            severity: Some(severity),
        }),
    }
}

/// Report form without analysis; the classifier fills it in
pub fn bare_form(description: &str) -> ReportForm {
    ReportForm {
        analysis: None,
        ..analysed_form(description, "Other", 3.0)
    }
}

pub async fn notification_kinds(pool: &PgPool, citizen_id: CitizenId) -> Result<Vec<String>> {
    let kinds = sqlx::query_scalar::<_, String>(
        "SELECT kind FROM notifications WHERE citizen_id = $1 ORDER BY created_at, id",
    )
    .bind(citizen_id)
    .fetch_all(pool)
    .await?;
    Ok(kinds)
}
