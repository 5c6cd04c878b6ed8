use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};

use crate::common::CitizenId;
use crate::domains::citizens::standing::{
    badge_for_score, standing_for_score, Badge, ReportOutcome, Standing,
};

pub const ROLE_USER: &str = "user";
pub const ROLE_ADMIN: &str = "admin";

/// Citizen profile - one row per identity-provider subject
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Citizen {
    pub id: CitizenId,
    pub email: String,
    pub display_name: String,
    pub role: String,

    pub score: i32,
    pub badge: String,
    pub is_recommended: bool,

    pub total_reports: i32,
    pub accepted_reports: i32,
    pub rejected_reports: i32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Citizen {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    /// Stored badge, or the one the score implies if the label is unknown
    pub fn badge(&self) -> Badge {
        Badge::from_label(&self.badge).unwrap_or_else(|| badge_for_score(self.score))
    }

    pub fn standing(&self) -> Standing {
        standing_for_score(self.score)
    }

    pub async fn find_by_id(id: CitizenId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM citizens WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Create the profile on first sight of an identity, refreshing the
    /// identity fields on later calls. Score and counters are never touched.
    pub async fn ensure_exists(
        id: CitizenId,
        email: &str,
        display_name: &str,
        role: &str,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO citizens (id, email, display_name, role, badge)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (id) DO UPDATE
                SET email = EXCLUDED.email,
                    display_name = EXCLUDED.display_name,
                    role = EXCLUDED.role
             RETURNING *",
        )
        .bind(id)
        .bind(email)
        .bind(display_name)
        .bind(role)
        .bind(Badge::New.label())
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn increment_total_reports(id: CitizenId, conn: &mut PgConnection) -> Result<()> {
        sqlx::query(
            "UPDATE citizens
             SET total_reports = total_reports + 1, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Add the outcome's points and bump the matching counter.
    /// Badge is left alone; see `set_standing`. `None` if the profile is gone.
    pub async fn apply_outcome(
        id: CitizenId,
        outcome: ReportOutcome,
        conn: &mut PgConnection,
    ) -> Result<Option<Self>> {
        let accepted = outcome == ReportOutcome::Accepted;

        sqlx::query_as::<_, Self>(
            "UPDATE citizens
             SET score = score + $2,
                 accepted_reports = accepted_reports + CASE WHEN $3 THEN 1 ELSE 0 END,
                 rejected_reports = rejected_reports + CASE WHEN $3 THEN 0 ELSE 1 END,
                 updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(outcome.points())
        .bind(accepted)
        .fetch_optional(conn)
        .await
        .map_err(Into::into)
    }

    pub async fn set_standing(
        id: CitizenId,
        badge: Badge,
        is_recommended: bool,
        conn: &mut PgConnection,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE citizens
             SET badge = $2, is_recommended = $3, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(badge.label())
        .bind(is_recommended)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Recommended regular users, best score first
    pub async fn find_recommended(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM citizens
             WHERE is_recommended = true AND role = 'user'
             ORDER BY score DESC, created_at ASC",
        )
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Reset one citizen's total_reports to the real incident count
    pub async fn recount_total_reports(id: CitizenId, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "UPDATE citizens
             SET total_reports = (SELECT COUNT(*)::int FROM incidents WHERE citizen_id = $1),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Recount total_reports for every citizen whose stored value drifted.
    /// Returns how many rows changed.
    pub async fn sync_total_reports(pool: &PgPool) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE citizens c
             SET total_reports = counts.actual, updated_at = NOW()
             FROM (
                SELECT c2.id, COUNT(i.id)::int AS actual
                FROM citizens c2
                LEFT JOIN incidents i ON i.citizen_id = c2.id
                GROUP BY c2.id
             ) counts
             WHERE c.id = counts.id AND c.total_reports <> counts.actual",
        )
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }
}
