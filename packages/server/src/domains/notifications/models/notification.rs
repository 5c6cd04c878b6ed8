use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use typed_builder::TypedBuilder;

use crate::common::{CitizenId, IncidentId, NotificationId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    IncidentAccepted,
    IncidentRejected,
    IncidentCreated,
    IncidentInProgress,
    IncidentPending,
    IncidentDispatched,
    BadgeEarned,
    AdminRecommendation,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::IncidentAccepted => "incident_accepted",
            NotificationKind::IncidentRejected => "incident_rejected",
            NotificationKind::IncidentCreated => "incident_created",
            NotificationKind::IncidentInProgress => "incident_in_progress",
            NotificationKind::IncidentPending => "incident_pending",
            NotificationKind::IncidentDispatched => "incident_dispatched",
            NotificationKind::BadgeEarned => "badge_earned",
            NotificationKind::AdminRecommendation => "admin_recommendation",
        }
    }
}

/// Notification shown in the citizen's bell menu
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Notification {
    pub id: NotificationId,
    pub citizen_id: CitizenId,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub incident_id: Option<IncidentId>,
    pub points: Option<i32>,
    pub badge: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, TypedBuilder)]
pub struct NewNotification {
    pub citizen_id: CitizenId,
    pub kind: NotificationKind,
    #[builder(setter(into))]
    pub title: String,
    #[builder(setter(into))]
    pub message: String,
    #[builder(default, setter(strip_option))]
    pub incident_id: Option<IncidentId>,
    #[builder(default, setter(strip_option))]
    pub points: Option<i32>,
    #[builder(default, setter(strip_option, into))]
    pub badge: Option<String>,
}

impl Notification {
    /// Insert inside the caller's transaction
    pub async fn create(new: NewNotification, conn: &mut PgConnection) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO notifications (id, citizen_id, kind, title, message, incident_id, points, badge)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING *",
        )
        .bind(NotificationId::new())
        .bind(new.citizen_id)
        .bind(new.kind.as_str())
        .bind(new.title)
        .bind(new.message)
        .bind(new.incident_id)
        .bind(new.points)
        .bind(new.badge)
        .fetch_one(conn)
        .await
        .map_err(Into::into)
    }

    /// Newest first
    pub async fn find_by_citizen(citizen_id: CitizenId, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM notifications
             WHERE citizen_id = $1
             ORDER BY created_at DESC, id DESC",
        )
        .bind(citizen_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn unread_count(citizen_id: CitizenId, pool: &PgPool) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE citizen_id = $1 AND is_read = false",
        )
        .bind(citizen_id)
        .fetch_one(pool)
        .await?;

        Ok(count)
    }

    /// Mark read if it belongs to `citizen_id`. Returns false when no such
    /// notification exists for that citizen.
    pub async fn mark_read(
        id: NotificationId,
        citizen_id: CitizenId,
        pool: &PgPool,
    ) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = true WHERE id = $1 AND citizen_id = $2",
        )
        .bind(id)
        .bind(citizen_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_wire_names_match_serde() {
        for kind in [
            NotificationKind::IncidentAccepted,
            NotificationKind::IncidentInProgress,
            NotificationKind::BadgeEarned,
            NotificationKind::AdminRecommendation,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn test_builder_defaults() {
        let new = NewNotification::builder()
            .citizen_id(CitizenId::new())
            .kind(NotificationKind::BadgeEarned)
            .title("New Badge Earned! 🏅")
            .message("Congratulations!")
            .badge("⭐ Gold Citizen")
            .build();

        assert!(new.incident_id.is_none());
        assert!(new.points.is_none());
        assert_eq!(new.badge.as_deref(), Some("⭐ Gold Citizen"));
    }
}
