use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};
use typed_builder::TypedBuilder;

use crate::common::utils::GeoPoint;
use crate::common::{CitizenId, IncidentId};

pub const DEFAULT_SEVERITY: i32 = 3;
pub const DEFAULT_SUMMARY: &str = "Manual analysis";
pub const DEFAULT_CATEGORY: &str = "Other";

/// Categories the classifier may answer with
pub const KNOWN_CATEGORIES: [&str; 6] = [
    "Traffic",
    "Power Outage",
    "Water Issue",
    "Public Unrest",
    "Infrastructure",
    "Other",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IncidentStatus {
    Pending,
    InProgress,
    Resolved,
    Rejected,
}

impl IncidentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            IncidentStatus::Pending => "pending",
            IncidentStatus::InProgress => "in-progress",
            IncidentStatus::Resolved => "resolved",
            IncidentStatus::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for IncidentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for IncidentStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(IncidentStatus::Pending),
            "in-progress" => Ok(IncidentStatus::InProgress),
            "resolved" => Ok(IncidentStatus::Resolved),
            "rejected" => Ok(IncidentStatus::Rejected),
            _ => Err(anyhow::anyhow!("Invalid incident status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl PriorityLevel {
    pub fn from_severity(severity: i32) -> Self {
        match severity {
            s if s >= 5 => PriorityLevel::Critical,
            4 => PriorityLevel::High,
            3 => PriorityLevel::Medium,
            _ => PriorityLevel::Low,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PriorityLevel::Low => "low",
            PriorityLevel::Medium => "medium",
            PriorityLevel::High => "high",
            PriorityLevel::Critical => "critical",
        }
    }
}

impl std::str::FromStr for PriorityLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "low" => Ok(PriorityLevel::Low),
            "medium" => Ok(PriorityLevel::Medium),
            "high" => Ok(PriorityLevel::High),
            "critical" => Ok(PriorityLevel::Critical),
            _ => Err(anyhow::anyhow!("Invalid priority: {}", s)),
        }
    }
}

/// Where the citizen dropped the pin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Location {
    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }
}

/// Classifier output after normalisation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiAnalysis {
    pub summary: String,
    pub category: String,
    pub severity: i32,
}

impl AiAnalysis {
    pub fn priority(&self) -> PriorityLevel {
        PriorityLevel::from_severity(self.severity)
    }
}

impl Default for AiAnalysis {
    fn default() -> Self {
        Self {
            summary: DEFAULT_SUMMARY.to_string(),
            category: DEFAULT_CATEGORY.to_string(),
            severity: DEFAULT_SEVERITY,
        }
    }
}

/// Severity as stored: missing or non-finite is 3, everything else is
/// rounded and clamped into 1..=5
pub fn normalize_severity(raw: Option<f64>) -> i32 {
    match raw {
        Some(value) if value.is_finite() => value.round().clamp(1.0, 5.0) as i32,
        _ => DEFAULT_SEVERITY,
    }
}

/// Canonical spelling of a known category, `Other` for anything else
pub fn normalize_category(raw: Option<&str>) -> String {
    raw.map(str::trim)
        .and_then(|c| KNOWN_CATEGORIES.iter().find(|k| k.eq_ignore_ascii_case(c)))
        .unwrap_or(&DEFAULT_CATEGORY)
        .to_string()
}

/// Citizen report row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Incident {
    pub id: IncidentId,
    pub citizen_id: CitizenId,
    pub reporter_email: String,
    pub reporter_name: String,

    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,

    pub description: String,

    pub summary: String,
    pub category: String,
    pub severity: i32,
    pub analysis_error: Option<String>,

    pub status: String,
    pub priority: String,
    pub admin_notes: Option<String>,
    pub status_changed_at: Option<DateTime<Utc>>,
    pub status_changed_by: Option<CitizenId>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Values for a new report; status always starts at `pending`
#[derive(Debug, Clone, TypedBuilder)]
pub struct NewIncident {
    pub citizen_id: CitizenId,
    #[builder(setter(into))]
    pub reporter_email: String,
    #[builder(setter(into))]
    pub reporter_name: String,
    pub location: Location,
    #[builder(setter(into))]
    pub description: String,
    #[builder(default)]
    pub analysis: AiAnalysis,
}

/// Admin search filters. `None` means no constraint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IncidentSearch {
    pub term: Option<String>,
    pub status: Option<IncidentStatus>,
    pub category: Option<String>,
    pub severity: Option<i32>,
}

/// Incident joined with its reporter's stored badge label
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct IncidentWithReporter {
    #[sqlx(flatten)]
    pub incident: Incident,
    pub reporter_badge: Option<String>,
}

impl Incident {
    pub fn status(&self) -> IncidentStatus {
        self.status.parse().unwrap_or(IncidentStatus::Pending)
    }

    pub fn priority(&self) -> PriorityLevel {
        self.priority
            .parse()
            .unwrap_or_else(|_| PriorityLevel::from_severity(self.severity))
    }

    pub fn location(&self) -> Location {
        Location {
            lat: self.latitude,
            lng: self.longitude,
            address: self.address.clone(),
        }
    }

    pub fn analysis(&self) -> AiAnalysis {
        AiAnalysis {
            summary: self.summary.clone(),
            category: self.category.clone(),
            severity: self.severity,
        }
    }

    pub async fn create(new: NewIncident, conn: &mut PgConnection) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO incidents (
                id, citizen_id, reporter_email, reporter_name,
                latitude, longitude, address, description,
                summary, category, severity, status, priority
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING *",
        )
        .bind(IncidentId::new())
        .bind(new.citizen_id)
        .bind(new.reporter_email)
        .bind(new.reporter_name)
        .bind(new.location.lat)
        .bind(new.location.lng)
        .bind(new.location.address)
        .bind(new.description)
        .bind(&new.analysis.summary)
        .bind(&new.analysis.category)
        .bind(new.analysis.severity)
        .bind(IncidentStatus::Pending.as_str())
        .bind(new.analysis.priority().as_str())
        .fetch_one(conn)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_id(id: IncidentId, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM incidents WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Row lock for status changes
    pub async fn find_for_update(id: IncidentId, conn: &mut PgConnection) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM incidents WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(conn)
            .await
            .map_err(Into::into)
    }

    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM incidents ORDER BY created_at DESC, id DESC")
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn find_by_citizen(citizen_id: CitizenId, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM incidents
             WHERE citizen_id = $1
             ORDER BY created_at DESC, id DESC",
        )
        .bind(citizen_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Every incident with the reporter's current badge, for the admin queue
    pub async fn find_all_with_reporter(pool: &PgPool) -> Result<Vec<IncidentWithReporter>> {
        sqlx::query_as::<_, IncidentWithReporter>(
            "SELECT i.*, c.badge AS reporter_badge
             FROM incidents i
             LEFT JOIN citizens c ON c.id = i.citizen_id
             ORDER BY i.created_at DESC, i.id DESC",
        )
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn search(filters: &IncidentSearch, pool: &PgPool) -> Result<Vec<Self>> {
        let pattern = filters
            .term
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| format!("%{}%", escape_like(t)));

        sqlx::query_as::<_, Self>(
            "SELECT * FROM incidents
             WHERE ($1::text IS NULL
                    OR description ILIKE $1
                    OR summary ILIKE $1
                    OR category ILIKE $1)
               AND ($2::text IS NULL OR status = $2)
               AND ($3::text IS NULL OR category = $3)
               AND ($4::int IS NULL OR severity = $4)
             ORDER BY created_at DESC, id DESC",
        )
        .bind(pattern)
        .bind(filters.status.map(IncidentStatus::as_str))
        .bind(filters.category.as_deref())
        .bind(filters.severity)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Store a status change. `admin_notes` is only overwritten when given.
    pub async fn set_status(
        id: IncidentId,
        status: IncidentStatus,
        notes: Option<&str>,
        changed_by: CitizenId,
        conn: &mut PgConnection,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "UPDATE incidents
             SET status = $2,
                 admin_notes = COALESCE($3, admin_notes),
                 status_changed_at = NOW(),
                 status_changed_by = $4,
                 updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(status.as_str())
        .bind(notes)
        .bind(changed_by)
        .fetch_one(conn)
        .await
        .map_err(Into::into)
    }

    /// Write classifier output back and refresh priority
    pub async fn update_analysis(
        id: IncidentId,
        analysis: &AiAnalysis,
        pool: &PgPool,
    ) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "UPDATE incidents
             SET summary = $2,
                 category = $3,
                 severity = $4,
                 priority = $5,
                 analysis_error = NULL,
                 updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(&analysis.summary)
        .bind(&analysis.category)
        .bind(analysis.severity)
        .bind(analysis.priority().as_str())
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn record_analysis_error(id: IncidentId, error: &str, pool: &PgPool) -> Result<()> {
        sqlx::query(
            "UPDATE incidents SET analysis_error = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(error)
        .execute(pool)
        .await?;

        Ok(())
    }

    pub async fn count_by_status(pool: &PgPool) -> Result<Vec<(String, i64)>> {
        sqlx::query_as::<_, (String, i64)>(
            "SELECT status, COUNT(*) FROM incidents GROUP BY status",
        )
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn count_by_category(pool: &PgPool) -> Result<Vec<(String, i64)>> {
        sqlx::query_as::<_, (String, i64)>(
            "SELECT category, COUNT(*) FROM incidents GROUP BY category ORDER BY category",
        )
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    pub async fn count_by_severity(pool: &PgPool) -> Result<Vec<(i32, i64)>> {
        sqlx::query_as::<_, (i32, i64)>(
            "SELECT severity, COUNT(*) FROM incidents GROUP BY severity ORDER BY severity",
        )
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}

fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
