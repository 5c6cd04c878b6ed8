//! API-facing incident types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::common::{CitizenId, IncidentId};
use crate::domains::citizens::standing::{Badge, ReportOutcome, Standing};
use crate::domains::incidents::models::{
    normalize_category, normalize_severity, AiAnalysis, Incident, IncidentStatus, Location,
    PriorityLevel, DEFAULT_SUMMARY,
};

/// Analysis as a client may send it alongside a report. Values are
/// normalised before storage.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisInput {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub severity: Option<f64>,
}

impl AnalysisInput {
    pub fn normalize(self) -> AiAnalysis {
        AiAnalysis {
            summary: self
                .summary
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEFAULT_SUMMARY.to_string()),
            category: normalize_category(self.category.as_deref()),
            severity: normalize_severity(self.severity),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportForm {
    pub description: String,
    pub location: Location,
    #[serde(default)]
    pub analysis: Option<AnalysisInput>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdateInput {
    pub status: IncidentStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Incident as returned by the API
#[derive(Debug, Clone, Serialize)]
pub struct IncidentData {
    pub id: IncidentId,
    pub citizen_id: CitizenId,
    pub reporter_email: String,
    pub reporter_name: String,
    pub location: Location,
    pub description: String,
    pub analysis: AiAnalysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_error: Option<String>,
    pub status: IncidentStatus,
    pub priority: PriorityLevel,
    pub admin_notes: Option<String>,
    pub status_changed_at: Option<DateTime<Utc>>,
    pub status_changed_by: Option<CitizenId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Incident> for IncidentData {
    fn from(incident: Incident) -> Self {
        Self {
            location: incident.location(),
            analysis: incident.analysis(),
            status: incident.status(),
            priority: incident.priority(),
            id: incident.id,
            citizen_id: incident.citizen_id,
            reporter_email: incident.reporter_email,
            reporter_name: incident.reporter_name,
            description: incident.description,
            analysis_error: incident.analysis_error,
            admin_notes: incident.admin_notes,
            status_changed_at: incident.status_changed_at,
            status_changed_by: incident.status_changed_by,
            created_at: incident.created_at,
            updated_at: incident.updated_at,
        }
    }
}

/// Result of an admin status change
#[derive(Debug, Clone, Serialize)]
pub struct StatusChange {
    pub incident: IncidentData,
    pub previous_status: IncidentStatus,
    /// Score effect on the reporter, if the change entered resolved/rejected
    pub outcome: Option<ReportOutcome>,
    pub reporter_standing: Option<Standing>,
    /// Set when the reporter's badge changed
    pub new_badge: Option<Badge>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IncidentStats {
    pub total: i64,
    pub pending: i64,
    pub in_progress: i64,
    pub resolved: i64,
    pub rejected: i64,
    pub by_category: BTreeMap<String, i64>,
    pub by_severity: BTreeMap<i32, i64>,
}
