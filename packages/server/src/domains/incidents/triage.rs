//! Admin triage queue: ranking and filtering of reports.
//!
//! Pure over already-loaded rows so the ranking can be tested without a
//! database.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::common::utils::contains_ignore_case;
use crate::domains::citizens::standing::Badge;
use crate::domains::incidents::models::{Incident, IncidentStatus, IncidentWithReporter};

const FRESHNESS_DAYS: f64 = 30.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Severity at or above this counts as high
pub const HIGH_SEVERITY: i32 = 4;

/// Queue row: the report plus its reporter's badge at load time
#[derive(Debug, Clone, Serialize)]
pub struct QueueEntry {
    pub incident: Incident,
    pub reporter_badge: Option<Badge>,
    pub priority_score: f64,
}

impl QueueEntry {
    pub fn new(incident: Incident, reporter_badge: Option<Badge>) -> Self {
        Self {
            incident,
            reporter_badge,
            priority_score: 0.0,
        }
    }
}

impl From<IncidentWithReporter> for QueueEntry {
    fn from(row: IncidentWithReporter) -> Self {
        let badge = row.reporter_badge.as_deref().and_then(Badge::from_label);
        QueueEntry::new(row.incident, badge)
    }
}

/// badge weight + severity * 10 + up to 30 points for freshness
pub fn priority_score(
    badge: Option<Badge>,
    severity: Option<i32>,
    created_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> f64 {
    let badge_weight = badge.map(Badge::queue_weight).unwrap_or(0) as f64;
    let severity_weight = f64::from(severity.unwrap_or(1)) * 10.0;

    let days_old = created_at
        .map(|t| (now - t).num_seconds() as f64 / SECONDS_PER_DAY)
        .unwrap_or(0.0);
    let freshness = (FRESHNESS_DAYS - days_old).max(0.0);

    badge_weight + severity_weight + freshness
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TierFilter {
    #[default]
    All,
    Elite,
    Gold,
    High,
}

impl TierFilter {
    fn matches(self, entry: &QueueEntry) -> bool {
        match self {
            TierFilter::All => true,
            TierFilter::Elite => entry.reporter_badge == Some(Badge::Elite),
            TierFilter::Gold => matches!(entry.reporter_badge, Some(Badge::Elite | Badge::Gold)),
            TierFilter::High => {
                matches!(entry.reporter_badge, Some(Badge::Elite | Badge::Gold))
                    || entry.incident.severity >= HIGH_SEVERITY
            }
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueueFilter {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub severity: Option<i32>,
    #[serde(default)]
    pub status: Option<IncidentStatus>,
    #[serde(default)]
    pub tier: TierFilter,
}

impl QueueFilter {
    pub fn matches(&self, entry: &QueueEntry) -> bool {
        let incident = &entry.incident;

        if let Some(term) = self.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let hit = contains_ignore_case(&incident.description, term)
                || incident
                    .address
                    .as_deref()
                    .is_some_and(|a| contains_ignore_case(a, term))
                || contains_ignore_case(&incident.reporter_name, term);
            if !hit {
                return false;
            }
        }

        if self.severity.is_some_and(|s| incident.severity != s) {
            return false;
        }

        if self.status.is_some_and(|s| incident.status() != s) {
            return false;
        }

        self.tier.matches(entry)
    }
}

/// Filter, score and sort highest priority first. Ties keep input order.
pub fn build_queue(
    entries: Vec<QueueEntry>,
    filter: &QueueFilter,
    now: DateTime<Utc>,
) -> Vec<QueueEntry> {
    let mut queue: Vec<QueueEntry> = entries
        .into_iter()
        .filter(|e| filter.matches(e))
        .map(|mut e| {
            e.priority_score = priority_score(
                e.reporter_badge,
                Some(e.incident.severity),
                Some(e.incident.created_at),
                now,
            );
            e
        })
        .collect();

    queue.sort_by(|a, b| b.priority_score.total_cmp(&a.priority_score));
    queue
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total: usize,
    pub pending: usize,
    pub high_severity: usize,
    pub resolved: usize,
    pub elite_reports: usize,
}

pub fn dashboard_stats(entries: &[QueueEntry]) -> DashboardStats {
    entries.iter().fold(
        DashboardStats {
            total: entries.len(),
            ..DashboardStats::default()
        },
        |mut stats, e| {
            match e.incident.status() {
                IncidentStatus::Pending => stats.pending += 1,
                IncidentStatus::Resolved => stats.resolved += 1,
                _ => {}
            }
            if e.incident.severity >= HIGH_SEVERITY {
                stats.high_severity += 1;
            }
            if e.reporter_badge == Some(Badge::Elite) {
                stats.elite_reports += 1;
            }
            stats
        },
    )
}
