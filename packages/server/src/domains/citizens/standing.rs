//! Citizen standing: score changes, badge tiers and suspension.
//!
//! Pure functions only. Persistence of the resulting standing lives in
//! `models::citizen`.

use serde::{Deserialize, Serialize};

/// Scores strictly below this are suspended and may not report.
pub const SUSPENSION_THRESHOLD: i32 = -80;

pub const ACCEPTED_POINTS: i32 = 10;
pub const REJECTED_POINTS: i32 = -20;

/// Final admin decision on a report, as seen by the reporter's score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportOutcome {
    Accepted,
    Rejected,
}

impl ReportOutcome {
    pub fn points(self) -> i32 {
        match self {
            ReportOutcome::Accepted => ACCEPTED_POINTS,
            ReportOutcome::Rejected => REJECTED_POINTS,
        }
    }
}

/// Badge tiers, highest first. Serialized as the display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Badge {
    #[serde(rename = "🏆 Elite Citizen")]
    Elite,
    #[serde(rename = "⭐ Gold Citizen")]
    Gold,
    #[serde(rename = "🥉 Silver Citizen")]
    Silver,
    #[serde(rename = "🥉 Bronze Citizen")]
    Bronze,
    #[serde(rename = "👤 New Citizen")]
    New,
    #[serde(rename = "⚠️ Warning Citizen")]
    Warning,
    #[serde(rename = "🚫 Suspended Citizen")]
    Suspended,
}

impl Badge {
    pub const ALL: [Badge; 7] = [
        Badge::Elite,
        Badge::Gold,
        Badge::Silver,
        Badge::Bronze,
        Badge::New,
        Badge::Warning,
        Badge::Suspended,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Badge::Elite => "🏆 Elite Citizen",
            Badge::Gold => "⭐ Gold Citizen",
            Badge::Silver => "🥉 Silver Citizen",
            Badge::Bronze => "🥉 Bronze Citizen",
            Badge::New => "👤 New Citizen",
            Badge::Warning => "⚠️ Warning Citizen",
            Badge::Suspended => "🚫 Suspended Citizen",
        }
    }

    pub fn from_label(label: &str) -> Option<Badge> {
        Badge::ALL.into_iter().find(|b| b.label() == label)
    }

    /// Elite and Gold citizens are surfaced to admins
    pub fn is_recommended(self) -> bool {
        matches!(self, Badge::Elite | Badge::Gold)
    }

    /// Weight of the reporter's badge in the admin queue
    pub fn queue_weight(self) -> i64 {
        match self {
            Badge::Elite => 1000,
            Badge::Gold => 500,
            Badge::Silver => 200,
            Badge::Bronze => 100,
            Badge::New => 50,
            Badge::Warning | Badge::Suspended => 0,
        }
    }
}

impl std::fmt::Display for Badge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Tier for a score. Lower bounds are inclusive.
pub fn badge_for_score(score: i32) -> Badge {
    match score {
        s if s >= 100 => Badge::Elite,
        s if s >= 75 => Badge::Gold,
        s if s >= 50 => Badge::Silver,
        s if s >= 25 => Badge::Bronze,
        s if s >= 0 => Badge::New,
        s if s >= SUSPENSION_THRESHOLD => Badge::Warning,
        _ => Badge::Suspended,
    }
}

pub fn is_suspended(score: i32) -> bool {
    score < SUSPENSION_THRESHOLD
}

pub fn is_in_warning_zone(score: i32) -> bool {
    (SUSPENSION_THRESHOLD..0).contains(&score)
}

/// Score plus everything derived from it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Standing {
    pub score: i32,
    pub badge: Badge,
    pub is_recommended: bool,
    pub is_suspended: bool,
    pub is_in_warning_zone: bool,
}

pub fn standing_for_score(score: i32) -> Standing {
    let badge = badge_for_score(score);
    Standing {
        score,
        badge,
        is_recommended: badge.is_recommended(),
        is_suspended: is_suspended(score),
        is_in_warning_zone: is_in_warning_zone(score),
    }
}

/// Standing after an outcome is applied to `score`
pub fn apply_outcome(score: i32, outcome: ReportOutcome) -> Standing {
    standing_for_score(score.saturating_add(outcome.points()))
}
