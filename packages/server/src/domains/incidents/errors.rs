use thiserror::Error;

use crate::common::IncidentId;

/// Failures of the report lifecycle that callers are expected to handle
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Account suspended: score {score} is below the reporting threshold")]
    Suspended { score: i32 },

    #[error("Description must not be empty")]
    EmptyDescription,

    #[error("Invalid location: latitude/longitude out of range")]
    InvalidLocation,

    #[error("Citizen profile not found")]
    CitizenNotFound,

    #[error("Incident not found: {0}")]
    IncidentNotFound(IncidentId),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}
