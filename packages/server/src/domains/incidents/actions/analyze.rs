//! Background classification of stored incidents

use anyhow::Result;
use tracing::{error, info, instrument};

use crate::common::IncidentId;
use crate::domains::incidents::classification::{classify, ClassificationError};
use crate::domains::incidents::models::{AiAnalysis, Incident};
use crate::kernel::ServerDeps;

/// Stored on the incident when classification fails
pub const ANALYSIS_ERROR_MESSAGE: &str = "Failed to analyze incident via direct API.";

/// Classify a description without storing anything
pub async fn preview_analysis(
    description: &str,
    deps: &ServerDeps,
) -> Result<AiAnalysis, ClassificationError> {
    classify(deps.ai.as_ref(), description).await
}

/// Classify a stored incident and write the result back. Classification
/// failures are recorded on the incident, not returned.
#[instrument(skip_all, fields(incident_id = %incident_id))]
pub async fn analyze_incident(incident_id: IncidentId, deps: &ServerDeps) -> Result<()> {
    let Some(incident) = Incident::find_by_id(incident_id, &deps.db_pool).await? else {
        error!(incident_id = %incident_id, "Incident vanished before analysis");
        return Ok(());
    };

    match classify(deps.ai.as_ref(), &incident.description).await {
        Ok(analysis) => {
            Incident::update_analysis(incident_id, &analysis, &deps.db_pool).await?;
            info!(
                incident_id = %incident_id,
                category = %analysis.category,
                severity = analysis.severity,
                "Incident analysis stored"
            );
        }
        Err(e) => {
            error!(incident_id = %incident_id, error = %e, "Incident analysis failed");
            Incident::record_analysis_error(incident_id, ANALYSIS_ERROR_MESSAGE, &deps.db_pool)
                .await?;
        }
    }

    Ok(())
}

/// Run `analyze_incident` on the runtime without waiting for it
pub fn spawn_analysis(deps: ServerDeps, incident_id: IncidentId) {
    tokio::spawn(async move {
        if let Err(e) = analyze_incident(incident_id, &deps).await {
            error!(incident_id = %incident_id, error = %e, "Failed to store incident analysis");
        }
    });
}
