//! Submit report action

use tracing::{info, warn};

use crate::domains::citizens::standing::is_suspended;
use crate::domains::citizens::Citizen;
use crate::domains::incidents::actions::spawn_analysis;
use crate::domains::incidents::data::ReportForm;
use crate::domains::incidents::errors::ReportError;
use crate::domains::incidents::models::{Incident, NewIncident};
use crate::domains::notifications::{messages, Notification};
use crate::kernel::ServerDeps;

/// File a new report for `citizen`.
///
/// The incident, the reporter's report counter and the confirmation
/// notification are written in one transaction. Without client-side
/// analysis the classifier runs in the background afterwards.
pub async fn submit_report(
    citizen: &Citizen,
    form: ReportForm,
    deps: &ServerDeps,
) -> Result<Incident, ReportError> {
    if is_suspended(citizen.score) {
        warn!(citizen_id = %citizen.id, score = citizen.score, "Suspended citizen tried to report");
        return Err(ReportError::Suspended {
            score: citizen.score,
        });
    }

    let description = form.description.trim();
    if description.is_empty() {
        return Err(ReportError::EmptyDescription);
    }
    if !form.location.point().is_valid() {
        return Err(ReportError::InvalidLocation);
    }

    let needs_analysis = form.analysis.is_none();
    let analysis = form.analysis.map(|a| a.normalize()).unwrap_or_default();

    let new = NewIncident::builder()
        .citizen_id(citizen.id)
        .reporter_email(citizen.email.clone())
        .reporter_name(citizen.display_name.clone())
        .location(form.location)
        .description(description)
        .analysis(analysis)
        .build();

    let mut tx = deps.db_pool.begin().await?;

    let incident = Incident::create(new, &mut *tx).await?;
    Citizen::increment_total_reports(citizen.id, &mut *tx).await?;
    Notification::create(
        messages::incident_created(citizen.id, incident.id, &incident.description),
        &mut *tx,
    )
    .await?;

    tx.commit().await?;

    info!(
        incident_id = %incident.id,
        citizen_id = %citizen.id,
        severity = incident.severity,
        "Incident reported"
    );

    if needs_analysis {
        spawn_analysis(deps.clone(), incident.id);
    }

    Ok(incident)
}
