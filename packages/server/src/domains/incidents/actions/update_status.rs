//! Admin status change with reporter scoring

use sqlx::PgConnection;
use tracing::info;

use crate::common::{CitizenId, IncidentId};
use crate::domains::citizens::standing::{badge_for_score, Badge, ReportOutcome, Standing};
use crate::domains::citizens::Citizen;
use crate::domains::incidents::data::{IncidentData, StatusChange};
use crate::domains::incidents::errors::ReportError;
use crate::domains::incidents::models::{Incident, IncidentStatus};
use crate::domains::notifications::{messages, Notification};
use crate::kernel::ServerDeps;

/// Score effect of entering `status`
pub fn outcome_for_status(status: IncidentStatus) -> Option<ReportOutcome> {
    match status {
        IncidentStatus::Resolved => Some(ReportOutcome::Accepted),
        IncidentStatus::Rejected => Some(ReportOutcome::Rejected),
        IncidentStatus::Pending | IncidentStatus::InProgress => None,
    }
}

/// Move an incident to `new_status`.
///
/// Entering `resolved` or `rejected` scores the reporter and re-evaluates
/// their badge. Re-setting the current status only records the change.
/// Everything happens in one transaction.
pub async fn update_status(
    incident_id: IncidentId,
    new_status: IncidentStatus,
    notes: Option<&str>,
    admin_id: CitizenId,
    deps: &ServerDeps,
) -> Result<StatusChange, ReportError> {
    let mut tx = deps.db_pool.begin().await?;

    let current = Incident::find_for_update(incident_id, &mut *tx)
        .await?
        .ok_or(ReportError::IncidentNotFound(incident_id))?;
    let previous_status = current.status();

    let notes = notes.map(str::trim).filter(|n| !n.is_empty());
    let incident = Incident::set_status(incident_id, new_status, notes, admin_id, &mut *tx).await?;

    let mut change = StatusChange {
        incident: IncidentData::from(incident.clone()),
        previous_status,
        outcome: None,
        reporter_standing: None,
        new_badge: None,
    };

    if previous_status == new_status {
        tx.commit().await?;
        info!(incident_id = %incident_id, status = %new_status, "Incident status unchanged");
        return Ok(change);
    }

    let reporter = incident.citizen_id;
    let description = incident.description.as_str();

    if let Some(outcome) = outcome_for_status(new_status) {
        let notification = match outcome {
            ReportOutcome::Accepted => messages::incident_accepted(reporter, incident_id, description),
            ReportOutcome::Rejected => messages::incident_rejected(reporter, incident_id, description),
        };

        Notification::create(notification, &mut *tx).await?;
        let (standing, new_badge) = apply_reporter_outcome(reporter, outcome, &mut *tx).await?;

        change.outcome = Some(outcome);
        change.reporter_standing = Some(standing);
        change.new_badge = new_badge;
    } else {
        let notification = match new_status {
            IncidentStatus::InProgress => {
                messages::incident_in_progress(reporter, incident_id, description)
            }
            _ => messages::incident_pending(reporter, incident_id, description),
        };
        Notification::create(notification, &mut *tx).await?;
    }

    tx.commit().await?;

    info!(
        incident_id = %incident_id,
        from = %previous_status,
        to = %new_status,
        admin_id = %admin_id,
        "Incident status updated"
    );

    Ok(change)
}

/// Score the reporter and store the badge the new score implies.
/// Returns the new standing and the badge if it changed.
async fn apply_reporter_outcome(
    citizen_id: CitizenId,
    outcome: ReportOutcome,
    conn: &mut PgConnection,
) -> Result<(Standing, Option<Badge>), ReportError> {
    let citizen = Citizen::apply_outcome(citizen_id, outcome, &mut *conn)
        .await?
        .ok_or(ReportError::CitizenNotFound)?;
    let standing = citizen.standing();
    let new_badge = badge_for_score(citizen.score);

    if citizen.badge == new_badge.label() {
        return Ok((standing, None));
    }

    Citizen::set_standing(citizen_id, new_badge, new_badge.is_recommended(), &mut *conn).await?;
    Notification::create(messages::badge_earned(citizen_id, new_badge), &mut *conn).await?;

    if new_badge.is_recommended() && !citizen.is_recommended {
        Notification::create(
            messages::admin_recommendation(citizen_id, new_badge),
            &mut *conn,
        )
        .await?;
    }

    info!(
        citizen_id = %citizen_id,
        score = citizen.score,
        badge = %new_badge,
        "Citizen badge changed"
    );

    Ok((standing, Some(new_badge)))
}
