use chrono::Utc;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::common::utils::round_to;
use crate::common::{CitizenId, IncidentId};
use crate::domains::authorities::catalog::{find_service, EmergencyService};
use crate::domains::authorities::contacts::find_contact_service;
use crate::domains::authorities::matching::{find_services, local_hour, ServiceMatch};
use crate::domains::authorities::models::{Dispatch, NewDispatch};
use crate::domains::incidents::{Incident, ReportError};
use crate::domains::notifications::{messages, Notification};
use crate::kernel::ServerDeps;

#[derive(Debug, Clone, Deserialize)]
pub struct DispatchInput {
    pub service_id: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Unknown service: {0}")]
    UnknownService(String),

    #[error(transparent)]
    Report(#[from] ReportError),
}

impl From<sqlx::Error> for DispatchError {
    fn from(e: sqlx::Error) -> Self {
        DispatchError::Report(ReportError::DatabaseError(e))
    }
}

impl From<anyhow::Error> for DispatchError {
    fn from(e: anyhow::Error) -> Self {
        DispatchError::Report(ReportError::InternalError(e))
    }
}

async fn load_incident(incident_id: IncidentId, deps: &ServerDeps) -> Result<Incident, ReportError> {
    Incident::find_by_id(incident_id, &deps.db_pool)
        .await?
        .ok_or(ReportError::IncidentNotFound(incident_id))
}

/// Services that should handle a stored incident
pub async fn authorities_for_incident(
    incident_id: IncidentId,
    deps: &ServerDeps,
) -> Result<Vec<ServiceMatch>, ReportError> {
    let incident = load_incident(incident_id, deps).await?;

    Ok(find_services(
        incident.location().point(),
        &incident.category,
        incident.severity,
        &deps.emergency_region,
        local_hour(Utc::now()),
    ))
}

/// Record that an admin routed the incident to a service and tell the
/// reporter who is handling it
#[instrument(skip(input, deps), fields(service_id = %input.service_id))]
pub async fn dispatch_incident(
    incident_id: IncidentId,
    input: DispatchInput,
    admin_id: CitizenId,
    deps: &ServerDeps,
) -> Result<Dispatch, DispatchError> {
    let incident = load_incident(incident_id, deps).await?;
    let pin = incident.location().point();

    let service: EmergencyService = find_service(&input.service_id)
        .or_else(|| find_contact_service(&deps.emergency_region, &input.service_id, pin))
        .ok_or_else(|| DispatchError::UnknownService(input.service_id.clone()))?;

    let distance_km = round_to(pin.distance_km(&service.location), 2);
    let notes = input.notes.as_deref().map(str::trim).filter(|n| !n.is_empty());

    let mut tx = deps.db_pool.begin().await?;

    let dispatch = Dispatch::create(
        NewDispatch {
            incident_id,
            service_id: &service.id,
            service_name: &service.name,
            service_phone: service.emergency_phone.as_deref().unwrap_or(&service.phone),
            distance_km: Some(distance_km),
            dispatched_by: admin_id,
            notes,
        },
        &mut *tx,
    )
    .await?;

    Notification::create(
        messages::incident_dispatched(
            incident.citizen_id,
            incident_id,
            &incident.description,
            &service.name,
        ),
        &mut *tx,
    )
    .await?;

    tx.commit().await?;

    info!(
        incident_id = %incident_id,
        service_id = %service.id,
        admin_id = %admin_id,
        "Incident dispatched"
    );

    Ok(dispatch)
}

pub async fn dispatches_for_incident(
    incident_id: IncidentId,
    deps: &ServerDeps,
) -> anyhow::Result<Vec<Dispatch>> {
    Dispatch::find_by_incident(incident_id, &deps.db_pool).await
}
