use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgConnection, PgPool};

use crate::common::{CitizenId, DispatchId, IncidentId};

/// An admin routing an incident to an authority
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Dispatch {
    pub id: DispatchId,
    pub incident_id: IncidentId,
    pub service_id: String,
    pub service_name: String,
    pub service_phone: String,
    pub distance_km: Option<f64>,
    pub dispatched_by: CitizenId,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub struct NewDispatch<'a> {
    pub incident_id: IncidentId,
    pub service_id: &'a str,
    pub service_name: &'a str,
    pub service_phone: &'a str,
    pub distance_km: Option<f64>,
    pub dispatched_by: CitizenId,
    pub notes: Option<&'a str>,
}

impl Dispatch {
    pub async fn create(new: NewDispatch<'_>, conn: &mut PgConnection) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO incident_dispatches
                (id, incident_id, service_id, service_name, service_phone, distance_km, dispatched_by, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING *",
        )
        .bind(DispatchId::new())
        .bind(new.incident_id)
        .bind(new.service_id)
        .bind(new.service_name)
        .bind(new.service_phone)
        .bind(new.distance_km)
        .bind(new.dispatched_by)
        .bind(new.notes)
        .fetch_one(conn)
        .await
        .map_err(Into::into)
    }

    pub async fn find_by_incident(incident_id: IncidentId, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM incident_dispatches
             WHERE incident_id = $1
             ORDER BY created_at DESC, id DESC",
        )
        .bind(incident_id)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }
}
