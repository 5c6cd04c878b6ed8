//! Incident read actions

use anyhow::Result;
use chrono::Utc;

use crate::common::CitizenId;
use crate::domains::incidents::data::IncidentStats;
use crate::domains::incidents::models::{Incident, IncidentSearch};
use crate::domains::incidents::triage::{
    build_queue, dashboard_stats, DashboardStats, QueueEntry, QueueFilter,
};
use crate::kernel::ServerDeps;

pub async fn list_all(deps: &ServerDeps) -> Result<Vec<Incident>> {
    Incident::find_all(&deps.db_pool).await
}

pub async fn list_for_citizen(citizen_id: CitizenId, deps: &ServerDeps) -> Result<Vec<Incident>> {
    Incident::find_by_citizen(citizen_id, &deps.db_pool).await
}

pub async fn search_incidents(filters: &IncidentSearch, deps: &ServerDeps) -> Result<Vec<Incident>> {
    Incident::search(filters, &deps.db_pool).await
}

pub async fn incident_stats(deps: &ServerDeps) -> Result<IncidentStats> {
    let pool = &deps.db_pool;
    let mut stats = IncidentStats::default();

    for (status, count) in Incident::count_by_status(pool).await? {
        stats.total += count;
        match status.as_str() {
            "pending" => stats.pending = count,
            "in-progress" => stats.in_progress = count,
            "resolved" => stats.resolved = count,
            "rejected" => stats.rejected = count,
            _ => {}
        }
    }

    stats.by_category = Incident::count_by_category(pool).await?.into_iter().collect();
    stats.by_severity = Incident::count_by_severity(pool).await?.into_iter().collect();

    Ok(stats)
}

async fn load_queue_entries(deps: &ServerDeps) -> Result<Vec<QueueEntry>> {
    let rows = Incident::find_all_with_reporter(&deps.db_pool).await?;
    Ok(rows.into_iter().map(QueueEntry::from).collect())
}

/// Ranked admin queue
pub async fn triage_queue(filter: &QueueFilter, deps: &ServerDeps) -> Result<Vec<QueueEntry>> {
    let entries = load_queue_entries(deps).await?;
    Ok(build_queue(entries, filter, Utc::now()))
}

/// Dashboard counters over every incident
pub async fn triage_dashboard(deps: &ServerDeps) -> Result<DashboardStats> {
    let entries = load_queue_entries(deps).await?;
    Ok(dashboard_stats(&entries))
}
