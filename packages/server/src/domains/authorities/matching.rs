//! Pick the services that should handle an incident

use chrono::{DateTime, FixedOffset, Timelike, Utc};
use serde::Serialize;
use std::collections::HashSet;

use crate::common::utils::{round_to, GeoPoint};
use crate::domains::authorities::catalog::{
    rule_for_category, service_catalog, AuthorityRule, EmergencyService, ServiceKind,
};
use crate::domains::authorities::contacts::contacts_as_services;

pub const MAX_MATCHES: usize = 10;

const BASE_RESPONSE_MIN: u32 = 5;
const MIN_RESPONSE_MIN: u32 = 3;
const URGENT_SEVERITY: i32 = 4;
const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// Municipal offices are staffed 9:00 to 18:59 local time
const MUNICIPAL_HOURS: std::ops::RangeInclusive<u32> = 9..=18;

/// A service chosen for an incident, with its distance from the pin
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceMatch {
    #[serde(flatten)]
    pub service: EmergencyService,
    pub distance_km: f64,
    pub estimated_response_min: u32,
    pub priority: u8,
}

/// Rough minutes until a unit arrives
pub fn estimate_response_minutes(distance_km: f64, severity: i32) -> u32 {
    let travel = (distance_km.max(0.0) * 2.0).ceil() as u32;
    let mut minutes = BASE_RESPONSE_MIN + travel;
    if severity >= URGENT_SEVERITY {
        minutes = minutes.saturating_sub(3).max(MIN_RESPONSE_MIN);
    }
    minutes.max(MIN_RESPONSE_MIN)
}

pub fn is_service_available(service: &EmergencyService, hour: u32) -> bool {
    match service.kind {
        ServiceKind::Municipal => MUNICIPAL_HOURS.contains(&hour),
        _ => true,
    }
}

/// Hour of day in Indian Standard Time
pub fn local_hour(now: DateTime<Utc>) -> u32 {
    match FixedOffset::east_opt(IST_OFFSET_SECS) {
        Some(offset) => now.with_timezone(&offset).hour(),
        None => now.hour(),
    }
}

/// A rule type matches the service kind or the lower-cased category. Rule
/// types are snake_case, so they are also compared with spaces.
fn matches_rule_type(service: &EmergencyService, rule_type: &str) -> bool {
    let kind = service.kind.as_str();
    let category = service.category.to_lowercase();
    let spaced = rule_type.replace('_', " ");

    kind.contains(rule_type)
        || category.contains(rule_type)
        || kind.contains(spaced.as_str())
        || category.contains(spaced.as_str())
}

fn matches_rule(service: &EmergencyService, rule: &AuthorityRule) -> bool {
    rule.types.iter().any(|t| matches_rule_type(service, t))
}

fn dedup_key(service: &EmergencyService) -> String {
    format!(
        "{}-{:.4}-{:.4}",
        service.name, service.location.lat, service.location.lng
    )
}

/// Keep the first service per name and 4-decimal position
pub fn dedup_services(matches: Vec<ServiceMatch>) -> Vec<ServiceMatch> {
    let mut seen = HashSet::new();
    matches
        .into_iter()
        .filter(|m| seen.insert(dedup_key(&m.service)))
        .collect()
}

fn sort_matches(matches: &mut [ServiceMatch]) {
    matches.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then(a.distance_km.total_cmp(&b.distance_km))
            .then(b.service.is_available.cmp(&a.service.is_available))
            .then(a.service.response_time_min.cmp(&b.service.response_time_min))
    });
}

/// Services for an incident at `location`, best first, at most ten.
///
/// Falls back to the region's helplines when nothing in range matches.
pub fn find_services(
    location: GeoPoint,
    category: &str,
    severity: i32,
    region: &str,
    hour: u32,
) -> Vec<ServiceMatch> {
    let rule = rule_for_category(category);
    let radius_km = rule.search_radius_km();

    let candidates: Vec<ServiceMatch> = service_catalog()
        .into_iter()
        .filter(|service| matches_rule(service, rule))
        .filter_map(|mut service| {
            let distance = location.distance_km(&service.location);
            if distance > radius_km {
                return None;
            }
            service.is_available = service.is_available && is_service_available(&service, hour);
            let distance_km = round_to(distance, 2);
            Some(ServiceMatch {
                estimated_response_min: estimate_response_minutes(distance_km, severity),
                distance_km,
                priority: rule.priority,
                service,
            })
        })
        .collect();

    let mut matches = dedup_services(candidates);

    if matches.is_empty() {
        tracing::debug!(category = %category, "No services in range, using helplines");
        matches = contacts_as_services(region, location)
            .into_iter()
            .map(|service| ServiceMatch {
                estimated_response_min: estimate_response_minutes(0.0, severity),
                distance_km: 0.0,
                priority: rule.priority,
                service,
            })
            .collect();
    }

    sort_matches(&mut matches);
    matches.truncate(MAX_MATCHES);
    matches
}
