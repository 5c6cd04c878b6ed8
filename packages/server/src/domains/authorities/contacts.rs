//! National emergency helplines

use serde::Serialize;

use crate::common::utils::GeoPoint;
use crate::domains::authorities::catalog::{EmergencyService, ServiceKind};

pub const DEFAULT_REGION: &str = "india";

/// Category given to helplines shown as pseudo-services
pub const CONTACT_CATEGORY: &str = "Emergency Contact";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EmergencyContact {
    pub name: &'static str,
    pub number: &'static str,
}

const INDIA_CONTACTS: [EmergencyContact; 8] = [
    EmergencyContact { name: "Police", number: "100" },
    EmergencyContact { name: "Fire", number: "101" },
    EmergencyContact { name: "Ambulance", number: "102" },
    EmergencyContact { name: "Women Helpline", number: "1091" },
    EmergencyContact { name: "Child Helpline", number: "1098" },
    EmergencyContact { name: "Senior Citizen Helpline", number: "14567" },
    EmergencyContact { name: "Railway Helpline", number: "139" },
    EmergencyContact { name: "Tourist Helpline", number: "1363" },
];

/// Helplines for `region`. India is the only directory, so every region
/// resolves to it.
pub fn emergency_contacts(region: &str) -> &'static [EmergencyContact] {
    if !region.trim().eq_ignore_ascii_case(DEFAULT_REGION) {
        tracing::debug!(region = %region, "No helpline directory for region, using india");
    }
    &INDIA_CONTACTS
}

fn contact_id(contact: &EmergencyContact) -> String {
    format!(
        "contact_{}",
        contact.name.to_ascii_lowercase().replace(' ', "_")
    )
}

/// Helplines shaped as services, used when nothing nearby matches
pub fn contacts_as_services(region: &str, at: GeoPoint) -> Vec<EmergencyService> {
    emergency_contacts(region)
        .iter()
        .map(|contact| EmergencyService {
            id: contact_id(contact),
            name: contact.name.to_string(),
            kind: ServiceKind::Other,
            category: CONTACT_CATEGORY.to_string(),
            phone: contact.number.to_string(),
            emergency_phone: Some(contact.number.to_string()),
            address: "National helpline".to_string(),
            location: at,
            response_time_min: 0,
            is_available: true,
            rating: None,
            website: None,
        })
        .collect()
}

pub fn find_contact_service(region: &str, id: &str, at: GeoPoint) -> Option<EmergencyService> {
    contacts_as_services(region, at)
        .into_iter()
        .find(|s| s.id == id)
}
