//! Static authority rules and the emergency-service directory

use serde::{Deserialize, Serialize};

use crate::common::utils::GeoPoint;

/// Which service types handle a category, how urgent they are and how far
/// to look for them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorityRule {
    pub category: &'static str,
    pub types: &'static [&'static str],
    /// Lower is more urgent
    pub priority: u8,
    pub search_radius_m: u32,
}

impl AuthorityRule {
    pub fn search_radius_km(&self) -> f64 {
        f64::from(self.search_radius_m) / 1000.0
    }
}

pub const FALLBACK_CATEGORY: &str = "Other";

pub const AUTHORITY_RULES: [AuthorityRule; 7] = [
    AuthorityRule {
        category: "Public Unrest",
        types: &["police", "law_enforcement"],
        priority: 1,
        search_radius_m: 5000,
    },
    AuthorityRule {
        category: "Infrastructure",
        types: &["municipal", "public_works", "city_services"],
        priority: 2,
        search_radius_m: 3000,
    },
    AuthorityRule {
        category: "Environmental",
        types: &["environmental_protection", "waste_management", "health_department"],
        priority: 2,
        search_radius_m: 4000,
    },
    AuthorityRule {
        category: "Traffic",
        types: &["traffic_police", "transport_department", "traffic_control"],
        priority: 1,
        search_radius_m: 3000,
    },
    AuthorityRule {
        category: "Health",
        types: &["hospital", "emergency_medical", "health_department"],
        priority: 1,
        search_radius_m: 5000,
    },
    AuthorityRule {
        category: "Safety",
        types: &["fire_department", "emergency_services", "safety_inspectorate"],
        priority: 1,
        search_radius_m: 5000,
    },
    AuthorityRule {
        category: FALLBACK_CATEGORY,
        types: &["municipal", "general_administration", "city_services"],
        priority: 3,
        search_radius_m: 3000,
    },
];

/// Rule for an incident category. Unknown categories get the `Other` rule.
pub fn rule_for_category(category: &str) -> &'static AuthorityRule {
    AUTHORITY_RULES
        .iter()
        .find(|r| r.category == category)
        .or_else(|| AUTHORITY_RULES.iter().find(|r| r.category == FALLBACK_CATEGORY))
        .unwrap_or(&AUTHORITY_RULES[AUTHORITY_RULES.len() - 1])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    Police,
    Fire,
    Hospital,
    Ambulance,
    Municipal,
    Traffic,
    Environmental,
    Other,
}

impl ServiceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceKind::Police => "police",
            ServiceKind::Fire => "fire",
            ServiceKind::Hospital => "hospital",
            ServiceKind::Ambulance => "ambulance",
            ServiceKind::Municipal => "municipal",
            ServiceKind::Traffic => "traffic",
            ServiceKind::Environmental => "environmental",
            ServiceKind::Other => "other",
        }
    }
}

/// Directory entry for an emergency or civic service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmergencyService {
    pub id: String,
    pub name: String,
    pub kind: ServiceKind,
    pub category: String,
    pub phone: String,
    pub emergency_phone: Option<String>,
    pub address: String,
    pub location: GeoPoint,
    pub response_time_min: u32,
    pub is_available: bool,
    pub rating: Option<f32>,
    pub website: Option<String>,
}

struct ServiceSeed {
    id: &'static str,
    name: &'static str,
    kind: ServiceKind,
    category: &'static str,
    phone: &'static str,
    emergency_phone: Option<&'static str>,
    address: &'static str,
    lat: f64,
    lng: f64,
    response_time_min: u32,
    rating: f32,
    website: Option<&'static str>,
}

const DELHI_SERVICES: [ServiceSeed; 11] = [
    ServiceSeed {
        id: "police_001",
        name: "Central Police Station",
        kind: ServiceKind::Police,
        category: "Law Enforcement",
        phone: "+91-11-23469400",
        emergency_phone: Some("100"),
        address: "Connaught Place, New Delhi, Delhi 110001",
        lat: 28.6139,
        lng: 77.2090,
        response_time_min: 5,
        rating: 4.2,
        website: Some("https://delhipolice.gov.in"),
    },
    ServiceSeed {
        id: "police_002",
        name: "Traffic Police Control Room",
        kind: ServiceKind::Traffic,
        category: "Traffic Control",
        phone: "+91-11-23469400",
        emergency_phone: Some("100"),
        address: "ITO, New Delhi, Delhi 110002",
        lat: 28.6329,
        lng: 77.2197,
        response_time_min: 8,
        rating: 4.0,
        website: None,
    },
    ServiceSeed {
        id: "police_003",
        name: "Cyber Crime Police Station",
        kind: ServiceKind::Police,
        category: "Cyber Security",
        phone: "+91-11-23469400",
        emergency_phone: Some("100"),
        address: "Cyber Crime Unit, New Delhi, Delhi 110001",
        lat: 28.6139,
        lng: 77.2090,
        response_time_min: 12,
        rating: 4.1,
        website: None,
    },
    ServiceSeed {
        id: "fire_001",
        name: "Delhi Fire Service Headquarters",
        kind: ServiceKind::Fire,
        category: "Emergency Services",
        phone: "+91-11-23469400",
        emergency_phone: Some("101"),
        address: "Connaught Place, New Delhi, Delhi 110001",
        lat: 28.6139,
        lng: 77.2090,
        response_time_min: 6,
        rating: 4.5,
        website: None,
    },
    ServiceSeed {
        id: "fire_002",
        name: "Delhi Fire Station - Dwarka",
        kind: ServiceKind::Fire,
        category: "Emergency Services",
        phone: "+91-11-23469400",
        emergency_phone: Some("101"),
        address: "Sector 12, Dwarka, New Delhi, Delhi 110075",
        lat: 28.5684,
        lng: 77.0585,
        response_time_min: 8,
        rating: 4.3,
        website: None,
    },
    ServiceSeed {
        id: "hospital_001",
        name: "All India Institute of Medical Sciences (AIIMS)",
        kind: ServiceKind::Hospital,
        category: "Emergency Medical Services",
        phone: "+91-11-26588500",
        emergency_phone: Some("102"),
        address: "Sri Aurobindo Marg, Ansari Nagar, New Delhi, Delhi 110029",
        lat: 28.5676,
        lng: 77.2090,
        response_time_min: 10,
        rating: 4.8,
        website: Some("https://www.aiims.edu"),
    },
    ServiceSeed {
        id: "hospital_002",
        name: "Safdarjung Hospital",
        kind: ServiceKind::Hospital,
        category: "Emergency Medical Services",
        phone: "+91-11-26707444",
        emergency_phone: Some("102"),
        address: "Ansari Nagar West, New Delhi, Delhi 110029",
        lat: 28.5676,
        lng: 77.2090,
        response_time_min: 12,
        rating: 4.5,
        website: None,
    },
    ServiceSeed {
        id: "municipal_001",
        name: "New Delhi Municipal Council",
        kind: ServiceKind::Municipal,
        category: "Municipal Corporation",
        phone: "+91-11-23469400",
        emergency_phone: None,
        address: "Palika Kendra, Sansad Marg, New Delhi, Delhi 110001",
        lat: 28.6139,
        lng: 77.2090,
        response_time_min: 15,
        rating: 3.8,
        website: Some("https://www.ndmc.gov.in"),
    },
    ServiceSeed {
        id: "municipal_002",
        name: "Delhi Development Authority",
        kind: ServiceKind::Municipal,
        category: "Urban Development",
        phone: "+91-11-23469400",
        emergency_phone: None,
        address: "Vikas Sadan, INA, New Delhi, Delhi 110023",
        lat: 28.5676,
        lng: 77.2090,
        response_time_min: 20,
        rating: 3.5,
        website: Some("https://dda.org.in"),
    },
    ServiceSeed {
        id: "environmental_001",
        name: "Delhi Pollution Control Committee",
        kind: ServiceKind::Environmental,
        category: "Environmental Protection",
        phone: "+91-11-23469400",
        emergency_phone: None,
        address: "ISBT Building, Kashmere Gate, New Delhi, Delhi 110006",
        lat: 28.6682,
        lng: 77.2285,
        response_time_min: 25,
        rating: 3.9,
        website: None,
    },
    ServiceSeed {
        id: "traffic_001",
        name: "Delhi Traffic Police Headquarters",
        kind: ServiceKind::Traffic,
        category: "Traffic Management",
        phone: "+91-11-23469400",
        emergency_phone: Some("100"),
        address: "ITO, New Delhi, Delhi 110002",
        lat: 28.6329,
        lng: 77.2197,
        response_time_min: 8,
        rating: 4.0,
        website: None,
    },
];

impl From<&ServiceSeed> for EmergencyService {
    fn from(seed: &ServiceSeed) -> Self {
        Self {
            id: seed.id.to_string(),
            name: seed.name.to_string(),
            kind: seed.kind,
            category: seed.category.to_string(),
            phone: seed.phone.to_string(),
            emergency_phone: seed.emergency_phone.map(str::to_string),
            address: seed.address.to_string(),
            location: GeoPoint::new(seed.lat, seed.lng),
            response_time_min: seed.response_time_min,
            is_available: true,
            rating: Some(seed.rating),
            website: seed.website.map(str::to_string),
        }
    }
}

/// The built-in service directory
pub fn service_catalog() -> Vec<EmergencyService> {
    DELHI_SERVICES.iter().map(EmergencyService::from).collect()
}

pub fn find_service(id: &str) -> Option<EmergencyService> {
    DELHI_SERVICES
        .iter()
        .find(|s| s.id == id)
        .map(EmergencyService::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_eleven_services() {
        let catalog = service_catalog();
        assert_eq!(catalog.len(), 11);
        assert!(catalog.iter().all(|s| s.location.is_valid()));
    }

    #[test]
    fn test_unknown_category_uses_other_rule() {
        assert_eq!(rule_for_category("Water Issue").category, "Other");
        assert_eq!(rule_for_category("Traffic").priority, 1);
        assert_eq!(rule_for_category("Environmental").search_radius_km(), 4.0);
    }

    #[test]
    fn test_find_service() {
        let aiims = find_service("hospital_001").unwrap();
        assert_eq!(aiims.emergency_phone.as_deref(), Some("102"));
        assert!(find_service("hospital_999").is_none());
    }
}
