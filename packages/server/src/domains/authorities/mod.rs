//! Authorities domain - who should handle an incident and how to reach them

pub mod actions;
pub mod catalog;
pub mod contacts;
pub mod matching;
pub mod models;

pub use catalog::{AuthorityRule, EmergencyService, ServiceKind};
pub use contacts::{emergency_contacts, EmergencyContact};
pub use matching::{find_services, ServiceMatch};
pub use models::Dispatch;
