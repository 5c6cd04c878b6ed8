//! Incident domain - citizen reports, AI classification and admin triage

pub mod actions;
pub mod classification;
pub mod data;
pub mod errors;
pub mod models;
pub mod triage;

pub use data::{IncidentData, ReportForm, StatusChange};
pub use errors::ReportError;
pub use models::{AiAnalysis, Incident, IncidentStatus, Location, PriorityLevel};
