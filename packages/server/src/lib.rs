// CityWatch / PulseAI - API Core
//
// Backend for citizen incident reporting: report intake with AI
// classification, admin triage, citizen standing (score + badges) and
// emergency-authority matching.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod server;

pub use config::*;
