//! Incident actions - business logic called from the REST handlers

mod analyze;
mod queries;
mod submit_report;
mod update_status;

pub use analyze::*;
pub use queries::*;
pub use submit_report::*;
pub use update_status::*;
