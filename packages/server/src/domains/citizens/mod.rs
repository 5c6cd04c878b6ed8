pub mod models;
pub mod standing;

pub use models::Citizen;
pub use standing::{Badge, ReportOutcome, Standing};
