pub mod citizen;

pub use citizen::*;
