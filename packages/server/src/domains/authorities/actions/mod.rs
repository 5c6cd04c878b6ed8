//! Authority actions - lookups and dispatch for a stored incident

mod dispatch;

pub use dispatch::*;
