// HTTP routes
pub mod admin;
pub mod authorities;
pub mod citizens;
pub mod health;
pub mod incidents;
pub mod notifications;

pub use health::*;
