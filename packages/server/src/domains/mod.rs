pub mod auth;
pub mod authorities;
pub mod citizens;
pub mod incidents;
pub mod notifications;
