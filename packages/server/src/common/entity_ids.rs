//! Typed ids for every persisted entity.

pub use super::id::Id;

pub struct Citizen;
pub struct Incident;
pub struct Notification;
pub struct Dispatch;

pub type CitizenId = Id<Citizen>;
pub type IncidentId = Id<Incident>;
pub type NotificationId = Id<Notification>;
pub type DispatchId = Id<Dispatch>;
