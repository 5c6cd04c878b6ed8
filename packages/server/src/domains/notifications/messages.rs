//! Citizen-facing notification texts.

use crate::common::utils::preview;
use crate::common::{CitizenId, IncidentId};
use crate::domains::citizens::standing::{Badge, ACCEPTED_POINTS, REJECTED_POINTS};

use super::models::{NewNotification, NotificationKind};

const PREVIEW_CHARS: usize = 50;

pub fn incident_created(
    citizen_id: CitizenId,
    incident_id: IncidentId,
    description: &str,
) -> NewNotification {
    NewNotification::builder()
        .citizen_id(citizen_id)
        .kind(NotificationKind::IncidentCreated)
        .title("Issue Reported Successfully! 📝")
        .message(format!(
            "Your report \"{}\" has been submitted and is under review.",
            preview(description, PREVIEW_CHARS)
        ))
        .incident_id(incident_id)
        .build()
}

pub fn incident_accepted(
    citizen_id: CitizenId,
    incident_id: IncidentId,
    description: &str,
) -> NewNotification {
    NewNotification::builder()
        .citizen_id(citizen_id)
        .kind(NotificationKind::IncidentAccepted)
        .title("Issue Accepted! 🎉")
        .message(format!(
            "Your report \"{}\" has been accepted and resolved. You earned +{} points!",
            preview(description, PREVIEW_CHARS),
            ACCEPTED_POINTS
        ))
        .incident_id(incident_id)
        .points(ACCEPTED_POINTS)
        .build()
}

pub fn incident_rejected(
    citizen_id: CitizenId,
    incident_id: IncidentId,
    description: &str,
) -> NewNotification {
    NewNotification::builder()
        .citizen_id(citizen_id)
        .kind(NotificationKind::IncidentRejected)
        .title("Issue Rejected ❌")
        .message(format!(
            "Your report \"{}\" was rejected. You lost {} points.",
            preview(description, PREVIEW_CHARS),
            -REJECTED_POINTS
        ))
        .incident_id(incident_id)
        .points(REJECTED_POINTS)
        .build()
}

pub fn incident_in_progress(
    citizen_id: CitizenId,
    incident_id: IncidentId,
    description: &str,
) -> NewNotification {
    NewNotification::builder()
        .citizen_id(citizen_id)
        .kind(NotificationKind::IncidentInProgress)
        .title("Issue Being Worked On 🔧")
        .message(format!(
            "Your report \"{}\" is now being processed by our team.",
            preview(description, PREVIEW_CHARS)
        ))
        .incident_id(incident_id)
        .build()
}

pub fn incident_pending(
    citizen_id: CitizenId,
    incident_id: IncidentId,
    description: &str,
) -> NewNotification {
    NewNotification::builder()
        .citizen_id(citizen_id)
        .kind(NotificationKind::IncidentPending)
        .title("Issue Status Changed ⏳")
        .message(format!(
            "Your report \"{}\" status has been changed to pending for review.",
            preview(description, PREVIEW_CHARS)
        ))
        .incident_id(incident_id)
        .build()
}

pub fn incident_dispatched(
    citizen_id: CitizenId,
    incident_id: IncidentId,
    description: &str,
    authority_name: &str,
) -> NewNotification {
    NewNotification::builder()
        .citizen_id(citizen_id)
        .kind(NotificationKind::IncidentDispatched)
        .title("Authorities Notified 🚨")
        .message(format!(
            "Your report \"{}\" has been routed to {}.",
            preview(description, PREVIEW_CHARS),
            authority_name
        ))
        .incident_id(incident_id)
        .build()
}

pub fn badge_earned(citizen_id: CitizenId, badge: Badge) -> NewNotification {
    NewNotification::builder()
        .citizen_id(citizen_id)
        .kind(NotificationKind::BadgeEarned)
        .title("New Badge Earned! 🏅")
        .message(format!(
            "Congratulations! You've earned the \"{}\" badge!",
            badge.label()
        ))
        .badge(badge.label())
        .build()
}

pub fn admin_recommendation(citizen_id: CitizenId, badge: Badge) -> NewNotification {
    NewNotification::builder()
        .citizen_id(citizen_id)
        .kind(NotificationKind::AdminRecommendation)
        .title("Recommended Citizen ⭐")
        .message(
            "Your reports are now prioritised for city administrators. Keep up the good work!",
        )
        .badge(badge.label())
        .build()
}
