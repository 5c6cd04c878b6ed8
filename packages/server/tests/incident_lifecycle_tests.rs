//! Report lifecycle against a real database: submission, admin decisions,
//! scoring, badges and background classification.

mod common;

use crate::common::*;
use server_core::common::{CitizenId, IncidentId};
use server_core::domains::citizens::standing::{Badge, ReportOutcome};
use server_core::domains::citizens::Citizen;
use server_core::domains::incidents::actions::{
    submit_report, update_status, ANALYSIS_ERROR_MESSAGE,
};
use server_core::domains::incidents::{
    Incident, IncidentStatus, PriorityLevel, ReportError,
};
use server_core::kernel::MockAI;
use test_context::test_context;

async fn citizen_after(ctx: &TestHarness, citizen: &Citizen) -> Citizen {
    Citizen::find_by_id(citizen.id, &ctx.db_pool)
        .await
        .unwrap()
        .unwrap()
}

// ============================================================================
// Submission
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn test_submit_report_stores_pending_incident(ctx: &TestHarness) {
    let ai = MockAI::new();
    let deps = ctx.deps(ai.clone());
    let citizen = create_citizen(&ctx.db_pool, "Anita", 0).await.unwrap();

    let incident = submit_report(
        &citizen,
        analysed_form("  Transformer sparking near the school gate  ", "power outage", 4.6),
        &deps,
    )
    .await
    .unwrap();

    assert_eq!(incident.description, "Transformer sparking near the school gate");
    assert_eq!(incident.status(), IncidentStatus::Pending);
    assert_eq!(incident.category, "Power Outage");
    assert_eq!(incident.severity, 5);
    assert_eq!(incident.priority(), PriorityLevel::Critical);
    assert_eq!(incident.reporter_name, "Anita");

    let updated = citizen_after(ctx, &citizen).await;
    assert_eq!(updated.total_reports, 1);
    assert_eq!(updated.score, 0);

    assert_eq!(
        notification_kinds(&ctx.db_pool, citizen.id).await.unwrap(),
        vec!["incident_created"]
    );

    // client-side analysis means no classifier call
    ctx.settle().await;
    assert_eq!(ai.call_count(), 0);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_suspended_citizen_cannot_report(ctx: &TestHarness) {
    let deps = ctx.deps(MockAI::new());
    let citizen = create_citizen(&ctx.db_pool, "Vikram", -81).await.unwrap();

    let result = submit_report(&citizen, analysed_form("Noise", "Other", 1.0), &deps).await;

    assert!(matches!(result, Err(ReportError::Suspended { score: -81 })));
    assert!(Incident::find_by_citizen(citizen.id, &ctx.db_pool)
        .await
        .unwrap()
        .is_empty());
    assert_eq!(citizen_after(ctx, &citizen).await.total_reports, 0);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_warning_zone_citizen_can_still_report(ctx: &TestHarness) {
    let deps = ctx.deps(MockAI::new());
    let citizen = create_citizen(&ctx.db_pool, "Farah", -80).await.unwrap();

    let result = submit_report(&citizen, analysed_form("Open manhole", "Infrastructure", 3.0), &deps).await;

    assert!(result.is_ok());
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_blank_description_is_rejected(ctx: &TestHarness) {
    let deps = ctx.deps(MockAI::new());
    let citizen = create_citizen(&ctx.db_pool, "Joseph", 10).await.unwrap();

    let result = submit_report(&citizen, analysed_form("   ", "Other", 2.0), &deps).await;

    assert!(matches!(result, Err(ReportError::EmptyDescription)));
}

// ============================================================================
// Admin decisions
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn test_resolving_awards_points_and_new_badge(ctx: &TestHarness) {
    let deps = ctx.deps(MockAI::new());
    let admin = create_citizen(&ctx.db_pool, "Admin", 0).await.unwrap();
    let citizen = create_citizen(&ctx.db_pool, "Priya", 20).await.unwrap();
    let incident = submit_report(&citizen, analysed_form("Fallen tree on road", "Traffic", 3.0), &deps)
        .await
        .unwrap();

    let change = update_status(
        incident.id,
        IncidentStatus::Resolved,
        Some("Cleared by NDMC"),
        admin.id,
        &deps,
    )
    .await
    .unwrap();

    assert_eq!(change.previous_status, IncidentStatus::Pending);
    assert_eq!(change.outcome, Some(ReportOutcome::Accepted));
    assert_eq!(change.new_badge, Some(Badge::Bronze));
    assert_eq!(change.incident.admin_notes.as_deref(), Some("Cleared by NDMC"));
    assert_eq!(change.incident.status_changed_by, Some(admin.id));

    let updated = citizen_after(ctx, &citizen).await;
    assert_eq!(updated.score, 30);
    assert_eq!(updated.badge, "🥉 Bronze Citizen");
    assert_eq!(updated.accepted_reports, 1);
    assert_eq!(updated.rejected_reports, 0);
    // counted once, at submission
    assert_eq!(updated.total_reports, 1);

    assert_eq!(
        notification_kinds(&ctx.db_pool, citizen.id).await.unwrap(),
        vec!["incident_created", "incident_accepted", "badge_earned"]
    );
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_reaching_gold_recommends_citizen(ctx: &TestHarness) {
    let deps = ctx.deps(MockAI::new());
    let admin = create_citizen(&ctx.db_pool, "Admin", 0).await.unwrap();
    let citizen = create_citizen(&ctx.db_pool, "Rohan", 70).await.unwrap();
    let incident = submit_report(&citizen, analysed_form("Broken signal", "Traffic", 4.0), &deps)
        .await
        .unwrap();

    update_status(incident.id, IncidentStatus::Resolved, None, admin.id, &deps)
        .await
        .unwrap();

    let updated = citizen_after(ctx, &citizen).await;
    assert_eq!(updated.badge(), Badge::Gold);
    assert!(updated.is_recommended);

    let kinds = notification_kinds(&ctx.db_pool, citizen.id).await.unwrap();
    assert!(kinds.contains(&"admin_recommendation".to_string()));

    let recommended = Citizen::find_recommended(&ctx.db_pool).await.unwrap();
    assert!(recommended.iter().any(|c| c.id == citizen.id));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_rejection_can_suspend_reporter(ctx: &TestHarness) {
    let deps = ctx.deps(MockAI::new());
    let admin = create_citizen(&ctx.db_pool, "Admin", 0).await.unwrap();
    let citizen = create_citizen(&ctx.db_pool, "Sameer", -70).await.unwrap();
    let incident = submit_report(&citizen, analysed_form("Fake fire alarm", "Other", 5.0), &deps)
        .await
        .unwrap();

    let change = update_status(incident.id, IncidentStatus::Rejected, None, admin.id, &deps)
        .await
        .unwrap();

    assert_eq!(change.outcome, Some(ReportOutcome::Rejected));
    let standing = change.reporter_standing.unwrap();
    assert_eq!(standing.score, -90);
    assert!(standing.is_suspended);
    assert_eq!(change.new_badge, Some(Badge::Suspended));

    let updated = citizen_after(ctx, &citizen).await;
    assert_eq!(updated.rejected_reports, 1);
    assert_eq!(updated.badge, "🚫 Suspended Citizen");

    let again = submit_report(&updated, analysed_form("Another one", "Other", 1.0), &deps).await;
    assert!(matches!(again, Err(ReportError::Suspended { .. })));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_repeating_status_has_no_effect(ctx: &TestHarness) {
    let deps = ctx.deps(MockAI::new());
    let admin = create_citizen(&ctx.db_pool, "Admin", 0).await.unwrap();
    let citizen = create_citizen(&ctx.db_pool, "Lakshmi", 0).await.unwrap();
    let incident = submit_report(&citizen, analysed_form("Water logging", "Water Issue", 3.0), &deps)
        .await
        .unwrap();

    update_status(incident.id, IncidentStatus::Resolved, None, admin.id, &deps)
        .await
        .unwrap();
    let second = update_status(incident.id, IncidentStatus::Resolved, None, admin.id, &deps)
        .await
        .unwrap();

    assert_eq!(second.previous_status, IncidentStatus::Resolved);
    assert!(second.outcome.is_none());

    let updated = citizen_after(ctx, &citizen).await;
    assert_eq!(updated.score, 10);
    assert_eq!(updated.accepted_reports, 1);
    assert_eq!(
        notification_kinds(&ctx.db_pool, citizen.id)
            .await
            .unwrap()
            .iter()
            .filter(|k| *k == "incident_accepted")
            .count(),
        1
    );
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_rejecting_resolved_report_scores_again(ctx: &TestHarness) {
    let deps = ctx.deps(MockAI::new());
    let admin = create_citizen(&ctx.db_pool, "Admin", 0).await.unwrap();
    let citizen = create_citizen(&ctx.db_pool, "Kavya", 0).await.unwrap();
    let incident = submit_report(&citizen, analysed_form("Open manhole", "Infrastructure", 4.0), &deps)
        .await
        .unwrap();

    let resolved = update_status(incident.id, IncidentStatus::Resolved, None, admin.id, &deps)
        .await
        .unwrap();
    assert_eq!(resolved.outcome, Some(ReportOutcome::Accepted));
    assert_eq!(resolved.new_badge, None);

    let rejected = update_status(incident.id, IncidentStatus::Rejected, None, admin.id, &deps)
        .await
        .unwrap();
    assert_eq!(rejected.previous_status, IncidentStatus::Resolved);
    assert_eq!(rejected.outcome, Some(ReportOutcome::Rejected));
    assert_eq!(rejected.new_badge, Some(Badge::Warning));

    let updated = citizen_after(ctx, &citizen).await;
    assert_eq!(updated.score, -10);
    assert_eq!(updated.accepted_reports, 1);
    assert_eq!(updated.rejected_reports, 1);
    assert_eq!(updated.badge, "⚠️ Warning Citizen");
    assert!(updated.standing().is_in_warning_zone);

    // 10 points still reads as New Citizen, so only the drop to Warning is a badge change
    assert_eq!(
        notification_kinds(&ctx.db_pool, citizen.id).await.unwrap(),
        vec![
            "incident_created",
            "incident_accepted",
            "incident_rejected",
            "badge_earned",
        ]
    );
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_in_progress_only_notifies(ctx: &TestHarness) {
    let deps = ctx.deps(MockAI::new());
    let admin = create_citizen(&ctx.db_pool, "Admin", 0).await.unwrap();
    let citizen = create_citizen(&ctx.db_pool, "Deepa", 40).await.unwrap();
    let incident = submit_report(&citizen, analysed_form("Garbage not collected", "Other", 2.0), &deps)
        .await
        .unwrap();

    let change = update_status(incident.id, IncidentStatus::InProgress, None, admin.id, &deps)
        .await
        .unwrap();

    assert!(change.outcome.is_none());
    assert_eq!(citizen_after(ctx, &citizen).await.score, 40);
    assert_eq!(
        notification_kinds(&ctx.db_pool, citizen.id).await.unwrap(),
        vec!["incident_created", "incident_in_progress"]
    );
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_unknown_incident_is_not_found(ctx: &TestHarness) {
    let deps = ctx.deps(MockAI::new());
    let admin = create_citizen(&ctx.db_pool, "Admin", 0).await.unwrap();

    let result = update_status(
        IncidentId::new(),
        IncidentStatus::Resolved,
        None,
        admin.id,
        &deps,
    )
    .await;

    assert!(matches!(result, Err(ReportError::IncidentNotFound(_))));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_outcome_for_missing_citizen_changes_nothing(ctx: &TestHarness) {
    let mut conn = ctx.db_pool.acquire().await.unwrap();

    let result = Citizen::apply_outcome(CitizenId::new(), ReportOutcome::Accepted, &mut conn)
        .await
        .unwrap();

    assert!(result.is_none());
}

// ============================================================================
// Background classification
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn test_background_analysis_is_written_back(ctx: &TestHarness) {
    let ai = MockAI::always(
        "```json\n{\"summary\": \"Burst pipe flooding lane\", \"category\": \"Water Issue\", \"severity\": 4}\n```",
    );
    let deps = ctx.deps(ai.clone());
    let citizen = create_citizen(&ctx.db_pool, "Imran", 0).await.unwrap();

    let incident = submit_report(&citizen, bare_form("Water everywhere in lane 3"), &deps)
        .await
        .unwrap();
    assert_eq!(incident.summary, "Manual analysis");
    assert_eq!(incident.severity, 3);

    ctx.settle().await;

    let stored = Incident::find_by_id(incident.id, &ctx.db_pool)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.summary, "Burst pipe flooding lane");
    assert_eq!(stored.category, "Water Issue");
    assert_eq!(stored.severity, 4);
    assert_eq!(stored.priority(), PriorityLevel::High);
    assert!(stored.analysis_error.is_none());
    assert_eq!(ai.call_count(), 1);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn test_failed_analysis_records_error(ctx: &TestHarness) {
    let deps = ctx.deps(MockAI::new().with_failure("503 from upstream"));
    let citizen = create_citizen(&ctx.db_pool, "Neha", 0).await.unwrap();

    let incident = submit_report(&citizen, bare_form("Strange smell from drain"), &deps)
        .await
        .unwrap();

    ctx.settle().await;

    let stored = Incident::find_by_id(incident.id, &ctx.db_pool)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.analysis_error.as_deref(), Some(ANALYSIS_ERROR_MESSAGE));
    assert_eq!(stored.severity, 3);
    assert_eq!(stored.category, "Other");
}

// ============================================================================
// Report counters
// ============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn test_sync_total_reports_repairs_drift(ctx: &TestHarness) {
    let deps = ctx.deps(MockAI::new());
    let citizen = create_citizen(&ctx.db_pool, "Gurpreet", 0).await.unwrap();
    submit_report(&citizen, analysed_form("Pothole", "Infrastructure", 2.0), &deps)
        .await
        .unwrap();

    sqlx::query("UPDATE citizens SET total_reports = 7 WHERE id = $1")
        .bind(citizen.id)
        .execute(&ctx.db_pool)
        .await
        .unwrap();

    let changed = Citizen::sync_total_reports(&ctx.db_pool).await.unwrap();

    assert!(changed >= 1);
    assert_eq!(citizen_after(ctx, &citizen).await.total_reports, 1);
}
