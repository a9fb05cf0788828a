use chrono::{NaiveDate, TimeZone, Utc};

use super::common::*;
use crate::access::UserId;
use crate::applications::{
    daily_trend, ApplicationId, ApplicationRecord, ApplicationStatus, Category, DashboardStats,
    PersonalDetails,
};
use crate::forms::ApplicationValueSet;
use crate::postings::{PostingId, PostingStatus};

fn record(
    suffix: &str,
    status: ApplicationStatus,
    category: Option<Category>,
    created: (i32, u32, u32),
) -> ApplicationRecord {
    let created_at = Utc
        .with_ymd_and_hms(created.0, created.1, created.2, 9, 30, 0)
        .single()
        .expect("valid timestamp");
    ApplicationRecord {
        id: ApplicationId(format!("app-{suffix}")),
        application_number: format!("SERC-2026-{suffix}"),
        applicant: UserId(format!("user-{suffix}")),
        posting: PostingId::new("to-2026-01"),
        status,
        personal_details: PersonalDetails {
            category,
            ..PersonalDetails::default()
        },
        education: Vec::new(),
        experience: Vec::new(),
        statement_of_purpose: None,
        values: ApplicationValueSet::new(),
        last_assessment: None,
        submitted_at: None,
        remarks: None,
        created_at,
        updated_at: created_at,
        revision: 0,
    }
}

#[test]
fn stats_group_statuses_and_categories() {
    let applications = vec![
        record("1", ApplicationStatus::Draft, Some(Category::Gen), (2026, 3, 1)),
        record("2", ApplicationStatus::Submitted, Some(Category::Sc), (2026, 3, 2)),
        record("3", ApplicationStatus::Submitted, None, (2026, 3, 2)),
        record("4", ApplicationStatus::EligibleWritten, Some(Category::Gen), (2026, 3, 3)),
        record("5", ApplicationStatus::EligibleInterview, Some(Category::Pwd), (2026, 3, 3)),
        record("6", ApplicationStatus::Selected, Some(Category::Gen), (2026, 3, 4)),
    ];
    let postings = vec![
        posting("p-1", PostingStatus::Published),
        posting("p-2", PostingStatus::Published),
        posting("p-3", PostingStatus::ScrutinyInProgress),
        posting("p-4", PostingStatus::Draft),
    ];

    let stats = DashboardStats::collect(&applications, &postings);

    assert_eq!(stats.total_applications, 6);
    assert_eq!(stats.pending_scrutiny, 2);
    assert_eq!(stats.eligible, 2);
    assert_eq!(stats.selected, 1);
    assert_eq!(stats.active_postings, 2);

    let categories: Vec<(&str, usize)> = stats
        .categories
        .iter()
        .map(|entry| (entry.category_label, entry.count))
        .collect();
    assert_eq!(categories, vec![("GEN", 3), ("SC", 1), ("PWD", 1)]);
}

#[test]
fn trend_covers_seven_days_with_zero_fill() {
    let today = NaiveDate::from_ymd_opt(2026, 3, 10).expect("valid date");
    let applications = vec![
        record("1", ApplicationStatus::Draft, None, (2026, 3, 3)),
        record("2", ApplicationStatus::Draft, None, (2026, 3, 4)),
        record("3", ApplicationStatus::Submitted, None, (2026, 3, 4)),
        record("4", ApplicationStatus::Submitted, None, (2026, 3, 10)),
        record("5", ApplicationStatus::Submitted, None, (2026, 3, 11)),
    ];

    let trend = daily_trend(&applications, today);

    assert_eq!(trend.len(), 7);
    assert_eq!(trend[0].date, NaiveDate::from_ymd_opt(2026, 3, 4).expect("valid"));
    assert_eq!(trend[0].day, "Wed");
    assert_eq!(trend[0].count, 2);
    assert_eq!(trend[6].date, today);
    assert_eq!(trend[6].day, "Tue");
    assert_eq!(trend[6].count, 1);
    let total: usize = trend.iter().map(|point| point.count).sum();
    assert_eq!(total, 3);
}

#[test]
fn lifecycle_moves_one_stage_at_a_time() {
    use ApplicationStatus::*;

    assert!(Draft.can_transition_to(Submitted));
    assert!(Submitted.can_transition_to(UnderScrutiny));
    assert!(UnderScrutiny.can_transition_to(ScrutinyCompleted));
    assert!(ScrutinyCompleted.can_transition_to(EligibleWritten));
    assert!(ScrutinyCompleted.can_transition_to(NotEligible));
    assert!(EligibleWritten.can_transition_to(EligibleInterview));
    assert!(EligibleInterview.can_transition_to(Selected));
    assert!(EligiblePractical.can_transition_to(Rejected));

    assert!(!Draft.can_transition_to(UnderScrutiny));
    assert!(!Submitted.can_transition_to(Selected));
    assert!(!NotEligible.can_transition_to(Selected));
    assert!(!EligibleInterview.can_transition_to(EligibleWritten));
    assert!(!Selected.can_transition_to(Rejected));
}
