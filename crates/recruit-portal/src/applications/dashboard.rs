use std::collections::HashMap;

use chrono::{Days, NaiveDate};
use serde::Serialize;

use super::domain::{ApplicationRecord, ApplicationStatus, Category};
use crate::postings::{JobPosting, PostingStatus};

/// Number of days covered by the application trend, today included.
pub const TREND_WINDOW_DAYS: u64 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: Category,
    pub category_label: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_applications: usize,
    pub pending_scrutiny: usize,
    pub eligible: usize,
    pub selected: usize,
    pub active_postings: usize,
    pub categories: Vec<CategoryCount>,
}

impl DashboardStats {
    pub fn collect(applications: &[ApplicationRecord], postings: &[JobPosting]) -> Self {
        let count = |predicate: fn(ApplicationStatus) -> bool| {
            applications
                .iter()
                .filter(|record| predicate(record.status))
                .count()
        };

        let mut by_category: HashMap<Category, usize> = HashMap::new();
        for category in applications
            .iter()
            .filter_map(|record| record.personal_details.category)
        {
            *by_category.entry(category).or_default() += 1;
        }

        let categories = Category::ordered()
            .into_iter()
            .filter_map(|category| {
                by_category.get(&category).map(|count| CategoryCount {
                    category,
                    category_label: category.label(),
                    count: *count,
                })
            })
            .collect();

        Self {
            total_applications: applications.len(),
            pending_scrutiny: count(|status| status == ApplicationStatus::Submitted),
            eligible: count(ApplicationStatus::is_eligible),
            selected: count(|status| status == ApplicationStatus::Selected),
            active_postings: postings
                .iter()
                .filter(|posting| posting.status == PostingStatus::Published)
                .count(),
            categories,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub day: String,
    pub count: usize,
}

/// Applications created per day over the trend window ending on `today`.
///
/// Days without applications are reported with a zero count.
pub fn daily_trend(applications: &[ApplicationRecord], today: NaiveDate) -> Vec<TrendPoint> {
    let Some(start) = today.checked_sub_days(Days::new(TREND_WINDOW_DAYS - 1)) else {
        return Vec::new();
    };

    let mut per_day: HashMap<NaiveDate, usize> = HashMap::new();
    for record in applications {
        let created = record.created_at.date_naive();
        if created >= start && created <= today {
            *per_day.entry(created).or_default() += 1;
        }
    }

    start
        .iter_days()
        .take_while(|date| *date <= today)
        .map(|date| TrendPoint {
            date,
            day: date.format("%a").to_string(),
            count: per_day.get(&date).copied().unwrap_or(0),
        })
        .collect()
}
