//! Summary metrics derived from a report.
//!
//! Everything here is a pure function of a borrowed `ReconciliationReport`;
//! results borrow items from the report rather than copying them.

use serde::Serialize;

use crate::model::{Category, FileCheckResult, ReconciliationReport};

/// Success rate at or above which the rate tile uses the success tone.
pub const SUCCESS_THRESHOLD: f64 = 90.0;
/// Success rate at or above which the rate tile uses the warning tone.
pub const WARNING_THRESHOLD: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Success,
    Warning,
    Danger,
}

impl Tone {
    pub fn for_rate(rate: f64) -> Tone {
        if rate >= SUCCESS_THRESHOLD {
            Tone::Success
        } else if rate >= WARNING_THRESHOLD {
            Tone::Warning
        } else {
            Tone::Danger
        }
    }
}

/// Items of one category, in report order.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryGroup<'a> {
    pub category: Category,
    pub items: Vec<&'a FileCheckResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Summary<'a> {
    pub total_files: usize,
    pub found_count: usize,
    pub missing_count: usize,
    pub success_rate: f64,
    pub success_tone: Tone,
    pub critical_problems: Vec<&'a FileCheckResult>,
    pub groups: Vec<CategoryGroup<'a>>,
}

impl Summary<'_> {
    pub fn has_critical_problems(&self) -> bool {
        !self.critical_problems.is_empty()
    }
}

/// Percentage of expected files found, in `[0, 100]`; 0 for an empty report.
pub fn success_rate(report: &ReconciliationReport) -> f64 {
    let total = report.total_files();
    if total == 0 {
        return 0.0;
    }
    (report.found_count() as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
}

pub fn critical_problems(report: &ReconciliationReport) -> Vec<&FileCheckResult> {
    report
        .items()
        .iter()
        .filter(|item| !item.exists && item.criticality.is_severe())
        .collect()
}

/// Stable partition by category, groups in first-seen order.
pub fn group_by_category(report: &ReconciliationReport) -> Vec<CategoryGroup<'_>> {
    let mut groups: Vec<CategoryGroup> = Vec::new();
    for item in report.items() {
        match groups.iter_mut().find(|g| g.category == item.category) {
            Some(group) => group.items.push(item),
            None => groups.push(CategoryGroup {
                category: item.category,
                items: vec![item],
            }),
        }
    }
    groups
}

pub fn summarize(report: &ReconciliationReport) -> Summary<'_> {
    let success_rate = success_rate(report);
    Summary {
        total_files: report.total_files(),
        found_count: report.found_count(),
        missing_count: report.missing_count(),
        success_rate,
        success_tone: Tone::for_rate(success_rate),
        critical_problems: critical_problems(report),
        groups: group_by_category(report),
    }
}
