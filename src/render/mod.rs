//! Projections of a report (or the dashboard state) into terminal text and HTML.

pub mod html;
pub mod styles;
pub mod terminal;

use chrono::{DateTime, Local};
use indicatif::HumanBytes;
use std::collections::BTreeSet;

use crate::dashboard::Dashboard;
use crate::model::{Category, FileCheckResult};

/// Display settings shared by both renderers.
#[derive(Debug, Clone, Default)]
pub struct ViewOptions {
    pub collapsed: BTreeSet<Category>,
    pub retrieved_at: Option<DateTime<Local>>,
    pub source: Option<String>,
    /// Show key hints for the interactive terminal view.
    pub interactive: bool,
}

impl ViewOptions {
    pub fn from_dashboard(dashboard: &Dashboard) -> Self {
        Self {
            collapsed: dashboard.collapsed().clone(),
            retrieved_at: dashboard.retrieved_at(),
            source: Some(dashboard.source()),
            interactive: false,
        }
    }

    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }
}

pub(crate) const BAR_WIDTH: usize = 20;

/// Number of filled cells for a percentage bar.
pub(crate) fn filled_cells(rate: f64, width: usize) -> usize {
    let rate = if rate.is_finite() { rate.clamp(0.0, 100.0) } else { 0.0 };
    ((rate / 100.0) * width as f64).round() as usize
}

/// Optional "modified / size" details for an item.
pub(crate) fn item_details(item: &FileCheckResult) -> Vec<(&'static str, String)> {
    let mut details = Vec::new();
    if let Some(modified) = item.modified_at {
        details.push(("Modified", modified.format("%Y-%m-%d %H:%M:%S").to_string()));
    }
    if let Some(size) = item.size_bytes {
        details.push(("Size", HumanBytes(size).to_string()));
    }
    details
}

pub(crate) fn format_time(time: DateTime<Local>) -> String {
    time.format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filled_cells_clamps() {
        assert_eq!(filled_cells(0.0, 20), 0);
        assert_eq!(filled_cells(50.0, 20), 10);
        assert_eq!(filled_cells(100.0, 20), 20);
        assert_eq!(filled_cells(150.0, 20), 20);
        assert_eq!(filled_cells(-5.0, 20), 0);
        assert_eq!(filled_cells(f64::NAN, 20), 0);
    }
}
