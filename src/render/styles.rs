//! Static copy, icons and colours keyed by category, criticality and tone.

use colored::Color;

use crate::aggregate::Tone;
use crate::model::{Category, Criticality};

#[derive(Debug, Clone, Copy)]
pub struct CategoryStyle {
    pub title: &'static str,
    pub icon: &'static str,
    pub blurb: &'static str,
    pub css_class: &'static str,
}

pub fn category_style(category: Category) -> CategoryStyle {
    match category {
        Category::Profitability => CategoryStyle {
            title: "Profitability",
            icon: "📈",
            blurb: "Portfolio profitability reconciliations",
            css_class: "cat-profitability",
        },
        Category::Taxes => CategoryStyle {
            title: "Taxes",
            icon: "💲",
            blurb: "Tax and levy reconciliations",
            css_class: "cat-taxes",
        },
        Category::Other => CategoryStyle {
            title: "Other",
            icon: "🗂",
            blurb: "Other operational reconciliations",
            css_class: "cat-other",
        },
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SeverityStyle {
    pub label: &'static str,
    pub color: Color,
    pub css_class: &'static str,
}

pub fn severity_style(criticality: Criticality) -> SeverityStyle {
    match criticality {
        Criticality::Low => SeverityStyle {
            label: "LOW",
            color: Color::BrightBlack,
            css_class: "sev-low",
        },
        Criticality::Medium => SeverityStyle {
            label: "MEDIUM",
            color: Color::Yellow,
            css_class: "sev-medium",
        },
        Criticality::High => SeverityStyle {
            label: "HIGH",
            color: Color::BrightRed,
            css_class: "sev-high",
        },
        Criticality::Critical => SeverityStyle {
            label: "CRITICAL",
            color: Color::Red,
            css_class: "sev-critical",
        },
    }
}

pub fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Success => Color::Green,
        Tone::Warning => Color::Yellow,
        Tone::Danger => Color::Red,
    }
}

pub fn tone_css(tone: Tone) -> &'static str {
    match tone {
        Tone::Success => "tone-success",
        Tone::Warning => "tone-warning",
        Tone::Danger => "tone-danger",
    }
}

pub struct ExistenceStyle {
    pub icon: &'static str,
    pub label: &'static str,
    pub color: Color,
    pub css_class: &'static str,
}

pub fn existence_style(exists: bool) -> ExistenceStyle {
    if exists {
        ExistenceStyle {
            icon: "✓",
            label: "Found",
            color: Color::Green,
            css_class: "found",
        }
    } else {
        ExistenceStyle {
            icon: "✗",
            label: "Not found",
            color: Color::Red,
            css_class: "missing",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_variant_has_distinct_style() {
        let classes: Vec<&str> = Criticality::ALL
            .iter()
            .map(|c| severity_style(*c).css_class)
            .collect();
        let mut deduped = classes.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(classes.len(), deduped.len());

        for category in Category::ALL {
            assert!(!category_style(category).title.is_empty());
        }
    }
}
