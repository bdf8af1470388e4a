use colored::*;
use console::{pad_str, Alignment};
use std::fmt::Write;

use super::styles::{category_style, existence_style, severity_style, tone_color};
use super::{filled_cells, format_time, item_details, ViewOptions, BAR_WIDTH};
use crate::aggregate::{self, CategoryGroup, Summary};
use crate::dashboard::{Dashboard, Phase};
use crate::model::ReconciliationReport;

const TILE_WIDTH: usize = 16;
const RULE_WIDTH: usize = 72;

/// Render whatever the dashboard currently shows.
pub fn render_dashboard(dashboard: &Dashboard, interactive: bool) -> String {
    let options = ViewOptions::from_dashboard(dashboard).interactive(interactive);
    match dashboard.phase() {
        Phase::Loading => render_loading(&options),
        Phase::Error => render_error(dashboard.last_error(), &options),
        Phase::Ready => match dashboard.snapshot() {
            Some(report) => render_report(&report, &options),
            None => render_loading(&options),
        },
    }
}

pub fn render_loading(options: &ViewOptions) -> String {
    let mut out = header(options);
    let _ = writeln!(out, "\n  {} Loading reconciliation data...", "⟳".blue().bold());
    if options.interactive {
        let _ = writeln!(out, "\n  {} restart load", "[R]".bold());
    }
    out
}

pub fn render_error(message: Option<&str>, options: &ViewOptions) -> String {
    let mut out = header(options);
    out.push('\n');
    match message {
        Some(message) => {
            let _ = writeln!(out, "  {}", "Could not load reconciliation data".red().bold());
            let _ = writeln!(out, "  {}", message.red());
        }
        None => {
            let _ = writeln!(out, "  {}", "No reconciliation data available".dimmed());
        }
    }
    if options.interactive {
        let _ = writeln!(
            out,
            "\n  {} retry   {} dismiss",
            "[r]".bold(),
            "[d]".bold()
        );
    }
    out
}

pub fn render_report(report: &ReconciliationReport, options: &ViewOptions) -> String {
    let summary = aggregate::summarize(report);
    let mut out = header(options);

    if summary.has_critical_problems() {
        render_banner(&mut out, &summary);
    }
    render_tiles(&mut out, &summary);

    for (index, group) in summary.groups.iter().enumerate() {
        render_group(&mut out, index, group, options);
    }

    let _ = writeln!(out, "{}", "─".repeat(RULE_WIDTH).dimmed());
    let _ = writeln!(
        out,
        "  {} {}",
        "Report generated:".dimmed(),
        format_time(report.generated_at()).dimmed()
    );
    out
}

fn header(options: &ViewOptions) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", "Reconciliation Dashboard".bold().blue());
    let mut meta = Vec::new();
    if let Some(source) = &options.source {
        meta.push(format!("Source: {}", source));
    }
    if let Some(retrieved) = options.retrieved_at {
        meta.push(format!("Last update: {}", retrieved.format("%H:%M:%S")));
    }
    if options.interactive {
        meta.push("[r] Refresh  [R] Reload  [q] Quit".to_string());
    }
    if !meta.is_empty() {
        let _ = writeln!(out, "{}", meta.join("   ").dimmed());
    }
    let _ = writeln!(out, "{}", "─".repeat(RULE_WIDTH).dimmed());
    out
}

fn render_banner(out: &mut String, summary: &Summary) {
    let count = summary.critical_problems.len();
    let _ = writeln!(
        out,
        "\n  {} {}",
        "⚠".red().bold(),
        "Critical problems detected".red().bold()
    );
    let _ = writeln!(
        out,
        "    {} critical file(s) not found. Immediate action required.",
        count.to_string().red().bold()
    );
    for problem in &summary.critical_problems {
        let severity = severity_style(problem.criticality);
        let _ = writeln!(
            out,
            "      - {} ({})",
            problem.file_name,
            severity.label.color(severity.color)
        );
    }
}

fn render_tiles(out: &mut String, summary: &Summary) {
    let labels = ["Total files", "Found", "Missing", "Success rate"];
    let label_row: Vec<String> = labels
        .iter()
        .map(|l| pad_str(l, TILE_WIDTH, Alignment::Left, None).into_owned())
        .collect();
    let _ = writeln!(out, "\n  {}", label_row.join(" ").dimmed());

    let rate_color = tone_color(summary.success_tone);
    let values = [
        summary.total_files.to_string().blue().bold(),
        summary.found_count.to_string().green().bold(),
        summary.missing_count.to_string().red().bold(),
        format!("{:.1}%", summary.success_rate).color(rate_color).bold(),
    ];
    let value_row: Vec<String> = values
        .iter()
        .map(|v| pad_str(&v.to_string(), TILE_WIDTH, Alignment::Left, None).into_owned())
        .collect();
    let _ = writeln!(out, "  {}", value_row.join(" "));

    let filled = filled_cells(summary.success_rate, BAR_WIDTH);
    let _ = writeln!(
        out,
        "  {}{}\n",
        "█".repeat(filled).color(rate_color),
        "░".repeat(BAR_WIDTH - filled).dimmed()
    );
}

fn render_group(out: &mut String, index: usize, group: &CategoryGroup, options: &ViewOptions) {
    let style = category_style(group.category);
    let collapsed = options.collapsed.contains(&group.category);
    let marker = if collapsed { "▶" } else { "▼" };
    let key = if options.interactive {
        format!("[{}] ", index + 1)
    } else {
        String::new()
    };

    let _ = writeln!(
        out,
        "{} {}{} {} {}",
        marker,
        key.dimmed(),
        style.icon,
        style.title.bold(),
        format!("({} files)", group.items.len()).dimmed()
    );
    if collapsed {
        return;
    }
    let _ = writeln!(out, "  {}", style.blurb.dimmed());

    for item in &group.items {
        let existence = existence_style(item.exists);
        let severity = severity_style(item.criticality);
        let _ = writeln!(
            out,
            "  {} {} {} {}",
            existence.icon.color(existence.color).bold(),
            item.file_name.bold(),
            format!("[{}]", severity.label).color(severity.color),
            existence.label.color(existence.color)
        );
        if !item.description.is_empty() {
            let _ = writeln!(out, "      {}", item.description);
        }
        let _ = writeln!(out, "      {}", item.full_path.dimmed());
        for (label, value) in item_details(item) {
            let _ = writeln!(out, "      {} {}", format!("{}:", label).dimmed(), value);
        }
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, Criticality, FileCheckResult};
    use chrono::Local;

    fn item(name: &str, exists: bool, criticality: Criticality, category: Category) -> FileCheckResult {
        FileCheckResult {
            file_name: name.to_string(),
            full_path: format!("/recon/{}", name),
            exists,
            criticality,
            category,
            description: format!("{} description", name),
            modified_at: None,
            size_bytes: Some(2048),
        }
    }

    fn plain(text: String) -> String {
        console::strip_ansi_codes(&text).into_owned()
    }

    #[test]
    fn test_report_shows_banner_and_sections() {
        let report = ReconciliationReport::new(
            Local::now(),
            vec![
                item("ir.xlsx", false, Criticality::High, Category::Taxes),
                item("pnl.xlsx", true, Criticality::Low, Category::Profitability),
            ],
        );
        let text = plain(render_report(&report, &ViewOptions::default()));
        assert!(text.contains("Critical problems detected"));
        assert!(text.contains("1 critical file(s) not found"));
        assert!(text.contains("Taxes (1 files)"));
        assert!(text.contains("Profitability (1 files)"));
        assert!(text.contains("50.0%"));
        assert!(text.contains("/recon/ir.xlsx"));
        assert!(text.contains("Size: 2.00 KiB"));
        assert!(text.find("Taxes").unwrap() < text.find("Profitability").unwrap());
    }

    #[test]
    fn test_no_banner_when_all_found() {
        let report = ReconciliationReport::new(
            Local::now(),
            vec![item("a.xlsx", true, Criticality::Critical, Category::Other)],
        );
        let text = plain(render_report(&report, &ViewOptions::default()));
        assert!(!text.contains("Critical problems detected"));
        assert!(text.contains("100.0%"));
    }

    #[test]
    fn test_collapsed_section_hides_items() {
        let report = ReconciliationReport::new(
            Local::now(),
            vec![item("hidden.xlsx", false, Criticality::Medium, Category::Taxes)],
        );
        let mut options = ViewOptions::default();
        options.collapsed.insert(Category::Taxes);
        let text = plain(render_report(&report, &options));
        assert!(text.contains("▶"));
        assert!(!text.contains("/recon/hidden.xlsx"));
    }

    #[test]
    fn test_error_view_shows_retry_hint() {
        let options = ViewOptions::default().interactive(true);
        let text = plain(render_error(Some("service unreachable"), &options));
        assert!(text.contains("service unreachable"));
        assert!(text.contains("[r] retry"));
    }

    #[test]
    fn test_interactive_loading_view_offers_reload() {
        let text = plain(render_loading(&ViewOptions::default().interactive(true)));
        assert!(text.contains("Loading reconciliation data"));
        assert!(text.contains("[R] restart load"));
        assert!(!plain(render_loading(&ViewOptions::default())).contains("[R]"));
    }
}
