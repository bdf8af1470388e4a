use maud::{html, Markup, PreEscaped, DOCTYPE};

use super::styles::{category_style, existence_style, severity_style, tone_css};
use super::{filled_cells, format_time, item_details, ViewOptions};
use crate::aggregate::{self, CategoryGroup, Summary};
use crate::dashboard::{Dashboard, Phase};
use crate::model::{FileCheckResult, ReconciliationReport};

const STYLESHEET: &str = r#"
body { font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; margin: 0; padding: 20px; background: #eef2fb; color: #1f2937; }
.container { max-width: 1200px; margin: 0 auto; }
header.top { display: flex; justify-content: space-between; align-items: center; background: white; padding: 16px 24px; border-radius: 10px; box-shadow: 0 1px 4px rgba(0,0,0,0.08); margin-bottom: 24px; }
header.top h1 { margin: 0; font-size: 1.5em; }
header.top small { color: #6b7280; }
.alert { border: 1px solid #fecaca; background: #fef2f2; color: #991b1b; padding: 14px 18px; border-radius: 8px; margin-bottom: 24px; }
.alert h2 { margin: 0 0 6px 0; font-size: 1.05em; }
.tiles { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 20px; margin-bottom: 28px; }
.tile { color: white; padding: 18px; border-radius: 8px; }
.tile .value { font-size: 2em; font-weight: bold; }
.tile .label { font-size: 0.9em; opacity: 0.9; }
.tile.total { background: linear-gradient(135deg, #3b82f6, #2563eb); }
.tile.found { background: linear-gradient(135deg, #22c55e, #16a34a); }
.tile.missing { background: linear-gradient(135deg, #ef4444, #dc2626); }
.tile.tone-success { background: linear-gradient(135deg, #22c55e, #16a34a); }
.tile.tone-warning { background: linear-gradient(135deg, #eab308, #ca8a04); }
.tile.tone-danger { background: linear-gradient(135deg, #ef4444, #dc2626); }
.bar { background: rgba(255,255,255,0.25); height: 8px; border-radius: 4px; margin-top: 8px; overflow: hidden; }
.bar span { display: block; height: 100%; background: white; }
details.category { background: white; border-radius: 10px; padding: 14px 20px; margin-bottom: 20px; box-shadow: 0 1px 4px rgba(0,0,0,0.08); }
details.category summary { cursor: pointer; font-size: 1.1em; font-weight: 600; }
details.category .blurb { color: #6b7280; font-size: 0.9em; margin: 6px 0 12px 0; }
.count { border: 1px solid #cbd5e1; border-radius: 10px; padding: 1px 8px; font-size: 0.75em; font-weight: normal; margin-left: 6px; }
.item { padding: 12px 16px; border-radius: 8px; border-left: 4px solid; margin-bottom: 10px; display: flex; justify-content: space-between; }
.item.found { border-left-color: #22c55e; background: #f0fdf4; }
.item.missing { border-left-color: #ef4444; background: #fef2f2; }
.item .name { font-weight: 600; }
.item .path { font-family: monospace; font-size: 0.8em; color: #6b7280; word-break: break-all; }
.item .desc { font-size: 0.9em; color: #4b5563; margin: 4px 0; }
.item .details { font-size: 0.8em; color: #4b5563; }
.badge { padding: 2px 8px; border-radius: 4px; font-size: 0.75em; font-weight: bold; margin-left: 6px; }
.sev-low { background: #e5e7eb; color: #374151; }
.sev-medium { background: #fde68a; color: #78350f; }
.sev-high { background: #fb923c; color: white; }
.sev-critical { background: #dc2626; color: white; }
.status.found { background: #dcfce7; color: #166534; }
.status.missing { background: #fee2e2; color: #991b1b; }
.icon.found { color: #16a34a; }
.icon.missing { color: #dc2626; }
.notice { background: white; padding: 40px; text-align: center; border-radius: 10px; }
.notice.error { color: #991b1b; }
.notice .hint { color: #6b7280; font-size: 0.85em; }
footer { text-align: center; color: #6b7280; font-size: 0.85em; margin-top: 30px; }
"#;

/// Full HTML document for whatever the dashboard currently shows.
///
/// The page is a static snapshot with no refresh or retry controls; those
/// live in the interactive terminal view.
pub fn render_dashboard(dashboard: &Dashboard) -> String {
    let options = ViewOptions::from_dashboard(dashboard);
    let body = match dashboard.phase() {
        Phase::Loading => loading_view(),
        Phase::Error => error_view(dashboard.last_error()),
        Phase::Ready => match dashboard.snapshot() {
            Some(report) => report_view(&report, &options),
            None => loading_view(),
        },
    };
    page(&options, body).into_string()
}

/// Full HTML document for a report.
pub fn render_report(report: &ReconciliationReport, options: &ViewOptions) -> String {
    page(options, report_view(report, options)).into_string()
}

fn page(options: &ViewOptions, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { "Reconciliation Dashboard" }
                style { (PreEscaped(STYLESHEET)) }
            }
            body {
                div.container {
                    header.top {
                        div {
                            h1 { "Reconciliation Dashboard" }
                            @if let Some(source) = &options.source {
                                small { "Source: " (source) }
                            }
                        }
                        @if let Some(retrieved) = options.retrieved_at {
                            small { "Last update " (retrieved.format("%H:%M:%S").to_string()) }
                        }
                    }
                    (body)
                }
            }
        }
    }
}

fn loading_view() -> Markup {
    html! {
        div.notice aria-busy="true" { "Loading reconciliation data..." }
    }
}

fn error_view(message: Option<&str>) -> Markup {
    html! {
        div.notice.error {
            @match message {
                Some(message) => {
                    h2 { "Could not load reconciliation data" }
                    p { (message) }
                }
                None => {
                    p { "No reconciliation data available" }
                }
            }
            p.hint { "Static snapshot. Run `recon-dashboard watch` to retry interactively." }
        }
    }
}

fn report_view(report: &ReconciliationReport, options: &ViewOptions) -> Markup {
    let summary = aggregate::summarize(report);
    html! {
        @if summary.has_critical_problems() {
            (banner(&summary))
        }
        (tiles(&summary))
        @for group in &summary.groups {
            (group_section(group, options))
        }
        footer {
            p { "Automated reconciliation monitoring" }
            p { "Report generated " (format_time(report.generated_at())) }
        }
    }
}

fn banner(summary: &Summary) -> Markup {
    html! {
        div.alert role="alert" {
            h2 { "⚠ Critical problems detected" }
            p {
                (summary.critical_problems.len())
                " critical file(s) not found. Immediate action required."
            }
        }
    }
}

fn tiles(summary: &Summary) -> Markup {
    let filled = filled_cells(summary.success_rate, 100);
    html! {
        div.tiles {
            div.tile.total {
                div.label { "Total files" }
                div.value { (summary.total_files) }
                div.label { "Files monitored" }
            }
            div.tile.found {
                div.label { "Found" }
                div.value { (summary.found_count) }
                div.label { "Reconciliations OK" }
            }
            div.tile.missing {
                div.label { "Missing" }
                div.value { (summary.missing_count) }
                div.label { "Needs attention" }
            }
            div class={ "tile rate " (tone_css(summary.success_tone)) } {
                div.label { "Success rate" }
                div.value { (format!("{:.1}%", summary.success_rate)) }
                div.bar role="progressbar" aria-valuemin="0" aria-valuemax="100" aria-valuenow=(filled) {
                    span style={ "width: " (filled) "%" } {}
                }
            }
        }
    }
}

fn group_section(group: &CategoryGroup, options: &ViewOptions) -> Markup {
    let style = category_style(group.category);
    let open = !options.collapsed.contains(&group.category);
    html! {
        details class={ "category " (style.css_class) } open[open] {
            summary {
                (style.icon) " " (style.title)
                span.count { (group.items.len()) " files" }
            }
            div.blurb { (style.blurb) }
            @for item in &group.items {
                (item_row(item))
            }
        }
    }
}

fn item_row(item: &FileCheckResult) -> Markup {
    let existence = existence_style(item.exists);
    let severity = severity_style(item.criticality);
    html! {
        div class={ "item " (existence.css_class) } {
            div {
                div {
                    span class={ "icon " (existence.css_class) } { (existence.icon) } " "
                    span.name { (item.file_name) }
                    span class={ "badge " (severity.css_class) } { (severity.label) }
                }
                @if !item.description.is_empty() {
                    div.desc { (item.description) }
                }
                div.path { (item.full_path) }
                @for (label, value) in item_details(item) {
                    div.details { (label) ": " (value) }
                }
            }
            div {
                span class={ "badge status " (existence.css_class) } { (existence.label) }
            }
        }
    }
}
