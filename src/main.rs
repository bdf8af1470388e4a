mod cli;
mod logging;
mod progress;
mod watch;

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use chrono::{DateTime, Local};
use clap::{CommandFactory, Parser};
use cli::{Cli, Commands, HtmlArgs, SummaryArgs};
use colored::*;
use dotenv::dotenv;
use recon_dashboard::aggregate::Summary;
use recon_dashboard::config::{self, AppConfig, SourceKind};
use recon_dashboard::render;
use recon_dashboard::{Dashboard, Phase};
use serde::Serialize;
use tracing::{error, info, warn};

fn main() -> ExitCode {
    dotenv().ok();

    let args = Cli::parse();
    let interactive = matches!(args.command, Some(Commands::Watch));
    let _guard = logging::init_logger(logging::LogOutput::for_command(interactive));

    let mut config = match config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            return ExitCode::FAILURE;
        }
    };
    apply_overrides(&mut config, &args);

    let result = match args.command {
        Some(Commands::Show) => run_show(&config),
        Some(Commands::Html(html_args)) => run_html(&config, &html_args),
        Some(Commands::Summary(summary_args)) => run_summary(&config, &summary_args),
        Some(Commands::Watch) => run_watch(&config),
        Some(Commands::PrintConfig) => run_print_config(&config),
        None => {
            let _ = Cli::command().print_long_help();
            Ok(ExitCode::SUCCESS)
        }
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            error!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn apply_overrides(config: &mut AppConfig, args: &Cli) {
    if let Some(report) = &args.report {
        config.report_path = report.clone();
        config.source = SourceKind::File;
    }
    if let Some(source) = args.source {
        config.source = source;
    }
}

/// Mount the dashboard and block until the first load settles.
fn load_dashboard(config: &AppConfig) -> Dashboard {
    let mut dashboard = Dashboard::mount(config.loader());
    progress::wait_for_load(&mut dashboard);
    dashboard
}

fn run_show(config: &AppConfig) -> anyhow::Result<ExitCode> {
    let dashboard = load_dashboard(config);
    print!("{}", render::terminal::render_dashboard(&dashboard, false));

    match dashboard.summary() {
        Some(summary) if summary.has_critical_problems() => {
            warn!(
                "{} critical problem(s) found",
                format!("{}", summary.critical_problems.len()).red()
            );
            Ok(ExitCode::from(1))
        }
        Some(_) => Ok(ExitCode::SUCCESS),
        None => Ok(ExitCode::FAILURE),
    }
}

fn run_html(config: &AppConfig, args: &HtmlArgs) -> anyhow::Result<ExitCode> {
    let dashboard = load_dashboard(config);
    let out = args.out.as_deref().unwrap_or(&config.html_output);

    let html = render::html::render_dashboard(&dashboard);
    if let Some(parent) = Path::new(out).parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating output directory {}", parent.display()))?;
    }
    fs::write(out, html).with_context(|| format!("writing {}", out))?;
    info!("Dashboard written to {}", out.green());

    Ok(match dashboard.phase() {
        Phase::Ready => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    })
}

#[derive(Serialize)]
struct SummaryDocument<'a> {
    generated_at: DateTime<Local>,
    retrieved_at: Option<DateTime<Local>>,
    #[serde(flatten)]
    summary: Summary<'a>,
}

fn run_summary(config: &AppConfig, args: &SummaryArgs) -> anyhow::Result<ExitCode> {
    let dashboard = load_dashboard(config);
    let report = match dashboard.snapshot() {
        Some(report) => report,
        None => {
            let reason = dashboard.last_error().unwrap_or("no report loaded");
            anyhow::bail!("cannot summarize: {}", reason);
        }
    };
    let summary = recon_dashboard::aggregate::summarize(&report);

    if args.json {
        let document = SummaryDocument {
            generated_at: report.generated_at(),
            retrieved_at: dashboard.retrieved_at(),
            summary,
        };
        println!("{}", serde_json::to_string_pretty(&document)?);
    } else {
        println!("Total files:       {}", summary.total_files);
        println!("Found:             {}", summary.found_count);
        println!("Missing:           {}", summary.missing_count);
        println!("Success rate:      {:.1}%", summary.success_rate);
        println!("Critical problems: {}", summary.critical_problems.len());
        for group in &summary.groups {
            let missing = group.items.iter().filter(|item| !item.exists).count();
            println!(
                "  {:<14} {} files, {} missing",
                group.category.to_string(),
                group.items.len(),
                missing
            );
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn run_watch(config: &AppConfig) -> anyhow::Result<ExitCode> {
    let dashboard = Dashboard::mount(config.loader());
    watch::run(dashboard).context("interactive dashboard")?;
    Ok(ExitCode::SUCCESS)
}

fn run_print_config(config: &AppConfig) -> anyhow::Result<ExitCode> {
    let text = toml::to_string_pretty(config).context("serializing configuration")?;
    print!("{}", text);
    Ok(ExitCode::SUCCESS)
}
