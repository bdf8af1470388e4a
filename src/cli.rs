use clap::{Args, Parser, Subcommand};
use recon_dashboard::config::SourceKind;

#[derive(Debug, Parser)]
#[command(name = "recon-dashboard")]
#[command(about = "Status dashboard for reconciliation file checks", long_about = None)]
pub struct Cli {
    /// Where to load the report from (overrides configuration)
    #[arg(long, global = true, value_enum)]
    pub source: Option<SourceKind>,

    /// Path of the JSON report artifact (implies --source file)
    #[arg(long, global = true)]
    pub report: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Load the report once and print the dashboard
    Show,
    /// Write the dashboard as an HTML page
    Html(HtmlArgs),
    /// Print aggregate metrics only
    Summary(SummaryArgs),
    /// Interactive dashboard with manual refresh
    Watch,
    /// Print configuration values
    PrintConfig,
}

#[derive(Debug, Args)]
pub struct HtmlArgs {
    /// Output file (defaults to html_output from configuration)
    #[arg(short, long)]
    pub out: Option<String>,
}

#[derive(Debug, Args)]
pub struct SummaryArgs {
    /// Emit JSON instead of text
    #[arg(long)]
    pub json: bool,
}
