use indicatif::{ProgressBar, ProgressStyle};
use recon_dashboard::{Dashboard, Phase};
use std::time::Duration;

const TICK: Duration = Duration::from_millis(80);

fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
    pb.set_style(style);
    pb.set_message(message);
    pb.enable_steady_tick(TICK);
    pb
}

/// Block on the pending load with a spinner on stderr.
pub fn wait_for_load(dashboard: &mut Dashboard) -> Phase {
    let pb = spinner(format!(
        "Loading reconciliation data from {}...",
        dashboard.source()
    ));
    while !dashboard.wait(TICK) {}
    pb.finish_and_clear();

    match dashboard.phase() {
        Phase::Ready => eprintln!("  \x1b[32m✓\x1b[0m Report loaded"),
        Phase::Error => eprintln!("  \x1b[31m✗\x1b[0m Report load failed"),
        Phase::Loading => {}
    }
    dashboard.phase()
}
