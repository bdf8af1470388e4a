use chrono::{DateTime, Local};
use std::collections::BTreeSet;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::aggregate::{self, Summary};
use crate::error::Error;
use crate::loader::ReportLoader;
use crate::model::{Category, ReconciliationReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
    Error,
}

struct LoadOutcome {
    generation: u64,
    result: Result<ReconciliationReport, Error>,
}

/// Holds the current report snapshot and drives loads on a worker thread.
///
/// At most one load is tracked at a time. `refresh` is ignored while a load
/// is pending; `reload` abandons the pending load and starts a new one, and
/// the abandoned result is dropped when it arrives.
pub struct Dashboard {
    loader: Arc<dyn ReportLoader>,
    phase: Phase,
    snapshot: Option<Arc<ReconciliationReport>>,
    retrieved_at: Option<DateTime<Local>>,
    last_error: Option<String>,
    generation: u64,
    in_flight: Option<u64>,
    collapsed: BTreeSet<Category>,
    tx: Sender<LoadOutcome>,
    rx: Receiver<LoadOutcome>,
}

impl Dashboard {
    pub fn new(loader: Arc<dyn ReportLoader>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            loader,
            phase: Phase::Loading,
            snapshot: None,
            retrieved_at: None,
            last_error: None,
            generation: 0,
            in_flight: None,
            collapsed: BTreeSet::new(),
            tx,
            rx,
        }
    }

    /// Create the dashboard and start the initial load.
    pub fn mount(loader: Arc<dyn ReportLoader>) -> Self {
        let mut dashboard = Self::new(loader);
        dashboard.refresh();
        dashboard
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn snapshot(&self) -> Option<Arc<ReconciliationReport>> {
        self.snapshot.clone()
    }

    pub fn retrieved_at(&self) -> Option<DateTime<Local>> {
        self.retrieved_at
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn source(&self) -> String {
        self.loader.describe()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Aggregates for the current snapshot, if any.
    pub fn summary(&self) -> Option<Summary<'_>> {
        self.snapshot.as_deref().map(aggregate::summarize)
    }

    /// Start a load unless one is already pending. Returns whether a load was started.
    pub fn refresh(&mut self) -> bool {
        if let Some(pending) = self.in_flight {
            debug!("Refresh ignored, load {} still pending", pending);
            return false;
        }
        self.start_load()
    }

    /// Retry after a failure. Same as `refresh`.
    pub fn retry(&mut self) -> bool {
        self.refresh()
    }

    /// Start a new load even if one is pending; the pending one is abandoned.
    pub fn reload(&mut self) -> bool {
        if let Some(pending) = self.in_flight.take() {
            info!("Abandoning pending load {}", pending);
        }
        self.start_load()
    }

    fn start_load(&mut self) -> bool {
        self.generation += 1;
        let generation = self.generation;
        let loader = Arc::clone(&self.loader);
        let tx = self.tx.clone();

        let spawned = thread::Builder::new()
            .name(format!("report-load-{}", generation))
            .spawn(move || {
                let result = loader.load();
                // receiver gone means the dashboard was dropped
                let _ = tx.send(LoadOutcome { generation, result });
            });

        match spawned {
            Ok(_) => {
                debug!("Started load {} from {}", generation, self.loader.describe());
                self.in_flight = Some(generation);
                self.phase = Phase::Loading;
                true
            }
            Err(err) => {
                error!("Could not start report load: {}", err);
                self.fail(Error::LoadFailure(format!("cannot start loader: {}", err)));
                false
            }
        }
    }

    /// Apply any finished loads without blocking. Returns whether state changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(outcome) = self.rx.try_recv() {
            changed |= self.apply(outcome);
        }
        changed
    }

    /// Block until the pending load finishes or `timeout` elapses.
    ///
    /// Returns `true` once no load is pending.
    pub fn wait(&mut self, timeout: Duration) -> bool {
        let deadline = std::time::Instant::now() + timeout;
        while self.in_flight.is_some() {
            let remaining = deadline.saturating_duration_since(std::time::Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(outcome) => {
                    self.apply(outcome);
                }
                Err(RecvTimeoutError::Timeout) => return false,
                // unreachable while self.tx is alive
                Err(RecvTimeoutError::Disconnected) => return false,
            }
        }
        true
    }

    fn apply(&mut self, outcome: LoadOutcome) -> bool {
        if self.in_flight != Some(outcome.generation) {
            debug!("Discarding result of stale load {}", outcome.generation);
            return false;
        }
        self.in_flight = None;

        match outcome.result {
            Ok(report) => {
                info!(
                    "Load {} complete: {} files, {} found, {} missing",
                    outcome.generation,
                    report.total_files(),
                    report.found_count(),
                    report.missing_count()
                );
                self.snapshot = Some(Arc::new(report));
                self.retrieved_at = Some(Local::now());
                self.last_error = None;
                self.phase = Phase::Ready;
            }
            Err(err) => {
                warn!("Load {} failed: {}", outcome.generation, err);
                self.fail(err);
            }
        }
        true
    }

    fn fail(&mut self, err: Error) {
        self.last_error = Some(err.to_string());
        self.phase = Phase::Error;
    }

    /// Hide the error message. Falls back to the last good snapshot when there is one.
    pub fn dismiss_error(&mut self) {
        if self.phase != Phase::Error {
            return;
        }
        self.last_error = None;
        if self.snapshot.is_some() {
            self.phase = Phase::Ready;
        }
    }

    pub fn toggle_category(&mut self, category: Category) {
        if !self.collapsed.remove(&category) {
            self.collapsed.insert(category);
        }
    }

    pub fn is_collapsed(&self, category: Category) -> bool {
        self.collapsed.contains(&category)
    }

    pub fn collapsed(&self) -> &BTreeSet<Category> {
        &self.collapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Criticality, FileCheckResult};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    const WAIT: Duration = Duration::from_secs(5);

    /// Loader whose results are fed by the test, one per `load` call.
    struct ScriptedLoader {
        results: Mutex<Receiver<Result<ReconciliationReport, Error>>>,
        calls: AtomicUsize,
    }

    impl ReportLoader for ScriptedLoader {
        fn load(&self) -> Result<ReconciliationReport, Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let rx = self.results.lock().unwrap();
            rx.recv()
                .unwrap_or_else(|_| Err(Error::LoadFailure("script closed".to_string())))
        }
    }

    fn scripted() -> (Arc<ScriptedLoader>, Sender<Result<ReconciliationReport, Error>>) {
        let (tx, rx) = mpsc::channel();
        let loader = Arc::new(ScriptedLoader {
            results: Mutex::new(rx),
            calls: AtomicUsize::new(0),
        });
        (loader, tx)
    }

    fn report(found: usize, missing: usize) -> ReconciliationReport {
        let mut items = Vec::new();
        for i in 0..found + missing {
            items.push(FileCheckResult {
                file_name: format!("file_{}.xlsx", i),
                full_path: format!("/recon/file_{}.xlsx", i),
                exists: i < found,
                criticality: Criticality::Critical,
                category: Category::Other,
                description: String::new(),
                modified_at: None,
                size_bytes: None,
            });
        }
        ReconciliationReport::new(Local::now(), items)
    }

    #[test]
    fn test_mount_loads_to_ready() {
        let (loader, script) = scripted();
        let mut dashboard = Dashboard::mount(loader.clone());
        assert_eq!(dashboard.phase(), Phase::Loading);
        assert!(dashboard.is_loading());

        script.send(Ok(report(9, 0))).unwrap();
        assert!(dashboard.wait(WAIT));
        assert_eq!(dashboard.phase(), Phase::Ready);
        assert!(dashboard.retrieved_at().is_some());

        let summary = dashboard.summary().unwrap();
        assert_eq!(summary.success_rate, 100.0);
        assert!(!summary.has_critical_problems());
    }

    #[test]
    fn test_refresh_while_loading_is_ignored() {
        let (loader, script) = scripted();
        let mut dashboard = Dashboard::mount(loader.clone());
        assert!(!dashboard.refresh());
        assert!(!dashboard.refresh());

        script.send(Ok(report(1, 1))).unwrap();
        assert!(dashboard.wait(WAIT));
        assert_eq!(loader.calls.load(Ordering::SeqCst), 1);
        assert_eq!(dashboard.generation(), 1);
        assert_eq!(dashboard.phase(), Phase::Ready);
    }

    #[test]
    fn test_failure_then_retry() {
        let (loader, script) = scripted();
        let mut dashboard = Dashboard::mount(loader);
        script
            .send(Err(Error::LoadFailure("service unreachable".to_string())))
            .unwrap();
        assert!(dashboard.wait(WAIT));
        assert_eq!(dashboard.phase(), Phase::Error);
        assert!(dashboard.last_error().unwrap().contains("service unreachable"));
        assert!(dashboard.snapshot().is_none());

        assert!(dashboard.retry());
        assert_eq!(dashboard.phase(), Phase::Loading);
        script.send(Ok(report(0, 9))).unwrap();
        assert!(dashboard.wait(WAIT));
        assert_eq!(dashboard.phase(), Phase::Ready);
        assert!(dashboard.last_error().is_none());
        assert_eq!(dashboard.snapshot().unwrap().missing_count(), 9);
    }

    #[test]
    fn test_dismiss_error_keeps_previous_snapshot() {
        let (loader, script) = scripted();
        let mut dashboard = Dashboard::mount(loader);
        script.send(Ok(report(2, 1))).unwrap();
        assert!(dashboard.wait(WAIT));

        assert!(dashboard.refresh());
        script
            .send(Err(Error::MalformedReport("bad counts".to_string())))
            .unwrap();
        assert!(dashboard.wait(WAIT));
        assert_eq!(dashboard.phase(), Phase::Error);

        dashboard.dismiss_error();
        assert_eq!(dashboard.phase(), Phase::Ready);
        assert_eq!(dashboard.snapshot().unwrap().found_count(), 2);
    }

    #[test]
    fn test_dismiss_without_snapshot_stays_in_error() {
        let (loader, script) = scripted();
        let mut dashboard = Dashboard::mount(loader);
        script.send(Err(Error::LoadFailure("down".to_string()))).unwrap();
        assert!(dashboard.wait(WAIT));
        dashboard.dismiss_error();
        assert_eq!(dashboard.phase(), Phase::Error);
        assert!(dashboard.last_error().is_none());
    }

    #[test]
    fn test_reload_discards_abandoned_result() {
        let (loader, script) = scripted();
        let mut dashboard = Dashboard::mount(loader);
        assert!(dashboard.reload());
        assert_eq!(dashboard.generation(), 2);

        // Both loads block on the script; whichever receives first, only the
        // result for generation 2 may be applied.
        script.send(Ok(report(1, 0))).unwrap();
        script.send(Ok(report(1, 0))).unwrap();
        assert!(dashboard.wait(WAIT));
        assert_eq!(dashboard.phase(), Phase::Ready);
        assert!(!dashboard.is_loading());

        // the abandoned result, if it arrives later, changes nothing
        thread::sleep(Duration::from_millis(50));
        assert!(!dashboard.poll());
        assert_eq!(dashboard.phase(), Phase::Ready);
    }

    #[test]
    fn test_toggle_category() {
        let (loader, _script) = scripted();
        let mut dashboard = Dashboard::new(loader);
        assert!(!dashboard.is_collapsed(Category::Taxes));
        dashboard.toggle_category(Category::Taxes);
        assert!(dashboard.is_collapsed(Category::Taxes));
        dashboard.toggle_category(Category::Taxes);
        assert!(!dashboard.is_collapsed(Category::Taxes));
    }
}
