//! Run counters and on-demand progress reporting.
//!
//! The pipeline updates [`RunCounters`] as it locates patterns. A
//! [`ProgressMonitor`] on a separate thread reads them when asked (on
//! `SIGUSR1`, or on a fixed interval) and logs a [`ProgressReport`]. Reads
//! race with writes, so a report may lag the pipeline by one increment.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::oneshot;
use tracing::{debug, info};

use crate::utils::timer::format_duration;

/// Process-wide progress of a run.
///
/// Counters only ever increase and are never reset.
#[derive(Debug)]
pub struct RunCounters {
    patterns_total: AtomicUsize,
    patterns_done: AtomicUsize,
    occurrences_found: AtomicU64,
    paths_found: AtomicU64,
    created: Instant,
    locate_started: OnceLock<Instant>,
}

impl RunCounters {
    pub fn new() -> Self {
        Self {
            patterns_total: AtomicUsize::new(0),
            patterns_done: AtomicUsize::new(0),
            occurrences_found: AtomicU64::new(0),
            paths_found: AtomicU64::new(0),
            created: Instant::now(),
            locate_started: OnceLock::new(),
        }
    }

    /// Record the number of patterns of the run; called once before any
    /// pattern is marked done
    pub fn set_total(&self, total: usize) {
        self.patterns_total.store(total, Ordering::Relaxed);
    }

    /// Start the clock reported as elapsed time; later calls are ignored
    pub fn mark_locate_started(&self) {
        let _ = self.locate_started.set(Instant::now());
    }

    /// Record one located pattern and its occurrences
    pub fn record_located(&self, occurrences: usize) {
        self.occurrences_found
            .fetch_add(occurrences as u64, Ordering::Relaxed);
        self.patterns_done.fetch_add(1, Ordering::Relaxed);
    }

    /// Record patterns that matched nothing
    pub fn record_unmatched(&self, patterns: usize) {
        self.patterns_done.fetch_add(patterns, Ordering::Relaxed);
    }

    /// Add matching paths reported by the index for a pattern
    pub fn add_paths(&self, paths: u64) {
        self.paths_found.fetch_add(paths, Ordering::Relaxed);
    }

    pub fn patterns_total(&self) -> usize {
        self.patterns_total.load(Ordering::Relaxed)
    }

    pub fn patterns_done(&self) -> usize {
        self.patterns_done.load(Ordering::Relaxed)
    }

    pub fn occurrences_found(&self) -> u64 {
        self.occurrences_found.load(Ordering::Relaxed)
    }

    pub fn paths_found(&self) -> u64 {
        self.paths_found.load(Ordering::Relaxed)
    }

    pub fn elapsed(&self) -> Duration {
        self.locate_started
            .get()
            .unwrap_or(&self.created)
            .elapsed()
    }

    /// Snapshot of the counters
    pub fn report(&self) -> ProgressReport {
        let total = self.patterns_total();
        let done = self.patterns_done();
        ProgressReport {
            done,
            total,
            occurrences: self.occurrences_found(),
            paths: self.paths_found(),
            elapsed: self.elapsed(),
            percent: percent(done, total),
        }
    }
}

impl Default for RunCounters {
    fn default() -> Self {
        Self::new()
    }
}

/// `floor(done * 100 / total)`, or `None` while the total is unknown
fn percent(done: usize, total: usize) -> Option<u64> {
    if total == 0 {
        return None;
    }
    Some((done as u64).saturating_mul(100) / total as u64)
}

/// A point-in-time view of [`RunCounters`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressReport {
    pub done: usize,
    pub total: usize,
    pub occurrences: u64,
    pub paths: u64,
    #[serde(serialize_with = "serialize_secs")]
    pub elapsed: Duration,
    pub percent: Option<u64>,
}

fn serialize_secs<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(d.as_secs_f64())
}

impl std::fmt::Display for ProgressReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Located {} out of {} with {} occurrences in {}: ",
            self.done,
            self.total,
            self.occurrences,
            format_duration(self.elapsed)
        )?;
        match self.percent {
            Some(pct) => write!(f, "{pct}% done."),
            None => write!(f, "total not yet known."),
        }
    }
}

#[cfg(unix)]
type UserSignal = tokio::signal::unix::Signal;

#[cfg(not(unix))]
type UserSignal = ();

#[cfg(unix)]
fn register_user_signal() -> std::io::Result<Option<UserSignal>> {
    use tokio::signal::unix::{signal, SignalKind};
    signal(SignalKind::user_defined1()).map(Some)
}

#[cfg(not(unix))]
fn register_user_signal() -> std::io::Result<Option<UserSignal>> {
    Ok(None)
}

/// Resolves on the next report request signal; never resolves without one
async fn next_signal(user_signal: &mut Option<UserSignal>) {
    #[cfg(unix)]
    {
        if let Some(sig) = user_signal.as_mut() {
            if sig.recv().await.is_some() {
                return;
            }
        }
    }
    #[cfg(not(unix))]
    let _ = user_signal;

    std::future::pending::<()>().await;
}

async fn next_tick(ticker: &mut Option<tokio::time::Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}

/// Background reporter for a run's counters.
///
/// Reports are logged at info level whenever the process receives `SIGUSR1`
/// (unix only) and, if an interval was given, periodically. The monitor
/// stops when dropped.
pub struct ProgressMonitor {
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl ProgressMonitor {
    /// Install the signal handler and start the reporting thread
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime, the signal handler, or the thread
    /// cannot be created.
    pub fn spawn(
        counters: Arc<RunCounters>,
        interval: Option<Duration>,
    ) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        // Registered here rather than on the reporting thread so the handler
        // is in place before the pipeline starts.
        let user_signal = {
            let _guard = runtime.enter();
            register_user_signal()?
        };

        let (tx, rx) = oneshot::channel();
        let handle = std::thread::Builder::new()
            .name("progress-monitor".to_string())
            .spawn(move || {
                runtime.block_on(listen(counters, user_signal, interval, rx));
            })?;

        Ok(Self {
            shutdown: Some(tx),
            handle: Some(handle),
        })
    }
}

impl Drop for ProgressMonitor {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

async fn listen(
    counters: Arc<RunCounters>,
    mut user_signal: Option<UserSignal>,
    interval: Option<Duration>,
    mut shutdown: oneshot::Receiver<()>,
) {
    let mut ticker = interval.filter(|p| !p.is_zero()).map(|period| {
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        ticker
    });

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            () = next_signal(&mut user_signal) => info!("{}", counters.report()),
            () = next_tick(&mut ticker) => info!("{}", counters.report()),
        }
    }
    debug!("Progress monitor stopped");
}
