//! Rate-limited batch executor.
//!
//! Drains a queue of work units in windows of `batch_size`. Units in a batch run concurrently on
//! the current task; the next batch starts only after the whole batch settled and at least
//! `window` after the previous launch. So `batch_size / window` bounds the call rate.

use futures::future::join_all;
use log::{debug, warn};
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::time::{Instant, sleep_until};

use crate::engine::progress::{ProgressBar, update_progress_bar};

/// Outcome counts of one executor run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Batches launched.
    pub batches: usize,
    pub succeeded: usize,
    /// Units that returned an error (logged, never fatal).
    pub failed: usize,
    /// Units dropped unstarted because the stop condition held.
    pub skipped: usize,
}

impl BatchReport {
    /// Units that actually ran.
    pub fn executed(&self) -> usize {
        self.succeeded + self.failed
    }
}

#[derive(Clone, Copy, Debug)]
pub struct BatchExecutor {
    batch_size: usize,
    window: Duration,
}

impl BatchExecutor {
    /// `batch_size` is clamped to at least 1.
    pub fn new(batch_size: usize, window: Duration) -> Self {
        Self {
            batch_size: batch_size.max(1),
            window,
        }
    }

    pub fn from_millis(batch_size: usize, window_ms: u64) -> Self {
        Self::new(batch_size, Duration::from_millis(window_ms))
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Run every unit exactly once.
    pub async fn run<I, F, E>(&self, units: I, progress: Option<&ProgressBar>) -> BatchReport
    where
        I: IntoIterator<Item = F>,
        F: Future<Output = Result<(), E>>,
        E: Display,
    {
        self.run_until(units, || false, progress).await
    }

    /// Like [`run`](Self::run), but `stop` is checked before each batch; once it returns true the
    /// remaining units are dropped without being polled. Batches already launched always finish.
    pub async fn run_until<I, F, E, S>(
        &self,
        units: I,
        stop: S,
        progress: Option<&ProgressBar>,
    ) -> BatchReport
    where
        I: IntoIterator<Item = F>,
        F: Future<Output = Result<(), E>>,
        E: Display,
        S: Fn() -> bool,
    {
        let mut units = units.into_iter();
        let mut report = BatchReport::default();
        let mut last_launch: Option<Instant> = None;

        loop {
            let batch: Vec<F> = units.by_ref().take(self.batch_size).collect();
            if batch.is_empty() {
                break;
            }
            if stop() {
                report.skipped += batch.len() + units.by_ref().count();
                debug!("Stop condition met; skipped {} work units", report.skipped);
                break;
            }
            if let Some(prev) = last_launch {
                sleep_until(prev + self.window).await;
            }
            last_launch = Some(Instant::now());
            report.batches += 1;

            let n = batch.len();
            for result in join_all(batch).await {
                match result {
                    Ok(()) => report.succeeded += 1,
                    Err(e) => {
                        report.failed += 1;
                        warn!("Work unit failed: {}", e);
                    }
                }
            }
            if let Some(pb) = progress {
                update_progress_bar(pb, n);
            }
        }

        report
    }
}
