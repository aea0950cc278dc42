//! Batch executor tests on a paused clock: rate adherence, bounded concurrency, failure isolation
//! and the stop condition.

use appcrawl::pipeline::BatchExecutor;
use std::cell::{Cell, RefCell};
use std::time::Duration;
use tokio::time::{Instant, sleep};

/// Launch instants and peak concurrency seen by the units of one run.
#[derive(Default)]
struct Recorder {
    launches: RefCell<Vec<(usize, Instant)>>,
    in_flight: Cell<usize>,
    peak: Cell<usize>,
}

impl Recorder {
    async fn unit(&self, i: usize, work: Duration, fail: bool) -> Result<(), String> {
        self.launches.borrow_mut().push((i, Instant::now()));
        self.in_flight.set(self.in_flight.get() + 1);
        self.peak.set(self.peak.get().max(self.in_flight.get()));
        sleep(work).await;
        self.in_flight.set(self.in_flight.get() - 1);
        if fail {
            Err(format!("unit {i} failed"))
        } else {
            Ok(())
        }
    }

    /// Distinct launch instants, in order.
    fn batch_starts(&self) -> Vec<Instant> {
        let mut starts: Vec<Instant> = self.launches.borrow().iter().map(|(_, t)| *t).collect();
        starts.sort();
        starts.dedup();
        starts
    }
}

#[tokio::test(start_paused = true)]
async fn test_batches_respect_size_and_window() {
    let rec = Recorder::default();
    let executor = BatchExecutor::new(3, Duration::from_millis(100));
    let units = (0..10).map(|i| rec.unit(i, Duration::from_millis(10), false));

    let report = executor.run(units, None).await;

    assert_eq!(report.batches, 4);
    assert_eq!(report.succeeded, 10);
    assert_eq!(report.failed, 0);
    assert!(rec.peak.get() <= 3);

    let starts = rec.batch_starts();
    assert_eq!(starts.len(), 4);
    for pair in starts.windows(2) {
        assert!(pair[1] - pair[0] >= Duration::from_millis(100));
    }

    // launched in queue order
    let order: Vec<usize> = rec.launches.borrow().iter().map(|(i, _)| *i).collect();
    assert_eq!(order, (0..10).collect::<Vec<_>>());
}

#[tokio::test(start_paused = true)]
async fn test_slow_batch_delays_next_launch() {
    let rec = Recorder::default();
    let executor = BatchExecutor::new(2, Duration::from_millis(50));
    let units = (0..4).map(|i| rec.unit(i, Duration::from_millis(200), false));

    let report = executor.run(units, None).await;

    assert_eq!(report.batches, 2);
    assert!(rec.peak.get() <= 2);
    let starts = rec.batch_starts();
    assert_eq!(starts.len(), 2);
    // next batch waits for the whole previous batch to settle
    assert!(starts[1] - starts[0] >= Duration::from_millis(200));
}

#[tokio::test(start_paused = true)]
async fn test_failures_do_not_abort_run() {
    let rec = Recorder::default();
    let executor = BatchExecutor::new(4, Duration::from_millis(20));
    let units = (0..9).map(|i| rec.unit(i, Duration::from_millis(1), i % 3 == 0));

    let report = executor.run(units, None).await;

    assert_eq!(report.failed, 3);
    assert_eq!(report.succeeded, 6);
    assert_eq!(report.executed(), 9);
    assert_eq!(report.skipped, 0);
    assert_eq!(rec.launches.borrow().len(), 9);
}

#[tokio::test(start_paused = true)]
async fn test_every_unit_runs_exactly_once() {
    let runs = RefCell::new(vec![0_u32; 7]);
    let executor = BatchExecutor::new(3, Duration::from_millis(5));
    let units = (0..7).map(|i| {
        let runs = &runs;
        async move {
            runs.borrow_mut()[i] += 1;
            Ok::<(), String>(())
        }
    });

    executor.run(units, None).await;
    assert!(runs.borrow().iter().all(|&n| n == 1));
}

#[tokio::test(start_paused = true)]
async fn test_stop_condition_skips_remaining_units() {
    let done = Cell::new(0_usize);
    let executor = BatchExecutor::new(2, Duration::from_millis(10));
    let units = (0..9).map(|_| {
        let done = &done;
        async move {
            done.set(done.get() + 1);
            Ok::<(), String>(())
        }
    });

    // stop once two batches have completed
    let report = executor.run_until(units, || done.get() >= 4, None).await;

    assert_eq!(report.batches, 2);
    assert_eq!(report.succeeded, 4);
    assert_eq!(report.skipped, 5);
    assert_eq!(done.get(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_empty_queue_and_zero_batch_size() {
    let executor = BatchExecutor::new(0, Duration::from_millis(10));
    assert_eq!(executor.batch_size(), 1);

    let report = executor
        .run(std::iter::empty::<std::future::Ready<Result<(), String>>>(), None)
        .await;
    assert_eq!(report.batches, 0);
    assert_eq!(report.executed(), 0);
}
