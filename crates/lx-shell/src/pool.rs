//! Worker pool that resolves navigation requests off the UI thread.

use crate::navigation::NavigationOutcome;
use crate::navigation::NavigationRequest;
use crossbeam_channel::Receiver;
use crossbeam_channel::Sender;
use crossbeam_channel::TryRecvError;
use lx_config::SearchEngine;
use lx_core::BrowserError;
use lx_core::BrowserResult;
use std::sync::Arc;
use std::thread;
use std::thread::JoinHandle;
use tracing::debug;
use tracing::warn;

pub const DEFAULT_NAVIGATION_WORKERS: usize = 2;
const NAVIGATION_THREAD_STACK_SIZE: usize = 256 * 1024;

/// Called from a worker thread after each outcome is queued.
pub type Waker = Arc<dyn Fn() + Send + Sync>;

/// Fixed set of threads sharing one job queue. Tasks always run to
/// completion; staleness is decided by the receiver.
pub struct NavigationPool {
    jobs: Option<Sender<NavigationRequest>>,
    outcomes: Receiver<NavigationOutcome>,
    workers: Vec<JoinHandle<()>>,
}

impl NavigationPool {
    pub fn new(search: SearchEngine, worker_count: usize) -> BrowserResult<Self> {
        Self::with_waker(search, worker_count, Arc::new(|| {}))
    }

    pub fn with_waker(
        search: SearchEngine,
        worker_count: usize,
        waker: Waker,
    ) -> BrowserResult<Self> {
        let (job_tx, job_rx) = crossbeam_channel::unbounded::<NavigationRequest>();
        let (outcome_tx, outcome_rx) = crossbeam_channel::unbounded();
        let search = Arc::new(search);
        let mut workers = Vec::with_capacity(worker_count.max(1));

        for index in 0..worker_count.max(1) {
            let jobs = job_rx.clone();
            let outcomes = outcome_tx.clone();
            let search = Arc::clone(&search);
            let waker = Arc::clone(&waker);

            let handle = thread::Builder::new()
                .name(format!("librex-nav-{index}"))
                .stack_size(NAVIGATION_THREAD_STACK_SIZE)
                .spawn(move || run_worker(&jobs, &outcomes, &search, &waker))
                .map_err(|error| {
                    BrowserError::new(
                        "shell.navigation.pool_spawn_failed",
                        format!("failed to spawn navigation worker {index}: {error}"),
                    )
                })?;
            workers.push(handle);
        }

        Ok(Self {
            jobs: Some(job_tx),
            outcomes: outcome_rx,
            workers,
        })
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    pub fn submit(&self, request: NavigationRequest) -> BrowserResult<()> {
        let Some(jobs) = self.jobs.as_ref() else {
            return Err(BrowserError::new(
                "shell.navigation.pool_closed",
                "navigation pool is shut down",
            ));
        };

        debug!(
            id = request.id.get(),
            input = request.raw_input.as_str(),
            "queued navigation task"
        );
        jobs.send(request).map_err(|error| {
            BrowserError::new(
                "shell.navigation.submit_failed",
                format!("navigation queue closed: {error}"),
            )
        })
    }

    /// Non-blocking; `None` when nothing is ready.
    pub fn try_recv(&self) -> Option<NavigationOutcome> {
        match self.outcomes.try_recv() {
            Ok(outcome) => Some(outcome),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                warn!("all navigation workers have exited");
                None
            }
        }
    }

    /// Blocking receive, used by tests and shutdown paths.
    pub fn recv_timeout(&self, timeout: std::time::Duration) -> Option<NavigationOutcome> {
        self.outcomes.recv_timeout(timeout).ok()
    }
}

impl Drop for NavigationPool {
    fn drop(&mut self) {
        // Closing the queue ends each worker's recv loop.
        self.jobs = None;
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

fn run_worker(
    jobs: &Receiver<NavigationRequest>,
    outcomes: &Sender<NavigationOutcome>,
    search: &SearchEngine,
    waker: &Waker,
) {
    while let Ok(request) = jobs.recv() {
        let outcome = request.resolve(search);
        if outcomes.send(outcome).is_err() {
            break;
        }
        waker();
    }
}

#[cfg(test)]
mod tests {
    use super::NavigationPool;
    use crate::navigation::NavigationCounter;
    use crate::navigation::NavigationRequest;
    use lx_config::SearchEngine;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    const WAIT: Duration = Duration::from_secs(5);

    #[test]
    fn resolves_submitted_requests() {
        let pool = NavigationPool::new(SearchEngine::default(), 2);
        assert!(pool.is_ok());
        let pool = pool.unwrap_or_else(|_| unreachable!());
        assert_eq!(pool.worker_count(), 2);

        let mut counter = NavigationCounter::default();
        let id = counter.next();
        let submitted = pool.submit(NavigationRequest {
            raw_input: "cats".to_owned(),
            id,
        });
        assert!(submitted.is_ok());

        let outcome = pool.recv_timeout(WAIT);
        assert!(outcome.is_some());
        let outcome = outcome.unwrap_or_else(|| unreachable!());
        assert_eq!(outcome.id, id);
        assert_eq!(
            outcome.result.map(|url| url.to_string()).as_deref(),
            Ok("https://duckduckgo.com/?q=cats")
        );
    }

    #[test]
    fn every_task_reports_and_wakes() {
        let wakes = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&wakes);
        let pool = NavigationPool::with_waker(
            SearchEngine::default(),
            3,
            Arc::new(move || {
                counted.fetch_add(1, Ordering::SeqCst);
            }),
        )
        .unwrap_or_else(|_| unreachable!());

        let mut counter = NavigationCounter::default();
        for input in ["a.com", "b.com", "c"] {
            let sent = pool.submit(NavigationRequest {
                raw_input: input.to_owned(),
                id: counter.next(),
            });
            assert!(sent.is_ok());
        }

        let mut received = Vec::new();
        while received.len() < 3 {
            match pool.recv_timeout(WAIT) {
                Some(outcome) => received.push(outcome.id.get()),
                None => break,
            }
        }
        received.sort_unstable();
        assert_eq!(received, vec![1, 2, 3]);
        drop(pool);
        assert_eq!(wakes.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn try_recv_is_empty_without_work() {
        let pool =
            NavigationPool::new(SearchEngine::default(), 1).unwrap_or_else(|_| unreachable!());
        assert!(pool.try_recv().is_none());
    }
}
