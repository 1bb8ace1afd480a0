use std::any::Any;
use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::JoinHandle;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::core::{
    DataPoint, TimeAxisLabel, TimeWindow, canonicalize_points, points_in_time_window,
};
use crate::error::{GraphError, GraphResult};

use super::time_axis_labeler::{TimeAxisLabeler, normalize_labels};

/// Range handed to a data provider: the visible window padded by one span on
/// each side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRange {
    pub fetch: TimeWindow,
    pub visible: TimeWindow,
}

impl FetchRange {
    #[must_use]
    pub fn around(visible: TimeWindow) -> Self {
        Self {
            fetch: visible.padded(),
            visible,
        }
    }
}

/// Source of timestamped samples.
///
/// Implementations run on the fetch worker when [`FetchBackend::Worker`] is
/// selected, hence `Send + 'static`.
pub trait DataProvider: Send + 'static {
    /// Points inside `range.fetch`; points outside it are dropped. An empty
    /// vector means no data.
    fn fetch(&mut self, range: FetchRange) -> GraphResult<Vec<DataPoint>>;

    /// Axis labels for freshly fetched points.
    fn labels_for(&mut self, _points: &[DataPoint]) -> Vec<TimeAxisLabel> {
        Vec::new()
    }
}

/// Where provider calls execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FetchBackend {
    /// Fetch synchronously when the refresh is requested. Meant for headless
    /// hosts and tests; the caller blocks on the provider.
    Inline,
    /// Fetch on a dedicated worker thread.
    #[default]
    Worker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshRequest {
    pub window: TimeWindow,
    pub animate: bool,
    /// Clear-epoch at request time.
    pub epoch: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FetchedWindow {
    pub points: Vec<DataPoint>,
    pub labels: Vec<TimeAxisLabel>,
}

#[derive(Debug)]
pub struct RefreshOutcome {
    pub request: RefreshRequest,
    pub result: GraphResult<FetchedWindow>,
}

/// What happened to a refresh request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestDisposition {
    /// A fetch started (or completed, inline) for this request.
    Started,
    /// A fetch was already in flight; the request now occupies the pending
    /// slot.
    Coalesced,
}

struct FetchJob {
    provider: Box<dyn DataProvider>,
    labeler: Option<TimeAxisLabeler>,
}

impl FetchJob {
    fn run(&mut self, request: RefreshRequest) -> RefreshOutcome {
        let range = FetchRange::around(request.window);
        trace!(
            fetch_start = range.fetch.start,
            fetch_end = range.fetch.end,
            "fetching data window"
        );
        let fetched = panic::catch_unwind(AssertUnwindSafe(|| self.provider.fetch(range)))
            .unwrap_or_else(|payload| {
                let message = panic_message(payload.as_ref());
                warn!(%message, "data provider panicked");
                Err(GraphError::Provider(format!("provider panicked: {message}")))
            });
        let result = fetched.and_then(|points| self.finish(range, points));
        RefreshOutcome { request, result }
    }

    fn finish(&mut self, range: FetchRange, points: Vec<DataPoint>) -> GraphResult<FetchedWindow> {
        if points.iter().any(|point| !point.value.is_finite()) {
            return Err(GraphError::InvalidData(
                "provider returned a non-finite value".to_owned(),
            ));
        }
        let points = points_in_time_window(&canonicalize_points(points), range.fetch);
        let labels = if points.is_empty() {
            Vec::new()
        } else {
            match &self.labeler {
                Some(labeler) => labeler.label_points(&points),
                None => normalize_labels(self.provider.labels_for(&points)),
            }
        };
        Ok(FetchedWindow { points, labels })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}

#[derive(Debug, Default)]
struct Mailbox {
    pending: Option<RefreshRequest>,
    in_flight: bool,
    shutdown: bool,
}

type SharedMailbox = Arc<(Mutex<Mailbox>, Condvar)>;

fn lock_mailbox(shared: &SharedMailbox) -> GraphResult<MutexGuard<'_, Mailbox>> {
    shared.0.lock().map_err(|_| GraphError::FetcherDisconnected)
}

struct FetchWorker {
    shared: SharedMailbox,
    outcomes: Receiver<RefreshOutcome>,
    thread: Option<JoinHandle<()>>,
}

impl FetchWorker {
    fn spawn(job: FetchJob) -> GraphResult<Self> {
        let shared: SharedMailbox = Arc::new((Mutex::new(Mailbox::default()), Condvar::new()));
        let (sender, outcomes) = mpsc::channel();
        let worker_shared = Arc::clone(&shared);
        let thread = std::thread::Builder::new()
            .name("timegraph-fetch".to_owned())
            .spawn(move || worker_loop(job, &worker_shared, &sender))
            .map_err(|err| GraphError::Provider(format!("failed to spawn fetch worker: {err}")))?;
        Ok(Self {
            shared,
            outcomes,
            thread: Some(thread),
        })
    }
}

impl Drop for FetchWorker {
    fn drop(&mut self) {
        if let Ok(mut mailbox) = self.shared.0.lock() {
            mailbox.shutdown = true;
            mailbox.pending = None;
        }
        self.shared.1.notify_all();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("fetch worker panicked before shutdown");
            }
        }
    }
}

fn worker_loop(mut job: FetchJob, shared: &SharedMailbox, sender: &Sender<RefreshOutcome>) {
    loop {
        let request = {
            let Ok(mut mailbox) = shared.0.lock() else {
                return;
            };
            loop {
                if mailbox.shutdown {
                    return;
                }
                if let Some(request) = mailbox.pending.take() {
                    mailbox.in_flight = true;
                    break request;
                }
                mailbox.in_flight = false;
                mailbox = match shared.1.wait(mailbox) {
                    Ok(guard) => guard,
                    Err(_) => return,
                };
            }
        };

        let outcome = job.run(request);

        let Ok(mut mailbox) = shared.0.lock() else {
            return;
        };
        if mailbox.shutdown {
            return;
        }
        if let Some(pending) = mailbox.pending.as_mut() {
            pending.animate |= request.animate && pending.epoch == request.epoch;
            debug!(
                start = request.window.start,
                end = request.window.end,
                "dropping superseded fetch result"
            );
            continue;
        }
        // Idle state and delivery are published under one lock.
        mailbox.in_flight = false;
        if sender.send(outcome).is_err() {
            return;
        }
    }
}

enum Backend {
    Inline {
        job: FetchJob,
        outcomes: VecDeque<RefreshOutcome>,
    },
    Worker(FetchWorker),
}

/// Runs provider fetches with at most one in flight and a single coalescing
/// pending slot.
pub struct DataWindowFetcher {
    backend: Backend,
}

impl std::fmt::Debug for DataWindowFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let backend = match self.backend {
            Backend::Inline { .. } => FetchBackend::Inline,
            Backend::Worker(_) => FetchBackend::Worker,
        };
        f.debug_struct("DataWindowFetcher")
            .field("backend", &backend)
            .finish_non_exhaustive()
    }
}

impl DataWindowFetcher {
    pub fn new(
        provider: Box<dyn DataProvider>,
        labeler: Option<TimeAxisLabeler>,
        backend: FetchBackend,
    ) -> GraphResult<Self> {
        let job = FetchJob { provider, labeler };
        let backend = match backend {
            FetchBackend::Inline => Backend::Inline {
                job,
                outcomes: VecDeque::new(),
            },
            FetchBackend::Worker => Backend::Worker(FetchWorker::spawn(job)?),
        };
        Ok(Self { backend })
    }

    #[must_use]
    pub fn backend(&self) -> FetchBackend {
        match self.backend {
            Backend::Inline { .. } => FetchBackend::Inline,
            Backend::Worker(_) => FetchBackend::Worker,
        }
    }

    pub fn request(&mut self, request: RefreshRequest) -> GraphResult<RequestDisposition> {
        match &mut self.backend {
            Backend::Inline { job, outcomes } => {
                let mut request = request;
                request.animate |= outcomes.iter().any(|queued| {
                    queued.request.animate && queued.request.epoch == request.epoch
                });
                let outcome = job.run(request);
                // Only the newest inline outcome matters.
                outcomes.clear();
                outcomes.push_back(outcome);
                Ok(RequestDisposition::Started)
            }
            Backend::Worker(worker) => {
                let mut mailbox = lock_mailbox(&worker.shared)?;
                if mailbox.shutdown {
                    return Err(GraphError::FetcherDisconnected);
                }
                let busy = mailbox.in_flight || mailbox.pending.is_some();
                let mut request = request;
                if let Some(replaced) = mailbox.pending {
                    request.animate |= replaced.animate && replaced.epoch == request.epoch;
                }
                mailbox.pending = Some(request);
                drop(mailbox);
                worker.shared.1.notify_one();
                if busy {
                    debug!(
                        start = request.window.start,
                        end = request.window.end,
                        "refresh coalesced into pending slot"
                    );
                    Ok(RequestDisposition::Coalesced)
                } else {
                    Ok(RequestDisposition::Started)
                }
            }
        }
    }

    /// `true` while a fetch is running or queued.
    pub fn is_busy(&self) -> GraphResult<bool> {
        match &self.backend {
            Backend::Inline { .. } => Ok(false),
            Backend::Worker(worker) => {
                let mailbox = lock_mailbox(&worker.shared)?;
                Ok(mailbox.in_flight || mailbox.pending.is_some())
            }
        }
    }

    /// Drains completed outcomes without blocking.
    pub fn poll(&mut self) -> GraphResult<Vec<RefreshOutcome>> {
        match &mut self.backend {
            Backend::Inline { outcomes, .. } => Ok(outcomes.drain(..).collect()),
            Backend::Worker(worker) => {
                let mut ready = Vec::new();
                loop {
                    match worker.outcomes.try_recv() {
                        Ok(outcome) => ready.push(outcome),
                        Err(TryRecvError::Empty) => return Ok(ready),
                        Err(TryRecvError::Disconnected) if !ready.is_empty() => {
                            return Ok(ready);
                        }
                        Err(TryRecvError::Disconnected) => {
                            return Err(GraphError::FetcherDisconnected);
                        }
                    }
                }
            }
        }
    }

    /// Blocks up to `timeout` for the next outcome.
    pub fn wait(&mut self, timeout: Duration) -> GraphResult<Option<RefreshOutcome>> {
        match &mut self.backend {
            Backend::Inline { outcomes, .. } => Ok(outcomes.pop_front()),
            Backend::Worker(worker) => match worker.outcomes.recv_timeout(timeout) {
                Ok(outcome) => Ok(Some(outcome)),
                Err(RecvTimeoutError::Timeout) => Ok(None),
                Err(RecvTimeoutError::Disconnected) => Err(GraphError::FetcherDisconnected),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        DataProvider, DataWindowFetcher, FetchBackend, FetchRange, RefreshRequest,
        RequestDisposition,
    };
    use crate::core::{DataPoint, TimeAxisLabel, TimeWindow};
    use crate::error::GraphResult;

    struct Fixed;

    impl DataProvider for Fixed {
        fn fetch(&mut self, range: FetchRange) -> GraphResult<Vec<DataPoint>> {
            Ok(vec![
                DataPoint::new(range.visible.end, 2.0),
                DataPoint::new(range.visible.start, 1.0),
            ])
        }

        fn labels_for(&mut self, points: &[DataPoint]) -> Vec<TimeAxisLabel> {
            points
                .iter()
                .rev()
                .map(|point| TimeAxisLabel::new(point.timestamp, "x"))
                .collect()
        }
    }

    #[test]
    fn fetch_range_pads_one_span_each_side() {
        let range = FetchRange::around(TimeWindow::new(100, 200));
        assert_eq!(range.fetch, TimeWindow::new(0, 300));
        assert_eq!(range.visible, TimeWindow::new(100, 200));
    }

    #[test]
    fn inline_backend_canonicalizes_points_and_labels() {
        let mut fetcher =
            DataWindowFetcher::new(Box::new(Fixed), None, FetchBackend::Inline).expect("fetcher");
        let request = RefreshRequest {
            window: TimeWindow::new(10, 20),
            animate: false,
            epoch: 0,
        };
        assert_eq!(
            fetcher.request(request).expect("request"),
            RequestDisposition::Started
        );
        let outcomes = fetcher.poll().expect("poll");
        assert_eq!(outcomes.len(), 1);
        let fetched = outcomes[0].result.as_ref().expect("fetched");
        assert_eq!(fetched.points[0].timestamp, 10);
        assert_eq!(fetched.labels[0].timestamp, 10);
        assert!(fetcher.poll().expect("poll").is_empty());
    }

    struct Spill;

    impl DataProvider for Spill {
        fn fetch(&mut self, range: FetchRange) -> GraphResult<Vec<DataPoint>> {
            Ok(vec![
                DataPoint::new(range.fetch.start - 1, 0.0),
                DataPoint::new(range.fetch.start, 1.0),
                DataPoint::new(range.fetch.end + 1, 2.0),
            ])
        }
    }

    #[test]
    fn points_outside_fetch_range_are_dropped() {
        let mut fetcher =
            DataWindowFetcher::new(Box::new(Spill), None, FetchBackend::Inline).expect("fetcher");
        fetcher
            .request(RefreshRequest {
                window: TimeWindow::new(100, 200),
                animate: false,
                epoch: 0,
            })
            .expect("request");
        let outcome = fetcher.wait(std::time::Duration::ZERO).expect("wait");
        let fetched = outcome.expect("outcome").result.expect("fetched");
        assert_eq!(fetched.points, vec![DataPoint::new(0, 1.0)]);
    }
}
