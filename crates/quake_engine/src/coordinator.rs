use std::io::BufReader;
use std::sync::{mpsc, Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use quake_core::{update, Effect, FailureCause, FetchPhase, FetchState, Msg, QueryParams};
use quake_logging::{quake_debug, quake_error, quake_info, quake_warn};
use tokio_util::io::SyncIoBridge;

use crate::fetch::{FetchSettings, Fetcher, ReqwestFetcher};
use crate::listener::QuakeListener;
use crate::xml::scan_reader;
use crate::ResponseBody;

/// Element whose text is extracted from the feed.
pub const DEFAULT_TARGET_TAG: &str = "text";

#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    pub query: QueryParams,
    pub target_tag: String,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            query: QueryParams::default(),
            target_tag: DEFAULT_TARGET_TAG.to_string(),
        }
    }
}

type BoxedListener = Box<dyn QuakeListener>;

enum WorkerCommand {
    SendQuery,
}

struct Shared {
    state: Mutex<FetchState<BoxedListener>>,
    config: CoordinatorConfig,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, FetchState<BoxedListener>> {
        // Listeners never run under the lock, so a poisoned guard still holds
        // a consistent state.
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn apply(&self, msg: Msg<BoxedListener>) -> Vec<Effect<BoxedListener>> {
        let mut state = self.lock();
        let (next, effects) = update(std::mem::take(&mut *state), msg);
        *state = next;
        effects
    }

    fn complete(&self, msg: Msg<BoxedListener>) {
        let effects = self.apply(msg);
        if effects.is_empty() {
            quake_debug!("Completion arrived with no pending listener; dropped");
        }
        for effect in effects {
            notify(effect);
        }
    }
}

/// Fetch-once coordinator for the most recent quake location.
///
/// The first successful fetch is latched and served to every later
/// [`request`](Self::request) without touching the network. Only one fetch
/// is in flight at a time; a caller arriving while one is outstanding gets
/// `on_failure()` right away and the outstanding caller is unaffected.
///
/// Network work runs on a dedicated worker thread owning its own tokio
/// runtime, so `request` never blocks. Dropping the coordinator while a fetch
/// is in flight cancels it; its listener is dropped without being notified.
pub struct QuakeFetcher {
    shared: Arc<Shared>,
    cmd_tx: mpsc::Sender<WorkerCommand>,
}

impl QuakeFetcher {
    pub fn new(fetcher: Arc<dyn Fetcher>, config: CoordinatorConfig) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let shared = Arc::new(Shared {
            state: Mutex::new(FetchState::new()),
            config,
        });

        let worker_shared = shared.clone();
        let spawned = thread::Builder::new()
            .name("quake-fetch".to_string())
            .spawn(move || run_worker(fetcher, worker_shared, cmd_rx));
        if let Err(err) = spawned {
            // Every dispatch will now fail and be reported as a transport failure.
            quake_error!("Could not start fetch worker: {}", err);
        }

        Self { shared, cmd_tx }
    }

    /// Coordinator backed by [`ReqwestFetcher`].
    pub fn from_settings(settings: FetchSettings, config: CoordinatorConfig) -> Self {
        Self::new(Arc::new(ReqwestFetcher::new(settings)), config)
    }

    /// Reports the cached value, or fetches it if nothing is cached.
    ///
    /// A cache hit calls `on_success` before this returns, on the calling
    /// thread.
    pub fn request(&self, listener: impl QuakeListener + 'static) {
        self.submit(Msg::Request(Box::new(listener)));
    }

    /// Fetches a fresh value even if one is cached.
    ///
    /// A failed refresh clears the cache.
    pub fn refresh(&self, listener: impl QuakeListener + 'static) {
        self.submit(Msg::Refresh(Box::new(listener)));
    }

    pub fn phase(&self) -> FetchPhase {
        self.shared.lock().phase()
    }

    pub fn cached_value(&self) -> Option<String> {
        self.shared.lock().cached_value().map(ToOwned::to_owned)
    }

    /// Cause of the most recent failed cycle, cleared by a success.
    pub fn last_failure(&self) -> Option<FailureCause> {
        self.shared.lock().last_failure()
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.shared.config
    }

    fn submit(&self, msg: Msg<BoxedListener>) {
        for effect in self.shared.apply(msg) {
            match effect {
                Effect::SendQuery => self.dispatch_query(),
                other => notify(other),
            }
        }
    }

    fn dispatch_query(&self) {
        quake_info!(
            "Requesting feed (format={}, minmagnitude={})",
            self.shared.config.query.format,
            self.shared.config.query.min_magnitude
        );
        if self.cmd_tx.send(WorkerCommand::SendQuery).is_err() {
            quake_error!("Fetch worker is not running");
            self.shared.complete(Msg::TransportFailed);
        }
    }
}

fn notify(effect: Effect<BoxedListener>) {
    match effect {
        Effect::NotifySuccess { listener, value } => {
            quake_info!("Reporting quake location: {}", value);
            listener.on_success(&value);
        }
        Effect::NotifyFailure { listener, cause } => {
            if cause == FailureCause::Busy {
                quake_warn!("Rejected request: {}", cause);
            } else {
                quake_info!("Reporting failure: {}", cause);
            }
            listener.on_failure();
        }
        Effect::SendQuery => quake_debug!("Query effect outside a request; ignored"),
    }
}

fn run_worker(
    fetcher: Arc<dyn Fetcher>,
    shared: Arc<Shared>,
    cmd_rx: mpsc::Receiver<WorkerCommand>,
) {
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            quake_error!("Could not build fetch runtime: {}", err);
            while cmd_rx.recv().is_ok() {
                shared.complete(Msg::TransportFailed);
            }
            return;
        }
    };

    while let Ok(command) = cmd_rx.recv() {
        match command {
            WorkerCommand::SendQuery => {
                let fetcher = fetcher.clone();
                let shared = shared.clone();
                runtime.spawn(async move {
                    // The query runs as its own task so a panicking fetcher
                    // still ends the cycle.
                    let config = shared.config.clone();
                    let query =
                        tokio::spawn(async move { run_query(fetcher.as_ref(), &config).await });
                    let msg = match query.await {
                        Ok(msg) => msg,
                        Err(err) => {
                            quake_error!("Query task failed: {}", err);
                            Msg::TransportFailed
                        }
                    };
                    shared.complete(msg);
                });
            }
        }
    }

    runtime.shutdown_timeout(Duration::from_secs(1));
}

async fn run_query(fetcher: &dyn Fetcher, config: &CoordinatorConfig) -> Msg<BoxedListener> {
    match fetcher.send_query(&config.query).await {
        Ok(output) => {
            quake_debug!(
                "Received response {} from {}",
                output.metadata.status,
                output.metadata.final_url
            );
            scan_body(output.body, config.target_tag.clone()).await
        }
        Err(err) => {
            quake_warn!("Error receiving response from server: {}", err);
            Msg::TransportFailed
        }
    }
}

/// Scans the body on a blocking thread, reading only as far as the match.
async fn scan_body(body: ResponseBody, target: String) -> Msg<BoxedListener> {
    let reader = SyncIoBridge::new(body);
    let scanned =
        tokio::task::spawn_blocking(move || scan_reader(BufReader::new(reader), &target)).await;

    match scanned {
        Ok(Ok(result)) => {
            quake_debug!("Scan finished: {:?}", result);
            Msg::ResponseScanned(result)
        }
        Ok(Err(err)) => {
            quake_warn!("Error reading response body: {}", err);
            Msg::TransportFailed
        }
        Err(err) => {
            quake_error!("Scan task failed: {}", err);
            Msg::TransportFailed
        }
    }
}
