// Polling loop and connection state machine
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::application::history::HistoryWindow;
use crate::application::telemetry_api::{Credentials, FetchError, TelemetryApi};
use crate::domain::display::{DashboardView, DisplayState};
use crate::domain::level::Thresholds;
use crate::domain::reading::Reading;

#[derive(Debug, Clone)]
pub struct PollerSettings {
    /// Minimum spacing between ticks; the next tick is armed only after the
    /// current one settles, so slow responses never stack requests.
    pub interval: Duration,
    /// How long without a successful fetch before the connection counts as
    /// offline.
    pub offline_after: Duration,
    pub history_days: u32,
    pub history_cap: usize,
    pub capacity_liters: f64,
}

/// True when the last successful fetch is too old to trust. No success yet
/// is stale; exactly `offline_after` elapsed is not.
pub fn is_stale(last_success_at: Option<Instant>, now: Instant, offline_after: Duration) -> bool {
    match last_success_at {
        Some(at) => now.duration_since(at) > offline_after,
        None => true,
    }
}

/// Controls a spawned [`Poller`].
pub struct PollerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Stop the loop. Idempotent. In-flight requests are left to finish but
    /// their results are discarded: no further state mutation, publication,
    /// or re-scheduling.
    pub fn stop(&self) {
        let _ = self.shutdown.send(true);
    }

    /// Wait for the loop task to finish.
    pub async fn join(self) {
        let _ = self.task.await;
    }
}

/// Polls the remote monitor API and publishes derived dashboard views.
///
/// Single mutator of the connection state and the history window; the rest
/// of the process only ever sees immutable snapshots through the watch
/// channel.
pub struct Poller {
    api: Arc<dyn TelemetryApi>,
    settings: PollerSettings,
    thresholds: Thresholds,
    credentials: Credentials,
    latest: Option<Reading>,
    history: HistoryWindow,
    last_success_at: Option<Instant>,
    online: bool,
    output: watch::Sender<DashboardView>,
    shutdown: watch::Receiver<bool>,
}

impl Poller {
    /// Start the loop on the current runtime. The receiver always holds the
    /// most recently published view, beginning with a neutral offline one.
    pub fn spawn(
        api: Arc<dyn TelemetryApi>,
        settings: PollerSettings,
        thresholds: Thresholds,
        credentials: Credentials,
    ) -> (watch::Receiver<DashboardView>, PollerHandle) {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (poller, output_rx) = Self::new(api, settings, thresholds, credentials, shutdown_rx);
        let task = tokio::spawn(poller.run());
        (
            output_rx,
            PollerHandle {
                shutdown: shutdown_tx,
                task,
            },
        )
    }

    fn new(
        api: Arc<dyn TelemetryApi>,
        settings: PollerSettings,
        thresholds: Thresholds,
        credentials: Credentials,
        shutdown: watch::Receiver<bool>,
    ) -> (Self, watch::Receiver<DashboardView>) {
        let initial = DashboardView {
            state: DisplayState::derive(None, &thresholds, false, settings.capacity_liters),
            series: Vec::new(),
        };
        let (output, output_rx) = watch::channel(initial);
        let history = HistoryWindow::new(settings.history_cap);
        (
            Self {
                api,
                settings,
                thresholds,
                credentials,
                latest: None,
                history,
                last_success_at: None,
                online: false,
                output,
                shutdown,
            },
            output_rx,
        )
    }

    async fn run(mut self) {
        loop {
            self.tick().await;
            if self.stopped() {
                break;
            }
            tokio::select! {
                _ = tokio::time::sleep(self.settings.interval) => {}
                changed = self.shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
            if self.stopped() {
                break;
            }
        }
        debug!("polling loop stopped");
    }

    /// One poll pass, with a single re-authentication attempt if the session
    /// has expired, followed by an immediate out-of-cycle pass on success.
    async fn tick(&mut self) {
        let unauthorized = self.poll_once().await;
        if self.stopped() {
            return;
        }
        if unauthorized && self.reauthenticate().await {
            if self.stopped() {
                return;
            }
            self.poll_once().await;
        }
        if self.stopped() {
            return;
        }
        self.refresh_connection();
        self.publish();
    }

    /// Fetch the latest reading and the history window. The two calls are
    /// independent; a failure of one never blocks the other. Returns whether
    /// either signalled an expired session.
    async fn poll_once(&mut self) -> bool {
        let mut unauthorized = false;

        match self.api.fetch_latest().await {
            Ok(reading) => {
                if self.stopped() {
                    return false;
                }
                self.last_success_at = Some(Instant::now());
                self.latest = Some(reading);
            }
            Err(FetchError::Unauthorized) => unauthorized = true,
            Err(err) => warn!("failed to fetch latest reading: {err}"),
        }

        if self.stopped() {
            return unauthorized;
        }

        match self.api.fetch_history(self.settings.history_days).await {
            Ok(readings) => {
                if self.stopped() {
                    return unauthorized;
                }
                self.last_success_at = Some(Instant::now());
                self.history.replace(readings);
            }
            Err(FetchError::Unauthorized) => unauthorized = true,
            Err(err) => warn!("failed to fetch history: {err}"),
        }

        unauthorized
    }

    async fn reauthenticate(&mut self) -> bool {
        info!("session expired, re-authenticating");
        match self.api.login(&self.credentials).await {
            Ok(true) => {
                info!("re-authentication succeeded");
                true
            }
            Ok(false) => {
                warn!("re-authentication rejected, will retry on the next poll");
                false
            }
            Err(err) => {
                warn!("re-authentication failed: {err}");
                false
            }
        }
    }

    /// Recompute online/offline from staleness. A single success flips the
    /// connection online immediately; failures only degrade it once the
    /// staleness threshold is crossed.
    fn refresh_connection(&mut self) {
        let online = !is_stale(
            self.last_success_at,
            Instant::now(),
            self.settings.offline_after,
        );
        if online != self.online {
            if online {
                info!("connection restored");
            } else {
                warn!(
                    "no successful fetch within {:?}, connection is offline",
                    self.settings.offline_after
                );
            }
            self.online = online;
        }
    }

    fn publish(&self) {
        let state = DisplayState::derive(
            self.latest.as_ref(),
            &self.thresholds,
            self.online,
            self.settings.capacity_liters,
        );
        self.output.send_replace(DashboardView {
            state,
            series: self.history.series(),
        });
    }

    fn stopped(&self) -> bool {
        *self.shutdown.borrow()
    }
}
