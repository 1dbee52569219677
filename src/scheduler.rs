//! Reminder scheduler background loop.
//!
//! Spawns a tokio task that scans the shared task store immediately and then
//! once per period until stopped. Each scan first reloads the task list, since
//! other `tidings` invocations write the same storage while the watcher runs.
//! Stopping signals the loop and waits for it to exit, so no scan can start
//! after [`ReminderScheduler::stop`] returns.

use std::sync::Arc;

use tidings_core::{Clock, Notifier, ReminderPoller, Storage, SystemClock, TaskStore};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Duration, MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// Task store shared between the CLI and the scheduler
pub type SharedStore<S, C = SystemClock> = Arc<Mutex<TaskStore<S, C>>>;

struct Running {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Start/stop handle for periodic reminder scans
pub struct ReminderScheduler {
    period: Duration,
    running: Option<Running>,
}

impl ReminderScheduler {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            running: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Spawn the scan loop; does nothing if it is already running
    pub fn start<S, C, N>(&mut self, store: SharedStore<S, C>, mut poller: ReminderPoller<N>)
    where
        S: Storage + Send + 'static,
        C: Clock + Send + 'static,
        N: Notifier + Send + 'static,
    {
        if self.running.is_some() {
            debug!("reminder scheduler already running");
            return;
        }

        let (shutdown, mut shutdown_rx) = watch::channel(false);
        let period = self.period;

        let handle = tokio::spawn(async move {
            poller.request_permission();

            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!(period_secs = period.as_secs(), "reminder scheduler started");

            loop {
                tokio::select! {
                    biased;

                    // Also fires if the handle was dropped without stop()
                    _ = shutdown_rx.changed() => break,

                    _ = interval.tick() => {
                        let mut store = store.lock().await;
                        let scanned = store
                            .reload()
                            .and_then(|()| poller.check_reminders(&mut store));
                        if let Err(e) = scanned {
                            error!("reminder scan failed: {e}");
                        }
                    }
                }
            }

            info!("reminder scheduler stopped");
        });

        self.running = Some(Running { shutdown, handle });
    }

    /// Stop the scan loop and wait for it to exit; does nothing if not running
    pub async fn stop(&mut self) {
        let Some(running) = self.running.take() else {
            return;
        };

        let _ = running.shutdown.send(true);
        if let Err(e) = running.handle.await {
            warn!("reminder scheduler ended abnormally: {e}");
        }
    }
}
