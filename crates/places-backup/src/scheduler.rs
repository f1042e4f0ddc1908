//! Backup scheduler and its timer loop.
//!
//! ## Lifecycle
//!
//! `start` arms one task that owns both timers: a one-shot check after
//! `initial_delay_ms`, then a repeating check every `interval / 3`. `stop`
//! signals the task, which finishes any check in progress and exits. Both
//! calls are idempotent.
//!
//! Checks never overlap: a check requested while another one is running
//! (for example `check_now` racing a timer tick) returns
//! [`BackupOutcome::Busy`] without touching the file or the watermark.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tokio::sync::{broadcast, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, MissedTickBehavior};
use tracing::{debug, info, instrument, warn};

use places_codec::export_all;
use places_core::defaults::{BACKUP_WATERMARK_KEY, EVENT_BUS_CAPACITY};
use places_core::{load_setting, save_setting, write_atomic, Clock, PlacesStore, Result, SettingsStore};

use crate::config::BackupConfig;
use crate::event::{BackupEvent, BackupOutcome};

/// Collaborators and state shared with the timer task.
struct Shared {
    places: Arc<dyn PlacesStore>,
    settings: Arc<dyn SettingsStore>,
    clock: Arc<dyn Clock>,
    config: BackupConfig,
    event_tx: broadcast::Sender<BackupEvent>,
    running: tokio::sync::Mutex<()>,
}

/// Timers of an armed scheduler.
struct Armed {
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

/// Periodically backs up bookmarks to `config.path`.
pub struct BackupScheduler {
    shared: Arc<Shared>,
    armed: Mutex<Option<Armed>>,
}

impl BackupScheduler {
    pub fn new(
        places: Arc<dyn PlacesStore>,
        settings: Arc<dyn SettingsStore>,
        clock: Arc<dyn Clock>,
        config: BackupConfig,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_BUS_CAPACITY);
        Self {
            shared: Arc::new(Shared {
                places,
                settings,
                clock,
                config,
                event_tx,
                running: tokio::sync::Mutex::new(()),
            }),
            armed: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &BackupConfig {
        &self.shared.config
    }

    /// Get a receiver for scheduler events.
    pub fn events(&self) -> broadcast::Receiver<BackupEvent> {
        self.shared.event_tx.subscribe()
    }

    fn armed(&self) -> MutexGuard<'_, Option<Armed>> {
        self.armed.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_armed(&self) -> bool {
        self.armed()
            .as_ref()
            .is_some_and(|armed| !armed.task.is_finished())
    }

    /// Arm the timers. No-op when already armed or disabled.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self) {
        let mut armed = self.armed();
        if armed.as_ref().is_some_and(|a| !a.task.is_finished()) {
            debug!(subsystem = "backup", "Backup scheduler already armed");
            return;
        }
        if !self.shared.config.enabled {
            info!(subsystem = "backup", "Bookmark backups are disabled, not starting");
            return;
        }

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let shared = Arc::clone(&self.shared);
        let task = tokio::spawn(async move {
            shared.run(shutdown_rx).await;
        });
        *armed = Some(Armed { shutdown_tx, task });
    }

    /// Cancel the timers. No-op when not armed.
    pub fn stop(&self) {
        if let Some(armed) = self.armed().take() {
            // The task may already have exited; nothing to signal then.
            let _ = armed.shutdown_tx.send(());
        }
    }

    /// Run one check-and-export now, outside the timers.
    pub async fn check_now(&self) -> Result<BackupOutcome> {
        self.shared.check_and_report("manual").await
    }
}

impl Drop for BackupScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

impl Shared {
    #[instrument(skip(self, shutdown_rx), fields(subsystem = "backup"))]
    async fn run(&self, mut shutdown_rx: oneshot::Receiver<()>) {
        let period = self.config.check_period();
        info!(
            interval_ms = self.config.interval_ms,
            period_ms = period.as_millis() as u64,
            initial_delay_ms = self.config.initial_delay_ms,
            path = %self.config.path.display(),
            "Backup scheduler armed"
        );
        let _ = self.event_tx.send(BackupEvent::Started);

        let initial = sleep(Duration::from_millis(self.config.initial_delay_ms));
        tokio::pin!(initial);
        let mut initial_pending = true;

        let mut ticker = interval_at(tokio::time::Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = &mut shutdown_rx => {
                    info!("Backup scheduler received shutdown signal");
                    break;
                }
                _ = &mut initial, if initial_pending => {
                    initial_pending = false;
                    let _ = self.check_and_report("initial").await;
                }
                _ = ticker.tick() => {
                    let _ = self.check_and_report("interval").await;
                }
            }
        }

        let _ = self.event_tx.send(BackupEvent::Stopped);
        info!("Backup scheduler stopped");
    }

    /// Run a check, then log and broadcast what happened.
    async fn check_and_report(&self, trigger: &'static str) -> Result<BackupOutcome> {
        let start = Instant::now();
        let result = self.check_and_export().await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match &result {
            Ok(BackupOutcome::Written { path, bytes }) => info!(
                subsystem = "backup",
                trigger,
                path = %path.display(),
                bytes,
                duration_ms,
                "Bookmark backup written"
            ),
            Ok(outcome) => debug!(subsystem = "backup", trigger, ?outcome, "Bookmark backup skipped"),
            Err(e) => warn!(
                subsystem = "backup",
                trigger,
                error = %e,
                duration_ms,
                "Bookmark backup failed"
            ),
        }

        let event = match &result {
            Ok(outcome) => BackupEvent::Checked(outcome.clone()),
            Err(e) => BackupEvent::Failed {
                error: e.to_string(),
            },
        };
        let _ = self.event_tx.send(event);
        result
    }

    async fn check_and_export(&self) -> Result<BackupOutcome> {
        let Ok(_running) = self.running.try_lock() else {
            return Ok(BackupOutcome::Busy);
        };

        let now = self.clock.now_ms();
        let watermark: Option<i64> =
            load_setting(self.settings.as_ref(), BACKUP_WATERMARK_KEY).await?;
        if let Some(last_backup_ms) = watermark {
            if now.saturating_sub(last_backup_ms) <= self.config.interval_span_ms() {
                return Ok(BackupOutcome::TooSoon { last_backup_ms });
            }
        }

        let html = export_all(self.places.as_ref()).await?;
        let bytes = html.len();
        if bytes <= self.config.min_bytes {
            return Ok(BackupOutcome::TooSmall { bytes });
        }

        write_atomic(&self.config.path, html.as_bytes()).await?;
        let watermark = self.clock.now_ms();
        save_setting(self.settings.as_ref(), BACKUP_WATERMARK_KEY, &watermark).await?;
        debug!(subsystem = "backup", watermark, "Backup watermark advanced");

        Ok(BackupOutcome::Written {
            path: self.config.path.clone(),
            bytes,
        })
    }
}
