//! Debounced, batched write queue over the storage port.

use std::collections::HashMap;
use std::future::pending;
use std::mem;
use std::sync::Arc;
use std::time::Duration;

use roteiro_core::clock::Clock;
use roteiro_core::event::{ChangeEvent, ChangeKind};
use roteiro_core::storage::StoragePort;
use tokio::sync::{broadcast, mpsc};
use tokio::time::{Instant, sleep_until};
use tracing::warn;

/// Storage key the update marker is written under.
pub const UPDATE_MARKER_KEY: &str = "last_update";

/// Quiescence window before queued documents flush to storage.
pub const DEFAULT_FLUSH_WINDOW: Duration = Duration::from_millis(280);

/// Quiescence window before the update marker write and change broadcast.
/// Longer than the flush window so one user action editing several fields
/// produces a single notification.
pub const DEFAULT_MARKER_WINDOW: Duration = Duration::from_millis(1000);

enum SyncCommand {
    Save {
        key: String,
        value: serde_json::Value,
    },
    Notify {
        kind: ChangeKind,
    },
    CancelPending,
}

/// The persistence/synchronization layer.
///
/// `save` enqueues a document under a key; a single shared timer, reset on
/// every `save`, flushes all queued keys together once writes go quiet.
/// `notify` schedules the longer-debounced update marker write and the typed
/// broadcast to subscribers. All queue state is owned by a background task,
/// so callers never block and never observe partial flushes.
///
/// Must be constructed inside a Tokio runtime.
#[derive(Debug)]
pub struct SyncLayer {
    commands: mpsc::UnboundedSender<SyncCommand>,
    changes: broadcast::Sender<ChangeEvent>,
}

impl SyncLayer {
    /// Create a sync layer with the default debounce windows.
    #[must_use]
    pub fn new(storage: Arc<dyn StoragePort>, clock: Arc<dyn Clock>) -> Self {
        Self::with_windows(storage, clock, DEFAULT_FLUSH_WINDOW, DEFAULT_MARKER_WINDOW)
    }

    /// Create a sync layer with explicit debounce windows.
    #[must_use]
    pub fn with_windows(
        storage: Arc<dyn StoragePort>,
        clock: Arc<dyn Clock>,
        flush_window: Duration,
        marker_window: Duration,
    ) -> Self {
        let (commands, receiver) = mpsc::unbounded_channel();
        let (changes, _) = broadcast::channel(64);

        let worker = Worker {
            storage,
            clock,
            changes: changes.clone(),
            flush_window,
            marker_window,
            queue: HashMap::new(),
            flush_deadline: None,
            pending_kinds: Vec::new(),
            marker_deadline: None,
        };
        tokio::spawn(worker.run(receiver));

        Self { commands, changes }
    }

    /// Enqueue `value` under `key`. The physical write is deferred until the
    /// quiescence window elapses with no further saves; a later save to the
    /// same key replaces the queued value.
    pub fn save(&self, key: &str, value: serde_json::Value) {
        self.send(SyncCommand::Save {
            key: key.to_owned(),
            value,
        });
    }

    /// Record that a mutation of the given kind logically completed. After
    /// the marker window elapses the update marker is written and a
    /// `ChangeEvent` is broadcast, whether or not the data flush has
    /// physically happened yet.
    pub fn notify(&self, kind: ChangeKind) {
        self.send(SyncCommand::Notify { kind });
    }

    /// Subscribe to change broadcasts.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.changes.subscribe()
    }

    /// Drop all queued writes and pending notifications. In-flight storage
    /// writes that already started are not interrupted.
    pub fn cancel_pending(&self) {
        self.send(SyncCommand::CancelPending);
    }

    fn send(&self, command: SyncCommand) {
        if self.commands.send(command).is_err() {
            warn!("sync worker is gone; dropping command");
        }
    }
}

struct Worker {
    storage: Arc<dyn StoragePort>,
    clock: Arc<dyn Clock>,
    changes: broadcast::Sender<ChangeEvent>,
    flush_window: Duration,
    marker_window: Duration,
    queue: HashMap<String, serde_json::Value>,
    flush_deadline: Option<Instant>,
    pending_kinds: Vec<ChangeKind>,
    marker_deadline: Option<Instant>,
}

impl Worker {
    async fn run(mut self, mut receiver: mpsc::UnboundedReceiver<SyncCommand>) {
        loop {
            tokio::select! {
                command = receiver.recv() => match command {
                    Some(command) => self.apply(command),
                    // Owner dropped: pending timers die with the session.
                    None => break,
                },
                () = deadline(self.flush_deadline), if self.flush_deadline.is_some() => {
                    self.flush().await;
                }
                () = deadline(self.marker_deadline), if self.marker_deadline.is_some() => {
                    self.mark().await;
                }
            }
        }
    }

    fn apply(&mut self, command: SyncCommand) {
        match command {
            SyncCommand::Save { key, value } => {
                self.queue.insert(key, value);
                self.flush_deadline = Some(Instant::now() + self.flush_window);
            }
            SyncCommand::Notify { kind } => {
                if !self.pending_kinds.contains(&kind) {
                    self.pending_kinds.push(kind);
                }
                self.marker_deadline = Some(Instant::now() + self.marker_window);
            }
            SyncCommand::CancelPending => {
                self.queue.clear();
                self.flush_deadline = None;
                self.pending_kinds.clear();
                self.marker_deadline = None;
            }
        }
    }

    /// Write every queued key. A failure on one key is logged and dropped;
    /// the remaining keys still flush. Commands arriving while a write is in
    /// flight are buffered and picked up on the next loop turn.
    async fn flush(&mut self) {
        self.flush_deadline = None;
        for (key, value) in mem::take(&mut self.queue) {
            if let Err(error) = self.storage.put(&key, &value).await {
                warn!(%key, %error, "dropping queued write after storage failure");
            }
        }
    }

    async fn mark(&mut self) {
        self.marker_deadline = None;
        let kinds = mem::take(&mut self.pending_kinds);

        let stamp = serde_json::Value::String(self.clock.now().to_rfc3339());
        if let Err(error) = self.storage.put(UPDATE_MARKER_KEY, &stamp).await {
            warn!(%error, "failed to write update marker");
        }

        for kind in kinds {
            // No subscribers is fine; the send result only reports that.
            let _ = self.changes.send(ChangeEvent { kind });
        }
    }
}

async fn deadline(at: Option<Instant>) {
    match at {
        Some(at) => sleep_until(at).await,
        None => pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{TimeZone, Utc};
    use roteiro_test_support::{FixedClock, QuotaStorage, RecordingStorage};
    use serde_json::json;

    fn fixed_clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock(
            Utc.with_ymd_and_hms(2026, 3, 2, 14, 30, 0).unwrap(),
        ))
    }

    /// Let the worker task drain its channel and finish any flush in
    /// progress. Paused-clock tests auto-advance past timers while idle.
    async fn settle() {
        tokio::time::sleep(Duration::from_secs(5)).await;
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_saves_within_window_coalesce_to_one_write() {
        // Arrange
        let storage = Arc::new(RecordingStorage::new());
        let sync = SyncLayer::new(storage.clone(), fixed_clock());

        // Act
        sync.save("steps", json!([1]));
        sync.save("steps", json!([1, 2]));
        sync.save("steps", json!([1, 2, 3]));
        settle().await;

        // Assert — one physical write, last value wins.
        assert_eq!(storage.puts_for("steps"), vec![json!([1, 2, 3])]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_queued_keys_flush_together() {
        // Arrange
        let storage = Arc::new(RecordingStorage::new());
        let sync = SyncLayer::new(storage.clone(), fixed_clock());

        // Act
        sync.save("steps", json!(["s"]));
        sync.save("products", json!(["p"]));
        settle().await;

        // Assert
        assert_eq!(storage.puts_for("steps"), vec![json!(["s"])]);
        assert_eq!(storage.puts_for("products"), vec![json!(["p"])]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_save_resets_the_shared_timer() {
        // Arrange
        let storage = Arc::new(RecordingStorage::new());
        let sync = SyncLayer::new(storage.clone(), fixed_clock());

        // Act — second save lands before the first window expires.
        sync.save("steps", json!(1));
        tokio::time::sleep(Duration::from_millis(150)).await;
        sync.save("steps", json!(2));
        tokio::time::sleep(Duration::from_millis(200)).await;

        // Assert — 350ms after the first save, the reset window is still open.
        assert!(storage.puts().is_empty());

        settle().await;
        assert_eq!(storage.puts_for("steps"), vec![json!(2)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_quota_failure_on_one_key_does_not_abort_others() {
        // Arrange
        let storage = Arc::new(QuotaStorage::new("steps"));
        let sync = SyncLayer::new(storage.clone(), fixed_clock());

        // Act
        sync.save("steps", json!(["too big"]));
        sync.save("products", json!(["fits"]));
        settle().await;

        // Assert — the products write survived the steps quota failure.
        let puts = storage.puts();
        assert_eq!(puts.len(), 1);
        assert_eq!(puts[0].0, "products");

        // The layer keeps accepting writes afterwards.
        sync.save("products", json!(["still works"]));
        settle().await;
        assert_eq!(storage.puts().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_notify_writes_marker_and_broadcasts_kind() {
        // Arrange
        let storage = Arc::new(RecordingStorage::new());
        let sync = SyncLayer::new(storage.clone(), fixed_clock());
        let mut changes = sync.subscribe();

        // Act
        sync.notify(ChangeKind::Step);
        sync.notify(ChangeKind::Step);
        sync.notify(ChangeKind::Product);
        settle().await;

        // Assert — one marker write stamped by the injected clock.
        let markers = storage.puts_for(UPDATE_MARKER_KEY);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0], json!("2026-03-02T14:30:00+00:00"));

        // Duplicate kinds collapse; distinct kinds both arrive.
        assert_eq!(changes.try_recv().unwrap().kind, ChangeKind::Step);
        assert_eq!(changes.try_recv().unwrap().kind, ChangeKind::Product);
        assert!(changes.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_marker_window_outlives_flush_window() {
        // Arrange
        let storage = Arc::new(RecordingStorage::new());
        let sync = SyncLayer::new(storage.clone(), fixed_clock());

        // Act — data flush fires, marker still debouncing.
        sync.save("steps", json!(1));
        sync.notify(ChangeKind::Step);
        tokio::time::sleep(Duration::from_millis(500)).await;
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }

        // Assert
        assert_eq!(storage.puts_for("steps").len(), 1);
        assert!(storage.puts_for(UPDATE_MARKER_KEY).is_empty());

        settle().await;
        assert_eq!(storage.puts_for(UPDATE_MARKER_KEY).len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_pending_drops_queued_writes() {
        // Arrange
        let storage = Arc::new(RecordingStorage::new());
        let sync = SyncLayer::new(storage.clone(), fixed_clock());

        // Act
        sync.save("steps", json!(1));
        sync.notify(ChangeKind::Step);
        sync.cancel_pending();
        settle().await;

        // Assert
        assert!(storage.puts().is_empty());
    }
}
