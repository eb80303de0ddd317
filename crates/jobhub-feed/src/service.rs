//! The notification feed service.
//!
//! [`NotificationFeed`] owns everything belonging to one `(user, role)`
//! scope: the in-memory feed state, the poll loop, and the change-feed
//! subscription. The scope is created whole and torn down whole; there
//! are no process-global subscription handles to leak across a login
//! change.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;
use tracing::{debug, error, warn};

use jobhub_core::config::feed::FeedConfig;
use jobhub_core::events::{ChangeEvent, ChannelSpec};
use jobhub_core::traits::alert::AlertSink;
use jobhub_core::traits::backend::{DataBackend, Subscription};
use jobhub_core::traits::kv::KeyValueStore;
use jobhub_core::types::id::{NotificationId, UserId};
use jobhub_entity::notification::Notification;
use jobhub_entity::role::UserRole;
use jobhub_store::{HistoryStore, ReadStateStore};

use crate::normalizer;
use crate::realtime::RealtimeHandler;
use crate::reconciler;
use crate::snapshot::SnapshotFetcher;

/// In-memory feed state. Mutated only under the lock; both producer paths
/// and the read-state mutators go through it.
#[derive(Debug)]
struct FeedState {
    /// Materialized history, newest first.
    history: Vec<Notification>,
    /// Acknowledged notification ids (the store's cached view; this feed
    /// is the only in-process writer).
    read_ids: HashSet<NotificationId>,
    /// Count of unacknowledged history entries.
    unread: usize,
    /// Whether the mount fetch is still in flight.
    loading: bool,
}

/// Everything bound to an authenticated `(user, role)` scope.
#[derive(Debug)]
struct FeedScope {
    /// The viewing user.
    user: UserId,
    /// The viewing role.
    role: UserRole,
    /// Snapshot fetcher for the poll path.
    fetcher: SnapshotFetcher,
    /// Event handler for the realtime path.
    handler: RealtimeHandler,
    /// Persisted acknowledged-id set.
    read_state: ReadStateStore,
    /// Persisted history.
    history: HistoryStore,
}

/// Shared core behind the public handle and the spawned loops.
#[derive(Debug)]
struct FeedCore {
    /// Alert sink for new unread notifications.
    alerts: Arc<dyn AlertSink>,
    /// Feed configuration.
    config: FeedConfig,
    /// The authenticated scope; `None` for an anonymous viewer, which
    /// makes every operation inert.
    scope: Option<FeedScope>,
    /// In-memory state.
    state: Mutex<FeedState>,
    /// Shutdown signal observed by both loops and by in-flight folds.
    shutdown: watch::Sender<bool>,
}

/// The per-scope notification feed exposed to UI collaborators.
///
/// Dropping the feed (or calling [`shutdown`](Self::shutdown)) stops the
/// poll loop and the subscription; enrichment already in flight finishes
/// but its result is discarded.
#[derive(Debug)]
pub struct NotificationFeed {
    core: Arc<FeedCore>,
}

impl NotificationFeed {
    /// Create the feed for a scope and start its producer loops.
    ///
    /// Persisted history is loaded first so the feed renders immediately,
    /// then one snapshot fetch runs before this returns. A `None` user
    /// (anonymous viewer) yields an inert feed with no background work.
    pub async fn spawn(
        backend: Arc<dyn DataBackend>,
        store: Arc<dyn KeyValueStore>,
        alerts: Arc<dyn AlertSink>,
        config: FeedConfig,
        user: Option<UserId>,
        role: UserRole,
    ) -> Self {
        let (shutdown, _) = watch::channel(false);

        let Some(user) = user else {
            let core = Arc::new(FeedCore {
                alerts,
                config,
                scope: None,
                state: Mutex::new(FeedState {
                    history: Vec::new(),
                    read_ids: HashSet::new(),
                    unread: 0,
                    loading: false,
                }),
                shutdown,
            });
            return Self { core };
        };

        let scope = FeedScope {
            user,
            role,
            fetcher: SnapshotFetcher::new(
                Arc::clone(&backend),
                Some(user),
                role,
                config.snapshot_limit,
            ),
            handler: RealtimeHandler::new(Arc::clone(&backend), user, role),
            read_state: ReadStateStore::new(Arc::clone(&store), user, role),
            history: HistoryStore::new(store, user, role),
        };

        let read_ids = scope.read_state.load().await.unwrap_or_else(|e| {
            warn!("Read-state load failed for {user}/{role}: {e}");
            HashSet::new()
        });
        let history = scope.history.load().await.unwrap_or_else(|e| {
            warn!("History load failed for {user}/{role}: {e}");
            Vec::new()
        });
        let unread = history.iter().filter(|n| !n.read).count();

        let core = Arc::new(FeedCore {
            alerts,
            config,
            scope: Some(scope),
            state: Mutex::new(FeedState {
                history,
                read_ids,
                unread,
                loading: true,
            }),
            shutdown,
        });

        // Subscribe before the mount fetch so no event can fall into the
        // gap between snapshot and subscription.
        let spec = ChannelSpec::tables(RealtimeHandler::watched_tables(role));
        let subscription = match backend.subscribe(spec).await {
            Ok(subscription) => Some(subscription),
            Err(e) => {
                error!(
                    "Change-feed subscription failed for {user}/{role}: {e}; polling continues"
                );
                None
            }
        };

        core.refresh().await;

        let poll_core = Arc::clone(&core);
        tokio::spawn(async move { FeedCore::poll_loop(poll_core).await });

        if let Some(subscription) = subscription {
            let sub_core = Arc::clone(&core);
            tokio::spawn(
                async move { FeedCore::subscription_loop(sub_core, subscription).await },
            );
        }

        Self { core }
    }

    /// Current history, newest first.
    pub fn notifications(&self) -> Vec<Notification> {
        self.core.lock_state().history.clone()
    }

    /// Count of unacknowledged notifications.
    pub fn unread_count(&self) -> usize {
        self.core.lock_state().unread
    }

    /// Whether the mount fetch is still in flight.
    pub fn is_loading(&self) -> bool {
        self.core.lock_state().loading
    }

    /// Run a snapshot fetch and reconciliation now, outside the poll
    /// cadence.
    pub async fn refresh(&self) {
        self.core.refresh().await;
    }

    /// Acknowledge one notification.
    pub async fn mark_as_read(&self, id: NotificationId) {
        self.core.mark_as_read(id).await;
    }

    /// Acknowledge every notification currently in the history.
    pub async fn mark_all_as_read(&self) {
        self.core.mark_all_as_read().await;
    }

    /// Ask the alert sink for permission to show alerts.
    pub async fn request_alert_permission(&self) -> bool {
        self.core.alerts.request_permission().await
    }

    /// Stop the poll loop and the subscription for this scope.
    pub fn shutdown(&self) {
        let _ = self.core.shutdown.send(true);
    }
}

impl Drop for NotificationFeed {
    fn drop(&mut self) {
        let _ = self.core.shutdown.send(true);
    }
}

impl FeedCore {
    fn lock_state(&self) -> MutexGuard<'_, FeedState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// The poll path: full snapshot fetch, reconcile, persist.
    async fn refresh(&self) {
        let Some(scope) = &self.scope else {
            return;
        };

        let records = scope.fetcher.fetch().await;
        let batch: Vec<Notification> = records
            .into_iter()
            .map(|record| normalizer::normalize(record, scope.role))
            .collect();

        let snapshot = {
            let mut guard = self.lock_state();
            let state = &mut *guard;
            let existing = std::mem::take(&mut state.history);
            let outcome =
                reconciler::reconcile(existing, batch, &state.read_ids, self.config.history_cap);
            state.history = outcome.history;
            state.unread = outcome.unread;
            state.loading = false;
            state.history.clone()
        };

        if let Err(e) = scope.history.save(&snapshot).await {
            error!(
                "Failed to persist history for {}/{}: {e}",
                scope.user, scope.role
            );
        }
    }

    /// The realtime path: fold one processed event into feed state.
    async fn fold_event(self: Arc<Self>, event: ChangeEvent) {
        let Some(scope) = &self.scope else {
            return;
        };

        let Some(mut notification) = scope.handler.process(event).await else {
            return;
        };

        // The scope may have shut down while enrichment was in flight;
        // a stale completion must not resurrect state.
        if *self.shutdown.borrow() {
            return;
        }

        let (snapshot, alert) = {
            let mut guard = self.lock_state();
            let state = &mut *guard;
            notification.read = state.read_ids.contains(&notification.id);

            let mut alert = None;
            if let Some(pos) = state
                .history
                .iter()
                .position(|n| n.id == notification.id)
            {
                // Duplicate delivery or a re-enrichment of the same
                // event: replace in place, keeping the read flag sticky.
                notification.read = notification.read || state.history[pos].read;
                state.history[pos] = notification;
            } else {
                if notification.is_unread() {
                    alert = Some(notification.message.clone());
                }
                state.history.insert(0, notification);
                state.history.truncate(self.config.history_cap);
            }

            state.unread = state.history.iter().filter(|n| n.is_unread()).count();
            (state.history.clone(), alert)
        };

        if let Err(e) = scope.history.save(&snapshot).await {
            error!(
                "Failed to persist history for {}/{}: {e}",
                scope.user, scope.role
            );
        }

        if let Some(body) = alert {
            if self.config.alerts_enabled {
                self.alerts.notify("JobHub", &body).await;
            }
        }
    }

    async fn mark_as_read(&self, id: NotificationId) {
        let Some(scope) = &self.scope else {
            return;
        };

        let (read_snapshot, history_snapshot) = {
            let mut guard = self.lock_state();
            let state = &mut *guard;
            state.read_ids.insert(id);
            if let Some(entry) = state.history.iter_mut().find(|n| n.id == id) {
                if entry.is_unread() {
                    entry.read = true;
                    state.unread = state.unread.saturating_sub(1);
                }
            }
            (state.read_ids.clone(), state.history.clone())
        };

        self.persist(scope, &read_snapshot, &history_snapshot).await;
    }

    async fn mark_all_as_read(&self) {
        let Some(scope) = &self.scope else {
            return;
        };

        let (read_snapshot, history_snapshot) = {
            let mut guard = self.lock_state();
            let state = &mut *guard;
            for entry in state.history.iter_mut() {
                state.read_ids.insert(entry.id);
                entry.read = true;
            }
            state.unread = 0;
            (state.read_ids.clone(), state.history.clone())
        };

        self.persist(scope, &read_snapshot, &history_snapshot).await;
    }

    async fn persist(
        &self,
        scope: &FeedScope,
        read_ids: &HashSet<NotificationId>,
        history: &[Notification],
    ) {
        if let Err(e) = scope.read_state.save(read_ids).await {
            error!(
                "Failed to persist read-state for {}/{}: {e}",
                scope.user, scope.role
            );
        }
        if let Err(e) = scope.history.save(history).await {
            error!(
                "Failed to persist history for {}/{}: {e}",
                scope.user, scope.role
            );
        }
    }

    /// Re-runs the snapshot fetch on the configured cadence until the
    /// scope shuts down.
    async fn poll_loop(core: Arc<Self>) {
        let mut shutdown = core.shutdown.subscribe();
        let period = Duration::from_secs(core.config.poll_interval_seconds.max(1));
        let mut interval = time::interval(period);
        // The first tick completes immediately; the mount fetch already ran.
        interval.tick().await;

        loop {
            tokio::select! {
                _ = shutdown.changed() => break,
                _ = interval.tick() => core.refresh().await,
            }
        }

        debug!("Poll loop ended");
    }

    /// Receives change events and folds each one in its own task, so slow
    /// enrichment never blocks the delivery loop.
    async fn subscription_loop(core: Arc<Self>, mut subscription: Subscription) {
        let Some(scope) = &core.scope else {
            return;
        };

        let mut shutdown = core.shutdown.subscribe();

        loop {
            tokio::select! {
                _ = shutdown.changed() => break,
                event = subscription.recv() => match event {
                    Some(event) => {
                        let core = Arc::clone(&core);
                        tokio::spawn(async move { core.fold_event(event).await });
                    }
                    None => {
                        warn!(
                            "Change feed closed for {}/{}; polling continues",
                            scope.user, scope.role
                        );
                        break;
                    }
                },
            }
        }

        debug!("Subscription loop ended");
    }
}
