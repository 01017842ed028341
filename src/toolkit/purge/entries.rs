use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures::FutureExt;
use futures::future::{BoxFuture, join_all};
use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use super::filter::EntryFilter;
use super::models::{ItemOutcome, LivePolicy, PassStats};
use super::pagination::{PageCursor, SettledPage};
use super::relations::RelationResolver;
use crate::core::error::Result;
use crate::db::{Entry, EntryQuery, RecordStore, StoreError};
use crate::ui::Progress;


/// Identifier bookkeeping for one entry pass.
///
/// `claims` spans the whole pass, so an entry that survives its page is never picked
/// up again and only removals inside the current window move the offset. Each claim
/// carries a settled flag that other parents wait on before deleting themselves.
/// `waits` maps an in-flight entry to the related entry it is blocked on; it never
/// contains a cycle.
#[derive(Default)]
struct RunState {
    claims: Mutex<HashMap<String, watch::Sender<bool>>>,
    waits: Mutex<HashMap<String, String>>,
    removed: Mutex<HashSet<String>>,
    stats: Mutex<PassStats>,
}

enum Claim {
    Fresh,
    Taken(watch::Receiver<bool>),
}

impl RunState {
    fn claim(&self, id: &str) -> Claim {
        let mut claims = self.claims.lock();
        match claims.get(id) {
            Some(settled) => Claim::Taken(settled.subscribe()),
            None => {
                let (settled, _) = watch::channel(false);
                claims.insert(id.to_string(), settled);
                Claim::Fresh
            }
        }
    }

    fn settle(&self, id: &str) {
        if let Some(settled) = self.claims.lock().get(id) {
            settled.send_replace(true);
        }
    }

    /// Records that `parent` is blocked on `child`. Refuses when `child` already
    /// depends on `parent` through the chain of blocked entries.
    fn block_on(&self, parent: &str, child: &str) -> bool {
        let mut waits = self.waits.lock();
        let mut cursor = Some(child);
        while let Some(id) = cursor {
            if id == parent {
                return false;
            }
            cursor = waits.get(id).map(String::as_str);
        }
        waits.insert(parent.to_string(), child.to_string());
        true
    }

    fn unblock(&self, parent: &str) {
        self.waits.lock().remove(parent);
    }

    fn mark_removed(&self, id: &str) {
        self.removed.lock().insert(id.to_string());
    }

    fn count_removed(&self, ids: &[String]) -> usize {
        let removed = self.removed.lock();
        ids.iter().filter(|id| removed.contains(*id)).count()
    }

    fn record(&self, outcome: ItemOutcome) {
        self.stats.lock().record(outcome);
    }

    fn record_listed(&self, count: usize) {
        self.stats.lock().listed += count;
    }

    fn record_child(&self) {
        self.stats.lock().children += 1;
    }

    fn stats(&self) -> PassStats {
        self.stats.lock().clone()
    }
}


/// Pages through entries and deletes every eligible one, children first.
pub struct EntryPurger {
    store: Arc<dyn RecordStore>,
    progress: Arc<dyn Progress>,
    filter: EntryFilter,
    resolver: RelationResolver,
    policy: LivePolicy,
    batch_size: usize,
    dry_run: bool,
}

impl EntryPurger {
    pub fn new(
        store: Arc<dyn RecordStore>,
        progress: Arc<dyn Progress>,
        filter: EntryFilter,
        resolver: RelationResolver,
        batch_size: usize,
    ) -> Self {
        Self {
            store,
            progress,
            filter,
            resolver,
            policy: LivePolicy::default(),
            batch_size: batch_size.max(1),
            dry_run: false,
        }
    }

    pub fn with_policy(mut self, policy: LivePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub async fn run(&self, query: &EntryQuery) -> Result<PassStats> {
        let total = self.store.list_entries(query, 0, 0).await?.total;
        info!(
            "Found {} entries{} (batch size {}, live policy {})",
            total,
            query
                .content_type
                .as_deref()
                .map(|ct| format!(" of type '{}'", ct))
                .unwrap_or_default(),
            self.batch_size,
            self.policy
        );
        self.progress.start("Entries", total as u64);

        let run = RunState::default();
        let mut cursor = PageCursor::new(self.batch_size);

        loop {
            let page = self
                .store
                .list_entries(query, cursor.offset(), cursor.limit())
                .await?;
            debug!(
                "Listed {} entries at offset {} (reported total {})",
                page.items.len(),
                cursor.offset(),
                page.total
            );

            let page_ids: Vec<String> = page.items.iter().map(|e| e.id().to_string()).collect();
            run.record_listed(page_ids.len());

            join_all(
                page.items
                    .into_iter()
                    .map(|entry| self.purge_listed(&run, entry)),
            )
            .await;

            let more = cursor.advance(SettledPage {
                reported_total: page.total,
                page_len: page_ids.len(),
                removed: run.count_removed(&page_ids),
            });
            if !more {
                break;
            }
        }

        self.progress.finish();
        let stats = run.stats();
        info!("Entry pass complete after {} pages: {:?}", cursor.pages(), stats);
        Ok(stats)
    }

    async fn purge_listed(&self, run: &RunState, entry: Entry) -> ItemOutcome {
        if !self.filter.accept(&entry) {
            debug!("Entry {} filtered out", entry.id());
            run.record(ItemOutcome::Filtered);
            self.progress.tick();
            return ItemOutcome::Filtered;
        }
        if let Claim::Taken(_) = run.claim(entry.id()) {
            debug!("Entry {} already handled as a related record", entry.id());
            self.progress.tick();
            return ItemOutcome::AlreadyVisited;
        }
        self.purge_claimed(run, entry, 0).await
    }

    /// Runs the unpublish-and-delete procedure on an entry already claimed in `run`.
    /// Ticks progress exactly once.
    fn purge_claimed<'a>(
        &'a self,
        run: &'a RunState,
        entry: Entry,
        depth: usize,
    ) -> BoxFuture<'a, ItemOutcome> {
        async move {
            let outcome = self.unpublish_and_delete(run, &entry, depth).await;
            run.settle(entry.id());
            run.record(outcome);
            self.progress.tick();
            outcome
        }
        .boxed()
    }

    async fn unpublish_and_delete(&self, run: &RunState, entry: &Entry, depth: usize) -> ItemOutcome {
        if depth > 0 && !self.filter.accept(entry) {
            debug!("Related entry {} filtered out", entry.id());
            return ItemOutcome::Filtered;
        }

        let state = entry.publish_state();
        if !self.policy.deletes(state) {
            debug!("Entry {} is {} and stays in place", entry.id(), state);
            return ItemOutcome::SkippedLive;
        }

        for child_id in self.resolver.child_ids(entry) {
            self.purge_child(run, entry.id(), &child_id, depth + 1).await;
        }

        if self.dry_run {
            info!("Would delete entry {} ({})", entry.id(), state);
            return ItemOutcome::WouldDelete;
        }

        if self.policy.requires_unpublish(entry) {
            if let Err(e) = self.store.unpublish_entry(entry).await {
                warn!("Failed to unpublish entry {}: {}", entry.id(), e);
                return ItemOutcome::Failed;
            }
            debug!("Unpublished entry {}", entry.id());
        }

        match self.store.delete_entry(entry).await {
            Ok(()) => {
                run.mark_removed(entry.id());
                debug!("Deleted entry {} (depth {})", entry.id(), depth);
                ItemOutcome::Deleted
            }
            Err(e) => {
                error!("Failed to delete entry {}: {}", entry.id(), e);
                ItemOutcome::Failed
            }
        }
    }

    async fn purge_child(&self, run: &RunState, parent_id: &str, child_id: &str, depth: usize) {
        if let Claim::Taken(mut settled) = run.claim(child_id) {
            if !run.block_on(parent_id, child_id) {
                debug!("Related entry {} leads back to {}, not waiting", child_id, parent_id);
                return;
            }
            debug!("Entry {} waits for related entry {}", parent_id, child_id);
            let _ = settled.wait_for(|done| *done).await;
            run.unblock(parent_id);
            return;
        }
        run.block_on(parent_id, child_id);
        run.record_child();
        self.progress.extend(1);

        match self.store.get_entry(child_id).await {
            Ok(child) => {
                self.purge_claimed(run, child, depth).await;
            }
            Err(e) => {
                if let StoreError::NotFound(_) = e {
                    debug!("Related entry {} no longer exists", child_id);
                } else {
                    warn!("Failed to fetch related entry {}: {}", child_id, e);
                }
                run.settle(child_id);
                run.record(ItemOutcome::Failed);
                self.progress.tick();
            }
        }
        run.unblock(parent_id);
    }
}
