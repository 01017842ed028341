use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, error, info, warn};

use super::models::{ItemOutcome, PassStats};
use super::pagination::{PageCursor, SettledPage};
use crate::core::error::Result;
use crate::db::{ContentType, RecordStore, SchemaState};
use crate::ui::Progress;


/// Pages through every content type, unpublishing and deleting each one.
pub struct ContentTypePurger {
    store: Arc<dyn RecordStore>,
    progress: Arc<dyn Progress>,
    batch_size: usize,
    dry_run: bool,
}

impl ContentTypePurger {
    pub fn new(store: Arc<dyn RecordStore>, progress: Arc<dyn Progress>, batch_size: usize) -> Self {
        Self {
            store,
            progress,
            batch_size: batch_size.max(1),
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub async fn run(&self) -> Result<PassStats> {
        let total = self.store.list_content_types(0, 0).await?.total;
        info!("Found {} content types", total);
        self.progress.start("Content types", total as u64);

        let mut stats = PassStats::default();
        let mut cursor = PageCursor::new(self.batch_size);

        loop {
            let page = self
                .store
                .list_content_types(cursor.offset(), cursor.limit())
                .await?;
            let page_len = page.items.len();
            stats.listed += page_len;

            let outcomes = join_all(page.items.iter().map(|ct| self.purge_content_type(ct))).await;
            let mut removed = 0;
            for outcome in outcomes {
                if outcome.is_deleted() {
                    removed += 1;
                }
                stats.record(outcome);
            }

            let more = cursor.advance(SettledPage {
                reported_total: page.total,
                page_len,
                removed,
            });
            if !more {
                break;
            }
        }

        self.progress.finish();
        info!("Content type pass complete after {} pages: {:?}", cursor.pages(), stats);
        Ok(stats)
    }

    async fn purge_content_type(&self, content_type: &ContentType) -> ItemOutcome {
        let outcome = self.unpublish_and_delete(content_type).await;
        self.progress.tick();
        outcome
    }

    async fn unpublish_and_delete(&self, content_type: &ContentType) -> ItemOutcome {
        let id = content_type.id();

        if self.dry_run {
            info!("Would delete content type {}", id);
            return ItemOutcome::WouldDelete;
        }

        if content_type.publish_state() == SchemaState::Published {
            if let Err(e) = self.store.unpublish_content_type(content_type).await {
                warn!("Failed to unpublish content type {}: {}", id, e);
                return ItemOutcome::Failed;
            }
            debug!("Unpublished content type {}", id);
        }

        match self.store.delete_content_type(content_type).await {
            Ok(()) => {
                debug!("Deleted content type {}", id);
                ItemOutcome::Deleted
            }
            Err(e) => {
                error!("Failed to delete content type {}: {}", id, e);
                ItemOutcome::Failed
            }
        }
    }
}
