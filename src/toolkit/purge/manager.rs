use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::content_types::ContentTypePurger;
use super::entries::EntryPurger;
use super::filter::EntryFilter;
use super::models::PurgeReport;
use super::relations::RelationResolver;
use crate::core::config::PurgeConfig;
use crate::core::error::Result;
use crate::db::{EntryQuery, RecordStore};
use crate::ui::Progress;


/// Runs the entry pass and, when asked, the content type pass after it.
pub struct PurgeManager {
    entries: EntryPurger,
    content_types: Option<ContentTypePurger>,
    query: EntryQuery,
    dry_run: bool,
}

impl PurgeManager {
    /// Loads the ignore/remove list up front so a bad path fails before anything is deleted.
    pub fn from_config(
        config: &PurgeConfig,
        store: Arc<dyn RecordStore>,
        progress: Arc<dyn Progress>,
    ) -> Result<Self> {
        config.validate()?;
        let filter = EntryFilter::from_lists(config.ignore_list.as_deref(), config.remove_list.as_deref())?;
        Ok(Self::new(config, store, progress, filter))
    }

    pub fn new(
        config: &PurgeConfig,
        store: Arc<dyn RecordStore>,
        progress: Arc<dyn Progress>,
        filter: EntryFilter,
    ) -> Self {
        info!("Initializing PurgeManager for {}", config.scope_description());

        let entries = EntryPurger::new(
            Arc::clone(&store),
            Arc::clone(&progress),
            filter,
            RelationResolver::new(config.relation_fields.iter().cloned()),
            config.batch_size,
        )
        .with_policy(config.live_policy)
        .with_dry_run(config.dry_run);

        let content_types = config.include_content_types.then(|| {
            ContentTypePurger::new(store, progress, config.batch_size).with_dry_run(config.dry_run)
        });

        let query = match &config.content_type {
            Some(content_type) => EntryQuery::of_type(content_type.clone()),
            None => EntryQuery::all(),
        };

        Self {
            entries,
            content_types,
            query,
            dry_run: config.dry_run,
        }
    }

    pub async fn run(&self) -> Result<PurgeReport> {
        let started_at = Utc::now();

        let entries = self.entries.run(&self.query).await?;

        // Content types can only go once nothing references them.
        let content_types = match &self.content_types {
            Some(purger) => Some(purger.run().await?),
            None => None,
        };

        Ok(PurgeReport {
            entries,
            content_types,
            dry_run: self.dry_run,
            started_at,
            finished_at: Utc::now(),
        })
    }
}
