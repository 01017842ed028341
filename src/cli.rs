use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use crate::core::config::{PurgeConfig, REDACTED};
use crate::core::error::{PurgeError, Result};
use crate::db::{ManagementClient, RecordStore};
use crate::toolkit::purge::{LivePolicy, PurgeManager, PurgeReport};
use crate::ui::{AssumeYes, BarProgress, Confirmation, Progress, TerminalConfirmation, confirmation_message};
use crate::{DEFAULT_API_URL, DEFAULT_BATCH_SIZE, DEFAULT_ENVIRONMENT, DEFAULT_RELATION_FIELDS};


#[derive(Clone, Parser)]
#[command(
    name = "contentful-purge",
    version,
    about = "Bulk-delete Contentful entries, related entries first, and optionally content types"
)]
pub struct Args {
    /// Target space
    #[arg(long = "space-id", env = "CONTENTFUL_SPACE_ID")]
    pub space_id: String,

    #[arg(long = "env", env = "CONTENTFUL_ENV", default_value = DEFAULT_ENVIRONMENT)]
    pub environment: String,

    /// Management API token
    #[arg(long = "accesstoken", env = "CONTENTFUL_ACCESSTOKEN", hide_env_values = true)]
    pub access_token: String,

    /// Only delete entries of this content type
    #[arg(long = "content-type", env = "CONTENTFUL_CONTENT_TYPE")]
    pub content_type: Option<String>,

    /// Page size, also the number of deletions in flight
    #[arg(
        long = "batch-size",
        env = "CONTENTFUL_BATCH_SIZE",
        default_value_t = DEFAULT_BATCH_SIZE,
        value_parser = parse_batch_size
    )]
    pub batch_size: usize,

    /// Delete content types once all entries are gone
    #[arg(long = "content-types", env = "CONTENTFUL_CONTENT_TYPES")]
    pub content_types: bool,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long = "yes", env = "CONTENTFUL_YES")]
    pub yes: bool,

    #[arg(short = 'v', long = "verbose", env = "CONTENTFUL_VERBOSE")]
    pub verbose: bool,

    /// File of entry ids (one per line) to keep
    #[arg(short = 'i', long = "ignorelist", env = "CONTENTFUL_IGNORELIST")]
    pub ignore_list: Option<PathBuf>,

    /// File of entry ids (one per line) to delete, everything else is kept
    #[arg(short = 'r', long = "removelist", env = "CONTENTFUL_REMOVELIST")]
    pub remove_list: Option<PathBuf>,

    /// What to do with published, unmodified entries: skip or unpublish
    #[arg(long = "live-policy", env = "CONTENTFUL_LIVE_POLICY", default_value_t = LivePolicy::Skip)]
    pub live_policy: LivePolicy,

    /// Reference fields whose linked entries are deleted before their parent
    #[arg(
        long = "relation-field",
        env = "CONTENTFUL_RELATION_FIELDS",
        value_delimiter = ',',
        default_values = DEFAULT_RELATION_FIELDS
    )]
    pub relation_fields: Vec<String>,

    /// List what would be deleted without deleting anything
    #[arg(long = "dry-run", env = "CONTENTFUL_DRY_RUN")]
    pub dry_run: bool,

    #[arg(long = "api-url", env = "CONTENTFUL_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,
}

impl fmt::Debug for Args {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Args")
            .field("space_id", &self.space_id)
            .field("environment", &self.environment)
            .field("access_token", &REDACTED)
            .field("content_type", &self.content_type)
            .field("batch_size", &self.batch_size)
            .field("content_types", &self.content_types)
            .field("yes", &self.yes)
            .field("verbose", &self.verbose)
            .field("ignore_list", &self.ignore_list)
            .field("remove_list", &self.remove_list)
            .field("live_policy", &self.live_policy)
            .field("relation_fields", &self.relation_fields)
            .field("dry_run", &self.dry_run)
            .field("api_url", &self.api_url)
            .finish()
    }
}

fn parse_batch_size(raw: &str) -> std::result::Result<usize, String> {
    match raw.trim().parse::<usize>() {
        Ok(0) => Err("batch size must be at least 1".to_string()),
        Ok(size) => Ok(size),
        Err(e) => Err(e.to_string()),
    }
}

impl TryFrom<Args> for PurgeConfig {
    type Error = PurgeError;

    fn try_from(args: Args) -> Result<Self> {
        let mut config = PurgeConfig::new(&args.space_id, &args.access_token);
        config.environment = args.environment;
        config.api_url = args.api_url;
        config.content_type = args.content_type.filter(|ct| !ct.trim().is_empty());
        config.batch_size = args.batch_size;
        config.include_content_types = args.content_types;
        config.live_policy = args.live_policy;
        config.relation_fields = args
            .relation_fields
            .iter()
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .collect();
        config.dry_run = args.dry_run;
        config.ignore_list = args.ignore_list;
        config.remove_list = args.remove_list;
        config.assume_yes = args.yes;
        config.verbose = args.verbose;
        config.validate()?;
        Ok(config)
    }
}


/// Loads the lists, asks for confirmation, then runs the purge. `Ok(None)` means the
/// prompt was declined and nothing was touched.
pub async fn execute(
    config: &PurgeConfig,
    store: Arc<dyn RecordStore>,
    confirmation: &dyn Confirmation,
    progress: Arc<dyn Progress>,
) -> Result<Option<PurgeReport>> {
    let manager = PurgeManager::from_config(config, store, progress)?;

    let message = confirmation_message(&config.scope_description(), config.dry_run);
    if !config.assume_yes && !confirmation.confirm(&message)? {
        info!("Aborted at confirmation prompt");
        return Ok(None);
    }

    manager.run().await.map(Some)
}

pub async fn run(args: Args) -> anyhow::Result<()> {
    let config = PurgeConfig::try_from(args)?;
    let store: Arc<dyn RecordStore> = Arc::new(ManagementClient::new(&config)?);
    let progress: Arc<dyn Progress> = Arc::new(BarProgress::new());
    let confirmation: Box<dyn Confirmation> = if config.assume_yes {
        Box::new(AssumeYes)
    } else {
        Box::new(TerminalConfirmation)
    };

    match execute(&config, store, confirmation.as_ref(), progress).await? {
        Some(report) => {
            println!("{}", report.summary());
            if report.has_failures() {
                println!("{} records could not be deleted, see the log above", report.failed());
            }
        }
        None => println!("Nothing deleted."),
    }

    Ok(())
}
