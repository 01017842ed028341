use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

use super::error::{PurgeError, Result};
use crate::toolkit::purge::LivePolicy;
use crate::{DEFAULT_API_URL, DEFAULT_BATCH_SIZE, DEFAULT_ENVIRONMENT, DEFAULT_RELATION_FIELDS};

pub(crate) const REDACTED: &str = "<redacted>";


#[derive(Clone, Serialize, Deserialize)]
pub struct PurgeConfig {
    pub space_id: String,
    pub environment: String,
    pub access_token: String,
    pub api_url: String,
    pub timeout: u64,
    pub max_retries: u32,

    pub content_type: Option<String>,
    pub batch_size: usize,
    pub include_content_types: bool,
    pub live_policy: LivePolicy,
    pub relation_fields: Vec<String>,
    pub dry_run: bool,

    pub ignore_list: Option<PathBuf>,
    pub remove_list: Option<PathBuf>,

    pub assume_yes: bool,
    pub verbose: bool,
}

impl PurgeConfig {
    pub fn new(space_id: &str, access_token: &str) -> Self {
        Self {
            space_id: space_id.to_string(),
            environment: DEFAULT_ENVIRONMENT.to_string(),
            access_token: access_token.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            timeout: 30,
            max_retries: 3,

            content_type: None,
            batch_size: DEFAULT_BATCH_SIZE,
            include_content_types: false,
            live_policy: LivePolicy::default(),
            relation_fields: DEFAULT_RELATION_FIELDS.iter().map(|f| f.to_string()).collect(),
            dry_run: false,

            ignore_list: None,
            remove_list: None,

            assume_yes: false,
            verbose: false,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.space_id.trim().is_empty() {
            return Err(PurgeError::Configuration("space id must not be empty".to_string()));
        }
        if self.environment.trim().is_empty() {
            return Err(PurgeError::Configuration("environment must not be empty".to_string()));
        }
        if self.access_token.trim().is_empty() {
            return Err(PurgeError::Configuration("access token must not be empty".to_string()));
        }
        if self.batch_size == 0 {
            return Err(PurgeError::Configuration("batch size must be at least 1".to_string()));
        }
        Url::parse(&self.api_url).map_err(|e| {
            PurgeError::Configuration(format!("invalid API url {}: {}", self.api_url, e))
        })?;
        Ok(())
    }

    pub fn environment_url(&self) -> String {
        format!(
            "{}/spaces/{}/environments/{}",
            self.api_url.trim_end_matches('/'),
            self.space_id,
            self.environment
        )
    }

    pub fn scope_description(&self) -> String {
        let entries = match &self.content_type {
            Some(content_type) => format!("all '{}' entries", content_type),
            None => "all entries".to_string(),
        };
        let content_types = if self.include_content_types {
            " and all content types"
        } else {
            ""
        };
        format!(
            "{}{} in space '{}' (environment '{}')",
            entries, content_types, self.space_id, self.environment
        )
    }
}

impl fmt::Debug for PurgeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PurgeConfig")
            .field("space_id", &self.space_id)
            .field("environment", &self.environment)
            .field("access_token", &REDACTED)
            .field("api_url", &self.api_url)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("content_type", &self.content_type)
            .field("batch_size", &self.batch_size)
            .field("include_content_types", &self.include_content_types)
            .field("live_policy", &self.live_policy)
            .field("relation_fields", &self.relation_fields)
            .field("dry_run", &self.dry_run)
            .field("ignore_list", &self.ignore_list)
            .field("remove_list", &self.remove_list)
            .field("assume_yes", &self.assume_yes)
            .field("verbose", &self.verbose)
            .finish()
    }
}
