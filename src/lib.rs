pub mod cli;
pub mod core;
pub mod db;
pub mod toolkit;
pub mod ui;


pub use crate::core::config::PurgeConfig;
pub use crate::core::error::{PurgeError, Result};
pub use db::{ManagementClient, RecordStore, StoreError};
pub use toolkit::purge::{EntryFilter, LivePolicy, PurgeManager, PurgeReport};


pub const DEFAULT_API_URL: &str = "https://api.contentful.com";


pub const DEFAULT_ENVIRONMENT: &str = "master";


pub const DEFAULT_BATCH_SIZE: usize = 5;


pub const DEFAULT_RELATION_FIELDS: [&str; 2] = ["series", "episodes"];
