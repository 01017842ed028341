pub mod content_types;
pub mod entries;
pub mod filter;
pub mod manager;
pub mod models;
pub mod pagination;
pub mod relations;


pub use content_types::ContentTypePurger;
pub use entries::EntryPurger;
pub use filter::EntryFilter;
pub use manager::PurgeManager;
pub use models::{ItemOutcome, LivePolicy, PassStats, PurgeReport};
pub use pagination::{PageCursor, SettledPage};
pub use relations::RelationResolver;
