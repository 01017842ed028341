pub mod purge;

pub use purge::{PurgeManager, PurgeReport};
