pub mod client;
pub mod models;
pub mod store;

#[cfg(test)]
pub(crate) mod memory;

pub use client::ManagementClient;
pub use models::{ContentType, Entry, EntryQuery, Link, Page, PublishState, SchemaState};
pub use store::{RecordStore, StoreError};
