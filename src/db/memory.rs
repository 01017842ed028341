//! In-memory record store used by the engine tests.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::models::{ContentType, Entry, EntryQuery, Page};
use super::store::{RecordStore, StoreError};


#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListEntries { skip: usize, limit: usize },
    GetEntry(String),
    UnpublishEntry(String),
    DeleteEntry(String),
    ListContentTypes { skip: usize, limit: usize },
    UnpublishContentType(String),
    DeleteContentType(String),
}

#[derive(Default)]
struct State {
    entries: Vec<Entry>,
    content_types: Vec<ContentType>,
    calls: Vec<Call>,
    failing: HashSet<String>,
    slow: HashSet<String>,
    yielding: bool,
}

const SLOW_DELAY: Duration = Duration::from_millis(30);

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<Entry>) -> Self {
        let store = Self::new();
        store.state.lock().entries = entries;
        store
    }

    pub fn with_content_types(self, content_types: Vec<ContentType>) -> Self {
        self.state.lock().content_types = content_types;
        self
    }

    /// Any unpublish/delete touching `id` fails with a backend error.
    pub fn fail_on(self, id: &str) -> Self {
        self.state.lock().failing.insert(id.to_string());
        self
    }

    /// Every call yields to the scheduler before touching state, so concurrent
    /// deletions on a page interleave.
    pub fn yielding(self) -> Self {
        self.state.lock().yielding = true;
        self
    }

    /// Unpublish/delete of `id` sleeps before completing.
    pub fn slow_on(self, id: &str) -> Self {
        self.state.lock().slow.insert(id.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    pub fn deleted_entries(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::DeleteEntry(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn unpublished_entries(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::UnpublishEntry(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn deleted_content_types(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::DeleteContentType(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn remaining_entries(&self) -> Vec<String> {
        self.state
            .lock()
            .entries
            .iter()
            .map(|e| e.id().to_string())
            .collect()
    }

    pub fn remaining_content_types(&self) -> Vec<String> {
        self.state
            .lock()
            .content_types
            .iter()
            .map(|c| c.id().to_string())
            .collect()
    }

    async fn pause(&self, id: Option<&str>) {
        let (yielding, slow) = {
            let state = self.state.lock();
            (state.yielding, id.is_some_and(|id| state.slow.contains(id)))
        };
        if slow {
            tokio::time::sleep(SLOW_DELAY).await;
        } else if yielding {
            tokio::task::yield_now().await;
        }
    }

    fn check_failing(state: &State, id: &str) -> Result<(), StoreError> {
        if state.failing.contains(id) {
            return Err(StoreError::Backend(format!("injected failure for {}", id)));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list_entries(
        &self,
        query: &EntryQuery,
        skip: usize,
        limit: usize,
    ) -> Result<Page<Entry>, StoreError> {
        self.pause(None).await;
        let mut state = self.state.lock();
        state.calls.push(Call::ListEntries { skip, limit });
        let scoped: Vec<&Entry> = state.entries.iter().filter(|e| query.matches(e)).collect();
        Ok(Page {
            total: scoped.len(),
            skip,
            limit,
            items: scoped.into_iter().skip(skip).take(limit).cloned().collect(),
        })
    }

    async fn get_entry(&self, id: &str) -> Result<Entry, StoreError> {
        self.pause(None).await;
        let mut state = self.state.lock();
        state.calls.push(Call::GetEntry(id.to_string()));
        state
            .entries
            .iter()
            .find(|e| e.id() == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(format!("entry {}", id)))
    }

    async fn unpublish_entry(&self, entry: &Entry) -> Result<(), StoreError> {
        self.pause(Some(entry.id())).await;
        let mut state = self.state.lock();
        state.calls.push(Call::UnpublishEntry(entry.id().to_string()));
        Self::check_failing(&state, entry.id())?;
        let stored = state
            .entries
            .iter_mut()
            .find(|e| e.id() == entry.id())
            .ok_or_else(|| StoreError::NotFound(format!("entry {}", entry.id())))?;
        stored.sys.published_version = None;
        stored.sys.version += 1;
        Ok(())
    }

    async fn delete_entry(&self, entry: &Entry) -> Result<(), StoreError> {
        self.pause(Some(entry.id())).await;
        let mut state = self.state.lock();
        state.calls.push(Call::DeleteEntry(entry.id().to_string()));
        Self::check_failing(&state, entry.id())?;
        let before = state.entries.len();
        state.entries.retain(|e| e.id() != entry.id());
        if state.entries.len() == before {
            return Err(StoreError::NotFound(format!("entry {}", entry.id())));
        }
        Ok(())
    }

    async fn list_content_types(
        &self,
        skip: usize,
        limit: usize,
    ) -> Result<Page<ContentType>, StoreError> {
        let mut state = self.state.lock();
        state.calls.push(Call::ListContentTypes { skip, limit });
        Ok(Page {
            total: state.content_types.len(),
            skip,
            limit,
            items: state.content_types.iter().skip(skip).take(limit).cloned().collect(),
        })
    }

    async fn unpublish_content_type(&self, content_type: &ContentType) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        state
            .calls
            .push(Call::UnpublishContentType(content_type.id().to_string()));
        Self::check_failing(&state, content_type.id())?;
        let stored = state
            .content_types
            .iter_mut()
            .find(|c| c.id() == content_type.id())
            .ok_or_else(|| StoreError::NotFound(format!("content type {}", content_type.id())))?;
        stored.sys.published_version = None;
        Ok(())
    }

    async fn delete_content_type(&self, content_type: &ContentType) -> Result<(), StoreError> {
        let mut state = self.state.lock();
        state
            .calls
            .push(Call::DeleteContentType(content_type.id().to_string()));
        Self::check_failing(&state, content_type.id())?;
        let stored = state
            .content_types
            .iter()
            .find(|c| c.id() == content_type.id())
            .ok_or_else(|| StoreError::NotFound(format!("content type {}", content_type.id())))?;
        if stored.sys.published_version.is_some() {
            return Err(StoreError::Status {
                operation: format!("delete content type {}", content_type.id()),
                status: 400,
                body: "content type is still published".to_string(),
            });
        }
        state.content_types.retain(|c| c.id() != content_type.id());
        Ok(())
    }
}
