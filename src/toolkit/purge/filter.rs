use std::collections::HashSet;
use std::path::Path;

use tracing::{info, warn};

use crate::core::error::{PurgeError, Result};
use crate::db::Entry;


/// Decides which listed entries are eligible for deletion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EntryFilter {
    #[default]
    All,
    Ignore(HashSet<String>),
    Only(HashSet<String>),
}

impl EntryFilter {
    /// The ignore-list wins when both lists are supplied.
    pub fn from_lists(ignore: Option<&Path>, remove: Option<&Path>) -> Result<Self> {
        match (ignore, remove) {
            (Some(ignore), remove) => {
                if let Some(remove) = remove {
                    warn!(
                        "Both ignore-list and remove-list given, using {} and ignoring {}",
                        ignore.display(),
                        remove.display()
                    );
                }
                let ids = read_ids(ignore)?;
                info!("Ignoring {} entries listed in {}", ids.len(), ignore.display());
                Ok(Self::Ignore(ids))
            }
            (None, Some(remove)) => {
                let ids = read_ids(remove)?;
                info!("Restricting deletion to {} entries listed in {}", ids.len(), remove.display());
                Ok(Self::Only(ids))
            }
            (None, None) => Ok(Self::All),
        }
    }

    pub fn ignoring<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Ignore(ids.into_iter().map(Into::into).collect())
    }

    pub fn only<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Only(ids.into_iter().map(Into::into).collect())
    }

    pub fn accept(&self, entry: &Entry) -> bool {
        self.accepts_id(entry.id())
    }

    pub fn accepts_id(&self, id: &str) -> bool {
        match self {
            Self::All => true,
            Self::Ignore(ids) => !ids.contains(id),
            Self::Only(ids) => ids.contains(id),
        }
    }
}

fn read_ids(path: &Path) -> Result<HashSet<String>> {
    let raw = std::fs::read_to_string(path).map_err(|e| PurgeError::list_file(path, e))?;
    Ok(parse_ids(&raw))
}

fn parse_ids(raw: &str) -> HashSet<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
