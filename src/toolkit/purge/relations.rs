use std::collections::HashSet;

use serde_json::Value;

use crate::db::{Entry, Link};


/// Finds the child entries a record owns through its relation fields.
#[derive(Debug, Clone)]
pub struct RelationResolver {
    fields: Vec<String>,
}

impl RelationResolver {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Linked entry ids in field order, then locale order, without duplicates.
    pub fn child_ids(&self, entry: &Entry) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut ids = Vec::new();

        for field in &self.fields {
            let Some(value) = entry.field(field) else {
                continue;
            };
            let mut found = Vec::new();
            collect_field(value, &mut found);
            for id in found {
                if id != entry.id() && seen.insert(id.clone()) {
                    ids.push(id);
                }
            }
        }

        ids
    }
}

fn collect_field(value: &Value, out: &mut Vec<String>) {
    // Non-localized payloads carry the link (or list) directly.
    if collect_links(value, out) {
        return;
    }
    if let Value::Object(locales) = value {
        for localized in locales.values() {
            collect_links(localized, out);
        }
    }
}

fn collect_links(value: &Value, out: &mut Vec<String>) -> bool {
    match value {
        Value::Array(items) => {
            out.extend(items.iter().filter_map(Link::entry_id).map(str::to_string));
            true
        }
        _ => match Link::entry_id(value) {
            Some(id) => {
                out.push(id.to_string());
                true
            }
            None => false,
        },
    }
}
