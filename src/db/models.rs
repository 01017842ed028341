use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use strum::{AsRefStr, Display};


#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum PublishState {
    Draft,
    Published,
    Changed,
    Archived,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum SchemaState {
    Draft,
    Published,
}


#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSys {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "linkType", default, skip_serializing_if = "Option::is_none")]
    pub link_type: Option<String>,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub sys: LinkSys,
}

impl Link {
    pub fn entry(id: impl Into<String>) -> Self {
        Self::to("Entry", id)
    }

    pub fn content_type(id: impl Into<String>) -> Self {
        Self::to("ContentType", id)
    }

    fn to(link_type: &str, id: impl Into<String>) -> Self {
        Self {
            sys: LinkSys {
                kind: "Link".to_string(),
                link_type: Some(link_type.to_string()),
                id: id.into(),
            },
        }
    }

    /// Reads an entry link out of a raw field value, ignoring asset links.
    pub fn entry_id(value: &Value) -> Option<&str> {
        let sys = value.get("sys")?;
        if sys.get("type")?.as_str()? != "Link" {
            return None;
        }
        match sys.get("linkType").and_then(Value::as_str) {
            Some("Entry") | None => sys.get("id")?.as_str(),
            Some(_) => None,
        }
    }
}


#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntrySys {
    pub id: String,
    #[serde(default)]
    pub version: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_version: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archived_version: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<Link>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entry {
    pub sys: EntrySys,
    /// `field name -> locale -> value`, as returned by the management API.
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Entry {
    /// A fresh draft entry of the given content type.
    pub fn new(id: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            sys: EntrySys {
                id: id.into(),
                version: 1,
                published_version: None,
                archived_version: None,
                content_type: Some(Link::content_type(content_type)),
            },
            fields: Map::new(),
        }
    }

    pub fn published(mut self) -> Self {
        self.sys.version = 2;
        self.sys.published_version = Some(1);
        self
    }

    pub fn changed(mut self) -> Self {
        self.sys.version = 4;
        self.sys.published_version = Some(1);
        self
    }

    pub fn archived(mut self) -> Self {
        self.sys.version = 3;
        self.sys.archived_version = Some(2);
        self
    }

    /// Sets `field` to a list of entry links under `locale`.
    pub fn with_links(mut self, field: &str, locale: &str, ids: &[&str]) -> Self {
        let links: Vec<Link> = ids.iter().map(|id| Link::entry(*id)).collect();
        let slot = self
            .fields
            .entry(field.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(locales) = slot {
            locales.insert(locale.to_string(), json!(links));
        }
        self
    }

    pub fn id(&self) -> &str {
        &self.sys.id
    }

    pub fn content_type_id(&self) -> Option<&str> {
        self.sys.content_type.as_ref().map(|link| link.sys.id.as_str())
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn publish_state(&self) -> PublishState {
        if self.sys.archived_version.is_some() {
            return PublishState::Archived;
        }
        match self.sys.published_version {
            None => PublishState::Draft,
            Some(published) if self.sys.version == published + 1 => PublishState::Published,
            Some(_) => PublishState::Changed,
        }
    }

    /// Archived entries have no live version even if `publishedVersion` lingers.
    pub fn has_published_version(&self) -> bool {
        self.sys.archived_version.is_none() && self.sys.published_version.is_some()
    }
}


#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentTypeSys {
    pub id: String,
    #[serde(default)]
    pub version: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_version: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentType {
    pub sys: ContentTypeSys,
    #[serde(default)]
    pub name: Option<String>,
}

impl ContentType {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            sys: ContentTypeSys {
                id: id.into(),
                version: 1,
                published_version: None,
            },
            name: None,
        }
    }

    pub fn published(mut self) -> Self {
        self.sys.version = 2;
        self.sys.published_version = Some(1);
        self
    }

    pub fn id(&self) -> &str {
        &self.sys.id
    }

    pub fn publish_state(&self) -> SchemaState {
        if self.sys.published_version.is_some() {
            SchemaState::Published
        } else {
            SchemaState::Draft
        }
    }
}


#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub total: usize,
    #[serde(default)]
    pub skip: usize,
    #[serde(default)]
    pub limit: usize,
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}


#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryQuery {
    pub content_type: Option<String>,
}

impl EntryQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn of_type(content_type: impl Into<String>) -> Self {
        Self {
            content_type: Some(content_type.into()),
        }
    }

    pub fn matches(&self, entry: &Entry) -> bool {
        match &self.content_type {
            Some(wanted) => entry.content_type_id() == Some(wanted.as_str()),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_state_from_versions() {
        assert_eq!(Entry::new("a", "t").publish_state(), PublishState::Draft);
        assert_eq!(Entry::new("a", "t").published().publish_state(), PublishState::Published);
        assert_eq!(Entry::new("a", "t").changed().publish_state(), PublishState::Changed);
        assert_eq!(Entry::new("a", "t").archived().publish_state(), PublishState::Archived);
    }

    #[test]
    fn test_entry_deserialize_management_payload() {
        let raw = json!({
            "sys": {
                "id": "ep-1",
                "type": "Entry",
                "version": 7,
                "publishedVersion": 6,
                "contentType": {"sys": {"type": "Link", "linkType": "ContentType", "id": "episode"}}
            },
            "fields": {
                "title": {"en-US": "Pilot"},
                "series": {"en-US": {"sys": {"type": "Link", "linkType": "Entry", "id": "s-1"}}}
            }
        });
        let entry: Entry = serde_json::from_value(raw).unwrap();
        assert_eq!(entry.id(), "ep-1");
        assert_eq!(entry.content_type_id(), Some("episode"));
        assert_eq!(entry.publish_state(), PublishState::Published);
        assert!(entry.field("series").is_some());
    }

    #[test]
    fn test_link_entry_id_skips_assets() {
        let asset = json!({"sys": {"type": "Link", "linkType": "Asset", "id": "img"}});
        let entry = json!({"sys": {"type": "Link", "linkType": "Entry", "id": "e"}});
        assert_eq!(Link::entry_id(&asset), None);
        assert_eq!(Link::entry_id(&entry), Some("e"));
        assert_eq!(Link::entry_id(&json!("plain text")), None);
    }

    #[test]
    fn test_query_matches_content_type() {
        let entry = Entry::new("a", "episode");
        assert!(EntryQuery::all().matches(&entry));
        assert!(EntryQuery::of_type("episode").matches(&entry));
        assert!(!EntryQuery::of_type("series").matches(&entry));
    }

    #[test]
    fn test_page_defaults() {
        let page: Page<ContentType> = serde_json::from_value(json!({"total": 3})).unwrap();
        assert_eq!(page.total, 3);
        assert!(page.items.is_empty());
    }
}
