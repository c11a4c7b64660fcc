use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// One catalogued AI tool
///
/// Two records describe the same tool when their
/// [`identity_key`](ToolRecord::identity_key) matches. Keys other than the
/// five modelled fields (the web app's `id`, `categoryId`, `rating` and so
/// on) are kept verbatim in `extra` and written back on save.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolRecord {
    #[serde(deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub url: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub category: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub tags: BTreeSet<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Treats an explicit `null` like a missing key
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl ToolRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Adopts unmodelled keys this record does not carry yet
    pub fn absorb_extra(&mut self, other: Map<String, Value>) {
        for (key, value) in other {
            self.extra.entry(key).or_insert(value);
        }
    }

    /// Trimmed URL when present, otherwise the trimmed lowercased name
    ///
    /// An empty key means the record cannot be identified and must be dropped.
    pub fn identity_key(&self) -> String {
        let url = self.url.trim();
        if !url.is_empty() {
            return url.to_string();
        }
        self.name.trim().to_lowercase()
    }

    /// Description length in characters, the completeness measure for merges
    pub fn description_len(&self) -> usize {
        self.description.chars().count()
    }
}
