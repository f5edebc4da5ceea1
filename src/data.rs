//! Newsletter document model and loading.
//!
//! The data file is a YAML (or JSON) document with a single `newsletter` root:
//!
//! ```yaml
//! newsletter:
//!   new_tags: [agents]
//!   sections:
//!     - name: News
//!       items:
//!         - id: 101                 # plain post: has `assets`
//!           url: https://example.com/post
//!           assets:
//!             - source: assets/cover.png
//!               tags: [llm, highlight]
//!         - items:                  # group (bundle): has nested `items`
//!             - id: 102
//!               assets:
//!                 - source: assets/demo.mp4
//!                   type: video
//! ```
//!
//! Items are told apart by shape, not by a discriminator field: an item with
//! `items` is a group, an item with `assets` is a post, anything else is
//! ignored. Unnamed sections are skipped by the slide index.

use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataFormatError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid newsletter data format: missing `newsletter` root")]
    MissingNewsletter,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct Document {
    #[serde(default)]
    newsletter: Option<Newsletter>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Newsletter {
    #[serde(default)]
    pub title: Option<String>,
    /// Tags to flag as "new" in the tag cloud. Presentation only.
    #[serde(default)]
    pub new_tags: Vec<String>,
    /// A missing or null `sections` list is treated as empty.
    #[serde(default, deserialize_with = "null_as_default")]
    pub sections: Vec<Option<Section>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<Item>,
}

/// A section entry: either a post (`assets`) or a group of posts (`items`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Item {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub assets: Option<Vec<RawAsset>>,
    #[serde(default)]
    pub items: Option<Vec<Item>>,
}

impl Item {
    /// An entry with `assets` is a post even if it also lists `items`.
    pub fn is_post(&self) -> bool {
        self.assets.is_some()
    }

    pub fn is_group(&self) -> bool {
        !self.is_post() && self.items.is_some()
    }

    pub fn assets(&self) -> &[RawAsset] {
        self.assets.as_deref().unwrap_or_default()
    }

    pub fn posts(&self) -> &[Item] {
        self.items.as_deref().unwrap_or_default()
    }
}

/// An asset exactly as written in the document, before path resolution.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAsset {
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub html: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Post ids show up as both `id: 42` and `id: "abc"` in real data.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(Option::<Id>::deserialize(deserializer)?.map(|id| match id {
        Id::Text(s) => s,
        Id::Int(n) => n.to_string(),
        Id::Float(n) => n.to_string(),
    }))
}

fn unwrap_newsletter(doc: Document) -> Result<Newsletter, DataFormatError> {
    doc.newsletter.ok_or(DataFormatError::MissingNewsletter)
}

/// Parse a YAML document.
pub fn parse_yaml(text: &str) -> Result<Newsletter, DataFormatError> {
    let doc: Option<Document> = serde_yaml::from_str(text)?;
    unwrap_newsletter(doc.unwrap_or_default())
}

/// Parse a JSON document.
pub fn parse_json(text: &str) -> Result<Newsletter, DataFormatError> {
    let doc: Option<Document> = serde_json::from_str(text)?;
    unwrap_newsletter(doc.unwrap_or_default())
}

/// Load a newsletter from disk. `.json` files are parsed as JSON, anything
/// else as YAML.
pub fn load_newsletter(path: &Path) -> Result<Newsletter, DataFormatError> {
    let text = fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let newsletter = if is_json {
        parse_json(&text)?
    } else {
        parse_yaml(&text)?
    };
    tracing::info!(
        path = %path.display(),
        sections = newsletter.sections.len(),
        "loaded newsletter"
    );
    Ok(newsletter)
}
