use super::locate;
use anyhow::{Result, anyhow};
use serde::Serialize;
use serde_json::{Map, Value};

pub const REQUIRED_FIELDS: &[&str] = &["title"];

pub fn validate_fields(fields: &Map<String, Value>) -> Result<()> {
    for field in REQUIRED_FIELDS {
        if !fields.contains_key(*field) {
            anyhow::bail!("Missing required field: {}", field);
        }
    }
    Ok(())
}

/// Article metadata read from front matter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticleMeta {
    pub title: String,
    /// Falls back to the title when absent.
    pub subtitle: String,
    pub description: String,
    pub date: String,
    pub author: String,
    pub banner: Option<String>,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
    pub keywords: Vec<String>,
    /// Articles are drafts unless the front matter says otherwise.
    pub draft: bool,
    pub gen_cover: bool,
}

impl ArticleMeta {
    pub fn from_fields(fields: &Map<String, Value>) -> Result<Self> {
        validate_fields(fields)?;

        let title = text(fields, "title");
        let subtitle = Some(text(fields, "subtitle"))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| title.clone());

        Ok(Self {
            subtitle,
            description: text(fields, "description"),
            date: text(fields, "date"),
            author: text(fields, "author"),
            banner: Some(text(fields, "banner")).filter(|s| !s.is_empty()),
            tags: list(fields, "tags"),
            categories: list(fields, "categories"),
            keywords: list(fields, "keywords"),
            draft: flag(fields, "draft", true),
            gen_cover: flag(fields, "gen_cover", false),
            title,
        })
    }

    /// Parses the metadata and returns it with the body that follows the block.
    pub fn from_content(content: &str) -> Result<(Self, &str)> {
        let front_matter = locate(content).ok_or_else(|| anyhow!("Missing front matter"))?;
        let meta = Self::from_fields(&front_matter.parse_fields())?;
        Ok((meta, front_matter.body))
    }
}

fn text(fields: &Map<String, Value>, key: &str) -> String {
    match fields.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(item_text)
            .collect::<Vec<_>>()
            .join(", "),
        Some(other) => other.to_string(),
    }
}

fn item_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn list(fields: &Map<String, Value>, key: &str) -> Vec<String> {
    match fields.get(key) {
        Some(Value::Array(items)) => items.iter().map(item_text).collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(|item| item.trim().trim_matches(['"', '\'']))
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn flag(fields: &Map<String, Value>, key: &str, default: bool) -> bool {
    match fields.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => matches!(s.to_lowercase().as_str(), "true" | "yes" | "y"),
        Some(_) => false,
        None => default,
    }
}
