use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single editable field on a site page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentValue {
    Text {
        value: String,
    },
    Html {
        value: String,
    },
    Image {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alt: Option<String>,
    },
    Structured {
        value: serde_json::Value,
    },
}

/// Admin-editable content for one page section (e.g. `contact_info`, `hero`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteSection {
    /// Document id; always equal to `section`.
    pub id: String,
    pub section: String,
    #[serde(default)]
    pub data: BTreeMap<String, ContentValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl SiteSection {
    pub fn empty(section: &str) -> Self {
        Self {
            id: section.to_string(),
            section: section.to_string(),
            data: BTreeMap::new(),
            updated_at: None,
        }
    }
}

/// Section names are used as document ids and URL segments.
pub fn is_valid_section_name(name: &str) -> bool {
    (1..=64).contains(&name.len())
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
}
