use serde::Serialize;
use std::collections::BTreeMap;

pub const LINE_BREAK: &str = "<br>";

pub type OverrideMap = BTreeMap<String, OverrideValue>;

/// A per-line property value, typed once when the tag line is parsed.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum OverrideValue {
    Bool(bool),
    Color(String),
    Text(String),
}

impl OverrideValue {
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "true" => OverrideValue::Bool(true),
            "false" => OverrideValue::Bool(false),
            s if s.starts_with('#') => OverrideValue::Color(s.to_string()),
            s => OverrideValue::Text(s.to_string()),
        }
    }

    /// Reads the value as display text. `false` and empty strings count as unset.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            OverrideValue::Bool(true) => Some("true"),
            OverrideValue::Bool(false) => None,
            OverrideValue::Color(s) | OverrideValue::Text(s) if s.is_empty() => None,
            OverrideValue::Color(s) | OverrideValue::Text(s) => Some(s.as_str()),
        }
    }

    pub fn is_truthy(&self) -> bool {
        self.as_text().is_some()
    }
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct DialogueEntry {
    pub speaker_id: String,
    pub text: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub overrides: OverrideMap,
}

impl DialogueEntry {
    pub fn new(speaker_id: impl Into<String>, fragments: &[String], overrides: OverrideMap) -> Self {
        Self {
            speaker_id: speaker_id.into(),
            text: fragments.join(LINE_BREAK),
            overrides,
        }
    }

    pub fn get_override(&self, key: &str) -> Option<&OverrideValue> {
        self.overrides.get(key)
    }
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct RowView {
    pub speaker_id: String,
    pub name: String,
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub silhouette: bool,
    pub silhouette_color: String,
    pub avatar_background: String,
    pub avatar_cache_key: String,
    pub html: String,
    pub highlighted: bool,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct SceneView {
    pub id: String,
    pub title: String,
    pub label: String,
    pub rows: Vec<RowView>,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct HighlightOption {
    pub name: String,
    pub ids: Vec<String>,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ViewerOutput {
    pub options: Vec<HighlightOption>,
    pub scenes: Vec<SceneView>,
}
