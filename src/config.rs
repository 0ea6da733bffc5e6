use crate::error::{Error, Result};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashMap;

/// Shape of the viewer's `config.json` as written on disk.
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    scene: serde_json::Map<String, Value>,
    #[serde(default)]
    member_map: serde_json::Map<String, Value>,
    #[serde(default)]
    id_map: serde_json::Map<String, Value>,
}

/// Default display metadata for one speaker id.
///
/// Fields of an unexpected type are read the way the page script reads
/// them instead of failing the whole config.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    #[serde(default, deserialize_with = "loose_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub color: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub avatar: Option<String>,
    #[serde(default, deserialize_with = "exactly_true")]
    pub silhouette: bool,
    #[serde(default, deserialize_with = "loose_string")]
    pub silhouette_color: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub avatar_background_color: Option<String>,
    #[serde(default, deserialize_with = "truthy")]
    pub shown_highlight_selection: bool,
}

fn loose_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn exactly_true<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Ok(Value::deserialize(d)? == Value::Bool(true))
}

fn truthy<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Ok(is_truthy(&Value::deserialize(d)?))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn text_of(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneSpec {
    pub id: String,
    pub filename: String,
    pub title: String,
}

/// Scenes and speaker defaults, both kept in document order.
#[derive(Debug, Clone, Default)]
pub struct ViewerConfig {
    scenes: Vec<SceneSpec>,
    members: Vec<(String, Member)>,
    id_map: HashMap<String, String>,
    member_index: HashMap<String, usize>,
}

impl ViewerConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let raw: RawConfig = serde_json::from_str(text).map_err(Error::Config)?;

        let mut scenes = Vec::with_capacity(raw.scene.len());
        for (id, value) in raw.scene {
            // `[filename, title]`; anything past the title is ignored
            let Value::Array(parts) = value else {
                return Err(Error::Config(serde_json::Error::custom(format!(
                    "scene {} must be a [filename, title] array",
                    id
                ))));
            };
            let filename = text_of(parts.first());
            let title = text_of(parts.get(1));
            scenes.push(SceneSpec { id, filename, title });
        }

        let mut members = Vec::with_capacity(raw.member_map.len());
        for (id, value) in raw.member_map {
            let member = match value {
                Value::Object(_) => serde_json::from_value(value).map_err(Error::Config)?,
                _ => Member::default(),
            };
            members.push((id, member));
        }

        let id_map = raw
            .id_map
            .into_iter()
            .filter_map(|(id, name)| match name {
                Value::String(name) => Some((id, name)),
                _ => None,
            })
            .collect();

        Ok(Self::new(scenes, members, id_map))
    }

    pub fn new(
        scenes: Vec<SceneSpec>,
        members: Vec<(String, Member)>,
        id_map: HashMap<String, String>,
    ) -> Self {
        let member_index = members
            .iter()
            .enumerate()
            .map(|(idx, (id, _))| (id.clone(), idx))
            .collect();
        Self {
            scenes,
            members,
            id_map,
            member_index,
        }
    }

    pub fn scenes(&self) -> &[SceneSpec] {
        &self.scenes
    }

    pub fn members(&self) -> &[(String, Member)] {
        &self.members
    }

    pub fn member(&self, id: &str) -> Option<&Member> {
        self.member_index
            .get(id)
            .and_then(|&idx| self.members.get(idx))
            .map(|(_, member)| member)
    }

    pub fn display_name(&self, id: &str) -> Option<&str> {
        self.id_map.get(id).map(|s| s.as_str())
    }
}
