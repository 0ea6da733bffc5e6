use crate::config::ViewerConfig;
use crate::highlight::{is_highlighted, FilterState};
use crate::types::{DialogueEntry, RowView};

const DEFAULT_COLOR: &str = "#000";
const DEFAULT_SILHOUETTE_COLOR: &str = "#888888";
const AVATAR_DIR: &str = "avatar";

/// Resolves an entry against speaker defaults. Overrides win per key.
pub fn resolve_row(entry: &DialogueEntry, config: &ViewerConfig, filter: &FilterState) -> RowView {
    let id = entry.speaker_id.as_str();
    let member = config.member(id);
    let text_override = |key: &str| entry.get_override(key).and_then(|v| v.as_text());

    let name = text_override("Name")
        .or_else(|| text_override("name"))
        .or_else(|| non_empty(config.display_name(id)))
        .unwrap_or(id)
        .to_string();

    let color = text_override("color")
        .or_else(|| non_empty(member.and_then(|m| m.color.as_deref())))
        .unwrap_or(DEFAULT_COLOR)
        .to_string();

    let avatar = text_override("avatar")
        .or_else(|| non_empty(member.and_then(|m| m.avatar.as_deref())))
        .map(|file| format!("{}/{}", AVATAR_DIR, file));

    let silhouette = match entry.get_override("silhouette") {
        Some(v) => v.is_truthy(),
        None => member.map_or(false, |m| m.silhouette),
    };

    let silhouette_color = text_override("silhouetteColor")
        .or_else(|| non_empty(member.and_then(|m| m.silhouette_color.as_deref())))
        .unwrap_or(DEFAULT_SILHOUETTE_COLOR)
        .to_string();

    let avatar_background = text_override("avatarBackgroundColor")
        .or_else(|| non_empty(member.and_then(|m| m.avatar_background_color.as_deref())))
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}33", color));

    let avatar_cache_key = format!("{}-{}", id, if silhouette { "s" } else { "n" });

    RowView {
        speaker_id: id.to_string(),
        name,
        color,
        avatar,
        silhouette,
        silhouette_color,
        avatar_background,
        avatar_cache_key,
        html: body_html(&entry.text),
        highlighted: is_highlighted(id, filter),
    }
}

/// Expands the literal `\n` continuation escape into a line break.
pub fn body_html(text: &str) -> String {
    text.replace("\\n", crate::types::LINE_BREAK)
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}
