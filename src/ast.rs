use crate::types::OverrideMap;

/// One classified script line.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Tag(TagLine),
    Blank,
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TagLine {
    pub speaker_id: String, // "Alice" in "[Alice][color=#f00]"
    pub overrides: OverrideMap,
}
