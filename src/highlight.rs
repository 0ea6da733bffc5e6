use crate::config::ViewerConfig;
use crate::types::HighlightOption;
use std::collections::BTreeSet;

pub const EVERYONE: &str = "Everyone";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    selected: BTreeSet<String>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, id: impl Into<String>) {
        self.selected.insert(id.into());
    }

    pub fn deselect(&mut self, id: &str) {
        self.selected.remove(id);
    }

    /// Applies a checkbox toggle to every id behind one option.
    pub fn set<S: AsRef<str>>(&mut self, ids: &[S], checked: bool) {
        for id in ids {
            if checked {
                self.select(id.as_ref());
            } else {
                self.deselect(id.as_ref());
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.selected.contains(id)
    }
}

impl<S: Into<String>> FromIterator<S> for FilterState {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            selected: iter.into_iter().map(Into::into).collect(),
        }
    }
}

pub fn is_highlighted(speaker_id: &str, filter: &FilterState) -> bool {
    if speaker_id == EVERYONE {
        !filter.is_empty()
    } else {
        filter.contains(speaker_id)
    }
}

pub fn highlight_options(config: &ViewerConfig) -> Vec<HighlightOption> {
    let mut out: Vec<HighlightOption> = Vec::new();
    for (id, member) in config.members() {
        if !member.shown_highlight_selection {
            continue;
        }
        // the picker groups by `name`; a member without one groups under ""
        let name = member.name.clone().unwrap_or_default();
        match out.iter_mut().find(|opt| opt.name == name) {
            Some(opt) => opt.ids.push(id.clone()),
            None => out.push(HighlightOption {
                name,
                ids: vec![id.clone()],
            }),
        }
    }
    out
}
