use crate::ast::*;
use crate::types::{DialogueEntry, OverrideMap, OverrideValue};
use winnow::combinator::{delimited, separated_pair};
use winnow::token::take_till;
use winnow::{ModalResult, Parser};

/// Parses the lines of one extracted block into dialogue entries.
pub fn parse<S: AsRef<str>>(lines: &[S]) -> Vec<DialogueEntry> {
    lines
        .iter()
        .map(|line| classify(line.as_ref()))
        .fold(ParseState::default(), ParseState::step)
        .finish()
}

pub fn classify(line: &str) -> Node {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Node::Blank;
    }

    let mut rest = trimmed;
    match speaker_header.parse_next(&mut rest) {
        Ok(speaker_id) => Node::Tag(TagLine {
            speaker_id: speaker_id.to_string(),
            overrides: parse_overrides(rest),
        }),
        Err(_) => Node::Text(trimmed.to_string()),
    }
}

/// Collects every `[key=value]` token in the text after a tag header.
/// Anything between tokens is skipped; a repeated key keeps its last value.
pub fn parse_overrides(segment: &str) -> OverrideMap {
    let mut out = OverrideMap::new();
    let mut input = segment;
    while !input.is_empty() {
        let checkpoint = input;
        match override_pair.parse_next(&mut input) {
            Ok((key, value)) => {
                out.insert(key.trim().to_string(), OverrideValue::from_raw(value.trim()));
            }
            Err(_) => {
                let mut chars = checkpoint.chars();
                chars.next();
                input = chars.as_str();
            }
        }
    }
    out
}

fn speaker_header<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    delimited('[', take_till(1.., ']'), ']').parse_next(input)
}

fn override_pair<'s>(input: &mut &'s str) -> ModalResult<(&'s str, &'s str)> {
    delimited(
        '[',
        separated_pair(take_till(1.., ['=', ']']), '=', take_till(1.., ']')),
        ']',
    )
    .parse_next(input)
}

/// An entry whose tag line has been read and whose body is still growing.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingEntry {
    pub speaker_id: String,
    pub overrides: OverrideMap,
    pub fragments: Vec<String>,
}

impl PendingEntry {
    fn open(tag: TagLine) -> Self {
        Self {
            speaker_id: tag.speaker_id,
            overrides: tag.overrides,
            fragments: Vec::new(),
        }
    }

    fn push(mut self, fragment: String) -> Self {
        self.fragments.push(fragment);
        self
    }

    fn into_entry(self) -> Option<DialogueEntry> {
        // a tag with no body lines produces nothing
        if self.fragments.is_empty() {
            return None;
        }
        Some(DialogueEntry::new(
            self.speaker_id,
            &self.fragments,
            self.overrides,
        ))
    }
}

/// Accumulator for the parse fold.
///
/// `pending` is `None` until the first tag line; body lines seen in that
/// state have no speaker and are discarded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseState {
    pub completed: Vec<DialogueEntry>,
    pub pending: Option<PendingEntry>,
}

impl ParseState {
    pub fn step(self, node: Node) -> ParseState {
        let ParseState {
            mut completed,
            pending,
        } = self;

        match node {
            Node::Tag(tag) => {
                completed.extend(pending.and_then(PendingEntry::into_entry));
                ParseState {
                    completed,
                    pending: Some(PendingEntry::open(tag)),
                }
            }
            Node::Blank => ParseState {
                completed,
                pending: pending.map(|p| p.push(String::new())),
            },
            Node::Text(text) => ParseState {
                completed,
                pending: pending.map(|p| p.push(text)),
            },
        }
    }

    pub fn finish(self) -> Vec<DialogueEntry> {
        let mut completed = self.completed;
        completed.extend(self.pending.and_then(PendingEntry::into_entry));
        completed
    }
}
