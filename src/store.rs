//! Keyed value storage.
//!
//! [`SectionStore`] holds the authoritative values of a document: one
//! [`Section`] per name, each an insertion-ordered map of key to [`Value`].
//! The global section (empty name) is always present.

use crate::error::{IniError, IniResult};
use crate::types::{Value, is_single_line};
use indexmap::IndexMap;

/// A resolved `"section.key"` / `"key"` address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Address<'a> {
    pub section: &'a str,
    pub key: &'a str,
}

impl<'a> Address<'a> {
    /// Split an address on its first `.`.
    ///
    /// `"key"` resolves into the global section. The split is literal, so
    /// `"a."` is section `a` with an empty key and `"a.b.c"` is section `a`
    /// with key `b.c`.
    ///
    /// Names that a render and re-parse would not give back unchanged are
    /// rejected: line breaks anywhere, a section name with surrounding
    /// whitespace or a `]` followed by a comment marker, and a key with a
    /// `"` followed by `=`.
    pub fn parse(address: &'a str) -> IniResult<Self> {
        let (section, key) = address.split_once('.').unwrap_or(("", address));

        if address.is_empty() || !section_name_round_trips(section) || !key_round_trips(key) {
            return Err(IniError::invalid_address(address));
        }

        Ok(Self { section, key })
    }
}

fn trim_grammar_ws(text: &str) -> &str {
    text.trim_start_matches([' ', '\t', '\r', '\u{0B}', '\u{0C}'])
}

/// `[name]` reads back as `name`.
fn section_name_round_trips(name: &str) -> bool {
    if name.is_empty() {
        return true;
    }
    if !is_single_line(name)
        || name.starts_with(char::is_whitespace)
        || name.ends_with(char::is_whitespace)
    {
        return false;
    }

    // `]` then a marker ends the header early
    !name
        .match_indices(']')
        .any(|(at, _)| trim_grammar_ws(&name[at + 1..]).starts_with(['#', ';']))
}

/// The key, quoted or not, reads back as itself.
fn key_round_trips(key: &str) -> bool {
    is_single_line(key)
        && !key
            .match_indices('"')
            .any(|(at, _)| trim_grammar_ws(&key[at + 1..]).starts_with('='))
}

/// One named group of key/value pairs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Section {
    values: IndexMap<String, Value>,

    /// Number of keys right after the last parse
    original_key_count: usize,
}

impl Section {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(|k| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn original_key_count(&self) -> usize {
        self.original_key_count
    }
}

/// Section name -> section, in creation order
#[derive(Debug, Clone, PartialEq)]
pub struct SectionStore {
    sections: IndexMap<String, Section>,
}

impl SectionStore {
    pub fn new() -> Self {
        let mut sections = IndexMap::new();
        sections.insert(String::new(), Section::default());
        Self { sections }
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    /// Sections in creation order, global section first
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Section)> {
        self.sections.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get(&self, address: &Address<'_>) -> Option<&Value> {
        self.sections.get(address.section)?.get(address.key)
    }

    /// Resolve an address, creating the section and key if needed.
    ///
    /// A created key starts as an empty scalar. Frozen key counts are not
    /// touched.
    pub fn get_or_create(&mut self, address: &Address<'_>) -> &mut Value {
        self.sections
            .entry(address.section.to_string())
            .or_default()
            .values
            .entry(address.key.to_string())
            .or_default()
    }

    /// Store `value`, replacing any existing value in place.
    pub fn set(&mut self, address: &Address<'_>, value: Value) {
        *self.get_or_create(address) = value;
    }

    /// Make sure `name` exists, even with no keys.
    pub fn ensure_section(&mut self, name: &str) {
        if !self.sections.contains_key(name) {
            self.sections.insert(name.to_string(), Section::default());
        }
    }

    /// Record the current key count of every section as its original count.
    pub fn freeze_counts(&mut self) {
        for section in self.sections.values_mut() {
            section.original_key_count = section.values.len();
        }
    }

    /// Total number of keys across all sections
    pub fn key_count(&self) -> usize {
        self.sections.values().map(Section::len).sum()
    }
}

impl Default for SectionStore {
    fn default() -> Self {
        Self::new()
    }
}
