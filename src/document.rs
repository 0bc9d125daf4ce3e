//! Line log and serializer.
//!
//! The [`LineLog`] records every physical line of the parsed source in order.
//! It is layout only: rendering pulls current values from the
//! [`SectionStore`], so edits show up in place while comments, blank lines and
//! ordering stay as they were.
//!
//! Keys added after parsing have no line of their own. They are written right
//! after the last originally parsed key of their section, and sections created
//! after parsing are appended at the end as full `[section]` blocks.

use crate::config::IniOptions;
use crate::store::SectionStore;
use crate::types::{Value, is_single_line};
use std::borrow::Cow;
use std::collections::HashSet;
use tracing::warn;

/// Classification of one physical line
#[derive(Debug, Clone, PartialEq)]
pub enum LineEntry {
    /// Blank or whitespace-only line
    Empty,

    /// Comment or unrecognized line, kept verbatim (minus leading whitespace)
    Comment { text: String },

    /// Section header: [name]
    Section {
        name: String,
        /// Trailing `# ...` / `; ...` including the whitespace before it
        inline_comment: Option<String>,
    },

    /// Key/value pair: key = value
    Key {
        key: String,
        /// Value as parsed; rendering reads the store instead
        value: Value,
        inline_comment: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Empty,
    Comment,
    Section,
    Key,
}

impl LineEntry {
    pub fn kind(&self) -> LineKind {
        match self {
            LineEntry::Empty => LineKind::Empty,
            LineEntry::Comment { .. } => LineKind::Comment,
            LineEntry::Section { .. } => LineKind::Section,
            LineEntry::Key { .. } => LineKind::Key,
        }
    }

    /// Comment text, section name or key name; empty for blank lines
    pub fn content(&self) -> &str {
        match self {
            LineEntry::Empty => "",
            LineEntry::Comment { text } => text,
            LineEntry::Section { name, .. } => name,
            LineEntry::Key { key, .. } => key,
        }
    }
}

/// Ordered record of the source layout
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineLog {
    entries: Vec<LineEntry>,
}

impl LineLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<LineEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[LineEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize the log against the current values in `store`.
    pub fn render(&self, store: &SectionStore, options: &IniOptions) -> String {
        let mut writer = Writer::new(store, options);
        writer.write_log(&self.entries);
        writer.write_remaining();
        writer.finish()
    }
}

/// Single render pass. `emitted` plays the role of a per-value "saved" flag
/// and starts empty on every pass.
struct Writer<'a> {
    store: &'a SectionStore,
    options: &'a IniOptions,
    lines: Vec<String>,
    emitted: HashSet<(&'a str, &'a str)>,
}

impl<'a> Writer<'a> {
    fn new(store: &'a SectionStore, options: &'a IniOptions) -> Self {
        Self {
            store,
            options,
            lines: Vec::new(),
            emitted: HashSet::new(),
        }
    }

    fn write_log(&mut self, entries: &'a [LineEntry]) {
        let store = self.store;
        let mut current: &'a str = "";
        let mut written_in_section = 0usize;

        // New global keys in a file without parsed global keys go first, while
        // they are still ahead of any section header.
        self.flush_if_complete(current, written_in_section);

        for entry in entries {
            match entry {
                LineEntry::Empty => self.lines.push(String::new()),

                LineEntry::Comment { text } => self.lines.push(text.clone()),

                LineEntry::Section {
                    name,
                    inline_comment,
                } => {
                    let header = format!("[{}]", name);
                    let line = self.with_comment(header, inline_comment.as_deref());
                    self.lines.push(line);
                    current = name;
                    written_in_section = 0;
                }

                LineEntry::Key {
                    key,
                    inline_comment,
                    ..
                } => {
                    let Some(value) = store.section(current).and_then(|s| s.get(key)) else {
                        continue;
                    };
                    let line = self.with_comment(format_pair(key, value), inline_comment.as_deref());
                    self.lines.push(line);
                    self.emitted.insert((current, key.as_str()));
                    written_in_section += 1;
                }
            }

            self.flush_if_complete(current, written_in_section);
        }
    }

    /// Once every originally parsed key of `section` has been written, write
    /// the keys added to it since.
    fn flush_if_complete(&mut self, section: &'a str, written: usize) {
        let store = self.store;
        let Some(stored) = store.section(section) else {
            return;
        };
        if written != stored.original_key_count() {
            return;
        }

        for (key, value) in stored.iter() {
            if self.emitted.insert((section, key)) {
                self.lines.push(format_pair(key, value));
            }
        }
    }

    /// Append every section that still has unwritten keys as its own block.
    fn write_remaining(&mut self) {
        let store = self.store;
        for (name, section) in store.iter() {
            let pending: Vec<(&'a str, &'a Value)> = section
                .iter()
                .filter(|(key, _)| !self.emitted.contains(&(name, *key)))
                .collect();
            if pending.is_empty() {
                continue;
            }

            if !name.is_empty() {
                self.lines.push(format!("[{}]", name));
            }
            for (key, value) in pending {
                self.lines.push(format_pair(key, value));
                self.emitted.insert((name, key));
            }
        }
    }

    fn with_comment(&self, line: String, comment: Option<&str>) -> String {
        match comment {
            Some(comment) if self.options.preserve_inline_comments => line + comment,
            _ => line,
        }
    }

    fn finish(self) -> String {
        let mut output = self.lines.join("\n");
        if self.options.trailing_newline && !self.lines.is_empty() {
            output.push('\n');
        }
        output
    }
}

/// Render `key = value`, quoting either side when a bare form would not
/// parse back to the same text.
pub fn format_pair(key: &str, value: &Value) -> String {
    let key = if key_needs_quotes(key) {
        format!("\"{}\"", key)
    } else {
        key.to_string()
    };

    match value {
        Value::List(_) => format!("{} = {}", key, value),
        Value::Scalar(text) => {
            let text = single_line(key.as_str(), text);
            if value_needs_quotes(&text) {
                format!("{} = \"{}\"", key, text)
            } else {
                format!("{} = {}", key, text)
            }
        }
    }
}

/// Line breaks would split the pair into lines of their own.
fn single_line<'t>(key: &str, text: &'t str) -> Cow<'t, str> {
    if is_single_line(text) {
        return Cow::Borrowed(text);
    }

    warn!(key, value = text, "line break in value, writing it as a space");
    Cow::Owned(text.replace(['\r', '\n'], " "))
}

fn needs_quotes_common(text: &str) -> bool {
    text.is_empty()
        || text.starts_with(char::is_whitespace)
        || text.ends_with(char::is_whitespace)
        || text.starts_with('"')
        || text.contains(['#', ';'])
}

fn key_needs_quotes(key: &str) -> bool {
    needs_quotes_common(key) || key.contains('=') || key.starts_with('[')
}

fn value_needs_quotes(text: &str) -> bool {
    // A bare `[...]` would come back as a list (or a comment).
    needs_quotes_common(text) || text.starts_with('[')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Address;

    fn key_line(key: &str, value: Value) -> LineEntry {
        LineEntry::Key {
            key: key.to_string(),
            value,
            inline_comment: None,
        }
    }

    fn section_line(name: &str) -> LineEntry {
        LineEntry::Section {
            name: name.to_string(),
            inline_comment: None,
        }
    }

    fn store_with(pairs: &[(&str, &str)]) -> SectionStore {
        let mut store = SectionStore::new();
        for (address, value) in pairs {
            store.set(&Address::parse(address).unwrap(), Value::from(*value));
        }
        store.freeze_counts();
        store
    }

    #[test]
    fn test_empty_log() {
        let log = LineLog::new();
        assert_eq!(log.render(&SectionStore::new(), &IniOptions::default()), "");
    }

    #[test]
    fn test_comment_and_blank_preservation() {
        let log = LineLog::with_entries(vec![
            LineEntry::Comment {
                text: "# header".to_string(),
            },
            LineEntry::Empty,
            key_line("a", Value::from("1")),
        ]);
        let store = store_with(&[("a", "1")]);
        assert_eq!(
            log.render(&store, &IniOptions::default()),
            "# header\n\na = 1\n"
        );
    }

    #[test]
    fn test_reads_current_value() {
        let log = LineLog::with_entries(vec![section_line("s"), key_line("k", Value::from("old"))]);
        let mut store = store_with(&[("s.k", "old")]);
        store.set(&Address::parse("s.k").unwrap(), Value::from("new"));
        assert_eq!(log.render(&store, &IniOptions::default()), "[s]\nk = new\n");
    }

    #[test]
    fn test_new_key_after_last_parsed_key() {
        let log = LineLog::with_entries(vec![
            section_line("a"),
            key_line("x", Value::from("1")),
            LineEntry::Empty,
            section_line("b"),
            key_line("y", Value::from("2")),
        ]);
        let mut store = store_with(&[("a.x", "1"), ("b.y", "2")]);
        store.set(&Address::parse("a.z").unwrap(), Value::from("3"));

        assert_eq!(
            log.render(&store, &IniOptions::default()),
            "[a]\nx = 1\nz = 3\n\n[b]\ny = 2\n"
        );
    }

    #[test]
    fn test_new_key_in_section_without_keys() {
        let log = LineLog::with_entries(vec![section_line("empty"), LineEntry::Empty]);
        let mut store = SectionStore::new();
        store.ensure_section("empty");
        store.freeze_counts();
        store.set(&Address::parse("empty.k").unwrap(), Value::from("v"));

        assert_eq!(
            log.render(&store, &IniOptions::default()),
            "[empty]\nk = v\n\n"
        );
    }

    #[test]
    fn test_new_global_key_goes_first() {
        let log = LineLog::with_entries(vec![section_line("s"), key_line("k", Value::from("1"))]);
        let mut store = store_with(&[("s.k", "1")]);
        store.set(&Address::parse("g").unwrap(), Value::from("0"));

        assert_eq!(
            log.render(&store, &IniOptions::default()),
            "g = 0\n[s]\nk = 1\n"
        );
    }

    #[test]
    fn test_new_sections_appended() {
        let log = LineLog::with_entries(vec![key_line("a", Value::from("1"))]);
        let mut store = store_with(&[("a", "1")]);
        store.set(&Address::parse("second.k").unwrap(), Value::from("2"));
        store.set(&Address::parse("first.k").unwrap(), Value::from("1"));

        // creation order, not alphabetical
        assert_eq!(
            log.render(&store, &IniOptions::default()),
            "a = 1\n[second]\nk = 2\n[first]\nk = 1\n"
        );
    }

    #[test]
    fn test_inline_comment_policy() {
        let log = LineLog::with_entries(vec![
            LineEntry::Section {
                name: "s".to_string(),
                inline_comment: Some(" ; section".to_string()),
            },
            LineEntry::Key {
                key: "k".to_string(),
                value: Value::from("1"),
                inline_comment: Some(" # key".to_string()),
            },
        ]);
        let store = store_with(&[("s.k", "1")]);

        assert_eq!(log.render(&store, &IniOptions::default()), "[s]\nk = 1\n");

        let options = IniOptions {
            preserve_inline_comments: true,
            ..IniOptions::default()
        };
        assert_eq!(log.render(&store, &options), "[s] ; section\nk = 1 # key\n");
    }

    #[test]
    fn test_no_trailing_newline() {
        let log = LineLog::with_entries(vec![key_line("a", Value::from("1"))]);
        let store = store_with(&[("a", "1")]);
        let options = IniOptions {
            trailing_newline: false,
            ..IniOptions::default()
        };
        assert_eq!(log.render(&store, &options), "a = 1");
    }

    #[test]
    fn test_format_pair_quoting() {
        assert_eq!(format_pair("k", &Value::from("plain text")), "k = plain text");
        assert_eq!(format_pair("k", &Value::from("")), "k = \"\"");
        assert_eq!(format_pair("k", &Value::from("a;b")), "k = \"a;b\"");
        assert_eq!(format_pair("k", &Value::from(" pad")), "k = \" pad\"");
        assert_eq!(format_pair("k", &Value::from("[1, 2]")), "k = \"[1, 2]\"");
        assert_eq!(format_pair("a = b", &Value::from("x")), "\"a = b\" = x");
        assert_eq!(format_pair("#k", &Value::from("x")), "\"#k\" = x");
        assert_eq!(
            format_pair("k", &Value::List(vec![1.0, 2.5])),
            "k = [1, 2.5]"
        );
        assert_eq!(format_pair("", &Value::from("v")), "\"\" = v");
    }

    #[test]
    fn test_format_pair_keeps_one_line() {
        assert_eq!(
            format_pair("k", &Value::from("a\n[t]\nx = 666")),
            "k = a [t] x = 666"
        );
        assert_eq!(format_pair("k", &Value::from("a\r\n")), "k = \"a  \"");
    }

    #[test]
    fn test_line_kinds() {
        assert_eq!(LineEntry::Empty.kind(), LineKind::Empty);
        assert_eq!(section_line("s").kind(), LineKind::Section);
        assert_eq!(section_line("s").content(), "s");
        assert_eq!(key_line("k", Value::default()).content(), "k");
    }
}
