use crate::document::LineEntry;
use crate::types::{Value, parse_list};
use pest::Parser;
use pest::iterators::Pair;
use pest_derive::Parser;
use tracing::{trace, warn};

#[derive(Parser)]
#[grammar = "ini.pest"]
pub struct IniParser;

impl IniParser {
    /// Classify every line of `input` in source order.
    ///
    /// Both `\n` and `\r\n` line endings are accepted.
    pub fn parse_lines(input: &str) -> Vec<LineEntry> {
        input.lines().map(Self::classify).collect()
    }

    /// Classify a single physical line.
    ///
    /// Leading whitespace is ignored. Lines that are neither a section header
    /// nor a key/value pair come back as [`LineEntry::Comment`] holding the
    /// stripped line unchanged.
    pub fn classify(raw: &str) -> LineEntry {
        let line = raw.trim_start();
        if line.is_empty() {
            return LineEntry::Empty;
        }

        let pairs = match IniParser::parse(Rule::line, line) {
            Ok(pairs) => pairs,
            Err(_) => {
                trace!(line, "no section or key/value match, keeping as comment");
                return Self::comment(line);
            }
        };

        for pair in pairs.flatten() {
            match pair.as_rule() {
                Rule::section => return Self::section_entry(pair),
                Rule::pair => return Self::key_entry(pair, line),
                _ => {}
            }
        }

        Self::comment(line)
    }

    fn comment(line: &str) -> LineEntry {
        LineEntry::Comment {
            text: line.to_string(),
        }
    }

    fn section_entry(pair: Pair<Rule>) -> LineEntry {
        let mut name = String::new();
        let mut inline_comment = None;

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::section_name => name = inner.as_str().to_string(),
                Rule::inline_comment => inline_comment = Some(inner.as_str().to_string()),
                _ => {}
            }
        }

        LineEntry::Section {
            name,
            inline_comment,
        }
    }

    fn key_entry(pair: Pair<Rule>, line: &str) -> LineEntry {
        let mut key = String::new();
        let mut value = Value::default();
        let mut inline_comment = None;

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::quoted_key | Rule::quoted_value => {
                    let text = strip_quotes(inner.as_str()).to_string();
                    if inner.as_rule() == Rule::quoted_key {
                        key = text;
                    } else {
                        value = Value::Scalar(text);
                    }
                }
                Rule::bare_key => key = inner.as_str().to_string(),
                Rule::bare_value => {
                    let text = inner.as_str();
                    if text.starts_with('[') && text.ends_with(']') {
                        match parse_list(text) {
                            Ok(items) => value = Value::List(items),
                            Err(err) => {
                                warn!(line, %err, "malformed list value, keeping line as comment");
                                return Self::comment(line);
                            }
                        }
                    } else {
                        value = Value::Scalar(text.to_string());
                    }
                }
                Rule::inline_comment => inline_comment = Some(inner.as_str().to_string()),
                _ => {}
            }
        }

        LineEntry::Key {
            key,
            value,
            inline_comment,
        }
    }
}

fn strip_quotes(s: &str) -> &str {
    s.strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(s)
}
