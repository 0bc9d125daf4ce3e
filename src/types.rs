use crate::error::{IniError, IniResult};
use std::borrow::Cow;
use std::fmt;

/// A single stored value.
///
/// Every value has a canonical text form (see [`Value::as_text`]); typed reads
/// go through that text, so a value written as one type can be read back as
/// another.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Plain text, stored exactly as written or parsed
    Scalar(String),

    /// Numeric list, rendered as `[v1, v2, ...]`
    List(Vec<f64>),
}

impl Value {
    /// Canonical text of the value
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Value::Scalar(s) => Cow::Borrowed(s),
            Value::List(items) => Cow::Owned(format_list(items)),
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    /// Whether the value renders on one line. Lists always do.
    pub fn is_single_line(&self) -> bool {
        match self {
            Value::Scalar(s) => is_single_line(s),
            Value::List(_) => true,
        }
    }

    /// Read the value as `T` under the lenient policy.
    ///
    /// Numeric targets fall back to zero when the text is not a number, and
    /// `bool` falls back to `false`. This never fails.
    pub fn coerce<T: FromValue>(&self) -> T {
        T::from_text_lenient(&self.as_text())
    }

    /// Read the value as a list of numbers.
    ///
    /// Scalars are split on `,` after stripping one pair of enclosing
    /// brackets, so `"[1, 2]"`, `"1, 2"` and `"7"` all read as lists.
    pub fn to_list(&self) -> IniResult<Vec<f64>> {
        match self {
            Value::List(items) => Ok(items.clone()),
            Value::Scalar(s) => parse_list(s),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Scalar(String::new())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.as_text() == other
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.as_text() == *other
    }
}

pub(crate) fn is_single_line(text: &str) -> bool {
    !text.contains(['\n', '\r'])
}

/// Shortest decimal text that parses back to the same `f64`.
pub fn format_number(value: f64) -> String {
    value.to_string()
}

fn format_list(items: &[f64]) -> String {
    let parts: Vec<String> = items.iter().map(|v| format_number(*v)).collect();
    format!("[{}]", parts.join(", "))
}

/// Parse `[a, b, c]` (brackets optional) into numbers.
pub fn parse_list(text: &str) -> IniResult<Vec<f64>> {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(trimmed)
        .trim();

    if body.is_empty() {
        return Ok(Vec::new());
    }

    body.split(',')
        .map(|element| {
            let element = element.trim();
            element
                .parse::<f64>()
                .map_err(|_| IniError::invalid_list_element(text, element))
        })
        .collect()
}

/// Parse a boolean value (true/false/on/off/yes/no/1/0)
pub fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "on" | "yes" | "1" => Some(true),
        "false" | "off" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Conversion from a value's text for typed reads.
pub trait FromValue: Sized {
    /// Convert `text`, returning the type's zero value when it does not fit.
    fn from_text_lenient(text: &str) -> Self;
}

macro_rules! impl_from_value_int {
    ($($t:ty),*) => {
        $(
            impl FromValue for $t {
                fn from_text_lenient(text: &str) -> Self {
                    let text = text.trim();
                    text.parse::<$t>()
                        .ok()
                        // "2.9" reads as 2, like a stream extraction would
                        .or_else(|| {
                            text.parse::<f64>()
                                .ok()
                                .filter(|v| v.is_finite())
                                .map(|v| v as $t)
                        })
                        .unwrap_or_default()
                }
            }
        )*
    };
}

impl_from_value_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl FromValue for f64 {
    fn from_text_lenient(text: &str) -> Self {
        text.trim().parse::<f64>().unwrap_or(0.0)
    }
}

impl FromValue for f32 {
    fn from_text_lenient(text: &str) -> Self {
        text.trim().parse::<f32>().unwrap_or(0.0)
    }
}

impl FromValue for bool {
    fn from_text_lenient(text: &str) -> Self {
        parse_bool(text).unwrap_or(false)
    }
}

impl FromValue for String {
    fn from_text_lenient(text: &str) -> Self {
        text.to_string()
    }
}

macro_rules! impl_value_from_display {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Value::Scalar(v.to_string())
                }
            }
        )*
    };
}

impl_value_from_display!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, bool
);

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Scalar(format_number(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Scalar(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Scalar(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Scalar(v.clone())
    }
}

impl From<Vec<f64>> for Value {
    fn from(v: Vec<f64>) -> Self {
        Value::List(v)
    }
}

impl From<&[f64]> for Value {
    fn from(v: &[f64]) -> Self {
        Value::List(v.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for Value {
    fn from(v: [f64; N]) -> Self {
        Value::List(v.to_vec())
    }
}
