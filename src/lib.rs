//! # iniparser
//!
//! Read, edit and rewrite INI files without losing their layout.
//!
//! A parsed [`Ini`] keeps two views of the source: an ordered log of every
//! line (comments, blank lines, headers, pairs) and a keyed store of current
//! values. Reads and writes go to the store; rendering walks the log and pulls
//! current values from the store, so comments, blank lines and ordering
//! survive an edit.
//!
//! ## Features
//!
//! - **Sections and a global section**: keys before the first `[header]` live
//!   in the section named `""`
//! - **Compact addressing**: `"section.key"`, or `"key"` for the global section
//! - **Typed reads and writes**: integers, floats, booleans, strings and
//!   numeric lists through one [`Value`] type
//! - **Lenient coercion**: reading text that is not a number as a number gives
//!   zero instead of an error
//! - **Quoting**: `"..."` around keys or values allows `=`, `#`, `;` and
//!   surrounding whitespace
//! - **Order-preserving output**: new keys land after the last parsed key of
//!   their section, new sections are appended at the end
//!
//! ## Example
//!
//! ```rust
//! use iniparser::Ini;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut ini = Ini::from_text(r#"key1 = 2.3
//! [section1]
//! key1 = -30.2
//! key2 = 100
//! key3 = text value
//! [section2]
//! key2 = [2, -3.2, 4.5]
//! "#);
//!
//! assert_eq!(ini.get::<f64>("key1")?, 2.3);
//! assert_eq!(ini.get::<i32>("section1.key2")?, 100);
//! assert_eq!(ini.get_string("section1.key3")?, "text value");
//! assert_eq!(ini.get_list("section2.key2")?, vec![2.0, -3.2, 4.5]);
//!
//! ini.set("section1.key1", 24)?;
//! ini.set("section1.added", true)?;
//!
//! assert!(ini.render().contains("key1 = 24\nkey2 = 100\nkey3 = text value\nadded = true\n"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Files
//!
//! ```rust,no_run
//! use iniparser::Ini;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut ini = Ini::load("settings.ini")?;
//! ini.set("window.width", 1280)?;
//! ini.save()?;
//! # Ok(())
//! # }
//! ```

// Module declarations
mod config;
mod document;
mod error;
mod parser;
mod store;
mod types;

// Public API exports
pub use config::{Ini, IniOptions};
pub use document::{LineEntry, LineKind, LineLog, format_pair};
pub use error::{IniError, IniResult};
pub use parser::IniParser;
pub use store::{Address, Section, SectionStore};
pub use types::{FromValue, Value, format_number, parse_bool, parse_list};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
