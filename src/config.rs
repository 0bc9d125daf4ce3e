use crate::document::{LineEntry, LineLog};
use crate::error::{IniError, IniResult};
use crate::parser::IniParser;
use crate::store::{Address, Section, SectionStore};
use crate::types::{FromValue, Value};
use std::convert::Infallible;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

/// An INI document: parsed layout plus current values.
///
/// Values are addressed as `"section.key"`, or `"key"` for the global section
/// that precedes the first header. Rendering keeps the source layout and
/// writes edited values in place.
#[derive(Debug, Clone)]
pub struct Ini {
    /// Authoritative values
    store: SectionStore,

    /// Source layout, one entry per physical line
    lines: LineLog,

    /// Rendering options
    options: IniOptions,

    /// Default destination for `save`
    source_path: Option<PathBuf>,

    /// Text passed to the last parse
    source_text: String,
}

/// Rendering options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IniOptions {
    /// Re-emit trailing `# ...` / `; ...` comments of section and key lines.
    /// Off by default, which drops them on render.
    pub preserve_inline_comments: bool,

    /// End rendered output with a newline
    pub trailing_newline: bool,
}

impl Default for IniOptions {
    fn default() -> Self {
        Self {
            preserve_inline_comments: false,
            trailing_newline: true,
        }
    }
}

impl Ini {
    /// Create an empty document with default options
    pub fn new() -> Self {
        Self::with_options(IniOptions::default())
    }

    /// Create an empty document with custom options
    pub fn with_options(options: IniOptions) -> Self {
        Self {
            store: SectionStore::new(),
            lines: LineLog::new(),
            options,
            source_path: None,
            source_text: String::new(),
        }
    }

    /// Parse `input` into a new document. Never fails: malformed lines are
    /// kept as comments.
    pub fn from_text(input: &str) -> Self {
        let mut ini = Self::new();
        ini.parse(input);
        ini
    }

    /// Parse `input` into a new document with custom options
    pub fn parse_with_options(input: &str, options: IniOptions) -> Self {
        let mut ini = Self::with_options(options);
        ini.parse(input);
        ini
    }

    /// Read and parse a file, remembering `path` as the save destination
    pub fn load(path: impl AsRef<Path>) -> IniResult<Self> {
        Self::load_with_options(path, IniOptions::default())
    }

    pub fn load_with_options(path: impl AsRef<Path>, options: IniOptions) -> IniResult<Self> {
        let mut ini = Self::with_options(options);
        ini.parse_file(path)?;
        Ok(ini)
    }

    /// Read and parse a file into this document, replacing its contents
    pub fn parse_file(&mut self, path: impl AsRef<Path>) -> IniResult<()> {
        let path = path.as_ref();
        let content = read_file(path)?;
        info!(path = %path.display(), bytes = content.len(), "loaded ini file");

        self.source_path = Some(path.to_path_buf());
        self.parse(&content);
        Ok(())
    }

    /// Parse a string into this document, replacing its contents.
    ///
    /// Afterwards every section's key count is frozen; keys added later are
    /// placed after the last parsed key of their section on render.
    pub fn parse(&mut self, input: &str) {
        let entries = IniParser::parse_lines(input);
        let mut store = SectionStore::new();

        entries
            .iter()
            .fold(String::new(), |section, entry| absorb(&mut store, section, entry));
        store.freeze_counts();

        debug!(
            lines = entries.len(),
            sections = store.iter().count(),
            keys = store.key_count(),
            "parsed ini text"
        );

        self.store = store;
        self.lines = LineLog::with_entries(entries);
        self.source_text = input.to_string();
    }

    /// Resolve an address to its value, creating the section and key if they
    /// do not exist yet.
    ///
    /// Values stored through the returned reference skip the line break
    /// check done by [`Ini::set`]; any line break in them is written as a
    /// space.
    pub fn get_or_create(&mut self, address: &str) -> IniResult<&mut Value> {
        let address = Address::parse(address)?;
        Ok(self.store.get_or_create(&address))
    }

    /// Look up a value without creating it
    pub fn value(&self, address: &str) -> Option<&Value> {
        let address = Address::parse(address).ok()?;
        self.store.get(&address)
    }

    /// Check if an address resolves to a stored value
    pub fn contains(&self, address: &str) -> bool {
        self.value(address).is_some()
    }

    /// Read a value as `T`.
    ///
    /// Numbers that do not parse read as zero, `bool` reads as `false` unless
    /// the text is a recognized boolean, and missing keys read like empty
    /// text. Only a malformed address is an error.
    pub fn get<T: FromValue>(&self, address: &str) -> IniResult<T> {
        let address = Address::parse(address)?;
        Ok(match self.store.get(&address) {
            Some(value) => value.coerce(),
            None => T::from_text_lenient(""),
        })
    }

    pub fn get_string(&self, address: &str) -> IniResult<String> {
        self.get(address)
    }

    pub fn get_int(&self, address: &str) -> IniResult<i64> {
        self.get(address)
    }

    pub fn get_float(&self, address: &str) -> IniResult<f64> {
        self.get(address)
    }

    pub fn get_bool(&self, address: &str) -> IniResult<bool> {
        self.get(address)
    }

    /// Read a value as a list of numbers. Fails if any element is not a
    /// number; a missing key reads as an empty list.
    pub fn get_list(&self, address: &str) -> IniResult<Vec<f64>> {
        let address = Address::parse(address)?;
        match self.store.get(&address) {
            Some(value) => value.to_list(),
            None => Ok(Vec::new()),
        }
    }

    /// Write a value, creating the section and key if needed.
    ///
    /// Existing keys keep their position in the rendered output. Text with a
    /// line break is rejected and nothing is created.
    pub fn set(&mut self, address: &str, value: impl Into<Value>) -> IniResult<()> {
        let address = Address::parse(address)?;
        let value = value.into();
        if !value.is_single_line() {
            return Err(IniError::invalid_value(value.to_string()));
        }

        self.store.set(&address, value);
        Ok(())
    }

    pub fn set_list(&mut self, address: &str, items: &[f64]) -> IniResult<()> {
        self.set(address, items)
    }

    /// Section names in creation order; the global section is `""`
    pub fn sections(&self) -> Vec<&str> {
        self.store.iter().map(|(name, _)| name).collect()
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.store.section(name)
    }

    /// Keys of a section in insertion order
    pub fn keys(&self, section: &str) -> Vec<&str> {
        self.store
            .section(section)
            .map(|s| s.keys().collect())
            .unwrap_or_default()
    }

    /// Number of keys stored in a section
    pub fn section_len(&self, section: &str) -> usize {
        self.store.section(section).map_or(0, Section::len)
    }

    /// The parsed layout
    pub fn lines(&self) -> &LineLog {
        &self.lines
    }

    pub fn options(&self) -> &IniOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut IniOptions {
        &mut self.options
    }

    /// Path the document was loaded from, if any
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// Text passed to the last parse
    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    /// Serialize the document back to INI text
    pub fn render(&self) -> String {
        self.lines.render(&self.store, &self.options)
    }

    /// Write the document back to the file it was loaded from
    pub fn save(&self) -> IniResult<()> {
        match &self.source_path {
            Some(path) => self.save_as(path),
            None => Err(IniError::io("", "document has no source path to save to")),
        }
    }

    /// Write the document to `path`, replacing any existing content
    pub fn save_as(&self, path: impl AsRef<Path>) -> IniResult<()> {
        let path = path.as_ref();
        let output = self.render();
        write_file(path, &output)?;
        info!(path = %path.display(), bytes = output.len(), "saved ini file");
        Ok(())
    }
}

/// One step of the parse fold: apply `entry` to the store and return the
/// section that is current after it.
fn absorb(store: &mut SectionStore, section: String, entry: &LineEntry) -> String {
    match entry {
        LineEntry::Section { name, .. } => {
            store.ensure_section(name);
            name.clone()
        }
        LineEntry::Key { key, value, .. } => {
            let address = Address {
                section: &section,
                key,
            };
            store.set(&address, value.clone());
            section
        }
        LineEntry::Empty | LineEntry::Comment { .. } => section,
    }
}

fn read_file(path: &Path) -> IniResult<String> {
    let io_err = |e: std::io::Error| IniError::io(path.display().to_string(), e.to_string());

    let mut file = File::open(path).map_err(io_err)?;
    let mut content = String::new();
    file.read_to_string(&mut content).map_err(io_err)?;
    Ok(content)
}

fn write_file(path: &Path, content: &str) -> IniResult<()> {
    let io_err = |e: std::io::Error| IniError::io(path.display().to_string(), e.to_string());

    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(content.as_bytes()).map_err(io_err)?;
    writer.flush().map_err(io_err)
}

impl Default for Ini {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Ini {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl FromStr for Ini {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_text(s))
    }
}
