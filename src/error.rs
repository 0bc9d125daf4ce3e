use thiserror::Error;

/// Result type alias for INI operations
pub type IniResult<T> = Result<T, IniError>;

/// Errors surfaced by the INI document API.
///
/// Parsing itself never fails: lines that do not match the grammar are kept
/// as comments. Only file access, address resolution, writes that could not
/// be rendered back and list reads report errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IniError {
    /// Source could not be read or destination could not be written
    #[error("I/O error for '{path}': {message}")]
    Io { path: String, message: String },

    /// Address is empty, or names a section or key that would not survive
    /// a render and re-parse
    #[error("Invalid address '{address}': expected 'section.key' or 'key'")]
    InvalidAddress { address: String },

    /// A value contains a line break. Values are single-line.
    #[error("Invalid value {value:?}: values cannot contain line breaks")]
    InvalidValue { value: String },

    /// A list read hit an element that is not a number
    #[error("Invalid list element '{element}' in '{value}'")]
    InvalidListElement { value: String, element: String },
}

impl IniError {
    /// Create an I/O error
    pub fn io(path: impl Into<String>, message: impl Into<String>) -> Self {
        IniError::Io {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an invalid address error
    pub fn invalid_address(address: impl Into<String>) -> Self {
        IniError::InvalidAddress {
            address: address.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(value: impl Into<String>) -> Self {
        IniError::InvalidValue {
            value: value.into(),
        }
    }

    /// Create an invalid list element error
    pub fn invalid_list_element(value: impl Into<String>, element: impl Into<String>) -> Self {
        IniError::InvalidListElement {
            value: value.into(),
            element: element.into(),
        }
    }
}

impl From<std::io::Error> for IniError {
    fn from(err: std::io::Error) -> Self {
        IniError::Io {
            path: String::new(),
            message: err.to_string(),
        }
    }
}
