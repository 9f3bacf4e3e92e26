use std::fmt;
use thiserror::Error;

/// Size of the label storage of a record, terminator included.
///
/// A label therefore holds at most `LABEL_CAPACITY - 1` bytes.
pub const LABEL_CAPACITY: usize = 20;

/// Errors produced when building a [`Label`] from untrusted text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelError {
    /// The label has no characters at all.
    #[error("label is empty")]
    Empty,
    /// The label does not fit into [`LABEL_CAPACITY`] - 1 bytes.
    #[error("label is {len} bytes long, at most {max} allowed", max = LABEL_CAPACITY - 1)]
    TooLong { len: usize },
    /// The label contains whitespace, so it could never be read back as one token.
    #[error("label contains whitespace")]
    Whitespace,
}

/// A bounded, non-empty, whitespace-free string.
///
/// The only way to get one is [`Label::new`], which refuses anything that
/// would not fit into the fixed label storage. Labels are never truncated.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Label(String);

impl Label {
    /// Validate `text` and copy it into a new label.
    pub fn new(text: &str) -> Result<Self, LabelError> {
        if text.is_empty() {
            return Err(LabelError::Empty);
        }
        if text.len() > LABEL_CAPACITY - 1 {
            return Err(LabelError::TooLong { len: text.len() });
        }
        if text.chars().any(char::is_whitespace) {
            return Err(LabelError::Whitespace);
        }
        Ok(Self(text.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The value stored in the sorted container: an ordering key plus a label.
///
/// Records order by key first and by label bytes second (the derived `Ord`
/// follows field order). Two records are equivalent when they compare equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Record {
    key: i32,
    label: Label,
}

impl Record {
    pub fn new(key: i32, label: Label) -> Self {
        Self { key, label }
    }

    /// Convenience constructor that validates the label in one go.
    pub fn try_new(key: i32, label: &str) -> Result<Self, LabelError> {
        Ok(Self::new(key, Label::new(label)?))
    }

    pub fn key(&self) -> i32 {
        self.key
    }

    pub fn label(&self) -> &Label {
        &self.label
    }
}

impl fmt::Display for Record {
    /// Renders `<key> <label>`, the same shape the `i`/`e`/`c` commands accept.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.key, self.label)
    }
}
