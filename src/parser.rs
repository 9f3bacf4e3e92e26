//! Extraction of a [`Record`] from a raw command line such as `i 10 aap`.
//!
//! The line is scanned once, left to right, with a byte cursor. Every field is
//! checked before anything is built, so a failed parse never leaves a
//! half-constructed record behind.

use crate::record::{LABEL_CAPACITY, Label, LabelError, Record};
use std::num::IntErrorKind;
use thiserror::Error;

/// Reasons a command line does not contain a valid record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Nothing follows the command letter.
    #[error("missing key")]
    MissingKey,
    /// The key token is not a decimal integer.
    #[error("key is not a number: {0:?}")]
    InvalidKey(String),
    /// The key does not fit into a signed 32-bit integer.
    #[error("key out of range: {0}")]
    KeyOutOfRange(String),
    /// Nothing follows the key.
    #[error("missing label")]
    MissingLabel,
    /// The label token does not fit into the label storage.
    #[error("label is {len} bytes long, at most {max} allowed", max = LABEL_CAPACITY - 1)]
    LabelTooLong { len: usize },
    /// Something follows the label.
    #[error("unexpected input after label: {0:?}")]
    TrailingInput(String),
}

impl From<LabelError> for ParseError {
    fn from(err: LabelError) -> Self {
        match err {
            LabelError::TooLong { len } => ParseError::LabelTooLong { len },
            LabelError::Empty | LabelError::Whitespace => ParseError::MissingLabel,
        }
    }
}

/// Cursor over the command line.
struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Scanner { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    /// Consume the maximal run of non-whitespace characters.
    fn token(&mut self) -> Option<&'a str> {
        self.skip_whitespace();
        let rest = self.rest();
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        if end == 0 {
            return None;
        }
        self.pos += end;
        Some(&rest[..end])
    }
}

fn parse_key(token: &str) -> Result<i32, ParseError> {
    let digits = token.strip_prefix(['+', '-']).unwrap_or(token);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseError::InvalidKey(token.to_owned()));
    }
    token.parse::<i32>().map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            ParseError::KeyOutOfRange(token.to_owned())
        }
        _ => ParseError::InvalidKey(token.to_owned()),
    })
}

/// Parse `<command> <key> <label>` into a record.
///
/// Leading whitespace and the command token are skipped. The key is a
/// decimal `i32` with an optional sign; the label is the next
/// whitespace-delimited token and must fit into [`LABEL_CAPACITY`] - 1 bytes.
/// Anything after the label other than whitespace is rejected.
pub fn parse_record(line: &str) -> Result<Record, ParseError> {
    let mut scanner = Scanner::new(line);
    let _command = scanner.token();

    let key = parse_key(scanner.token().ok_or(ParseError::MissingKey)?)?;
    let label = scanner.token().ok_or(ParseError::MissingLabel)?;
    if label.len() > LABEL_CAPACITY - 1 {
        return Err(ParseError::LabelTooLong { len: label.len() });
    }

    if let Some(extra) = scanner.token() {
        return Err(ParseError::TrailingInput(extra.to_owned()));
    }

    Ok(Record::new(key, Label::new(label)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_insert_line() {
        let r = parse_record("i 10 aap").unwrap();
        assert_eq!(r.key(), 10);
        assert_eq!(r.label().as_str(), "aap");
    }

    #[test]
    fn test_skips_surrounding_whitespace() {
        let r = parse_record("  c\t 42   noot  ").unwrap();
        assert_eq!(r, Record::try_new(42, "noot").unwrap());
    }

    #[test]
    fn test_long_command_word_is_skipped() {
        let r = parse_record("insert 7 mies").unwrap();
        assert_eq!(r.key(), 7);
    }

    #[test]
    fn test_signed_keys() {
        assert_eq!(parse_record("i -3 a").unwrap().key(), -3);
        assert_eq!(parse_record("i +3 a").unwrap().key(), 3);
        assert_eq!(parse_record("i 0 a").unwrap().key(), 0);
        assert_eq!(parse_record("i -2147483648 a").unwrap().key(), i32::MIN);
        assert_eq!(parse_record("i 2147483647 a").unwrap().key(), i32::MAX);
    }

    #[test]
    fn test_non_numeric_key_fails() {
        assert_eq!(
            parse_record("i abc x"),
            Err(ParseError::InvalidKey("abc".to_string()))
        );
        assert!(matches!(parse_record("i 12ab x"), Err(ParseError::InvalidKey(_))));
        assert!(matches!(parse_record("i - x"), Err(ParseError::InvalidKey(_))));
        assert!(matches!(parse_record("i 0x10 x"), Err(ParseError::InvalidKey(_))));
    }

    #[test]
    fn test_key_out_of_range_fails() {
        assert_eq!(
            parse_record("i 2147483648 a"),
            Err(ParseError::KeyOutOfRange("2147483648".to_string()))
        );
        assert!(matches!(
            parse_record("i -99999999999999999999 a"),
            Err(ParseError::KeyOutOfRange(_))
        ));
    }

    #[test]
    fn test_missing_fields() {
        assert_eq!(parse_record("i"), Err(ParseError::MissingKey));
        assert_eq!(parse_record(""), Err(ParseError::MissingKey));
        assert_eq!(parse_record("i 10"), Err(ParseError::MissingLabel));
        assert_eq!(parse_record("i 10   "), Err(ParseError::MissingLabel));
    }

    #[test]
    fn test_label_longer_than_capacity_fails() {
        let label = "n".repeat(LABEL_CAPACITY);
        assert_eq!(
            parse_record(&format!("i 1 {label}")),
            Err(ParseError::LabelTooLong { len: LABEL_CAPACITY })
        );

        let huge = "n".repeat(10_000);
        assert!(matches!(
            parse_record(&format!("i 1 {huge}")),
            Err(ParseError::LabelTooLong { .. })
        ));
    }

    #[test]
    fn test_label_at_capacity_limit_is_accepted() {
        let label = "n".repeat(LABEL_CAPACITY - 1);
        let r = parse_record(&format!("i 1 {label}")).unwrap();
        assert_eq!(r.label().as_str(), label);
    }

    #[test]
    fn test_trailing_input_fails() {
        assert_eq!(
            parse_record("i 1 a b"),
            Err(ParseError::TrailingInput("b".to_string()))
        );
    }

    #[test]
    fn test_multibyte_label_counts_bytes() {
        // 10 two-byte characters = 20 bytes, one over the limit
        let label = "é".repeat(10);
        assert_eq!(
            parse_record(&format!("i 1 {label}")),
            Err(ParseError::LabelTooLong { len: 20 })
        );
        assert!(parse_record(&format!("i 1 {}", "é".repeat(9))).is_ok());
    }
}
