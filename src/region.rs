/// The region type: a span of source text or binary data.
use serde::{Deserialize, Serialize};

/// A span of source text or binary data, addressable three ways: 1-based
/// line/column, 0-based character offset/length, or 0-based byte
/// offset/length. `None` always means "unspecified, to be derived"; a
/// legitimate zero (character offset 0 at file start) is `Some(0)`, so the
/// two are never confused.
///
/// A region is either binary (byte fields only) or textual (line and char
/// fields; byte fields unused). The two kinds never mix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Region {
    /// Length of the binary span in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub byte_length: Option<usize>,
    /// Start of the binary span, 0-based.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub byte_offset: Option<usize>,
    /// Length of the text span in characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub char_length: Option<usize>,
    /// Start of the text span in characters, 0-based.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub char_offset: Option<usize>,
    /// Column one past the last character of the span, 1-based (exclusive).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_column: Option<u32>,
    /// Line containing the end of the span, 1-based.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_line: Option<u32>,
    /// The literal text of the span, when extracted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
    /// Column of the first character of the span, 1-based.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_column: Option<u32>,
    /// Line containing the start of the span, 1-based.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_line: Option<u32>,
}

impl Region {
    /// A textual region addressed purely by character offset and length.
    pub fn from_char_span(char_offset: usize, char_length: usize) -> Self {
        return Self {
            char_length: Some(char_length),
            char_offset: Some(char_offset),
            ..Self::default()
        };
    }

    /// A textual region spanning whole lines, columns unspecified.
    pub fn from_line_span(start_line: u32, end_line: u32) -> Self {
        return Self {
            end_line: Some(end_line),
            start_line: Some(start_line),
            ..Self::default()
        };
    }

    /// A binary region. Byte offset and length are always both specified.
    pub fn from_byte_span(byte_offset: usize, byte_length: usize) -> Self {
        return Self {
            byte_length: Some(byte_length),
            byte_offset: Some(byte_offset),
            ..Self::default()
        };
    }

    /// Whether this is a binary region. Binary regions carry only byte
    /// fields and pass through region resolution unchanged.
    pub fn is_binary(&self) -> bool {
        return self.byte_offset.is_some();
    }
}
