/// Crate-level error types for findbase diagnostics.
use std::path::PathBuf;

/// All errors in findbase carry enough context to produce a useful diagnostic
/// without a debugger. Each variant names the file, field, or bound involved.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A findings log or source file does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// A findings log exists but cannot be decoded.
    #[error("invalid findings log: {}: {reason}", path.display())]
    InvalidLog {
        /// Path to the unreadable log.
        path: PathBuf,
        /// Description of the decode failure.
        reason: String,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// JSON serialization or deserialization failed.
    #[error("json: {0}")]
    Json(
        /// The wrapped JSON error.
        #[from]
        serde_json::Error,
    ),

    /// A 1-based line number outside the indexed file.
    #[error("line {line} out of range (file has {max_line} lines)")]
    LineOutOfRange {
        /// The offending line number.
        line: u32,
        /// Number of lines in the indexed text.
        max_line: u32,
    },

    /// A character offset past one-past-the-end of the file text.
    #[error("offset {offset} out of range (file has {len} characters)")]
    OffsetOutOfRange {
        /// Length of the indexed text in characters.
        len: usize,
        /// The offending character offset.
        offset: usize,
    },

    /// A caller-supplied region field disagrees with the derived value.
    #[error("region mismatch: {field} supplied as {supplied}, derived as {derived}")]
    RegionMismatch {
        /// Value computed from the line index.
        derived: u64,
        /// Name of the disagreeing region field.
        field: &'static str,
        /// Value the caller supplied.
        supplied: u64,
    },

    /// A caller-supplied snippet disagrees with the extracted text.
    #[error("snippet mismatch: supplied {supplied:?}, derived {derived:?}")]
    SnippetMismatch {
        /// Text extracted from the file at the resolved offsets.
        derived: String,
        /// Snippet the caller supplied.
        supplied: String,
    },

    /// TOML deserialization failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),
}
