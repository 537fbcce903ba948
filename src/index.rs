//! Line index: a one-time table of line-start offsets for one file's text.

use crate::error::Error;

/// Start of one line, recorded in both addressing schemes so that character
/// offsets can be mapped back to byte offsets without rescanning the file.
#[derive(Debug, Clone, Copy)]
struct LineStart {
    byte_offset: usize,
    char_offset: usize,
}

/// Immutable index of line starts. Built once per file text with a single
/// linear scan; never mutated afterwards, so instances are freely shared
/// across threads. Line terminators are `\n`, `\r\n` (one terminator, two
/// characters), and bare `\r`.
#[derive(Debug)]
pub struct LineIndex {
    /// Line `n` (1-based) starts at `starts[n - 1]`. Never empty: even empty
    /// text has line 1 starting at offset 0.
    starts: Vec<LineStart>,
    total_bytes: usize,
    total_chars: usize,
}

impl LineIndex {
    /// Build the index from full file text. O(n) in the text length.
    pub fn build(text: &str) -> Self {
        let mut starts = vec![LineStart { byte_offset: 0, char_offset: 0 }];
        let mut char_offset = 0_usize;
        let mut chars = text.char_indices().peekable();

        while let Some((byte_idx, ch)) = chars.next() {
            char_offset = char_offset.saturating_add(1);
            match ch {
                '\n' => starts.push(LineStart {
                    byte_offset: byte_idx.saturating_add(1),
                    char_offset,
                }),
                '\r' => {
                    // \r\n is a single two-character terminator.
                    if let Some(&(next_byte, '\n')) = chars.peek() {
                        chars.next();
                        char_offset = char_offset.saturating_add(1);
                        starts.push(LineStart {
                            byte_offset: next_byte.saturating_add(1),
                            char_offset,
                        });
                    } else {
                        starts.push(LineStart {
                            byte_offset: byte_idx.saturating_add(1),
                            char_offset,
                        });
                    }
                },
                _ => {},
            }
        }

        return Self {
            starts,
            total_bytes: text.len(),
            total_chars: char_offset,
        };
    }

    /// Number of lines in the indexed text, 1-based. Empty text has one line.
    pub fn max_line(&self) -> u32 {
        return u32::try_from(self.starts.len()).unwrap_or(u32::MAX);
    }

    /// Length of the indexed text in characters.
    pub fn char_len(&self) -> usize {
        return self.total_chars;
    }

    /// Character offset at which `line` (1-based) starts.
    ///
    /// # Errors
    ///
    /// Returns `Error::LineOutOfRange` if `line` is 0 or past the last line.
    pub fn line_start(&self, line: u32) -> Result<usize, Error> {
        return Ok(self.line_entry(line)?.char_offset);
    }

    /// Locate a character offset as a 1-based `(line, column)` pair. The
    /// offset one past the end of the text is valid and locates on the last
    /// line, which makes exclusive end columns derivable.
    ///
    /// # Errors
    ///
    /// Returns `Error::OffsetOutOfRange` if `char_offset > char_len()`.
    pub fn locate(&self, char_offset: usize) -> Result<(u32, u32), Error> {
        if char_offset > self.total_chars {
            return Err(Error::OffsetOutOfRange {
                len: self.total_chars,
                offset: char_offset,
            });
        }

        let idx = self
            .starts
            .partition_point(|s| s.char_offset <= char_offset)
            .saturating_sub(1);
        let line = u32::try_from(idx.saturating_add(1)).unwrap_or(u32::MAX);
        let column = char_offset
            .saturating_sub(self.starts[idx].char_offset)
            .saturating_add(1);
        return Ok((line, u32::try_from(column).unwrap_or(u32::MAX)));
    }

    /// Number of characters on `line` before its terminator (or end of text).
    ///
    /// # Errors
    ///
    /// Returns `Error::LineOutOfRange` if `line` is 0 or past the last line.
    pub fn line_text_len(&self, text: &str, line: u32) -> Result<usize, Error> {
        let start = self.line_entry(line)?.byte_offset;
        let mut len = 0_usize;
        for ch in text[start..].chars() {
            if ch == '\n' || ch == '\r' {
                break;
            }
            len = len.saturating_add(1);
        }
        return Ok(len);
    }

    /// Extract the substring covering `char_length` characters starting at
    /// `char_offset`. `text` must be the text this index was built from.
    ///
    /// # Errors
    ///
    /// Returns `Error::OffsetOutOfRange` if the span exceeds the text.
    pub fn slice<'t>(
        &self,
        text: &'t str,
        char_offset: usize,
        char_length: usize,
    ) -> Result<&'t str, Error> {
        let start = self.byte_of_char(text, char_offset)?;
        let end = self.byte_of_char(text, char_offset.saturating_add(char_length))?;
        return Ok(&text[start..end]);
    }

    /// Map a character offset to the corresponding byte offset. Walks at most
    /// one line from the nearest recorded line start.
    ///
    /// # Errors
    ///
    /// Returns `Error::OffsetOutOfRange` if `char_offset > char_len()`.
    pub fn byte_of_char(&self, text: &str, char_offset: usize) -> Result<usize, Error> {
        if char_offset > self.total_chars {
            return Err(Error::OffsetOutOfRange {
                len: self.total_chars,
                offset: char_offset,
            });
        }
        if char_offset == self.total_chars {
            return Ok(self.total_bytes);
        }

        let idx = self
            .starts
            .partition_point(|s| s.char_offset <= char_offset)
            .saturating_sub(1);
        let start = self.starts[idx];
        let step = char_offset.saturating_sub(start.char_offset);
        match text[start.byte_offset..].char_indices().nth(step) {
            Some((rel_byte, _)) => Ok(start.byte_offset.saturating_add(rel_byte)),
            None => Err(Error::OffsetOutOfRange {
                len: self.total_chars,
                offset: char_offset,
            }),
        }
    }

    fn line_entry(&self, line: u32) -> Result<LineStart, Error> {
        let idx = usize::try_from(line).unwrap_or(0).checked_sub(1);
        return match idx.and_then(|i| self.starts.get(i)) {
            Some(entry) => Ok(*entry),
            None => Err(Error::LineOutOfRange {
                line,
                max_line: self.max_line(),
            }),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::LineIndex;
    use crate::error::Error;

    const TEXT: &str = "line1\nline2\nline3\n";

    #[test]
    fn counts_lines_including_trailing_empty_line() {
        let index = LineIndex::build(TEXT);
        assert_eq!(index.max_line(), 4);
        assert_eq!(index.line_start(1).unwrap(), 0);
        assert_eq!(index.line_start(2).unwrap(), 6);
        assert_eq!(index.line_start(4).unwrap(), 18);
    }

    #[test]
    fn locate_maps_offsets_to_line_and_column() {
        let index = LineIndex::build(TEXT);
        assert_eq!(index.locate(0).unwrap(), (1, 1));
        assert_eq!(index.locate(6).unwrap(), (2, 1));
        assert_eq!(index.locate(11).unwrap(), (2, 6));
        // One past the end locates on the final (empty) line.
        assert_eq!(index.locate(18).unwrap(), (4, 1));
    }

    #[test]
    fn locate_past_end_is_out_of_range() {
        let index = LineIndex::build(TEXT);
        assert!(matches!(
            index.locate(19),
            Err(Error::OffsetOutOfRange { offset: 19, len: 18 })
        ));
    }

    #[test]
    fn line_zero_and_past_last_are_out_of_range() {
        let index = LineIndex::build(TEXT);
        assert!(matches!(index.line_start(0), Err(Error::LineOutOfRange { .. })));
        assert!(matches!(index.line_start(5), Err(Error::LineOutOfRange { .. })));
    }

    #[test]
    fn locate_round_trips_through_line_start() {
        let index = LineIndex::build(TEXT);
        for offset in 0..=TEXT.len() {
            let (line, column) = index.locate(offset).unwrap();
            let rebuilt = index.line_start(line).unwrap()
                + usize::try_from(column).unwrap()
                - 1;
            assert_eq!(rebuilt, offset, "round trip failed at offset {offset}");
        }
    }

    #[test]
    fn crlf_counts_as_one_terminator() {
        let index = LineIndex::build("ab\r\ncd\r\n");
        assert_eq!(index.max_line(), 3);
        assert_eq!(index.line_start(2).unwrap(), 4);
        assert_eq!(index.locate(4).unwrap(), (2, 1));
        // The \r itself still belongs to line 1.
        assert_eq!(index.locate(2).unwrap(), (1, 3));
    }

    #[test]
    fn bare_carriage_return_terminates_a_line() {
        let index = LineIndex::build("ab\rcd");
        assert_eq!(index.max_line(), 2);
        assert_eq!(index.line_start(2).unwrap(), 3);
    }

    #[test]
    fn empty_text_has_one_line() {
        let index = LineIndex::build("");
        assert_eq!(index.max_line(), 1);
        assert_eq!(index.locate(0).unwrap(), (1, 1));
        assert_eq!(index.char_len(), 0);
    }

    #[test]
    fn line_text_len_excludes_terminator() {
        let index = LineIndex::build(TEXT);
        assert_eq!(index.line_text_len(TEXT, 2).unwrap(), 5);
        assert_eq!(index.line_text_len(TEXT, 4).unwrap(), 0);
    }

    #[test]
    fn slice_extracts_by_character_offsets() {
        let index = LineIndex::build(TEXT);
        assert_eq!(index.slice(TEXT, 6, 5).unwrap(), "line2");
        assert_eq!(index.slice(TEXT, 0, 0).unwrap(), "");
    }

    #[test]
    fn multibyte_characters_count_as_one() {
        let text = "héllo\nwörld\n";
        let index = LineIndex::build(text);
        assert_eq!(index.char_len(), 12);
        assert_eq!(index.line_start(2).unwrap(), 6);
        assert_eq!(index.locate(7).unwrap(), (2, 2));
        assert_eq!(index.slice(text, 6, 5).unwrap(), "wörld");
        assert_eq!(index.byte_of_char(text, 6).unwrap(), 7);
    }
}
