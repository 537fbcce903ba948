//! Region field population: derive every text-addressing field of a
//! partially-specified region from a line index.
//!
//! Fields the caller supplied are ground truth. They are validated against
//! the derived values, never overwritten; how a disagreement surfaces is
//! controlled by [`Strictness`].

use serde::Deserialize;

use crate::error::Error;
use crate::index::LineIndex;
use crate::region::Region;

/// How supplied-versus-derived disagreements are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strictness {
    /// Keep the caller-supplied value and log a warning.
    Permissive,
    /// Surface the disagreement as `Error::RegionMismatch`.
    #[default]
    Strict,
}

/// Populates regions against a line index. Stateless apart from the
/// configured strictness; safe to share across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegionResolver {
    strictness: Strictness,
}

impl RegionResolver {
    /// A resolver with the given strictness.
    pub fn new(strictness: Strictness) -> Self {
        return Self { strictness };
    }

    /// Derive all text-addressing fields of `region`, returning a populated
    /// copy. The input is never mutated. Binary regions pass through
    /// unchanged: only their byte fields are meaningful and those are
    /// always specified by the producer.
    ///
    /// A region without `start_line` is offset-addressed: line and column
    /// fields derive from `char_offset`/`char_length` (absent ones read as
    /// 0, the file start). Otherwise it is line-addressed and the remaining
    /// fields derive in the fixed stage order end line, start column, end
    /// column, char offset, char length — each stage may consume fields the
    /// previous stages populated.
    ///
    /// With `populate_snippet` set and the final offsets within bounds, the
    /// snippet substring is extracted; a snippet already on the region is
    /// validated for equality instead of being replaced.
    ///
    /// # Errors
    ///
    /// Returns `Error::LineOutOfRange`/`Error::OffsetOutOfRange` when
    /// supplied fields point outside the file, and `Error::RegionMismatch`/
    /// `Error::SnippetMismatch` under strict mode when a supplied field
    /// disagrees with the derived value.
    pub fn populate(
        &self,
        region: &Region,
        index: &LineIndex,
        text: &str,
        populate_snippet: bool,
    ) -> Result<Region, Error> {
        if region.is_binary() {
            return Ok(region.clone());
        }

        let mut derived = region.clone();
        match region.start_line {
            None => self.populate_from_char_span(&mut derived, index)?,
            Some(start_line) => {
                self.populate_from_line_span(&mut derived, start_line, index, text)?;
            },
        }

        if populate_snippet {
            self.populate_snippet(&mut derived, index, text)?;
        }

        return Ok(derived);
    }

    /// Offset-addressed path: all four line/column fields derive from the
    /// character span. The end is exclusive, so a single-line span has
    /// `end_column - start_column == char_length`.
    fn populate_from_char_span(
        &self,
        region: &mut Region,
        index: &LineIndex,
    ) -> Result<(), Error> {
        let char_offset = region.char_offset.unwrap_or(0);
        let char_length = region.char_length.unwrap_or(0);

        let (start_line, start_column) = index.locate(char_offset)?;
        let (end_line, end_column) = index.locate(char_offset.saturating_add(char_length))?;

        region.char_offset = Some(char_offset);
        region.char_length = Some(char_length);
        self.reconcile_u32(&mut region.start_line, start_line, "startLine")?;
        self.reconcile_u32(&mut region.start_column, start_column, "startColumn")?;
        self.reconcile_u32(&mut region.end_line, end_line, "endLine")?;
        self.reconcile_u32(&mut region.end_column, end_column, "endColumn")?;
        return Ok(());
    }

    /// Line-addressed path. Stage order matters: each stage assumes the
    /// fields of every previous stage are populated.
    fn populate_from_line_span(
        &self,
        region: &mut Region,
        start_line: u32,
        index: &LineIndex,
        text: &str,
    ) -> Result<(), Error> {
        // End line defaults to a single-line region.
        let end_line = region.end_line.unwrap_or(start_line);
        region.end_line = Some(end_line);

        // Start column defaults to the first character of the line.
        let start_column = region.start_column.unwrap_or(1);
        region.start_column = Some(start_column);

        // End column defaults to one past the last character of the end
        // line, excluding its terminator. End columns are 1-based exclusive.
        let end_column = match region.end_column {
            Some(supplied) => supplied,
            None => {
                let width = index.line_text_len(text, end_line)?;
                let column = width.saturating_add(1);
                let column = u32::try_from(column).unwrap_or(u32::MAX);
                region.end_column = Some(column);
                column
            },
        };

        // Char offset from the start line's start plus the column.
        let start_column_offset = usize::try_from(start_column).unwrap_or(0).saturating_sub(1);
        let derived_offset = index.line_start(start_line)?.saturating_add(start_column_offset);
        self.reconcile_usize(&mut region.char_offset, derived_offset, "charOffset")?;
        let char_offset = region.char_offset.unwrap_or(derived_offset);

        // Char length spans up to the exclusive end column on the end line.
        let end_column_offset = usize::try_from(end_column).unwrap_or(0).saturating_sub(1);
        let derived_length = index
            .line_start(end_line)?
            .saturating_add(end_column_offset)
            .saturating_sub(char_offset);
        self.reconcile_usize(&mut region.char_length, derived_length, "charLength")?;
        return Ok(());
    }

    fn populate_snippet(
        &self,
        region: &mut Region,
        index: &LineIndex,
        text: &str,
    ) -> Result<(), Error> {
        let (Some(char_offset), Some(char_length)) = (region.char_offset, region.char_length)
        else {
            return Ok(());
        };
        if char_offset.saturating_add(char_length) > index.char_len() {
            return Ok(());
        }

        let extracted = index.slice(text, char_offset, char_length)?;
        match &region.snippet {
            None => region.snippet = Some(extracted.to_string()),
            Some(supplied) if supplied == extracted => {},
            Some(supplied) => match self.strictness {
                Strictness::Strict => {
                    return Err(Error::SnippetMismatch {
                        derived: extracted.to_string(),
                        supplied: supplied.clone(),
                    });
                },
                Strictness::Permissive => {
                    tracing::warn!(
                        "supplied snippet disagrees with extracted text, keeping supplied value"
                    );
                },
            },
        }
        return Ok(());
    }

    fn reconcile_u32(
        &self,
        slot: &mut Option<u32>,
        derived: u32,
        field: &'static str,
    ) -> Result<(), Error> {
        return match *slot {
            None => {
                *slot = Some(derived);
                Ok(())
            },
            Some(supplied) if supplied == derived => Ok(()),
            Some(supplied) => self.mismatch(field, u64::from(supplied), u64::from(derived)),
        };
    }

    fn reconcile_usize(
        &self,
        slot: &mut Option<usize>,
        derived: usize,
        field: &'static str,
    ) -> Result<(), Error> {
        return match *slot {
            None => {
                *slot = Some(derived);
                Ok(())
            },
            Some(supplied) if supplied == derived => Ok(()),
            Some(supplied) => self.mismatch(
                field,
                u64::try_from(supplied).unwrap_or(u64::MAX),
                u64::try_from(derived).unwrap_or(u64::MAX),
            ),
        };
    }

    /// A supplied field disagrees with its derived value. Strict mode
    /// surfaces it; permissive mode keeps the supplied value.
    fn mismatch(&self, field: &'static str, supplied: u64, derived: u64) -> Result<(), Error> {
        return match self.strictness {
            Strictness::Strict => Err(Error::RegionMismatch { derived, field, supplied }),
            Strictness::Permissive => {
                tracing::warn!(
                    "region field {field} supplied as {supplied}, derived as {derived}; keeping supplied value"
                );
                Ok(())
            },
        };
    }
}
