//! Context snippet synthesis: widen a region for display without ever
//! shrinking it.

use crate::error::Error;
use crate::index::LineIndex;
use crate::region::Region;
use crate::resolver::RegionResolver;

/// A span at least this long is its own context and is never widened.
pub const BIG_SNIPPET_CHARS: usize = 512;

/// Padding used on each side by the fixed-width fallback window.
pub const SMALL_SNIPPET_CHARS: usize = 128;

/// Builds single-line and expanding multi-line context snippets around a
/// region. Stateless apart from the resolver it populates regions with.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnippetBuilder {
    resolver: RegionResolver,
}

impl SnippetBuilder {
    /// A builder resolving regions with the given resolver.
    pub fn new(resolver: RegionResolver) -> Self {
        return Self { resolver };
    }

    /// Synthesize a context region around `region`, snippet populated.
    /// Binary regions have no textual context and return `None`.
    ///
    /// Widening strategy, in order: a span of `BIG_SNIPPET_CHARS` or more is
    /// returned as-is; otherwise the span widens by one line in each
    /// direction (clamped to the file) provided that stays within
    /// `BIG_SNIPPET_CHARS`; otherwise a fixed character window of up to
    /// `BIG_SNIPPET_CHARS` starting `SMALL_SNIPPET_CHARS` before the span is
    /// used. The result is never shorter than the fully-resolved input span.
    ///
    /// # Errors
    ///
    /// Returns resolution errors from the underlying populate calls.
    pub fn context_snippet(
        &self,
        region: &Region,
        text: &str,
        index: &LineIndex,
    ) -> Result<Option<Region>, Error> {
        if region.is_binary() {
            return Ok(None);
        }

        let original = self.resolver.populate(region, index, text, true)?;
        let original_length = original.char_length.unwrap_or(0);
        if original_length >= BIG_SNIPPET_CHARS {
            return Ok(Some(original));
        }

        let start_line = original.start_line.unwrap_or(1);
        let end_line = original.end_line.unwrap_or(start_line);
        let widened_span = Region::from_line_span(
            start_line.saturating_sub(1).max(1),
            end_line.saturating_add(1).min(index.max_line()),
        );
        let widened = self.resolver.populate(&widened_span, index, text, true)?;
        let widened_length = widened.char_length.unwrap_or(0);
        if widened_length >= original_length && widened_length <= BIG_SNIPPET_CHARS {
            return Ok(Some(widened));
        }

        // The line-widened span overshot; fall back to a character window
        // around the original span, resolved through the offset path.
        let offset = original
            .char_offset
            .unwrap_or(0)
            .saturating_sub(SMALL_SNIPPET_CHARS);
        let length = BIG_SNIPPET_CHARS.min(index.char_len().saturating_sub(offset));
        let window = self
            .resolver
            .populate(&Region::from_char_span(offset, length), index, text, true)?;
        return Ok(Some(window));
    }
}
