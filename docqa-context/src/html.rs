//! Heading-based chunking of HTML documents.
//!
//! A document's markup is turned into an ordered list of plain-text segments
//! that can be embedded one by one. The procedure is intentionally simple and
//! fully deterministic, because chunk text is never stored in the index: it is
//! recomputed from the source document whenever a chunk is needed, and the
//! ordinal of a chunk must therefore mean the same thing at index time and at
//! query time.
//!
//! The steps are:
//!
//! 1.  Newlines are replaced with spaces so that no pattern has to cross lines.
//! 2.  `<script>…</script>` blocks are removed (non-greedy, case-insensitive).
//! 3.  The markup is split on heading boundaries. A boundary is an opening
//!     heading tag (`<h1>` … `<h9>`, any case, any attributes) together with the
//!     heading's inline text up to the next tag. `N` boundaries always produce
//!     `N + 1` segments; whatever precedes the first heading is its own segment.
//! 4.  Every remaining tag in a segment is replaced with a single space.
//!     Surrounding whitespace is kept as is.
//!
//! # Example
//!
//! ```
//! use docqa_context::chunk_html;
//!
//! let chunks = chunk_html("<h1>Intro</h1>hello world");
//! assert_eq!(chunks, vec!["".to_string(), " hello world".to_string()]);
//!
//! let chunks = chunk_html("no headings here");
//! assert_eq!(chunks, vec!["no headings here".to_string()]);
//! ```

use regex::Regex;
use std::sync::LazyLock;

/// Matches any single tag, opening or closing.
pub const TAG_PATTERN: &str = r"<[^>]*>";

/// Matches an opening heading tag plus the inline heading text that follows it.
pub const HEADING_PATTERN: &str = r"(?i)<h[1-9][^>]*>[^<]*";

/// Matches a whole script block, contents included.
pub const SCRIPT_PATTERN: &str = r"(?i)<script[^>]*>.*?</script>";

static DEFAULT_CHUNKER: LazyLock<HtmlChunker> = LazyLock::new(HtmlChunker::new);

/// Splits HTML into heading-delimited plain-text chunks.
///
/// Holds the compiled patterns so that repeated chunking (the retriever
/// re-chunks documents on every query) does not recompile them.
#[derive(Debug, Clone)]
pub struct HtmlChunker {
    tag: Regex,
    heading: Regex,
    script: Regex,
}

impl Default for HtmlChunker {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlChunker {
    pub fn new() -> Self {
        // The patterns are constants, a failure here is a programming error.
        Self {
            tag: Regex::new(TAG_PATTERN).unwrap(),
            heading: Regex::new(HEADING_PATTERN).unwrap(),
            script: Regex::new(SCRIPT_PATTERN).unwrap(),
        }
    }

    /// Returns the ordered chunks of `html`.
    ///
    /// Never returns an empty vector: an empty document yields one empty chunk
    /// and a document without headings yields its whole stripped body.
    pub fn chunks(&self, html: &str) -> Vec<String> {
        let flattened = html.replace('\n', " ");
        let without_scripts = self.script.replace_all(&flattened, " ");

        self.heading
            .split(&without_scripts)
            .map(|segment| self.tag.replace_all(segment, " ").into_owned())
            .collect()
    }

    /// Number of heading boundaries in `html`, i.e. `chunks(html).len() - 1`.
    pub fn heading_count(&self, html: &str) -> usize {
        let flattened = html.replace('\n', " ");
        let without_scripts = self.script.replace_all(&flattened, " ");
        self.heading.find_iter(&without_scripts).count()
    }
}

/// Chunks `html` with a shared, lazily compiled [`HtmlChunker`].
pub fn chunk_html(html: &str) -> Vec<String> {
    DEFAULT_CHUNKER.chunks(html)
}
