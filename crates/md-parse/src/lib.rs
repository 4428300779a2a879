//! Markdown to content model parsing.
//!
//! Parses CommonMark (plus GitHub extensions) with `pulldown-cmark` and
//! builds the [`md_layout::Block`] tree the layout renderers consume. Two
//! extensions sit on top:
//!
//! - `:::name args` container directives become [`Block::BlockDirective`]
//! - Doxygen `\param <name>` and `\returns` paragraphs become
//!   [`Block::DoxygenParameter`] and [`Block::DoxygenReturns`]
//!
//! Parsing never fails. Constructs without a content model variant (for
//! example footnotes) become `Unknown` nodes carrying their source.
//!
//! # Example
//!
//! ```
//! use md_layout::{Block, Inline};
//!
//! let blocks = md_parse::parse(":::note Careful\nBody\n:::\n");
//! assert_eq!(
//!     blocks,
//!     vec![Block::directive(
//!         "note",
//!         ["Careful".to_owned()],
//!         [Block::paragraph([Inline::text("Body")])],
//!     )]
//! );
//! ```

mod builder;
mod directive;
mod doxygen;
mod fence;

use md_layout::Block;
use pulldown_cmark::Options;

use crate::builder::TreeBuilder;
use crate::directive::Segment;

/// Deepest block or inline nesting kept as structure. Anything opened below
/// it, directives included, is kept as `Unknown` source or plain text.
pub(crate) const MAX_NESTING: usize = 64;

/// Syntax extensions to recognize.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    /// GitHub flavor: tables, strikethrough, task lists, alerts, footnotes,
    /// super- and subscript.
    pub gfm: bool,
    /// Doxygen `\param` and `\returns` commands.
    pub doxygen: bool,
    /// `:::name` container directives.
    pub directives: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            gfm: true,
            doxygen: true,
            directives: true,
        }
    }
}

impl ParseOptions {
    /// `pulldown-cmark` options for these settings.
    #[must_use]
    pub fn pulldown_options(&self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM
                | Options::ENABLE_FOOTNOTES
                | Options::ENABLE_SUPERSCRIPT
                | Options::ENABLE_SUBSCRIPT
        } else {
            Options::empty()
        }
    }
}

/// Markdown parser producing content model trees.
#[derive(Clone, Copy, Debug, Default)]
pub struct Parser {
    options: ParseOptions,
}

impl Parser {
    /// Create a parser recognizing the extensions enabled in `options`.
    #[must_use]
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    /// Extensions this parser recognizes.
    #[must_use]
    pub fn options(&self) -> ParseOptions {
        self.options
    }

    /// Parse `markdown` into top-level blocks.
    #[must_use]
    pub fn parse(&self, markdown: &str) -> Vec<Block> {
        if self.options.directives {
            self.segments(directive::split(markdown), 0)
        } else {
            self.markdown(markdown, 0)
        }
    }

    /// Blocks for `segments` sitting inside `depth` directives.
    fn segments(&self, segments: Vec<Segment>, depth: usize) -> Vec<Block> {
        let mut blocks = Vec::new();
        for segment in segments {
            match segment {
                Segment::Markdown(markdown) => blocks.extend(self.markdown(&markdown, depth)),
                Segment::Directive {
                    name,
                    arguments,
                    body,
                } => blocks.push(Block::BlockDirective {
                    name,
                    arguments,
                    children: self.segments(body, depth + 1),
                }),
            }
        }
        blocks
    }

    fn markdown(&self, markdown: &str, depth: usize) -> Vec<Block> {
        let events =
            pulldown_cmark::Parser::new_ext(markdown, self.options.pulldown_options())
                .into_offset_iter();
        TreeBuilder::new(markdown, events, self.options.doxygen, depth).build()
    }
}

/// Parse `markdown` with default options.
#[must_use]
pub fn parse(markdown: &str) -> Vec<Block> {
    Parser::default().parse(markdown)
}
