//! Content model: the typed block/inline tree consumed by the renderers.
//!
//! Trees are built once (usually by `md-parse`), rendered read-only, and
//! dropped. Children are owned by their parent and every sequence keeps
//! source order.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Block-level content node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Block {
    /// Bare text block.
    Text(String),
    /// Raw HTML block, rendered as text.
    HtmlBlock(String),
    /// Fenced or indented code.
    CodeBlock {
        language: Option<String>,
        source: String,
    },
    /// Block-level link wrapping inline content.
    Link {
        destination: Option<String>,
        children: Vec<Inline>,
    },
    /// Heading; `level` is always at least 1.
    Heading { level: u8, children: Vec<Inline> },
    Paragraph(Vec<Inline>),
    /// Quote made of item groups, each a run of blocks.
    BlockQuote {
        kind: BlockQuoteKind,
        children: Vec<Vec<Block>>,
    },
    OrderedList(Vec<ListItem>),
    UnorderedList(Vec<ListItem>),
    /// Table as head cells plus rows of cells of inline runs.
    Table {
        head: Vec<Inline>,
        rows: Vec<Vec<Vec<Inline>>>,
    },
    ThematicBreak,
    SoftBreak,
    /// Named block extension, e.g. `:::note Title`.
    BlockDirective {
        name: String,
        arguments: Vec<String>,
        children: Vec<Block>,
    },
    /// Doxygen `\param <name>` section.
    DoxygenParameter { name: String, children: Vec<Block> },
    /// Doxygen `\returns` section.
    DoxygenReturns(Vec<Block>),
    /// Source the producer could not classify.
    Unknown(String),
}

impl Block {
    /// Create a paragraph from inline children.
    #[must_use]
    pub fn paragraph(children: impl IntoIterator<Item = Inline>) -> Self {
        Self::Paragraph(children.into_iter().collect())
    }

    /// Create a heading, clamping `level` to at least 1.
    #[must_use]
    pub fn heading(level: u8, children: impl IntoIterator<Item = Inline>) -> Self {
        Self::Heading {
            level: level.max(1),
            children: children.into_iter().collect(),
        }
    }

    /// Create a bare text block.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Create a code block.
    #[must_use]
    pub fn code(language: Option<&str>, source: impl Into<String>) -> Self {
        Self::CodeBlock {
            language: language.map(ToOwned::to_owned),
            source: source.into(),
        }
    }

    /// Create a plain quote where every block forms its own item group.
    #[must_use]
    pub fn quote(children: impl IntoIterator<Item = Block>) -> Self {
        Self::BlockQuote {
            kind: BlockQuoteKind::Plain,
            children: children.into_iter().map(|block| vec![block]).collect(),
        }
    }

    /// Create a block directive.
    #[must_use]
    pub fn directive(
        name: impl Into<String>,
        arguments: impl IntoIterator<Item = String>,
        children: impl IntoIterator<Item = Block>,
    ) -> Self {
        Self::BlockDirective {
            name: name.into(),
            arguments: arguments.into_iter().collect(),
            children: children.into_iter().collect(),
        }
    }
}

/// Inline-level content node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Inline {
    Text(String),
    InlineHtml(String),
    InlineCode(String),
    SoftBreak,
    LineBreak,
    Strong(Vec<Inline>),
    Emphasis(Vec<Inline>),
    Strikethrough(Vec<Inline>),
    Link {
        destination: Option<String>,
        children: Vec<Inline>,
    },
    /// Image; `title` doubles as the loading placeholder.
    Image {
        title: String,
        source: Option<String>,
    },
    /// Reference to a documented symbol.
    SymbolLink { destination: Option<String> },
    /// Children annotated with a raw attribute string.
    InlineAttributes {
        attributes: String,
        children: Vec<Inline>,
    },
    Unknown(String),
}

impl Inline {
    /// Create a text run.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Create an inline code span.
    #[must_use]
    pub fn code(code: impl Into<String>) -> Self {
        Self::InlineCode(code.into())
    }

    /// Create a link.
    #[must_use]
    pub fn link(destination: Option<&str>, children: impl IntoIterator<Item = Inline>) -> Self {
        Self::Link {
            destination: destination.map(ToOwned::to_owned),
            children: children.into_iter().collect(),
        }
    }

    /// Create an image.
    #[must_use]
    pub fn image(title: impl Into<String>, source: Option<&str>) -> Self {
        Self::Image {
            title: title.into(),
            source: source.map(ToOwned::to_owned),
        }
    }
}

/// Task-list checkbox state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Checkbox {
    Checked,
    Unchecked,
}

impl From<bool> for Checkbox {
    fn from(checked: bool) -> Self {
        if checked { Self::Checked } else { Self::Unchecked }
    }
}

/// Item of an ordered or unordered list.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ListItem {
    pub checkbox: Option<Checkbox>,
    pub children: Vec<Block>,
}

impl ListItem {
    /// Create an item without a checkbox.
    #[must_use]
    pub fn new(children: impl IntoIterator<Item = Block>) -> Self {
        Self {
            checkbox: None,
            children: children.into_iter().collect(),
        }
    }

    /// Create a task item.
    #[must_use]
    pub fn task(checkbox: Checkbox, children: impl IntoIterator<Item = Block>) -> Self {
        Self {
            checkbox: Some(checkbox),
            children: children.into_iter().collect(),
        }
    }
}

/// Quote flavour (GitHub alert kinds plus the plain quote).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BlockQuoteKind {
    #[default]
    Plain,
    Note,
    Tip,
    Important,
    Warning,
    Caution,
}

impl BlockQuoteKind {
    /// Title shown above alert content, `None` for plain quotes.
    #[must_use]
    pub fn title(self) -> Option<&'static str> {
        match self {
            Self::Plain => None,
            Self::Note => Some("Note"),
            Self::Tip => Some("Tip"),
            Self::Important => Some("Important"),
            Self::Warning => Some("Warning"),
            Self::Caution => Some("Caution"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_level_clamped() {
        let heading = Block::heading(0, [Inline::text("Title")]);
        assert!(matches!(heading, Block::Heading { level: 1, .. }));
    }

    #[test]
    fn test_quote_groups_each_block() {
        let quote = Block::quote([Block::text("a"), Block::text("b")]);
        let Block::BlockQuote { kind, children } = quote else {
            panic!("expected quote");
        };
        assert_eq!(kind, BlockQuoteKind::Plain);
        assert_eq!(
            children,
            vec![vec![Block::text("a")], vec![Block::text("b")]]
        );
    }

    #[test]
    fn test_checkbox_from_bool() {
        assert_eq!(Checkbox::from(true), Checkbox::Checked);
        assert_eq!(Checkbox::from(false), Checkbox::Unchecked);
    }

    #[test]
    fn test_alert_titles() {
        assert_eq!(BlockQuoteKind::Plain.title(), None);
        assert_eq!(BlockQuoteKind::Warning.title(), Some("Warning"));
    }

    static_assertions::assert_impl_all!(Inline: Send, Sync);
    static_assertions::assert_impl_all!(ListItem: Send, Sync);
}
