//! Backend capability trait.
//!
//! The renderers never build output directly. They describe composition
//! through [`LayoutBackend`], so the same walk can drive a fragment tree, a
//! widget toolkit, or a terminal UI.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::context::FontTier;
use crate::destination::Destination;
use crate::model::BlockQuoteKind;

/// What an atomic text fragment represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TextRole {
    /// Document prose.
    Body,
    /// Inline code span.
    Code,
    /// Code block source.
    CodeBlock,
    /// Raw HTML shown verbatim.
    Html,
    /// Symbol reference.
    Symbol,
    /// Renderer-generated caption (code language, alert title, doxygen tag).
    Label,
}

/// Inline text attributes; nested wrappers combine with [`InlineStyle::union`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InlineStyle {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    /// Raw attribute strings from inline attribute spans, outermost first.
    pub attributes: Vec<String>,
}

impl InlineStyle {
    #[must_use]
    pub fn bold() -> Self {
        Self {
            bold: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn italic() -> Self {
        Self {
            italic: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn strikethrough() -> Self {
        Self {
            strikethrough: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn attributes(attributes: impl Into<String>) -> Self {
        Self {
            attributes: vec![attributes.into()],
            ..Self::default()
        }
    }

    /// Style seen by text inside `inner` when wrapped by `self`.
    #[must_use]
    pub fn union(&self, inner: &Self) -> Self {
        Self {
            bold: self.bold || inner.bold,
            italic: self.italic || inner.italic,
            strikethrough: self.strikethrough || inner.strikethrough,
            attributes: self
                .attributes
                .iter()
                .chain(&inner.attributes)
                .cloned()
                .collect(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Cross-axis alignment of a stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Alignment {
    Leading,
    Center,
}

/// Row or column composition parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Stack {
    pub axis: Axis,
    pub alignment: Alignment,
    pub spacing: u16,
}

impl Stack {
    #[must_use]
    pub const fn row(alignment: Alignment, spacing: u16) -> Self {
        Self {
            axis: Axis::Horizontal,
            alignment,
            spacing,
        }
    }

    #[must_use]
    pub const fn column(alignment: Alignment, spacing: u16) -> Self {
        Self {
            axis: Axis::Vertical,
            alignment,
            spacing,
        }
    }
}

/// One row of a grid.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum GridRow<F> {
    Cells(Vec<F>),
    /// Horizontal rule spanning all columns.
    Rule,
}

/// Leading marker of a list row.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Marker {
    Bullet(String),
    Checked,
    Unchecked,
    /// 1-based position in an ordered list.
    Ordinal(usize),
    /// Blank indentation of the given width, used for nested lists.
    Indent(u16),
}

/// Which renderer produced a diagnostic fragment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DiagnosticOrigin {
    Block,
    Inline,
}

impl DiagnosticOrigin {
    /// Visible marker naming the unrecognized node.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Block => "Unrecognized block",
            Self::Inline => "Unrecognized inline",
        }
    }
}

/// Composition primitives a rendering backend must provide.
///
/// All methods are infallible: backends degrade locally instead of failing
/// the whole document.
pub trait LayoutBackend {
    /// Opaque unit of composed output.
    type Fragment;

    /// Atomic text.
    fn text(&self, content: &str, role: TextRole) -> Self::Fragment;

    /// Group of inline children sharing a style.
    fn styled(&self, style: InlineStyle, children: Vec<Self::Fragment>) -> Self::Fragment;

    /// Row or column of children with the given alignment and spacing.
    fn stack(&self, stack: Stack, children: Vec<Self::Fragment>) -> Self::Fragment;

    /// Grid with aligned columns.
    fn grid(&self, rows: Vec<GridRow<Self::Fragment>>) -> Self::Fragment;

    /// Wrap children in a navigable fragment.
    fn link(&self, target: &Destination, children: Vec<Self::Fragment>) -> Self::Fragment;

    /// Asynchronously loaded image; `placeholder` is shown until it resolves.
    fn image(&self, source: &Destination, placeholder: &str) -> Self::Fragment;

    /// Horizontal dividing rule.
    fn divider(&self) -> Self::Fragment;

    /// Wrapping flow of children (label followed by content).
    fn flow(&self, children: Vec<Self::Fragment>) -> Self::Fragment;

    /// Heading content at `tier`, or the ambient font when `None`.
    fn heading(&self, tier: Option<FontTier>, content: Self::Fragment) -> Self::Fragment;

    /// Side-ruled quote. Must size to its content rather than expand.
    fn quote(&self, kind: BlockQuoteKind, content: Self::Fragment) -> Self::Fragment;

    /// Leading marker of a list row (bullet, checkbox, ordinal or indent).
    fn marker(&self, marker: Marker) -> Self::Fragment;

    /// Visible fallback for input the renderers do not understand.
    fn diagnostic(&self, origin: DiagnosticOrigin, raw: &str) -> Self::Fragment;
}
