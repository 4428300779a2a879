//! Reference backend producing an owned, comparable fragment tree.
//!
//! Hosts that render with their own toolkit can walk [`Fragment`] instead of
//! implementing [`LayoutBackend`] themselves.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::backend::{
    DiagnosticOrigin, GridRow, InlineStyle, LayoutBackend, Marker, Stack, TextRole,
};
use crate::context::FontTier;
use crate::destination::Destination;
use crate::model::BlockQuoteKind;

/// Node of a composed layout tree.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Fragment {
    Text {
        content: String,
        role: TextRole,
    },
    Styled {
        style: InlineStyle,
        children: Vec<Fragment>,
    },
    Stack {
        stack: Stack,
        children: Vec<Fragment>,
    },
    Grid {
        rows: Vec<GridRow<Fragment>>,
    },
    Link {
        target: Destination,
        children: Vec<Fragment>,
    },
    Image {
        source: Destination,
        placeholder: String,
    },
    Divider,
    Flow {
        children: Vec<Fragment>,
    },
    Heading {
        tier: Option<FontTier>,
        content: Box<Fragment>,
    },
    /// Side-ruled quote, sized to its content.
    Quote {
        kind: BlockQuoteKind,
        content: Box<Fragment>,
    },
    Marker(Marker),
    Diagnostic {
        origin: DiagnosticOrigin,
        raw: String,
    },
}

impl Fragment {
    /// Direct children in layout order; grid cells are flattened row by row.
    #[must_use]
    pub fn children(&self) -> Vec<&Fragment> {
        match self {
            Self::Styled { children, .. }
            | Self::Stack { children, .. }
            | Self::Link { children, .. }
            | Self::Flow { children } => children.iter().collect(),
            Self::Grid { rows } => rows
                .iter()
                .flat_map(|row| match row {
                    GridRow::Cells(cells) => cells.as_slice(),
                    GridRow::Rule => &[],
                })
                .collect(),
            Self::Heading { content, .. } | Self::Quote { content, .. } => vec![content.as_ref()],
            Self::Text { .. }
            | Self::Image { .. }
            | Self::Divider
            | Self::Marker(_)
            | Self::Diagnostic { .. } => Vec::new(),
        }
    }

    /// This fragment and all of its descendants, pre-order.
    #[must_use]
    pub fn descendants(&self) -> Vec<&Fragment> {
        let mut out = vec![self];
        for child in self.children() {
            out.extend(child.descendants());
        }
        out
    }

    /// Visible text in reading order.
    ///
    /// Diagnostics contribute their marker label followed by the raw text.
    #[must_use]
    pub fn texts(&self) -> Vec<&str> {
        self.descendants()
            .into_iter()
            .flat_map(|fragment| match fragment {
                Self::Text { content, .. } => vec![content.as_str()],
                Self::Diagnostic { origin, raw } => vec![origin.label(), raw.as_str()],
                _ => Vec::new(),
            })
            .collect()
    }

    /// Visible text joined with single spaces.
    #[must_use]
    pub fn plain_text(&self) -> String {
        self.texts().join(" ")
    }

    /// Text runs with the effective style accumulated from enclosing groups.
    #[must_use]
    pub fn styled_runs(&self) -> Vec<(InlineStyle, &str)> {
        let mut runs = Vec::new();
        self.collect_runs(&InlineStyle::default(), &mut runs);
        runs
    }

    fn collect_runs<'a>(&'a self, style: &InlineStyle, runs: &mut Vec<(InlineStyle, &'a str)>) {
        match self {
            Self::Text { content, .. } => runs.push((style.clone(), content.as_str())),
            Self::Styled {
                style: inner,
                children,
            } => {
                let combined = style.union(inner);
                for child in children {
                    child.collect_runs(&combined, runs);
                }
            }
            _ => {
                for child in self.children() {
                    child.collect_runs(style, runs);
                }
            }
        }
    }

    /// List markers in document order.
    #[must_use]
    pub fn markers(&self) -> Vec<&Marker> {
        self.descendants()
            .into_iter()
            .filter_map(|fragment| match fragment {
                Self::Marker(marker) => Some(marker),
                _ => None,
            })
            .collect()
    }
}

/// [`LayoutBackend`] that builds [`Fragment`] trees.
#[derive(Clone, Copy, Debug, Default)]
pub struct TreeBackend;

impl LayoutBackend for TreeBackend {
    type Fragment = Fragment;

    fn text(&self, content: &str, role: TextRole) -> Fragment {
        Fragment::Text {
            content: content.to_owned(),
            role,
        }
    }

    fn styled(&self, style: InlineStyle, children: Vec<Fragment>) -> Fragment {
        Fragment::Styled { style, children }
    }

    fn stack(&self, stack: Stack, children: Vec<Fragment>) -> Fragment {
        Fragment::Stack { stack, children }
    }

    fn grid(&self, rows: Vec<GridRow<Fragment>>) -> Fragment {
        Fragment::Grid { rows }
    }

    fn link(&self, target: &Destination, children: Vec<Fragment>) -> Fragment {
        Fragment::Link {
            target: target.clone(),
            children,
        }
    }

    fn image(&self, source: &Destination, placeholder: &str) -> Fragment {
        Fragment::Image {
            source: source.clone(),
            placeholder: placeholder.to_owned(),
        }
    }

    fn divider(&self) -> Fragment {
        Fragment::Divider
    }

    fn flow(&self, children: Vec<Fragment>) -> Fragment {
        Fragment::Flow { children }
    }

    fn heading(&self, tier: Option<FontTier>, content: Fragment) -> Fragment {
        Fragment::Heading {
            tier,
            content: Box::new(content),
        }
    }

    fn quote(&self, kind: BlockQuoteKind, content: Fragment) -> Fragment {
        Fragment::Quote {
            kind,
            content: Box::new(content),
        }
    }

    fn marker(&self, marker: Marker) -> Fragment {
        Fragment::Marker(marker)
    }

    fn diagnostic(&self, origin: DiagnosticOrigin, raw: &str) -> Fragment {
        Fragment::Diagnostic {
            origin,
            raw: raw.to_owned(),
        }
    }
}
