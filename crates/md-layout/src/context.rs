//! Layout context threaded through block rendering.
//!
//! The context is a small `Copy` value. Each recursive call receives a
//! derived copy, so sibling subtrees never observe each other's state.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Glyph used when the bullet table is empty.
pub const FALLBACK_BULLET: &str = "•";

/// Depth-indexed bullet glyph table.
///
/// Lookups never fail: depths past the deepest configured entry repeat the
/// glyph of the nearest shallower entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BulletGlyphs {
    glyphs: BTreeMap<usize, String>,
}

impl BulletGlyphs {
    /// Create a table from explicit depth→glyph pairs.
    #[must_use]
    pub fn new(glyphs: impl IntoIterator<Item = (usize, String)>) -> Self {
        Self {
            glyphs: glyphs.into_iter().collect(),
        }
    }

    /// Create a dense table where position `i` is depth `i`.
    #[must_use]
    pub fn from_sequence<S: Into<String>>(glyphs: impl IntoIterator<Item = S>) -> Self {
        Self::new(glyphs.into_iter().map(Into::into).enumerate())
    }

    /// Glyph for a list at `depth`.
    ///
    /// Returns the entry with the greatest configured depth not exceeding
    /// `depth`, which for a dense table is `table[min(depth, max_depth)]`.
    /// Depths below the first configured entry use that entry; an empty
    /// table yields [`FALLBACK_BULLET`].
    #[must_use]
    pub fn glyph_for(&self, depth: usize) -> &str {
        self.glyphs
            .range(..=depth)
            .next_back()
            .or_else(|| self.glyphs.first_key_value())
            .map_or(FALLBACK_BULLET, |(_, glyph)| glyph.as_str())
    }

    /// Deepest configured depth, if any.
    #[must_use]
    pub fn max_depth(&self) -> Option<usize> {
        self.glyphs.last_key_value().map(|(depth, _)| *depth)
    }
}

impl Default for BulletGlyphs {
    fn default() -> Self {
        Self::from_sequence(["•", "◦", "▫"])
    }
}

/// Named font sizes a heading can be rendered with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FontTier {
    LargeTitle,
    Title,
    Title2,
    Title3,
    Headline,
    Subheadline,
    Body,
    Callout,
    Footnote,
    Caption,
}

/// Partial heading level→font tier table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeadingTiers {
    tiers: BTreeMap<u8, FontTier>,
}

impl HeadingTiers {
    /// Create a table from level→tier pairs; missing levels use the ambient font.
    #[must_use]
    pub fn new(tiers: impl IntoIterator<Item = (u8, FontTier)>) -> Self {
        Self {
            tiers: tiers.into_iter().collect(),
        }
    }

    /// Tier for a heading `level`; `None` means the ambient font.
    #[must_use]
    pub fn tier_for(&self, level: u8) -> Option<FontTier> {
        self.tiers.get(&level).copied()
    }
}

impl Default for HeadingTiers {
    fn default() -> Self {
        Self::new([
            (1, FontTier::Title),
            (2, FontTier::Title2),
            (3, FontTier::Title3),
        ])
    }
}

/// Recursion state for block rendering.
#[derive(Clone, Copy, Debug)]
pub struct LayoutContext<'a> {
    /// Number of enclosing unordered lists.
    pub list_depth: usize,
    /// Whether the node sits inside another block container.
    pub is_nested: bool,
    pub bullets: &'a BulletGlyphs,
    pub headings: &'a HeadingTiers,
}

impl<'a> LayoutContext<'a> {
    /// Root context for a document.
    #[must_use]
    pub fn new(bullets: &'a BulletGlyphs, headings: &'a HeadingTiers) -> Self {
        Self {
            list_depth: 0,
            is_nested: false,
            bullets,
            headings,
        }
    }

    /// Context for the children of a list item.
    #[must_use]
    pub fn descend_list(self) -> Self {
        Self {
            list_depth: self.list_depth + 1,
            is_nested: true,
            ..self
        }
    }

    /// Context for children of any other block container.
    #[must_use]
    pub fn nested(self) -> Self {
        Self {
            is_nested: true,
            ..self
        }
    }

    /// Bullet glyph for the current list depth.
    #[must_use]
    pub fn bullet(&self) -> &'a str {
        self.bullets.glyph_for(self.list_depth)
    }
}
