//! Layout composition for a typed markdown content model.
//!
//! This crate walks a [`Block`]/[`Inline`] tree and describes its layout
//! through the [`LayoutBackend`] trait, producing a nested fragment tree.
//!
//! # Architecture
//!
//! - [`BlockRenderer`] recurses over block nodes, threading an immutable
//!   [`LayoutContext`] (list depth, nesting, glyph and font tables)
//! - [`InlineRender`] renders inline nodes; [`InlineRenderer`] is the default
//!   strategy and can be swapped with [`BlockRenderer::with_inline`]
//! - [`directive::DirectiveRegistry`] maps directive names to composition
//!   rules, falling back to an undecorated stack
//! - [`TreeBackend`] is the reference backend, producing comparable
//!   [`Fragment`] trees
//!
//! Rendering is total: unknown nodes become diagnostics, invalid link or
//! image destinations degrade to plain content, and missing table entries
//! use fallbacks. Nothing is cached, so rendering the same tree twice yields
//! equal output.
//!
//! # Example
//!
//! ```
//! use md_layout::{
//!     Block, BlockRenderer, BulletGlyphs, HeadingTiers, Inline, LayoutContext, ListItem, Marker,
//!     TreeBackend,
//! };
//!
//! let blocks = vec![
//!     Block::heading(1, [Inline::text("Title")]),
//!     Block::UnorderedList(vec![ListItem::new([Block::text("Item")])]),
//! ];
//!
//! let bullets = BulletGlyphs::default();
//! let headings = HeadingTiers::default();
//! let fragment = BlockRenderer::new(&TreeBackend)
//!     .render_document(&blocks, LayoutContext::new(&bullets, &headings));
//!
//! assert_eq!(fragment.texts(), vec!["Title", "Item"]);
//! assert_eq!(fragment.markers(), vec![&Marker::Bullet("•".to_owned())]);
//! ```

mod backend;
mod block;
mod context;
mod destination;
pub mod directive;
mod inline;
mod model;
mod tree;

pub use backend::{
    Alignment, Axis, DiagnosticOrigin, GridRow, InlineStyle, LayoutBackend, Marker, Stack,
    TextRole,
};
pub use block::BlockRenderer;
pub use context::{BulletGlyphs, FALLBACK_BULLET, FontTier, HeadingTiers, LayoutContext};
pub use destination::{Destination, DestinationError};
pub use inline::{InlineRender, InlineRenderer};
pub use model::{Block, BlockQuoteKind, Checkbox, Inline, ListItem};
pub use tree::{Fragment, TreeBackend};
