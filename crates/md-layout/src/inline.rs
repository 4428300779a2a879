//! Inline rendering.
//!
//! Inline nodes carry no depth-sensitive layout, so rendering is a pure
//! function of the node and the backend.

use crate::backend::{DiagnosticOrigin, InlineStyle, LayoutBackend, TextRole};
use crate::destination::Destination;
use crate::model::Inline;

/// Strategy for turning inline nodes into fragments.
///
/// [`BlockRenderer`](crate::BlockRenderer) is generic over this trait so
/// hosts can substitute their own inline rendering.
pub trait InlineRender<B: LayoutBackend> {
    /// Render one node. `None` means the node produces nothing visible.
    fn render(&self, backend: &B, node: &Inline) -> Option<B::Fragment>;

    /// Render a run of nodes, dropping the invisible ones.
    fn render_all(&self, backend: &B, nodes: &[Inline]) -> Vec<B::Fragment> {
        nodes
            .iter()
            .filter_map(|node| self.render(backend, node))
            .collect()
    }
}

/// Default inline rendering.
///
/// Soft and line breaks are absorbed, images without a usable source
/// vanish, links without a usable destination keep their content but lose
/// navigation, and unknown nodes surface as diagnostics.
#[derive(Clone, Copy, Debug, Default)]
pub struct InlineRenderer;

impl<B: LayoutBackend> InlineRender<B> for InlineRenderer {
    fn render(&self, backend: &B, node: &Inline) -> Option<B::Fragment> {
        match node {
            Inline::Text(text) => Some(backend.text(text, TextRole::Body)),
            Inline::InlineHtml(html) => Some(backend.text(html, TextRole::Html)),
            Inline::InlineCode(code) => Some(backend.text(code, TextRole::Code)),
            Inline::SoftBreak | Inline::LineBreak => None,
            Inline::Strong(children) => Some(self.wrap(backend, InlineStyle::bold(), children)),
            Inline::Emphasis(children) => {
                Some(self.wrap(backend, InlineStyle::italic(), children))
            }
            Inline::Strikethrough(children) => {
                Some(self.wrap(backend, InlineStyle::strikethrough(), children))
            }
            Inline::InlineAttributes {
                attributes,
                children,
            } => Some(self.wrap(backend, InlineStyle::attributes(attributes), children)),
            Inline::Link {
                destination,
                children,
            } => {
                let children = self.render_all(backend, children);
                Some(match Destination::resolve(destination.as_deref()) {
                    Some(target) => backend.link(&target, children),
                    None => backend.styled(InlineStyle::default(), children),
                })
            }
            Inline::Image { title, source } => Destination::resolve(source.as_deref())
                .map(|source| backend.image(&source, title)),
            Inline::SymbolLink { destination } => destination
                .as_deref()
                .filter(|symbol| !symbol.is_empty())
                .map(|symbol| backend.text(symbol, TextRole::Symbol)),
            Inline::Unknown(raw) => {
                tracing::debug!(raw = raw.as_str(), "Rendering unknown inline node as diagnostic");
                Some(backend.diagnostic(DiagnosticOrigin::Inline, raw))
            }
        }
    }
}

impl InlineRenderer {
    fn wrap<B: LayoutBackend>(
        &self,
        backend: &B,
        style: InlineStyle,
        children: &[Inline],
    ) -> B::Fragment {
        backend.styled(style, self.render_all(backend, children))
    }
}
