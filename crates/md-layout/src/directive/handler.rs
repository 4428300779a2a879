//! Block directive trait and the generic fallback.

use crate::backend::{Alignment, LayoutBackend, Stack};
use crate::context::LayoutContext;

/// A directive occurrence being composed.
#[derive(Clone, Copy, Debug)]
pub struct DirectiveInvocation<'a> {
    /// Directive name as written (case-sensitive).
    pub name: &'a str,
    /// Positional arguments after the name.
    pub arguments: &'a [String],
    /// Context the directive node itself was rendered in.
    pub ctx: LayoutContext<'a>,
}

/// Composition rule for a named block directive.
///
/// Children arrive already rendered, in document order, with a nested
/// context. Handlers are shared between concurrent renders and must be
/// `Send + Sync`.
pub trait BlockDirective<B: LayoutBackend>: Send + Sync {
    /// Directive name this handler is registered under.
    fn name(&self) -> &str;

    /// Compose the directive's rendered children into one fragment.
    fn compose(
        &self,
        backend: &B,
        invocation: &DirectiveInvocation<'_>,
        children: Vec<B::Fragment>,
    ) -> B::Fragment;
}

/// Fallback for unregistered names: children stacked in order, undecorated.
#[derive(Clone, Copy, Debug, Default)]
pub struct GenericDirective;

/// Spacing between directive children.
pub(crate) const DIRECTIVE_SPACING: u16 = 10;

impl<B: LayoutBackend> BlockDirective<B> for GenericDirective {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn compose(
        &self,
        backend: &B,
        _invocation: &DirectiveInvocation<'_>,
        children: Vec<B::Fragment>,
    ) -> B::Fragment {
        backend.stack(Stack::column(Alignment::Leading, DIRECTIVE_SPACING), children)
    }
}
