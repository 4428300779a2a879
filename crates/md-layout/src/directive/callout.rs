//! Callout directive: `:::note Optional title`.

use super::handler::DIRECTIVE_SPACING;
use super::{BlockDirective, DirectiveInvocation};
use crate::backend::{Alignment, LayoutBackend, Stack, TextRole};
use crate::model::BlockQuoteKind;

/// Renders a titled, side-ruled box around the directive's children.
///
/// The title is the directive's arguments joined by spaces, or the
/// capitalized directive name when there are none. Names matching an alert
/// kind (`note`, `tip`, `important`, `warning`, `caution`) pick that kind's
/// styling.
///
/// ```
/// use md_layout::directive::{CalloutDirective, DirectiveRegistry};
/// use md_layout::TreeBackend;
///
/// let registry = DirectiveRegistry::<TreeBackend>::new()
///     .with(CalloutDirective::new("note"))
///     .with(CalloutDirective::new("aside"));
/// assert_eq!(registry.names(), vec!["aside", "note"]);
/// ```
#[derive(Clone, Debug)]
pub struct CalloutDirective {
    name: String,
    kind: BlockQuoteKind,
}

impl CalloutDirective {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let kind = match name.as_str() {
            "note" => BlockQuoteKind::Note,
            "tip" => BlockQuoteKind::Tip,
            "important" => BlockQuoteKind::Important,
            "warning" => BlockQuoteKind::Warning,
            "caution" => BlockQuoteKind::Caution,
            _ => BlockQuoteKind::Plain,
        };
        Self { name, kind }
    }

    fn title(&self, arguments: &[String]) -> String {
        if !arguments.is_empty() {
            return arguments.join(" ");
        }
        let mut chars = self.name.chars();
        chars.next().map_or_else(String::new, |first| {
            first.to_uppercase().chain(chars).collect()
        })
    }
}

impl<B: LayoutBackend> BlockDirective<B> for CalloutDirective {
    fn name(&self) -> &str {
        &self.name
    }

    fn compose(
        &self,
        backend: &B,
        invocation: &DirectiveInvocation<'_>,
        children: Vec<B::Fragment>,
    ) -> B::Fragment {
        let title = backend.text(&self.title(invocation.arguments), TextRole::Label);
        let content = std::iter::once(title).chain(children).collect();
        backend.quote(
            self.kind,
            backend.stack(Stack::column(Alignment::Leading, DIRECTIVE_SPACING), content),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{BulletGlyphs, HeadingTiers, LayoutContext};
    use crate::tree::{Fragment, TreeBackend};

    fn compose(directive: &CalloutDirective, arguments: &[String]) -> Fragment {
        let bullets = BulletGlyphs::default();
        let headings = HeadingTiers::default();
        let invocation = DirectiveInvocation {
            name: "note",
            arguments,
            ctx: LayoutContext::new(&bullets, &headings),
        };
        directive.compose(
            &TreeBackend,
            &invocation,
            vec![TreeBackend.text("body", TextRole::Body)],
        )
    }

    #[test]
    fn test_title_from_arguments() {
        let fragment = compose(
            &CalloutDirective::new("note"),
            &["Read".to_owned(), "this".to_owned()],
        );
        assert!(matches!(
            fragment,
            Fragment::Quote {
                kind: BlockQuoteKind::Note,
                ..
            }
        ));
        assert_eq!(fragment.texts(), vec!["Read this", "body"]);
    }

    #[test]
    fn test_title_from_name() {
        let fragment = compose(&CalloutDirective::new("aside"), &[]);
        assert!(matches!(
            fragment,
            Fragment::Quote {
                kind: BlockQuoteKind::Plain,
                ..
            }
        ));
        assert_eq!(fragment.texts(), vec!["Aside", "body"]);
    }
}
