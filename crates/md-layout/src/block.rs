//! Block rendering: the recursive walk from [`Block`] to fragments.

use crate::backend::{
    Alignment, DiagnosticOrigin, GridRow, InlineStyle, LayoutBackend, Marker, Stack, TextRole,
};
use crate::context::LayoutContext;
use crate::destination::Destination;
use crate::directive::{DirectiveInvocation, DirectiveRegistry};
use crate::inline::{InlineRender, InlineRenderer};
use crate::model::{Block, BlockQuoteKind, Checkbox, Inline, ListItem};

/// Spacing between stacked sections (document, lists, quotes, code blocks).
const SECTION_SPACING: u16 = 10;
/// Spacing between inline runs of a top-level paragraph.
const PARAGRAPH_SPACING: u16 = 10;
/// Spacing between inline runs of a paragraph inside another container.
const NESTED_PARAGRAPH_SPACING: u16 = 4;
/// Gap between an ordinal and its content.
const ORDINAL_SPACING: u16 = 5;
/// Gap between a bullet and its content.
const MARKER_SPACING: u16 = 10;
/// Indentation standing in for the marker of a nested list.
const NESTED_LIST_INDENT: u16 = 10;

/// Renders block nodes through a [`LayoutBackend`].
///
/// The inline strategy is injected (`I`) and block directives are dispatched
/// through a [`DirectiveRegistry`].
///
/// # Example
///
/// ```
/// use md_layout::{
///     Block, BlockRenderer, BulletGlyphs, FontTier, HeadingTiers, Inline, LayoutContext,
///     TreeBackend,
/// };
///
/// let bullets = BulletGlyphs::default();
/// let headings = HeadingTiers::new([(1, FontTier::LargeTitle)]);
/// let ctx = LayoutContext::new(&bullets, &headings);
///
/// let renderer = BlockRenderer::new(&TreeBackend);
/// let fragment = renderer.render_document(&[Block::heading(1, [Inline::text("Title1")])], ctx);
/// assert_eq!(fragment.plain_text(), "Title1");
/// ```
pub struct BlockRenderer<'b, B: LayoutBackend, I = InlineRenderer> {
    backend: &'b B,
    inline: I,
    directives: DirectiveRegistry<B>,
}

impl<'b, B: LayoutBackend> BlockRenderer<'b, B> {
    /// Renderer with the default inline strategy and no directives.
    #[must_use]
    pub fn new(backend: &'b B) -> Self {
        Self {
            backend,
            inline: InlineRenderer,
            directives: DirectiveRegistry::new(),
        }
    }
}

impl<'b, B: LayoutBackend, I: InlineRender<B>> BlockRenderer<'b, B, I> {
    /// Swap the inline strategy.
    #[must_use]
    pub fn with_inline<J: InlineRender<B>>(self, inline: J) -> BlockRenderer<'b, B, J> {
        BlockRenderer {
            backend: self.backend,
            inline,
            directives: self.directives,
        }
    }

    /// Use `directives` for `BlockDirective` nodes.
    #[must_use]
    pub fn with_directives(mut self, directives: DirectiveRegistry<B>) -> Self {
        self.directives = directives;
        self
    }

    /// Render top-level blocks into one leading-aligned column.
    pub fn render_document(&self, blocks: &[Block], ctx: LayoutContext<'_>) -> B::Fragment {
        tracing::trace!(blocks = blocks.len(), "Rendering document");
        let children = self.render_all(blocks, ctx);
        self.column(SECTION_SPACING, children)
    }

    /// Render one block. `None` means the block produces nothing visible.
    pub fn render(&self, node: &Block, ctx: LayoutContext<'_>) -> Option<B::Fragment> {
        let backend = self.backend;
        let fragment = match node {
            Block::Text(text) => backend.text(text, TextRole::Body),
            Block::HtmlBlock(html) => backend.text(html, TextRole::Html),
            Block::CodeBlock { language, source } => {
                self.code_block(language.as_deref(), source)
            }
            Block::Link {
                destination,
                children,
            } => self.link(destination.as_deref(), children),
            Block::Heading { level, children } => {
                let row = backend.stack(
                    Stack::row(Alignment::Center, SECTION_SPACING),
                    self.inline.render_all(backend, children),
                );
                backend.heading(ctx.headings.tier_for(*level), row)
            }
            Block::Paragraph(children) => {
                let spacing = if ctx.is_nested {
                    NESTED_PARAGRAPH_SPACING
                } else {
                    PARAGRAPH_SPACING
                };
                self.column(spacing, self.inline.render_all(backend, children))
            }
            Block::BlockQuote { kind, children } => self.block_quote(*kind, children, ctx),
            Block::OrderedList(items) => self.ordered_list(items, ctx),
            Block::UnorderedList(items) => self.unordered_list(items, ctx),
            Block::Table { head, rows } => self.table(head, rows),
            Block::ThematicBreak => backend.divider(),
            Block::SoftBreak => return None,
            Block::BlockDirective {
                name,
                arguments,
                children,
            } => {
                let invocation = DirectiveInvocation {
                    name,
                    arguments,
                    ctx,
                };
                let children = self.render_all(children, ctx.nested());
                self.directives.compose(backend, &invocation, children)
            }
            Block::DoxygenParameter { name, children } => {
                self.doxygen(&format!("\\param {name}"), children, ctx)
            }
            Block::DoxygenReturns(children) => self.doxygen("\\returns", children, ctx),
            Block::Unknown(raw) => {
                tracing::debug!(raw = raw.as_str(), "Rendering unknown block as diagnostic");
                backend.diagnostic(DiagnosticOrigin::Block, raw)
            }
        };
        Some(fragment)
    }

    fn render_all(&self, blocks: &[Block], ctx: LayoutContext<'_>) -> Vec<B::Fragment> {
        blocks
            .iter()
            .filter_map(|block| self.render(block, ctx))
            .collect()
    }

    fn column(&self, spacing: u16, children: Vec<B::Fragment>) -> B::Fragment {
        self.backend
            .stack(Stack::column(Alignment::Leading, spacing), children)
    }

    fn code_block(&self, language: Option<&str>, source: &str) -> B::Fragment {
        let label = language.map(|language| self.backend.text(language, TextRole::Label));
        let source = self.backend.text(source, TextRole::CodeBlock);
        self.column(SECTION_SPACING, label.into_iter().chain([source]).collect())
    }

    fn link(&self, destination: Option<&str>, children: &[Inline]) -> B::Fragment {
        let row = self.backend.stack(
            Stack::row(Alignment::Center, 0),
            self.inline.render_all(self.backend, children),
        );
        match Destination::resolve(destination) {
            Some(target) => self.backend.link(&target, vec![row]),
            None => row,
        }
    }

    fn block_quote(
        &self,
        kind: BlockQuoteKind,
        groups: &[Vec<Block>],
        ctx: LayoutContext<'_>,
    ) -> B::Fragment {
        let groups = groups
            .iter()
            .map(|group| self.column(SECTION_SPACING, self.render_all(group, ctx)))
            .collect();
        let body = self.column(SECTION_SPACING, groups);

        let content = match kind.title() {
            Some(title) => self.column(
                SECTION_SPACING,
                vec![self.backend.text(title, TextRole::Label), body],
            ),
            None => body,
        };
        self.backend.quote(kind, content)
    }

    fn ordered_list(&self, items: &[ListItem], ctx: LayoutContext<'_>) -> B::Fragment {
        let rows = items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let ordinal = self.backend.marker(Marker::Ordinal(index + 1));
                let children = std::iter::once(ordinal)
                    .chain(self.render_all(&item.children, ctx))
                    .collect();
                self.backend
                    .stack(Stack::row(Alignment::Center, ORDINAL_SPACING), children)
            })
            .collect();
        self.column(SECTION_SPACING, rows)
    }

    fn unordered_list(&self, items: &[ListItem], ctx: LayoutContext<'_>) -> B::Fragment {
        let child_ctx = ctx.descend_list();
        let items = items
            .iter()
            .map(|item| {
                let rows = item
                    .children
                    .iter()
                    .map(|child| {
                        let marker = match (child, item.checkbox) {
                            (Block::UnorderedList(_), _) => Marker::Indent(NESTED_LIST_INDENT),
                            (_, Some(Checkbox::Checked)) => Marker::Checked,
                            (_, Some(Checkbox::Unchecked)) => Marker::Unchecked,
                            (_, None) => Marker::Bullet(ctx.bullet().to_owned()),
                        };
                        let row = std::iter::once(self.backend.marker(marker))
                            .chain(self.render(child, child_ctx))
                            .collect();
                        self.backend
                            .stack(Stack::row(Alignment::Center, MARKER_SPACING), row)
                    })
                    .collect();
                self.column(SECTION_SPACING, rows)
            })
            .collect();
        self.column(SECTION_SPACING, items)
    }

    fn table(&self, head: &[Inline], rows: &[Vec<Vec<Inline>>]) -> B::Fragment {
        let head_cells = head.iter().map(|cell| self.inline_cell(cell)).collect();

        let mut grid = Vec::with_capacity(rows.len() * 2 + 2);
        grid.push(GridRow::Cells(head_cells));
        grid.push(GridRow::Rule);
        for row in rows {
            let cells = row
                .iter()
                .map(|runs| {
                    self.backend.stack(
                        Stack::column(Alignment::Center, 0),
                        self.inline.render_all(self.backend, runs),
                    )
                })
                .collect();
            grid.push(GridRow::Cells(cells));
            grid.push(GridRow::Rule);
        }
        self.backend.grid(grid)
    }

    /// Head cell; invisible inlines still occupy their column.
    fn inline_cell(&self, cell: &Inline) -> B::Fragment {
        self.inline
            .render(self.backend, cell)
            .unwrap_or_else(|| self.backend.styled(InlineStyle::default(), Vec::new()))
    }

    fn doxygen(&self, label: &str, children: &[Block], ctx: LayoutContext<'_>) -> B::Fragment {
        let label = self.backend.text(label, TextRole::Label);
        let children = std::iter::once(label)
            .chain(self.render_all(children, ctx.nested()))
            .collect();
        self.backend.flow(children)
    }
}
