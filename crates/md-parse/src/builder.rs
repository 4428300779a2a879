//! Builds the content model from pulldown-cmark offset events.

use std::iter::Peekable;
use std::ops::Range;

use md_layout::{Block, BlockQuoteKind, Checkbox, Inline, ListItem};
use pulldown_cmark::{CodeBlockKind, CowStr, Event, HeadingLevel, Tag};

use crate::{MAX_NESTING, doxygen};

/// Recursive-descent consumer of an offset event stream.
///
/// Every `Start` handled here consumes its matching `End`, so a nested call
/// returns as soon as it sees an `End` it did not open. Elements opened
/// deeper than [`MAX_NESTING`] are kept as `Unknown` source.
pub(crate) struct TreeBuilder<'s, I: Iterator<Item = (Event<'s>, Range<usize>)>> {
    source: &'s str,
    events: Peekable<I>,
    doxygen: bool,
    checkbox: Option<Checkbox>,
    depth: usize,
}

impl<'s, I: Iterator<Item = (Event<'s>, Range<usize>)>> TreeBuilder<'s, I> {
    /// Builder for `source` whose elements start at nesting `depth`.
    pub(crate) fn new(source: &'s str, events: I, doxygen: bool, depth: usize) -> Self {
        Self {
            source,
            events: events.peekable(),
            doxygen,
            checkbox: None,
            depth,
        }
    }

    pub(crate) fn build(mut self) -> Vec<Block> {
        let mut blocks = Vec::new();
        while self.events.peek().is_some() {
            blocks.extend(self.blocks());
        }
        blocks
    }

    /// Blocks up to (and including) the enclosing `End`.
    fn blocks(&mut self) -> Vec<Block> {
        let mut blocks = Vec::new();
        loop {
            match self.events.peek() {
                None => break,
                Some((Event::End(_), _)) => {
                    self.events.next();
                    break;
                }
                Some((event, _)) if is_inline(event) => {
                    let run = self.inline_run();
                    if !run.is_empty() {
                        blocks.extend(self.paragraph(run));
                    }
                }
                Some(_) => {
                    if let Some((event, range)) = self.events.next() {
                        blocks.extend(self.block(event, range));
                    }
                }
            }
        }
        blocks
    }

    fn block(&mut self, event: Event<'s>, range: Range<usize>) -> Vec<Block> {
        if !matches!(event, Event::Start(_)) {
            return self.block_event(event, range);
        }
        if self.depth >= MAX_NESTING {
            tracing::warn!(depth = self.depth, "Nesting limit reached, keeping block source");
            return vec![Block::Unknown(self.skip(range))];
        }
        self.depth += 1;
        let blocks = self.block_event(event, range);
        self.depth -= 1;
        blocks
    }

    fn block_event(&mut self, event: Event<'s>, range: Range<usize>) -> Vec<Block> {
        let block = match event {
            Event::Start(Tag::Paragraph) => {
                let inlines = self.inlines();
                return self.paragraph(inlines);
            }
            Event::Start(Tag::Heading { level, .. }) => {
                Block::heading(heading_level(level), self.inlines())
            }
            Event::Start(Tag::BlockQuote(kind)) => Block::BlockQuote {
                kind: kind.map_or(BlockQuoteKind::Plain, alert_kind),
                children: self.blocks().into_iter().map(|block| vec![block]).collect(),
            },
            Event::Start(Tag::CodeBlock(kind)) => {
                let language = match kind {
                    CodeBlockKind::Fenced(info) => {
                        info.split_whitespace().next().map(ToOwned::to_owned)
                    }
                    CodeBlockKind::Indented => None,
                };
                Block::CodeBlock {
                    language,
                    source: self.literal(),
                }
            }
            Event::Start(Tag::HtmlBlock) => Block::HtmlBlock(self.literal()),
            Event::Start(Tag::List(start)) => {
                let items = self.list_items();
                if start.is_some() {
                    Block::OrderedList(items)
                } else {
                    Block::UnorderedList(items)
                }
            }
            Event::Start(Tag::Table(_)) => self.table(),
            Event::Start(_) => Block::Unknown(self.skip(range)),
            Event::Rule => Block::ThematicBreak,
            Event::Html(html) => Block::HtmlBlock(html.into_string()),
            Event::DisplayMath(_) | Event::InlineMath(_) | Event::FootnoteReference(_) => {
                Block::Unknown(self.raw(range))
            }
            Event::Text(text) => Block::Text(text.into_string()),
            Event::SoftBreak | Event::HardBreak => Block::SoftBreak,
            Event::Code(code) => Block::paragraph([Inline::InlineCode(code.into_string())]),
            Event::InlineHtml(html) => Block::HtmlBlock(html.into_string()),
            Event::TaskListMarker(checked) => {
                self.checkbox = Some(Checkbox::from(checked));
                return Vec::new();
            }
            Event::End(_) => return Vec::new(),
        };
        vec![block]
    }

    fn paragraph(&self, inlines: Vec<Inline>) -> Vec<Block> {
        if self.doxygen {
            doxygen::expand(inlines)
        } else {
            vec![Block::Paragraph(inlines)]
        }
    }

    fn list_items(&mut self) -> Vec<ListItem> {
        let mut items = Vec::new();
        while let Some((event, range)) = self.events.next() {
            match event {
                Event::Start(Tag::Item) => {
                    let outer = self.checkbox.take();
                    let children = self.blocks();
                    items.push(ListItem {
                        checkbox: self.checkbox.take(),
                        children,
                    });
                    self.checkbox = outer;
                }
                Event::End(_) => break,
                Event::Start(_) => {
                    tracing::debug!(range = ?range, "Skipping unexpected list child");
                    self.skip(range);
                }
                _ => {}
            }
        }
        items
    }

    fn table(&mut self) -> Block {
        let mut head = Vec::new();
        let mut rows = Vec::new();
        while let Some((event, range)) = self.events.next() {
            match event {
                Event::Start(Tag::TableHead) => {
                    head = self.cells().into_iter().map(head_cell).collect();
                }
                Event::Start(Tag::TableRow) => rows.push(self.cells()),
                Event::End(_) => break,
                Event::Start(_) => {
                    self.skip(range);
                }
                _ => {}
            }
        }
        Block::Table { head, rows }
    }

    fn cells(&mut self) -> Vec<Vec<Inline>> {
        let mut cells = Vec::new();
        while let Some((event, range)) = self.events.next() {
            match event {
                Event::Start(Tag::TableCell) => cells.push(self.inlines()),
                Event::End(_) => break,
                Event::Start(_) => {
                    self.skip(range);
                }
                _ => {}
            }
        }
        cells
    }

    /// Inlines up to (and including) the enclosing `End`.
    fn inlines(&mut self) -> Vec<Inline> {
        let mut inlines = Vec::new();
        while let Some((event, range)) = self.events.next() {
            if matches!(event, Event::End(_)) {
                break;
            }
            if let Some(inline) = self.inline(event, range) {
                push_merged(&mut inlines, inline);
            }
        }
        inlines
    }

    /// Consecutive inline events outside any paragraph (tight list items).
    fn inline_run(&mut self) -> Vec<Inline> {
        let mut inlines = Vec::new();
        while let Some((event, range)) = self.events.next_if(|(event, _)| is_inline(event)) {
            if let Some(inline) = self.inline(event, range) {
                push_merged(&mut inlines, inline);
            }
        }
        inlines
    }

    fn inline(&mut self, event: Event<'s>, range: Range<usize>) -> Option<Inline> {
        if !matches!(event, Event::Start(_)) {
            return self.inline_event(event, range);
        }
        if self.depth >= MAX_NESTING {
            tracing::warn!(depth = self.depth, "Nesting limit reached, keeping inline source");
            return Some(Inline::Unknown(self.skip(range)));
        }
        self.depth += 1;
        let inline = self.inline_event(event, range);
        self.depth -= 1;
        inline
    }

    fn inline_event(&mut self, event: Event<'s>, range: Range<usize>) -> Option<Inline> {
        let inline = match event {
            Event::Text(text) => Inline::Text(text.into_string()),
            Event::Code(code) => Inline::InlineCode(code.into_string()),
            Event::InlineHtml(html) | Event::Html(html) => Inline::InlineHtml(html.into_string()),
            Event::SoftBreak => Inline::SoftBreak,
            Event::HardBreak => Inline::LineBreak,
            Event::Start(Tag::Emphasis) => Inline::Emphasis(self.inlines()),
            Event::Start(Tag::Strong) => Inline::Strong(self.inlines()),
            Event::Start(Tag::Strikethrough) => Inline::Strikethrough(self.inlines()),
            Event::Start(Tag::Superscript) => Inline::InlineAttributes {
                attributes: "superscript".to_owned(),
                children: self.inlines(),
            },
            Event::Start(Tag::Subscript) => Inline::InlineAttributes {
                attributes: "subscript".to_owned(),
                children: self.inlines(),
            },
            Event::Start(Tag::Link { dest_url, .. }) => Inline::Link {
                destination: non_empty(dest_url),
                children: self.inlines(),
            },
            Event::Start(Tag::Image {
                dest_url, title, ..
            }) => {
                let alt = self.inlines();
                let title = if title.is_empty() {
                    plain_text(&alt)
                } else {
                    title.into_string()
                };
                Inline::Image {
                    title,
                    source: non_empty(dest_url),
                }
            }
            Event::TaskListMarker(checked) => {
                self.checkbox = Some(Checkbox::from(checked));
                return None;
            }
            Event::Start(_) => Inline::Unknown(self.skip(range)),
            Event::FootnoteReference(_) | Event::InlineMath(_) | Event::DisplayMath(_) => {
                Inline::Unknown(self.raw(range))
            }
            Event::Rule => Inline::Unknown(self.raw(range)),
            Event::End(_) => return None,
        };
        Some(inline)
    }

    /// Concatenated text of a literal container (code or HTML block).
    fn literal(&mut self) -> String {
        let mut literal = String::new();
        while let Some((event, _)) = self.events.next() {
            match event {
                Event::Text(text) | Event::Html(text) => literal.push_str(&text),
                Event::End(_) => break,
                _ => {}
            }
        }
        literal
    }

    /// Consume the rest of an element and return its source text.
    fn skip(&mut self, range: Range<usize>) -> String {
        let mut depth = 1usize;
        for (event, _) in self.events.by_ref() {
            match event {
                Event::Start(_) => depth += 1,
                Event::End(_) => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
        }
        let raw = self.raw(range);
        tracing::debug!(raw = %raw, "No content model variant, keeping source");
        raw
    }

    fn raw(&self, range: Range<usize>) -> String {
        self.source
            .get(range)
            .unwrap_or_default()
            .trim_end()
            .to_owned()
    }
}

fn is_inline(event: &Event<'_>) -> bool {
    match event {
        Event::Text(_)
        | Event::Code(_)
        | Event::InlineHtml(_)
        | Event::InlineMath(_)
        | Event::DisplayMath(_)
        | Event::SoftBreak
        | Event::HardBreak
        | Event::FootnoteReference(_)
        | Event::TaskListMarker(_) => true,
        Event::Start(tag) => matches!(
            tag,
            Tag::Emphasis
                | Tag::Strong
                | Tag::Strikethrough
                | Tag::Superscript
                | Tag::Subscript
                | Tag::Link { .. }
                | Tag::Image { .. }
        ),
        _ => false,
    }
}

/// Append, joining adjacent text runs.
fn push_merged(inlines: &mut Vec<Inline>, inline: Inline) {
    if let (Some(Inline::Text(last)), Inline::Text(next)) = (inlines.last_mut(), &inline) {
        last.push_str(next);
        return;
    }
    inlines.push(inline);
}

/// Head cells hold one inline; several are grouped without attributes.
fn head_cell(mut cell: Vec<Inline>) -> Inline {
    if cell.len() == 1
        && let Some(inline) = cell.pop()
    {
        return inline;
    }
    Inline::InlineAttributes {
        attributes: String::new(),
        children: cell,
    }
}

fn non_empty(value: CowStr<'_>) -> Option<String> {
    (!value.is_empty()).then(|| value.into_string())
}

fn plain_text(inlines: &[Inline]) -> String {
    let mut text = String::new();
    for inline in inlines {
        match inline {
            Inline::Text(t) | Inline::InlineCode(t) => text.push_str(t),
            Inline::SoftBreak | Inline::LineBreak => text.push(' '),
            Inline::Strong(children)
            | Inline::Emphasis(children)
            | Inline::Strikethrough(children)
            | Inline::Link { children, .. }
            | Inline::InlineAttributes { children, .. } => text.push_str(&plain_text(children)),
            Inline::Image { title, .. } => text.push_str(title),
            Inline::InlineHtml(_) | Inline::SymbolLink { .. } | Inline::Unknown(_) => {}
        }
    }
    text
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn alert_kind(kind: pulldown_cmark::BlockQuoteKind) -> BlockQuoteKind {
    match kind {
        pulldown_cmark::BlockQuoteKind::Note => BlockQuoteKind::Note,
        pulldown_cmark::BlockQuoteKind::Tip => BlockQuoteKind::Tip,
        pulldown_cmark::BlockQuoteKind::Important => BlockQuoteKind::Important,
        pulldown_cmark::BlockQuoteKind::Warning => BlockQuoteKind::Warning,
        pulldown_cmark::BlockQuoteKind::Caution => BlockQuoteKind::Caution,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use pulldown_cmark::{Options, Parser};

    fn build(markdown: &str) -> Vec<Block> {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_GFM
            | Options::ENABLE_FOOTNOTES;
        let events = Parser::new_ext(markdown, options).into_offset_iter();
        TreeBuilder::new(markdown, events, false, 0).build()
    }

    /// Deepest chain of nested blocks, counting list items and quote groups.
    fn block_depth(blocks: &[Block]) -> usize {
        blocks
            .iter()
            .map(|block| match block {
                Block::BlockQuote { children, .. } => {
                    1 + children.iter().map(|g| block_depth(g)).max().unwrap_or(0)
                }
                Block::OrderedList(items) | Block::UnorderedList(items) => {
                    1 + items
                        .iter()
                        .map(|item| block_depth(&item.children))
                        .max()
                        .unwrap_or(0)
                }
                Block::BlockDirective { children, .. }
                | Block::DoxygenParameter { children, .. }
                | Block::DoxygenReturns(children) => 1 + block_depth(children),
                _ => 1,
            })
            .max()
            .unwrap_or(0)
    }

    fn innermost(blocks: &[Block]) -> &Block {
        let mut current = &blocks[0];
        loop {
            match current {
                Block::BlockQuote { children, .. } => current = &children[0][0],
                Block::OrderedList(items) | Block::UnorderedList(items) => {
                    current = &items[0].children[0];
                }
                _ => return current,
            }
        }
    }

    fn inline_depth(inlines: &[Inline]) -> usize {
        inlines
            .iter()
            .map(|inline| match inline {
                Inline::Strong(children)
                | Inline::Emphasis(children)
                | Inline::Strikethrough(children)
                | Inline::Link { children, .. }
                | Inline::InlineAttributes { children, .. } => 1 + inline_depth(children),
                _ => 1,
            })
            .max()
            .unwrap_or(0)
    }

    #[test]
    fn test_heading_and_paragraph() {
        assert_eq!(
            build("## Title\n\nSome *text* here"),
            vec![
                Block::heading(2, [Inline::text("Title")]),
                Block::paragraph([
                    Inline::text("Some "),
                    Inline::Emphasis(vec![Inline::text("text")]),
                    Inline::text(" here"),
                ]),
            ]
        );
    }

    #[test]
    fn test_fenced_code_language_is_first_word() {
        assert_eq!(
            build("```rust ignore\nfn main() {}\n```\n"),
            vec![Block::code(Some("rust"), "fn main() {}\n")]
        );
        assert_eq!(
            build("    indented\n"),
            vec![Block::code(None, "indented\n")]
        );
    }

    #[test]
    fn test_tight_list_items_become_paragraphs() {
        assert_eq!(
            build("- one\n- two\n"),
            vec![Block::UnorderedList(vec![
                ListItem::new([Block::paragraph([Inline::text("one")])]),
                ListItem::new([Block::paragraph([Inline::text("two")])]),
            ])]
        );
    }

    #[test]
    fn test_ordered_and_nested_lists() {
        let blocks = build("1. first\n   - inner\n2. second\n");
        let [Block::OrderedList(items)] = blocks.as_slice() else {
            panic!("expected ordered list, got {blocks:?}");
        };
        assert_eq!(items.len(), 2);
        assert!(matches!(
            items[0].children.as_slice(),
            [Block::Paragraph(_), Block::UnorderedList(_)]
        ));
    }

    #[test]
    fn test_task_items_carry_checkbox() {
        assert_eq!(
            build("- [x] done\n- [ ] open\n- plain\n"),
            vec![Block::UnorderedList(vec![
                ListItem::task(Checkbox::Checked, [Block::paragraph([Inline::text("done")])]),
                ListItem::task(
                    Checkbox::Unchecked,
                    [Block::paragraph([Inline::text("open")])]
                ),
                ListItem::new([Block::paragraph([Inline::text("plain")])]),
            ])]
        );
    }

    #[test]
    fn test_nested_task_does_not_leak_to_parent() {
        let blocks = build("- parent\n  - [x] child\n");
        let [Block::UnorderedList(items)] = blocks.as_slice() else {
            panic!("expected list");
        };
        assert_eq!(items[0].checkbox, None);
        let Block::UnorderedList(inner) = &items[0].children[1] else {
            panic!("expected nested list");
        };
        assert_eq!(inner[0].checkbox, Some(Checkbox::Checked));
    }

    #[test]
    fn test_alert_quote_kind() {
        assert_eq!(
            build("> [!WARNING]\n> Careful\n"),
            vec![Block::BlockQuote {
                kind: BlockQuoteKind::Warning,
                children: vec![vec![Block::paragraph([Inline::text("Careful")])]],
            }]
        );
    }

    #[test]
    fn test_quote_groups_per_block() {
        let blocks = build("> one\n>\n> two\n");
        let [Block::BlockQuote { kind, children }] = blocks.as_slice() else {
            panic!("expected quote");
        };
        assert_eq!(*kind, BlockQuoteKind::Plain);
        assert_eq!(children.len(), 2);
    }

    #[test]
    fn test_table_head_and_rows() {
        assert_eq!(
            build("| A | **B** c |\n|---|---|\n| 1 | `x` |\n"),
            vec![Block::Table {
                head: vec![
                    Inline::text("A"),
                    Inline::InlineAttributes {
                        attributes: String::new(),
                        children: vec![
                            Inline::Strong(vec![Inline::text("B")]),
                            Inline::text(" c"),
                        ],
                    },
                ],
                rows: vec![vec![vec![Inline::text("1")], vec![Inline::code("x")]]],
            }]
        );
    }

    #[test]
    fn test_links_and_images() {
        assert_eq!(
            build("[go](https://a.example) ![alt *text*](img.png) ![](pic.png \"Title\")"),
            vec![Block::paragraph([
                Inline::link(Some("https://a.example"), [Inline::text("go")]),
                Inline::text(" "),
                Inline::image("alt text", Some("img.png")),
                Inline::text(" "),
                Inline::image("Title", Some("pic.png")),
            ])]
        );
    }

    #[test]
    fn test_empty_link_destination_is_none() {
        assert_eq!(
            build("[x]()"),
            vec![Block::paragraph([Inline::link(None, [Inline::text("x")])])]
        );
    }

    #[test]
    fn test_breaks_and_rule() {
        assert_eq!(
            build("a\nb  \nc\n\n---\n"),
            vec![
                Block::paragraph([
                    Inline::text("a"),
                    Inline::SoftBreak,
                    Inline::text("b"),
                    Inline::LineBreak,
                    Inline::text("c"),
                ]),
                Block::ThematicBreak,
            ]
        );
    }

    #[test]
    fn test_html_block() {
        assert_eq!(
            build("<div>\nhi\n</div>\n"),
            vec![Block::HtmlBlock("<div>\nhi\n</div>\n".to_owned())]
        );
    }

    #[test]
    fn test_footnote_definition_is_unknown_with_source() {
        let blocks = build("Text[^1]\n\n[^1]: The note.\n");
        assert!(matches!(
            &blocks[0],
            Block::Paragraph(inlines) if inlines.contains(&Inline::Unknown("[^1]".to_owned()))
        ));
        assert_eq!(blocks[1], Block::Unknown("[^1]: The note.".to_owned()));
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn test_deep_quotes_are_capped() {
        let source = format!("{}x\n", ">".repeat(100_000));
        let blocks = build(&source);

        assert!(block_depth(&blocks) <= MAX_NESTING + 1);
        let Block::Unknown(raw) = innermost(&blocks) else {
            panic!("expected source kept past the nesting limit");
        };
        assert!(raw.ends_with('x'));
    }

    #[test]
    fn test_deep_lists_are_capped() {
        let source = format!("{}item\n", "- ".repeat(5_000));
        let blocks = build(&source);

        assert!(block_depth(&blocks) <= MAX_NESTING + 1);
        assert!(matches!(innermost(&blocks), Block::Unknown(_)));
    }

    #[test]
    fn test_shallow_nesting_is_untouched() {
        let blocks = build("> > > deep enough\n");
        assert_eq!(block_depth(&blocks), 4);
        assert_eq!(
            innermost(&blocks),
            &Block::paragraph([Inline::text("deep enough")])
        );
    }

    #[test]
    fn test_deep_emphasis_is_capped() {
        let source = format!("{}x{}", "*".repeat(2_000), "*".repeat(2_000));
        let blocks = build(&source);
        let [Block::Paragraph(inlines)] = blocks.as_slice() else {
            panic!("expected paragraph, got {} blocks", blocks.len());
        };
        assert!(inline_depth(inlines) <= MAX_NESTING + 1);
    }

    #[test]
    fn test_push_merged_joins_text() {
        let mut inlines = vec![Inline::text("a")];
        push_merged(&mut inlines, Inline::text("b"));
        push_merged(&mut inlines, Inline::SoftBreak);
        push_merged(&mut inlines, Inline::text("c"));
        assert_eq!(
            inlines,
            vec![Inline::text("ab"), Inline::SoftBreak, Inline::text("c")]
        );
    }
}
