use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::markdown::highlight::highlight;
use crate::markdown::{safe_url, Block, ListItem, Span, SpanStyle};

/// Parse Markdown (CommonMark + GFM tables, strikethrough, task lists) into blocks.
///
/// Never fails: raw HTML and anything the builder does not model comes out as
/// literal text.
pub fn parse_markdown(text: &str) -> Vec<Block> {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_TABLES);
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts.insert(Options::ENABLE_TASKLISTS);

    let mut builder = BlockBuilder::new();
    for event in Parser::new_ext(text, opts) {
        builder.event(event);
    }
    builder.finish()
}

/// Where the inline text currently being collected will end up.
#[derive(Debug, Clone, Copy, PartialEq)]
enum InlineTarget {
    Paragraph,
    Heading(u8),
    Cell,
}

struct Inline {
    target: InlineTarget,
    spans: Vec<Span>,
}

enum Container {
    Root(Vec<Block>),
    Quote(Vec<Block>),
    List { start: Option<u64>, items: Vec<ListItem> },
    Item { checked: Option<bool>, blocks: Vec<Block> },
    /// Tags we do not model (footnotes, HTML blocks, …); children are spliced into the parent.
    Passthrough(Vec<Block>),
}

#[derive(Default)]
struct TableState {
    header: Vec<Vec<Span>>,
    rows: Vec<Vec<Vec<Span>>>,
    row: Vec<Vec<Span>>,
}

struct BlockBuilder {
    containers: Vec<Container>,
    inline: Option<Inline>,
    /// Inline target to reopen after an image split the current one.
    resume: Option<InlineTarget>,
    strong: u32,
    emphasis: u32,
    strikethrough: u32,
    /// Open links; `None` marks one whose target was refused.
    links: Vec<Option<String>>,
    /// Source (if allowed) and alt text of the image being read.
    image: Option<(Option<String>, String)>,
    code: Option<(Option<String>, String)>,
    table: Option<TableState>,
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

impl BlockBuilder {
    fn new() -> Self {
        Self {
            containers: vec![Container::Root(Vec::new())],
            inline: None,
            resume: None,
            strong: 0,
            emphasis: 0,
            strikethrough: 0,
            links: Vec::new(),
            image: None,
            code: None,
            table: None,
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text, false),
            Event::Code(text) => self.text(&text, true),
            Event::Html(html) | Event::InlineHtml(html) => self.text(&html, false),
            Event::SoftBreak => self.text(" ", false),
            Event::HardBreak => self.text("\n", false),
            Event::Rule => {
                self.flush_inline();
                self.push_block(Block::Rule);
            }
            Event::TaskListMarker(checked) => {
                if let Some(Container::Item { checked: c, .. }) = self.containers.last_mut() {
                    *c = Some(checked);
                }
            }
            Event::FootnoteReference(label) => self.text(&format!("[{}]", label), false),
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                self.flush_inline();
                self.open_inline(InlineTarget::Paragraph);
            }
            Tag::Heading { level, .. } => {
                self.flush_inline();
                self.open_inline(InlineTarget::Heading(heading_level(level)));
            }
            Tag::CodeBlock(kind) => {
                self.flush_inline();
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(|s| s.to_string())
                        .filter(|s| !s.is_empty()),
                    CodeBlockKind::Indented => None,
                };
                self.code = Some((lang, String::new()));
            }
            Tag::BlockQuote { .. } => {
                self.flush_inline();
                self.containers.push(Container::Quote(Vec::new()));
            }
            Tag::List(start) => {
                self.flush_inline();
                self.containers.push(Container::List {
                    start,
                    items: Vec::new(),
                });
            }
            Tag::Item => {
                self.flush_inline();
                self.containers.push(Container::Item {
                    checked: None,
                    blocks: Vec::new(),
                });
            }
            Tag::Table(_) => {
                self.flush_inline();
                self.table = Some(TableState::default());
            }
            Tag::TableHead | Tag::TableRow => {
                if let Some(ref mut t) = self.table {
                    t.row.clear();
                }
            }
            Tag::TableCell => self.open_inline(InlineTarget::Cell),
            Tag::Emphasis => self.emphasis += 1,
            Tag::Strong => self.strong += 1,
            Tag::Strikethrough => self.strikethrough += 1,
            Tag::Link { dest_url, .. } => self.links.push(safe_url(&dest_url).map(str::to_string)),
            Tag::Image { dest_url, .. } => {
                self.image = Some((safe_url(&dest_url).map(str::to_string), String::new()));
            }
            _ => {
                self.flush_inline();
                self.containers.push(Container::Passthrough(Vec::new()));
            }
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph | TagEnd::Heading { .. } => {
                self.flush_inline();
                self.resume = None;
            }
            TagEnd::CodeBlock => {
                if let Some((lang, mut code)) = self.code.take() {
                    if code.ends_with('\n') {
                        code.pop();
                    }
                    let highlighted = lang.as_deref().and_then(|l| highlight(l, &code));
                    self.push_block(Block::CodeBlock {
                        lang,
                        code,
                        highlighted,
                    });
                }
            }
            TagEnd::Item => {
                self.flush_inline();
                self.resume = None;
                if let Some(Container::Item { checked, blocks }) = self.containers.pop() {
                    match self.containers.last_mut() {
                        Some(Container::List { items, .. }) => {
                            items.push(ListItem { checked, blocks })
                        }
                        _ => {
                            for b in blocks {
                                self.push_block(b);
                            }
                        }
                    }
                }
            }
            TagEnd::List { .. } => {
                self.flush_inline();
                if let Some(Container::List { start, items }) = self.containers.pop() {
                    self.push_block(Block::List { start, items });
                }
            }
            TagEnd::TableCell => {
                let spans = match self.inline.take() {
                    Some(inline) => trim_spans(inline.spans),
                    None => Vec::new(),
                };
                if let Some(ref mut t) = self.table {
                    t.row.push(spans);
                }
            }
            TagEnd::TableHead => {
                if let Some(ref mut t) = self.table {
                    t.header = std::mem::take(&mut t.row);
                }
            }
            TagEnd::TableRow => {
                if let Some(ref mut t) = self.table {
                    let row = std::mem::take(&mut t.row);
                    t.rows.push(row);
                }
            }
            TagEnd::Table => {
                if let Some(t) = self.table.take() {
                    self.push_block(Block::Table {
                        header: t.header,
                        rows: t.rows,
                    });
                }
            }
            TagEnd::Emphasis => self.emphasis = self.emphasis.saturating_sub(1),
            TagEnd::Strong => self.strong = self.strong.saturating_sub(1),
            TagEnd::Strikethrough => self.strikethrough = self.strikethrough.saturating_sub(1),
            TagEnd::Link => {
                self.links.pop();
            }
            TagEnd::Image => self.end_image(),
            _ => self.close_container(),
        }
    }

    /// Pops the innermost container (block quote or passthrough) into its parent.
    fn close_container(&mut self) {
        self.flush_inline();
        self.resume = None;
        if self.containers.len() <= 1 {
            return;
        }
        match self.containers.pop() {
            Some(Container::Quote(blocks)) => self.push_block(Block::Quote(blocks)),
            Some(Container::Passthrough(blocks)) => {
                for b in blocks {
                    self.push_block(b);
                }
            }
            Some(Container::Item { checked, blocks }) => {
                self.push_block(Block::List {
                    start: None,
                    items: vec![ListItem { checked, blocks }],
                });
            }
            Some(Container::List { start, items }) => self.push_block(Block::List { start, items }),
            Some(Container::Root(blocks)) => self.containers.push(Container::Root(blocks)),
            None => {}
        }
    }

    fn end_image(&mut self) {
        let Some((src, alt)) = self.image.take() else {
            return;
        };
        let Some(src) = src else {
            return;
        };
        // Tables keep their cells inline; the alt text stands in for the image.
        if self.table.is_some() {
            self.text(&alt, false);
            return;
        }
        let target = self.inline.as_ref().map(|i| i.target);
        self.flush_inline();
        self.resume = target;
        self.push_block(Block::Image { src, alt });
    }

    fn text(&mut self, text: &str, code: bool) {
        if let Some((_, ref mut alt)) = self.image {
            alt.push_str(text);
            return;
        }
        if let Some((_, ref mut buf)) = self.code {
            buf.push_str(text);
            return;
        }
        if self.inline.is_none() {
            let target = self.resume.take().unwrap_or(InlineTarget::Paragraph);
            self.open_inline(target);
        }

        let style = SpanStyle {
            strong: self.strong > 0,
            emphasis: self.emphasis > 0,
            strikethrough: self.strikethrough > 0,
            code,
        };
        let link = self.links.last().cloned().flatten();

        if let Some(ref mut inline) = self.inline {
            match inline.spans.last_mut() {
                Some(last) if last.style == style && last.link == link => last.text.push_str(text),
                _ => inline.spans.push(Span {
                    text: text.to_string(),
                    style,
                    link,
                }),
            }
        }
    }

    fn open_inline(&mut self, target: InlineTarget) {
        self.inline = Some(Inline {
            target,
            spans: Vec::new(),
        });
    }

    fn flush_inline(&mut self) {
        let Some(inline) = self.inline.take() else {
            return;
        };
        let spans = trim_spans(inline.spans);
        match inline.target {
            InlineTarget::Heading(level) => self.push_block(Block::Heading { level, spans }),
            InlineTarget::Paragraph if !spans.is_empty() => {
                self.push_block(Block::Paragraph(spans))
            }
            InlineTarget::Paragraph => {}
            InlineTarget::Cell => {
                if let Some(ref mut t) = self.table {
                    t.row.push(spans);
                }
            }
        }
    }

    fn push_block(&mut self, block: Block) {
        match self.containers.last_mut() {
            Some(Container::Root(blocks))
            | Some(Container::Quote(blocks))
            | Some(Container::Passthrough(blocks))
            | Some(Container::Item { blocks, .. }) => blocks.push(block),
            Some(Container::List { items, .. }) => items.push(ListItem {
                checked: None,
                blocks: vec![block],
            }),
            None => self.containers.push(Container::Root(vec![block])),
        }
    }

    fn finish(mut self) -> Vec<Block> {
        self.flush_inline();
        while self.containers.len() > 1 {
            self.close_container();
        }
        match self.containers.pop() {
            Some(Container::Root(blocks)) => blocks,
            _ => Vec::new(),
        }
    }
}

/// Strip leading whitespace from the first span and trailing from the last,
/// dropping spans that end up empty.
fn trim_spans(mut spans: Vec<Span>) -> Vec<Span> {
    if let Some(first) = spans.first_mut() {
        if !first.style.code {
            first.text = first.text.trim_start().to_string();
        }
    }
    if let Some(last) = spans.last_mut() {
        if !last.style.code {
            last.text = last.text.trim_end().to_string();
        }
    }
    spans.retain(|s| !s.text.is_empty());
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::{collect_links, spans_text};

    #[test]
    fn heading_and_paragraph() {
        let blocks = parse_markdown("# Hi\n\nSome *text* here.");
        assert_eq!(blocks.len(), 2);
        match &blocks[0] {
            Block::Heading { level, spans } => {
                assert_eq!(*level, 1);
                assert_eq!(spans_text(spans), "Hi");
            }
            other => panic!("expected heading, got {:?}", other),
        }
        match &blocks[1] {
            Block::Paragraph(spans) => {
                assert_eq!(spans_text(spans), "Some text here.");
                assert!(spans.iter().any(|s| s.style.emphasis && s.text == "text"));
            }
            other => panic!("expected paragraph, got {:?}", other),
        }
    }

    #[test]
    fn fenced_code_with_known_language_is_highlighted() {
        let blocks = parse_markdown("```rust\nlet x = 1;\n```\n");
        match &blocks[0] {
            Block::CodeBlock { lang, code, highlighted } => {
                assert_eq!(lang.as_deref(), Some("rust"));
                assert_eq!(code, "let x = 1;");
                assert!(highlighted.is_some());
            }
            other => panic!("expected code block, got {:?}", other),
        }
    }

    #[test]
    fn unknown_or_missing_language_stays_plain() {
        let blocks = parse_markdown("```nosuchlang\nabc\n```\n\n    indented\n");
        let plain: Vec<bool> = blocks
            .iter()
            .map(|b| matches!(b, Block::CodeBlock { highlighted: None, .. }))
            .collect();
        assert_eq!(plain, vec![true, true]);
    }

    #[test]
    fn inline_code_is_a_plain_span() {
        let blocks = parse_markdown("run `cargo test` now");
        let Block::Paragraph(spans) = &blocks[0] else { panic!() };
        let code: Vec<&Span> = spans.iter().filter(|s| s.style.code).collect();
        assert_eq!(code.len(), 1);
        assert_eq!(code[0].text, "cargo test");
    }

    #[test]
    fn links_keep_their_targets() {
        let markdown = "see [the repo](https://github.com/x/y) and **[docs](https://d.example)**";
        let blocks = parse_markdown(markdown);
        assert_eq!(collect_links(&blocks), vec!["https://github.com/x/y", "https://d.example"]);
        let Block::Paragraph(spans) = &blocks[0] else { panic!() };
        assert!(spans
            .iter()
            .any(|s| s.style.strong && s.link.as_deref() == Some("https://d.example")));
    }

    #[test]
    fn unsafe_link_targets_keep_only_their_text() {
        let blocks = parse_markdown("[click](javascript:alert(1)) and [ok](https://ok.example)");
        assert_eq!(collect_links(&blocks), vec!["https://ok.example"]);
        assert_eq!(blocks[0].plain_text(), "click and ok");
    }

    #[test]
    fn unsafe_image_sources_are_dropped() {
        let markdown = "before ![x](javascript:alert(2)) after\n\n![y](data:image/png;base64,AA)";
        let blocks = parse_markdown(markdown);
        assert!(blocks.iter().all(|b| !matches!(b, Block::Image { .. })));
        assert_eq!(blocks[0].plain_text(), "before  after");
    }

    #[test]
    fn images_split_paragraphs() {
        let blocks = parse_markdown("before ![a cat](/cat.png) after");
        assert_eq!(blocks.len(), 3);
        assert_eq!(
            blocks[1],
            Block::Image {
                src: "/cat.png".into(),
                alt: "a cat".into()
            }
        );
        assert_eq!(blocks[0].plain_text(), "before");
        assert_eq!(blocks[2].plain_text(), "after");
    }

    #[test]
    fn lone_image_is_a_single_block() {
        let blocks = parse_markdown("![shot](https://img.example/s.png)");
        assert_eq!(blocks.len(), 1);
        assert!(matches!(blocks[0], Block::Image { .. }));
    }

    #[test]
    fn raw_html_degrades_to_text() {
        let blocks = parse_markdown("<div class=\"x\">hello</div>\n");
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].plain_text().contains("<div class=\"x\">hello</div>"));
    }

    #[test]
    fn malformed_markdown_is_literal() {
        let blocks = parse_markdown("**unclosed [link](");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].plain_text(), "**unclosed [link](");
    }

    #[test]
    fn task_lists_and_nested_lists() {
        let blocks = parse_markdown("- [x] done\n- [ ] todo\n  1. nested\n");
        let Block::List { start, items } = &blocks[0] else { panic!() };
        assert_eq!(*start, None);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].checked, Some(true));
        assert_eq!(items[1].checked, Some(false));
        assert!(items[1]
            .blocks
            .iter()
            .any(|b| matches!(b, Block::List { start: Some(1), .. })));
    }

    #[test]
    fn tables_collect_header_and_rows() {
        let blocks = parse_markdown("| a | b |\n|---|---|\n| 1 | 2 |\n| 3 | 4 |\n");
        let Block::Table { header, rows } = &blocks[0] else { panic!() };
        assert_eq!(header.iter().map(|c| spans_text(c)).collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(rows.len(), 2);
        assert_eq!(spans_text(&rows[1][0]), "3");
    }

    #[test]
    fn quotes_wrap_their_blocks() {
        let blocks = parse_markdown("> quoted\n>\n> twice");
        let Block::Quote(inner) = &blocks[0] else { panic!() };
        assert_eq!(inner.len(), 2);
    }

    #[test]
    fn empty_input_is_empty() {
        assert!(parse_markdown("").is_empty());
        assert!(parse_markdown("   \n\n").is_empty());
    }
}
