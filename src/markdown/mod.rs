pub mod highlight;
pub mod parser;

pub use parser::parse_markdown;

/// `rel` attached to every link; links always open in a new browsing context.
pub const LINK_REL: &str = "noopener noreferrer";

const SAFE_SCHEMES: [&str; 4] = ["http", "https", "mailto", "tel"];

/// `url` if it is relative or uses an allowed scheme (http, https, mailto, tel).
///
/// A colon before the first `/`, `?` or `#` marks a scheme; anything else is
/// a relative reference.
pub fn safe_url(url: &str) -> Option<&str> {
    let end = url.find(['/', '?', '#']).unwrap_or(url.len());
    match url[..end].find(':') {
        None => Some(url),
        Some(colon) => {
            let scheme = &url[..colon];
            SAFE_SCHEMES
                .iter()
                .any(|s| s.eq_ignore_ascii_case(scheme))
                .then_some(url)
        }
    }
}

/// Inline styling flags for a run of text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpanStyle {
    pub strong: bool,
    pub emphasis: bool,
    pub strikethrough: bool,
    /// Inline code span (`like this`). Always plain, never highlighted.
    pub code: bool,
}

/// A run of inline text with one style and at most one link target.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub text: String,
    pub style: SpanStyle,
    pub link: Option<String>,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: SpanStyle::default(),
            link: None,
        }
    }
}

/// One coloured token of a highlighted code line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeToken {
    pub text: String,
    pub color: [u8; 3],
}

pub type CodeLine = Vec<CodeToken>;

#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    /// `Some` for GFM task list items.
    pub checked: Option<bool>,
    pub blocks: Vec<Block>,
}

/// A typed visual block produced from Markdown.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading {
        level: u8,
        spans: Vec<Span>,
    },
    Paragraph(Vec<Span>),
    CodeBlock {
        lang: Option<String>,
        code: String,
        /// Present only when the language tag is recognised.
        highlighted: Option<Vec<CodeLine>>,
    },
    /// Full-width, rounded-corner image.
    Image {
        src: String,
        alt: String,
    },
    List {
        /// Start number for ordered lists, `None` for bullets.
        start: Option<u64>,
        items: Vec<ListItem>,
    },
    Quote(Vec<Block>),
    Table {
        header: Vec<Vec<Span>>,
        rows: Vec<Vec<Vec<Span>>>,
    },
    Rule,
}

impl Block {
    /// Concatenated text of this block and everything inside it.
    pub fn plain_text(&self) -> String {
        match self {
            Block::Heading { spans, .. } | Block::Paragraph(spans) => spans_text(spans),
            Block::CodeBlock { code, .. } => code.clone(),
            Block::Image { alt, .. } => alt.clone(),
            Block::List { items, .. } => items
                .iter()
                .flat_map(|i| i.blocks.iter().map(Block::plain_text))
                .collect::<Vec<_>>()
                .join("\n"),
            Block::Quote(blocks) => blocks
                .iter()
                .map(Block::plain_text)
                .collect::<Vec<_>>()
                .join("\n"),
            Block::Table { header, rows } => header
                .iter()
                .chain(rows.iter().flatten())
                .map(|cell| spans_text(cell))
                .collect::<Vec<_>>()
                .join(" "),
            Block::Rule => String::new(),
        }
    }
}

pub fn spans_text(spans: &[Span]) -> String {
    spans.iter().map(|s| s.text.as_str()).collect()
}

/// Every link target in a block list, in document order.
pub fn collect_links(blocks: &[Block]) -> Vec<String> {
    let mut out = Vec::new();
    for block in blocks {
        collect_block_links(block, &mut out);
    }
    out
}

fn collect_span_links(spans: &[Span], out: &mut Vec<String>) {
    for span in spans {
        if let Some(ref href) = span.link {
            if out.last() != Some(href) {
                out.push(href.clone());
            }
        }
    }
}

fn collect_block_links(block: &Block, out: &mut Vec<String>) {
    match block {
        Block::Heading { spans, .. } | Block::Paragraph(spans) => collect_span_links(spans, out),
        Block::Table { header, rows } => {
            for cell in header.iter().chain(rows.iter().flatten()) {
                collect_span_links(cell, out);
            }
        }
        Block::List { items, .. } => {
            for item in items {
                for b in &item.blocks {
                    collect_block_links(b, out);
                }
            }
        }
        Block::Quote(blocks) => {
            for b in blocks {
                collect_block_links(b, out);
            }
        }
        Block::CodeBlock { .. } | Block::Image { .. } | Block::Rule => {}
    }
}

/// Image sources in a block list, in document order.
pub fn collect_images(blocks: &[Block]) -> Vec<String> {
    let mut out = Vec::new();
    for block in blocks {
        match block {
            Block::Image { src, .. } => out.push(src.clone()),
            Block::List { items, .. } => {
                for item in items {
                    out.extend(collect_images(&item.blocks));
                }
            }
            Block::Quote(blocks) => out.extend(collect_images(blocks)),
            _ => {}
        }
    }
    out
}
