//! Static HTML writer for every page kind.

use std::fmt::Write;

use crate::markdown::highlight::CODE_BACKGROUND;
use crate::markdown::{safe_url, Block, CodeLine, Span, LINK_REL};
use crate::page::home::{HomePage, HomeSection};
use crate::page::{ListingPage, NavLink, Page, PostPage, Route, BLOG_DESCRIPTION, NO_POSTS};

const STYLES: &str = "\
body{margin:0;background:#232634;color:#bfdbfe;font-family:'Fira Mono',Menlo,monospace}\
main{max-width:64rem;margin:0 auto;padding:4rem 1.5rem;display:flex;flex-direction:column;\
align-items:center}\
h1,h2,h3,h4,h5,h6{color:#c6d0f5}\
a{color:#93c5fd}\
.note{font-size:.875rem;opacity:.7}\
.button{display:inline-block;margin-top:2.5rem;padding:1rem 2.5rem;border-radius:9999px;\
background:linear-gradient(to right,#fff,#fff,#bfdbfe);color:#000;font-weight:600;\
text-decoration:none}\
.section{display:flex;flex-direction:column;align-items:center;gap:3rem;padding:5rem 0}\
.section-row{display:flex;gap:6rem;align-items:center}\
.section-row.reverse{flex-direction:row-reverse}\
.section-image{width:100%;max-width:42rem;border-radius:1.5rem}\
.post-image{width:100%;border-radius:1rem;margin:1rem 0}\
article{width:100%;max-width:48rem}\
pre.code{padding:1rem;border-radius:.5rem;overflow-x:auto}\
code.inline{padding:0 .25rem;border-radius:.25rem}\
table{border-collapse:collapse}td,th{border:1px solid #626880;padding:.25rem .5rem}";

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Full standalone document for `page`.
pub fn render_html(page: &Page) -> String {
    let mut body = String::new();
    // Writing into a String cannot fail.
    let _ = match page {
        Page::Home(home) => home_html(home, &mut body),
        Page::Listing(listing) => listing_html(listing, &mut body),
        Page::Post(post) => post_html(post, &mut body),
        Page::NotFound { path } => not_found_html(path, &mut body),
    };
    let description = match page {
        Page::Listing(_) => format!(
            "<meta name=\"description\" content=\"{}\">\n",
            escape_html(BLOG_DESCRIPTION)
        ),
        _ => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
{}<title>{}</title>
<style>{}</style>
</head>
<body>
<main>
{}</main>
</body>
</html>
"#,
        description,
        escape_html(&page.title()),
        STYLES,
        body
    )
}

fn nav_link(link: &NavLink, class: &str, out: &mut String) -> std::fmt::Result {
    writeln!(
        out,
        "<a class=\"{}\" href=\"{}\">{}</a>",
        class,
        escape_html(&link.route.path()),
        escape_html(&link.label)
    )
}

fn home_html(home: &HomePage, out: &mut String) -> std::fmt::Result {
    for section in &home.sections {
        section_html(section, out)?;
    }
    writeln!(
        out,
        "<a class=\"button blog-btn\" href=\"{}\">{}</a>",
        Route::Blog.path(),
        escape_html(&home.blog_button)
    )?;
    writeln!(out, "<div class=\"note\">{}</div>", escape_html(&home.blog_note))?;
    writeln!(out, "<section class=\"contact\">")?;
    writeln!(out, "<h2><strong>{}</strong></h2>", escape_html(&home.contact_heading))?;
    for link in &home.contact {
        let external = !link.href.starts_with("mailto:");
        writeln!(
            out,
            "<p><a href=\"{}\"{}><strong>{}:</strong> <span>{}</span></a></p>",
            escape_html(&link.href),
            if external { external_attrs() } else { String::new() },
            escape_html(&link.label),
            escape_html(&link.text)
        )?;
    }
    writeln!(out, "</section>")
}

fn section_html(section: &HomeSection, out: &mut String) -> std::fmt::Result {
    writeln!(out, "<section class=\"section\">")?;
    writeln!(out, "<h2>{}</h2>", escape_html(&section.heading))?;
    writeln!(out, "<p class=\"intro\">{}</p>", escape_html(&section.intro))?;
    writeln!(
        out,
        "<div class=\"section-row{}\">",
        if section.reverse { " reverse" } else { "" }
    )?;
    writeln!(out, "<div class=\"section-text\">")?;
    blocks_html(&section.body, out)?;
    writeln!(out, "</div>")?;
    writeln!(
        out,
        "<figure><img class=\"section-image\" src=\"{}\" alt=\"{}\">\
         <figcaption>{}</figcaption></figure>",
        escape_html(&section.image.src),
        escape_html(&section.image.caption),
        escape_html(&section.image.caption)
    )?;
    writeln!(out, "</div>")?;
    writeln!(out, "</section>")
}

fn listing_html(listing: &ListingPage, out: &mut String) -> std::fmt::Result {
    writeln!(out, "<h1>{}</h1>", escape_html(&listing.title))?;
    writeln!(out, "<section><p>{}</p>", escape_html(&listing.intro))?;
    writeln!(out, "<div class=\"note\">{}</div></section>", escape_html(&listing.note))?;
    if listing.entries.is_empty() {
        writeln!(out, "<p class=\"empty\">{}</p>", NO_POSTS)?;
    }
    writeln!(out, "<ul class=\"posts\">")?;
    for entry in &listing.entries {
        writeln!(
            out,
            "<li><a href=\"{}\">{}</a><p>{}</p></li>",
            escape_html(&entry.route.path()),
            escape_html(&entry.title),
            escape_html(&entry.byline)
        )?;
    }
    writeln!(out, "</ul>")?;
    nav_link(&listing.back, "button", out)
}

fn post_html(post: &PostPage, out: &mut String) -> std::fmt::Result {
    writeln!(out, "<h1>{}</h1>", escape_html(&post.title))?;
    writeln!(out, "<p class=\"byline\">{}</p>", escape_html(&post.byline))?;
    writeln!(out, "<article>")?;
    blocks_html(&post.blocks, out)?;
    writeln!(out, "</article>")?;
    nav_link(&post.back, "button", out)
}

fn not_found_html(path: &str, out: &mut String) -> std::fmt::Result {
    writeln!(out, "<h1>404</h1>")?;
    writeln!(out, "<p>Nothing lives at <code>{}</code>.</p>", escape_html(path))?;
    writeln!(out, "<a class=\"button\" href=\"/\">← Back to Home</a>")
}

fn external_attrs() -> String {
    format!(" target=\"_blank\" rel=\"{}\"", LINK_REL)
}

/// Markdown blocks as HTML. Links open in a new tab.
pub fn blocks_html(blocks: &[Block], out: &mut String) -> std::fmt::Result {
    for block in blocks {
        block_html(block, out)?;
    }
    Ok(())
}

fn block_html(block: &Block, out: &mut String) -> std::fmt::Result {
    match block {
        Block::Heading { level, spans } => {
            let level = (*level).clamp(1, 6);
            write!(out, "<h{}>", level)?;
            spans_html(spans, out)?;
            writeln!(out, "</h{}>", level)
        }
        Block::Paragraph(spans) => {
            out.push_str("<p>");
            spans_html(spans, out)?;
            writeln!(out, "</p>")
        }
        Block::CodeBlock { lang, code, highlighted } => {
            let [r, g, b] = CODE_BACKGROUND;
            let class = lang
                .as_deref()
                .map(|l| format!(" language-{}", escape_html(l)))
                .unwrap_or_default();
            write!(
                out,
                "<pre class=\"code{}\" style=\"background:#{:02x}{:02x}{:02x}\"><code>",
                class, r, g, b
            )?;
            match highlighted {
                Some(lines) => code_lines_html(lines, out)?,
                None => out.push_str(&escape_html(code)),
            }
            writeln!(out, "</code></pre>")
        }
        Block::Image { src, alt } => match safe_url(src) {
            Some(src) => writeln!(
                out,
                "<img class=\"post-image\" src=\"{}\" alt=\"{}\">",
                escape_html(src),
                escape_html(alt)
            ),
            None => Ok(()),
        },
        Block::List { start, items } => {
            let tag = if start.is_some() { "ol" } else { "ul" };
            match start {
                Some(n) if *n != 1 => writeln!(out, "<ol start=\"{}\">", n)?,
                _ => writeln!(out, "<{}>", tag)?,
            }
            for item in items {
                out.push_str("<li>");
                if let Some(checked) = item.checked {
                    write!(
                        out,
                        "<input type=\"checkbox\" disabled{}> ",
                        if checked { " checked" } else { "" }
                    )?;
                }
                blocks_html(&item.blocks, out)?;
                writeln!(out, "</li>")?;
            }
            writeln!(out, "</{}>", tag)
        }
        Block::Quote(blocks) => {
            writeln!(out, "<blockquote>")?;
            blocks_html(blocks, out)?;
            writeln!(out, "</blockquote>")
        }
        Block::Table { header, rows } => {
            writeln!(out, "<table>")?;
            out.push_str("<thead><tr>");
            for cell in header {
                out.push_str("<th>");
                spans_html(cell, out)?;
                out.push_str("</th>");
            }
            writeln!(out, "</tr></thead>")?;
            out.push_str("<tbody>");
            for row in rows {
                out.push_str("<tr>");
                for cell in row {
                    out.push_str("<td>");
                    spans_html(cell, out)?;
                    out.push_str("</td>");
                }
                out.push_str("</tr>");
            }
            writeln!(out, "</tbody></table>")
        }
        Block::Rule => writeln!(out, "<hr>"),
    }
}

fn code_lines_html(lines: &[CodeLine], out: &mut String) -> std::fmt::Result {
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        for token in line {
            let [r, g, b] = token.color;
            write!(
                out,
                "<span style=\"color:#{:02x}{:02x}{:02x}\">{}</span>",
                r,
                g,
                b,
                escape_html(&token.text)
            )?;
        }
    }
    Ok(())
}

fn spans_html(spans: &[Span], out: &mut String) -> std::fmt::Result {
    for span in spans {
        let mut text = escape_html(&span.text);
        if span.style.code {
            text = format!("<code class=\"inline\">{}</code>", text);
        }
        if span.style.strikethrough {
            text = format!("<del>{}</del>", text);
        }
        if span.style.emphasis {
            text = format!("<em>{}</em>", text);
        }
        if span.style.strong {
            text = format!("<strong>{}</strong>", text);
        }
        match span.link.as_deref().and_then(safe_url) {
            Some(href) => write!(
                out,
                "<a href=\"{}\"{}>{}</a>",
                escape_html(href),
                external_attrs(),
                text
            )?,
            None => out.push_str(&text),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::parse_markdown;

    fn post_page(markdown: &str) -> Page {
        Page::Post(PostPage {
            title: "Hello <World>".into(),
            byline: "Ethan — 1/1/2024".into(),
            blocks: parse_markdown(markdown),
            back: NavLink::new("← See all Blogs", Route::Blog),
        })
    }

    #[test]
    fn titles_are_escaped() {
        let html = render_html(&post_page(""));
        assert!(html.contains("<title>Hello &lt;World&gt;</title>"));
        assert!(html.contains("<h1>Hello &lt;World&gt;</h1>"));
    }

    #[test]
    fn links_open_in_a_new_tab() {
        let html = render_html(&post_page("[x](https://example.com)"));
        assert!(html.contains(
            "<a href=\"https://example.com\" target=\"_blank\" rel=\"noopener noreferrer\">x</a>"
        ));
    }

    #[test]
    fn script_urls_never_reach_the_document() {
        let html = render_html(&post_page(
            "[click](javascript:alert(document.cookie)) ![x](javascript:alert(2))",
        ));
        assert!(!html.to_ascii_lowercase().contains("javascript:"));
        assert!(html.contains("<p>click</p>"));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn hand_built_blocks_are_filtered_too() {
        let blocks = vec![
            Block::Paragraph(vec![Span {
                link: Some("vbscript:msgbox".into()),
                ..Span::plain("run")
            }]),
            Block::Image {
                src: "data:text/html,hi".into(),
                alt: "x".into(),
            },
        ];
        let mut out = String::new();
        blocks_html(&blocks, &mut out).unwrap();
        assert_eq!(out, "<p>run</p>\n");
    }

    #[test]
    fn only_the_listing_carries_a_description() {
        let listing = render_html(&Page::Listing(ListingPage::new(&[])));
        let meta = format!("<meta name=\"description\" content=\"{}\">", BLOG_DESCRIPTION);
        assert!(listing.contains(&meta));
        assert!(!render_html(&post_page("")).contains("name=\"description\""));
    }

    #[test]
    fn highlighted_code_gets_coloured_spans() {
        let html = render_html(&post_page("```rust\nlet x = 1;\n```"));
        assert!(html.contains("language-rust"));
        assert!(html.contains("<span style=\"color:#"));
    }

    #[test]
    fn unknown_language_is_plain_escaped_text() {
        let html = render_html(&post_page("```klingon\na < b\n```"));
        assert!(html.contains("<code>a &lt; b</code>"));
    }

    #[test]
    fn raw_html_in_markdown_is_not_injected() {
        let html = render_html(&post_page("<script>alert(1)</script>"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn empty_listing_says_so() {
        let html = render_html(&Page::Listing(ListingPage::new(&[])));
        assert!(html.contains("No posts found."));
        assert!(html.contains("href=\"/\""));
    }

    #[test]
    fn home_page_has_every_section() {
        let html = render_html(&Page::Home(HomePage::new()));
        assert!(html.contains("<h2>Hi. I'm Ethan</h2>"));
        assert!(html.contains("section-row reverse"));
        assert!(html.contains("mailto:ethanzhangyixuan@gmail.com"));
    }
}
