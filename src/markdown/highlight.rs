//! Syntax colouring for fenced code blocks.
//!
//! Backed by syntect's bundled grammars and the `base16-ocean.dark` theme.
//! Syntaxes and themes are loaded once per process.

use std::sync::OnceLock;

use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::markdown::{CodeLine, CodeToken};

const THEME: &str = "base16-ocean.dark";

/// Background colour of highlighted blocks (matches the theme).
pub const CODE_BACKGROUND: [u8; 3] = [43, 48, 59];

static SYNTAXES: OnceLock<SyntaxSet> = OnceLock::new();
static THEME_SET: OnceLock<ThemeSet> = OnceLock::new();

fn syntaxes() -> &'static SyntaxSet {
    SYNTAXES.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme() -> Option<&'static Theme> {
    let ts = THEME_SET.get_or_init(ThemeSet::load_defaults);
    ts.themes.get(THEME).or_else(|| ts.themes.values().next())
}

/// Map common fence tags onto tokens the bundled grammars know.
fn token_for(lang: &str) -> String {
    match lang.to_lowercase().as_str() {
        "ts" | "typescript" | "tsx" | "jsx" | "javascript" => "js".to_string(),
        "shell" | "zsh" | "console" => "bash".to_string(),
        "py3" | "python3" => "py".to_string(),
        "rust" => "rs".to_string(),
        "c++" => "cpp".to_string(),
        "csharp" | "c#" => "cs".to_string(),
        other => other.to_string(),
    }
}

fn find_syntax(lang: &str) -> Option<&'static SyntaxReference> {
    let token = token_for(lang);
    if token.is_empty() {
        return None;
    }
    syntaxes().find_syntax_by_token(&token)
}

/// Whether `lang` names a grammar we can colour.
pub fn recognizes(lang: &str) -> bool {
    find_syntax(lang).is_some()
}

/// Colour `code` as `lang`. `None` when the language is unknown or the
/// grammar fails part-way; callers then show the code as plain text.
pub fn highlight(lang: &str, code: &str) -> Option<Vec<CodeLine>> {
    let syntax = find_syntax(lang)?;
    let mut h = HighlightLines::new(syntax, theme()?);

    let mut lines = Vec::new();
    for line in LinesWithEndings::from(code) {
        let ranges = h.highlight_line(line, syntaxes()).ok()?;
        let tokens: CodeLine = ranges
            .into_iter()
            .map(|(style, text)| CodeToken {
                text: text.trim_end_matches(['\n', '\r']).to_string(),
                color: [style.foreground.r, style.foreground.g, style.foreground.b],
            })
            .filter(|t| !t.text.is_empty())
            .collect();
        lines.push(tokens);
    }
    Some(lines)
}
