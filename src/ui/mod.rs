//! Stateless egui helpers: palette, Markdown block rendering, link routing.

use std::collections::HashMap;

use eframe::egui;
use folio::markdown::highlight::CODE_BACKGROUND;
use folio::markdown::{safe_url, Block, CodeLine, Span};
use folio::page::Route;

// ─── Palette ──────────────────────────────────────────────────────────────────

pub const BACKGROUND: egui::Color32 = egui::Color32::from_rgb(0x23, 0x26, 0x34);
pub const HEADING: egui::Color32 = egui::Color32::from_rgb(0xc6, 0xd0, 0xf5);
pub const TEXT: egui::Color32 = egui::Color32::from_rgb(0xbf, 0xdb, 0xfe);
pub const LINK: egui::Color32 = egui::Color32::from_rgb(0x93, 0xc5, 0xfd);
pub const LINK_HOVER: egui::Color32 = egui::Color32::from_rgb(0x60, 0xa5, 0xfa);

/// Font size for a Markdown heading level. h4–h6 share the h3 size.
pub fn heading_size(level: u8) -> f32 {
    match level {
        1 => 28.0,
        2 => 22.0,
        _ => 18.0,
    }
}

// ─── Links ────────────────────────────────────────────────────────────────────

/// What a clicked link should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkAction {
    Navigate(Route),
    External(String),
}

/// Site-relative paths navigate in place; other allowed targets open in the
/// system browser. `None` for targets with a refused scheme.
///
/// The desktop shell has no second browsing context for paths inside the
/// site, so those stay in the window instead of opening a new one.
pub fn classify_link(href: &str) -> Option<LinkAction> {
    let href = safe_url(href)?;
    if href.starts_with('/') && !href.starts_with("//") {
        Some(LinkAction::Navigate(Route::parse(href)))
    } else {
        Some(LinkAction::External(href.to_string()))
    }
}

// ─── Blocks ───────────────────────────────────────────────────────────────────

/// Render Markdown blocks. Returns the first link clicked this frame.
pub fn render_blocks(
    ui: &mut egui::Ui,
    blocks: &[Block],
    textures: &HashMap<String, egui::TextureHandle>,
) -> Option<LinkAction> {
    let mut clicked = None;
    for block in blocks {
        render_block(ui, block, textures, &mut clicked);
    }
    clicked
}

fn render_block(
    ui: &mut egui::Ui,
    block: &Block,
    textures: &HashMap<String, egui::TextureHandle>,
    clicked: &mut Option<LinkAction>,
) {
    match block {
        Block::Heading { level, spans } => {
            let size = heading_size(*level);
            ui.horizontal_wrapped(|ui| {
                for span in spans {
                    render_span(ui, span, size, true, clicked);
                }
            });
            ui.add_space(size * 0.3);
        }
        Block::Paragraph(spans) => {
            render_spans(ui, spans, clicked);
            ui.add_space(8.0);
        }
        Block::CodeBlock { code, highlighted, .. } => {
            let [r, g, b] = CODE_BACKGROUND;
            egui::Frame::none()
                .fill(egui::Color32::from_rgb(r, g, b))
                .rounding(8.0)
                .inner_margin(12.0)
                .show(ui, |ui| {
                    ui.set_min_width(ui.available_width());
                    match highlighted {
                        Some(lines) => {
                            ui.label(code_job(lines));
                        }
                        None => {
                            ui.label(egui::RichText::new(code).monospace().color(TEXT));
                        }
                    }
                });
            ui.add_space(8.0);
        }
        Block::Image { src, alt } => {
            match textures.get(src) {
                Some(tex) => {
                    let width = ui.available_width();
                    let size = tex.size_vec2();
                    let height = if size.x > 0.0 { width * size.y / size.x } else { 0.0 };
                    ui.add(
                        egui::Image::new(tex)
                            .fit_to_exact_size(egui::vec2(width, height))
                            .rounding(16.0),
                    )
                    .on_hover_text(alt.as_str());
                }
                None => {
                    ui.colored_label(egui::Color32::GRAY, format!("[{}]", alt));
                }
            }
            ui.add_space(8.0);
        }
        Block::List { start, items } => {
            for (i, item) in items.iter().enumerate() {
                let marker = match (item.checked, start) {
                    (Some(true), _) => "\u{2611}".to_string(),
                    (Some(false), _) => "\u{2610}".to_string(),
                    (None, Some(n)) => format!("{}.", n + i as u64),
                    (None, None) => "\u{2022}".to_string(),
                };
                ui.horizontal_top(|ui| {
                    ui.label(egui::RichText::new(marker).color(TEXT));
                    ui.vertical(|ui| {
                        for b in &item.blocks {
                            render_block(ui, b, textures, clicked);
                        }
                    });
                });
            }
            ui.add_space(4.0);
        }
        Block::Quote(blocks) => {
            ui.horizontal_top(|ui| {
                let (rect, _) = ui.allocate_exact_size(egui::vec2(3.0, 18.0), egui::Sense::hover());
                ui.painter().rect_filled(rect, 1.0, LINK);
                ui.vertical(|ui| {
                    for b in blocks {
                        render_block(ui, b, textures, clicked);
                    }
                });
            });
        }
        Block::Table { header, rows } => {
            egui::Grid::new(ui.next_auto_id()).striped(true).show(ui, |ui| {
                for cell in header {
                    let text = folio::markdown::spans_text(cell);
                    ui.label(egui::RichText::new(text).strong().color(HEADING));
                }
                ui.end_row();
                for row in rows {
                    for cell in row {
                        render_spans(ui, cell, clicked);
                    }
                    ui.end_row();
                }
            });
            ui.add_space(8.0);
        }
        Block::Rule => {
            ui.separator();
        }
    }
}

/// Inline spans laid out as wrapped text.
pub fn render_spans(ui: &mut egui::Ui, spans: &[Span], clicked: &mut Option<LinkAction>) {
    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing.x = 0.0;
        for span in spans {
            render_span(ui, span, 16.0, false, clicked);
        }
    });
}

fn render_span(
    ui: &mut egui::Ui,
    span: &Span,
    size: f32,
    heading: bool,
    clicked: &mut Option<LinkAction>,
) {
    let mut rt = egui::RichText::new(&span.text).size(size);
    rt = if heading { rt.strong().color(HEADING) } else { rt.color(TEXT) };
    if span.style.strong {
        rt = rt.strong();
    }
    if span.style.emphasis {
        rt = rt.italics();
    }
    if span.style.strikethrough {
        rt = rt.strikethrough();
    }
    if span.style.code {
        rt = rt.code();
    }

    match span.link {
        Some(ref href) => {
            let link =
                ui.add(egui::Label::new(rt.color(LINK).underline()).sense(egui::Sense::click()));
            if link.clicked() && clicked.is_none() {
                *clicked = classify_link(href);
            }
            link.on_hover_cursor(egui::CursorIcon::PointingHand).on_hover_text(href.as_str());
        }
        None => {
            ui.label(rt);
        }
    }
}

fn code_job(lines: &[CodeLine]) -> egui::text::LayoutJob {
    let mut job = egui::text::LayoutJob::default();
    let font = egui::FontId::monospace(14.0);
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            job.append("\n", 0.0, egui::TextFormat::simple(font.clone(), TEXT));
        }
        for token in line {
            let [r, g, b] = token.color;
            job.append(
                &token.text,
                0.0,
                egui::TextFormat::simple(font.clone(), egui::Color32::from_rgb(r, g, b)),
            );
        }
    }
    job
}

// ─── Text utilities ───────────────────────────────────────────────────────────

/// Truncate `s` to at most `max_chars` Unicode scalar values, appending `"..."` if truncated.
pub fn truncate_str(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let t: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", t)
    }
}
