//! Content-area rendering for `SiteApp`.
//!
//! - `draw_content`: dispatcher (spinner, error, page views), then feeds
//!   the scroll offset and frame time to the page's animations
//! - one free function per page kind

use std::collections::HashMap;
use std::time::Duration;

use eframe::egui;

use folio::anim::hover::{normalized_offset, ImageTilt};
use folio::anim::scroll::Pose;
use folio::page::home::{HomePage, HomeSection};
use folio::page::{ListingPage, NavLink, Page, PostPage, Route, NO_POSTS};

use super::scene::{paint_scene, tilted_image_mesh};
use super::{PageView, SiteApp};
use crate::ui::{
    classify_link, heading_size, render_blocks, LinkAction, HEADING, LINK, LINK_HOVER, TEXT,
};

const MAX_WIDTH: f32 = 960.0;
/// Space below each home section; the entrance offset is taken out of it.
const SECTION_GAP: f32 = 96.0;

type Textures = HashMap<String, egui::TextureHandle>;

impl SiteApp {
    /// Render the central content panel.
    pub fn draw_content(&mut self, ui: &mut egui::Ui, ctx: &egui::Context, dt: Duration) {
        if let Some(ref error) = self.error {
            let mut go_home = false;
            ui.vertical_centered(|ui| {
                ui.add_space(120.0);
                ui.colored_label(egui::Color32::from_rgb(255, 120, 120), error);
                ui.add_space(16.0);
                go_home = ui.link("← Back to Home").clicked();
            });
            if go_home {
                self.navigate(ctx, Route::Home);
            }
            return;
        }

        let pointer = ctx.input(|i| i.pointer.latest_pos());
        let pointer_moved = ctx.input(|i| i.pointer.delta() != egui::Vec2::ZERO);
        let panel = ui.max_rect();

        let action = {
            let SiteApp {
                page,
                view,
                image_textures,
                ..
            } = self;
            let (Some(page), Some(view)) = (page.as_ref(), view.as_mut()) else {
                ui.centered_and_justified(|ui| {
                    ui.spinner();
                });
                return;
            };

            if let Some(scene) = view.scene.as_mut() {
                scene.scrolled(view.scroll_y);
                paint_scene(ui.painter(), scene, panel, pointer);
            }

            let output = egui::ScrollArea::vertical()
                .id_salt("page")
                .auto_shrink(false)
                .show(ui, |ui| {
                    centered_column(ui, |ui| match page {
                        Page::Home(home) => {
                            home_view(ui, home, view, image_textures, pointer_moved)
                        }
                        Page::Listing(listing) => listing_view(ui, listing),
                        Page::Post(post) => post_view(ui, post, image_textures),
                        Page::NotFound { path } => not_found_view(ui, path),
                    })
                });

            view.scroll_y = output.state.offset.y;
            view.scroll.set_viewport_height(output.inner_rect.height());
            view.scroll.on_scroll(view.scroll_y);
            view.scroll.tick(dt);
            for tilt in &mut view.tilts {
                tilt.advance(dt);
            }
            view.shake.advance(dt);

            output.inner
        };

        match action {
            Some(LinkAction::Navigate(route)) => self.navigate(ctx, route),
            Some(LinkAction::External(href)) => {
                log::info!("opening {}", href);
                ctx.open_url(egui::OpenUrl::new_tab(href));
            }
            None => {}
        }
    }
}

fn centered_column<R>(ui: &mut egui::Ui, add: impl FnOnce(&mut egui::Ui) -> R) -> R {
    let width = ui.available_width().min(MAX_WIDTH);
    let margin = ((ui.available_width() - width) / 2.0).max(0.0);
    ui.horizontal(|ui| {
        ui.add_space(margin);
        ui.vertical(|ui| {
            ui.set_width(width);
            add(ui)
        })
        .inner
    })
    .inner
}

fn keep_first(action: &mut Option<LinkAction>, clicked: Option<LinkAction>) {
    if action.is_none() {
        *action = clicked;
    }
}

fn nav_link(ui: &mut egui::Ui, link: &NavLink) -> Option<LinkAction> {
    let response = ui.add(
        egui::Label::new(egui::RichText::new(&link.label).size(16.0).color(LINK))
            .sense(egui::Sense::click()),
    );
    let clicked = response.clicked();
    response.on_hover_cursor(egui::CursorIcon::PointingHand);
    clicked.then(|| LinkAction::Navigate(link.route.clone()))
}

fn title(ui: &mut egui::Ui, text: &str) {
    ui.label(egui::RichText::new(text).size(heading_size(1)).strong().color(HEADING));
}

// ── Home ─────────────────────────────────────────────────────────────────────

fn home_view(
    ui: &mut egui::Ui,
    home: &HomePage,
    view: &mut PageView,
    textures: &Textures,
    pointer_moved: bool,
) -> Option<LinkAction> {
    let content_top = ui.min_rect().top();
    let mut action = None;
    ui.add_space(64.0);

    for (i, section) in home.sections.iter().enumerate() {
        let pose = view.scroll.section_pose(i);
        let image_pose = view.scroll.image_pose(i);
        let heading = view.scroll.heading_text(i);
        let Some(tilt) = view.tilts.get_mut(i) else {
            continue;
        };

        let lift = pose.offset_y.max(0.0);
        let top = ui.cursor().top();
        let mut image_rect = egui::Rect::NOTHING;
        let response = ui.scope(|ui| {
            ui.set_opacity(pose.opacity);
            ui.add_space(lift);
            ui.columns(2, |cols| {
                let (text_col, image_col) = if section.reverse { (1, 0) } else { (0, 1) };
                let clicked = section_text(&mut cols[text_col], section, heading, textures);
                keep_first(&mut action, clicked);
                image_rect = section_image(
                    &mut cols[image_col],
                    section,
                    image_pose,
                    tilt,
                    textures,
                    pointer_moved,
                );
            });
        });

        let height = response.response.rect.height() - lift;
        view.scroll.set_section_bounds(i, top - content_top, height);
        if image_rect.is_positive() {
            view.scroll
                .set_image_bounds(i, image_rect.top() - lift - content_top, image_rect.height());
        }
        ui.add_space(SECTION_GAP - lift.min(SECTION_GAP));
    }

    keep_first(&mut action, blog_button(ui, home, view));
    ui.add_space(SECTION_GAP);
    keep_first(&mut action, contact(ui, home));
    ui.add_space(SECTION_GAP);
    action
}

fn section_text(
    ui: &mut egui::Ui,
    section: &HomeSection,
    heading: &str,
    textures: &Textures,
) -> Option<LinkAction> {
    // A blank heading still takes its line so the layout does not jump.
    let shown = if heading.is_empty() { " " } else { heading };
    title(ui, shown);
    ui.add_space(8.0);
    ui.label(egui::RichText::new(&section.intro).size(18.0).color(TEXT));
    ui.add_space(8.0);
    render_blocks(ui, &section.body, textures)
}

/// Lays out the section image and paints it with the scroll and tilt poses.
/// Returns the laid-out rect before either pose is applied.
fn section_image(
    ui: &mut egui::Ui,
    section: &HomeSection,
    pose: Pose,
    tilt: &mut ImageTilt,
    textures: &Textures,
    pointer_moved: bool,
) -> egui::Rect {
    let width = ui.available_width() * 0.9;
    let texture = textures.get(&section.image.src);
    let height = match texture {
        Some(tex) if tex.size_vec2().x > 0.0 => width * tex.size_vec2().y / tex.size_vec2().x,
        _ => width * 0.6,
    };
    let (rect, response) = ui.allocate_exact_size(egui::vec2(width, height), egui::Sense::hover());

    match response.hover_pos() {
        Some(pos) if pointer_moved => tilt.pointer_at(normalized_offset(
            [rect.min.x, rect.min.y],
            [rect.width(), rect.height()],
            [pos.x, pos.y],
        )),
        Some(_) => {}
        None => tilt.pointer_left(),
    }

    let painted = rect.translate(egui::vec2(0.0, pose.offset_y));
    let alpha = (pose.opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    match texture {
        Some(tex) => {
            let tilt_pose = tilt.pose();
            let mesh = tilted_image_mesh(
                tex.id(),
                painted,
                pose.scale * tilt_pose.scale_boost(),
                tilt_pose,
                egui::Color32::from_white_alpha(alpha),
            );
            ui.painter().add(egui::Shape::mesh(mesh));
        }
        None => {
            let placeholder =
                egui::Rect::from_center_size(painted.center(), painted.size() * pose.scale);
            ui.painter()
                .rect_filled(placeholder, 16.0, egui::Color32::from_black_alpha(alpha / 2));
        }
    }

    // The scaled image overhangs its rect.
    ui.add_space(height * 0.08);
    ui.label(egui::RichText::new(&section.image.caption).small().italics().color(TEXT));
    rect
}

fn blog_button(ui: &mut egui::Ui, home: &HomePage, view: &mut PageView) -> Option<LinkAction> {
    let offset = view.shake.offset();
    ui.vertical_centered(|ui| {
        let (rect, _) = ui.allocate_exact_size(egui::vec2(240.0, 48.0), egui::Sense::hover());
        view.shake.set_hovered(ui.rect_contains_pointer(rect));
        let label = egui::RichText::new(&home.blog_button).size(18.0).color(HEADING);
        let button = egui::Button::new(label)
            .fill(egui::Color32::from_rgb(0x41, 0x45, 0x59))
            .rounding(24.0);
        let clicked = ui.put(rect.translate(egui::vec2(0.0, offset)), button).clicked();
        ui.add_space(8.0);
        ui.label(egui::RichText::new(&home.blog_note).small().color(TEXT));
        clicked.then_some(LinkAction::Navigate(Route::Blog))
    })
    .inner
}

fn contact(ui: &mut egui::Ui, home: &HomePage) -> Option<LinkAction> {
    let mut action = None;
    ui.label(
        egui::RichText::new(&home.contact_heading)
            .size(heading_size(2))
            .strong()
            .color(HEADING),
    );
    ui.add_space(8.0);
    for link in &home.contact {
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(format!("{}:", link.label)).color(TEXT));
            let response = ui.add(
                egui::Label::new(egui::RichText::new(&link.text).color(LINK).underline())
                    .sense(egui::Sense::click()),
            );
            if response.clicked() && action.is_none() {
                action = classify_link(&link.href);
            }
            response
                .on_hover_cursor(egui::CursorIcon::PointingHand)
                .on_hover_text(link.href.as_str());
        });
    }
    action
}

// ── Listing ──────────────────────────────────────────────────────────────────

fn listing_view(ui: &mut egui::Ui, listing: &ListingPage) -> Option<LinkAction> {
    ui.add_space(32.0);
    let mut action = nav_link(ui, &listing.back);
    ui.add_space(16.0);
    title(ui, &listing.title);
    ui.label(egui::RichText::new(&listing.intro).size(16.0).color(TEXT));
    ui.label(egui::RichText::new(&listing.note).small().italics().color(TEXT));
    ui.add_space(24.0);

    if listing.entries.is_empty() {
        ui.label(egui::RichText::new(NO_POSTS).color(TEXT));
    }
    for entry in &listing.entries {
        egui::Frame::none()
            .fill(egui::Color32::from_black_alpha(110))
            .rounding(12.0)
            .inner_margin(16.0)
            .show(ui, |ui| {
                ui.set_min_width(ui.available_width());
                let response = ui.add(
                    egui::Label::new(
                        egui::RichText::new(&entry.title).size(20.0).strong().color(LINK),
                    )
                    .sense(egui::Sense::click()),
                );
                if response.hovered() {
                    ui.painter().hline(
                        response.rect.x_range(),
                        response.rect.bottom(),
                        egui::Stroke::new(1.0, LINK_HOVER),
                    );
                }
                if response.clicked() && action.is_none() {
                    action = Some(LinkAction::Navigate(entry.route.clone()));
                }
                response.on_hover_cursor(egui::CursorIcon::PointingHand);
                ui.label(egui::RichText::new(&entry.byline).small().color(TEXT));
            });
        ui.add_space(12.0);
    }
    ui.add_space(48.0);
    action
}

// ── Post ─────────────────────────────────────────────────────────────────────

fn post_view(ui: &mut egui::Ui, post: &PostPage, textures: &Textures) -> Option<LinkAction> {
    ui.add_space(32.0);
    let mut action = nav_link(ui, &post.back);
    ui.add_space(16.0);
    title(ui, &post.title);
    ui.label(egui::RichText::new(&post.byline).small().color(TEXT));
    ui.separator();
    ui.add_space(8.0);
    keep_first(&mut action, render_blocks(ui, &post.blocks, textures));
    ui.add_space(48.0);
    action
}

fn not_found_view(ui: &mut egui::Ui, path: &str) -> Option<LinkAction> {
    ui.add_space(120.0);
    ui.vertical_centered(|ui| {
        title(ui, "Page not found");
        ui.label(egui::RichText::new(path).monospace().color(TEXT));
        ui.add_space(16.0);
        nav_link(ui, &NavLink::new("← Back to Home", Route::Home))
    })
    .inner
}
