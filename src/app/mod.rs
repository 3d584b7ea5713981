//! `SiteApp`, the top-level egui application state.
//!
//! This module declares the `SiteApp` struct and its `eframe::App` impl.
//! The rest of the methods are split across the sibling sub-modules:
//!
//! - `navigation`: history, background page loads, mount/unmount
//! - `toolbar`: back/forward and the route field
//! - `content`: page views and their animations
//! - `scene`: painting the 3D scene behind the page

pub mod content;
pub mod navigation;
pub mod scene;
pub mod toolbar;

use std::collections::HashMap;
use std::sync::mpsc;
use std::time::Instant;

use eframe::egui;

use folio::anim::hover::{ButtonShake, ImageTilt};
use folio::anim::scroll::ScrollAnimationController;
use folio::config::ViewConfig;
use folio::engine::SiteEngine;
use folio::error::PageError;
use folio::net::content::ContentClient;
use folio::net::image::ImageLoader;
use folio::page::{Page, Route};
use folio::scene::SceneContext;

/// Animation state that lives exactly as long as one page view.
pub struct PageView {
    pub scroll: ScrollAnimationController,
    pub tilts: Vec<ImageTilt>,
    pub shake: ButtonShake,
    pub scene: Option<SceneContext>,
    pub scroll_y: f32,
}

impl PageView {
    pub fn new(section_count: usize, scene: Option<SceneContext>) -> Self {
        Self {
            scroll: ScrollAnimationController::new(800.0),
            tilts: (0..section_count).map(|_| ImageTilt::new()).collect(),
            shake: ButtonShake::new(),
            scene,
            scroll_y: 0.0,
        }
    }

    /// True while something on the page still needs frames.
    pub fn is_animating(&self) -> bool {
        self.scene.is_some()
            || self.scroll.is_animating()
            || self.shake.is_moving()
            || self.tilts.iter().any(ImageTilt::is_moving)
    }
}

pub struct SiteApp {
    pub config: ViewConfig,
    pub route_input: String,
    pub current: Option<Route>,
    pub page: Option<Page>,
    pub view: Option<PageView>,
    pub error: Option<String>,
    pub loading: bool,
    pub fetch_rx: Option<mpsc::Receiver<Result<Page, PageError>>>,
    // History (back / forward)
    pub history: Vec<Route>,
    pub history_idx: usize,
    // Image loading
    pub image_loader: ImageLoader,
    pub image_textures: HashMap<String, egui::TextureHandle>,
    pub last_frame: Instant,
}

impl SiteApp {
    pub fn new(config: ViewConfig) -> Self {
        Self {
            route_input: config.start.path(),
            image_loader: ImageLoader::new(config.assets.clone()),
            config,
            current: None,
            page: None,
            view: None,
            error: None,
            loading: false,
            fetch_rx: None,
            history: Vec::new(),
            history_idx: 0,
            image_textures: HashMap::new(),
            last_frame: Instant::now(),
        }
    }

    fn engine(&self) -> SiteEngine {
        SiteEngine::new(ContentClient::new(self.config.api_base.as_deref()))
    }

    /// Turn finished image downloads into textures.
    fn upload_images(&mut self, ctx: &egui::Context) {
        self.image_loader.poll();
        for src in self.image_loader.ready() {
            if let Some(data) = self.image_loader.take(&src) {
                let image = egui::ColorImage::from_rgba_unmultiplied(
                    [data.width as usize, data.height as usize],
                    &data.rgba,
                );
                let tex =
                    ctx.load_texture(format!("img_{}", src), image, egui::TextureOptions::LINEAR);
                self.image_textures.insert(src, tex);
            }
        }
    }
}

impl eframe::App for SiteApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.current.is_none() && !self.loading {
            let start = self.config.start.clone();
            self.navigate(ctx, start);
        }
        self.check_fetch(ctx);
        self.upload_images(ctx);

        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).min(std::time::Duration::from_millis(100));
        self.last_frame = now;

        ctx.set_visuals(egui::Visuals::dark());

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui, ctx);
        });

        let ctx_clone = ctx.clone();
        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(crate::ui::BACKGROUND))
            .show(ctx, |ui| {
                self.draw_content(ui, &ctx_clone, dt);
            });

        if self.loading || self.image_loader.pending_count() > 0 {
            ctx.request_repaint_after(std::time::Duration::from_millis(50));
        }
        if self.view.as_ref().is_some_and(PageView::is_animating) {
            ctx.request_repaint();
        }
    }
}
