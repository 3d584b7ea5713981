//! Navigation methods for `SiteApp`.
//!
//! Covers history management (`go_back`, `go_forward`, `navigate`) and the
//! asynchronous page-load lifecycle (`navigate_no_history`, `check_fetch`).
//! Mounting a page builds its `PageView`; replacing the view unmounts the
//! previous one, scene included.

use std::sync::mpsc;

use eframe::egui;

use folio::markdown::collect_images;
use folio::page::{Page, Route};
use folio::scene::SceneContext;

use super::{PageView, SiteApp};

impl SiteApp {
    /// Navigate one step back in history.
    pub fn go_back(&mut self, ctx: &egui::Context) {
        if self.history_idx > 0 && !self.loading {
            self.history_idx -= 1;
            let route = self.history[self.history_idx].clone();
            self.navigate_no_history(ctx, route);
        }
    }

    /// Navigate one step forward in history.
    pub fn go_forward(&mut self, ctx: &egui::Context) {
        if self.history_idx + 1 < self.history.len() && !self.loading {
            self.history_idx += 1;
            let route = self.history[self.history_idx].clone();
            self.navigate_no_history(ctx, route);
        }
    }

    /// Push `route` to history and start loading.
    pub fn navigate(&mut self, ctx: &egui::Context, route: Route) {
        if self.loading {
            return;
        }
        if self.history.is_empty() || self.history[self.history_idx] != route {
            // Truncate forward history before pushing
            self.history.truncate(self.history_idx + 1);
            self.history.push(route.clone());
            self.history_idx = self.history.len() - 1;
        }
        self.navigate_no_history(ctx, route);
    }

    /// Start a background page load without touching history.
    pub fn navigate_no_history(&mut self, ctx: &egui::Context, route: Route) {
        if self.loading {
            return;
        }
        self.loading = true;
        self.error = None;
        self.route_input = route.path();
        self.current = Some(route.clone());

        let (tx, rx) = mpsc::channel();
        self.fetch_rx = Some(rx);

        let engine = self.engine();
        let ctx = ctx.clone();
        std::thread::spawn(move || {
            let _ = tx.send(engine.load(&route));
            ctx.request_repaint();
        });
    }

    /// Poll the load channel and mount the page when it arrives.
    pub fn check_fetch(&mut self, ctx: &egui::Context) {
        let Some(rx) = &self.fetch_rx else {
            return;
        };
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(mpsc::TryRecvError::Empty) => return,
            Err(mpsc::TryRecvError::Disconnected) => {
                self.loading = false;
                self.fetch_rx = None;
                self.error = Some("page load was interrupted".to_string());
                return;
            }
        };
        self.loading = false;
        self.fetch_rx = None;

        match result {
            Ok(page) => self.mount(ctx, page),
            Err(e) => {
                log::warn!("{}", e);
                self.unmount();
                self.error = Some(e.to_string());
            }
        }
    }

    fn mount(&mut self, ctx: &egui::Context, page: Page) {
        self.unmount();
        ctx.send_viewport_cmd(egui::ViewportCommand::Title(page.title()));

        let assets = self.config.assets.clone();
        let view = match page {
            Page::Home(ref home) => {
                for src in home.image_sources() {
                    self.request_image(src);
                }
                let scene = SceneContext::mount_mascot(&assets);
                let mut view = PageView::new(home.sections.len(), Some(scene));
                for section in &home.sections {
                    view.scroll.track(section.heading.as_str(), 0.0);
                }
                view
            }
            Page::Listing(_) => PageView::new(0, Some(SceneContext::mount_globe(&assets))),
            Page::Post(ref post) => {
                for src in collect_images(&post.blocks) {
                    self.request_image(&src);
                }
                PageView::new(0, None)
            }
            Page::NotFound { .. } => PageView::new(0, None),
        };

        self.view = Some(view);
        self.page = Some(page);
    }

    /// Textures outlive page views; only fetch what was never uploaded.
    fn request_image(&mut self, src: &str) {
        if !self.image_textures.contains_key(src) {
            self.image_loader.request(src);
        }
    }

    /// Drop the current page and everything animating on it.
    pub fn unmount(&mut self) {
        self.page = None;
        if let Some(view) = self.view.take() {
            if let Some(scene) = view.scene {
                scene.unmount();
            }
        }
    }
}
