//! Toolbar rendering for `SiteApp`.
//!
//! Back/forward buttons, the route field and the load status.

use eframe::egui;

use folio::page::Route;

use super::SiteApp;
use crate::ui::truncate_str;

const BUTTON_SIZE: egui::Vec2 = egui::vec2(28.0, 24.0);

impl SiteApp {
    /// Render the top toolbar strip.
    pub fn draw_toolbar(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.horizontal(|ui| {
            ui.add_space(4.0);

            // Back / Forward
            let can_back = self.history_idx > 0 && !self.loading;
            let can_fwd = self.history_idx + 1 < self.history.len() && !self.loading;
            if ui
                .add_enabled(can_back, egui::Button::new("\u{25C0}").min_size(BUTTON_SIZE))
                .clicked()
            {
                self.go_back(ctx);
            }
            if ui
                .add_enabled(can_fwd, egui::Button::new("\u{25B6}").min_size(BUTTON_SIZE))
                .clicked()
            {
                self.go_forward(ctx);
            }

            // Route field
            let response = ui.add_sized(
                [(ui.available_width() - 200.0).max(80.0), 24.0],
                egui::TextEdit::singleline(&mut self.route_input)
                    .hint_text("/blog/some-post")
                    .font(egui::TextStyle::Monospace),
            );
            let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if submitted || ui.button("Go").clicked() {
                let route = Route::parse(&self.route_input);
                self.navigate(ctx, route);
            }

            if self.loading {
                ui.spinner();
            } else if let Some(ref page) = self.page {
                ui.label(egui::RichText::new(truncate_str(&page.title(), 24)).weak());
            }
        });
    }
}
