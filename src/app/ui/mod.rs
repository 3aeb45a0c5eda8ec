// src/app/ui/mod.rs
pub mod dialogs;
pub mod grid;
pub mod sidebar;
pub mod timeline;

use eframe::egui as eg;

use crate::app::filters::{classify_empty, EmptyReason};
use crate::app::types::View;

impl crate::app::KinofyApp {
    pub(crate) fn ui_render_header(&mut self, ctx: &eg::Context) {
        eg::TopBottomPanel::top("app_header").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.heading("Kinofy");
                ui.separator();

                let mut pick = self.view;
                ui.selectable_value(&mut pick, View::Library, "Library");
                ui.selectable_value(&mut pick, View::Timeline, "📊 Timeline");
                if pick != self.view {
                    self.set_view(pick);
                }

                ui.with_layout(eg::Layout::right_to_left(eg::Align::Center), |ui| {
                    if !self.status.is_empty() {
                        ui.label(eg::RichText::new(&self.status).weak());
                    }
                });
            });
            ui.add_space(4.0);
        });
    }

    pub(crate) fn ui_render_splash(&self, ui: &mut eg::Ui) {
        ui.vertical_centered(|ui| {
            ui.add_space(40.0);
            ui.heading("Preparing your collection…");
            ui.add(eg::Spinner::new().size(16.0));
            ui.separator();
            if !self.status.is_empty() {
                ui.label(&self.status);
            }
            ui.add_space(8.0);
            ui.label("First runs fetch a starter catalog; later launches load instantly.");
            ui.monospace(format!(
                "Cache: {}",
                crate::app::cache::cache_dir().display()
            ));
        });
    }

    pub(crate) fn ui_render_library(&mut self, ui: &mut eg::Ui, ctx: &eg::Context) {
        if self.visible.is_empty() {
            self.ui_render_empty_state(ui);
        } else {
            self.ui_render_grid(ui, ctx);
        }
    }

    fn ui_render_empty_state(&mut self, ui: &mut eg::Ui) {
        let reason = classify_empty(&self.filter);
        ui.vertical_centered(|ui| {
            ui.add_space(60.0);
            match reason {
                EmptyReason::NoSearchResults => {
                    ui.heading("🔍 No search results");
                    ui.label(format!(
                        "Nothing matches \"{}\".",
                        self.filter.search_text
                    ));
                }
                EmptyReason::NoFilterResults => {
                    ui.heading("🎚 No movies match the current filters");
                    ui.label("Try widening the rating range or picking another genre.");
                }
                EmptyReason::NoMovies => {
                    ui.heading("🎬 Your collection is empty");
                    ui.label("Add a movie from the panel on the left to get started.");
                }
            }
            if !matches!(reason, EmptyReason::NoMovies) {
                ui.add_space(12.0);
                if ui.button("Clear filters").clicked() {
                    self.filter.reset();
                    self.on_filter_changed();
                }
            }
        });
    }
}
