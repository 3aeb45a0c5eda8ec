// src/app/ui/sidebar.rs
use eframe::egui as eg;

use crate::app::filters::{SortKey, ALL_GENRES};

impl crate::app::KinofyApp {
    // ---------- FILTER PANEL + ADD MOVIE ----------
    pub(crate) fn ui_render_sidebar(&mut self, ui: &mut eg::Ui) {
        ui.add_space(6.0);
        ui.label(eg::RichText::new("Search").strong());
        ui.horizontal(|ui| {
            let resp = ui.add(
                eg::TextEdit::singleline(&mut self.filter.search_text)
                    .hint_text("Title or notes…")
                    .desired_width(170.0),
            );
            if resp.changed() {
                self.on_search_edited();
            }
            if !self.filter.search_text.is_empty() && ui.small_button("✕").clicked() {
                self.filter.search_text.clear();
                self.on_search_edited();
            }
        });

        ui.separator();

        ui.label(eg::RichText::new("Genre").strong());
        let mut changed = false;
        eg::ComboBox::from_id_source("genre_filter_combo")
            .selected_text(self.filter.genre.clone())
            .width(180.0)
            .show_ui(ui, |ui| {
                if ui
                    .selectable_value(&mut self.filter.genre, ALL_GENRES.to_string(), ALL_GENRES)
                    .clicked()
                {
                    changed = true;
                }
                for genre in self.genres.clone() {
                    if ui
                        .selectable_value(&mut self.filter.genre, genre.clone(), &genre)
                        .clicked()
                    {
                        changed = true;
                    }
                }
            });
        if changed {
            self.on_filter_changed();
        }

        ui.separator();

        ui.label(eg::RichText::new("Rating range").strong());
        let min_changed = ui
            .add(eg::Slider::new(&mut self.filter.min_rating, 0.0..=10.0).text("min"))
            .changed();
        let max_changed = ui
            .add(eg::Slider::new(&mut self.filter.max_rating, 0.0..=10.0).text("max"))
            .changed();
        if min_changed || max_changed {
            // UI invariant: never hand the engine an inverted range.
            if self.filter.max_rating < self.filter.min_rating {
                self.filter.max_rating = self.filter.min_rating;
            }
            self.on_filter_changed();
        }
        if ui
            .checkbox(&mut self.filter.high_rated_only, "⭐ High rated (8+)")
            .changed()
        {
            self.on_filter_changed();
        }

        ui.separator();

        ui.label(eg::RichText::new("Sort").strong());
        let mut changed_sort = false;
        eg::ComboBox::from_id_source("sort_by_combo")
            .selected_text(match self.filter.sort_key {
                SortKey::Rating => "Sort: Rating",
                SortKey::Title => "Sort: Title",
                SortKey::Genre => "Sort: Genre",
            })
            .show_ui(ui, |ui| {
                if ui
                    .selectable_value(&mut self.filter.sort_key, SortKey::Rating, "Rating")
                    .clicked()
                {
                    changed_sort = true;
                }
                if ui
                    .selectable_value(&mut self.filter.sort_key, SortKey::Title, "Title")
                    .clicked()
                {
                    changed_sort = true;
                }
                if ui
                    .selectable_value(&mut self.filter.sort_key, SortKey::Genre, "Genre")
                    .clicked()
                {
                    changed_sort = true;
                }
            });
        if changed_sort {
            self.on_filter_changed();
        }
        if ui.checkbox(&mut self.filter.sort_desc, "Descending").changed() {
            self.on_filter_changed();
        }

        if ui.button("Clear all filters").clicked() {
            self.filter.reset();
            self.on_filter_changed();
        }

        ui.separator();

        // Poster size
        ui.label("Poster width:");
        if ui
            .add(eg::Slider::new(&mut self.poster_width_ui, 120.0..=220.0).suffix(" px"))
            .changed()
        {
            self.mark_dirty();
        }

        ui.separator();

        // ---------- ADD MOVIE ----------
        ui.label(eg::RichText::new("➕ Add movie").strong());
        ui.add(
            eg::TextEdit::singleline(&mut self.add_title)
                .hint_text("Title")
                .desired_width(200.0),
        );
        ui.add(
            eg::TextEdit::singleline(&mut self.add_genre)
                .hint_text("Genre (e.g. Sci-Fi)")
                .desired_width(200.0),
        );
        ui.add(eg::Slider::new(&mut self.add_rating, 0.0..=10.0).text("rating"));
        ui.add(
            eg::TextEdit::singleline(&mut self.add_poster_path)
                .hint_text("Poster file path (optional)")
                .desired_width(200.0),
        );
        if ui.button("Add movie").clicked() {
            self.submit_add_movie();
        }
        ui.add_space(8.0);
    }
}
