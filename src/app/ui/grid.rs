// src/app/ui/grid.rs
use eframe::egui as eg;

use crate::app::prefetch::poster_texture;
use crate::app::{DeleteConfirm, EditState};

pub const H_SPACING: f32 = 8.0;
pub const V_SPACING: f32 = 12.0;
const TEXT_H: f32 = 84.0;

impl crate::app::KinofyApp {
    pub(crate) fn ui_render_grid(&mut self, ui: &mut eg::Ui, ctx: &eg::Context) {
        let card_w: f32 = self.poster_width_ui;
        let card_h: f32 = card_w * 1.5 + TEXT_H;

        let avail = ui.available_width();
        let cols = ((avail + H_SPACING) / (card_w + H_SPACING)).floor().max(1.0) as usize;

        let mut uploads_left = crate::app::MAX_UPLOADS_PER_FRAME;

        eg::ScrollArea::vertical()
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.spacing_mut().item_spacing = eg::vec2(H_SPACING, V_SPACING);

                    for col in 0..self.visible.len() {
                        if col > 0 && col % cols == 0 {
                            ui.end_row();
                        }
                        let movie = self.visible[col].clone();

                        ui.allocate_ui_with_layout(
                            eg::vec2(card_w, card_h),
                            eg::Layout::top_down(eg::Align::Min),
                            |ui| {
                                ui.set_min_size(eg::vec2(card_w, card_h));
                                let rect = ui.max_rect();

                                let poster_rect = eg::Rect::from_min_max(
                                    rect.min,
                                    eg::pos2(rect.min.x + card_w, rect.min.y + card_w * 1.5),
                                );
                                let text_rect = eg::Rect::from_min_max(
                                    eg::pos2(rect.min.x, poster_rect.max.y),
                                    rect.max,
                                );

                                // Poster (lazy upload within the frame budget)
                                let tex = movie.poster_path.as_deref().and_then(|key| {
                                    poster_texture(&mut self.posters, ctx, key, &mut uploads_left)
                                });
                                if let Some(tex) = tex {
                                    ui.painter().image(
                                        tex.id(),
                                        poster_rect,
                                        eg::Rect::from_min_max(
                                            eg::pos2(0.0, 0.0),
                                            eg::pos2(1.0, 1.0),
                                        ),
                                        eg::Color32::WHITE,
                                    );
                                } else {
                                    ui.painter().rect_filled(
                                        poster_rect,
                                        6.0,
                                        eg::Color32::from_gray(40),
                                    );
                                    ui.painter().text(
                                        poster_rect.center(),
                                        eg::Align2::CENTER_CENTER,
                                        "🎬",
                                        eg::FontId::proportional(28.0),
                                        eg::Color32::from_gray(90),
                                    );
                                }

                                ui.allocate_ui_at_rect(text_rect, |ui| {
                                    ui.add(
                                        eg::Label::new(
                                            eg::RichText::new(format!(
                                                "{} — {:.1}",
                                                movie.title, movie.rating
                                            ))
                                            .size(14.0)
                                            .strong(),
                                        )
                                        .truncate(),
                                    );
                                    ui.label(eg::RichText::new(&movie.genre).weak().size(12.0));
                                    if !movie.emotions.trim().is_empty() {
                                        ui.label(movie.emotions.trim());
                                    }
                                    if let Some(date) = movie.date_tagged {
                                        ui.label(
                                            eg::RichText::new(format!(
                                                "tagged {}",
                                                date.format("%d %b %Y")
                                            ))
                                            .weak()
                                            .size(10.0),
                                        );
                                    }
                                    ui.horizontal(|ui| {
                                        if ui.small_button("Edit").clicked() {
                                            self.edit = Some(EditState {
                                                id: movie.id,
                                                title: movie.title.clone(),
                                                emotions: movie.emotions.clone(),
                                                notes: movie.notes.clone(),
                                                tags: movie.tags.clone(),
                                            });
                                        }
                                        if ui.small_button("Delete").clicked() {
                                            self.delete_confirm = Some(DeleteConfirm {
                                                id: movie.id,
                                                title: movie.title.clone(),
                                            });
                                        }
                                    });
                                });
                            },
                        );
                    }
                    ui.end_row();
                });
            });
    }
}
