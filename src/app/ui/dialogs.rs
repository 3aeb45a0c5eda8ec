// src/app/ui/dialogs.rs
use eframe::egui as eg;

/// Quick-pick tokens for the emotions row.
const EMOTION_CHOICES: [&str; 6] = ["😄", "😢", "😱", "😡", "🥰", "😴"];

impl crate::app::KinofyApp {
    // ---------- EDIT / ANNOTATE DIALOG ----------
    pub(crate) fn ui_render_edit_dialog(&mut self, ctx: &eg::Context) {
        let Some(mut edit) = self.edit.take() else {
            return;
        };

        let mut open = true;
        let mut save = false;
        let mut cancel = false;

        eg::Window::new(format!("Edit — {}", edit.title))
            .collapsible(false)
            .resizable(false)
            .default_width(340.0)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label(eg::RichText::new("Emotions").strong());
                ui.add(
                    eg::TextEdit::singleline(&mut edit.emotions)
                        .hint_text("Space-separated tokens…")
                        .desired_width(300.0),
                );
                ui.horizontal_wrapped(|ui| {
                    for token in EMOTION_CHOICES {
                        if ui.small_button(token).clicked() {
                            if !edit.emotions.is_empty() && !edit.emotions.ends_with(' ') {
                                edit.emotions.push(' ');
                            }
                            edit.emotions.push_str(token);
                        }
                    }
                });

                ui.separator();
                ui.label(eg::RichText::new("Notes").strong());
                ui.add(
                    eg::TextEdit::multiline(&mut edit.notes)
                        .desired_rows(4)
                        .desired_width(300.0),
                );

                ui.separator();
                ui.label(eg::RichText::new("Tags").strong());
                ui.add(
                    eg::TextEdit::singleline(&mut edit.tags)
                        .hint_text("comma, separated, labels")
                        .desired_width(300.0),
                );

                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Save").clicked() {
                        save = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancel = true;
                    }
                });
                ui.label(
                    eg::RichText::new("Saving stamps today as the tagged date.")
                        .weak()
                        .size(11.0),
                );
            });

        if save {
            self.submit_edit(&edit);
        } else if open && !cancel {
            self.edit = Some(edit);
        }
    }

    // ---------- DELETE CONFIRMATION ----------
    pub(crate) fn ui_render_delete_dialog(&mut self, ctx: &eg::Context) {
        let Some(confirm) = self.delete_confirm.take() else {
            return;
        };

        let mut open = true;
        let mut yes = false;
        let mut no = false;

        eg::Window::new("Delete movie")
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label(format!(
                    "Are you sure you want to delete \"{}\"?",
                    confirm.title
                ));
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Yes, delete").clicked() {
                        yes = true;
                    }
                    if ui.button("No").clicked() {
                        no = true;
                    }
                });
            });

        if yes {
            self.submit_delete(confirm.id, &confirm.title);
        } else if open && !no {
            self.delete_confirm = Some(confirm);
        }
    }
}
