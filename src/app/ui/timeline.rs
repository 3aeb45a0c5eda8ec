// src/app/ui/timeline.rs
use eframe::egui as eg;

use crate::app::timeline::{lookup_contributors, Granularity};
use crate::app::types::View;

/// Fixed band palette; series index wraps around.
const PALETTE: [eg::Color32; 10] = [
    eg::Color32::from_rgb(0x5d, 0xa5, 0xda),
    eg::Color32::from_rgb(0xfa, 0xa4, 0x3a),
    eg::Color32::from_rgb(0x60, 0xbd, 0x68),
    eg::Color32::from_rgb(0xf1, 0x5a, 0x60),
    eg::Color32::from_rgb(0xb2, 0x76, 0xb2),
    eg::Color32::from_rgb(0x8c, 0x6d, 0x31),
    eg::Color32::from_rgb(0xde, 0xcf, 0x3f),
    eg::Color32::from_rgb(0xf1, 0x7c, 0xb0),
    eg::Color32::from_rgb(0x4d, 0x4d, 0x4d),
    eg::Color32::from_rgb(0x2c, 0xa0, 0x2c),
];

fn band_color(idx: usize) -> eg::Color32 {
    PALETTE[idx % PALETTE.len()]
}

impl crate::app::KinofyApp {
    pub(crate) fn ui_render_timeline(&mut self, ui: &mut eg::Ui) {
        ui.horizontal(|ui| {
            if ui.button("← Back to movies").clicked() {
                self.set_view(View::Library);
            }
            ui.separator();
            ui.heading("Your Emotional Timeline");
            ui.separator();

            ui.label("View by:");
            let mut pick = self.granularity;
            ui.selectable_value(&mut pick, Granularity::Daily, "Daily");
            ui.selectable_value(&mut pick, Granularity::Weekly, "Weekly");
            ui.selectable_value(&mut pick, Granularity::Monthly, "Monthly");
            if pick != self.granularity {
                self.set_granularity(pick);
            }
        });
        ui.separator();

        if self.timeline.is_empty() {
            ui.vertical_centered(|ui| {
                ui.add_space(60.0);
                ui.heading("📊 No timeline data yet");
                ui.label("Tag movies with emotions to build your timeline.");
            });
            return;
        }

        ui.label(eg::RichText::new("Proportion of emotions over time").weak());

        // Legend in discovery order (the reverse of stacking order).
        ui.horizontal_wrapped(|ui| {
            for (idx, series) in self.timeline.iter().enumerate().rev() {
                let (rect, _) =
                    ui.allocate_exact_size(eg::vec2(12.0, 12.0), eg::Sense::hover());
                ui.painter()
                    .rect_filled(rect, 2.0, band_color(idx));
                ui.label(&series.token);
                ui.add_space(8.0);
            }
        });
        ui.add_space(4.0);

        self.ui_render_timeline_chart(ui);
    }

    fn ui_render_timeline_chart(&mut self, ui: &mut eg::Ui) {
        let series = self.timeline.clone();
        let n = series[0].points.len();

        let avail = ui.available_size();
        let desired = eg::vec2(avail.x, (avail.y - 8.0).max(240.0));
        let (rect, response) = ui.allocate_exact_size(desired, eg::Sense::hover());
        let painter = ui.painter_at(rect);

        // Margins: y labels on the left, bucket labels along the bottom.
        let chart = eg::Rect::from_min_max(
            eg::pos2(rect.left() + 44.0, rect.top() + 8.0),
            eg::pos2(rect.right() - 12.0, rect.bottom() - 24.0),
        );

        let weak = ui.visuals().weak_text_color();
        let gridline = ui.visuals().faint_bg_color;
        painter.rect_filled(chart, 4.0, ui.visuals().extreme_bg_color);

        let y_of = |percent: f64| -> f32 {
            chart.bottom() - (percent as f32 / 100.0) * chart.height()
        };

        for step in [0.0, 25.0, 50.0, 75.0, 100.0] {
            let y = y_of(step);
            painter.line_segment(
                [eg::pos2(chart.left(), y), eg::pos2(chart.right(), y)],
                eg::Stroke::new(1.0, gridline),
            );
            painter.text(
                eg::pos2(chart.left() - 6.0, y),
                eg::Align2::RIGHT_CENTER,
                format!("{step:.0}%"),
                eg::FontId::proportional(10.0),
                weak,
            );
        }

        // X positions; a single bucket widens into a narrow band.
        let xs: Vec<f32> = if n == 1 {
            vec![chart.center().x - 40.0, chart.center().x + 40.0]
        } else {
            (0..n)
                .map(|j| {
                    chart.left() + chart.width() * (j as f32) / ((n - 1) as f32)
                })
                .collect()
        };
        let value_at = |points: &[crate::app::timeline::TimelinePoint], j: usize| -> f64 {
            if n == 1 {
                points[0].percent
            } else {
                points[j].percent
            }
        };

        // Stack the bands bottom-up in series order, one trapezoid per
        // bucket interval so every fill stays convex.
        let mut cum = vec![0.0f64; xs.len()];
        for (idx, s) in series.iter().enumerate() {
            let lower = cum.clone();
            for (j, c) in cum.iter_mut().enumerate() {
                *c += value_at(&s.points, j);
            }
            let fill = band_color(idx).gamma_multiply(0.85);
            for j in 0..xs.len() - 1 {
                let quad = vec![
                    eg::pos2(xs[j], y_of(lower[j])),
                    eg::pos2(xs[j + 1], y_of(lower[j + 1])),
                    eg::pos2(xs[j + 1], y_of(cum[j + 1])),
                    eg::pos2(xs[j], y_of(cum[j])),
                ];
                painter.add(eg::Shape::convex_polygon(quad, fill, eg::Stroke::NONE));
            }
            for j in 0..xs.len() - 1 {
                painter.line_segment(
                    [
                        eg::pos2(xs[j], y_of(cum[j])),
                        eg::pos2(xs[j + 1], y_of(cum[j + 1])),
                    ],
                    eg::Stroke::new(1.0, band_color(idx)),
                );
            }
        }

        // Bucket labels, thinned so they never overlap.
        let label_step = (n / 8).max(1);
        for (j, point) in series[0].points.iter().enumerate().step_by(label_step) {
            let x = if n == 1 { chart.center().x } else { xs[j] };
            painter.text(
                eg::pos2(x, chart.bottom() + 4.0),
                eg::Align2::CENTER_TOP,
                &point.bucket,
                eg::FontId::proportional(10.0),
                weak,
            );
        }

        // Hover: nearest bucket column → per-series breakdown + contributors.
        let hovered = response.hover_pos().filter(|p| chart.contains(*p)).map(|p| {
            if n == 1 {
                0
            } else {
                let t = ((p.x - chart.left()) / chart.width()).clamp(0.0, 1.0);
                ((t * (n - 1) as f32).round() as usize).min(n - 1)
            }
        });

        if let Some(j) = hovered {
            let bucket = series[0].points[j].bucket.clone();
            let granularity = self.granularity;
            let movies = &self.movies;
            response.on_hover_ui_at_pointer(|ui| {
                ui.label(eg::RichText::new(&bucket).strong());
                for (idx, s) in series.iter().enumerate().rev() {
                    let pct = s.points[j].percent;
                    if pct <= 0.0 {
                        continue;
                    }
                    ui.horizontal(|ui| {
                        let (dot, _) =
                            ui.allocate_exact_size(eg::vec2(10.0, 10.0), eg::Sense::hover());
                        ui.painter().rect_filled(dot, 2.0, band_color(idx));
                        ui.label(format!("{}  {pct:.1}%", s.token));
                    });
                    for title in lookup_contributors(movies, &bucket, &s.token, granularity) {
                        ui.label(eg::RichText::new(format!("    {title}")).weak().size(11.0));
                    }
                }
            });
        }
    }
}
