// src/app/prefs.rs
use std::path::PathBuf;
use std::time::{Duration, Instant};
use std::fs;

use super::filters::SortKey;
use super::timeline::Granularity;

impl super::KinofyApp {
    // ---- tiny flags ----
    pub(crate) fn mark_dirty(&mut self) {
        self.prefs_dirty = true;
    }

    pub(crate) fn maybe_save_prefs(&mut self) {
        // debounce a bit to avoid writing every frame
        if self.prefs_dirty && self.prefs_last_write.elapsed() >= Duration::from_millis(300) {
            self.save_prefs();
            self.prefs_dirty = false;
            self.prefs_last_write = Instant::now();
        }
    }

    // ---- load/save prefs ----
    pub(crate) fn load_prefs(&mut self) {
        let path = prefs_path();
        let Ok(txt) = fs::read_to_string(&path) else {
            return;
        };

        for line in txt.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((k, v)) = line.split_once('=') else {
                continue;
            };
            let k = k.trim();
            let v = v.trim();

            match k {
                "search" => self.filter.search_text = v.to_string(),
                "genre" => {
                    if !v.is_empty() {
                        self.filter.genre = v.to_string();
                    }
                }
                "min_rating" => {
                    if let Ok(n) = v.parse::<f64>() {
                        self.filter.min_rating = n.clamp(0.0, 10.0);
                    }
                }
                "max_rating" => {
                    if let Ok(n) = v.parse::<f64>() {
                        self.filter.max_rating = n.clamp(0.0, 10.0);
                    }
                }
                "high_rated" => self.filter.high_rated_only = matches!(v, "1" | "true" | "yes"),
                "sort_key" => {
                    if let Some(sk) = SortKey::from_str(v) {
                        self.filter.sort_key = sk;
                    }
                }
                "sort_desc" => self.filter.sort_desc = matches!(v, "1" | "true" | "yes"),
                "granularity" => {
                    if let Some(g) = Granularity::from_str(v) {
                        self.granularity = g;
                    }
                }
                "poster_w" => {
                    if let Ok(n) = v.parse::<f32>() {
                        self.poster_width_ui = n.clamp(120.0, 220.0);
                    }
                }
                _ => {}
            }
        }

        // A hand-edited file may invert the range; keep the UI invariant.
        if self.filter.min_rating > self.filter.max_rating {
            self.filter.max_rating = self.filter.min_rating;
        }
    }

    pub(crate) fn save_prefs(&self) {
        let path = prefs_path();
        let _ = fs::create_dir_all(path.parent().unwrap_or_else(|| std::path::Path::new(".")));

        let txt = format!(
            "# kinofy ui prefs\n\
             search={}\n\
             genre={}\n\
             min_rating={:.1}\n\
             max_rating={:.1}\n\
             high_rated={}\n\
             sort_key={}\n\
             sort_desc={}\n\
             granularity={}\n\
             poster_w={:.1}\n",
            self.filter.search_text,
            self.filter.genre,
            self.filter.min_rating,
            self.filter.max_rating,
            if self.filter.high_rated_only { "1" } else { "0" },
            self.filter.sort_key.as_str(),
            if self.filter.sort_desc { "1" } else { "0" },
            self.granularity.as_str(),
            self.poster_width_ui,
        );

        let _ = fs::write(path, txt);
    }
}

pub fn prefs_path() -> PathBuf {
    super::cache::cache_dir().join("ui_prefs.txt")
}
