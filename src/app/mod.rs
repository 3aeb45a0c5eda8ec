// src/app/mod.rs — collection state, boot/seed plumbing, frame loop
use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use eframe::egui as eg;
use tracing::warn;

pub mod cache;
pub mod filters;
pub mod prefetch;
pub mod prefs;
pub mod seed;
pub mod stem;
pub mod store;
pub mod timeline;
pub mod tmdb;
pub mod types;
pub mod ui;

use crate::config::{load_config, local_db_path};
use filters::FilterSpec;
use store::MovieStore;
use timeline::{EmotionSeries, Granularity};
use types::{BootPhase, Movie, PosterDone, PosterJob, PosterSlot, SeedMsg, View};

// ---- Tunables ----
pub(crate) const POSTER_WORKERS: usize = 8;
pub(crate) const MAX_DONE_PER_FRAME: usize = 12;
pub(crate) const MAX_UPLOADS_PER_FRAME: usize = 4;
const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// State of the annotation dialog for one movie.
pub(crate) struct EditState {
    pub id: i64,
    pub title: String,
    pub emotions: String,
    pub notes: String,
    pub tags: String,
}

pub(crate) struct DeleteConfirm {
    pub id: i64,
    pub title: String,
}

pub struct KinofyApp {
    // data
    movies: Vec<Movie>,
    visible: Vec<Movie>,
    genres: Vec<String>,
    store: Option<MovieStore>,

    // filter + view state
    filter: FilterSpec,
    search_edited_at: Option<Instant>,
    view: View,
    granularity: Granularity,
    timeline: Vec<EmotionSeries>,

    // boot / seeding
    did_init: bool,
    boot_phase: BootPhase,
    seed_rx: Option<Receiver<SeedMsg>>,
    status: String,

    // posters
    posters: HashMap<String, PosterSlot>,
    poster_work_tx: Option<Sender<PosterJob>>,
    poster_done_rx: Option<Receiver<PosterDone>>,
    poster_width_ui: f32,

    // dialogs + add form
    edit: Option<EditState>,
    delete_confirm: Option<DeleteConfirm>,
    add_title: String,
    add_genre: String,
    add_rating: f64,
    add_poster_path: String,

    // prefs autosave
    prefs_dirty: bool,
    prefs_last_write: Instant,
}

impl Default for KinofyApp {
    fn default() -> Self {
        Self {
            movies: Vec::new(),
            visible: Vec::new(),
            genres: Vec::new(),
            store: None,

            filter: FilterSpec::default(),
            search_edited_at: None,
            view: View::Library,
            granularity: Granularity::Daily,
            timeline: Vec::new(),

            did_init: false,
            boot_phase: BootPhase::Starting,
            seed_rx: None,
            status: String::new(),

            posters: HashMap::new(),
            poster_work_tx: None,
            poster_done_rx: None,
            poster_width_ui: 150.0,

            edit: None,
            delete_confirm: None,
            add_title: String::new(),
            add_genre: String::new(),
            add_rating: 5.0,
            add_poster_path: String::new(),

            prefs_dirty: false,
            prefs_last_write: Instant::now(),
        }
    }
}

impl KinofyApp {
    pub(crate) fn set_status<S: Into<String>>(&mut self, s: S) {
        self.status = s.into();
    }

    // ---- boot ----

    fn init(&mut self) {
        self.load_prefs();

        let cfg = load_config();
        let db_path = cfg
            .db_path
            .clone()
            .map(std::path::PathBuf::from)
            .unwrap_or_else(local_db_path);

        match MovieStore::open(&db_path) {
            Ok(store) => {
                self.store = Some(store);
                self.reload_movies();
                let needs_seed = self
                    .store
                    .as_ref()
                    .and_then(|s| s.is_empty().ok())
                    .unwrap_or(false);
                if needs_seed {
                    self.start_seed();
                } else {
                    self.boot_phase = BootPhase::Ready;
                }
            }
            Err(e) => {
                // No persistence; the session still works on an empty list.
                warn!("open database {} failed: {e}", db_path.display());
                self.set_status(format!("Could not open database: {e}"));
                self.boot_phase = BootPhase::Ready;
            }
        }
    }

    fn start_seed(&mut self) {
        self.boot_phase = BootPhase::Seeding;
        self.set_status("Collection is empty — seeding…");

        let (tx, rx) = mpsc::channel::<SeedMsg>();
        self.seed_rx = Some(rx);
        seed::spawn_seed(tx, load_config());
    }

    fn poll_seed(&mut self, ctx: &eg::Context) {
        use std::sync::mpsc::TryRecvError;

        let mut seen_any = false;

        if let Some(rx) = self.seed_rx.take() {
            let mut keep = Some(rx);

            while let Some(r) = keep.as_ref() {
                match r.try_recv() {
                    Ok(SeedMsg::Info(s)) => {
                        self.set_status(s);
                        seen_any = true;
                    }
                    Ok(SeedMsg::Done(rows)) => {
                        let inserted = match self.store.as_mut() {
                            Some(store) => match store.add_seeded(&rows) {
                                Ok(n) => n,
                                Err(e) => {
                                    self.set_status(format!("Seeding insert failed: {e}"));
                                    0
                                }
                            },
                            None => 0,
                        };
                        if inserted > 0 {
                            self.set_status(format!("Imported {inserted} movies."));
                        }
                        self.reload_movies();
                        self.boot_phase = BootPhase::Ready;
                        keep = None;
                        seen_any = true;
                    }
                    Ok(SeedMsg::Error(e)) => {
                        self.set_status(e);
                        self.boot_phase = BootPhase::Ready;
                        keep = None;
                        seen_any = true;
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        keep = None;
                        break;
                    }
                }
            }

            if let Some(rx_back) = keep {
                self.seed_rx = Some(rx_back);
            }
        }

        if seen_any {
            ctx.request_repaint();
        }
    }

    // ---- recompute pipeline ----

    pub(crate) fn reload_movies(&mut self) {
        let Some(store) = &self.store else {
            return;
        };
        match store.get_all() {
            Ok(list) => self.movies = list,
            Err(e) => {
                self.set_status(format!("Load failed: {e}"));
                return;
            }
        }
        self.genres = match store.distinct_genres() {
            Ok(g) => g,
            Err(_) => filters::collect_genres(&self.movies),
        };
        self.refresh_visible();
        self.refresh_timeline();
        self.queue_poster_jobs();
    }

    pub(crate) fn refresh_visible(&mut self) {
        self.visible = filters::apply(&self.movies, &self.filter);
    }

    pub(crate) fn refresh_timeline(&mut self) {
        self.timeline = timeline::aggregate(&self.movies, self.granularity);
    }

    /// Non-search filter edits apply immediately.
    pub(crate) fn on_filter_changed(&mut self) {
        self.mark_dirty();
        self.refresh_visible();
    }

    /// Search edits are debounced: recompute only after typing goes quiet.
    pub(crate) fn on_search_edited(&mut self) {
        self.mark_dirty();
        if self.filter.search_text.is_empty() {
            self.search_edited_at = None;
            self.refresh_visible();
        } else {
            self.search_edited_at = Some(Instant::now());
        }
    }

    fn tick_search_debounce(&mut self) {
        if let Some(at) = self.search_edited_at {
            if at.elapsed() >= SEARCH_DEBOUNCE {
                self.search_edited_at = None;
                self.refresh_visible();
            }
        }
    }

    pub(crate) fn set_granularity(&mut self, g: Granularity) {
        if self.granularity != g {
            self.granularity = g;
            self.refresh_timeline();
            self.mark_dirty();
        }
    }

    pub(crate) fn set_view(&mut self, view: View) {
        if self.view != view {
            self.view = view;
            if view == View::Timeline {
                self.refresh_timeline();
            }
        }
    }

    // ---- user actions ----

    pub(crate) fn submit_add_movie(&mut self) {
        let title = self.add_title.trim().to_string();
        let genre = self.add_genre.trim().to_string();
        if title.is_empty() || genre.is_empty() {
            self.set_status("Please fill in both title and genre.");
            return;
        }
        let rating = self.add_rating.clamp(0.0, 10.0);

        let poster_input = self.add_poster_path.trim().to_string();
        let poster_path = if poster_input.is_empty() {
            None
        } else {
            match cache::import_local_poster(std::path::Path::new(&poster_input)) {
                Ok(stored) => Some(stored.to_string_lossy().into_owned()),
                Err(e) => {
                    // Add the movie anyway; only the artwork is lost.
                    self.set_status(format!("Could not import poster: {e}"));
                    None
                }
            }
        };

        let Some(store) = &self.store else {
            self.set_status("No database available.");
            return;
        };
        match store.add(&title, &genre, rating, poster_path.as_deref()) {
            Ok(_) => {
                self.add_title.clear();
                self.add_genre.clear();
                self.add_rating = 5.0;
                self.add_poster_path.clear();
                self.reload_movies();
                self.set_status(format!("Added \"{title}\"."));
            }
            Err(e) => self.set_status(format!("Add failed: {e}")),
        }
    }

    pub(crate) fn submit_edit(&mut self, edit: &EditState) {
        let Some(store) = &self.store else {
            self.set_status("No database available.");
            return;
        };
        match store.update_annotations(edit.id, &edit.emotions, &edit.notes, &edit.tags) {
            Ok(_) => {
                self.reload_movies();
                self.set_status(format!("Updated \"{}\".", edit.title));
            }
            Err(e) => self.set_status(format!("Update failed: {e}")),
        }
    }

    pub(crate) fn submit_delete(&mut self, id: i64, title: &str) {
        let Some(store) = &self.store else {
            self.set_status("No database available.");
            return;
        };
        match store.delete(id) {
            Ok(_) => {
                self.reload_movies();
                self.set_status(format!("Deleted \"{title}\"."));
            }
            Err(e) => self.set_status(format!("Delete failed: {e}")),
        }
    }
}

// ========== App impl ==========
impl eframe::App for KinofyApp {
    fn update(&mut self, ctx: &eg::Context, _frame: &mut eframe::Frame) {
        // Keep frames moving so channel polls and the search debounce fire.
        ctx.request_repaint_after(Duration::from_millis(100));

        if !self.did_init {
            self.did_init = true;
            self.set_status("Starting…");
            self.init();
        }

        self.poll_seed(ctx);
        self.poll_poster_done(ctx);
        self.tick_search_debounce();
        self.maybe_save_prefs();

        self.ui_render_header(ctx);

        if self.boot_phase == BootPhase::Seeding {
            eg::CentralPanel::default().show(ctx, |ui| {
                self.ui_render_splash(ui);
            });
            return;
        }

        match self.view {
            View::Library => {
                eg::SidePanel::left("filter_panel")
                    .resizable(false)
                    .default_width(260.0)
                    .show(ctx, |ui| {
                        eg::ScrollArea::vertical().show(ui, |ui| {
                            self.ui_render_sidebar(ui);
                        });
                    });
                eg::CentralPanel::default().show(ctx, |ui| {
                    self.ui_render_library(ui, ctx);
                });
            }
            View::Timeline => {
                eg::CentralPanel::default().show(ctx, |ui| {
                    self.ui_render_timeline(ui);
                });
            }
        }

        self.ui_render_edit_dialog(ctx);
        self.ui_render_delete_dialog(ctx);
    }
}
