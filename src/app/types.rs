// src/app/types.rs
use chrono::NaiveDate;
use eframe::egui::TextureHandle;
use std::path::PathBuf;

/// One row of the collection as handed out by the store.
///
/// `id` is the SQLite rowid; edit/delete always address a movie by id so two
/// otherwise identical entries stay distinguishable.
#[derive(Clone, Debug)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub genre: String,
    pub rating: f64,
    pub poster_path: Option<String>,
    /// Space-separated emotion tokens; may be empty.
    pub emotions: String,
    pub notes: String,
    /// Comma-separated free-text labels; may be empty.
    pub tags: String,
    pub date_tagged: Option<NaiveDate>,
}

impl Movie {
    pub fn is_annotated(&self) -> bool {
        self.date_tagged.is_some() && !self.emotions.trim().is_empty()
    }
}

impl PartialEq for Movie {
    // Structural equality over the visible fields; the surrogate id is
    // deliberately excluded so re-reads of the same row compare equal.
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title
            && self.genre == other.genre
            && self.rating == other.rating
            && self.poster_path == other.poster_path
            && self.emotions == other.emotions
            && self.notes == other.notes
            && self.tags == other.tags
            && self.date_tagged == other.date_tagged
    }
}

// ---- cross-thread messages ----

/// A movie as produced by first-run seeding (TMDB or CSV). Never annotated.
#[derive(Clone, Debug)]
pub struct SeedRow {
    pub title: String,
    pub genre: String,
    pub rating: f64,
    pub poster_path: Option<String>,
}

pub enum SeedMsg {
    Info(String),
    Done(Vec<SeedRow>),
    Error(String),
}

/// Job for the poster worker pool: (slot key, cache key, full image URL).
pub type PosterJob = (String, String, String);

pub struct PosterDone {
    pub slot_key: String,
    pub result: Result<PathBuf, String>,
}

// ---- app phases / states ----

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum BootPhase {
    Starting,
    Seeding,
    Ready,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    Library,
    Timeline,
}

/// Lifecycle of one poster image, keyed by the raw `poster_path` value.
pub enum PosterSlot {
    Pending, // queued or downloading
    Cached(PathBuf),
    Ready(TextureHandle),
    Failed,
}
