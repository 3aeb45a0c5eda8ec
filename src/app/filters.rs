// src/app/filters.rs
use std::cmp::Ordering;

use itertools::Itertools;

use super::stem::stem_text;
use super::types::Movie;

/// Sentinel meaning "no genre restriction".
pub const ALL_GENRES: &str = "All Genres";

/// Ratings at or above this pass the high-rated quick filter.
pub const HIGH_RATED_FLOOR: f64 = 8.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortKey {
    Rating,
    Title,
    Genre,
}

impl SortKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rating => "rating",
            Self::Title => "title",
            Self::Genre => "genre",
        }
    }
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "rating" => Some(Self::Rating),
            "title" => Some(Self::Title),
            "genre" => Some(Self::Genre),
            _ => None,
        }
    }
}

/// UI-held filter state, passed by value into [`apply`] on every change.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterSpec {
    pub search_text: String,
    pub min_rating: f64,
    pub max_rating: f64,
    /// A genre name, or [`ALL_GENRES`].
    pub genre: String,
    pub high_rated_only: bool,
    pub sort_key: SortKey,
    pub sort_desc: bool,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            search_text: String::new(),
            min_rating: 0.0,
            max_rating: 10.0,
            genre: ALL_GENRES.to_string(),
            high_rated_only: false,
            sort_key: SortKey::Rating,
            sort_desc: true,
        }
    }
}

impl FilterSpec {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_rating_narrowed(&self) -> bool {
        self.min_rating > 0.0 || self.max_rating < 10.0
    }

    pub fn has_genre_filter(&self) -> bool {
        self.genre != ALL_GENRES
    }
}

/// Why a filtered view came out empty, in priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmptyReason {
    NoSearchResults,
    NoFilterResults,
    NoMovies,
}

/// Pick the empty-state message for an empty result. Search beats the other
/// filters; an untouched spec means the collection itself is empty.
pub fn classify_empty(spec: &FilterSpec) -> EmptyReason {
    if !spec.search_text.trim().is_empty() {
        return EmptyReason::NoSearchResults;
    }
    if spec.is_rating_narrowed() || spec.has_genre_filter() {
        return EmptyReason::NoFilterResults;
    }
    EmptyReason::NoMovies
}

/// Run the full filter/sort/search pipeline over `movies`.
///
/// Pure: same inputs, same ordered output. An inverted rating range
/// (`min > max`) matches nothing rather than being swapped — swapping would
/// hide the upstream bug that produced it.
pub fn apply(movies: &[Movie], spec: &FilterSpec) -> Vec<Movie> {
    let stemmed_query = stem_text(&spec.search_text);

    let mut out: Vec<Movie> = movies
        .iter()
        .filter(|m| matches(m, spec, &stemmed_query))
        .cloned()
        .collect();

    // Reversing the comparator (not the list) keeps ties in input order for
    // both directions.
    out.sort_by(|a, b| {
        let ord = compare(a, b, spec.sort_key);
        if spec.sort_desc {
            ord.reverse()
        } else {
            ord
        }
    });
    out
}

/// Distinct genres across the collection, sorted, for the genre dropdown.
pub fn collect_genres(movies: &[Movie]) -> Vec<String> {
    movies
        .iter()
        .map(|m| m.genre.clone())
        .sorted()
        .dedup()
        .collect()
}

fn matches(movie: &Movie, spec: &FilterSpec, stemmed_query: &str) -> bool {
    let matches_search = stemmed_query.is_empty()
        || stem_text(&movie.title).contains(stemmed_query)
        || stem_text(&movie.notes).contains(stemmed_query);

    let matches_rating = movie.rating >= spec.min_rating && movie.rating <= spec.max_rating;
    let matches_high_rated = !spec.high_rated_only || movie.rating >= HIGH_RATED_FLOOR;
    let matches_genre =
        !spec.has_genre_filter() || movie.genre.eq_ignore_ascii_case(&spec.genre);

    matches_search && matches_rating && matches_high_rated && matches_genre
}

fn compare(a: &Movie, b: &Movie, key: SortKey) -> Ordering {
    match key {
        SortKey::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        SortKey::Genre => a.genre.to_lowercase().cmp(&b.genre.to_lowercase()),
        SortKey::Rating => a.rating.total_cmp(&b.rating),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: i64, title: &str, genre: &str, rating: f64) -> Movie {
        Movie {
            id,
            title: title.to_string(),
            genre: genre.to_string(),
            rating,
            poster_path: None,
            emotions: String::new(),
            notes: String::new(),
            tags: String::new(),
            date_tagged: None,
        }
    }

    fn sample() -> Vec<Movie> {
        vec![
            movie(1, "Matrix", "Sci-Fi", 8.7),
            movie(2, "Notebook", "Romance", 7.8),
        ]
    }

    #[test]
    fn default_spec_sorts_by_rating_descending() {
        let out = apply(&sample(), &FilterSpec::default());
        let titles: Vec<_> = out.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, ["Matrix", "Notebook"]);
    }

    #[test]
    fn search_matches_via_stemmed_substring() {
        let spec = FilterSpec {
            search_text: "note".into(),
            ..FilterSpec::default()
        };
        let out = apply(&sample(), &spec);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "Notebook");
    }

    #[test]
    fn search_also_covers_notes() {
        let mut movies = sample();
        movies[0].notes = "rewatched while running a fever".into();
        let spec = FilterSpec {
            search_text: "run".into(),
            ..FilterSpec::default()
        };
        let out = apply(&movies, &spec);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "Matrix");
    }

    #[test]
    fn narrowed_range_yields_empty_and_classifies_as_filtered() {
        let spec = FilterSpec {
            min_rating: 9.0,
            max_rating: 10.0,
            ..FilterSpec::default()
        };
        let out = apply(&sample(), &spec);
        assert!(out.is_empty());
        assert_eq!(classify_empty(&spec), EmptyReason::NoFilterResults);
    }

    #[test]
    fn empty_classification_priority() {
        let searched = FilterSpec {
            search_text: "zzz".into(),
            min_rating: 9.0,
            ..FilterSpec::default()
        };
        assert_eq!(classify_empty(&searched), EmptyReason::NoSearchResults);
        assert_eq!(classify_empty(&FilterSpec::default()), EmptyReason::NoMovies);

        let genre_only = FilterSpec {
            genre: "Western".into(),
            ..FilterSpec::default()
        };
        assert_eq!(classify_empty(&genre_only), EmptyReason::NoFilterResults);
    }

    #[test]
    fn inverted_range_matches_nothing() {
        let spec = FilterSpec {
            min_rating: 9.0,
            max_rating: 2.0,
            ..FilterSpec::default()
        };
        assert!(apply(&sample(), &spec).is_empty());
    }

    #[test]
    fn high_rated_toggle_stacks_with_range() {
        let mut movies = sample();
        movies.push(movie(3, "Heat", "Crime", 8.3));
        let spec = FilterSpec {
            high_rated_only: true,
            max_rating: 8.5,
            sort_desc: false,
            ..FilterSpec::default()
        };
        let out = apply(&movies, &spec);
        // 8.7 fails the range, 7.8 fails the floor; only 8.3 survives.
        let titles: Vec<_> = out.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, ["Heat"]);
    }

    #[test]
    fn genre_filter_is_case_insensitive() {
        let spec = FilterSpec {
            genre: "sci-fi".into(),
            ..FilterSpec::default()
        };
        let out = apply(&sample(), &spec);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "Matrix");
    }

    #[test]
    fn sort_is_stable_in_both_directions() {
        let movies = vec![
            movie(1, "Alpha", "Drama", 7.0),
            movie(2, "Beta", "Drama", 7.0),
            movie(3, "Gamma", "Drama", 9.0),
        ];
        let asc = FilterSpec {
            sort_desc: false,
            ..FilterSpec::default()
        };
        let out = apply(&movies, &asc);
        let ids: Vec<_> = out.iter().map(|m| m.id).collect();
        assert_eq!(ids, [1, 2, 3]);

        let desc = FilterSpec::default();
        let out = apply(&movies, &desc);
        // Gamma first; the tied pair keeps its input order.
        let ids: Vec<_> = out.iter().map(|m| m.id).collect();
        assert_eq!(ids, [3, 1, 2]);
    }

    #[test]
    fn title_sort_ignores_case() {
        let movies = vec![
            movie(1, "zulu", "Drama", 5.0),
            movie(2, "Alpha", "Drama", 5.0),
            movie(3, "mike", "Drama", 5.0),
        ];
        let spec = FilterSpec {
            sort_key: SortKey::Title,
            sort_desc: false,
            ..FilterSpec::default()
        };
        let out = apply(&movies, &spec);
        let titles: Vec<_> = out.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, ["Alpha", "mike", "zulu"]);
    }

    #[test]
    fn apply_is_idempotent() {
        let spec = FilterSpec {
            genre: "Drama".into(),
            sort_key: SortKey::Title,
            ..FilterSpec::default()
        };
        let movies = vec![
            movie(1, "Beta", "Drama", 6.0),
            movie(2, "Alpha", "Drama", 8.0),
            movie(3, "Other", "Comedy", 9.0),
        ];
        let once = apply(&movies, &spec);
        let twice = apply(&once, &spec);
        assert_eq!(once, twice);
    }

    #[test]
    fn narrowing_never_grows_the_result() {
        let movies = vec![
            movie(1, "A", "Drama", 3.0),
            movie(2, "B", "Drama", 6.5),
            movie(3, "C", "Drama", 8.2),
            movie(4, "D", "Drama", 9.9),
        ];
        let base = FilterSpec::default();
        let baseline = apply(&movies, &base).len();

        let narrowed = FilterSpec {
            min_rating: 5.0,
            max_rating: 9.0,
            ..FilterSpec::default()
        };
        assert!(apply(&movies, &narrowed).len() <= baseline);

        let high = FilterSpec {
            high_rated_only: true,
            ..narrowed.clone()
        };
        assert!(apply(&movies, &high).len() <= apply(&movies, &narrowed).len());
    }

    #[test]
    fn unknown_sort_key_string_is_rejected() {
        assert_eq!(SortKey::from_str("release_year"), None);
        assert_eq!(SortKey::from_str("title"), Some(SortKey::Title));
    }

    #[test]
    fn collect_genres_sorts_and_dedupes() {
        let movies = vec![
            movie(1, "A", "Sci-Fi", 5.0),
            movie(2, "B", "Drama", 5.0),
            movie(3, "C", "Sci-Fi", 5.0),
        ];
        assert_eq!(collect_genres(&movies), ["Drama", "Sci-Fi"]);
    }
}
