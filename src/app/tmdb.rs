use std::collections::HashMap;
use std::time::Duration;

use serde::Deserialize;
use urlencoding::encode;

const API_BASE: &str = "https://api.themoviedb.org/3";

/// Width-limited poster renditions are plenty for grid cards.
pub const POSTER_IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w342";

/// Turn a TMDB poster path fragment (e.g. `/abc123.jpg`) into a fetchable URL.
pub fn poster_url(fragment: &str) -> String {
    format!("{POSTER_IMAGE_BASE}{fragment}")
}

#[derive(Debug, Deserialize)]
pub struct TmdbGenre {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct GenreListResponse {
    genres: Vec<TmdbGenre>,
}

#[derive(Debug, Deserialize)]
pub struct TmdbMovie {
    pub title: String,
    #[serde(default)]
    pub genre_ids: Vec<i64>,
    #[serde(default)]
    pub vote_average: f64,
    pub poster_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DiscoverResponse {
    #[serde(default)]
    results: Vec<TmdbMovie>,
}

pub struct TmdbClient {
    client: reqwest::blocking::Client,
    api_key: String,
}

impl TmdbClient {
    pub fn new(api_key: &str) -> Result<Self, String> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("kinofy/seed")
            .timeout(Duration::from_secs(20))
            .build()
            .map_err(|e| format!("http client: {e}"))?;
        Ok(Self {
            client,
            api_key: api_key.to_string(),
        })
    }

    pub fn fetch_genres(&self) -> Result<HashMap<i64, String>, String> {
        let url = format!(
            "{API_BASE}/genre/movie/list?api_key={}",
            encode(&self.api_key)
        );
        let body = self.get_text(&url)?;
        let parsed: GenreListResponse =
            serde_json::from_str(&body).map_err(|e| format!("parse genre list: {e}"))?;
        Ok(parsed
            .genres
            .into_iter()
            .map(|g| (g.id, g.name))
            .collect())
    }

    /// Popular movies released from 2000-01-01 onwards, `pages` pages of the
    /// discover endpoint.
    pub fn discover_from_2000(&self, pages: u32) -> Result<Vec<TmdbMovie>, String> {
        let mut all = Vec::new();
        for page in 1..=pages {
            let url = format!(
                "{API_BASE}/discover/movie?api_key={}&primary_release_date.gte=2000-01-01&page={page}",
                encode(&self.api_key)
            );
            let body = self.get_text(&url)?;
            let parsed: DiscoverResponse =
                serde_json::from_str(&body).map_err(|e| format!("parse discover page {page}: {e}"))?;
            all.extend(parsed.results);
        }
        Ok(all)
    }

    fn get_text(&self, url: &str) -> Result<String, String> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| format!("GET {url}: {e}"))?;
        if !resp.status().is_success() {
            return Err(format!("HTTP {} for {url}", resp.status()));
        }
        resp.text().map_err(|e| format!("read body: {e}"))
    }
}

/// Name for the first listed genre id, `"Unknown"` when the id is missing
/// from the map or the movie carries none.
pub fn primary_genre(movie: &TmdbMovie, genre_map: &HashMap<i64, String>) -> String {
    movie
        .genre_ids
        .first()
        .and_then(|id| genre_map.get(id))
        .cloned()
        .unwrap_or_else(|| "Unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discover_payload_parses() {
        let body = r#"{
            "page": 1,
            "results": [
                {"title": "Arrival", "genre_ids": [878, 18], "vote_average": 7.9, "poster_path": "/arrival.jpg"},
                {"title": "Posterless", "genre_ids": [], "vote_average": 6.1, "poster_path": null}
            ]
        }"#;
        let parsed: DiscoverResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.results.len(), 2);
        assert_eq!(parsed.results[0].title, "Arrival");
        assert_eq!(parsed.results[0].poster_path.as_deref(), Some("/arrival.jpg"));
        assert_eq!(parsed.results[1].poster_path, None);
    }

    #[test]
    fn genre_payload_parses_and_maps() {
        let body = r#"{"genres": [{"id": 878, "name": "Science Fiction"}, {"id": 18, "name": "Drama"}]}"#;
        let parsed: GenreListResponse = serde_json::from_str(body).unwrap();
        let map: HashMap<i64, String> = parsed.genres.into_iter().map(|g| (g.id, g.name)).collect();

        let movie = TmdbMovie {
            title: "Arrival".into(),
            genre_ids: vec![878, 18],
            vote_average: 7.9,
            poster_path: None,
        };
        assert_eq!(primary_genre(&movie, &map), "Science Fiction");

        let bare = TmdbMovie {
            title: "None".into(),
            genre_ids: vec![],
            vote_average: 0.0,
            poster_path: None,
        };
        assert_eq!(primary_genre(&bare, &map), "Unknown");
    }

    #[test]
    fn poster_url_joins_fragment() {
        assert_eq!(
            poster_url("/abc.jpg"),
            "https://image.tmdb.org/t/p/w342/abc.jpg"
        );
    }
}
