// src/app/seed.rs
use std::fs;
use std::path::Path;
use std::sync::mpsc::Sender;

use tracing::warn;

use super::tmdb::{primary_genre, TmdbClient};
use super::types::{SeedMsg, SeedRow};
use crate::config::AppConfig;

const DISCOVER_PAGES: u32 = 5;

/// Spawn the background thread that builds the first-run collection.
///
/// Preference order: TMDB (when an API key is configured), then a local
/// `movies.csv`, otherwise an error message the UI surfaces as a status
/// notice. No database access happens here; the UI thread inserts the rows.
pub(crate) fn spawn_seed(tx: Sender<SeedMsg>, cfg: AppConfig) {
    std::thread::spawn(move || {
        let send = |m: SeedMsg| {
            let _ = tx.send(m);
        };

        if let Some(key) = cfg.tmdb_api_key.as_deref().filter(|k| !k.trim().is_empty()) {
            send(SeedMsg::Info("Fetching movie catalog from TMDB…".into()));
            match seed_from_tmdb(key, &send) {
                Ok(rows) => {
                    send(SeedMsg::Done(rows));
                    return;
                }
                Err(e) => {
                    warn!("TMDB seeding failed: {e}");
                    send(SeedMsg::Info(format!(
                        "TMDB seeding failed ({e}); trying CSV fallback…"
                    )));
                }
            }
        }

        let csv_path = cfg.seed_csv.clone().unwrap_or_else(|| "movies.csv".into());
        match fs::read_to_string(Path::new(&csv_path)) {
            Ok(text) => {
                send(SeedMsg::Info(format!("Importing {csv_path}…")));
                send(SeedMsg::Done(parse_seed_csv(&text)));
            }
            Err(_) => send(SeedMsg::Error(
                "No TMDB API key and no movies.csv found. Add movies manually, or set \
                 tmdb_api_key / seed_csv in config.json."
                    .into(),
            )),
        }
    });
}

fn seed_from_tmdb(api_key: &str, send: &dyn Fn(SeedMsg)) -> Result<Vec<SeedRow>, String> {
    let client = TmdbClient::new(api_key)?;
    let genre_map = client.fetch_genres()?;
    send(SeedMsg::Info("Fetching popular movies since 2000…".into()));
    let movies = client.discover_from_2000(DISCOVER_PAGES)?;

    let rows: Vec<SeedRow> = movies
        .iter()
        .filter(|m| !m.title.trim().is_empty())
        .map(|m| SeedRow {
            title: m.title.trim().to_string(),
            genre: primary_genre(m, &genre_map),
            rating: m.vote_average.clamp(0.0, 10.0),
            poster_path: m.poster_path.clone(),
        })
        .collect();

    if rows.is_empty() {
        return Err("discover returned no movies".into());
    }
    Ok(rows)
}

/// Parse a `title,genre,rating` CSV (header line skipped). Malformed lines
/// are dropped, not fatal.
pub(crate) fn parse_seed_csv(text: &str) -> Vec<SeedRow> {
    let mut out = Vec::new();
    for line in text.lines().skip(1) {
        let mut parts = line.splitn(3, ',');
        let (Some(title), Some(genre), Some(rating)) = (parts.next(), parts.next(), parts.next())
        else {
            continue;
        };
        let title = title.trim();
        let genre = genre.trim();
        let Ok(rating) = rating.trim().parse::<f64>() else {
            continue;
        };
        if title.is_empty() || genre.is_empty() {
            continue;
        }
        out.push(SeedRow {
            title: title.to_string(),
            genre: genre.to_string(),
            rating: rating.clamp(0.0, 10.0),
            poster_path: None,
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::parse_seed_csv;

    #[test]
    fn parses_rows_and_skips_header() {
        let text = "title,genre,rating\nMatrix,Sci-Fi,8.7\nNotebook,Romance,7.8\n";
        let rows = parse_seed_csv(text);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].title, "Matrix");
        assert_eq!(rows[0].genre, "Sci-Fi");
        assert_eq!(rows[0].rating, 8.7);
        assert!(rows.iter().all(|r| r.poster_path.is_none()));
    }

    #[test]
    fn drops_malformed_lines() {
        let text = "title,genre,rating\n\
                    only-two,fields\n\
                    , Drama, 5.0\n\
                    Okay, Drama, not-a-number\n\
                    Fine, Drama, 6.5\n";
        let rows = parse_seed_csv(text);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Fine");
    }

    #[test]
    fn clamps_out_of_range_ratings() {
        let text = "title,genre,rating\nWild,Drama,11.5\nLow,Drama,-2\n";
        let rows = parse_seed_csv(text);
        assert_eq!(rows[0].rating, 10.0);
        assert_eq!(rows[1].rating, 0.0);
    }
}
