// src/app/store.rs
use std::path::Path;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use rusqlite::{params, Connection};
use tracing::warn;

use super::types::{Movie, SeedRow};

const DATE_FMT: &str = "%Y-%m-%d";

const SQL_CREATE: &str = r#"
CREATE TABLE IF NOT EXISTS movies (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL,
    genre       TEXT NOT NULL,
    rating      REAL NOT NULL,
    poster_path TEXT,
    emotions    TEXT NOT NULL DEFAULT '',
    notes       TEXT NOT NULL DEFAULT '',
    tags        TEXT NOT NULL DEFAULT '',
    date_tagged TEXT
)
"#;

const SQL_SELECT_ALL: &str = r#"
SELECT id, title, genre, rating, poster_path, emotions, notes, tags, date_tagged
FROM movies
ORDER BY id ASC
"#;

/// Owns the SQLite connection backing the collection. All row addressing is
/// by id; callers never identify a movie by matching its fields.
pub struct MovieStore {
    conn: Connection,
}

impl MovieStore {
    pub fn open(path: &Path) -> rusqlite::Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                let _ = std::fs::create_dir_all(parent);
            }
        }
        let conn = Connection::open(path)?;
        let _ = conn.busy_timeout(Duration::from_secs(10));
        conn.execute(SQL_CREATE, [])?;
        Ok(Self { conn })
    }

    pub fn get_all(&self) -> rusqlite::Result<Vec<Movie>> {
        let mut stmt = self.conn.prepare(SQL_SELECT_ALL)?;
        let rows = stmt.query_map([], |row| {
            let date_raw: Option<String> = row.get(8)?;
            Ok(Movie {
                id: row.get(0)?,
                title: row.get(1)?,
                genre: row.get(2)?,
                rating: row.get(3)?,
                poster_path: row
                    .get::<_, Option<String>>(4)?
                    .filter(|p| !p.trim().is_empty()),
                emotions: row.get(5)?,
                notes: row.get(6)?,
                tags: row.get(7)?,
                date_tagged: parse_date(date_raw.as_deref()),
            })
        })?;
        rows.collect()
    }

    pub fn is_empty(&self) -> rusqlite::Result<bool> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM movies", [], |row| row.get(0))?;
        Ok(n == 0)
    }

    /// Insert a user-added movie. Title and genre are stored trimmed.
    pub fn add(
        &self,
        title: &str,
        genre: &str,
        rating: f64,
        poster_path: Option<&str>,
    ) -> rusqlite::Result<i64> {
        self.conn.execute(
            "INSERT INTO movies (title, genre, rating, poster_path) VALUES (?1, ?2, ?3, ?4)",
            params![title.trim(), genre.trim(), rating, poster_path],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Batch insert for first-run seeding; one transaction for the lot.
    pub fn add_seeded(&mut self, rows: &[SeedRow]) -> rusqlite::Result<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO movies (title, genre, rating, poster_path) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for row in rows {
                stmt.execute(params![
                    row.title.trim(),
                    row.genre.trim(),
                    row.rating,
                    row.poster_path
                ])?;
            }
        }
        tx.commit()?;
        Ok(rows.len())
    }

    /// Replace a movie's annotations and stamp `date_tagged` with today.
    pub fn update_annotations(
        &self,
        id: i64,
        emotions: &str,
        notes: &str,
        tags: &str,
    ) -> rusqlite::Result<usize> {
        let today = Local::now().date_naive().format(DATE_FMT).to_string();
        self.conn.execute(
            "UPDATE movies SET emotions = ?1, notes = ?2, tags = ?3, date_tagged = ?4 WHERE id = ?5",
            params![emotions.trim(), notes, tags.trim(), today, id],
        )
    }

    pub fn delete(&self, id: i64) -> rusqlite::Result<usize> {
        self.conn
            .execute("DELETE FROM movies WHERE id = ?1", params![id])
    }

    pub fn distinct_genres(&self) -> rusqlite::Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT genre FROM movies ORDER BY genre ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        rows.collect()
    }
}

fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(raw, DATE_FMT) {
        Ok(d) => Some(d),
        Err(err) => {
            warn!("Ignoring malformed date_tagged {raw:?}: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, MovieStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = MovieStore::open(&dir.path().join("kinofy.db")).expect("open store");
        (dir, store)
    }

    #[test]
    fn add_and_read_back() {
        let (_dir, store) = temp_store();
        assert!(store.is_empty().unwrap());

        let id = store.add("  Matrix ", " Sci-Fi ", 8.7, None).unwrap();
        let all = store.get_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, id);
        assert_eq!(all[0].title, "Matrix");
        assert_eq!(all[0].genre, "Sci-Fi");
        assert_eq!(all[0].rating, 8.7);
        assert_eq!(all[0].poster_path, None);
        assert_eq!(all[0].date_tagged, None);
        assert!(all[0].emotions.is_empty());
    }

    #[test]
    fn update_annotations_stamps_today() {
        let (_dir, store) = temp_store();
        let id = store.add("Heat", "Crime", 8.3, None).unwrap();

        let n = store
            .update_annotations(id, "😄 😢", "great rewatch", "crime, classic")
            .unwrap();
        assert_eq!(n, 1);

        let all = store.get_all().unwrap();
        assert_eq!(all[0].emotions, "😄 😢");
        assert_eq!(all[0].notes, "great rewatch");
        assert_eq!(all[0].tags, "crime, classic");
        assert_eq!(all[0].date_tagged, Some(Local::now().date_naive()));
    }

    #[test]
    fn delete_by_id_only_touches_that_row() {
        let (_dir, store) = temp_store();
        // Two structurally identical rows; ids keep them apart.
        let a = store.add("Dup", "Drama", 5.0, None).unwrap();
        let b = store.add("Dup", "Drama", 5.0, None).unwrap();
        assert_ne!(a, b);

        assert_eq!(store.delete(a).unwrap(), 1);
        let all = store.get_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, b);
    }

    #[test]
    fn distinct_genres_sorted() {
        let (_dir, store) = temp_store();
        store.add("A", "Sci-Fi", 5.0, None).unwrap();
        store.add("B", "Drama", 5.0, None).unwrap();
        store.add("C", "Sci-Fi", 5.0, None).unwrap();
        assert_eq!(store.distinct_genres().unwrap(), ["Drama", "Sci-Fi"]);
    }

    #[test]
    fn seeded_batch_inserts_unannotated() {
        let (_dir, mut store) = temp_store();
        let rows = vec![
            SeedRow {
                title: "Arrival".into(),
                genre: "Sci-Fi".into(),
                rating: 7.9,
                poster_path: Some("/arrival.jpg".into()),
            },
            SeedRow {
                title: "Amelie".into(),
                genre: "Romance".into(),
                rating: 8.0,
                poster_path: None,
            },
        ];
        assert_eq!(store.add_seeded(&rows).unwrap(), 2);
        let all = store.get_all().unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|m| m.date_tagged.is_none()));
        assert_eq!(all[0].poster_path.as_deref(), Some("/arrival.jpg"));
    }

    #[test]
    fn malformed_stored_date_degrades_to_none() {
        let (_dir, store) = temp_store();
        let id = store.add("Odd", "Drama", 5.0, None).unwrap();
        store
            .conn
            .execute(
                "UPDATE movies SET date_tagged = 'not-a-date' WHERE id = ?1",
                params![id],
            )
            .unwrap();
        let all = store.get_all().unwrap();
        assert_eq!(all[0].date_tagged, None);
    }
}
