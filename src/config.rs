use std::{fs, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

pub const LOCAL_DB_DIR: &str = "db";
pub const LOCAL_DB_FILE: &str = "kinofy.db";

#[derive(Clone, Debug, Default)]
pub struct AppConfig {
    pub cache_dir: Option<String>,
    pub db_path: Option<String>,
    pub tmdb_api_key: Option<String>,
    pub seed_csv: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    cache_dir: Option<String>,
    db_path: Option<String>,
    tmdb_api_key: Option<String>,
    seed_csv: Option<String>,
}

pub fn load_config() -> AppConfig {
    let cfg_path = PathBuf::from("config.json");
    let mut cfg = AppConfig::default();

    match fs::read_to_string(&cfg_path) {
        Ok(raw) => match serde_json::from_str::<RawConfig>(&raw) {
            Ok(parsed) => {
                if parsed.cache_dir.is_some() {
                    cfg.cache_dir = parsed.cache_dir;
                }
                if parsed.db_path.is_some() {
                    cfg.db_path = parsed.db_path;
                }
                if parsed.tmdb_api_key.is_some() {
                    cfg.tmdb_api_key = parsed.tmdb_api_key;
                }
                if parsed.seed_csv.is_some() {
                    cfg.seed_csv = parsed.seed_csv;
                }
                info!("Loaded config from {}", cfg_path.display());
            }
            Err(err) => {
                warn!("Failed to parse config.json ({}). Using defaults.", err);
            }
        },
        Err(_) => {
            info!("No config.json found; using defaults");
        }
    }

    cfg
}

pub fn local_db_path() -> PathBuf {
    PathBuf::from(LOCAL_DB_DIR).join(LOCAL_DB_FILE)
}
