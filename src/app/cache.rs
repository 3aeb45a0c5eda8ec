use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use image::GenericImageView;
use tracing::warn;

use crate::config::load_config;

static CACHE_DIR_ONCE: OnceLock<PathBuf> = OnceLock::new();
static POSTER_DIR_ONCE: OnceLock<PathBuf> = OnceLock::new();
static IMPORT_DIR_ONCE: OnceLock<PathBuf> = OnceLock::new();

const RESIZE_MAX_W: u32 = 342;
const RESIZE_QUALITY: u8 = 80;

pub fn cache_dir() -> PathBuf {
    CACHE_DIR_ONCE
        .get_or_init(|| {
            let cfg = load_config();
            let path = PathBuf::from(cfg.cache_dir.unwrap_or_else(|| ".kinofy_cache".into()));
            if let Err(e) = fs::create_dir_all(&path) {
                warn!("failed to create cache dir {}: {e}", path.display());
            }
            path
        })
        .clone()
}

pub fn poster_cache_dir() -> PathBuf {
    POSTER_DIR_ONCE
        .get_or_init(|| {
            let mut path = cache_dir().join("posters");
            if let Err(e) = fs::create_dir_all(&path) {
                warn!("failed to create poster cache dir {}: {e}", path.display());
                path = cache_dir();
            }
            path
        })
        .clone()
}

/// Where user-imported poster files are copied so the original can move or
/// disappear without breaking the card.
pub fn imported_posters_dir() -> PathBuf {
    IMPORT_DIR_ONCE
        .get_or_init(|| {
            let mut path = cache_dir().join("imported");
            if let Err(e) = fs::create_dir_all(&path) {
                warn!("failed to create imported posters dir {}: {e}", path.display());
                path = cache_dir();
            }
            path
        })
        .clone()
}

pub fn url_to_cache_key(url: &str) -> String {
    format!("{:x}", md5::compute(url.as_bytes()))
}

pub fn find_any_by_key(key: &str) -> Option<PathBuf> {
    let poster_dir = poster_cache_dir();
    let candidates = [
        format!("{}.jpg", key),
        format!("{}.png", key),
        format!("{}.jpeg", key),
        format!("{}.webp", key),
    ];
    for c in candidates {
        let p = poster_dir.join(c);
        if p.exists() {
            return Some(p);
        }
    }
    None
}

/// Return (width, height, RGBA8 bytes) decoded from an image file.
pub fn load_rgba(path: &str) -> Result<(u32, u32, Vec<u8>), String> {
    let p = Path::new(path);
    if !p.exists() {
        return Err("not found".into());
    }
    let img = image::ImageReader::open(p)
        .map_err(|e| format!("open image {}: {e}", p.display()))?
        .with_guessed_format()
        .map_err(|e| format!("guess format {}: {e}", p.display()))?
        .decode()
        .map_err(|e| format!("decode {}: {e}", p.display()))?;
    let (w, h) = img.dimensions();
    Ok((w, h, img.to_rgba8().to_vec()))
}

/// Download a poster with the shared client, resize to card width and store
/// as JPEG under the cache key. Returns the on-disk path.
pub fn download_poster(
    client: &reqwest::blocking::Client,
    url: &str,
    key: &str,
) -> Result<PathBuf, String> {
    use image::{imageops::FilterType, DynamicImage};

    let dest = poster_cache_dir().join(format!("{key}.jpg"));
    if dest.exists() {
        return Ok(dest);
    }

    let bytes = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .and_then(|r| r.bytes())
        .map_err(|e| format!("download bytes: {e}"))?;

    let img = image::load_from_memory(&bytes).map_err(|e| format!("decode poster: {e}"))?;

    let (w, h) = img.dimensions();
    let out: DynamicImage = if w > RESIZE_MAX_W {
        let new_h = ((h as f32) * (RESIZE_MAX_W as f32 / w as f32)).round().max(1.0) as u32;
        img.resize_exact(RESIZE_MAX_W, new_h, FilterType::CatmullRom)
    } else {
        img
    };

    let mut jpeg_bytes: Vec<u8> = Vec::new();
    {
        let mut encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut jpeg_bytes, RESIZE_QUALITY);
        encoder
            .encode_image(&out)
            .map_err(|e| format!("jpeg encode: {e}"))?;
    }

    if let Some(parent) = dest.parent() {
        let _ = fs::create_dir_all(parent);
    }
    // Write to a .part file first so a crash never leaves a truncated poster.
    let tmp = dest.with_extension("jpg.part");
    {
        let mut f = fs::File::create(&tmp).map_err(|e| format!("create tmp: {e}"))?;
        f.write_all(&jpeg_bytes).map_err(|e| format!("write: {e}"))?;
    }
    fs::rename(&tmp, &dest).map_err(|e| format!("rename: {e}"))?;

    Ok(dest)
}

/// Copy a user-picked poster file into the managed imported dir and return
/// the stored path (what goes into the database).
pub fn import_local_poster(src: &Path) -> Result<PathBuf, String> {
    if !src.is_file() {
        return Err(format!("{} is not a file", src.display()));
    }
    let name = src
        .file_name()
        .ok_or_else(|| format!("{} has no file name", src.display()))?;
    let dest = imported_posters_dir().join(name);
    fs::copy(src, &dest).map_err(|e| format!("copy poster: {e}"))?;
    Ok(dest)
}
