// src/app/prefetch.rs
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use eframe::egui as eg;
use tracing::warn;

use super::cache::{download_poster, find_any_by_key, load_rgba, url_to_cache_key};
use super::types::{PosterDone, PosterSlot};
use super::tmdb;

/// What a stored `poster_path` value actually points at.
enum PosterKind {
    Local(PathBuf),
    Remote(String),
    Unusable,
}

/// A path that exists on disk is a local poster; otherwise a leading `/`
/// means a TMDB fragment and `http(s)` URLs are fetched as-is.
fn classify_poster(raw: &str) -> PosterKind {
    let p = Path::new(raw);
    if p.is_file() {
        return PosterKind::Local(p.to_path_buf());
    }
    if raw.starts_with("http://") || raw.starts_with("https://") {
        return PosterKind::Remote(raw.to_string());
    }
    if raw.starts_with('/') {
        return PosterKind::Remote(tmdb::poster_url(raw));
    }
    PosterKind::Unusable
}

impl super::KinofyApp {
    /// Spawn the poster worker pool once; workers live for the session and
    /// block on the shared work channel.
    pub(crate) fn ensure_poster_workers(&mut self) {
        if self.poster_work_tx.is_some() {
            return;
        }

        let (work_tx, work_rx) = mpsc::channel::<super::PosterJob>();
        let (done_tx, done_rx) = mpsc::channel::<PosterDone>();
        self.poster_work_tx = Some(work_tx);
        self.poster_done_rx = Some(done_rx);

        let work_rx = std::sync::Arc::new(std::sync::Mutex::new(work_rx));

        // One shared HTTP client for connection pooling.
        let client = match reqwest::blocking::Client::builder()
            .user_agent("kinofy/posters")
            .timeout(Duration::from_secs(20))
            .pool_max_idle_per_host(8)
            .build()
        {
            Ok(c) => std::sync::Arc::new(c),
            Err(e) => {
                self.set_status(format!("http client build failed: {e}"));
                return;
            }
        };

        for _ in 0..super::POSTER_WORKERS {
            let work_rx = std::sync::Arc::clone(&work_rx);
            let done_tx = done_tx.clone();
            let client = std::sync::Arc::clone(&client);

            std::thread::spawn(move || loop {
                let job = {
                    let rx = work_rx.lock().unwrap();
                    rx.recv()
                };
                let (slot_key, cache_key, url) = match job {
                    Ok(t) => t,
                    Err(_) => break,
                };

                let result = download_poster(&client, &url, &cache_key);
                let _ = done_tx.send(PosterDone { slot_key, result });
            });
        }
    }

    /// Make sure every movie's poster has a slot; queue downloads for remote
    /// posters that are not in the disk cache yet.
    pub(crate) fn queue_poster_jobs(&mut self) {
        self.ensure_poster_workers();

        for movie in &self.movies {
            let Some(raw) = movie.poster_path.as_deref() else {
                continue;
            };
            if self.posters.contains_key(raw) {
                continue;
            }

            let slot = match classify_poster(raw) {
                PosterKind::Local(path) => PosterSlot::Cached(path),
                PosterKind::Remote(url) => {
                    let cache_key = url_to_cache_key(&url);
                    if let Some(path) = find_any_by_key(&cache_key) {
                        PosterSlot::Cached(path)
                    } else {
                        if let Some(tx) = &self.poster_work_tx {
                            let _ = tx.send((raw.to_string(), cache_key, url));
                        }
                        PosterSlot::Pending
                    }
                }
                PosterKind::Unusable => PosterSlot::Failed,
            };
            self.posters.insert(raw.to_string(), slot);
        }
    }

    /// Drain a bounded number of completed downloads per frame.
    pub(crate) fn poll_poster_done(&mut self, ctx: &eg::Context) {
        let mut drained = 0usize;

        while drained < super::MAX_DONE_PER_FRAME {
            let Some(rx) = &self.poster_done_rx else {
                break;
            };

            match rx.try_recv() {
                Ok(msg) => {
                    drained += 1;
                    match msg.result {
                        Ok(path) => {
                            self.posters.insert(msg.slot_key, PosterSlot::Cached(path));
                        }
                        Err(e) => {
                            warn!("poster download failed for {}: {e}", msg.slot_key);
                            self.posters.insert(msg.slot_key, PosterSlot::Failed);
                        }
                    }
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => break,
            }
        }

        if drained > 0 {
            ctx.request_repaint();
        }
    }
}

fn load_texture_from_path(
    ctx: &eg::Context,
    path_str: &str,
    cache_name: &str,
) -> Result<eg::TextureHandle, String> {
    let (w, h, bytes) = load_rgba(path_str)?;
    let img = eg::ColorImage::from_rgba_unmultiplied([w as usize, h as usize], &bytes);
    Ok(ctx.load_texture(cache_name.to_string(), img, eg::TextureOptions::LINEAR))
}

/// Fetch the texture for a poster slot, uploading lazily from the cached
/// file within the per-frame budget. Returns `None` while pending/failed.
pub(crate) fn poster_texture(
    slots: &mut HashMap<String, PosterSlot>,
    ctx: &eg::Context,
    key: &str,
    uploads_left: &mut usize,
) -> Option<eg::TextureHandle> {
    match slots.get(key)? {
        PosterSlot::Ready(tex) => Some(tex.clone()),
        PosterSlot::Cached(path) => {
            if *uploads_left == 0 {
                return None;
            }
            let path = path.clone();
            match load_texture_from_path(ctx, &path.to_string_lossy(), key) {
                Ok(tex) => {
                    *uploads_left -= 1;
                    slots.insert(key.to_string(), PosterSlot::Ready(tex.clone()));
                    Some(tex)
                }
                Err(e) => {
                    warn!("poster decode failed for {key}: {e}");
                    slots.insert(key.to_string(), PosterSlot::Failed);
                    None
                }
            }
        }
        _ => None,
    }
}
