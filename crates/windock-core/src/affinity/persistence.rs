//! Affinity cache file persistence
//!
//! Reads once at engine start, writes after snapshots on a background
//! thread. Every failure here degrades to "no cache" and is logged.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use super::errors::AffinityError;
use super::types::AffinityCache;
use crate::config::CacheConfig;

pub(crate) const AFFINITY_FILE_ENV: &str = "WINDOCK_AFFINITY_FILE";
const WRITER_THREAD_NAME: &str = "windock-affinity-writer";

/// Resolve the cache file location.
///
/// `WINDOCK_AFFINITY_FILE` wins when set and non-empty, then the configured
/// path, then `~/.windock/affinity.json`.
pub fn affinity_file_path(config: &CacheConfig) -> PathBuf {
    if let Ok(path_str) = std::env::var(AFFINITY_FILE_ENV)
        && !path_str.is_empty()
    {
        return PathBuf::from(path_str);
    }

    if let Some(path) = config.path() {
        return path;
    }

    match dirs::home_dir() {
        Some(home) => home.join(".windock").join("affinity.json"),
        None => {
            tracing::error!(
                event = "core.affinity.home_dir_not_found",
                fallback = ".",
                "Could not determine home directory - using current directory as fallback"
            );
            PathBuf::from(".").join(".windock").join("affinity.json")
        }
    }
}

/// Durable home of the [`AffinityCache`].
///
/// Background writes are last-write-wins: each write is stamped with a
/// generation when scheduled, and a writer that finds a newer generation
/// already on disk skips its write.
#[derive(Debug)]
pub struct AffinityStore {
    path: PathBuf,
    issued: AtomicU64,
    written: Arc<Mutex<u64>>,
    pending: Mutex<Vec<JoinHandle<()>>>,
}

impl AffinityStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            issued: AtomicU64::new(0),
            written: Arc::new(Mutex::new(0)),
            pending: Mutex::new(Vec::new()),
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(affinity_file_path(config))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the cache. A missing, unreadable or corrupt file yields an empty
    /// cache.
    pub fn load(&self) -> AffinityCache {
        let path = &self.path;
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(event = "core.affinity.load_skipped", path = %path.display());
                return AffinityCache::default();
            }
            Err(e) => {
                tracing::warn!(
                    event = "core.affinity.load_failed",
                    path = %path.display(),
                    error = %e
                );
                return AffinityCache::default();
            }
        };

        match serde_json::from_str::<AffinityCache>(&content) {
            Ok(cache) => {
                tracing::info!(
                    event = "core.affinity.load_completed",
                    path = %path.display(),
                    entries = cache.len()
                );
                cache
            }
            Err(e) => {
                // ERROR (not warn): the file exists but is corrupt; it will be
                // replaced by the next successful save.
                tracing::error!(
                    event = "core.affinity.json_parse_failed",
                    path = %path.display(),
                    error = %e,
                    "Affinity cache file contains invalid JSON - starting with an empty cache"
                );
                AffinityCache::default()
            }
        }
    }

    /// Write the cache atomically (temp file + rename).
    pub fn save(&self, cache: &AffinityCache) -> Result<(), AffinityError> {
        save_to_file(cache, &self.path)
    }

    /// Schedule a write on a background thread and return immediately.
    ///
    /// Returns false when the writer thread could not be started; the cache
    /// is then simply not persisted this time.
    pub fn persist_in_background(&self, cache: AffinityCache) -> bool {
        let generation = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let path = self.path.clone();
        let written = Arc::clone(&self.written);

        let spawned = thread::Builder::new()
            .name(WRITER_THREAD_NAME.to_string())
            .spawn(move || {
                let mut last = written.lock().unwrap_or_else(|e| e.into_inner());
                if *last > generation {
                    tracing::debug!(
                        event = "core.affinity.save_superseded",
                        generation = generation,
                        written = *last
                    );
                    return;
                }
                match save_to_file(&cache, &path) {
                    Ok(()) => {
                        *last = generation;
                        tracing::debug!(
                            event = "core.affinity.save_completed",
                            path = %path.display(),
                            generation = generation
                        );
                    }
                    Err(e) => {
                        tracing::warn!(
                            event = "core.affinity.save_failed",
                            path = %path.display(),
                            error = %e
                        );
                    }
                }
            });

        match spawned {
            Ok(handle) => {
                let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
                pending.retain(|h| !h.is_finished());
                pending.push(handle);
                true
            }
            Err(e) => {
                tracing::warn!(
                    event = "core.affinity.writer_spawn_failed",
                    error = %e
                );
                false
            }
        }
    }

    /// Wait for every scheduled background write to finish.
    pub fn flush(&self) {
        let handles: Vec<JoinHandle<()>> = {
            let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
            pending.drain(..).collect()
        };
        for handle in handles {
            if handle.join().is_err() {
                tracing::warn!(event = "core.affinity.writer_panicked");
            }
        }
    }

    /// Remove the cache file. Returns whether a file was removed.
    pub fn clear(&self) -> Result<bool, AffinityError> {
        self.flush();
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::info!(event = "core.affinity.clear_completed", path = %self.path.display());
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(AffinityError::ClearFailed {
                path: self.path.display().to_string(),
                source: e,
            }),
        }
    }
}

fn cleanup_temp_file(temp_file: &Path, original_error: &std::io::Error) {
    if let Err(cleanup_err) = fs::remove_file(temp_file) {
        tracing::warn!(
            event = "core.affinity.temp_file_cleanup_failed",
            temp_file = %temp_file.display(),
            original_error = %original_error,
            cleanup_error = %cleanup_err
        );
    }
}

fn save_to_file(cache: &AffinityCache, path: &Path) -> Result<(), AffinityError> {
    let save_failed = |source: std::io::Error| AffinityError::SaveFailed {
        path: path.display().to_string(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(save_failed)?;
    }

    let json = serde_json::to_string_pretty(cache).map_err(|e| AffinityError::SerializeFailed {
        message: e.to_string(),
    })?;

    let temp_file = path.with_extension("json.tmp");

    if let Err(e) = fs::write(&temp_file, &json) {
        cleanup_temp_file(&temp_file, &e);
        return Err(save_failed(e));
    }

    if let Err(e) = fs::rename(&temp_file, path) {
        cleanup_temp_file(&temp_file, &e);
        return Err(save_failed(e));
    }

    Ok(())
}
