//! # On-disk License Cache
//!
//! One JSON file per product under a single directory, named by a
//! content-addressed scheme: the first 16 hex characters of
//! SHA-256(product_id) plus `.json`. Records carry the cached token and a
//! refresh deadline 24 hours out.
//!
//! Caching is strictly best-effort. Writes go through a unique temp file,
//! `sync_all`, and an atomic rename, so concurrent readers never observe a
//! torn record; every I/O failure is logged and swallowed, degrading the SDK
//! to "no cache" rather than breaking the host application. Readers treat
//! absent, unreadable, and invalid files identically as `None`.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::{fs, io};
use tracing::{debug, warn};

/// How long a cached record stays fresh before an online refresh is due.
pub const REFRESH_INTERVAL_MS: i64 = 24 * 60 * 60 * 1000;

/// Environment variable overriding the default cache directory.
pub const STORAGE_DIR_ENV: &str = "TUISH_STORAGE_DIR";

/// A cached license record as persisted on disk.
///
/// The field names are part of the on-disk format shared with the other SDK
/// implementations; do not rename them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedLicense {
    /// The cached license token.
    pub license_key: String,
    /// When the record was written, epoch milliseconds.
    pub cached_at: i64,
    /// When the record should be revalidated online, epoch milliseconds.
    pub refresh_at: i64,
    /// The product this record belongs to.
    pub product_id: String,
    /// The machine fingerprint captured at save time.
    pub machine_fingerprint: String,
}

/// File-based license cache for a single storage directory.
#[derive(Debug)]
pub struct LicenseCache {
    dir: PathBuf,
    /// A unique counter used to generate temporary file names.
    tmp_counter: AtomicU64,
}

impl LicenseCache {
    /// Creates a cache over `dir`. The directory is created lazily on the
    /// first write, never by construction or reads.
    #[must_use]
    pub fn new(dir: PathBuf) -> Self {
        Self { dir, tmp_counter: AtomicU64::new(0) }
    }

    /// The default storage directory: `$TUISH_STORAGE_DIR` if set and
    /// non-empty, else `~/.tuish/licenses/`.
    #[must_use]
    pub fn default_dir() -> PathBuf {
        if let Ok(dir) = std::env::var(STORAGE_DIR_ENV)
            && !dir.is_empty()
        {
            return PathBuf::from(dir);
        }
        dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".tuish").join("licenses")
    }

    /// The directory this cache reads and writes.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The cache file path for a product. Total and deterministic: the name
    /// is the first 16 hex characters of SHA-256(product_id) plus `.json`.
    #[must_use]
    pub fn file_path(&self, product_id: &str) -> PathBuf {
        self.dir.join(file_name(product_id))
    }

    /// Writes or overwrites the record for a product, stamping
    /// `cached_at = now_ms` and `refresh_at = now_ms + 24h`.
    ///
    /// Never surfaces an error: on any failure the record is simply not
    /// persisted and a subsequent [`load`](Self::load) returns `None`.
    pub fn save(&self, product_id: &str, license_key: &str, machine_fingerprint: &str, now_ms: i64) {
        let record = CachedLicense {
            license_key: license_key.to_owned(),
            cached_at: now_ms,
            refresh_at: now_ms + REFRESH_INTERVAL_MS,
            product_id: product_id.to_owned(),
            machine_fingerprint: machine_fingerprint.to_owned(),
        };

        let json = match serde_json::to_vec_pretty(&record) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "License record serialization failed");
                return;
            },
        };

        let target = self.file_path(product_id);
        if let Err(e) = self.write_atomic(&target, &json) {
            warn!(path = %target.display(), error = %e, "License cache write failed");
            return;
        }
        debug!(path = %target.display(), "License cached");
    }

    /// Loads the cached record for a product.
    ///
    /// Returns `None` if the file is absent, unreadable, or does not parse as
    /// a complete record. Never raises; a partial record is never observed.
    #[must_use]
    pub fn load(&self, product_id: &str) -> Option<CachedLicense> {
        let path = self.file_path(product_id);
        let content = match fs::read(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "License cache read failed");
                return None;
            },
        };

        match serde_json::from_slice::<CachedLicense>(&content) {
            Ok(record) => {
                debug!(path = %path.display(), "Loaded cached license");
                Some(record)
            },
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Cached license failed validation");
                None
            },
        }
    }

    /// Whether a record's refresh deadline has passed. A legacy record whose
    /// `refresh_at` precedes its `cached_at` counts as needing refresh.
    #[must_use]
    pub const fn needs_refresh(record: &CachedLicense, now_ms: i64) -> bool {
        now_ms >= record.refresh_at
    }

    /// Deletes the record for a product. Silent on absence or failure.
    pub fn remove(&self, product_id: &str) {
        let path = self.file_path(product_id);
        match fs::remove_file(&path) {
            Ok(()) => debug!(path = %path.display(), "Removed cached license"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {},
            Err(e) => debug!(path = %path.display(), error = %e, "License cache remove failed"),
        }
    }

    /// Deletes every `*.json` record in the cache directory.
    pub fn clear_all(&self) {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(_) => return,
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json")
                && let Err(e) = fs::remove_file(&path)
            {
                debug!(path = %path.display(), error = %e, "License cache clear failed");
            }
        }
        debug!(dir = %self.dir.display(), "Cleared cached licenses");
    }

    /// Atomic swap: unique temp file, hardware sync, rename over the target.
    fn write_atomic(&self, target: &Path, data: &[u8]) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;

        let temp = self.unique_tmp_path(target);
        {
            let mut options = fs::OpenOptions::new();
            options.create_new(true).write(true);
            let mut file = options.open(&temp)?;
            io::Write::write_all(&mut file, data)?;
            file.sync_all()?;
        }

        if let Err(e) = fs::rename(&temp, target) {
            // Windows refuses to rename over an existing file.
            if e.kind() == io::ErrorKind::AlreadyExists {
                fs::remove_file(target)?;
                fs::rename(&temp, target)?;
            } else {
                let _ = fs::remove_file(&temp);
                return Err(e);
            }
        }

        Self::sync_dir(&self.dir);
        Ok(())
    }

    fn unique_tmp_path(&self, target: &Path) -> PathBuf {
        let counter = self.tmp_counter.fetch_add(1, Ordering::Relaxed);
        let file_name = target.file_name().and_then(|s| s.to_str()).unwrap_or("license");
        let tmp_name = format!("{file_name}.tuishtmp.{}.{counter}", std::process::id());
        target.with_file_name(tmp_name)
    }

    fn sync_dir(path: &Path) {
        match fs::File::open(path) {
            Ok(dir) => {
                if let Err(e) = dir.sync_all() {
                    debug!(path = %path.display(), error = %e, "Directory sync failed");
                }
            },
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Directory open failed");
            },
        }
    }
}

/// The cache file name for a product id.
#[must_use]
pub fn file_name(product_id: &str) -> String {
    let digest = Sha256::digest(product_id.as_bytes());
    let hex = hex::encode(digest);
    format!("{}.json", &hex[..16])
}
