use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, anyhow};
use log::{info, warn};
use once_cell::sync::OnceCell;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{ETAG, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED};
use serde::{Deserialize, Serialize};

const CACHE_VERSION: u32 = 1;
const CACHE_DIR: &str = "fixture_delta";
const CACHE_FILE: &str = "season_cache.json";

static CACHE: Mutex<Option<SeasonCacheFile>> = Mutex::new(None);
static CACHE_DIR_OVERRIDE: OnceCell<PathBuf> = OnceCell::new();

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SeasonCacheFile {
    version: u32,
    entries: HashMap<String, CacheEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    body: String,
    etag: Option<String>,
    last_modified: Option<String>,
    fetched_at: u64,
}

#[derive(Debug, Clone)]
pub struct Fetched {
    pub body: String,
    pub not_modified: bool,
}

/// Always asks the server; a cached ETag/Last-Modified turns an unchanged
/// season file into a 304 instead of a full download.
pub fn fetch_revalidated(client: &Client, url: &str) -> Result<Fetched> {
    let cached = cache_guard()
        .get_or_insert_with(SeasonCacheFile::load)
        .entries
        .get(url)
        .cloned();

    let mut req = client.get(url);
    if let Some(entry) = cached.as_ref() {
        if let Some(etag) = entry.etag.as_ref() {
            req = req.header(IF_NONE_MATCH, etag);
        }
        if let Some(last_modified) = entry.last_modified.as_ref() {
            req = req.header(IF_MODIFIED_SINCE, last_modified);
        }
    }

    let resp = req.send().with_context(|| format!("GET {url}"))?;
    let status = resp.status();
    if status == StatusCode::NOT_MODIFIED {
        let Some(entry) = cached else {
            return Err(anyhow!("{url}: 304 without a cached body"));
        };
        info!(
            "{url} not modified, cached copy is {}",
            describe_age(entry.fetched_at, now_secs())
        );
        return Ok(Fetched {
            body: entry.body,
            not_modified: true,
        });
    }

    let etag = header_string(resp.headers(), ETAG);
    let last_modified = header_string(resp.headers(), LAST_MODIFIED);
    let body = resp.text().context("failed reading body")?;
    if !status.is_success() {
        return Err(anyhow!("{url}: http {status}"));
    }

    store_entry(
        url,
        CacheEntry {
            body: body.clone(),
            etag,
            last_modified,
            fetched_at: now_secs(),
        },
    );
    Ok(Fetched {
        body,
        not_modified: false,
    })
}

/// Stores the cache under `dir` instead of the XDG cache location. First call wins.
pub fn set_cache_dir(dir: PathBuf) -> bool {
    CACHE_DIR_OVERRIDE.set(dir).is_ok()
}

fn header_string(
    headers: &reqwest::header::HeaderMap,
    name: reqwest::header::HeaderName,
) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}

fn cache_guard() -> MutexGuard<'static, Option<SeasonCacheFile>> {
    CACHE.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn store_entry(url: &str, entry: CacheEntry) {
    let mut guard = cache_guard();
    let cache = guard.get_or_insert_with(SeasonCacheFile::load);
    cache.entries.insert(url.to_string(), entry);
    if let Err(err) = cache.save() {
        warn!("season cache not saved: {err:#}");
    }
}

impl SeasonCacheFile {
    fn load() -> Self {
        let fresh = Self {
            version: CACHE_VERSION,
            entries: HashMap::new(),
        };
        let Some(raw) = cache_path().and_then(|path| fs::read_to_string(path).ok()) else {
            return fresh;
        };
        match serde_json::from_str::<Self>(&raw) {
            Ok(cache) if cache.version == CACHE_VERSION => cache,
            _ => fresh,
        }
    }

    fn save(&self) -> Result<()> {
        let Some(path) = cache_path() else {
            return Ok(());
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("create cache dir {}", dir.display()))?;
        }
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string(self).context("serialize season cache")?;
        fs::write(&tmp, json).context("write season cache")?;
        fs::rename(&tmp, &path).context("swap season cache")?;
        Ok(())
    }
}

fn cache_path() -> Option<PathBuf> {
    if let Some(dir) = CACHE_DIR_OVERRIDE.get() {
        return Some(dir.join(CACHE_FILE));
    }
    let base = std::env::var("XDG_CACHE_HOME")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(|home| PathBuf::from(home).join(".cache"))
        })?;
    Some(base.join(CACHE_DIR).join(CACHE_FILE))
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

fn describe_age(fetched_at: u64, now: u64) -> String {
    match now.saturating_sub(fetched_at) {
        secs @ 0..=59 => format!("{secs}s old"),
        secs @ 60..=3599 => format!("{}m old", secs / 60),
        secs => format!("{}h old", secs / 3600),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_is_coarse() {
        let now = 1_760_000_000;
        assert_eq!(describe_age(now, now), "0s old");
        assert_eq!(describe_age(now - 125, now), "2m old");
        assert_eq!(describe_age(now - 7300, now), "2h old");
        assert_eq!(describe_age(now + 30, now), "0s old");
    }
}
