use std::env;
use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::LevelFilter;

use crate::http_cache;
use crate::league_changes::LeagueChanges;
use crate::season_fetch::SeasonSource;

pub const DEFAULT_DATA: &str = "data";
pub const DEFAULT_CLUB: &str = "arsenal";
pub const DEFAULT_CURRENT_SEASON: &str = "2025_26";
pub const DEFAULT_PREVIOUS_SEASON: &str = "2024_25";

#[derive(Debug, Clone)]
pub struct Config {
    pub source: SeasonSource,
    pub club: String,
    pub current_season: String,
    pub previous_season: String,
    pub league_changes_file: Option<PathBuf>,
    pub exclude_promoted: bool,
    pub cache_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: SeasonSource::from_location(DEFAULT_DATA),
            club: DEFAULT_CLUB.to_string(),
            current_season: DEFAULT_CURRENT_SEASON.to_string(),
            previous_season: DEFAULT_PREVIOUS_SEASON.to_string(),
            league_changes_file: None,
            exclude_promoted: false,
            cache_dir: None,
        }
    }
}

impl Config {
    /// Loads `.env.local` then `.env` (first one wins per key), then reads the
    /// process environment.
    pub fn from_env() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();
        Self {
            source: get("FIXTURE_DATA")
                .map(|v| SeasonSource::from_location(&v))
                .unwrap_or(defaults.source),
            club: get("FIXTURE_CLUB")
                .map(|v| v.trim().to_lowercase())
                .unwrap_or(defaults.club),
            current_season: get("CURRENT_SEASON")
                .map(|v| v.trim().to_string())
                .unwrap_or(defaults.current_season),
            previous_season: get("PREVIOUS_SEASON")
                .map(|v| v.trim().to_string())
                .unwrap_or(defaults.previous_season),
            league_changes_file: get("LEAGUE_CHANGES_FILE").map(PathBuf::from),
            exclude_promoted: get("EXCLUDE_PROMOTED")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.exclude_promoted),
            cache_dir: get("FIXTURE_CACHE_DIR").map(PathBuf::from),
        }
    }

    pub fn apply_cache_dir(&self) {
        if let Some(dir) = self.cache_dir.clone() {
            http_cache::set_cache_dir(dir);
        }
    }

    pub fn league_changes(&self) -> Result<LeagueChanges> {
        match self.league_changes_file.as_deref() {
            Some(path) => LeagueChanges::load(path),
            None => Ok(LeagueChanges::premier_league_2025_26()),
        }
    }
}

pub fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// stderr logger for the one-shot binary, `RUST_LOG` overrides `warn`.
pub fn init_stderr_logging() {
    let _ = env_logger::Builder::new()
        .filter_level(LevelFilter::Warn)
        .parse_env("RUST_LOG")
        .try_init();
}

/// The TUI owns the terminal, so logs only go to `FIXTURE_DELTA_LOG` if set.
pub fn init_file_logging() -> Result<()> {
    let Some(path) = env::var("FIXTURE_DELTA_LOG")
        .ok()
        .filter(|v| !v.trim().is_empty())
    else {
        return Ok(());
    };
    let file = File::create(&path).with_context(|| format!("create log file {path}"))?;
    let _ = env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_env("RUST_LOG")
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn lookup_overrides_defaults() {
        let vars: HashMap<&str, &str> = [
            ("FIXTURE_DATA", "https://example.org/seasons"),
            ("FIXTURE_CLUB", " Chelsea "),
            ("EXCLUDE_PROMOTED", "yes"),
            ("CURRENT_SEASON", ""),
            ("FIXTURE_CACHE_DIR", "/tmp/fd-cache"),
        ]
        .into_iter()
        .collect();
        let config = Config::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(
            config.source,
            SeasonSource::Http("https://example.org/seasons".to_string())
        );
        assert_eq!(config.club, "chelsea");
        assert!(config.exclude_promoted);
        assert_eq!(config.current_season, DEFAULT_CURRENT_SEASON);
        assert!(config.league_changes_file.is_none());
        assert_eq!(config.cache_dir, Some(PathBuf::from("/tmp/fd-cache")));
    }

    #[test]
    fn flags() {
        assert!(parse_flag("ON"));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("nope"));
    }
}
