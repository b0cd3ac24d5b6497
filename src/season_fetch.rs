use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use log::info;

use crate::http_cache::fetch_revalidated;
use crate::http_client::http_client;
use crate::season::{SeasonRecord, parse_season_json};

/// Where `<club>_<season>.json` files live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeasonSource {
    Dir(PathBuf),
    Http(String),
}

impl SeasonSource {
    pub fn from_location(location: &str) -> Self {
        let trimmed = location.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::Http(trimmed.trim_end_matches('/').to_string())
        } else {
            Self::Dir(PathBuf::from(trimmed))
        }
    }

    pub fn resource_name(club: &str, season: &str) -> String {
        format!("{club}_{season}.json")
    }

    pub fn locate(&self, club: &str, season: &str) -> String {
        let name = Self::resource_name(club, season);
        match self {
            Self::Dir(dir) => dir.join(name).display().to_string(),
            Self::Http(base) => format!("{base}/{name}"),
        }
    }

    pub fn fetch_raw(&self, club: &str, season: &str) -> Result<String> {
        let location = self.locate(club, season);
        match self {
            Self::Dir(_) => {
                fs::read_to_string(&location).with_context(|| format!("read {location}"))
            }
            Self::Http(_) => {
                let client = http_client()?;
                let fetched = fetch_revalidated(client, &location)?;
                if fetched.not_modified {
                    info!("{location}: unchanged since last fetch");
                }
                Ok(fetched.body)
            }
        }
    }

    pub fn fetch_season(&self, club: &str, season: &str) -> Result<SeasonRecord> {
        let raw = self.fetch_raw(club, season)?;
        let record = parse_season_json(&raw)
            .with_context(|| format!("parse {}", self.locate(club, season)))?;
        info!(
            "loaded {} fixtures for {club} {season}",
            record.fixtures.len()
        );
        Ok(record)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonPair {
    pub current: SeasonRecord,
    pub previous: SeasonRecord,
}

/// Fetch both seasons side by side. Either failure fails the pair.
pub fn fetch_season_pair(
    source: &SeasonSource,
    club: &str,
    current_season: &str,
    previous_season: &str,
) -> Result<SeasonPair> {
    let (current, previous) = rayon::join(
        || source.fetch_season(club, current_season),
        || source.fetch_season(club, previous_season),
    );
    Ok(SeasonPair {
        current: current?,
        previous: previous?,
    })
}
