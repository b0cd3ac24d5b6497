use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// A promoted team taking over the schedule slot of a relegated one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Swap {
    pub promoted: String,
    pub relegated: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LeagueChangesFile {
    #[serde(default)]
    swaps: Vec<Swap>,
}

/// Promotion/relegation tables for one season change-over.
///
/// The pairing is only ever built from swaps, both directions at once, so
/// applying it twice returns the original name.
#[derive(Debug, Clone, Default)]
pub struct LeagueChanges {
    promoted: HashSet<String>,
    relegated: HashSet<String>,
    pairing: HashMap<String, String>,
}

impl LeagueChanges {
    pub fn from_swaps(swaps: &[Swap]) -> Result<Self> {
        let mut changes = Self::default();
        for swap in swaps {
            let promoted = swap.promoted.trim();
            let relegated = swap.relegated.trim();
            if promoted.is_empty() || relegated.is_empty() {
                return Err(anyhow!("swap with empty team name"));
            }
            if promoted == relegated {
                return Err(anyhow!("{promoted} cannot replace itself"));
            }
            for name in [promoted, relegated] {
                if changes.pairing.contains_key(name) {
                    return Err(anyhow!("{name} appears in more than one swap"));
                }
            }
            changes.insert_swap(promoted, relegated);
        }
        changes.validate()?;
        Ok(changes)
    }

    /// 2024/25 -> 2025/26 Premier League change-over.
    pub fn premier_league_2025_26() -> Self {
        let mut changes = Self::default();
        changes.insert_swap("Leeds United FC", "Leicester City FC");
        changes.insert_swap("Burnley FC", "Southampton FC");
        changes.insert_swap("Sunderland AFC", "Ipswich Town FC");
        changes
    }

    fn insert_swap(&mut self, promoted: &str, relegated: &str) {
        self.promoted.insert(promoted.to_string());
        self.relegated.insert(relegated.to_string());
        self.pairing
            .insert(promoted.to_string(), relegated.to_string());
        self.pairing
            .insert(relegated.to_string(), promoted.to_string());
    }

    pub fn parse_json(raw: &str) -> Result<Self> {
        let file: LeagueChangesFile =
            serde_json::from_str(raw).context("invalid league changes json")?;
        Self::from_swaps(&file.swaps)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read league changes {}", path.display()))?;
        Self::parse_json(&raw).with_context(|| format!("load {}", path.display()))
    }

    pub fn is_promoted(&self, team: &str) -> bool {
        self.promoted.contains(team)
    }

    pub fn is_relegated(&self, team: &str) -> bool {
        self.relegated.contains(team)
    }

    pub fn paired(&self, team: &str) -> Option<&str> {
        self.pairing.get(team).map(String::as_str)
    }

    /// Name that held this fixture slot last season.
    pub fn previous_opponent<'a>(&'a self, team: &'a str) -> &'a str {
        self.paired(team).unwrap_or(team)
    }

    pub fn promoted(&self) -> impl Iterator<Item = &str> {
        self.promoted.iter().map(String::as_str)
    }

    pub fn relegated(&self) -> impl Iterator<Item = &str> {
        self.relegated.iter().map(String::as_str)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(team) = self.promoted.intersection(&self.relegated).next() {
            return Err(anyhow!("{team} is both promoted and relegated"));
        }
        let names: HashSet<&str> = self.promoted().chain(self.relegated()).collect();
        let keys: HashSet<&str> = self.pairing.keys().map(String::as_str).collect();
        if names != keys {
            return Err(anyhow!("pairing must cover exactly the promoted and relegated teams"));
        }
        for (from, to) in &self.pairing {
            if self.paired(to) != Some(from.as_str()) {
                return Err(anyhow!("pairing {from} -> {to} is not symmetric"));
            }
        }
        Ok(())
    }
}
