use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;

/// One scheduled match for the club. `points` is `None` until the match is played.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fixture {
    pub opponent: String,
    pub home: bool,
    pub points: Option<i64>,
    // Non-numeric points value ("3", true) as written; shown, never counted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points_text: Option<String>,
}

impl Fixture {
    pub fn new(opponent: &str, home: bool, points: Option<i64>) -> Self {
        Self {
            opponent: opponent.to_string(),
            home,
            points,
            points_text: None,
        }
    }

    pub fn venue_label(&self) -> &'static str {
        venue_label(self.home)
    }
}

pub fn venue_label(home: bool) -> &'static str {
    if home { "Home" } else { "Away" }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeasonRecord {
    pub fixtures: Vec<Fixture>,
}

impl SeasonRecord {
    pub fn new(fixtures: Vec<Fixture>) -> Self {
        Self { fixtures }
    }

    /// First fixture against `opponent` at the given venue.
    pub fn find(&self, opponent: &str, home: bool) -> Option<&Fixture> {
        self.fixtures
            .iter()
            .find(|f| f.opponent == opponent && f.home == home)
    }
}

/// Season keys are stored as `2024_25`; tables show them as `2024/25`.
pub fn season_label(key: &str) -> String {
    key.replace('_', "/")
}

pub fn parse_season_json(raw: &str) -> Result<SeasonRecord> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(SeasonRecord::default());
    }
    let v: Value = serde_json::from_str(trimmed).context("invalid season json")?;
    let Some(arr) = v.get("fixtures").and_then(|x| x.as_array()) else {
        return Ok(SeasonRecord::default());
    };
    Ok(SeasonRecord::new(arr.iter().map(parse_fixture).collect()))
}

fn parse_fixture(v: &Value) -> Fixture {
    let opponent = v
        .get("opponent")
        .and_then(|x| x.as_str())
        .unwrap_or_default()
        .to_string();
    let home = v.get("home").and_then(|x| x.as_bool()).unwrap_or(false);
    let raw_points = v.get("points");
    let points = raw_points.and_then(parse_points);
    let points_text = raw_points.and_then(|p| match p {
        Value::String(text) => Some(text.clone()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    });
    Fixture {
        opponent,
        home,
        points,
        points_text,
    }
}

fn parse_points(v: &Value) -> Option<i64> {
    if let Some(p) = v.as_i64() {
        return Some(p);
    }
    // Points files are hand-edited; "3.0" style numbers show up.
    v.as_f64().filter(|p| p.is_finite()).map(|p| p.trunc() as i64)
}
