use log::debug;

use crate::league_changes::LeagueChanges;
use crate::season::{Fixture, SeasonRecord, venue_label};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonRow {
    pub opponent: String,
    pub home: bool,
    pub current_points: Option<i64>,
    pub previous_points: Option<i64>,
    pub current_text: Option<String>,
    pub previous_text: Option<String>,
    // Set only when last season's slot belonged to a different team.
    pub paired_with: Option<String>,
}

impl ComparisonRow {
    /// Contribution to the aggregate; unplayed fixtures contribute nothing.
    pub fn delta(&self) -> Option<i64> {
        self.current_points
            .map(|cur| cur.saturating_sub(self.previous_points.unwrap_or(0)))
    }

    pub fn venue_label(&self) -> &'static str {
        venue_label(self.home)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comparison {
    pub rows: Vec<ComparisonRow>,
    pub delta: i64,
}

/// Pair each current fixture with last season's equivalent and total the
/// point swing. Rows keep the order of `current.fixtures`.
pub fn compare_seasons(
    current: &SeasonRecord,
    previous: &SeasonRecord,
    changes: &LeagueChanges,
    exclude_promoted: bool,
) -> Comparison {
    let working = current
        .fixtures
        .iter()
        .filter(|f| !(exclude_promoted && changes.is_promoted(&f.opponent)));

    let mut rows = Vec::new();
    let mut delta = 0i64;
    for cur in working {
        let prev_opponent = changes.previous_opponent(&cur.opponent);
        // Also drops slots whose previous occupant was relegated.
        if exclude_promoted
            && (changes.is_promoted(&cur.opponent) || changes.is_relegated(prev_opponent))
        {
            debug!("excluding {} ({})", cur.opponent, cur.venue_label());
            continue;
        }
        let row = pair_fixture(cur, prev_opponent, previous, changes);
        if let Some(d) = row.delta() {
            delta = delta.saturating_add(d);
        }
        rows.push(row);
    }

    Comparison { rows, delta }
}

fn pair_fixture(
    cur: &Fixture,
    prev_opponent: &str,
    previous: &SeasonRecord,
    changes: &LeagueChanges,
) -> ComparisonRow {
    let prev = previous.find(prev_opponent, cur.home);
    let paired_with = changes
        .paired(&cur.opponent)
        .map(|name| name.to_string());
    ComparisonRow {
        opponent: cur.opponent.clone(),
        home: cur.home,
        current_points: cur.points,
        previous_points: prev.and_then(|f| f.points),
        current_text: cur.points_text.clone(),
        previous_text: prev.and_then(|f| f.points_text.clone()),
        paired_with,
    }
}

/// `+3` for gains, `0` and `-2` as-is.
pub fn format_delta(delta: i64) -> String {
    if delta > 0 {
        format!("+{delta}")
    } else {
        delta.to_string()
    }
}
