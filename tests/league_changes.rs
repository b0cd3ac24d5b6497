use std::path::PathBuf;

use fixture_delta::league_changes::{LeagueChanges, Swap};

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

#[test]
fn pairing_is_an_involution() {
    let changes = LeagueChanges::premier_league_2025_26();
    let names: Vec<&str> = changes.promoted().chain(changes.relegated()).collect();
    assert_eq!(names.len(), 6);
    for name in names {
        let once = changes.paired(name).expect("every changed team is paired");
        assert_ne!(once, name);
        assert_eq!(changes.paired(once), Some(name));
    }
}

#[test]
fn promoted_pairs_with_relegated() {
    let changes = LeagueChanges::premier_league_2025_26();
    for team in changes.promoted() {
        let partner = changes.paired(team).expect("paired");
        assert!(changes.is_relegated(partner));
    }
    assert_eq!(
        changes.previous_opponent("Sunderland AFC"),
        "Ipswich Town FC"
    );
    assert_eq!(changes.previous_opponent("Chelsea FC"), "Chelsea FC");
}

#[test]
fn loads_swaps_file() {
    let changes = LeagueChanges::load(&fixture_path("league_changes.json")).expect("valid file");
    assert!(changes.is_promoted("Coventry City FC"));
    assert!(changes.is_relegated("Burnley FC"));
    assert_eq!(changes.paired("Burnley FC"), Some("Coventry City FC"));
    assert!(!changes.is_promoted("Leeds United FC"));
    changes.validate().expect("loaded tables are consistent");
}

#[test]
fn missing_file_is_an_error() {
    assert!(LeagueChanges::load(&fixture_path("no_such_changes.json")).is_err());
}

#[test]
fn self_swap_is_rejected() {
    let swaps = vec![Swap {
        promoted: "A".to_string(),
        relegated: "A".to_string(),
    }];
    assert!(LeagueChanges::from_swaps(&swaps).is_err());
}

#[test]
fn empty_swaps_file_means_no_changes() {
    let changes = LeagueChanges::parse_json("{}").expect("empty object is valid");
    assert_eq!(changes.promoted().count(), 0);
    assert_eq!(changes.previous_opponent("Leeds United FC"), "Leeds United FC");
}
