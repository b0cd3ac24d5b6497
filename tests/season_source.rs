use std::path::PathBuf;

use fixture_delta::config::Config;
use fixture_delta::league_changes::LeagueChanges;
use fixture_delta::season::parse_season_json;
use fixture_delta::season_fetch::{SeasonSource, fetch_season_pair};
use fixture_delta::state::render_table;

fn fixtures_dir() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path
}

fn config_for(club: &str) -> Config {
    Config {
        source: SeasonSource::Dir(fixtures_dir()),
        club: club.to_string(),
        ..Config::default()
    }
}

#[test]
fn fetches_both_seasons_from_dir() {
    let source = SeasonSource::Dir(fixtures_dir());
    let pair = fetch_season_pair(&source, "arsenal", "2025_26", "2024_25").expect("both load");
    assert_eq!(pair.current.fixtures.len(), 8);
    assert_eq!(pair.previous.fixtures.len(), 7);
    assert_eq!(pair.current.fixtures[1].points, None);
}

#[test]
fn missing_season_fails_the_pair() {
    let source = SeasonSource::Dir(fixtures_dir());
    let err = fetch_season_pair(&source, "arsenal", "2025_26", "2023_24")
        .expect_err("previous season file is absent");
    assert!(format!("{err:#}").contains("arsenal_2023_24.json"));
}

#[test]
fn malformed_season_fails_the_render() {
    let config = config_for("broken");
    let changes = LeagueChanges::premier_league_2025_26();
    assert!(render_table(&config, &changes, false).is_err());
}

#[test]
fn renders_table_from_dir() {
    let config = config_for("arsenal");
    let changes = LeagueChanges::premier_league_2025_26();
    let table = render_table(&config, &changes, true).expect("render");
    assert_eq!(table.delta, "+2");
    assert_eq!(table.rows.len(), 5);
    assert_eq!(table.header[1], "2024/25 Points");
    assert_eq!(table.header[2], "2025/26 Points");
}

#[test]
fn null_and_missing_fixtures_are_empty() {
    assert!(parse_season_json("null").expect("null").fixtures.is_empty());
    assert!(parse_season_json("  ").expect("blank").fixtures.is_empty());
    assert!(parse_season_json("{}").expect("no fixtures").fixtures.is_empty());
    assert!(parse_season_json("{\"fixtures\": [").is_err());
}

#[test]
fn missing_fields_degrade() {
    let season = parse_season_json(r#"{"fixtures":[{}]}"#).expect("valid json");
    let fixture = &season.fixtures[0];
    assert_eq!(fixture.opponent, "");
    assert!(!fixture.home);
    assert_eq!(fixture.points, None);
}
