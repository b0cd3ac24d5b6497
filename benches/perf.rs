use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use fixture_delta::comparison::compare_seasons;
use fixture_delta::league_changes::LeagueChanges;
use fixture_delta::season::{Fixture, SeasonRecord, parse_season_json};
use fixture_delta::table::{build_table, render_html};

const OPPONENTS: [&str; 19] = [
    "Leeds United FC",
    "Burnley FC",
    "Sunderland AFC",
    "Chelsea FC",
    "Liverpool FC",
    "Manchester City FC",
    "Manchester United FC",
    "Tottenham Hotspur FC",
    "Newcastle United FC",
    "Aston Villa FC",
    "Brighton & Hove Albion FC",
    "Brentford FC",
    "Fulham FC",
    "Crystal Palace FC",
    "Everton FC",
    "West Ham United FC",
    "Wolverhampton Wanderers FC",
    "Nottingham Forest FC",
    "AFC Bournemouth",
];

fn full_season(changes: &LeagueChanges, previous: bool) -> SeasonRecord {
    let mut fixtures = Vec::with_capacity(OPPONENTS.len() * 2);
    for (i, name) in OPPONENTS.into_iter().enumerate() {
        let opponent = if previous {
            changes.previous_opponent(name)
        } else {
            name
        };
        for home in [true, false] {
            let points = [3, 1, 0][(i + usize::from(home) + usize::from(previous)) % 3];
            fixtures.push(Fixture::new(opponent, home, Some(points)));
        }
    }
    SeasonRecord::new(fixtures)
}

fn bench_compare(c: &mut Criterion) {
    let changes = LeagueChanges::premier_league_2025_26();
    let current = full_season(&changes, false);
    let previous = full_season(&changes, true);

    c.bench_function("compare_seasons_all", |b| {
        b.iter(|| compare_seasons(black_box(&current), black_box(&previous), &changes, false))
    });
    c.bench_function("compare_seasons_excluding_promoted", |b| {
        b.iter(|| compare_seasons(black_box(&current), black_box(&previous), &changes, true))
    });
    c.bench_function("build_and_render_html", |b| {
        b.iter(|| {
            let cmp = compare_seasons(&current, &previous, &changes, false);
            render_html(&build_table(black_box(&cmp), "2025_26", "2024_25"))
        })
    });
}

fn bench_parse(c: &mut Criterion) {
    let changes = LeagueChanges::premier_league_2025_26();
    let raw = serde_json::to_string(&full_season(&changes, false)).expect("serializable season");
    c.bench_function("parse_season_json", |b| {
        b.iter(|| parse_season_json(black_box(&raw)).expect("valid json"))
    });
}

criterion_group!(benches, bench_compare, bench_parse);
criterion_main!(benches);
