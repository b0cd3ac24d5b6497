use std::env;

use anyhow::{Result, anyhow};

use fixture_delta::config::{self, Config};
use fixture_delta::season_fetch::SeasonSource;
use fixture_delta::state::render_table;
use fixture_delta::table::{render_html, render_text};

fn main() -> Result<()> {
    config::init_stderr_logging();
    let mut config = Config::from_env();
    let mut html = false;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--exclude-promoted" => config.exclude_promoted = true,
            "--html" => html = true,
            "--club" => {
                let club = args.next().ok_or_else(|| anyhow!("--club needs a value"))?;
                config.club = club.trim().to_lowercase();
            }
            "--data" => {
                let data = args.next().ok_or_else(|| anyhow!("--data needs a value"))?;
                config.source = SeasonSource::from_location(&data);
            }
            "-h" | "--help" => {
                println!(
                    "usage: fixture_delta_print [--exclude-promoted] [--html] [--club <key>] [--data <dir|url>]"
                );
                return Ok(());
            }
            other => return Err(anyhow!("unknown argument: {other}")),
        }
    }

    config.apply_cache_dir();
    let changes = config.league_changes()?;
    let table = render_table(&config, &changes, config.exclude_promoted)?;
    if html {
        print!("{}", render_html(&table));
    } else {
        print!("{}", render_text(&table));
    }
    Ok(())
}
