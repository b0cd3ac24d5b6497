use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use anyhow::Result;
use log::{info, warn};

use crate::comparison::compare_seasons;
use crate::config::Config;
use crate::league_changes::LeagueChanges;
use crate::season_fetch::fetch_season_pair;
use crate::table::{ComparisonTable, build_table};

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderCommand {
    Render {
        generation: u64,
        exclude_promoted: bool,
    },
}

#[derive(Debug, Clone)]
pub enum Delta {
    Rendered {
        generation: u64,
        exclude_promoted: bool,
        table: ComparisonTable,
    },
    RenderFailed {
        generation: u64,
        error: String,
    },
    Log(String),
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub exclude_promoted: bool,
    pub table: Option<ComparisonTable>,
    /// Toggle state the shown table was built with.
    pub shown_exclude_promoted: bool,
    pub requested_generation: u64,
    pub shown_generation: u64,
    pub loading: bool,
    pub status: Option<String>,
    pub logs: VecDeque<String>,
    pub scroll: usize,
    pub visible_rows: usize,
}

impl AppState {
    pub fn new(exclude_promoted: bool) -> Self {
        Self {
            exclude_promoted,
            table: None,
            shown_exclude_promoted: exclude_promoted,
            requested_generation: 0,
            shown_generation: 0,
            loading: false,
            status: None,
            logs: VecDeque::new(),
            scroll: 0,
            visible_rows: 1,
        }
    }

    pub fn request_render(&mut self) -> RenderCommand {
        self.requested_generation += 1;
        self.loading = true;
        RenderCommand::Render {
            generation: self.requested_generation,
            exclude_promoted: self.exclude_promoted,
        }
    }

    /// Flips the toggle; the caller must send the returned command.
    pub fn toggle_exclude_promoted(&mut self) -> RenderCommand {
        self.exclude_promoted = !self.exclude_promoted;
        self.request_render()
    }

    pub fn toggle_label(&self) -> &'static str {
        if self.exclude_promoted {
            "Include Promoted Teams"
        } else {
            "Exclude Promoted Teams"
        }
    }

    /// Offset at which the last fixture row sits at the bottom of the view.
    pub fn max_scroll(&self) -> usize {
        let rows = self.table.as_ref().map(|t| t.rows.len()).unwrap_or(0);
        rows.saturating_sub(self.visible_rows.max(1))
    }

    pub fn scroll_down(&mut self) {
        if self.scroll < self.max_scroll() {
            self.scroll += 1;
        }
    }

    pub fn set_visible_rows(&mut self, rows: usize) {
        self.visible_rows = rows;
        self.scroll = self.scroll.min(self.max_scroll());
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn push_log(&mut self, line: String) {
        self.logs.push_back(line);
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

/// Results older than the newest request are dropped, so a slow render can
/// never overwrite the table of a later toggle.
pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::Rendered {
            generation,
            exclude_promoted,
            table,
        } => {
            if generation < state.requested_generation {
                state.push_log(format!("[INFO] Dropped stale render #{generation}"));
                return;
            }
            state.loading = false;
            state.shown_generation = generation;
            state.shown_exclude_promoted = exclude_promoted;
            state.status = None;
            state.table = Some(table);
            state.scroll = state.scroll.min(state.max_scroll());
        }
        Delta::RenderFailed { generation, error } => {
            state.push_log(format!("[WARN] Render #{generation} failed: {error}"));
            if generation < state.requested_generation {
                return;
            }
            state.loading = false;
            state.status = Some(error);
        }
        Delta::Log(line) => state.push_log(line),
    }
}

/// Fetch both seasons and build the table. Fetch errors propagate.
pub fn render_table(
    config: &Config,
    changes: &LeagueChanges,
    exclude_promoted: bool,
) -> Result<ComparisonTable> {
    let pair = fetch_season_pair(
        &config.source,
        &config.club,
        &config.current_season,
        &config.previous_season,
    )?;
    let comparison = compare_seasons(&pair.current, &pair.previous, changes, exclude_promoted);
    Ok(build_table(
        &comparison,
        &config.current_season,
        &config.previous_season,
    ))
}

pub fn spawn_render_worker(
    config: Config,
    changes: LeagueChanges,
    tx: Sender<Delta>,
    cmd_rx: Receiver<RenderCommand>,
) {
    thread::spawn(move || {
        while let Ok(mut cmd) = cmd_rx.recv() {
            // Only the newest queued request is worth fetching for.
            while let Ok(next) = cmd_rx.try_recv() {
                cmd = next;
            }
            let RenderCommand::Render {
                generation,
                exclude_promoted,
            } = cmd;
            let delta = match render_table(&config, &changes, exclude_promoted) {
                Ok(table) => {
                    info!(
                        "render #{generation}: {} rows, delta {}",
                        table.rows.len(),
                        table.delta
                    );
                    let _ = tx.send(Delta::Log(format!(
                        "[INFO] Render #{generation}: {} fixtures, {}",
                        table.rows.len(),
                        table.delta
                    )));
                    Delta::Rendered {
                        generation,
                        exclude_promoted,
                        table,
                    }
                }
                Err(err) => {
                    warn!("render #{generation} failed: {err:#}");
                    Delta::RenderFailed {
                        generation,
                        error: format!("{err:#}"),
                    }
                }
            };
            if tx.send(delta).is_err() {
                break;
            }
        }
    });
}
