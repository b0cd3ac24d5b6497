use std::fmt::Write as _;

use crate::comparison::{Comparison, ComparisonRow, format_delta};
use crate::season::season_label;

pub const AGGREGATE_LABEL: &str = "Points Gained";
pub const PLACEHOLDER: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointsTier {
    Win,
    Draw,
    Loss,
}

impl PointsTier {
    pub fn classify(points: Option<i64>) -> Option<Self> {
        match points? {
            3 => Some(Self::Win),
            1 => Some(Self::Draw),
            0 => Some(Self::Loss),
            _ => None,
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Self::Win => "points-3",
            Self::Draw => "points-1",
            Self::Loss => "points-0",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointsCell {
    pub text: String,
    pub tier: Option<PointsTier>,
    pub note: Option<String>,
}

impl PointsCell {
    fn from_points(points: Option<i64>, raw: Option<&str>) -> Self {
        let text = match (points, raw) {
            (Some(p), _) => p.to_string(),
            (None, Some(raw)) => raw.to_string(),
            (None, None) => PLACEHOLDER.to_string(),
        };
        Self {
            text,
            tier: PointsTier::classify(points),
            note: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub fixture: String,
    pub previous: PointsCell,
    pub current: PointsCell,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonTable {
    pub header: [String; 3],
    pub delta: String,
    pub rows: Vec<TableRow>,
}

impl ComparisonTable {
    pub fn aggregate_row(&self) -> [&str; 3] {
        [AGGREGATE_LABEL, PLACEHOLDER, self.delta.as_str()]
    }
}

pub fn build_table(
    comparison: &Comparison,
    current_season: &str,
    previous_season: &str,
) -> ComparisonTable {
    ComparisonTable {
        header: [
            "Fixture".to_string(),
            format!("{} Points", season_label(previous_season)),
            format!("{} Points", season_label(current_season)),
        ],
        delta: format_delta(comparison.delta),
        rows: comparison.rows.iter().map(build_row).collect(),
    }
}

fn build_row(row: &ComparisonRow) -> TableRow {
    let mut previous = PointsCell::from_points(row.previous_points, row.previous_text.as_deref());
    previous.note = row.paired_with.clone();
    TableRow {
        fixture: format!("{} ({})", row.opponent, row.venue_label()),
        previous,
        current: PointsCell::from_points(row.current_points, row.current_text.as_deref()),
    }
}

pub fn render_text(table: &ComparisonTable) -> String {
    let cells = |row: &TableRow| -> [String; 3] {
        let previous = match row.previous.note.as_deref() {
            Some(note) => format!("{} ({note})", row.previous.text),
            None => row.previous.text.clone(),
        };
        [row.fixture.clone(), previous, row.current.text.clone()]
    };

    let mut lines: Vec<[String; 3]> = Vec::with_capacity(table.rows.len() + 2);
    lines.push(table.header.clone());
    lines.push(table.aggregate_row().map(str::to_string));
    lines.extend(table.rows.iter().map(cells));

    let mut widths = [0usize; 3];
    for line in &lines {
        for (w, cell) in widths.iter_mut().zip(line) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for (idx, line) in lines.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:<w0$}  {:>w1$}  {:>w2$}",
            line[0],
            line[1],
            line[2],
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2],
        );
        if idx == 0 {
            let rule = widths.iter().sum::<usize>() + 4;
            let _ = writeln!(out, "{}", "-".repeat(rule));
        }
    }
    out
}

pub fn render_html(table: &ComparisonTable) -> String {
    let mut out = String::from("<table>\n");
    out.push_str("  <tr>");
    for cell in &table.header {
        let _ = write!(out, "<th>{}</th>", escape_html(cell));
    }
    out.push_str("</tr>\n  <tr>");
    for cell in table.aggregate_row() {
        let _ = write!(out, "<td><strong>{}</strong></td>", escape_html(cell));
    }
    out.push_str("</tr>\n");
    for row in &table.rows {
        let _ = writeln!(
            out,
            "  <tr><td>{}</td>{}{}</tr>",
            escape_html(&row.fixture),
            html_points_cell(&row.previous),
            html_points_cell(&row.current),
        );
    }
    out.push_str("</table>\n");
    out
}

fn html_points_cell(cell: &PointsCell) -> String {
    let class = cell.tier.map(PointsTier::css_class).unwrap_or_default();
    let note = cell
        .note
        .as_deref()
        .map(|n| format!("<br><small>({})</small>", escape_html(n)))
        .unwrap_or_default();
    format!(
        "<td class=\"{class}\">{}{note}</td>",
        escape_html(&cell.text)
    )
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
