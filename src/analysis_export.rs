use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::aggregate::Analysis;
use crate::decode::Player;
use crate::filter::{Allowed, FilterSpec};
use crate::settings::MatchInfo;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub momentum_rows: usize,
    pub group_rows: usize,
}

enum Cell {
    Text(String),
    Number(f64),
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<u32> for Cell {
    fn from(value: u32) -> Self {
        Cell::Number(f64::from(value))
    }
}

impl From<i32> for Cell {
    fn from(value: i32) -> Self {
        Cell::Number(f64::from(value))
    }
}

pub fn export_analysis(
    path: &Path,
    analysis: &Analysis,
    spec: &FilterSpec,
    info: &MatchInfo,
) -> Result<ExportReport> {
    let momentum_rows = momentum_rows(analysis);
    let cause_rows = cause_rows(analysis);
    let shot_rows = shot_rows(analysis);
    let filter_rows = filter_rows(spec, info);

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Momentum")?;
        write_rows(sheet, &momentum_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Cause of win")?;
        write_rows(sheet, &cause_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Shot type")?;
        write_rows(sheet, &shot_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Filters")?;
        write_rows(sheet, &filter_rows)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;

    Ok(ExportReport {
        momentum_rows: momentum_rows.len().saturating_sub(1),
        group_rows: cause_rows.len().saturating_sub(1),
    })
}

fn momentum_rows(analysis: &Analysis) -> Vec<Vec<Cell>> {
    let mut rows = vec![vec![
        Cell::from("#"),
        Cell::from("Set-Game"),
        Cell::from("Ball"),
        Cell::from("Result"),
        Cell::from("Net"),
    ]];
    rows.extend(analysis.momentum.iter().enumerate().map(|(idx, point)| {
        vec![
            Cell::from(idx as u32 + 1),
            Cell::from(point.set_game.to_string()),
            Cell::from(point.ball_in_game.clone()),
            Cell::from(if point.won { "W" } else { "L" }),
            Cell::from(point.net),
        ]
    }));
    rows
}

fn cause_rows(analysis: &Analysis) -> Vec<Vec<Cell>> {
    let mut rows = vec![vec![
        Cell::from("Set-Game"),
        Cell::from("Normal play"),
        Cell::from("Unforced error"),
        Cell::from("Strike"),
    ]];
    rows.extend(analysis.breakdown.rows().into_iter().map(|row| {
        vec![
            Cell::from(row.set_game.to_string()),
            Cell::from(row.play),
            Cell::from(row.unforced),
            Cell::from(row.strike),
        ]
    }));
    rows
}

fn shot_rows(analysis: &Analysis) -> Vec<Vec<Cell>> {
    let mut rows = vec![vec![
        Cell::from("Set-Game"),
        Cell::from("Base"),
        Cell::from("Volley"),
        Cell::from("Overhead"),
    ]];
    rows.extend(analysis.breakdown.rows().into_iter().map(|row| {
        vec![
            Cell::from(row.set_game.to_string()),
            Cell::from(row.base),
            Cell::from(row.volley),
            Cell::from(row.overhead),
        ]
    }));
    rows
}

fn filter_rows(spec: &FilterSpec, info: &MatchInfo) -> Vec<Vec<Cell>> {
    vec![
        vec![Cell::from("Match"), Cell::from(info.heading())],
        vec![Cell::from("Sets"), Cell::from(allowed_label(&spec.sets))],
        vec![Cell::from("Games"), Cell::from(allowed_label(&spec.games))],
        vec![
            Cell::from("Servers"),
            Cell::from(match &spec.servers {
                Allowed::Any => "all".to_string(),
                Allowed::Only(players) => players
                    .iter()
                    .map(|p: &Player| p.label())
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        ],
        vec![
            Cell::from("Point of view"),
            Cell::from(spec.perspective().label()),
        ],
    ]
}

fn allowed_label(allowed: &Allowed<u32>) -> String {
    match allowed {
        Allowed::Any => "all".to_string(),
        Allowed::Only(values) => values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(", "),
    }
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<Cell>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            let (r, c) = (row_idx as u32, col_idx as u16);
            let written = match value {
                Cell::Text(text) => worksheet.write_string(r, c, text),
                Cell::Number(num) => worksheet.write_number(r, c, *num),
            };
            written.with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
