use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

use padel_terminal::aggregate::{Analysis, BreakdownRow, MomentumPoint, analyze};
use padel_terminal::analysis_export::export_analysis;
use padel_terminal::dataset::{load_configured, write_match_log};
use padel_terminal::decode::Player;
use padel_terminal::filter::{Allowed, FilterSpec};
use padel_terminal::settings::Settings;

#[derive(Parser)]
#[command(name = "padel-report")]
#[command(about = "Print momentum and playstyle breakdowns for a padel match log")]
struct Cli {
    /// Match log CSV (defaults to PADEL_CSV or padel_analytics.csv)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Use the generated demo match instead of a CSV file
    #[arg(long)]
    demo: bool,

    /// Seed for the demo match
    #[arg(long)]
    seed: Option<u64>,

    /// Keep only these sets (repeatable)
    #[arg(long = "set")]
    sets: Vec<u32>,

    /// Keep only these games (repeatable)
    #[arg(long = "game")]
    games: Vec<u32>,

    /// Keep only balls served by these players (repeatable)
    #[arg(long = "server", value_parser = parse_player)]
    servers: Vec<Player>,

    /// Count wins from Fredrik & Olle's side
    #[arg(long)]
    invert: bool,

    /// Print JSON instead of tables
    #[arg(long)]
    json: bool,

    /// Also write the analysis to an xlsx workbook
    #[arg(long)]
    xlsx: Option<PathBuf>,

    /// Write the loaded match log back out as CSV (handy with --demo)
    #[arg(long)]
    dump_csv: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn parse_player(raw: &str) -> Result<Player, String> {
    Player::from_name(raw).ok_or_else(|| {
        let names: Vec<&str> = Player::ALL.iter().map(|p| p.label()).collect();
        format!("unknown player {raw:?}, expected one of {}", names.join(", "))
    })
}

impl Cli {
    fn filter_spec(&self) -> FilterSpec {
        FilterSpec {
            sets: allowed(&self.sets),
            games: allowed(&self.games),
            servers: allowed(&self.servers),
            invert_result: self.invert,
        }
    }
}

// No values on the command line means no restriction.
fn allowed<T: Ord + Copy>(values: &[T]) -> Allowed<T> {
    if values.is_empty() {
        Allowed::Any
    } else {
        Allowed::only(values.iter().copied())
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    perspective: &'static str,
    momentum: &'a [MomentumPoint],
    breakdown: Vec<BreakdownRow>,
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install log subscriber")?;

    let mut settings = Settings::from_env();
    if let Some(input) = &cli.input {
        settings.csv_path = input.clone();
    }
    settings.demo |= cli.demo;
    if let Some(seed) = cli.seed {
        settings.demo_seed = seed;
    }

    let dataset = load_configured(&settings).with_context(|| {
        if settings.demo {
            "failed to build demo match".to_string()
        } else {
            format!("failed to load {}", settings.csv_path.display())
        }
    })?;

    if let Some(path) = &cli.dump_csv {
        let file =
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        write_match_log(file, &dataset.raw)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), rows = dataset.raw.len(), "wrote match log");
    }

    let spec = cli.filter_spec();
    let analysis = analyze(&dataset.events, &spec);
    if analysis.events.is_empty() {
        warn!("no balls match the given filters");
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if cli.json {
        let report = JsonReport {
            perspective: spec.perspective().label(),
            momentum: &analysis.momentum,
            breakdown: analysis.breakdown.rows(),
        };
        serde_json::to_writer_pretty(&mut out, &report).context("failed to encode report")?;
        writeln!(out)?;
    } else {
        print_tables(&mut out, &analysis, &spec, &settings)?;
    }

    if let Some(path) = &cli.xlsx {
        let report = export_analysis(path, &analysis, &spec, &settings.match_info)?;
        info!(
            path = %path.display(),
            balls = report.momentum_rows,
            games = report.group_rows,
            "exported workbook"
        );
    }

    Ok(())
}

fn print_tables(
    out: &mut impl Write,
    analysis: &Analysis,
    spec: &FilterSpec,
    settings: &Settings,
) -> io::Result<()> {
    writeln!(out, "{}", settings.match_info.heading())?;
    writeln!(out, "Point of view: {}", spec.perspective().label())?;
    writeln!(
        out,
        "Balls: {}  Won: {}  Lost: {}  Net: {:+}",
        analysis.momentum.len(),
        analysis.points_won(),
        analysis.points_lost(),
        analysis.final_net()
    )?;
    writeln!(out)?;

    writeln!(out, "{:<4} {:>8} {:>6} {:>3} {:>5}", "#", "Set-Game", "Ball", "W/L", "Net")?;
    for (idx, point) in analysis.momentum.iter().enumerate() {
        writeln!(
            out,
            "{:<4} {:>8} {:>6} {:>3} {:>+5}",
            idx + 1,
            point.set_game,
            point.ball_in_game,
            if point.won { "W" } else { "L" },
            point.net
        )?;
    }
    writeln!(out)?;

    writeln!(
        out,
        "{:>8} | {:>5} {:>8} {:>6} | {:>4} {:>6} {:>8}",
        "Set-Game", "Play", "Unforced", "Strike", "Base", "Volley", "Overhead"
    )?;
    for row in analysis.breakdown.rows() {
        writeln!(
            out,
            "{:>8} | {:>5} {:>8} {:>6} | {:>4} {:>6} {:>8}",
            row.set_game, row.play, row.unforced, row.strike, row.base, row.volley, row.overhead
        )?;
    }
    Ok(())
}
