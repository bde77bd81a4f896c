use std::collections::BTreeSet;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::decode::{DecodeError, DecodedEvent, Player, RawEvent, decode_all};
use crate::demo_match::demo_match;
use crate::settings::Settings;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: {source}")]
    Csv {
        line: u64,
        #[source]
        source: csv::Error,
    },

    #[error("line {line}: unknown server {server:?}")]
    UnknownServer { line: u64, server: String },

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl LoadError {
    /// CSV line the failure points at, when there is one.
    pub fn line(&self) -> Option<u64> {
        match self {
            LoadError::Io { .. } => None,
            LoadError::Csv { line, .. } | LoadError::UnknownServer { line, .. } => Some(*line),
            LoadError::Decode(err) => Some(err.line()),
        }
    }
}

// Unlisted columns are ignored by the deserializer.
#[derive(Debug, Deserialize)]
struct MatchLogRow {
    set: u32,
    game: u32,
    ball_in_game: String,
    server: String,
    raw_input: String,
}

/// A loaded match log together with its decoded events.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub source: Option<PathBuf>,
    pub raw: Vec<RawEvent>,
    pub events: Vec<DecodedEvent>,
}

impl Dataset {
    pub fn from_raw(raw: Vec<RawEvent>) -> Result<Self, LoadError> {
        let events = decode_all(&raw)?;
        Ok(Self {
            source: None,
            raw,
            events,
        })
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn distinct_sets(&self) -> BTreeSet<u32> {
        self.events.iter().map(|e| e.set).collect()
    }

    pub fn distinct_games(&self) -> BTreeSet<u32> {
        self.events.iter().map(|e| e.game).collect()
    }
}

pub fn load_csv(path: &Path) -> Result<Dataset, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let raw = read_match_log(file)?;
    let mut dataset = Dataset::from_raw(raw)?;
    dataset.source = Some(path.to_path_buf());
    info!(
        path = %path.display(),
        events = dataset.len(),
        "loaded match log"
    );
    Ok(dataset)
}

/// Loads the log `settings` point at, or the demo match when asked for.
pub fn load_configured(settings: &Settings) -> Result<Dataset, LoadError> {
    if settings.demo {
        info!(seed = settings.demo_seed, "using demo match");
        return Dataset::from_raw(demo_match(settings.demo_seed));
    }
    load_csv(&settings.csv_path)
}

pub fn parse_match_log(raw: &str) -> Result<Vec<RawEvent>, LoadError> {
    read_match_log(raw.as_bytes())
}

pub fn read_match_log<R: Read>(reader: R) -> Result<Vec<RawEvent>, LoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = rdr
        .headers()
        .map_err(|source| LoadError::Csv { line: 1, source })?
        .clone();

    let mut events = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(|source| LoadError::Csv {
            line: source.position().map(|p| p.line()).unwrap_or(0),
            source,
        })?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let row: MatchLogRow = record
            .deserialize(Some(&headers))
            .map_err(|source| LoadError::Csv { line, source })?;
        events.push(raw_event_from_row(line, row)?);
    }
    debug!(rows = events.len(), "parsed match log rows");
    Ok(events)
}

/// Writes events back out in the input column layout.
pub fn write_match_log<W: Write>(writer: W, events: &[RawEvent]) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["set", "game", "ball_in_game", "server", "raw_input"])?;
    for event in events {
        wtr.write_record([
            event.set.to_string().as_str(),
            event.game.to_string().as_str(),
            event.ball_in_game.as_str(),
            event.server.label(),
            event.raw_input.as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

fn raw_event_from_row(line: u64, row: MatchLogRow) -> Result<RawEvent, LoadError> {
    let Some(server) = Player::from_name(&row.server) else {
        return Err(LoadError::UnknownServer {
            line,
            server: row.server,
        });
    };
    Ok(RawEvent {
        line,
        set: row.set,
        game: row.game,
        ball_in_game: row.ball_in_game,
        server,
        raw_input: row.raw_input,
    })
}
