use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a point was won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WinType {
    Unforced,
    Strike,
    Play,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ShotType {
    Volley,
    Overhead,
    Base,
    NotApplicable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Location {
    Net,
    Glass,
    NotApplicable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Player {
    Anton,
    Olle,
    Fredrik,
    Simon,
}

/// The two sides of the match. Codes are recorded from `AntonSimon`'s side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pair {
    AntonSimon,
    FredrikOlle,
}

impl WinType {
    pub const ALL: [WinType; 3] = [WinType::Play, WinType::Unforced, WinType::Strike];

    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'U' => Some(WinType::Unforced),
            'S' => Some(WinType::Strike),
            'P' => Some(WinType::Play),
            _ => None,
        }
    }

    pub fn code(self) -> char {
        match self {
            WinType::Unforced => 'U',
            WinType::Strike => 'S',
            WinType::Play => 'P',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            WinType::Unforced => "Unforced",
            WinType::Strike => "Strike",
            WinType::Play => "Play",
        }
    }
}

impl ShotType {
    pub const ALL: [ShotType; 4] = [
        ShotType::Base,
        ShotType::Volley,
        ShotType::Overhead,
        ShotType::NotApplicable,
    ];

    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'V' => Some(ShotType::Volley),
            'O' => Some(ShotType::Overhead),
            'B' => Some(ShotType::Base),
            'N' => Some(ShotType::NotApplicable),
            _ => None,
        }
    }

    pub fn code(self) -> char {
        match self {
            ShotType::Volley => 'V',
            ShotType::Overhead => 'O',
            ShotType::Base => 'B',
            ShotType::NotApplicable => 'N',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ShotType::Volley => "Volley",
            ShotType::Overhead => "Overhead",
            ShotType::Base => "Base",
            ShotType::NotApplicable => "NA",
        }
    }
}

impl Location {
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'N' => Some(Location::Net),
            'G' => Some(Location::Glass),
            '-' => Some(Location::NotApplicable),
            _ => None,
        }
    }

    pub fn code(self) -> char {
        match self {
            Location::Net => 'N',
            Location::Glass => 'G',
            Location::NotApplicable => '-',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Location::Net => "Net",
            Location::Glass => "Glass",
            Location::NotApplicable => "NA",
        }
    }
}

impl Player {
    pub const ALL: [Player; 4] = [Player::Anton, Player::Simon, Player::Fredrik, Player::Olle];

    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'A' => Some(Player::Anton),
            'O' => Some(Player::Olle),
            'F' => Some(Player::Fredrik),
            'S' => Some(Player::Simon),
            _ => None,
        }
    }

    /// Matches a server column value; surrounding whitespace and case are ignored.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|player| player.label().eq_ignore_ascii_case(name))
    }

    pub fn code(self) -> char {
        match self {
            Player::Anton => 'A',
            Player::Olle => 'O',
            Player::Fredrik => 'F',
            Player::Simon => 'S',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Player::Anton => "Anton",
            Player::Olle => "Olle",
            Player::Fredrik => "Fredrik",
            Player::Simon => "Simon",
        }
    }

    pub fn pair(self) -> Pair {
        match self {
            Player::Anton | Player::Simon => Pair::AntonSimon,
            Player::Fredrik | Player::Olle => Pair::FredrikOlle,
        }
    }
}

impl Pair {
    pub fn label(self) -> &'static str {
        match self {
            Pair::AntonSimon => "Anton & Simon",
            Pair::FredrikOlle => "Fredrik & Olle",
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn decode_result(code: char) -> Option<bool> {
    match code {
        'W' => Some(true),
        'L' => Some(false),
        _ => None,
    }
}

pub const MAX_SET: u32 = 9_999;
pub const MAX_GAME: u32 = 99;

/// Composite grouping key: `set * 100 + game`.
///
/// `None` unless `set` is in `1..=MAX_SET` and `game` in `1..=MAX_GAME`; inside
/// that range every pair maps to its own key.
pub fn set_game_key(set: u32, game: u32) -> Option<u32> {
    if !(1..=MAX_SET).contains(&set) || !(1..=MAX_GAME).contains(&game) {
        return None;
    }
    Some(set * 100 + game)
}

/// One row of the match log as it was recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    pub line: u64,
    pub set: u32,
    pub game: u32,
    pub ball_in_game: String,
    pub server: Player,
    pub raw_input: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedEvent {
    pub line: u64,
    pub set: u32,
    pub game: u32,
    pub set_game: u32,
    pub ball_in_game: String,
    pub server: Player,
    pub win_type: WinType,
    pub shot_type: ShotType,
    pub location: Location,
    pub player: Player,
    pub result: bool,
}

impl DecodedEvent {
    /// The same event seen from the other pair's side.
    pub fn inverted(&self) -> Self {
        Self {
            result: !self.result,
            ..self.clone()
        }
    }

    pub fn set_game_label(&self) -> String {
        self.set_game.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("line {line} (ball {ball_in_game}): raw_input {raw_input:?} is shorter than 5 characters")]
    TooShort {
        line: u64,
        ball_in_game: String,
        raw_input: String,
    },

    #[error(
        "line {line} (ball {ball_in_game}): unknown {field} code {code:?} at position {position}"
    )]
    UnknownCode {
        line: u64,
        ball_in_game: String,
        field: &'static str,
        position: usize,
        code: char,
    },

    #[error("line {line} (ball {ball_in_game}): {field} must be between 1 and {max}, got {value}")]
    OutOfRange {
        line: u64,
        ball_in_game: String,
        field: &'static str,
        value: u32,
        max: u32,
    },
}

impl DecodeError {
    pub fn line(&self) -> u64 {
        match self {
            DecodeError::TooShort { line, .. }
            | DecodeError::UnknownCode { line, .. }
            | DecodeError::OutOfRange { line, .. } => *line,
        }
    }
}

pub fn decode_event(raw: &RawEvent) -> Result<DecodedEvent, DecodeError> {
    let out_of_range = |field: &'static str, value: u32, max: u32| DecodeError::OutOfRange {
        line: raw.line,
        ball_in_game: raw.ball_in_game.clone(),
        field,
        value,
        max,
    };
    if !(1..=MAX_SET).contains(&raw.set) {
        return Err(out_of_range("set", raw.set, MAX_SET));
    }
    let set_game = set_game_key(raw.set, raw.game)
        .ok_or_else(|| out_of_range("game", raw.game, MAX_GAME))?;

    let codes: Vec<char> = raw.raw_input.chars().take(5).collect();
    let [win, shot, location, player, result] = codes[..] else {
        return Err(DecodeError::TooShort {
            line: raw.line,
            ball_in_game: raw.ball_in_game.clone(),
            raw_input: raw.raw_input.clone(),
        });
    };

    let unknown = |field: &'static str, position: usize, code: char| DecodeError::UnknownCode {
        line: raw.line,
        ball_in_game: raw.ball_in_game.clone(),
        field,
        position,
        code,
    };

    Ok(DecodedEvent {
        line: raw.line,
        set: raw.set,
        game: raw.game,
        set_game,
        ball_in_game: raw.ball_in_game.clone(),
        server: raw.server,
        win_type: WinType::from_code(win).ok_or_else(|| unknown("win_type", 0, win))?,
        shot_type: ShotType::from_code(shot).ok_or_else(|| unknown("shot_type", 1, shot))?,
        location: Location::from_code(location)
            .ok_or_else(|| unknown("location", 2, location))?,
        player: Player::from_code(player).ok_or_else(|| unknown("player", 3, player))?,
        result: decode_result(result).ok_or_else(|| unknown("result", 4, result))?,
    })
}

/// Decodes every event, stopping at the first failure.
pub fn decode_all(raw: &[RawEvent]) -> Result<Vec<DecodedEvent>, DecodeError> {
    raw.iter().map(decode_event).collect()
}
