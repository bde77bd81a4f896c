#![allow(dead_code)]

use std::path::PathBuf;

use padel_terminal::dataset::{Dataset, load_csv};
use padel_terminal::decode::{DecodedEvent, Location, Player, ShotType, WinType, set_game_key};

pub fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

pub fn fixture_dataset() -> Dataset {
    load_csv(&fixture_path("padel_analytics.csv")).expect("fixture should load")
}

pub fn event(set: u32, game: u32, win_type: WinType, shot_type: ShotType, won: bool) -> DecodedEvent {
    DecodedEvent {
        line: 0,
        set,
        game,
        set_game: set_game_key(set, game).expect("valid set and game"),
        ball_in_game: "1".to_string(),
        server: Player::Anton,
        win_type,
        shot_type,
        location: Location::Net,
        player: Player::Anton,
        result: won,
    }
}
