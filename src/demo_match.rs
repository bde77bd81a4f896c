use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::decode::{Location, Pair, Player, RawEvent, ShotType, WinType};

const SERVE_ORDER: [Player; 4] = [Player::Anton, Player::Fredrik, Player::Simon, Player::Olle];
const MAX_GAMES_PER_SET: u32 = 10;
const MAX_POINTS_PER_GAME: u32 = 16;

/// Synthetic match log with the same shape as a hand-scored one. The same seed
/// always produces the same log.
pub fn demo_match(seed: u64) -> Vec<RawEvent> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut events = Vec::new();
    let mut line = 2u64;
    let mut sets_won = [0u32; 2];
    let mut serve_idx = 0usize;

    for set in 1..=3u32 {
        if sets_won.iter().any(|won| *won == 2) {
            break;
        }
        let mut games_won = [0u32; 2];
        for game in 1..=MAX_GAMES_PER_SET {
            let server = SERVE_ORDER[serve_idx % SERVE_ORDER.len()];
            serve_idx += 1;
            let winner = play_game(&mut rng, set, game, server, &mut line, &mut events);
            games_won[side_idx(winner)] += 1;
            if set_finished(games_won) {
                break;
            }
        }
        let set_winner = if games_won[0] >= games_won[1] { 0 } else { 1 };
        sets_won[set_winner] += 1;
    }
    events
}

fn play_game(
    rng: &mut StdRng,
    set: u32,
    game: u32,
    server: Player,
    line: &mut u64,
    events: &mut Vec<RawEvent>,
) -> Pair {
    // Serving side wins a few more points than it loses.
    let recording_serves = server.pair() == Pair::AntonSimon;
    let p_win = if recording_serves { 0.58 } else { 0.45 };
    let mut points = [0u32; 2];

    for ball in 1..=MAX_POINTS_PER_GAME {
        let won = rng.gen_bool(p_win);
        let code = point_code(rng, won);
        events.push(RawEvent {
            line: *line,
            set,
            game,
            ball_in_game: ball.to_string(),
            server,
            raw_input: code,
        });
        *line += 1;
        points[if won { 0 } else { 1 }] += 1;

        let lead = points[0].abs_diff(points[1]);
        if points.iter().any(|p| *p >= 4) && lead >= 2 {
            break;
        }
    }

    if points[0] >= points[1] {
        Pair::AntonSimon
    } else {
        Pair::FredrikOlle
    }
}

fn point_code(rng: &mut StdRng, won: bool) -> String {
    let win_type = match rng.gen_range(0..10) {
        0..=4 => WinType::Play,
        5..=7 => WinType::Unforced,
        _ => WinType::Strike,
    };
    let (shot_type, location) = if win_type == WinType::Unforced && rng.gen_bool(0.3) {
        (ShotType::NotApplicable, Location::NotApplicable)
    } else {
        let shot = *[ShotType::Base, ShotType::Volley, ShotType::Overhead]
            .choose(rng)
            .unwrap_or(&ShotType::Base);
        let location = match shot {
            ShotType::Base => Location::Glass,
            ShotType::Volley | ShotType::Overhead => Location::Net,
            ShotType::NotApplicable => Location::NotApplicable,
        };
        (shot, location)
    };

    // Errors belong to the side that lost the point, everything else to the winners.
    let recording_side_acted = won != (win_type == WinType::Unforced);
    let candidates: Vec<Player> = Player::ALL
        .into_iter()
        .filter(|p| (p.pair() == Pair::AntonSimon) == recording_side_acted)
        .collect();
    let player = *candidates.choose(rng).unwrap_or(&Player::Anton);

    [
        win_type.code(),
        shot_type.code(),
        location.code(),
        player.code(),
        if won { 'W' } else { 'L' },
    ]
    .iter()
    .collect()
}

fn side_idx(pair: Pair) -> usize {
    match pair {
        Pair::AntonSimon => 0,
        Pair::FredrikOlle => 1,
    }
}

fn set_finished(games: [u32; 2]) -> bool {
    let lead = games[0].abs_diff(games[1]);
    games.iter().any(|g| *g >= 6) && lead >= 2
}
