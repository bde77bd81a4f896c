use padel_terminal::decode::{
    DecodeError, Location, Player, RawEvent, ShotType, WinType, decode_all, decode_event,
    set_game_key,
};

fn raw(line: u64, set: u32, game: u32, code: &str) -> RawEvent {
    RawEvent {
        line,
        set,
        game,
        ball_in_game: "7".to_string(),
        server: Player::Olle,
        raw_input: code.to_string(),
    }
}

#[test]
fn pvnaw_decodes_to_play_volley_net_anton_won() {
    let event = decode_event(&raw(2, 1, 1, "PVNAW")).expect("valid code");
    assert_eq!(event.win_type, WinType::Play);
    assert_eq!(event.shot_type, ShotType::Volley);
    assert_eq!(event.location, Location::Net);
    assert_eq!(event.player, Player::Anton);
    assert!(event.result);
    assert_eq!(event.server, Player::Olle);
    assert_eq!(event.ball_in_game, "7");
}

#[test]
fn decoding_is_repeatable() {
    let input = raw(5, 2, 4, "SOGFL");
    let first = decode_event(&input).expect("valid code");
    let second = decode_event(&input).expect("valid code");
    assert_eq!(first, second);
}

#[test]
fn set_game_is_set_major() {
    let a = decode_event(&raw(2, 2, 3, "PVNAW")).expect("valid code");
    let b = decode_event(&raw(9, 2, 3, "UB-SL")).expect("valid code");
    assert_eq!(a.set_game, 203);
    assert_eq!(a.set_game, b.set_game);
    assert_eq!(a.set_game_label(), "203");
    assert!(set_game_key(1, 10) < set_game_key(2, 1));
    assert_eq!(set_game_key(1, 10), Some(110));
}

#[test]
fn error_names_row_field_and_character() {
    let err = decode_event(&raw(14, 1, 1, "PVQAW")).unwrap_err();
    let DecodeError::UnknownCode {
        line,
        field,
        position,
        code,
        ..
    } = err
    else {
        panic!("expected unknown code, got {err:?}");
    };
    assert_eq!((line, field, position, code), (14, "location", 2, 'Q'));
}

#[test]
fn every_position_is_validated() {
    let bad = ["XVNAW", "PXNAW", "PVXAW", "PVNXW", "PVNAX"];
    for (position, code) in bad.iter().enumerate() {
        match decode_event(&raw(2, 1, 1, code)) {
            Err(DecodeError::UnknownCode { position: p, code: c, .. }) => {
                assert_eq!(p, position);
                assert_eq!(c, 'X');
            }
            other => panic!("{code}: expected unknown code, got {other:?}"),
        }
    }
}

#[test]
fn empty_code_is_too_short() {
    let err = decode_event(&raw(3, 1, 1, "")).unwrap_err();
    assert!(matches!(err, DecodeError::TooShort { line: 3, .. }));
}

#[test]
fn decode_all_stops_at_first_bad_row() {
    let rows = vec![
        raw(2, 1, 1, "PVNAW"),
        raw(3, 1, 1, "PVN"),
        raw(4, 1, 1, "ZZZZZ"),
    ];
    let err = decode_all(&rows).unwrap_err();
    assert_eq!(err.line(), 3);
}
