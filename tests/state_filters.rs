mod common;

use std::path::PathBuf;

use padel_terminal::dataset::LoadError;
use padel_terminal::decode::{Pair, Player};
use padel_terminal::settings::Settings;
use padel_terminal::state::{AppState, FilterSection};

use common::{fixture_dataset, fixture_path};

fn loaded_state() -> AppState {
    let settings = Settings::default();
    let mut state = AppState::new(settings.match_info, PathBuf::from("out.xlsx"));
    state.load_dataset(fixture_dataset());
    state
}

#[test]
fn defaults_select_everything() {
    let state = loaded_state();
    assert_eq!(state.analysis.events.len(), 10);
    assert_eq!(state.perspective(), Pair::AntonSimon);
    assert!(state.show_results);
    assert!(state.show_playstyle);
    assert!(state.logs.back().is_some_and(|l| l.starts_with("[INFO]")));
}

#[test]
fn toggling_a_set_recomputes() {
    let mut state = loaded_state();
    assert_eq!(state.section, FilterSection::Sets);
    state.toggle_at_cursor();
    assert!(!state.selected_sets.contains(&1));
    assert_eq!(state.analysis.events.len(), 4);
    assert!(state.analysis.events.iter().all(|e| e.set != 1));

    state.toggle_at_cursor();
    assert_eq!(state.analysis.events.len(), 10);
}

#[test]
fn server_section_filters_by_server() {
    let mut state = loaded_state();
    state.next_section();
    state.next_section();
    assert_eq!(state.section, FilterSection::Servers);
    state.clear_section();
    assert!(state.analysis.events.is_empty());

    // Anton is the first server option.
    state.toggle_at_cursor();
    assert_eq!(state.analysis.events.len(), 5);
    assert!(
        state
            .analysis
            .events
            .iter()
            .all(|e| e.server == Player::Anton)
    );

    state.select_all_in_section();
    assert_eq!(state.analysis.events.len(), 10);
}

#[test]
fn perspective_flip_is_reversible() {
    let mut state = loaded_state();
    let before = state.analysis.clone();
    state.toggle_invert();
    assert_eq!(state.perspective(), Pair::FredrikOlle);
    assert_eq!(state.analysis.final_net(), -before.final_net());
    state.toggle_invert();
    assert_eq!(state.analysis, before);
}

#[test]
fn cursor_wraps_within_section() {
    let mut state = loaded_state();
    state.cursor_up();
    assert_eq!(state.cursor, 2);
    state.cursor_down();
    assert_eq!(state.cursor, 0);
    state.prev_section();
    assert_eq!(state.section, FilterSection::Perspective);
    state.cursor_down();
    assert_eq!(state.cursor, 0);
}

#[test]
fn unexpected_game_numbers_become_options() {
    let mut state = AppState::new(Settings::default().match_info, PathBuf::from("out.xlsx"));
    let mut dataset = fixture_dataset();
    for event in &mut dataset.events {
        event.game = 12;
    }
    state.load_dataset(dataset);
    assert_eq!(state.game_options.last(), Some(&12));
    assert!(state.selected_games.contains(&12));
    assert_eq!(state.analysis.events.len(), 10);
}

#[test]
fn load_failure_is_shown_not_fatal() {
    let mut state = loaded_state();
    let err: LoadError = padel_terminal::dataset::load_csv(&fixture_path("bad_code.csv"))
        .unwrap_err();
    state.load_failed(&err);
    let msg = state.load_error.as_deref().expect("error is kept");
    assert!(msg.contains("row 4"));
    assert!(msg.contains("'Q'"));
    assert!(state.analysis.events.is_empty());
    assert!(state.logs.back().is_some_and(|l| l.starts_with("[ERROR]")));
}
