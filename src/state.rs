use std::collections::{BTreeSet, VecDeque};
use std::path::PathBuf;

use crate::aggregate::{Analysis, analyze};
use crate::dataset::{Dataset, LoadError};
use crate::decode::{Pair, Player};
use crate::filter::{Allowed, FilterSpec};
use crate::settings::MatchInfo;

// Choices offered by the sidebar before looking at the data.
const DEFAULT_SETS: [u32; 3] = [1, 2, 3];
const DEFAULT_GAMES: [u32; 10] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterSection {
    Sets,
    Games,
    Servers,
    Perspective,
}

impl FilterSection {
    pub fn next(self) -> Self {
        match self {
            FilterSection::Sets => FilterSection::Games,
            FilterSection::Games => FilterSection::Servers,
            FilterSection::Servers => FilterSection::Perspective,
            FilterSection::Perspective => FilterSection::Sets,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            FilterSection::Sets => FilterSection::Perspective,
            FilterSection::Games => FilterSection::Sets,
            FilterSection::Servers => FilterSection::Games,
            FilterSection::Perspective => FilterSection::Servers,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            FilterSection::Sets => "Sets",
            FilterSection::Games => "Game",
            FilterSection::Servers => "Server",
            FilterSection::Perspective => "Point of view",
        }
    }
}

/// One checkbox line in the sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRow {
    pub label: String,
    pub checked: bool,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub match_info: MatchInfo,
    pub dataset: Dataset,
    pub load_error: Option<String>,
    pub set_options: Vec<u32>,
    pub game_options: Vec<u32>,
    pub selected_sets: BTreeSet<u32>,
    pub selected_games: BTreeSet<u32>,
    pub selected_servers: BTreeSet<Player>,
    pub invert_result: bool,
    pub section: FilterSection,
    pub cursor: usize,
    pub show_results: bool,
    pub show_playstyle: bool,
    pub help_overlay: bool,
    pub export_path: PathBuf,
    pub logs: VecDeque<String>,
    pub analysis: Analysis,
}

impl AppState {
    pub fn new(match_info: MatchInfo, export_path: PathBuf) -> Self {
        let mut state = Self {
            match_info,
            dataset: Dataset::default(),
            load_error: None,
            set_options: DEFAULT_SETS.to_vec(),
            game_options: DEFAULT_GAMES.to_vec(),
            selected_sets: DEFAULT_SETS.into_iter().collect(),
            selected_games: DEFAULT_GAMES.into_iter().collect(),
            selected_servers: Player::ALL.into_iter().collect(),
            invert_result: false,
            section: FilterSection::Sets,
            cursor: 0,
            show_results: true,
            show_playstyle: true,
            help_overlay: false,
            export_path,
            logs: VecDeque::with_capacity(MAX_LOGS),
            analysis: Analysis::default(),
        };
        state.recompute();
        state
    }

    /// Replaces the match log. Values present in the data but missing from the
    /// default choices become extra, pre-selected options.
    pub fn load_dataset(&mut self, dataset: Dataset) {
        for set in dataset.distinct_sets() {
            if !self.set_options.contains(&set) {
                self.set_options.push(set);
                self.selected_sets.insert(set);
            }
        }
        for game in dataset.distinct_games() {
            if !self.game_options.contains(&game) {
                self.game_options.push(game);
                self.selected_games.insert(game);
            }
        }
        self.set_options.sort_unstable();
        self.game_options.sort_unstable();

        let source = dataset
            .source
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "demo match".to_string());
        self.push_log(format!("[INFO] Loaded {} events from {source}", dataset.len()));
        self.dataset = dataset;
        self.load_error = None;
        self.recompute();
    }

    pub fn load_failed(&mut self, err: &LoadError) {
        let msg = match err.line() {
            Some(line) => format!("Could not load match log (row {line}): {err}"),
            None => format!("Could not load match log: {err}"),
        };
        self.push_log(format!("[ERROR] {msg}"));
        self.load_error = Some(msg);
        self.dataset = Dataset::default();
        self.recompute();
    }

    pub fn filter_spec(&self) -> FilterSpec {
        FilterSpec {
            sets: Allowed::Only(self.selected_sets.clone()),
            games: Allowed::Only(self.selected_games.clone()),
            servers: Allowed::Only(self.selected_servers.clone()),
            invert_result: self.invert_result,
        }
    }

    pub fn recompute(&mut self) {
        self.analysis = analyze(&self.dataset.events, &self.filter_spec());
    }

    pub fn perspective(&self) -> Pair {
        self.filter_spec().perspective()
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn section_rows(&self, section: FilterSection) -> Vec<FilterRow> {
        match section {
            FilterSection::Sets => self
                .set_options
                .iter()
                .map(|set| FilterRow {
                    label: set.to_string(),
                    checked: self.selected_sets.contains(set),
                })
                .collect(),
            FilterSection::Games => self
                .game_options
                .iter()
                .map(|game| FilterRow {
                    label: game.to_string(),
                    checked: self.selected_games.contains(game),
                })
                .collect(),
            FilterSection::Servers => Player::ALL
                .iter()
                .map(|player| FilterRow {
                    label: player.label().to_string(),
                    checked: self.selected_servers.contains(player),
                })
                .collect(),
            FilterSection::Perspective => vec![FilterRow {
                label: format!("View from {}", Pair::FredrikOlle.label()),
                checked: self.invert_result,
            }],
        }
    }

    fn section_len(&self) -> usize {
        match self.section {
            FilterSection::Sets => self.set_options.len(),
            FilterSection::Games => self.game_options.len(),
            FilterSection::Servers => Player::ALL.len(),
            FilterSection::Perspective => 1,
        }
    }

    pub fn next_section(&mut self) {
        self.section = self.section.next();
        self.cursor = 0;
    }

    pub fn prev_section(&mut self) {
        self.section = self.section.prev();
        self.cursor = 0;
    }

    pub fn cursor_down(&mut self) {
        let total = self.section_len();
        if total == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = (self.cursor + 1) % total;
    }

    pub fn cursor_up(&mut self) {
        let total = self.section_len();
        if total == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = if self.cursor == 0 {
            total - 1
        } else {
            self.cursor - 1
        };
    }

    pub fn toggle_at_cursor(&mut self) {
        match self.section {
            FilterSection::Sets => {
                if let Some(set) = self.set_options.get(self.cursor).copied() {
                    toggle(&mut self.selected_sets, set);
                }
            }
            FilterSection::Games => {
                if let Some(game) = self.game_options.get(self.cursor).copied() {
                    toggle(&mut self.selected_games, game);
                }
            }
            FilterSection::Servers => {
                if let Some(player) = Player::ALL.get(self.cursor).copied() {
                    toggle(&mut self.selected_servers, player);
                }
            }
            FilterSection::Perspective => {
                self.toggle_invert();
                return;
            }
        }
        self.recompute();
    }

    pub fn select_all_in_section(&mut self) {
        match self.section {
            FilterSection::Sets => self.selected_sets = self.set_options.iter().copied().collect(),
            FilterSection::Games => {
                self.selected_games = self.game_options.iter().copied().collect()
            }
            FilterSection::Servers => self.selected_servers = Player::ALL.into_iter().collect(),
            FilterSection::Perspective => return,
        }
        self.recompute();
    }

    pub fn clear_section(&mut self) {
        match self.section {
            FilterSection::Sets => self.selected_sets.clear(),
            FilterSection::Games => self.selected_games.clear(),
            FilterSection::Servers => self.selected_servers.clear(),
            FilterSection::Perspective => return,
        }
        self.recompute();
    }

    pub fn toggle_invert(&mut self) {
        self.invert_result = !self.invert_result;
        self.recompute();
        let side = self.perspective().label();
        self.push_log(format!("[INFO] Showing wins from {side}'s point of view"));
    }

    pub fn toggle_results(&mut self) {
        self.show_results = !self.show_results;
    }

    pub fn toggle_playstyle(&mut self) {
        self.show_playstyle = !self.show_playstyle;
    }
}

fn toggle<T: Ord>(selected: &mut BTreeSet<T>, value: T) {
    if !selected.remove(&value) {
        selected.insert(value);
    }
}
