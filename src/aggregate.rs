use std::collections::HashMap;
use std::hash::Hash;
use std::marker::PhantomData;

use serde::Serialize;

use crate::decode::{DecodedEvent, ShotType, WinType};
use crate::filter::{FilterSpec, filter_events};

/// Slots available to a [`Tally`]; every category must fit.
pub const MAX_SLOTS: usize = 4;

/// A closed set of labels that can be counted into fixed slots.
pub trait Category: Copy {
    const COUNT: usize;

    fn index(self) -> usize;
}

impl Category for WinType {
    const COUNT: usize = 3;

    fn index(self) -> usize {
        match self {
            WinType::Play => 0,
            WinType::Unforced => 1,
            WinType::Strike => 2,
        }
    }
}

impl Category for ShotType {
    const COUNT: usize = 4;

    fn index(self) -> usize {
        match self {
            ShotType::Base => 0,
            ShotType::Volley => 1,
            ShotType::Overhead => 2,
            ShotType::NotApplicable => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tally<C: Category> {
    counts: [u32; MAX_SLOTS],
    _category: PhantomData<C>,
}

impl<C: Category> Default for Tally<C> {
    fn default() -> Self {
        const { assert!(C::COUNT <= MAX_SLOTS) };
        Self {
            counts: [0; MAX_SLOTS],
            _category: PhantomData,
        }
    }
}

impl<C: Category> Tally<C> {
    pub fn add(&mut self, category: C) {
        self.counts[category.index()] += 1;
    }

    pub fn get(&self, category: C) -> u32 {
        self.counts[category.index()]
    }

    pub fn total(&self) -> u32 {
        self.counts.iter().sum()
    }
}

impl<C: Category> FromIterator<C> for Tally<C> {
    fn from_iter<I: IntoIterator<Item = C>>(iter: I) -> Self {
        let mut tally = Self::default();
        for category in iter {
            tally.add(category);
        }
        tally
    }
}

/// Groups `items` by `key`, keeping groups in first-seen order and items in
/// their original order within each group.
pub fn group_in_order<'a, T, K, F>(items: &'a [T], key: F) -> Vec<(K, Vec<&'a T>)>
where
    K: Eq + Hash + Copy,
    F: Fn(&T) -> K,
{
    let mut slots: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<&'a T>)> = Vec::new();
    for item in items {
        let k = key(item);
        let slot = *slots.entry(k).or_insert_with(|| {
            groups.push((k, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(item);
    }
    groups
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupBreakdown {
    pub set_game: u32,
    pub events: usize,
    pub win_types: Tally<WinType>,
    pub shot_types: Tally<ShotType>,
}

/// Flat row used by charts and exports:
/// `(set_game, play, unforced, strike, base, volley, overhead)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BreakdownRow {
    pub set_game: u32,
    pub play: u32,
    pub unforced: u32,
    pub strike: u32,
    pub base: u32,
    pub volley: u32,
    pub overhead: u32,
}

impl GroupBreakdown {
    pub fn label(&self) -> String {
        self.set_game.to_string()
    }

    pub fn row(&self) -> BreakdownRow {
        BreakdownRow {
            set_game: self.set_game,
            play: self.win_types.get(WinType::Play),
            unforced: self.win_types.get(WinType::Unforced),
            strike: self.win_types.get(WinType::Strike),
            base: self.shot_types.get(ShotType::Base),
            volley: self.shot_types.get(ShotType::Volley),
            overhead: self.shot_types.get(ShotType::Overhead),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Breakdown {
    pub groups: Vec<GroupBreakdown>,
}

impl Breakdown {
    pub fn rows(&self) -> Vec<BreakdownRow> {
        self.groups.iter().map(GroupBreakdown::row).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

pub fn breakdown(events: &[DecodedEvent]) -> Breakdown {
    let groups = group_in_order(events, |e| e.set_game)
        .into_iter()
        .map(|(set_game, members)| GroupBreakdown {
            set_game,
            events: members.len(),
            win_types: members.iter().map(|e| e.win_type).collect(),
            shot_types: members.iter().map(|e| e.shot_type).collect(),
        })
        .collect();
    Breakdown { groups }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MomentumPoint {
    pub ball_in_game: String,
    pub set_game: u32,
    pub won: bool,
    pub net: i32,
}

/// Running net score: +1 per won point, -1 per lost point, starting from 0.
pub fn momentum(events: &[DecodedEvent]) -> Vec<MomentumPoint> {
    events
        .iter()
        .scan(0i32, |net, event| {
            *net += if event.result { 1 } else { -1 };
            Some(MomentumPoint {
                ball_in_game: event.ball_in_game.clone(),
                set_game: event.set_game,
                won: event.result,
                net: *net,
            })
        })
        .collect()
}

/// Everything the charts need for one filter state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Analysis {
    pub events: Vec<DecodedEvent>,
    pub momentum: Vec<MomentumPoint>,
    pub breakdown: Breakdown,
}

impl Analysis {
    pub fn points_won(&self) -> usize {
        self.momentum.iter().filter(|p| p.won).count()
    }

    pub fn points_lost(&self) -> usize {
        self.momentum.len() - self.points_won()
    }

    pub fn final_net(&self) -> i32 {
        self.momentum.last().map(|p| p.net).unwrap_or(0)
    }
}

pub fn analyze(events: &[DecodedEvent], spec: &FilterSpec) -> Analysis {
    let events = filter_events(events, spec);
    let momentum = momentum(&events);
    let breakdown = breakdown(&events);
    Analysis {
        events,
        momentum,
        breakdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{Location, Player, set_game_key};

    fn event(set_game: u32, win_type: WinType, shot_type: ShotType, result: bool) -> DecodedEvent {
        DecodedEvent {
            line: 0,
            set: set_game / 100,
            game: set_game % 100,
            set_game,
            ball_in_game: "1".to_string(),
            server: Player::Anton,
            win_type,
            shot_type,
            location: Location::Net,
            player: Player::Simon,
            result,
        }
    }

    #[test]
    fn groups_keep_first_seen_order() {
        let events = vec![
            event(102, WinType::Play, ShotType::Base, true),
            event(101, WinType::Play, ShotType::Base, true),
            event(102, WinType::Strike, ShotType::Volley, false),
        ];
        let keys: Vec<u32> = breakdown(&events).groups.iter().map(|g| g.set_game).collect();
        assert_eq!(keys, vec![102, 101]);
    }

    #[test]
    fn tallies_partition_each_group() {
        let events = vec![
            event(101, WinType::Play, ShotType::NotApplicable, true),
            event(101, WinType::Unforced, ShotType::Overhead, false),
            event(101, WinType::Strike, ShotType::Volley, true),
            event(101, WinType::Play, ShotType::Base, true),
        ];
        let result = breakdown(&events);
        let group = &result.groups[0];
        assert_eq!(group.events, 4);
        assert_eq!(group.win_types.total(), 4);
        assert_eq!(group.shot_types.total(), 4);
        assert_eq!(group.shot_types.get(ShotType::NotApplicable), 1);
        let row = group.row();
        assert_eq!(row.play + row.unforced + row.strike, 4);
        assert_eq!(row.base + row.volley + row.overhead, 3);
    }

    #[test]
    fn tally_slots_cover_every_category() {
        let shots: Tally<ShotType> = ShotType::ALL.into_iter().collect();
        for shot in ShotType::ALL {
            assert!(shot.index() < MAX_SLOTS);
            assert_eq!(shots.get(shot), 1);
        }
        let wins: Tally<WinType> = WinType::ALL.into_iter().chain([WinType::Strike]).collect();
        assert_eq!(wins.get(WinType::Strike), 2);
        assert_eq!(wins.total(), 4);
    }

    #[test]
    fn momentum_is_a_running_sum() {
        let events = vec![
            event(101, WinType::Play, ShotType::Base, true),
            event(101, WinType::Play, ShotType::Base, true),
            event(101, WinType::Play, ShotType::Base, false),
            event(102, WinType::Play, ShotType::Base, false),
            event(102, WinType::Play, ShotType::Base, false),
        ];
        let nets: Vec<i32> = momentum(&events).iter().map(|p| p.net).collect();
        assert_eq!(nets, vec![1, 2, 1, 0, -1]);
    }

    #[test]
    fn empty_input_gives_empty_outputs() {
        let analysis = analyze(&[], &FilterSpec::default());
        assert!(analysis.momentum.is_empty());
        assert!(analysis.breakdown.is_empty());
        assert_eq!(analysis.final_net(), 0);
    }

    #[test]
    fn set_game_keys_sort_set_major() {
        let mut keys: Vec<u32> = [(2, 1), (1, 10), (1, 2)]
            .into_iter()
            .filter_map(|(set, game)| set_game_key(set, game))
            .collect();
        keys.sort_unstable();
        assert_eq!(keys, vec![102, 110, 201]);
    }
}
