mod common;

use padel_terminal::aggregate::{BreakdownRow, analyze, breakdown, momentum};
use padel_terminal::decode::{ShotType, WinType};
use padel_terminal::filter::{Allowed, FilterSpec};

use common::{event, fixture_dataset};

#[test]
fn groups_follow_first_seen_order_with_counts() {
    let events = vec![
        event(1, 1, WinType::Play, ShotType::Base, true),
        event(1, 1, WinType::Unforced, ShotType::Volley, false),
        event(1, 1, WinType::Play, ShotType::Overhead, true),
        event(1, 2, WinType::Strike, ShotType::Volley, true),
    ];
    let rows = breakdown(&events).rows();
    assert_eq!(
        rows,
        vec![
            BreakdownRow {
                set_game: 101,
                play: 2,
                unforced: 1,
                strike: 0,
                base: 1,
                volley: 1,
                overhead: 1,
            },
            BreakdownRow {
                set_game: 102,
                play: 0,
                unforced: 0,
                strike: 1,
                base: 0,
                volley: 1,
                overhead: 0,
            },
        ]
    );
}

#[test]
fn fixture_breakdown_matches_hand_count() {
    let dataset = fixture_dataset();
    let analysis = analyze(&dataset.events, &FilterSpec::default());
    let keys: Vec<u32> = analysis.breakdown.groups.iter().map(|g| g.set_game).collect();
    assert_eq!(keys, vec![101, 102, 201, 103, 202, 301]);

    let rows = analysis.breakdown.rows();
    assert_eq!((rows[0].play, rows[0].unforced, rows[0].strike), (2, 0, 1));
    assert_eq!((rows[0].base, rows[0].volley, rows[0].overhead), (1, 1, 1));
    assert_eq!((rows[1].play, rows[1].unforced, rows[1].strike), (1, 1, 0));
    assert_eq!((rows[1].base, rows[1].volley, rows[1].overhead), (0, 1, 0));
    assert_eq!(rows[2].base, 2);
    assert_eq!(rows[3].set_game, 103);
    assert_eq!((rows[3].play, rows[3].unforced, rows[3].strike), (1, 0, 0));
    assert_eq!((rows[3].base, rows[3].volley, rows[3].overhead), (0, 0, 1));
}

#[test]
fn counts_partition_every_group() {
    let dataset = fixture_dataset();
    for group in breakdown(&dataset.events).groups {
        let row = group.row();
        assert_eq!((row.play + row.unforced + row.strike) as usize, group.events);
        let na = group.shot_types.get(ShotType::NotApplicable);
        assert_eq!((row.base + row.volley + row.overhead + na) as usize, group.events);
    }
}

#[test]
fn momentum_tracks_running_net() {
    let dataset = fixture_dataset();
    let points = momentum(&dataset.events);
    assert_eq!(points.len(), dataset.len());
    let nets: Vec<i32> = points.iter().map(|p| p.net).collect();
    assert_eq!(nets, vec![1, 2, 3, 2, 1, 2, 1, 2, 3, 4]);

    let mut prev = 0;
    for (point, event) in points.iter().zip(&dataset.events) {
        assert_eq!(point.net, prev + if event.result { 1 } else { -1 });
        assert_eq!(point.won, event.result);
        prev = point.net;
    }
}

#[test]
fn inverted_view_mirrors_net_score() {
    let dataset = fixture_dataset();
    let normal = analyze(&dataset.events, &FilterSpec::default());
    let flipped = analyze(
        &dataset.events,
        &FilterSpec {
            invert_result: true,
            ..FilterSpec::default()
        },
    );
    assert_eq!(flipped.final_net(), -normal.final_net());
    assert_eq!(flipped.points_won(), normal.points_lost());
    assert_eq!(flipped.breakdown, normal.breakdown);
}

#[test]
fn filtered_out_everything_renders_nothing() {
    let dataset = fixture_dataset();
    let spec = FilterSpec {
        sets: Allowed::only([9]),
        ..FilterSpec::default()
    };
    let analysis = analyze(&dataset.events, &spec);
    assert!(analysis.momentum.is_empty());
    assert!(analysis.breakdown.rows().is_empty());
}
