//! Unit tests for play-by-play flattening over wire-format fixtures

use mlb_pitch_downloader::fetcher::statsapi_types::{EventCount, Runner, RunnerMovement};
use mlb_pitch_downloader::fetcher::RawGameRecord;
use mlb_pitch_downloader::flatten::{render_count, render_runners_on};
use mlb_pitch_downloader::{flatten, GameId};
use serde_json::json;

use crate::common::{game, non_pitch, pitch, play};

#[test]
fn test_one_row_per_pitch_event() {
    let record = game(vec![
        play(
            "top",
            0,
            &[],
            vec![
                pitch(0, 0, "Slider", 86.0, "Ball"),
                non_pitch("Mound Visit"),
                pitch(1, 0, "Slider", 86.5, "Foul"),
                non_pitch("Pitching Substitution"),
            ],
        ),
        play("top", 1, &[], vec![non_pitch("Batter Timeout")]),
        play("bottom", 0, &[], vec![pitch(0, 0, "Splitter", 88.1, "In play, out(s)")]),
    ]);

    let rows: Vec<_> = flatten(&record, GameId(1)).collect();

    let types: Vec<_> = rows.iter().map(|r| r.pitch_type.as_deref().unwrap()).collect();
    assert_eq!(types, vec!["Slider", "Slider", "Splitter"]);
    let outcomes: Vec<_> = rows.iter().map(|r| r.outcome.as_deref().unwrap()).collect();
    assert_eq!(outcomes, vec!["Ball", "Foul", "In play, out(s)"]);
}

#[test]
fn test_missing_pitch_flag_means_not_a_pitch() {
    let record: RawGameRecord = serde_json::from_value(json!({
        "allPlays": [{
            "about": { "halfInning": "top" },
            "count": { "outs": 0 },
            "matchup": {
                "batter": { "fullName": "Bo Bichette" },
                "pitcher": { "fullName": "Kevin Gausman" }
            },
            "playEvents": [
                { "count": { "balls": 0, "strikes": 0 } },
                { "isPitch": true, "count": { "balls": 0, "strikes": 0 } }
            ]
        }]
    }))
    .unwrap();

    let rows: Vec<_> = flatten(&record, GameId(2)).collect();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].runners_on, "None");
    assert_eq!(rows[0].pitch_type, None);
    assert_eq!(rows[0].velocity, None);
}

#[test]
fn test_runners_on_rendering() {
    let runners = |ends: &[Option<&str>]| -> Vec<Runner> {
        ends.iter()
            .map(|end| Runner {
                movement: RunnerMovement {
                    start: None,
                    end: end.map(str::to_string),
                },
            })
            .collect()
    };

    assert_eq!(render_runners_on(&runners(&[Some("2B"), None])), "2B, Unknown");
    assert_eq!(render_runners_on(&runners(&[])), "None");
    assert_eq!(
        render_runners_on(&runners(&[Some("1B"), Some("1B")])),
        "1B, 1B"
    );
}

#[test]
fn test_count_rendering() {
    assert_eq!(render_count(&EventCount { balls: 2, strikes: 1 }), "2-1");
    assert_eq!(render_count(&EventCount { balls: 3, strikes: 2 }), "3-2");
}

#[test]
fn test_runners_apply_to_every_pitch_of_the_play() {
    let record = game(vec![play(
        "bottom",
        2,
        &[Some("3B"), None],
        vec![
            pitch(0, 0, "Sweeper", 83.0, "Ball"),
            pitch(1, 0, "Sweeper", 83.4, "Wild Pitch"),
        ],
    )]);

    let rows: Vec<_> = flatten(&record, GameId(3)).collect();

    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.runners_on == "3B, Unknown"));
    assert!(rows.iter().all(|r| r.outs == 2 && r.inning == "bottom"));
}
