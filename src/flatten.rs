//! Play-by-play flattening
//!
//! Walks plays in order and the events of each play in order, emitting one
//! [`PitchEventRow`] per event flagged as a pitch. Pickoff throws, mound
//! visits, substitutions and other non-pitch events produce nothing.

use crate::fetcher::statsapi_types::{EventCount, Play, PlayEvent, RawGameRecord, Runner};
use crate::{GameId, PitchEventRow};

const UNKNOWN_BASE: &str = "Unknown";
const NO_RUNNERS: &str = "None";

/// Lazily flatten one game's record into pitch rows.
pub fn flatten(
    record: &RawGameRecord,
    game_id: GameId,
) -> impl Iterator<Item = PitchEventRow> + '_ {
    record.all_plays.iter().flat_map(move |play| {
        // Play-level fields are shared by every pitch in the plate appearance.
        let runners_on = render_runners_on(&play.runners);
        play.play_events
            .iter()
            .filter(|event| event.is_pitch)
            .map(move |event| pitch_row(game_id, play, &runners_on, event))
    })
}

fn pitch_row(game_id: GameId, play: &Play, runners_on: &str, event: &PlayEvent) -> PitchEventRow {
    let details = event.details.as_ref();
    let pitch_data = event.pitch_data.as_ref();

    PitchEventRow {
        game_id,
        pitcher_name: play.matchup.pitcher.full_name.clone(),
        batter_name: play.matchup.batter.full_name.clone(),
        count: render_count(&event.count),
        inning: play.about.half_inning.clone(),
        outs: play.count.outs,
        runners_on: runners_on.to_string(),
        pitch_type: details
            .and_then(|d| d.pitch_type.as_ref())
            .and_then(|t| t.description.clone()),
        velocity: pitch_data.and_then(|p| p.start_speed),
        spin_rate: pitch_data
            .and_then(|p| p.breaks.as_ref())
            .and_then(|b| b.spin_rate),
        release_point: pitch_data.and_then(|p| p.extension),
        outcome: details.and_then(|d| d.description.clone()),
    }
}

/// `"{balls}-{strikes}"`
pub fn render_count(count: &EventCount) -> String {
    format!("{}-{}", count.balls, count.strikes)
}

/// Runner destinations joined with `", "`.
///
/// A runner without a recorded destination renders as `"Unknown"`; a play
/// without runners renders as `"None"`. Runners keep source order.
pub fn render_runners_on(runners: &[Runner]) -> String {
    if runners.is_empty() {
        return NO_RUNNERS.to_string();
    }

    runners
        .iter()
        .map(|runner| runner.movement.end.as_deref().unwrap_or(UNKNOWN_BASE))
        .collect::<Vec<_>>()
        .join(", ")
}
