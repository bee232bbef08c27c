// Play-by-play document model and per-batter pitch extraction.
//
// Every field is optional: the feed omits whole sub-objects for automatic
// calls, in-progress plays, and non-pitch events (pickoffs, mound visits).
// Missing data skips the affected play or event; out-of-domain data is an
// error.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ZoneError;
use crate::pitch::{PitchOutcome, PlayOutcome};
use crate::provider::{GamePk, PlayerId};
use crate::zone::Zone;

// ---------------------------------------------------------------------------
// Feed structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayByPlay {
    #[serde(default)]
    pub all_plays: Option<Vec<Play>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Play {
    #[serde(default)]
    pub result: Option<PlayResult>,
    #[serde(default)]
    pub matchup: Option<Matchup>,
    #[serde(default)]
    pub play_events: Option<Vec<PlayEvent>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayResult {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub event: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Matchup {
    pub batter: PersonRef,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonRef {
    pub id: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayEvent {
    #[serde(default)]
    pub is_pitch: Option<bool>,
    #[serde(default)]
    pub details: Option<EventDetails>,
    #[serde(default)]
    pub pitch_data: Option<PitchData>,
    #[serde(default)]
    pub count: Option<Count>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetails {
    #[serde(default)]
    pub call: Option<Call>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_in_play: Option<bool>,
    #[serde(default)]
    pub is_out: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Call {
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PitchData {
    #[serde(default)]
    pub zone: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Count {
    #[serde(default)]
    pub balls: u8,
    #[serde(default)]
    pub strikes: u8,
}

impl Play {
    pub fn batter(&self) -> Option<PlayerId> {
        self.matchup.as_ref().map(|m| PlayerId(m.batter.id))
    }

    /// The plate-appearance result, present once the at-bat has concluded.
    pub fn concluded_outcome(&self) -> Option<PlayOutcome> {
        let result = self.result.as_ref()?;
        if result.kind.as_deref() != Some("atBat") {
            return None;
        }
        result.event.as_deref().map(PlayOutcome::parse)
    }
}

impl PlayByPlay {
    /// Whether `player` batted in at least one play of this game.
    pub fn has_batter(&self, player: PlayerId) -> bool {
        self.all_plays
            .as_deref()
            .unwrap_or_default()
            .iter()
            .any(|play| play.batter() == Some(player))
    }
}

// ---------------------------------------------------------------------------
// PitchRecord
// ---------------------------------------------------------------------------

/// One validated pitch seen by a batter.
#[derive(Debug, Clone, PartialEq)]
pub struct PitchRecord {
    pub zone: Zone,
    pub outcome: PitchOutcome,
    /// Ball and strike count after the pitch.
    pub balls: u8,
    pub strikes: u8,
    pub is_in_play: bool,
    pub is_out: bool,
    /// Set on the last pitch of a completed plate appearance.
    pub concludes: Option<PlayOutcome>,
}

/// Collect every pitch thrown to `batter` in one game.
///
/// Plays without events or a batter, and pitches without a zone or call
/// description, are logged and skipped. A zone outside the 13-zone domain or
/// an unrecognized call description fails the whole extraction.
pub fn batter_pitches(
    doc: &PlayByPlay,
    batter: PlayerId,
    game: GamePk,
) -> Result<Vec<PitchRecord>, ZoneError> {
    let Some(plays) = doc.all_plays.as_ref() else {
        warn!("No play data found for game {}", game);
        return Ok(Vec::new());
    };

    let mut pitches = Vec::new();
    for play in plays {
        let Some(events) = play.play_events.as_ref() else {
            warn!("No play events found for play in game {}", game);
            continue;
        };
        match play.batter() {
            Some(id) if id == batter => {}
            Some(_) => continue,
            None => {
                warn!("Play without matchup in game {}", game);
                continue;
            }
        }

        let last_pitch = events.iter().rposition(|e| e.is_pitch == Some(true));
        let concluded = play.concluded_outcome();

        for (idx, event) in events.iter().enumerate() {
            if event.is_pitch != Some(true) {
                continue;
            }
            let Some(record) = pitch_record(event, game)? else {
                continue;
            };
            let concludes = if Some(idx) == last_pitch {
                concluded.clone()
            } else {
                None
            };
            pitches.push(PitchRecord { concludes, ..record });
        }
    }
    Ok(pitches)
}

fn pitch_record(event: &PlayEvent, game: GamePk) -> Result<Option<PitchRecord>, ZoneError> {
    let Some(raw_zone) = event.pitch_data.as_ref().and_then(|p| p.zone) else {
        debug!("Pitch without zone in game {}", game);
        return Ok(None);
    };
    let zone = Zone::new(raw_zone)?;

    let Some(details) = event.details.as_ref() else {
        warn!("Pitch without details in game {}", game);
        return Ok(None);
    };
    let description = details
        .call
        .as_ref()
        .and_then(|c| c.description.as_deref())
        .or(details.description.as_deref());
    let Some(description) = description else {
        warn!("Pitch without call description in game {}", game);
        return Ok(None);
    };
    let outcome: PitchOutcome = description.parse()?;

    Ok(Some(PitchRecord {
        zone,
        outcome,
        balls: event.count.as_ref().map(|c| c.balls).unwrap_or(0),
        strikes: event.count.as_ref().map(|c| c.strikes).unwrap_or(0),
        is_in_play: details.is_in_play.unwrap_or(false),
        is_out: details.is_out.unwrap_or(false),
        concludes: None,
    }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
