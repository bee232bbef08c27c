// Pitch and plate-appearance outcome categories.
//
// The feed reports these as free-text strings. Pitch calls are a closed set:
// an unknown call is an error, never a silent non-match. Plate-appearance
// results are open-ended upstream, so only the results the metrics care
// about get their own variant.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::ZoneError;

// ---------------------------------------------------------------------------
// PitchOutcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PitchOutcome {
    Ball,
    BallInDirt,
    CalledStrike,
    SwingingStrike,
    SwingingStrikeBlocked,
    Foul,
    FoulTip,
    FoulBunt,
    MissedBunt,
    BuntFoulTip,
    FoulPitchout,
    SwingingPitchout,
    Pitchout,
    IntentBall,
    HitByPitch,
    InPlayOut,
    InPlayNoOut,
    InPlayRuns,
    AutomaticBall,
    AutomaticStrike,
}

impl PitchOutcome {
    /// The batter offered at the pitch.
    pub fn is_swing(self) -> bool {
        matches!(
            self,
            PitchOutcome::SwingingStrike
                | PitchOutcome::SwingingStrikeBlocked
                | PitchOutcome::InPlayOut
                | PitchOutcome::InPlayNoOut
                | PitchOutcome::InPlayRuns
                | PitchOutcome::FoulTip
                | PitchOutcome::Foul
        )
    }

    /// The batter swung and made no contact.
    pub fn is_miss(self) -> bool {
        matches!(
            self,
            PitchOutcome::SwingingStrike | PitchOutcome::SwingingStrikeBlocked
        )
    }

    /// Counts toward the ball total (ball four ends in a walk).
    pub fn is_ball(self) -> bool {
        matches!(
            self,
            PitchOutcome::Ball
                | PitchOutcome::BallInDirt
                | PitchOutcome::Pitchout
                | PitchOutcome::IntentBall
                | PitchOutcome::AutomaticBall
        )
    }

    /// Ball put in play with the batter safe: `In play, no out` or
    /// `In play, run(s)`.
    pub fn is_in_play_safe(self) -> bool {
        matches!(self, PitchOutcome::InPlayNoOut | PitchOutcome::InPlayRuns)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PitchOutcome::Ball => "Ball",
            PitchOutcome::BallInDirt => "Ball In Dirt",
            PitchOutcome::CalledStrike => "Called Strike",
            PitchOutcome::SwingingStrike => "Swinging Strike",
            PitchOutcome::SwingingStrikeBlocked => "Swinging Strike (Blocked)",
            PitchOutcome::Foul => "Foul",
            PitchOutcome::FoulTip => "Foul Tip",
            PitchOutcome::FoulBunt => "Foul Bunt",
            PitchOutcome::MissedBunt => "Missed Bunt",
            PitchOutcome::BuntFoulTip => "Bunt Foul Tip",
            PitchOutcome::FoulPitchout => "Foul Pitchout",
            PitchOutcome::SwingingPitchout => "Swinging Pitchout",
            PitchOutcome::Pitchout => "Pitchout",
            PitchOutcome::IntentBall => "Intent Ball",
            PitchOutcome::HitByPitch => "Hit By Pitch",
            PitchOutcome::InPlayOut => "In play, out(s)",
            PitchOutcome::InPlayNoOut => "In play, no out",
            PitchOutcome::InPlayRuns => "In play, run(s)",
            PitchOutcome::AutomaticBall => "Automatic Ball",
            PitchOutcome::AutomaticStrike => "Automatic Strike",
        }
    }
}

impl FromStr for PitchOutcome {
    type Err = ZoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let outcome = match trimmed {
            "Ball" => PitchOutcome::Ball,
            "Ball In Dirt" => PitchOutcome::BallInDirt,
            "Called Strike" => PitchOutcome::CalledStrike,
            "Swinging Strike" => PitchOutcome::SwingingStrike,
            "Swinging Strike (Blocked)" => PitchOutcome::SwingingStrikeBlocked,
            "Foul" => PitchOutcome::Foul,
            "Foul Tip" => PitchOutcome::FoulTip,
            "Foul Bunt" => PitchOutcome::FoulBunt,
            "Missed Bunt" => PitchOutcome::MissedBunt,
            "Bunt Foul Tip" => PitchOutcome::BuntFoulTip,
            "Foul Pitchout" => PitchOutcome::FoulPitchout,
            "Swinging Pitchout" => PitchOutcome::SwingingPitchout,
            "Pitchout" => PitchOutcome::Pitchout,
            "Intent Ball" => PitchOutcome::IntentBall,
            "Hit By Pitch" => PitchOutcome::HitByPitch,
            "In play, out(s)" => PitchOutcome::InPlayOut,
            "In play, no out" => PitchOutcome::InPlayNoOut,
            "In play, run(s)" => PitchOutcome::InPlayRuns,
            // Pitch-timer and other violations carry a suffix, e.g.
            // "Automatic Ball - Pitcher Pitch Timer Violation".
            t if t.starts_with("Automatic Ball") => PitchOutcome::AutomaticBall,
            t if t.starts_with("Automatic Strike") => PitchOutcome::AutomaticStrike,
            _ => return Err(ZoneError::UnknownPitchOutcome(trimmed.to_string())),
        };
        Ok(outcome)
    }
}

impl fmt::Display for PitchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PlayOutcome
// ---------------------------------------------------------------------------

/// Result of a completed plate appearance (`result.event` in the feed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayOutcome {
    Single,
    Double,
    Triple,
    HomeRun,
    Walk,
    IntentWalk,
    HitByPitch,
    Strikeout,
    StrikeoutDoublePlay,
    SacFly,
    SacFlyDoublePlay,
    SacBunt,
    SacBuntDoublePlay,
    CatcherInterference,
    Other(String),
}

impl PlayOutcome {
    pub fn parse(event: &str) -> PlayOutcome {
        match event.trim() {
            "Single" => PlayOutcome::Single,
            "Double" => PlayOutcome::Double,
            "Triple" => PlayOutcome::Triple,
            "Home Run" => PlayOutcome::HomeRun,
            "Walk" => PlayOutcome::Walk,
            "Intent Walk" => PlayOutcome::IntentWalk,
            "Hit By Pitch" => PlayOutcome::HitByPitch,
            "Strikeout" => PlayOutcome::Strikeout,
            "Strikeout Double Play" => PlayOutcome::StrikeoutDoublePlay,
            "Sac Fly" => PlayOutcome::SacFly,
            "Sac Fly Double Play" => PlayOutcome::SacFlyDoublePlay,
            "Sac Bunt" => PlayOutcome::SacBunt,
            "Sac Bunt Double Play" => PlayOutcome::SacBuntDoublePlay,
            "Catcher Interference" => PlayOutcome::CatcherInterference,
            other => PlayOutcome::Other(other.to_string()),
        }
    }

    /// Bases credited to the batter for a hit; 0 for anything else.
    pub fn total_bases(&self) -> u32 {
        match self {
            PlayOutcome::Single => 1,
            PlayOutcome::Double => 2,
            PlayOutcome::Triple => 3,
            PlayOutcome::HomeRun => 4,
            _ => 0,
        }
    }

    pub fn is_walk(&self) -> bool {
        matches!(self, PlayOutcome::Walk | PlayOutcome::IntentWalk)
    }

    pub fn is_strikeout(&self) -> bool {
        matches!(self, PlayOutcome::Strikeout | PlayOutcome::StrikeoutDoublePlay)
    }

    pub fn is_sac_fly(&self) -> bool {
        matches!(self, PlayOutcome::SacFly | PlayOutcome::SacFlyDoublePlay)
    }

    /// Whether a plate appearance the batter completed is charged as an
    /// at-bat. Plays that ended on the bases (caught stealing, pickoffs) never
    /// got that far; see `PlateAppearance::classify`.
    pub fn is_at_bat(&self) -> bool {
        !matches!(
            self,
            PlayOutcome::Walk
                | PlayOutcome::IntentWalk
                | PlayOutcome::HitByPitch
                | PlayOutcome::SacFly
                | PlayOutcome::SacFlyDoublePlay
                | PlayOutcome::SacBunt
                | PlayOutcome::SacBuntDoublePlay
                | PlayOutcome::CatcherInterference
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
