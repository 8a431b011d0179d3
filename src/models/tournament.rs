//! Tournament identity, bracket format, standing, and the error type shared by all operations.

use crate::models::game::{MatchKey, Round};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Roster is empty, not a power of two, has a blank name, or could not be parsed.
    InvalidRoster(String),
    /// The same team appears twice in a roster (names compared case-insensitively).
    DuplicateTeam(String),
    /// Format is not `SINGLE`.
    UnsupportedFormat(String),
    /// Result code is not 1 (team one wins) or 2 (team two wins).
    InvalidResult(i64),
    /// Referenced match does not exist.
    NotFound(MatchKey),
    /// No match exists for this tournament id.
    UnknownTournament(TournamentId),
    /// A result is already recorded for the match; results are write-once.
    AlreadyFinished(MatchKey),
    /// Winner requested before a result exists.
    RoundNotFinished(MatchKey),
    /// Next-round creation or finalization did not complete; safe to retry.
    AdvancementIncomplete { key: MatchKey, reason: String },
    /// Opaque storage failure (I/O, lock poisoning, key conflict).
    Persistence(String),
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::InvalidRoster(reason) => write!(f, "Invalid roster: {}", reason),
            TournamentError::DuplicateTeam(name) => {
                write!(f, "Team [{}] appears more than once in the roster", name)
            }
            TournamentError::UnsupportedFormat(format) => {
                write!(f, "Unsupported tournament format [{}]", format)
            }
            TournamentError::InvalidResult(code) => {
                write!(f, "Invalid result {} (expected 1 or 2)", code)
            }
            TournamentError::NotFound(key) => write!(f, "Match not found: {}", key),
            TournamentError::UnknownTournament(id) => write!(f, "No tournament {}", id),
            TournamentError::AlreadyFinished(key) => {
                write!(f, "Result already recorded for {}", key)
            }
            TournamentError::RoundNotFinished(key) => write!(f, "No result yet for {}", key),
            TournamentError::AdvancementIncomplete { key, reason } => {
                write!(f, "Advancement from {} did not complete: {}", key, reason)
            }
            TournamentError::Persistence(reason) => write!(f, "Storage error: {}", reason),
        }
    }
}

impl std::error::Error for TournamentError {}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Bracket format requested at schedule time.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Format {
    /// Single elimination.
    Single,
    /// Recognized but not implemented.
    Consolation,
}

impl Format {
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Single => "SINGLE",
            Format::Consolation => "CONSOLATION",
        }
    }
}

impl std::str::FromStr for Format {
    type Err = TournamentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SINGLE" => Ok(Format::Single),
            "CONSOLATION" => Ok(Format::Consolation),
            other => Err(TournamentError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Where a tournament currently stands.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum Standing {
    /// Highest round reached so far still has matches to play or pair.
    InProgress { round: Round },
    /// The final has been decided.
    Completed { champion: String },
}
