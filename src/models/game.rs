//! Match entity: composite key, result, and status for one bracket slot.

use crate::models::tournament::{TournamentError, TournamentId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Round number within a tournament (1-based).
pub type Round = u32;

/// Table (slot) number within a round (1-based, creation order).
pub type Table = u32;

/// Composite identity of a match: unique and immutable after creation.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct MatchKey {
    pub tournament_id: TournamentId,
    pub round: Round,
    pub table: Table,
}

impl MatchKey {
    pub fn new(tournament_id: TournamentId, round: Round, table: Table) -> Self {
        Self {
            tournament_id,
            round,
            table,
        }
    }
}

impl fmt::Display for MatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tournament {} round {} table {}",
            self.tournament_id, self.round, self.table
        )
    }
}

/// Outcome of a match. Wire code: 0 unset, 1 team one wins, 2 team two wins.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchResult {
    #[default]
    Unset,
    TeamOneWins,
    TeamTwoWins,
}

impl MatchResult {
    /// Parse a submitted result code. Only 1 and 2 are accepted.
    pub fn from_code(code: i64) -> Result<Self, TournamentError> {
        match code {
            1 => Ok(MatchResult::TeamOneWins),
            2 => Ok(MatchResult::TeamTwoWins),
            other => Err(TournamentError::InvalidResult(other)),
        }
    }

    pub fn code(self) -> i64 {
        match self {
            MatchResult::Unset => 0,
            MatchResult::TeamOneWins => 1,
            MatchResult::TeamTwoWins => 2,
        }
    }

    pub fn is_decided(self) -> bool {
        self != MatchResult::Unset
    }
}

/// Whether a match's advancement consequences are complete.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Pending,
    Finished,
}

/// A single bracket match between two teams.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub tournament_id: TournamentId,
    pub round: Round,
    pub table: Table,
    pub team_one: String,
    pub team_two: String,
    pub status: MatchStatus,
    pub result: MatchResult,
    pub created_at: DateTime<Utc>,
    /// Set in the same write as `result`.
    pub decided_at: Option<DateTime<Utc>>,
}

impl Match {
    /// New undecided, pending match.
    pub fn new(
        key: MatchKey,
        team_one: impl Into<String>,
        team_two: impl Into<String>,
    ) -> Self {
        Self {
            tournament_id: key.tournament_id,
            round: key.round,
            table: key.table,
            team_one: team_one.into(),
            team_two: team_two.into(),
            status: MatchStatus::Pending,
            result: MatchResult::Unset,
            created_at: Utc::now(),
            decided_at: None,
        }
    }

    pub fn key(&self) -> MatchKey {
        MatchKey::new(self.tournament_id, self.round, self.table)
    }

    /// Decided (result set) but not yet finalized into the next round.
    pub fn is_awaiting_advancement(&self) -> bool {
        self.status == MatchStatus::Pending && self.result.is_decided()
    }

    /// Write-once transition `Unset -> decided`. Fails if a result is already recorded.
    pub fn decide(&mut self, result: MatchResult) -> Result<(), TournamentError> {
        if !result.is_decided() {
            return Err(TournamentError::InvalidResult(result.code()));
        }
        if self.result.is_decided() {
            return Err(TournamentError::AlreadyFinished(self.key()));
        }
        self.result = result;
        self.decided_at = Some(Utc::now());
        Ok(())
    }

    /// `Pending -> Finished`; only legal once a result exists.
    pub fn finish(&mut self) -> Result<(), TournamentError> {
        if !self.result.is_decided() {
            return Err(TournamentError::RoundNotFinished(self.key()));
        }
        self.status = MatchStatus::Finished;
        Ok(())
    }

    /// Team that won this match.
    pub fn winner(&self) -> Result<&str, TournamentError> {
        match self.result {
            MatchResult::Unset => Err(TournamentError::RoundNotFinished(self.key())),
            MatchResult::TeamOneWins => Ok(&self.team_one),
            MatchResult::TeamTwoWins => Ok(&self.team_two),
        }
    }
}
