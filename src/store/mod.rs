//! Match persistence: the `MatchStore` contract and its in-process implementation.

mod memory;

pub use memory::MemoryStore;

use crate::models::{Match, MatchKey, MatchResult, MatchStatus, Round, Table, TournamentError, TournamentId};

/// Pairing of two decided matches of one round into a single next-round match.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Advancement {
    pub tournament_id: TournamentId,
    /// Round of both source matches; the new match lands in `round + 1`.
    pub round: Round,
    /// Source tables: `[sibling, current]`.
    pub sources: [Table; 2],
    /// Sibling's winner.
    pub team_one: String,
    /// Current match's winner.
    pub team_two: String,
}

impl Advancement {
    pub fn source_keys(&self) -> [MatchKey; 2] {
        self.sources
            .map(|table| MatchKey::new(self.tournament_id, self.round, table))
    }
}

/// Durable keyed storage for match records.
///
/// Reads must observe every write that completed before them.
pub trait MatchStore: Send + Sync {
    /// All-or-nothing batch insert. Fails if any key already exists.
    fn create_matches(&self, batch: &[Match]) -> Result<(), TournamentError>;

    fn get_match(&self, key: &MatchKey) -> Result<Option<Match>, TournamentError>;

    /// Every match of a tournament, ordered by round then table.
    fn matches_by_tournament(&self, tournament_id: TournamentId) -> Result<Vec<Match>, TournamentError>;

    fn matches_by_status(&self, status: MatchStatus) -> Result<Vec<Match>, TournamentError>;

    /// A match in the same round, different table, still pending with a result set.
    fn pending_sibling(&self, key: &MatchKey) -> Result<Option<Match>, TournamentError>;

    /// Record a result. Fails with `AlreadyFinished` if one exists; returns the updated match.
    fn set_result(&self, key: &MatchKey, result: MatchResult) -> Result<Match, TournamentError>;

    fn set_finished(&self, key: &MatchKey) -> Result<(), TournamentError>;

    fn count_matches_in_round(&self, tournament_id: TournamentId, round: Round) -> Result<u32, TournamentError>;

    /// Atomically create the next-round match and finish both sources.
    ///
    /// Returns `Ok(None)` without writing when either source is already finished,
    /// so exactly one of two racing callers creates the match.
    fn commit_advancement(&self, advancement: &Advancement) -> Result<Option<Match>, TournamentError>;
}
