//! `TournamentService`: the operations exposed to the request layer.

use crate::logic::{self, AdvanceOutcome, Bracket};
use crate::models::{Match, MatchKey, MatchStatus, Standing, TournamentError, TournamentId};
use crate::store::MatchStore;

/// Orchestrates scheduling, result submission, and queries over one shared store handle.
#[derive(Debug)]
pub struct TournamentService<S> {
    store: S,
}

impl<S: MatchStore> TournamentService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Generate and persist round one.
    pub fn schedule(&self, teams: &[String], format: &str) -> Result<Bracket, TournamentError> {
        logic::schedule_bracket(&self.store, teams, format)
    }

    /// Same as `schedule`, with the roster read from CSV.
    pub fn schedule_csv<R: std::io::Read>(
        &self,
        reader: R,
        format: &str,
    ) -> Result<Bracket, TournamentError> {
        let teams = logic::roster_from_csv(reader)?;
        self.schedule(&teams, format)
    }

    /// Record a result, then attempt advancement.
    ///
    /// If recording fails nothing else runs. If advancement fails the result stays
    /// recorded and `resume_advancement` may be called to retry.
    pub fn submit_result(&self, key: MatchKey, result: i64) -> Result<AdvanceOutcome, TournamentError> {
        logic::record_result(&self.store, &key, result)?;
        logic::advance(&self.store, &key)
    }

    /// Re-run advancement for a decided match (e.g. after `AdvancementIncomplete`).
    pub fn resume_advancement(&self, key: MatchKey) -> Result<AdvanceOutcome, TournamentError> {
        logic::advance(&self.store, &key)
    }

    /// All matches of a tournament, ordered by round then table. Empty for an unknown id.
    pub fn list_matches(&self, tournament_id: TournamentId) -> Result<Vec<Match>, TournamentError> {
        self.store.matches_by_tournament(tournament_id)
    }

    pub fn matches_by_status(&self, status: MatchStatus) -> Result<Vec<Match>, TournamentError> {
        self.store.matches_by_status(status)
    }

    /// Completed once the highest round is the final and its match is decided.
    pub fn standing(&self, tournament_id: TournamentId) -> Result<Standing, TournamentError> {
        let matches = self.store.matches_by_tournament(tournament_id)?;
        let Some(last) = matches.last() else {
            return Err(TournamentError::UnknownTournament(tournament_id));
        };
        let round = last.round;
        let first_round = u32::try_from(matches.iter().filter(|m| m.round == 1).count())
            .map_err(|_| TournamentError::Persistence("round too large".to_string()))?;
        let mut top = matches.iter().filter(|m| m.round == round);
        if let (Some(only), None) = (top.next(), top.next()) {
            if logic::is_final_round(first_round, round) && only.result.is_decided() {
                return Ok(Standing::Completed {
                    champion: only.winner()?.to_string(),
                });
            }
        }
        Ok(Standing::InProgress { round })
    }
}
