//! Advancement: pair a decided match with a decided sibling into the next round.
//!
//! Pairing follows acceptance order: the sibling is whichever other match of the
//! round is decided but not yet finished. The sibling's winner becomes team one of
//! the new match and the current match's winner team two.

use crate::models::{Match, MatchKey, MatchStatus, Round, TournamentError};
use crate::store::{Advancement, MatchStore};
use serde::{Deserialize, Serialize};

/// What an advancement attempt did.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum AdvanceOutcome {
    /// No decided sibling yet; the match stays pending until one is decided.
    Waiting,
    /// A next-round match was created and both sources finished.
    Advanced { next: Match },
    /// The match had already been finalized (repeat call or lost race).
    AlreadyAdvanced,
    /// The final was decided and finished.
    Champion { team: String },
}

/// True when `round` holds a single match for a bracket whose first round has `first_round_matches`.
pub fn is_final_round(first_round_matches: u32, round: Round) -> bool {
    round >= 1
        && first_round_matches
            .checked_shr(round - 1)
            .is_some_and(|n| n == 1)
}

/// Try to advance the winner of `key`. Safe to repeat.
pub fn advance(store: &impl MatchStore, key: &MatchKey) -> Result<AdvanceOutcome, TournamentError> {
    loop {
        let current = store
            .get_match(key)?
            .ok_or(TournamentError::NotFound(*key))?;
        if current.status == MatchStatus::Finished {
            return Ok(AdvanceOutcome::AlreadyAdvanced);
        }
        let winner = current.winner()?.to_string();

        let Some(sibling) = store.pending_sibling(key)? else {
            return settle_lone_match(store, &current, winner);
        };
        log::debug!("{} pairs with table {}", key, sibling.table);

        let advancement = Advancement {
            tournament_id: key.tournament_id,
            round: key.round,
            sources: [sibling.table, key.table],
            team_one: sibling.winner()?.to_string(),
            team_two: winner,
        };
        match store.commit_advancement(&advancement) {
            Ok(Some(next)) => {
                log::info!(
                    "Advanced {} vs {} to {}",
                    next.team_one,
                    next.team_two,
                    next.key()
                );
                return Ok(AdvanceOutcome::Advanced { next });
            }
            // Another caller finished one of the pair first; look again.
            Ok(None) => continue,
            Err(TournamentError::Persistence(reason)) => {
                return Err(TournamentError::AdvancementIncomplete { key: *key, reason })
            }
            Err(e) => return Err(e),
        }
    }
}

/// No decided sibling: finish the match if it is the final, otherwise wait.
fn settle_lone_match(
    store: &impl MatchStore,
    current: &Match,
    winner: String,
) -> Result<AdvanceOutcome, TournamentError> {
    let key = current.key();
    let first_round = store.count_matches_in_round(key.tournament_id, 1)?;
    if !is_final_round(first_round, key.round) {
        log::debug!("{} waiting for a sibling", key);
        return Ok(AdvanceOutcome::Waiting);
    }
    store.set_finished(&key).map_err(|e| match e {
        TournamentError::Persistence(reason) => TournamentError::AdvancementIncomplete { key, reason },
        other => other,
    })?;
    log::info!("Tournament {} won by {}", key.tournament_id, winner);
    Ok(AdvanceOutcome::Champion { team: winner })
}

#[cfg(test)]
mod tests {
    use super::is_final_round;

    #[test]
    fn final_round_depends_on_first_round_size() {
        assert!(is_final_round(1, 1));
        assert!(!is_final_round(2, 1));
        assert!(is_final_round(2, 2));
        assert!(!is_final_round(4, 2));
        assert!(is_final_round(4, 3));
        assert!(!is_final_round(4, 4));
        assert!(!is_final_round(0, 1));
        assert!(!is_final_round(4, 0));
    }
}
