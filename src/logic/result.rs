//! Recording a match outcome.

use crate::models::{Match, MatchKey, MatchResult, TournamentError};
use crate::store::MatchStore;

/// Validate `code` and write it onto the match. Leaves the match pending.
///
/// Fails with `InvalidResult` for codes other than 1/2, `NotFound` for an unknown key,
/// and `AlreadyFinished` if a result is already recorded.
pub fn record_result(
    store: &impl MatchStore,
    key: &MatchKey,
    code: i64,
) -> Result<Match, TournamentError> {
    let result = MatchResult::from_code(code)?;
    match store.set_result(key, result) {
        Ok(m) => {
            log::info!("Recorded {:?} for {}", result, key);
            Ok(m)
        }
        Err(e) => {
            log::warn!("Rejected result {} for {}: {}", code, key, e);
            Err(e)
        }
    }
}
