//! Data structures for the bracket: matches, tournament identity, errors.

mod game;
mod tournament;

pub use game::{Match, MatchKey, MatchResult, MatchStatus, Round, Table};
pub use tournament::{Format, Standing, TournamentError, TournamentId};
