//! Single-elimination bracket manager: match model, bracket logic, storage, and service layer.

pub mod config;
pub mod logic;
pub mod models;
pub mod service;
pub mod store;

pub use config::ServerConfig;
pub use logic::{
    advance, generate_bracket, is_final_round, record_result, roster_from_csv, schedule_bracket,
    validate_roster, AdvanceOutcome, Bracket,
};
pub use models::{
    Format, Match, MatchKey, MatchResult, MatchStatus, Round, Standing, Table, TournamentError,
    TournamentId,
};
pub use service::TournamentService;
pub use store::{Advancement, MatchStore, MemoryStore};
