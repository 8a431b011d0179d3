//! Bracket state machine: round-one generation, result recording, advancement.

mod advance;
mod result;
mod schedule;

pub use advance::{advance, is_final_round, AdvanceOutcome};
pub use result::record_result;
pub use schedule::{generate_bracket, roster_from_csv, schedule_bracket, validate_roster, Bracket};
