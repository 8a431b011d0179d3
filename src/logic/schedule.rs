//! Round-one generation: validate a roster and pair it into the opening matches.

use crate::models::{Format, Match, MatchKey, TournamentError, TournamentId};
use crate::store::MatchStore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A freshly generated tournament: its id and round-one matches in table order.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    pub tournament_id: TournamentId,
    pub matches: Vec<Match>,
}

/// Check a roster and return the trimmed team names.
///
/// Size must be a power of two of at least 2; names must be non-blank and unique (case-insensitive).
pub fn validate_roster(teams: &[String]) -> Result<Vec<String>, TournamentError> {
    if teams.len() < 2 || !teams.len().is_power_of_two() {
        return Err(TournamentError::InvalidRoster(format!(
            "number of teams not a power of 2 (got {})",
            teams.len()
        )));
    }
    let mut names: Vec<String> = Vec::with_capacity(teams.len());
    for team in teams {
        let name = team.trim();
        if name.is_empty() {
            return Err(TournamentError::InvalidRoster("blank team name".to_string()));
        }
        if names.iter().any(|n| n.eq_ignore_ascii_case(name)) {
            return Err(TournamentError::DuplicateTeam(name.to_string()));
        }
        names.push(name.to_string());
    }
    Ok(names)
}

/// Build round one without persisting it.
///
/// Team `2i` meets team `2i+1` at table `i+1`. The roster is checked before the format.
pub fn generate_bracket(teams: &[String], format: &str) -> Result<Bracket, TournamentError> {
    let names = validate_roster(teams)?;
    match format.parse::<Format>()? {
        Format::Single => {}
        unsupported => {
            return Err(TournamentError::UnsupportedFormat(unsupported.as_str().to_string()))
        }
    }

    let tournament_id = Uuid::new_v4();
    let matches = names
        .chunks_exact(2)
        .zip(1..)
        .map(|(pair, table)| {
            Match::new(MatchKey::new(tournament_id, 1, table), &pair[0], &pair[1])
        })
        .collect();
    Ok(Bracket {
        tournament_id,
        matches,
    })
}

/// Generate round one and persist it as one batch. Nothing is returned unless the batch is stored.
pub fn schedule_bracket(
    store: &impl MatchStore,
    teams: &[String],
    format: &str,
) -> Result<Bracket, TournamentError> {
    let bracket = generate_bracket(teams, format)?;
    store.create_matches(&bracket.matches)?;
    log::info!(
        "Scheduled tournament {} ({} teams, {} matches)",
        bracket.tournament_id,
        teams.len(),
        bracket.matches.len()
    );
    Ok(bracket)
}

/// Read a roster from CSV: first column of each record, optional `team` header, blank lines skipped.
pub fn roster_from_csv<R: std::io::Read>(reader: R) -> Result<Vec<String>, TournamentError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut teams = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record.map_err(|e| TournamentError::InvalidRoster(e.to_string()))?;
        let Some(name) = record.get(0).filter(|n| !n.is_empty()) else {
            continue;
        };
        if i == 0 && name.eq_ignore_ascii_case("team") {
            continue;
        }
        teams.push(name.to_string());
    }
    Ok(teams)
}
