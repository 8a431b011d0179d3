//! Integration tests for round-one generation and roster validation.

use bracket_manager::{
    generate_bracket, roster_from_csv, MatchResult, MatchStatus, MatchStore, MemoryStore,
    TournamentError, TournamentService,
};
use std::collections::HashSet;

fn roster(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("T{i}")).collect()
}

#[test]
fn power_of_two_rosters_pair_every_team_once() {
    for n in [2, 4, 8, 16, 32] {
        let bracket = generate_bracket(&roster(n), "SINGLE").unwrap();
        assert_eq!(bracket.matches.len(), n / 2);

        let tables: Vec<u32> = bracket.matches.iter().map(|m| m.table).collect();
        assert_eq!(tables, (1..=(n / 2) as u32).collect::<Vec<_>>());

        let mut seen = HashSet::new();
        for m in &bracket.matches {
            assert_eq!(m.round, 1);
            assert_eq!(m.tournament_id, bracket.tournament_id);
            assert_eq!(m.status, MatchStatus::Pending);
            assert_eq!(m.result, MatchResult::Unset);
            assert!(seen.insert(m.team_one.clone()));
            assert!(seen.insert(m.team_two.clone()));
        }
        assert_eq!(seen.len(), n);
    }
}

#[test]
fn teams_pair_consecutively() {
    let teams: Vec<String> = ["A", "B", "C", "D"].map(String::from).to_vec();
    let bracket = generate_bracket(&teams, "SINGLE").unwrap();
    assert_eq!(
        (bracket.matches[0].team_one.as_str(), bracket.matches[0].team_two.as_str()),
        ("A", "B")
    );
    assert_eq!(
        (bracket.matches[1].team_one.as_str(), bracket.matches[1].team_two.as_str()),
        ("C", "D")
    );
}

#[test]
fn other_sizes_are_rejected_and_nothing_persisted() {
    let service = TournamentService::new(MemoryStore::new());
    for n in [0, 3, 5, 6, 7, 12] {
        assert!(
            matches!(service.schedule(&roster(n), "SINGLE"), Err(TournamentError::InvalidRoster(_))),
            "size {n} accepted"
        );
    }
    assert!(service.matches_by_status(MatchStatus::Pending).unwrap().is_empty());
}

#[test]
fn single_team_is_rejected() {
    // One team is 2^0 but cannot form a match.
    let service = TournamentService::new(MemoryStore::new());
    assert!(matches!(
        service.schedule(&roster(1), "SINGLE"),
        Err(TournamentError::InvalidRoster(_))
    ));
}

#[test]
fn consolation_and_unknown_formats_are_unsupported() {
    let service = TournamentService::new(MemoryStore::new());
    assert_eq!(
        service.schedule(&roster(4), "CONSOLATION"),
        Err(TournamentError::UnsupportedFormat("CONSOLATION".to_string()))
    );
    assert_eq!(
        service.schedule(&roster(4), "double"),
        Err(TournamentError::UnsupportedFormat("double".to_string()))
    );
    assert!(service.matches_by_status(MatchStatus::Pending).unwrap().is_empty());
}

#[test]
fn blank_and_duplicate_names_are_rejected() {
    let blank: Vec<String> = ["A", "  "].map(String::from).to_vec();
    assert!(matches!(
        generate_bracket(&blank, "SINGLE"),
        Err(TournamentError::InvalidRoster(_))
    ));

    let dup: Vec<String> = ["Red", "Blue", "red ", "Green"].map(String::from).to_vec();
    assert_eq!(
        generate_bracket(&dup, "SINGLE"),
        Err(TournamentError::DuplicateTeam("red".to_string()))
    );
}

#[test]
fn schedule_persists_the_batch() {
    let service = TournamentService::new(MemoryStore::new());
    let bracket = service.schedule(&roster(8), "SINGLE").unwrap();
    let stored = service.list_matches(bracket.tournament_id).unwrap();
    assert_eq!(stored, bracket.matches);
    assert_eq!(
        service
            .store()
            .count_matches_in_round(bracket.tournament_id, 1)
            .unwrap(),
        4
    );
}

#[test]
fn each_schedule_gets_a_fresh_id() {
    let service = TournamentService::new(MemoryStore::new());
    let a = service.schedule(&roster(2), "SINGLE").unwrap();
    let b = service.schedule(&roster(2), "SINGLE").unwrap();
    assert_ne!(a.tournament_id, b.tournament_id);
    assert_eq!(service.list_matches(a.tournament_id).unwrap().len(), 1);
}

#[test]
fn csv_roster_skips_header_and_blank_lines() {
    let csv = "team,seed\nAlpha,1\n\nBeta,2\n  Gamma  \nDelta\n";
    let teams = roster_from_csv(csv.as_bytes()).unwrap();
    assert_eq!(teams, vec!["Alpha", "Beta", "Gamma", "Delta"]);

    let service = TournamentService::new(MemoryStore::new());
    let bracket = service.schedule_csv(csv.as_bytes(), "SINGLE").unwrap();
    assert_eq!(bracket.matches.len(), 2);
    assert_eq!(bracket.matches[1].team_one, "Gamma");
}
