//! In-process `MatchStore`: an ordered map behind a lock, optionally mirrored to a JSON snapshot file.

use super::{Advancement, MatchStore};
use crate::models::{Match, MatchKey, MatchResult, MatchStatus, Round, TournamentError, TournamentId};
use std::collections::BTreeMap;
use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

type MatchMap = BTreeMap<MatchKey, Match>;

/// Matches keyed by `(tournament, round, table)`; iteration order is round order.
///
/// Every mutation runs under the write lock. With a snapshot path, the map is written
/// out after each mutation and rolled back if that write fails.
#[derive(Debug, Default)]
pub struct MemoryStore {
    matches: RwLock<MatchMap>,
    snapshot: Option<PathBuf>,
}

impl MemoryStore {
    /// Empty store with no snapshot file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store mirrored to `path`. Loads the existing snapshot if the file exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, TournamentError> {
        let path = path.into();
        let matches = if path.exists() {
            load_snapshot(&path)?
        } else {
            MatchMap::new()
        };
        log::info!("Opened match store at {} ({} matches)", path.display(), matches.len());
        Ok(Self {
            matches: RwLock::new(matches),
            snapshot: Some(path),
        })
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MatchMap>, TournamentError> {
        self.matches
            .read()
            .map_err(|_| TournamentError::Persistence("lock error".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MatchMap>, TournamentError> {
        self.matches
            .write()
            .map_err(|_| TournamentError::Persistence("lock error".to_string()))
    }

    /// Apply `f` under the write lock. `f` must validate before it mutates; if it
    /// returns an error the map is left untouched. A failed snapshot write restores
    /// the previous contents.
    fn mutate<T>(
        &self,
        f: impl FnOnce(&mut MatchMap) -> Result<T, TournamentError>,
    ) -> Result<T, TournamentError> {
        let mut g = self.write()?;
        let Some(path) = &self.snapshot else {
            return f(&mut *g);
        };
        let backup = (*g).clone();
        let out = f(&mut *g)?;
        if let Err(e) = save_snapshot(path, &*g) {
            *g = backup;
            return Err(e);
        }
        Ok(out)
    }
}

fn tournament_range(tournament_id: TournamentId) -> RangeInclusive<MatchKey> {
    MatchKey::new(tournament_id, Round::MIN, 0)..=MatchKey::new(tournament_id, Round::MAX, u32::MAX)
}

fn round_range(tournament_id: TournamentId, round: Round) -> RangeInclusive<MatchKey> {
    MatchKey::new(tournament_id, round, 0)..=MatchKey::new(tournament_id, round, u32::MAX)
}

fn round_size(count: usize) -> Result<u32, TournamentError> {
    u32::try_from(count).map_err(|_| TournamentError::Persistence("round too large".to_string()))
}

/// `<path>.tmp`, so the temp file never coincides with the snapshot itself.
fn temp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

fn load_snapshot(path: &Path) -> Result<MatchMap, TournamentError> {
    let bytes = fs::read(path).map_err(|e| {
        TournamentError::Persistence(format!("reading {}: {}", path.display(), e))
    })?;
    let matches: Vec<Match> = serde_json::from_slice(&bytes).map_err(|e| {
        TournamentError::Persistence(format!("parsing {}: {}", path.display(), e))
    })?;
    Ok(matches.into_iter().map(|m| (m.key(), m)).collect())
}

/// Write to a sibling temp file, then rename over the snapshot.
fn save_snapshot(path: &Path, matches: &MatchMap) -> Result<(), TournamentError> {
    let rows: Vec<&Match> = matches.values().collect();
    let bytes = serde_json::to_vec_pretty(&rows)
        .map_err(|e| TournamentError::Persistence(format!("encoding snapshot: {}", e)))?;
    let tmp = temp_path(path);
    fs::write(&tmp, bytes)
        .and_then(|()| fs::rename(&tmp, path))
        .map_err(|e| TournamentError::Persistence(format!("writing {}: {}", path.display(), e)))
}

impl MatchStore for MemoryStore {
    fn create_matches(&self, batch: &[Match]) -> Result<(), TournamentError> {
        self.mutate(|map| {
            let mut keys: Vec<MatchKey> = batch.iter().map(Match::key).collect();
            keys.sort();
            if let Some(w) = keys.windows(2).find(|w| w[0] == w[1]) {
                return Err(TournamentError::Persistence(format!(
                    "duplicate key in batch: {}",
                    w[0]
                )));
            }
            if let Some(key) = keys.iter().find(|k| map.contains_key(*k)) {
                return Err(TournamentError::Persistence(format!(
                    "match already exists: {}",
                    key
                )));
            }
            for m in batch {
                map.insert(m.key(), m.clone());
            }
            Ok(())
        })
    }

    fn get_match(&self, key: &MatchKey) -> Result<Option<Match>, TournamentError> {
        Ok(self.read()?.get(key).cloned())
    }

    fn matches_by_tournament(
        &self,
        tournament_id: TournamentId,
    ) -> Result<Vec<Match>, TournamentError> {
        Ok(self
            .read()?
            .range(tournament_range(tournament_id))
            .map(|(_, m)| m.clone())
            .collect())
    }

    fn matches_by_status(&self, status: MatchStatus) -> Result<Vec<Match>, TournamentError> {
        Ok(self
            .read()?
            .values()
            .filter(|m| m.status == status)
            .cloned()
            .collect())
    }

    fn pending_sibling(&self, key: &MatchKey) -> Result<Option<Match>, TournamentError> {
        Ok(self
            .read()?
            .range(round_range(key.tournament_id, key.round))
            .map(|(_, m)| m)
            .find(|m| m.table != key.table && m.is_awaiting_advancement())
            .cloned())
    }

    fn set_result(&self, key: &MatchKey, result: MatchResult) -> Result<Match, TournamentError> {
        self.mutate(|map| {
            let m = map.get_mut(key).ok_or(TournamentError::NotFound(*key))?;
            m.decide(result)?;
            Ok(m.clone())
        })
    }

    fn set_finished(&self, key: &MatchKey) -> Result<(), TournamentError> {
        self.mutate(|map| {
            map.get_mut(key)
                .ok_or(TournamentError::NotFound(*key))?
                .finish()
        })
    }

    fn count_matches_in_round(
        &self,
        tournament_id: TournamentId,
        round: Round,
    ) -> Result<u32, TournamentError> {
        round_size(self.read()?.range(round_range(tournament_id, round)).count())
    }

    fn commit_advancement(
        &self,
        advancement: &Advancement,
    ) -> Result<Option<Match>, TournamentError> {
        self.mutate(|map| {
            let sources = advancement.source_keys();
            for key in &sources {
                let m = map.get(key).ok_or(TournamentError::NotFound(*key))?;
                if m.status == MatchStatus::Finished {
                    log::warn!("{} already advanced, skipping", key);
                    return Ok(None);
                }
                if !m.result.is_decided() {
                    return Err(TournamentError::RoundNotFinished(*key));
                }
            }

            let next_round = advancement.round + 1;
            let table = round_size(
                map.range(round_range(advancement.tournament_id, next_round)).count(),
            )? + 1;
            let key = MatchKey::new(advancement.tournament_id, next_round, table);
            if map.contains_key(&key) {
                return Err(TournamentError::Persistence(format!(
                    "match already exists: {}",
                    key
                )));
            }

            let next = Match::new(key, &advancement.team_one, &advancement.team_two);
            map.insert(key, next.clone());
            for source in &sources {
                if let Some(m) = map.get_mut(source) {
                    m.status = MatchStatus::Finished;
                }
            }
            Ok(Some(next))
        })
    }
}
