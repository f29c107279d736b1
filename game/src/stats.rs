//! High-score persistence.
//!
//! Storage is best effort: every failure is logged and replaced by default stats, so callers
//! never see an error.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

pub const STATS_KEY: &str = "snake-game-stats";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage is unavailable")]
    Unavailable,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// One file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_env() -> Self {
        if let Some(explicit) = std::env::var_os("SNAKE_DATA_DIR") {
            return Self::new(PathBuf::from(explicit));
        }

        let base = std::env::var_os("XDG_DATA_HOME")
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("HOME").map(|home| {
                    let mut p = PathBuf::from(home);
                    p.push(".local");
                    p.push("share");
                    p
                })
            })
            .unwrap_or_else(|| PathBuf::from("."));

        Self::new(base.join("snake-game"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }
}

/// In-memory store. Can be switched off to behave like blocked storage.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    available: bool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            available: true,
        }
    }
}

impl MemoryStore {
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::default()
        }
    }

    fn check(&self) -> Result<(), StorageError> {
        if self.available {
            Ok(())
        } else {
            Err(StorageError::Unavailable)
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check()?;
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check()?;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.check()?;
        self.entries.remove(key);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStats {
    pub high_score: u32,
    pub games_played: u32,
    pub last_played: DateTime<Utc>,
}

impl GameStats {
    pub fn fresh(now: DateTime<Utc>) -> Self {
        Self {
            high_score: 0,
            games_played: 0,
            last_played: now,
        }
    }
}

pub trait StatsStore {
    fn high_score(&self) -> u32;
    fn games_played(&self) -> u32;
    fn last_played(&self) -> DateTime<Utc>;
    /// Counts a finished game. Returns whether `score` set a new high score.
    fn record_game_end(&mut self, score: u32) -> bool;
    fn clear_stats(&mut self);
}

/// [`StatsStore`] over any [`KeyValueStore`], stored as JSON under [`STATS_KEY`].
#[derive(Debug, Clone)]
pub struct GameStorage<K> {
    store: K,
}

impl<K: KeyValueStore> GameStorage<K> {
    pub fn new(store: K) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &K {
        &self.store
    }

    pub fn stats(&self) -> GameStats {
        let loaded = self.store.get(STATS_KEY).and_then(|raw| {
            raw.map(|text| serde_json::from_str::<GameStats>(&text))
                .transpose()
                .map_err(StorageError::from)
        });
        match loaded {
            Ok(Some(stats)) => stats,
            Ok(None) => GameStats::fresh(Utc::now()),
            Err(err) => {
                warn!(%err, "failed to load game stats, using defaults");
                GameStats::fresh(Utc::now())
            }
        }
    }

    fn save(&mut self, stats: &GameStats) {
        let saved = serde_json::to_string(stats)
            .map_err(StorageError::from)
            .and_then(|text| self.store.set(STATS_KEY, &text));
        if let Err(err) = saved {
            warn!(%err, "failed to save game stats");
        }
    }
}

impl<K: KeyValueStore> StatsStore for GameStorage<K> {
    fn high_score(&self) -> u32 {
        self.stats().high_score
    }

    fn games_played(&self) -> u32 {
        self.stats().games_played
    }

    fn last_played(&self) -> DateTime<Utc> {
        self.stats().last_played
    }

    fn record_game_end(&mut self, score: u32) -> bool {
        let stats = self.stats();
        let is_new_high = score > stats.high_score;
        let updated = GameStats {
            high_score: stats.high_score.max(score),
            games_played: stats.games_played.saturating_add(1),
            last_played: Utc::now(),
        };
        self.save(&updated);
        is_new_high
    }

    fn clear_stats(&mut self) {
        if let Err(err) = self.store.remove(STATS_KEY) {
            warn!(%err, "failed to clear game stats");
        }
    }
}
