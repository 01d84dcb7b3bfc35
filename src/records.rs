//! Player identities and the persistent session log
//!
//! Each player name maps to one stable numeric ID for as long as the
//! registry file survives. Every finished run is appended to a JSON-lines
//! log and offered to the leaderboard.

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::RecordError;
use crate::highscores::HighScores;
use crate::platform::SessionRecorder;
use crate::sim::{RandomSource, SessionResult};

/// Smallest and largest freshly drawn player ID (five digits)
pub const MIN_PLAYER_ID: u32 = 10_000;
pub const MAX_PLAYER_ID: u32 = 99_999;

/// Random draws before giving up on finding an unused ID
const MAX_ID_DRAWS: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: u32,
    pub name: String,
}

/// Name → ID registry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerRegistry {
    pub players: Vec<Player>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.name == name)
    }

    /// Existing player for `name`, or a new one with an unused ID
    pub fn get_or_create(&mut self, name: &str, rng: &mut impl RandomSource) -> Player {
        if let Some(player) = self.lookup(name) {
            return player.clone();
        }
        let player = Player {
            id: self.fresh_id(rng),
            name: name.to_string(),
        };
        log::info!("Registered player {} with ID {}", player.name, player.id);
        self.players.push(player.clone());
        player
    }

    fn fresh_id(&self, rng: &mut impl RandomSource) -> u32 {
        let taken = |id: u32| self.players.iter().any(|p| p.id == id);
        for _ in 0..MAX_ID_DRAWS {
            let id = rng.uniform_int(MIN_PLAYER_ID as i32, MAX_PLAYER_ID as i32) as u32;
            if !taken(id) {
                return id;
            }
        }
        // Crowded range: step past the largest ID instead
        self.players
            .iter()
            .map(|p| p.id)
            .max()
            .unwrap_or(MAX_PLAYER_ID)
            .saturating_add(1)
    }

    pub fn to_json(&self) -> Result<String, RecordError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read the registry, treating a missing file as empty.
    ///
    /// A corrupt file is an error rather than a fresh start, so IDs are
    /// never silently reassigned.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RecordError> {
        match std::fs::read_to_string(path.as_ref()) {
            Ok(json) => {
                let registry = Self::from_json(&json)?;
                log::info!("Loaded {} players", registry.players.len());
                Ok(registry)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No player registry found, starting fresh");
                Ok(Self::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), RecordError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

/// One persisted run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub player: String,
    pub player_id: u32,
    pub score: u32,
    pub started_at: Duration,
    pub ended_at: Duration,
    pub duration: Duration,
    pub frustration_rating: Option<u8>,
}

impl SessionRecord {
    pub fn new(player: &Player, result: &SessionResult) -> Self {
        Self {
            player: player.name.clone(),
            player_id: player.id,
            score: result.score,
            started_at: result.started_at,
            ended_at: result.ended_at,
            duration: result.duration,
            frustration_rating: result.frustration_rating.map(|r| r.value()),
        }
    }
}

/// Append-only JSON-lines session log
#[derive(Debug)]
pub struct SessionLog<W: Write> {
    out: W,
}

impl SessionLog<File> {
    /// Open (or create) a log file for appending
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RecordError> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(file))
    }
}

impl<W: Write> SessionLog<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn append(&mut self, record: &SessionRecord) -> Result<(), RecordError> {
        let line = serde_json::to_string(record)?;
        writeln!(self.out, "{}", line)?;
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Parse a session log, skipping blank lines
pub fn read_sessions(reader: impl BufRead) -> Result<Vec<SessionRecord>, RecordError> {
    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(serde_json::from_str(&line)?);
    }
    Ok(records)
}

/// Recorder that logs each run for one player and keeps the leaderboard
#[derive(Debug)]
pub struct SessionStore<W: Write> {
    pub player: Player,
    log: SessionLog<W>,
    pub scores: HighScores,
    scores_path: Option<PathBuf>,
}

impl<W: Write> SessionStore<W> {
    pub fn new(player: Player, log: SessionLog<W>, scores: HighScores) -> Self {
        Self {
            player,
            log,
            scores,
            scores_path: None,
        }
    }

    /// Save the leaderboard to `path` after every recorded run
    pub fn with_scores_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.scores_path = Some(path.into());
        self
    }

    pub fn into_log(self) -> SessionLog<W> {
        self.log
    }
}

impl<W: Write> SessionRecorder for SessionStore<W> {
    fn record(&mut self, result: &SessionResult) -> Result<(), RecordError> {
        self.log.append(&SessionRecord::new(&self.player, result))?;
        if let Some(rank) = self.scores.add_result(&self.player.name, result) {
            log::info!("{} placed #{} on the leaderboard", self.player.name, rank);
            if let Some(path) = &self.scores_path {
                self.scores.save(path)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{FrustrationRating, PcgSource, ScriptedSource};

    fn result(score: u32) -> SessionResult {
        SessionResult {
            score,
            started_at: Duration::from_secs(2),
            ended_at: Duration::from_secs(9),
            duration: Duration::from_secs(7),
            frustration_rating: FrustrationRating::try_from(1).ok(),
        }
    }

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("gap-runner-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_same_name_keeps_its_id() {
        let mut registry = PlayerRegistry::new();
        let mut rng = PcgSource::new(4);
        let ana = registry.get_or_create("ana", &mut rng);
        let ben = registry.get_or_create("ben", &mut rng);
        assert!((MIN_PLAYER_ID..=MAX_PLAYER_ID).contains(&ana.id));
        assert_ne!(ana.id, ben.id);
        assert_eq!(registry.get_or_create("ana", &mut rng), ana);
        assert_eq!(registry.players.len(), 2);
    }

    #[test]
    fn test_taken_id_is_redrawn() {
        let mut registry = PlayerRegistry::new();
        let mut rng = ScriptedSource::new().with_ints([12_345, 12_345, 23_456]);
        assert_eq!(registry.get_or_create("ana", &mut rng).id, 12_345);
        assert_eq!(registry.get_or_create("ben", &mut rng).id, 23_456);
    }

    #[test]
    fn test_crowded_range_steps_past_max() {
        let mut registry = PlayerRegistry::new();
        registry.players.push(Player {
            id: MIN_PLAYER_ID,
            name: "ana".into(),
        });
        // An empty script always answers the low end of the range
        let mut rng = ScriptedSource::new();
        assert_eq!(registry.get_or_create("ben", &mut rng).id, MIN_PLAYER_ID + 1);
    }

    #[test]
    fn test_registry_survives_reload() {
        let path = scratch_path("players.json");
        let _ = std::fs::remove_file(&path);
        assert!(PlayerRegistry::load(&path).unwrap().players.is_empty());

        let mut registry = PlayerRegistry::new();
        let ana = registry.get_or_create("ana", &mut PcgSource::new(8));
        registry.save(&path).unwrap();

        let mut reloaded = PlayerRegistry::load(&path).unwrap();
        assert_eq!(reloaded.get_or_create("ana", &mut PcgSource::new(9)), ana);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_corrupt_registry_is_an_error() {
        assert!(matches!(
            PlayerRegistry::from_json("not json"),
            Err(RecordError::Json(_))
        ));
    }

    #[test]
    fn test_log_appends_one_line_per_run() {
        let player = Player {
            id: 42_424,
            name: "ana".into(),
        };
        let mut log = SessionLog::new(Vec::new());
        log.append(&SessionRecord::new(&player, &result(3))).unwrap();
        log.append(&SessionRecord::new(&player, &result(5))).unwrap();

        let bytes = log.into_inner();
        let records = read_sessions(bytes.as_slice()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].player_id, 42_424);
        assert_eq!(records[1].score, 5);
        assert_eq!(records[1].duration, Duration::from_secs(7));
        assert_eq!(records[1].frustration_rating, Some(1));
    }

    #[test]
    fn test_log_file_keeps_earlier_sessions() {
        let path = scratch_path("sessions.jsonl");
        let _ = std::fs::remove_file(&path);
        let player = Player {
            id: 10_001,
            name: "ben".into(),
        };
        for score in [1, 2] {
            let mut log = SessionLog::open(&path).unwrap();
            log.append(&SessionRecord::new(&player, &result(score))).unwrap();
        }
        let file = std::io::BufReader::new(File::open(&path).unwrap());
        let scores: Vec<u32> = read_sessions(file)
            .unwrap()
            .iter()
            .map(|r| r.score)
            .collect();
        assert_eq!(scores, vec![1, 2]);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_store_records_and_ranks() {
        let path = scratch_path("store-scores.json");
        let _ = std::fs::remove_file(&path);
        let player = Player {
            id: 55_555,
            name: "cy".into(),
        };
        let mut store = SessionStore::new(player, SessionLog::new(Vec::new()), HighScores::new())
            .with_scores_file(&path);
        store.record(&result(4)).unwrap();
        store.record(&result(0)).unwrap();

        assert_eq!(store.scores.best_for("cy"), Some(4));
        assert_eq!(HighScores::load(&path).top_score(), Some(4));
        let bytes = store.into_log().into_inner();
        assert_eq!(read_sessions(bytes.as_slice()).unwrap().len(), 2);
        let _ = std::fs::remove_file(&path);
    }
}
