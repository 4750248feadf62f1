//! High score leaderboard
//!
//! The game only ever talks to the `Leaderboard` trait. Two backends ship:
//! an offline board with canned rows, and a local top 10 kept in a JSON
//! file. `LeaderboardClient` sits in front of either and turns failures
//! into log lines so the game never stops over a score.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single leaderboard row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub email: String,
    pub score: u64,
}

impl ScoreEntry {
    pub fn new(email: impl Into<String>, score: u64) -> Self {
        Self {
            email: email.into(),
            score,
        }
    }
}

/// Why a leaderboard call failed
#[derive(Debug)]
pub enum LeaderboardError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    /// Email did not look like `name@domain.tld`
    InvalidEmail(String),
    /// Backend cannot be reached right now
    Unavailable(String),
}

impl fmt::Display for LeaderboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeaderboardError::Io(err) => write!(f, "leaderboard storage error: {err}"),
            LeaderboardError::Parse(err) => write!(f, "corrupt leaderboard data: {err}"),
            LeaderboardError::InvalidEmail(email) => {
                write!(f, "Please enter a valid email address (got '{email}')")
            }
            LeaderboardError::Unavailable(why) => write!(f, "leaderboard unavailable: {why}"),
        }
    }
}

impl std::error::Error for LeaderboardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LeaderboardError::Io(err) => Some(err),
            LeaderboardError::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LeaderboardError {
    fn from(err: std::io::Error) -> Self {
        LeaderboardError::Io(err)
    }
}

impl From<serde_json::Error> for LeaderboardError {
    fn from(err: serde_json::Error) -> Self {
        LeaderboardError::Parse(err)
    }
}

/// A place scores go
pub trait Leaderboard {
    fn submit(&mut self, email: &str, score: u64) -> Result<(), LeaderboardError>;

    /// Top `n` rows, highest score first
    fn query_top(&self, n: usize) -> Result<Vec<ScoreEntry>, LeaderboardError>;
}

/// Board used when no backend is configured
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineLeaderboard;

impl OfflineLeaderboard {
    /// Placeholder rows shown in offline mode
    pub fn placeholder() -> Vec<ScoreEntry> {
        [1000, 800, 600, 400, 200]
            .into_iter()
            .enumerate()
            .map(|(i, score)| ScoreEntry::new(format!("example{}@example.com", i + 1), score))
            .collect()
    }
}

impl Leaderboard for OfflineLeaderboard {
    fn submit(&mut self, email: &str, score: u64) -> Result<(), LeaderboardError> {
        log::info!("Offline mode: would submit score {score} for {}", mask_email(email));
        Ok(())
    }

    fn query_top(&self, n: usize) -> Result<Vec<ScoreEntry>, LeaderboardError> {
        let mut rows = Self::placeholder();
        rows.truncate(n);
        Ok(rows)
    }
}

/// Top scores kept in a JSON file
#[derive(Debug, Clone)]
pub struct LocalLeaderboard {
    path: PathBuf,
    entries: Vec<ScoreEntry>,
}

impl LocalLeaderboard {
    /// Open the board at `path`. A missing file is an empty board.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LeaderboardError> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str::<Vec<ScoreEntry>>(&json)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No leaderboard at {}, starting fresh", path.display());
                Vec::new()
            }
            Err(err) => return Err(err.into()),
        };
        let mut board = Self { path, entries };
        board.entries.sort_by(|a, b| b.score.cmp(&a.score));
        board.entries.truncate(MAX_HIGH_SCORES);
        log::info!("Loaded {} high scores", board.entries.len());
        Ok(board)
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Check if score beats the lowest entry
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Insert in sorted position. Returns the rank achieved, if any.
    fn insert(&mut self, entry: ScoreEntry) -> Option<usize> {
        if !self.qualifies(entry.score) {
            return None;
        }
        let rank = match self.entries.iter().position(|e| entry.score > e.score) {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    fn save(&self) -> Result<(), LeaderboardError> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, json)?;
        log::info!(
            "High scores saved to {} ({} entries)",
            self.path.display(),
            self.entries.len()
        );
        Ok(())
    }
}

impl Leaderboard for LocalLeaderboard {
    fn submit(&mut self, email: &str, score: u64) -> Result<(), LeaderboardError> {
        let before = self.entries.clone();
        match self.insert(ScoreEntry::new(email, score)) {
            Some(rank) => {
                // Only keep the row once it is on disk
                if let Err(err) = self.save() {
                    self.entries = before;
                    return Err(err);
                }
                log::info!("Score {score} placed #{rank}");
                Ok(())
            }
            None => {
                log::info!("Score {score} did not make the top {MAX_HIGH_SCORES}");
                Ok(())
            }
        }
    }

    fn query_top(&self, n: usize) -> Result<Vec<ScoreEntry>, LeaderboardError> {
        Ok(self.entries.iter().take(n).cloned().collect())
    }
}

/// Result of a submit as the player sees it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted,
    /// Input problem, with a message to show
    Rejected(String),
    /// Backend failure (already logged)
    Failed,
}

/// Front door to any leaderboard backend
pub struct LeaderboardClient {
    backend: Box<dyn Leaderboard>,
}

impl fmt::Debug for LeaderboardClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeaderboardClient").finish_non_exhaustive()
    }
}

impl Default for LeaderboardClient {
    fn default() -> Self {
        Self::offline()
    }
}

impl LeaderboardClient {
    pub fn new(backend: Box<dyn Leaderboard>) -> Self {
        Self { backend }
    }

    pub fn offline() -> Self {
        Self::new(Box::new(OfflineLeaderboard))
    }

    /// Local board at `path`, or the offline board if it cannot be opened
    pub fn local_or_offline(path: &Path) -> Self {
        match LocalLeaderboard::open(path) {
            Ok(board) => Self::new(Box::new(board)),
            Err(err) => {
                log::warn!("{err}; using offline leaderboard");
                Self::offline()
            }
        }
    }

    /// Validate the email, then hand the score to the backend
    pub fn submit(&mut self, email: &str, score: u64) -> SubmitOutcome {
        let email = email.trim();
        if let Err(err) = validate_email(email) {
            return SubmitOutcome::Rejected(err.to_string());
        }
        match self.backend.submit(email, score) {
            Ok(()) => {
                log::info!("Score submitted: {score} for {}", mask_email(email));
                SubmitOutcome::Accepted
            }
            Err(err) => {
                log::warn!("Error submitting score: {err}");
                SubmitOutcome::Failed
            }
        }
    }

    /// Top `n` rows, or nothing if the backend fails
    pub fn top(&self, n: usize) -> Vec<ScoreEntry> {
        self.backend.query_top(n).unwrap_or_else(|err| {
            log::warn!("Error fetching leaderboard: {err}");
            Vec::new()
        })
    }
}

/// Accept `local@domain.tld` with a letters-only tld of two or more
pub fn validate_email(email: &str) -> Result<(), LeaderboardError> {
    let invalid = || LeaderboardError::InvalidEmail(email.to_string());

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    let (host, tld) = domain.rsplit_once('.').ok_or_else(invalid)?;

    let local_ok = !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '%' | '+' | '-'));
    let host_ok = !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-'));
    let tld_ok = tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic());

    if local_ok && host_ok && tld_ok {
        Ok(())
    } else {
        Err(invalid())
    }
}

/// Keep the first character of the name, star out the rest
pub fn mask_email(email: &str) -> String {
    let Some((name, domain)) = email.split_once('@') else {
        return email.to_string();
    };
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => format!("{first}{}@{domain}", "*".repeat(chars.count())),
        None => email.to_string(),
    }
}
