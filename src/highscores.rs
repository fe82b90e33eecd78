//! Score log and leaderboard
//!
//! Every finished session appends one row to a CSV file with the header
//! `Name,Score,Mode`. The leaderboard is a view over the loaded rows.

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::sim::state::Difficulty;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// First line of every score log
pub const CSV_HEADER: &str = "Name,Score,Mode";

/// Error type for score log I/O
#[derive(Debug)]
pub enum ScoreLogError {
    Io(std::io::Error),
}

impl std::fmt::Display for ScoreLogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoreLogError::Io(e) => write!(f, "Score log I/O error: {}", e),
        }
    }
}

impl std::error::Error for ScoreLogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScoreLogError::Io(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ScoreLogError {
    fn from(e: std::io::Error) -> Self {
        ScoreLogError::Io(e)
    }
}

/// One finished session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub name: String,
    pub score: u32,
    pub mode: Difficulty,
}

impl ScoreRecord {
    pub fn new(name: &str, score: u32, mode: Difficulty) -> Self {
        Self {
            name: name.to_string(),
            score,
            mode,
        }
    }

    fn to_csv_row(&self) -> String {
        format!("{},{},{}", quote_field(&self.name), self.score, self.mode.as_str())
    }

    fn from_csv_row(line: &str) -> Option<Self> {
        let fields = split_row(line)?;
        let [name, score, mode] = fields.as_slice() else {
            return None;
        };
        Some(Self {
            name: name.clone(),
            score: score.trim().parse().ok()?,
            mode: Difficulty::from_name(mode)?,
        })
    }
}

/// Quote a field if it holds a separator or a quote
fn quote_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Split one CSV line. Returns `None` on an unterminated quote.
fn split_row(line: &str) -> Option<Vec<String>> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut chars = line.chars().peekable();
    let mut quoted = false;

    while let Some(c) = chars.next() {
        match (quoted, c) {
            (true, '"') if chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            (true, '"') => quoted = false,
            (true, c) => field.push(c),
            (false, '"') if field.is_empty() => quoted = true,
            (false, ',') => fields.push(std::mem::take(&mut field)),
            (false, c) => field.push(c),
        }
    }
    if quoted {
        return None;
    }
    fields.push(field);
    Some(fields)
}

/// Append-only CSV score file
#[derive(Debug, Clone)]
pub struct ScoreLog {
    path: PathBuf,
}

impl ScoreLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one row, writing the header first if the file is new or empty
    pub fn append(&self, record: &ScoreRecord) -> Result<(), ScoreLogError> {
        let needs_header = match std::fs::metadata(&self.path) {
            Ok(meta) => meta.len() == 0,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
            Err(e) => return Err(e.into()),
        };

        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        if needs_header {
            writeln!(file, "{}", CSV_HEADER)?;
        }
        writeln!(file, "{}", record.to_csv_row())?;

        log::info!(
            "Recorded score {} for {} ({}) in {}",
            record.score,
            record.name,
            record.mode.as_str(),
            self.path.display()
        );
        Ok(())
    }

    /// Read every well-formed row. A missing file is an empty log.
    pub fn load(&self) -> Result<Vec<ScoreRecord>, ScoreLogError> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        for (i, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() || (i == 0 && line.trim() == CSV_HEADER) {
                continue;
            }
            match ScoreRecord::from_csv_row(&line) {
                Some(record) => records.push(record),
                None => log::warn!("Skipping malformed score row {}: {:?}", i + 1, line),
            }
        }
        log::debug!("Loaded {} score rows from {}", records.len(), self.path.display());
        Ok(records)
    }
}

/// Top scores, sorted descending, plus the best row of every mode
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HighScores {
    pub entries: Vec<ScoreRecord>,
    best_by_mode: HashMap<Difficulty, ScoreRecord>,
}

impl HighScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rank a log. Ties keep log order, so the earlier run ranks higher.
    pub fn from_records(records: impl IntoIterator<Item = ScoreRecord>) -> Self {
        let mut entries: Vec<_> = records.into_iter().collect();
        entries.sort_by(|a, b| b.score.cmp(&a.score));

        // Per-mode bests come from the whole log, not just the top rows
        let mut best_by_mode = HashMap::new();
        for record in &entries {
            best_by_mode.entry(record.mode).or_insert_with(|| record.clone());
        }

        entries.truncate(MAX_HIGH_SCORES);
        Self { entries, best_by_mode }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Rank a score would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, score: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    /// Best entry for one mode, for the difficulty screen
    pub fn best_for(&self, mode: Difficulty) -> Option<&ScoreRecord> {
        self.best_by_mode.get(&mode)
    }
}
