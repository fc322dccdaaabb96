use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;

/// The best score across runs, kept as a single integer in a text file.
#[derive(Debug, Clone)]
pub struct HighScoreStore {
    path: PathBuf,
}

impl HighScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn try_load(&self) -> Result<u32, HighScoreError> {
        let text = fs::read_to_string(&self.path).map_err(|source| HighScoreError::Read {
            path: self.path.clone(),
            source,
        })?;
        let trimmed = text.trim();
        trimmed
            .parse::<u32>()
            .map_err(|_| HighScoreError::Malformed {
                path: self.path.clone(),
                content: trimmed.chars().take(32).collect(),
            })
    }

    /// Never fails: an unreadable or garbled file counts as zero.
    pub fn load(&self) -> u32 {
        match self.try_load() {
            Ok(score) => score,
            Err(err) => {
                tracing::warn!("high score unavailable, using 0: {err}");
                0
            }
        }
    }

    /// Writes `score` only if it beats the stored value. Returns the best
    /// score after the comparison.
    pub fn record(&self, score: u32) -> Result<u32, HighScoreError> {
        let best = self.load();
        if score <= best {
            return Ok(best);
        }
        self.save(score)?;
        tracing::info!(previous = best, score, "new high score");
        Ok(score)
    }

    fn save(&self, score: u32) -> Result<(), HighScoreError> {
        let write_err = |source| HighScoreError::Write {
            path: self.path.clone(),
            source,
        };
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, score.to_string()).map_err(write_err)?;
        fs::rename(&tmp, &self.path).map_err(write_err)
    }
}

#[derive(Debug)]
pub enum HighScoreError {
    Read { path: PathBuf, source: io::Error },
    Malformed { path: PathBuf, content: String },
    Write { path: PathBuf, source: io::Error },
}

impl fmt::Display for HighScoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "cannot read {}: {source}", path.display())
            }
            Self::Malformed { path, content } => {
                write!(f, "{} does not hold a score: {content:?}", path.display())
            }
            Self::Write { path, source } => {
                write!(f, "cannot write {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for HighScoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { source, .. } | Self::Write { source, .. } => Some(source),
            Self::Malformed { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reads_as_zero() {
        let dir = tempfile::tempdir().unwrap();
        let store = HighScoreStore::new(dir.path().join("highscore"));
        assert!(matches!(store.try_load(), Err(HighScoreError::Read { .. })));
        assert_eq!(store.load(), 0);
    }

    #[test]
    fn malformed_file_reads_as_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("highscore");
        fs::write(&path, "twelve").unwrap();
        let store = HighScoreStore::new(&path);
        assert!(matches!(
            store.try_load(),
            Err(HighScoreError::Malformed { .. })
        ));
        assert_eq!(store.load(), 0);
    }

    #[test]
    fn tolerates_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("highscore");
        fs::write(&path, "42\n").unwrap();
        assert_eq!(HighScoreStore::new(&path).load(), 42);
    }

    #[test]
    fn record_only_writes_improvements() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("highscore");
        fs::write(&path, "10").unwrap();
        let store = HighScoreStore::new(&path);

        assert_eq!(store.record(15).unwrap(), 15);
        assert_eq!(fs::read_to_string(&path).unwrap(), "15");
        assert_eq!(store.record(5).unwrap(), 15);
        assert_eq!(store.record(15).unwrap(), 15);
        assert_eq!(store.load(), 15);
    }

    #[test]
    fn record_creates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = HighScoreStore::new(dir.path().join("highscore"));
        assert_eq!(store.record(3).unwrap(), 3);
        assert_eq!(store.load(), 3);
    }

    #[test]
    fn unwritable_location_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = HighScoreStore::new(dir.path().join("no-such-dir").join("highscore"));
        let err = store.record(7).unwrap_err();
        assert!(matches!(err, HighScoreError::Write { .. }));
    }
}
