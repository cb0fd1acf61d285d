//! Pattern store: SQLite persistence for interactions and emotion patterns
//!
//! Two tables:
//!   conversations     append-only interaction log
//!   emotion_patterns  one rolling aggregate per (sequence, language)
//!
//! The connection sits behind a mutex and every write that folds into a
//! pattern runs in an IMMEDIATE transaction, so concurrent writers (threads
//! sharing this store, or other connections to the same file) cannot lose
//! updates to `avg_reward`, `count` or `successful_responses`.

pub mod responses;
pub mod retry;
mod schema;
pub mod types;

pub use responses::{ResponseSet, MAX_SUCCESSFUL_RESPONSES};
pub use retry::RetryPolicy;
pub use types::{EmotionPattern, Interaction, MemoryStats, TransitionCount};

use crate::emotion::{sequence_key, Emotion, Language};
use crate::errors::{AgentError, Result};
use crate::reward::ScoredInteraction;
use chrono::{DateTime, SecondsFormat, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// How long SQLite itself waits on a locked database before reporting busy
const BUSY_TIMEOUT: Duration = Duration::from_secs(2);

/// Number of patterns reported in statistics
const TOP_TRANSITIONS: usize = 5;

const INTERACTION_COLUMNS: &str =
    "id, user_input, emotion, response, next_emotion, reward, language, timestamp";

const PATTERN_COLUMNS: &str =
    "id, emotion_sequence, successful_responses, avg_reward, count, language";

/// Thread-safe store wrapper
pub struct PatternStore {
    conn: Mutex<Connection>,
    retry: RetryPolicy,
    path: Option<PathBuf>,
}

impl PatternStore {
    /// Open (or create) the store at `path` and initialize tables
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        info!(path = %path.display(), "opening pattern store");
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;").ok();

        Self::from_connection(conn, Some(path.to_path_buf()))
    }

    /// Private in-memory store, used by tests and dry runs
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?, None)
    }

    fn from_connection(conn: Connection, path: Option<PathBuf>) -> Result<Self> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        schema::run_migrations(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
            retry: RetryPolicy::default(),
            path,
        })
    }

    /// Replace the retry policy used around writes
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Database file, `None` for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[cfg(test)]
    pub(crate) fn conn_for_tests(&self) -> parking_lot::MutexGuard<'_, Connection> {
        self.conn.lock()
    }

    // ── Writes ────────────────────────────────────────────────────────

    /// Append an interaction and fold it into its pattern as one unit of work
    pub fn insert_interaction(&self, record: &ScoredInteraction) -> Result<Interaction> {
        self.retry.run(|| {
            let mut conn = self.conn.lock();
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

            let stored = Self::append_interaction(&tx, record)?;
            Self::fold_pattern(&tx, record)?;

            tx.commit()?;
            Ok(stored)
        })
    }

    fn append_interaction(tx: &Transaction<'_>, record: &ScoredInteraction) -> Result<Interaction> {
        let draft = record.interaction();
        let timestamp = format_timestamp(&draft.timestamp);

        tx.execute(
            "INSERT INTO conversations
                (user_input, emotion, response, next_emotion, reward, language, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                draft.user_input,
                draft.emotion.as_str(),
                draft.response,
                draft.next_emotion.as_str(),
                record.reward(),
                draft.language.as_str(),
                timestamp,
            ],
        )?;

        Ok(Interaction {
            id: tx.last_insert_rowid(),
            user_input: draft.user_input.clone(),
            emotion: draft.emotion,
            response: draft.response.clone(),
            next_emotion: draft.next_emotion,
            reward: record.reward(),
            language: draft.language,
            timestamp: draft.timestamp,
        })
    }

    /// Create the pattern on first sight, otherwise update the running mean,
    /// the count and the response set in place.
    fn fold_pattern(tx: &Transaction<'_>, record: &ScoredInteraction) -> Result<()> {
        let draft = record.interaction();
        let reward = record.reward();
        let sequence = sequence_key(draft.emotion, draft.next_emotion);
        let language = draft.language.as_str();

        let existing = tx
            .query_row(
                "SELECT id, successful_responses, avg_reward, count
                 FROM emotion_patterns
                 WHERE emotion_sequence = ?1 AND language = ?2",
                params![sequence, language],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, f64>(2)?,
                        row.get::<_, i64>(3)?,
                    ))
                },
            )
            .optional()?;

        match existing {
            Some((id, responses_json, avg_reward, count)) => {
                let mut responses = ResponseSet::from_json(&responses_json)?;
                if reward > 0.0 {
                    responses.insert(draft.response.clone());
                }

                let new_avg = (avg_reward * count as f64 + reward) / (count + 1) as f64;

                tx.execute(
                    "UPDATE emotion_patterns
                     SET successful_responses = ?1, avg_reward = ?2, count = ?3
                     WHERE id = ?4",
                    params![responses.to_json()?, new_avg, count + 1, id],
                )?;
                debug!(%sequence, language, count = count + 1, avg_reward = new_avg, "pattern updated");
            }
            None => {
                let mut responses = ResponseSet::new();
                if reward > 0.0 {
                    responses.insert(draft.response.clone());
                }

                tx.execute(
                    "INSERT INTO emotion_patterns
                        (emotion_sequence, successful_responses, avg_reward, count, language)
                     VALUES (?1, ?2, ?3, 1, ?4)",
                    params![sequence, responses.to_json()?, reward, language],
                )?;
                debug!(%sequence, language, avg_reward = reward, "pattern created");
            }
        }

        Ok(())
    }

    /// Delete every interaction and pattern. Safe on an empty store.
    pub fn reset(&self) -> Result<()> {
        self.retry.run(|| {
            let mut conn = self.conn.lock();
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            tx.execute("DELETE FROM conversations", [])?;
            tx.execute("DELETE FROM emotion_patterns", [])?;
            tx.commit()?;
            Ok(())
        })?;

        info!("pattern store reset");
        Ok(())
    }

    // ── Reads ─────────────────────────────────────────────────────────

    pub fn statistics(&self) -> Result<MemoryStats> {
        let conn = self.conn.lock();

        let total: i64 = conn.query_row("SELECT COUNT(*) FROM conversations", [], |r| r.get(0))?;
        let positive: i64 = conn.query_row(
            "SELECT COUNT(*) FROM conversations WHERE reward > 0",
            [],
            |r| r.get(0),
        )?;
        let average_reward: f64 = conn.query_row(
            "SELECT COALESCE(AVG(reward), 0.0) FROM conversations",
            [],
            |r| r.get(0),
        )?;
        let patterns: i64 =
            conn.query_row("SELECT COUNT(*) FROM emotion_patterns", [], |r| r.get(0))?;

        let mut stmt = conn.prepare(
            "SELECT emotion_sequence, language, count
             FROM emotion_patterns
             ORDER BY count DESC, id ASC
             LIMIT ?1",
        )?;
        let top_transitions = stmt
            .query_map(params![TOP_TRANSITIONS as i64], |row| {
                Ok(TransitionCount {
                    sequence: row.get(0)?,
                    language: Language::from(row.get::<_, String>(1)?.as_str()),
                    count: row.get::<_, i64>(2)? as u64,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let success_rate = if total > 0 {
            positive as f64 * 100.0 / total as f64
        } else {
            0.0
        };

        Ok(MemoryStats {
            total_interactions: total as u64,
            average_reward,
            patterns_learned: patterns as u64,
            top_transitions,
            success_rate,
        })
    }

    /// Patterns for a language, most frequent first, then best rewarded
    pub fn top_patterns(&self, language: Language, limit: usize) -> Result<Vec<EmotionPattern>> {
        let conn = self.conn.lock();
        let sql = format!(
            "SELECT {} FROM emotion_patterns
             WHERE language = ?1
             ORDER BY count DESC, avg_reward DESC, id ASC
             LIMIT ?2",
            PATTERN_COLUMNS
        );

        let mut stmt = conn.prepare(&sql)?;
        let patterns = stmt
            .query_map(params![language.as_str(), limit as i64], pattern_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(patterns)
    }

    /// The pattern for one transition in one language
    pub fn pattern(&self, from: Emotion, to: Emotion, language: Language) -> Result<Option<EmotionPattern>> {
        let conn = self.conn.lock();
        let sql = format!(
            "SELECT {} FROM emotion_patterns
             WHERE emotion_sequence = ?1 AND language = ?2",
            PATTERN_COLUMNS
        );

        let pattern = conn
            .query_row(
                &sql,
                params![sequence_key(from, to), language.as_str()],
                pattern_from_row,
            )
            .optional()?;
        Ok(pattern)
    }

    /// Interactions starting from `emotion` in `language`,
    /// best reward first, then most recent.
    pub fn interactions_for(&self, emotion: Emotion, language: Language, limit: usize) -> Result<Vec<Interaction>> {
        let conn = self.conn.lock();
        let sql = format!(
            "SELECT {} FROM conversations
             WHERE emotion = ?1 AND language = ?2
             ORDER BY reward DESC, timestamp DESC, id DESC
             LIMIT ?3",
            INTERACTION_COLUMNS
        );

        let mut stmt = conn.prepare(&sql)?;
        let interactions = stmt
            .query_map(
                params![emotion.as_str(), language.as_str(), limit as i64],
                interaction_from_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(interactions)
    }

    /// Distinct responses of positively rewarded interactions for one exact
    /// transition, best reward first, then most recent.
    pub fn positive_responses(
        &self,
        emotion: Emotion,
        next_emotion: Emotion,
        language: Language,
        limit: usize,
    ) -> Result<Vec<String>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT response, MAX(reward) AS best, MAX(id) AS latest
             FROM conversations
             WHERE emotion = ?1 AND next_emotion = ?2 AND language = ?3 AND reward > 0
             GROUP BY response
             ORDER BY best DESC, latest DESC
             LIMIT ?4",
        )?;

        let responses = stmt
            .query_map(
                params![
                    emotion.as_str(),
                    next_emotion.as_str(),
                    language.as_str(),
                    limit as i64
                ],
                |row| row.get::<_, String>(0),
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(responses)
    }
}

/// Fixed-width RFC 3339 so text order matches time order
fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn conversion_error<E>(column: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(err))
}

fn interaction_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Interaction> {
    let timestamp: String = row.get(7)?;
    let timestamp = DateTime::parse_from_rfc3339(&timestamp)
        .map_err(|e| conversion_error(7, e))?
        .with_timezone(&Utc);

    Ok(Interaction {
        id: row.get(0)?,
        user_input: row.get(1)?,
        emotion: Emotion::from_label(&row.get::<_, String>(2)?),
        response: row.get(3)?,
        next_emotion: Emotion::from_label(&row.get::<_, String>(4)?),
        reward: row.get(5)?,
        language: Language::from(row.get::<_, String>(6)?.as_str()),
        timestamp,
    })
}

fn pattern_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<EmotionPattern> {
    let sequence: String = row.get(1)?;
    let (from, to) = match sequence.split_once("->") {
        Some((from, to)) => (Emotion::from_label(from), Emotion::from_label(to)),
        None => {
            return Err(conversion_error(
                1,
                AgentError::CorruptRecord {
                    table: "emotion_patterns".to_string(),
                    reason: format!("malformed sequence '{}'", sequence),
                },
            ))
        }
    };

    let responses_json: String = row.get(2)?;
    let successful_responses =
        ResponseSet::from_json(&responses_json).map_err(|e| conversion_error(2, e))?;

    Ok(EmotionPattern {
        id: row.get(0)?,
        sequence,
        from,
        to,
        language: Language::from(row.get::<_, String>(5)?.as_str()),
        successful_responses,
        avg_reward: row.get(3)?,
        count: row.get::<_, i64>(4)? as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reward::{NewInteraction, RewardModel};

    fn scored(input: &str, from: Emotion, response: &str, to: Emotion) -> ScoredInteraction {
        RewardModel::new().score(NewInteraction::new(input, from, response, to, Language::English))
    }

    #[test]
    fn test_insert_creates_pattern() {
        let store = PatternStore::open_in_memory().unwrap();
        let stored = store
            .insert_interaction(&scored("I feel better", Emotion::Sad, "Great!", Emotion::Happy))
            .unwrap();
        assert_eq!(stored.reward, 0.8);

        let pattern = store
            .pattern(Emotion::Sad, Emotion::Happy, Language::English)
            .unwrap()
            .unwrap();
        assert_eq!(pattern.sequence, "sad->happy");
        assert_eq!(pattern.count, 1);
        assert_eq!(pattern.successful_responses.first(5), vec!["Great!"]);
    }

    #[test]
    fn test_negative_reward_not_remembered_as_success() {
        let store = PatternStore::open_in_memory().unwrap();
        store
            .insert_interaction(&scored("hm", Emotion::Happy, "Whatever.", Emotion::Angry))
            .unwrap();

        let pattern = store
            .pattern(Emotion::Happy, Emotion::Angry, Language::English)
            .unwrap()
            .unwrap();
        assert!(pattern.successful_responses.is_empty());
        assert!((pattern.avg_reward + 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_running_mean_and_count() {
        let store = PatternStore::open_in_memory().unwrap();
        for i in 0..4 {
            store
                .insert_interaction(&scored(&format!("q{}", i), Emotion::Neutral, "ok", Emotion::Neutral))
                .unwrap();
        }

        let pattern = store
            .pattern(Emotion::Neutral, Emotion::Neutral, Language::English)
            .unwrap()
            .unwrap();
        assert_eq!(pattern.count, 4);
        assert!((pattern.avg_reward - 0.1).abs() < 1e-9);
        assert_eq!(pattern.successful_responses.len(), 1);
    }

    #[test]
    fn test_statistics_empty_store() {
        let store = PatternStore::open_in_memory().unwrap();
        let stats = store.statistics().unwrap();
        assert_eq!(stats, MemoryStats::default());
    }

    #[test]
    fn test_statistics_success_rate() {
        let store = PatternStore::open_in_memory().unwrap();
        store
            .insert_interaction(&scored("a", Emotion::Sad, "r1", Emotion::Happy))
            .unwrap();
        store
            .insert_interaction(&scored("b", Emotion::Happy, "r2", Emotion::Sad))
            .unwrap();

        let stats = store.statistics().unwrap();
        assert_eq!(stats.total_interactions, 2);
        assert_eq!(stats.patterns_learned, 2);
        assert!((stats.success_rate - 50.0).abs() < 1e-9);
        assert!((stats.average_reward - 0.05).abs() < 1e-9);
        assert_eq!(stats.top_transitions.len(), 2);
        // equal counts keep insertion order
        assert_eq!(stats.top_transitions[0].sequence, "sad->happy");
    }

    #[test]
    fn test_top_patterns_order_and_language_filter() {
        let store = PatternStore::open_in_memory().unwrap();
        let model = RewardModel::new();

        // inserted worst-first so row order cannot satisfy the ordering
        store
            .insert_interaction(&scored("a", Emotion::Happy, "r1", Emotion::Angry))
            .unwrap();
        store
            .insert_interaction(&scored("b", Emotion::Angry, "r2", Emotion::Happy))
            .unwrap();
        for i in 0..2 {
            store
                .insert_interaction(&scored(&format!("c{}", i), Emotion::Sad, "r3", Emotion::Sad))
                .unwrap();
        }
        for i in 0..3 {
            store
                .insert_interaction(&model.score(NewInteraction::new(
                    format!("d{}", i),
                    Emotion::Sad,
                    "Fikar na karein.",
                    Emotion::Happy,
                    Language::Urdu,
                )))
                .unwrap();
        }

        let top: Vec<(String, u64)> = store
            .top_patterns(Language::English, 10)
            .unwrap()
            .into_iter()
            .map(|p| (p.sequence, p.count))
            .collect();
        assert_eq!(
            top,
            vec![
                ("sad->sad".to_string(), 2),
                ("angry->happy".to_string(), 1),
                ("happy->angry".to_string(), 1),
            ]
        );

        let limited = store.top_patterns(Language::English, 2).unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[1].sequence, "angry->happy");
        assert!((limited[1].avg_reward - 0.9).abs() < 1e-9);

        let urdu = store.top_patterns(Language::Urdu, 10).unwrap();
        assert_eq!(urdu.len(), 1);
        assert_eq!(urdu[0].sequence, "sad->happy");
        assert_eq!(urdu[0].count, 3);
        assert!(store.top_patterns(Language::Hindi, 10).unwrap().is_empty());
    }

    #[test]
    fn test_reset_is_idempotent() {
        let store = PatternStore::open_in_memory().unwrap();
        store.reset().unwrap();
        store
            .insert_interaction(&scored("a", Emotion::Sad, "r1", Emotion::Happy))
            .unwrap();
        store.reset().unwrap();
        store.reset().unwrap();
        assert_eq!(store.statistics().unwrap(), MemoryStats::default());
    }

    #[test]
    fn test_positive_responses_are_distinct() {
        let store = PatternStore::open_in_memory().unwrap();
        for _ in 0..3 {
            store
                .insert_interaction(&scored("a", Emotion::Angry, "Breathe.", Emotion::Neutral))
                .unwrap();
        }
        store
            .insert_interaction(&scored("b", Emotion::Angry, "Let's talk.", Emotion::Neutral))
            .unwrap();

        let responses = store
            .positive_responses(Emotion::Angry, Emotion::Neutral, Language::English, 5)
            .unwrap();
        assert_eq!(responses, vec!["Let's talk.", "Breathe."]);
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("memory.db");
        let store = PatternStore::open(&path).unwrap();
        assert!(path.exists());
        assert_eq!(store.path(), Some(path.as_path()));
    }
}
