// Pattern store schema. Run once per connection by PatternStore.
// Every statement is idempotent; append new tables or indexes at the end
// instead of editing existing DDL.

use crate::errors::Result;
use rusqlite::Connection;
use tracing::debug;

pub(crate) fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS conversations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_input TEXT NOT NULL,
            emotion TEXT NOT NULL,
            response TEXT NOT NULL,
            next_emotion TEXT NOT NULL,
            reward REAL NOT NULL,
            language TEXT NOT NULL,
            timestamp TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_conversations_emotion_language
            ON conversations(emotion, language);

        CREATE INDEX IF NOT EXISTS idx_conversations_transition
            ON conversations(emotion, next_emotion, language);

        CREATE TABLE IF NOT EXISTS emotion_patterns (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            emotion_sequence TEXT NOT NULL,
            successful_responses TEXT NOT NULL DEFAULT '[]',
            avg_reward REAL NOT NULL,
            count INTEGER NOT NULL,
            language TEXT NOT NULL,
            UNIQUE (emotion_sequence, language)
        );

        CREATE INDEX IF NOT EXISTS idx_patterns_sequence
            ON emotion_patterns(emotion_sequence);
        ",
    )?;

    debug!("pattern store schema ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'
                 AND name IN ('conversations', 'emotion_patterns')",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(tables, 2);
    }
}
