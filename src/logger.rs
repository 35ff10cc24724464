//! Ambient statement-lifecycle logging (§9), grounded in the teacher's `QueryLogger`:
//! a value that accumulates row/affected counts over a statement's lifetime and emits
//! one `tracing` event when dropped, escalating level if the statement was slow.
//!
//! Simplified from the teacher's version: no dual `tracing`/`log` level bridging (this
//! crate depends only on `tracing`) and no SQL pretty-printing via `sqlformat` (not in
//! this crate's dependency set) — just the first few words of the statement, as a
//! summary, same as the teacher falls back to when the full text isn't logged.

use std::time::{Duration, Instant};

const SLOW_STATEMENT_THRESHOLD: Duration = Duration::from_secs(1);

pub(crate) struct StatementLogger {
    sql: String,
    rows_returned: u64,
    rows_affected: u64,
    start: Instant,
}

impl StatementLogger {
    pub(crate) fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            rows_returned: 0,
            rows_affected: 0,
            start: Instant::now(),
        }
    }

    pub(crate) fn increment_rows_returned(&mut self) {
        self.rows_returned += 1;
    }

    pub(crate) fn increase_rows_affected(&mut self, n: u64) {
        self.rows_affected += n;
    }

    fn summary(&self) -> String {
        self.sql.split_whitespace().take(4).collect::<Vec<_>>().join(" ")
    }
}

impl Drop for StatementLogger {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        let summary = self.summary();

        if elapsed >= SLOW_STATEMENT_THRESHOLD {
            tracing::warn!(
                target: "protocol::query",
                summary,
                rows_affected = self.rows_affected,
                rows_returned = self.rows_returned,
                elapsed = ?elapsed,
                "slow statement"
            );
        } else {
            tracing::debug!(
                target: "protocol::query",
                summary,
                rows_affected = self.rows_affected,
                rows_returned = self.rows_returned,
                elapsed = ?elapsed,
                "statement finished"
            );
        }
    }
}
