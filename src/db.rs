//! Direct writes against the bookmark service's own databases.
//!
//! The bridge does not own these files; the bookmark service and its workers
//! do. Every operation therefore opens its own connection, bounds its
//! lock-wait with `PRAGMA busy_timeout`, and takes the write lock up front
//! with `BEGIN IMMEDIATE` so no reader ever observes a half-applied attach.

use libsql::{Builder, Connection};
use std::path::{Path, PathBuf};

use crate::error::BridgeError;

pub const ASSET_TYPE_FULL_PAGE: &str = "fullPageArchive";
pub const ASSET_TYPE_PRECRAWLED: &str = "precrawledArchive";
pub const ASSET_TYPE_UNKNOWN: &str = "unknown";

/// Queues whose pending tasks would re-crawl a bookmark that just received a
/// fresh archive.
pub const RECRAWL_QUEUES: [&str; 2] = ["crawler_queue", "archive_queue"];

async fn open_connection(path: &Path, busy_timeout_ms: u64) -> Result<Connection, BridgeError> {
    let db = Builder::new_local(path).build().await?;
    let conn = db.connect()?;
    conn.query(&format!("PRAGMA busy_timeout = {}", busy_timeout_ms), ())
        .await?;
    Ok(conn)
}

/// Rows detached while making the new asset the canonical archive.
#[derive(Debug, Default)]
pub struct AttachOutcome {
    pub detached_precrawled: u64,
    pub detached_full_page: u64,
}

/// Writes to the bookmark service's primary database (`assets` table).
pub struct BookmarkStore {
    path: PathBuf,
    busy_timeout_ms: u64,
}

impl BookmarkStore {
    pub fn new(path: PathBuf, busy_timeout_ms: u64) -> Self {
        Self {
            path,
            busy_timeout_ms,
        }
    }

    /// Makes `asset_id` the bookmark's full-page archive in one transaction:
    /// stale precrawled archives are always detached (a leftover one crashes
    /// the upstream crawler), prior full-page archives are detached unless
    /// `keep_existing` is set, and the new row must update exactly once.
    pub async fn attach_full_page_archive(
        &self,
        bookmark_id: &str,
        asset_id: &str,
        keep_existing: bool,
    ) -> Result<AttachOutcome, BridgeError> {
        let conn = open_connection(&self.path, self.busy_timeout_ms).await?;

        conn.execute("BEGIN IMMEDIATE", ()).await?;
        let result = Self::attach_in_tx(&conn, bookmark_id, asset_id, keep_existing).await;
        match result {
            Ok(outcome) => {
                conn.execute("COMMIT", ()).await?;
                tracing::info!(
                    bookmark_id,
                    asset_id,
                    detached_precrawled = outcome.detached_precrawled,
                    detached_full_page = outcome.detached_full_page,
                    "attached full-page archive"
                );
                Ok(outcome)
            }
            Err(e) => {
                let _ = conn.execute("ROLLBACK", ()).await;
                Err(e)
            }
        }
    }

    async fn attach_in_tx(
        conn: &Connection,
        bookmark_id: &str,
        asset_id: &str,
        keep_existing: bool,
    ) -> Result<AttachOutcome, BridgeError> {
        let detached_precrawled = conn
            .execute(
                "UPDATE assets SET bookmarkId = NULL, assetType = ? WHERE bookmarkId = ? AND assetType = ?",
                libsql::params![ASSET_TYPE_UNKNOWN, bookmark_id, ASSET_TYPE_PRECRAWLED],
            )
            .await?;

        let detached_full_page = if keep_existing {
            0
        } else {
            conn.execute(
                "UPDATE assets SET bookmarkId = NULL, assetType = ? WHERE bookmarkId = ? AND assetType = ? AND id != ?",
                libsql::params![ASSET_TYPE_UNKNOWN, bookmark_id, ASSET_TYPE_FULL_PAGE, asset_id],
            )
            .await?
        };

        let updated = conn
            .execute(
                "UPDATE assets SET bookmarkId = ?, assetType = ? WHERE id = ?",
                libsql::params![bookmark_id, ASSET_TYPE_FULL_PAGE, asset_id],
            )
            .await?;
        if updated != 1 {
            return Err(BridgeError::Attach {
                bookmark_id: bookmark_id.to_string(),
                asset_id: asset_id.to_string(),
                reason: format!("expected to update exactly one asset row, updated {}", updated),
            });
        }

        Ok(AttachOutcome {
            detached_precrawled,
            detached_full_page,
        })
    }
}

/// Deletes stale re-crawl tasks from the bookmark service's background queue
/// store. The store is optional; a missing file means nothing to clean.
pub struct QueueStore {
    path: Option<PathBuf>,
    busy_timeout_ms: u64,
}

impl QueueStore {
    pub fn new(path: Option<PathBuf>, busy_timeout_ms: u64) -> Self {
        Self {
            path,
            busy_timeout_ms,
        }
    }

    /// Removes tasks in [`RECRAWL_QUEUES`] whose payload references the
    /// bookmark. Tries a structured payload-field match first and falls back
    /// to a substring match when the engine cannot evaluate it (older
    /// schemas without JSON support). Returns the number removed.
    pub async fn remove_recrawl_tasks(&self, bookmark_id: &str) -> Result<u64, BridgeError> {
        let Some(path) = &self.path else {
            return Ok(0);
        };
        if !path.exists() {
            tracing::debug!(path = %path.display(), "queue store absent, skipping cleanup");
            return Ok(0);
        }

        let conn = open_connection(path, self.busy_timeout_ms).await?;
        match Self::delete_structured(&conn, bookmark_id).await {
            Ok(removed) => Ok(removed),
            Err(e @ BridgeError::Busy(_)) => Err(e),
            Err(e) => {
                tracing::warn!(
                    bookmark_id,
                    error = %e,
                    "structured queue cleanup failed, falling back to substring match"
                );
                Self::delete_substring(&conn, bookmark_id).await
            }
        }
    }

    async fn delete_structured(
        conn: &Connection,
        bookmark_id: &str,
    ) -> Result<u64, BridgeError> {
        let removed = conn
            .execute(
                "DELETE FROM tasks_table
                 WHERE queue IN (?, ?) AND json_extract(payload, '$.bookmarkId') = ?",
                libsql::params![RECRAWL_QUEUES[0], RECRAWL_QUEUES[1], bookmark_id],
            )
            .await?;
        Ok(removed)
    }

    async fn delete_substring(
        conn: &Connection,
        bookmark_id: &str,
    ) -> Result<u64, BridgeError> {
        let removed = conn
            .execute(
                "DELETE FROM tasks_table
                 WHERE queue IN (?, ?) AND payload LIKE '%' || ? || '%'",
                libsql::params![RECRAWL_QUEUES[0], RECRAWL_QUEUES[1], bookmark_id],
            )
            .await?;
        Ok(removed)
    }
}
