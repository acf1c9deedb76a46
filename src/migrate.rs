//! Schema migrations for the listings catalog.
//!
//! Everything the catalog needs lives in one SQLite file: the `listings`
//! table (source of truth), the `listings_fts` full-text index, and the
//! three triggers that keep the index in lockstep with the table.
//!
//! # Index synchronization
//!
//! `listings_fts` is an external-content FTS5 table over the text-bearing
//! columns of `listings`. It is maintained exclusively by triggers, so every
//! write path — imports, upvotes, moderation, hard deletes — stays consistent
//! with search inside the same transaction, with no application code involved.
//! The update trigger fires only for the indexed text columns; counter and
//! score writes never touch the index.
//!
//! # Schema ownership
//!
//! This module is the only place schema objects are created. FTS virtual
//! tables and triggers are invisible to generic schema-diff tools; pointing
//! one at this database would drop the index and its triggers, so all schema
//! changes must go through `tooldex init`.

use anyhow::Result;
use sqlx::SqlitePool;

use crate::config::Config;
use crate::db;

pub async fn run_migrations(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    apply_schema(&pool).await?;
    pool.close().await;
    Ok(())
}

/// Apply the full schema to an open pool. Idempotent.
pub async fn apply_schema(pool: &SqlitePool) -> Result<()> {
    // Source-of-truth listings table. The hype_* pair is derived state,
    // written only by the rescore job.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS listings (
            id TEXT PRIMARY KEY,
            slug TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            tagline TEXT,
            description TEXT NOT NULL DEFAULT '',
            category TEXT NOT NULL,
            tags_json TEXT NOT NULL DEFAULT '[]',
            source_url TEXT,
            submitted_by TEXT,
            stars INTEGER NOT NULL DEFAULT 0,
            downloads INTEGER NOT NULL DEFAULT 0,
            upvotes INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL,
            updated_at INTEGER,
            dead_link INTEGER NOT NULL DEFAULT 0,
            hype_score INTEGER NOT NULL DEFAULT 0,
            hype_updated_at INTEGER
        )
        "#,
    )
    .execute(pool)
    .await?;

    // FTS5 virtual table over the searchable listing columns.
    // FTS5 CREATE is not idempotent natively, so we check first.
    let fts_exists: bool = sqlx::query_scalar(
        "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='listings_fts'",
    )
    .fetch_one(pool)
    .await?;

    if !fts_exists {
        sqlx::query(
            r#"
            CREATE VIRTUAL TABLE listings_fts USING fts5(
                name,
                tagline,
                description,
                category,
                content='listings',
                content_rowid='rowid'
            )
            "#,
        )
        .execute(pool)
        .await?;
    }

    // Sync triggers. The AFTER UPDATE trigger is scoped to the indexed text
    // columns so that signal writes (stars, downloads, upvotes) and the
    // rescore job's hype writes leave the index untouched.
    sqlx::query(
        r#"
        CREATE TRIGGER IF NOT EXISTS listings_ai AFTER INSERT ON listings BEGIN
            INSERT INTO listings_fts(rowid, name, tagline, description, category)
            VALUES (new.rowid, new.name, new.tagline, new.description, new.category);
        END
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TRIGGER IF NOT EXISTS listings_au
        AFTER UPDATE OF name, tagline, description, category ON listings BEGIN
            INSERT INTO listings_fts(listings_fts, rowid, name, tagline, description, category)
            VALUES ('delete', old.rowid, old.name, old.tagline, old.description, old.category);
            INSERT INTO listings_fts(rowid, name, tagline, description, category)
            VALUES (new.rowid, new.name, new.tagline, new.description, new.category);
        END
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TRIGGER IF NOT EXISTS listings_ad AFTER DELETE ON listings BEGIN
            INSERT INTO listings_fts(listings_fts, rowid, name, tagline, description, category)
            VALUES ('delete', old.rowid, old.name, old.tagline, old.description, old.category);
        END
        "#,
    )
    .execute(pool)
    .await?;

    // Secondary indexes for the common read paths
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_listings_category ON listings(category)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_listings_dead_link ON listings(dead_link)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_listings_hype_score ON listings(hype_score DESC)")
        .execute(pool)
        .await?;

    Ok(())
}
