//! Batch hype score recompute.
//!
//! Reads the raw popularity signals of every active listing, runs the score
//! engine over them, and writes the results back in a single transaction.
//! Readers see either the previous pass or the new one, never a mix, and an
//! interrupted run leaves the previous scores fully intact.
//!
//! This job is the only writer of `hype_score` and `hype_updated_at`. It
//! never touches the raw signal columns, so it cannot race with the upvote
//! path or scraper imports that write to the same rows concurrently. Dead
//! listings are skipped entirely and keep their last-known score; a
//! resurrected link picks up a fresh score on the next pass without any
//! special casing.
//!
//! The job holds no state between runs and does not retry internally.
//! Failures surface as a non-zero exit for the invoking scheduler to handle.

use anyhow::Result;
use sqlx::sqlite::Sqlite;
use sqlx::{Row, SqlitePool, Transaction};

use crate::config::Config;
use crate::db;
use crate::models::{ListingSignals, ScoredListing};
use crate::score;

pub async fn run_rescore(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    let now = chrono::Utc::now().timestamp();

    let signals = fetch_active_signals(&pool).await?;
    if signals.is_empty() {
        println!("rescore");
        println!("  no active listings to score");
        println!("ok");
        pool.close().await;
        return Ok(());
    }

    let scored = score_all(&signals, now);
    write_hype_scores(&pool, &scored, now).await?;

    print_summary(&scored, config.rescore.top_n);

    pool.close().await;
    Ok(())
}

/// Read the signal columns of every listing that isn't marked dead.
pub async fn fetch_active_signals(pool: &SqlitePool) -> Result<Vec<ListingSignals>> {
    let rows = sqlx::query(
        r#"
        SELECT id, name, stars, downloads, upvotes, updated_at
        FROM listings
        WHERE dead_link = 0
        "#,
    )
    .fetch_all(pool)
    .await?;

    let signals = rows
        .iter()
        .map(|row| ListingSignals {
            id: row.get("id"),
            name: row.get("name"),
            stars: row.get("stars"),
            downloads: row.get("downloads"),
            upvotes: row.get("upvotes"),
            updated_at: row.get("updated_at"),
        })
        .collect();

    Ok(signals)
}

/// Score every listing independently. Pure; order has no effect on results.
pub fn score_all(signals: &[ListingSignals], now: i64) -> Vec<ScoredListing> {
    signals
        .iter()
        .map(|s| ScoredListing {
            id: s.id.clone(),
            name: s.name.clone(),
            hype_score: score::composite_score(s.stars, s.downloads, s.upvotes, s.updated_at, now),
        })
        .collect()
}

/// Commit all `(hype_score, hype_updated_at)` pairs in one transaction.
///
/// This is the narrow write path for the two derived columns: nothing else
/// in the codebase updates them, and this function updates nothing else.
pub async fn write_hype_scores(
    pool: &SqlitePool,
    scored: &[ScoredListing],
    now: i64,
) -> Result<()> {
    let mut tx = pool.begin().await?;
    stage_hype_scores(&mut tx, scored, now).await?;
    tx.commit().await?;
    Ok(())
}

/// Stage the hype updates on an open transaction without committing.
///
/// Split out from [`write_hype_scores`] so the rollback path is testable:
/// dropping the transaction after staging must leave every score unchanged.
pub async fn stage_hype_scores(
    tx: &mut Transaction<'_, Sqlite>,
    scored: &[ScoredListing],
    now: i64,
) -> Result<()> {
    for s in scored {
        sqlx::query("UPDATE listings SET hype_score = ?, hype_updated_at = ? WHERE id = ?")
            .bind(s.hype_score)
            .bind(now)
            .bind(&s.id)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

fn print_summary(scored: &[ScoredListing], top_n: usize) {
    let total = scored.len();
    let nonzero = scored.iter().filter(|s| s.hype_score > 0).count();
    let sum: i64 = scored.iter().map(|s| s.hype_score).sum();
    let avg = sum as f64 / total as f64;
    let max = scored.iter().map(|s| s.hype_score).max().unwrap_or(0);

    let mut top: Vec<&ScoredListing> = scored.iter().collect();
    top.sort_by(|a, b| b.hype_score.cmp(&a.hype_score).then(a.name.cmp(&b.name)));
    top.truncate(top_n);

    println!("rescore");
    println!("  listings scored: {}", total);
    println!("  scored > 0: {}", nonzero);
    println!("  average score: {:.1}", avg);
    println!("  max score: {}", max);
    println!("  top {}:", top.len());
    for (i, s) in top.iter().enumerate() {
        println!("    {}. [{:>3}] {}", i + 1, s.hype_score, s.name);
    }
    println!("ok");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrate;
    use sqlx::sqlite::SqlitePoolOptions;

    const DAY: i64 = 86_400;
    const NOW: i64 = 1_700_000_000;

    async fn memory_pool() -> SqlitePool {
        // A single connection keeps every query on the same in-memory db.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        migrate::apply_schema(&pool).await.unwrap();
        pool
    }

    async fn insert_listing(
        pool: &SqlitePool,
        slug: &str,
        stars: i64,
        downloads: i64,
        upvotes: i64,
        updated_at: Option<i64>,
        dead: bool,
    ) {
        sqlx::query(
            r#"
            INSERT INTO listings
                (id, slug, name, description, category, stars, downloads, upvotes,
                 created_at, updated_at, dead_link)
            VALUES (?, ?, ?, '', 'developer-tool', ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(format!("id-{}", slug))
        .bind(slug)
        .bind(slug)
        .bind(stars)
        .bind(downloads)
        .bind(upvotes)
        .bind(NOW - 90 * DAY)
        .bind(updated_at)
        .bind(dead as i64)
        .execute(pool)
        .await
        .unwrap();
    }

    async fn hype_of(pool: &SqlitePool, slug: &str) -> (i64, Option<i64>) {
        let row = sqlx::query("SELECT hype_score, hype_updated_at FROM listings WHERE slug = ?")
            .bind(slug)
            .fetch_one(pool)
            .await
            .unwrap();
        (row.get("hype_score"), row.get("hype_updated_at"))
    }

    #[tokio::test]
    async fn test_rescore_writes_expected_scores() {
        let pool = memory_pool().await;
        insert_listing(&pool, "alpha", 1_000, 50_000, 10, Some(NOW - 5 * DAY), false).await;
        insert_listing(&pool, "beta", 0, 0, 0, Some(NOW), false).await;

        let signals = fetch_active_signals(&pool).await.unwrap();
        let scored = score_all(&signals, NOW);
        write_hype_scores(&pool, &scored, NOW).await.unwrap();

        assert_eq!(hype_of(&pool, "alpha").await, (62, Some(NOW)));
        assert_eq!(hype_of(&pool, "beta").await, (25, Some(NOW)));
    }

    #[tokio::test]
    async fn test_rescore_skips_dead_listings() {
        let pool = memory_pool().await;
        insert_listing(&pool, "alive", 100, 0, 0, Some(NOW), false).await;
        insert_listing(&pool, "dead", 100_000, 1_000_000, 50, Some(NOW), true).await;

        let signals = fetch_active_signals(&pool).await.unwrap();
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].id, "id-alive");

        let scored = score_all(&signals, NOW);
        write_hype_scores(&pool, &scored, NOW).await.unwrap();

        // Dead listing keeps whatever score it had (zero here), untouched.
        assert_eq!(hype_of(&pool, "dead").await, (0, None));
    }

    #[tokio::test]
    async fn test_rescore_idempotent() {
        let pool = memory_pool().await;
        insert_listing(&pool, "alpha", 4_321, 98_765, 7, Some(NOW - 12 * DAY), false).await;

        let signals = fetch_active_signals(&pool).await.unwrap();
        let first = score_all(&signals, NOW);
        write_hype_scores(&pool, &first, NOW).await.unwrap();
        let (score1, _) = hype_of(&pool, "alpha").await;

        // No signal changes in between: second pass must reproduce the score.
        let signals = fetch_active_signals(&pool).await.unwrap();
        let second = score_all(&signals, NOW);
        write_hype_scores(&pool, &second, NOW + 60).await.unwrap();
        let (score2, ts2) = hype_of(&pool, "alpha").await;

        assert_eq!(score1, score2);
        assert_eq!(ts2, Some(NOW + 60));
    }

    #[tokio::test]
    async fn test_rescore_never_touches_signal_columns() {
        let pool = memory_pool().await;
        insert_listing(&pool, "alpha", 55, 66, 7, Some(NOW - DAY), false).await;

        let signals = fetch_active_signals(&pool).await.unwrap();
        let scored = score_all(&signals, NOW);
        write_hype_scores(&pool, &scored, NOW).await.unwrap();

        let row = sqlx::query(
            "SELECT stars, downloads, upvotes, updated_at FROM listings WHERE slug = 'alpha'",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(row.get::<i64, _>("stars"), 55);
        assert_eq!(row.get::<i64, _>("downloads"), 66);
        assert_eq!(row.get::<i64, _>("upvotes"), 7);
        assert_eq!(row.get::<i64, _>("updated_at"), NOW - DAY);
    }

    #[tokio::test]
    async fn test_staged_but_uncommitted_pass_has_no_effect() {
        let pool = memory_pool().await;
        insert_listing(&pool, "alpha", 1_000, 0, 0, Some(NOW), false).await;
        insert_listing(&pool, "beta", 2_000, 0, 0, Some(NOW), false).await;

        // Establish a committed baseline pass.
        let signals = fetch_active_signals(&pool).await.unwrap();
        let baseline = score_all(&signals, NOW);
        write_hype_scores(&pool, &baseline, NOW).await.unwrap();
        let before_alpha = hype_of(&pool, "alpha").await;
        let before_beta = hype_of(&pool, "beta").await;

        // Stage a second pass with different inputs, then drop the
        // transaction before commit.
        let doctored: Vec<ScoredListing> = baseline
            .iter()
            .map(|s| ScoredListing {
                id: s.id.clone(),
                name: s.name.clone(),
                hype_score: 99,
            })
            .collect();
        {
            let mut tx = pool.begin().await.unwrap();
            stage_hype_scores(&mut tx, &doctored, NOW + 60).await.unwrap();
            // tx dropped here: rollback
        }

        assert_eq!(hype_of(&pool, "alpha").await, before_alpha);
        assert_eq!(hype_of(&pool, "beta").await, before_beta);
    }

    #[tokio::test]
    async fn test_score_all_order_independent() {
        let mut signals = vec![
            ListingSignals {
                id: "a".into(),
                name: "a".into(),
                stars: 10,
                downloads: 20,
                upvotes: 3,
                updated_at: Some(NOW - DAY),
            },
            ListingSignals {
                id: "b".into(),
                name: "b".into(),
                stars: 5_000,
                downloads: 0,
                upvotes: 0,
                updated_at: None,
            },
        ];

        let forward = score_all(&signals, NOW);
        signals.reverse();
        let mut reversed = score_all(&signals, NOW);
        reversed.reverse();

        for (f, r) in forward.iter().zip(reversed.iter()) {
            assert_eq!(f.id, r.id);
            assert_eq!(f.hype_score, r.hype_score);
        }
    }
}
