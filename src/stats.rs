//! Catalog statistics and health overview.
//!
//! A quick summary of what's in the directory: listing counts, dead links,
//! score coverage, and a per-category breakdown. Used by `tooldex stats` to
//! confirm that imports and rescore passes are doing their job.

use anyhow::Result;
use sqlx::Row;

use crate::config::Config;
use crate::db;

/// Per-category breakdown of listing counts and scores.
struct CategoryStats {
    category: String,
    count: i64,
    dead: i64,
    avg_hype: f64,
}

/// Run the stats command: query the database and print a summary.
pub async fn run_stats(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM listings")
        .fetch_one(&pool)
        .await?;

    let dead: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM listings WHERE dead_link = 1")
        .fetch_one(&pool)
        .await?;

    let scored: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM listings WHERE dead_link = 0 AND hype_updated_at IS NOT NULL",
    )
    .fetch_one(&pool)
    .await?;

    let last_rescore: Option<i64> =
        sqlx::query_scalar("SELECT MAX(hype_updated_at) FROM listings")
            .fetch_one(&pool)
            .await?;

    let db_size = std::fs::metadata(&config.db.path)
        .map(|m| m.len())
        .unwrap_or(0);

    println!("tooldex — Catalog Stats");
    println!("=======================");
    println!();
    println!("  Database:     {}", config.db.path.display());
    println!("  Size:         {}", format_bytes(db_size));
    println!();
    println!("  Listings:     {}", total);
    println!("  Dead links:   {}", dead);
    println!(
        "  Scored:       {} / {} active",
        scored,
        total - dead
    );
    println!(
        "  Last rescore: {}",
        match last_rescore {
            Some(ts) => format_ts_relative(ts),
            None => "never".to_string(),
        }
    );

    // Per-category breakdown
    let category_rows = sqlx::query(
        r#"
        SELECT
            category,
            COUNT(*) AS count,
            SUM(dead_link) AS dead,
            AVG(CASE WHEN dead_link = 0 THEN hype_score END) AS avg_hype
        FROM listings
        GROUP BY category
        ORDER BY count DESC
        "#,
    )
    .fetch_all(&pool)
    .await?;

    let category_stats: Vec<CategoryStats> = category_rows
        .iter()
        .map(|row| CategoryStats {
            category: row.get("category"),
            count: row.get("count"),
            dead: row.get("dead"),
            avg_hype: row.get::<Option<f64>, _>("avg_hype").unwrap_or(0.0),
        })
        .collect();

    if !category_stats.is_empty() {
        println!();
        println!("  By category:");
        println!(
            "  {:<18} {:>8} {:>6} {:>10}",
            "CATEGORY", "LISTINGS", "DEAD", "AVG HYPE"
        );
        println!("  {}", "-".repeat(46));
        for c in &category_stats {
            println!(
                "  {:<18} {:>8} {:>6} {:>10.1}",
                c.category, c.count, c.dead, c.avg_hype
            );
        }
    }

    println!();

    pool.close().await;
    Ok(())
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

/// Format a Unix timestamp as a relative time string (e.g. "3 hours ago").
fn format_ts_relative(ts: i64) -> String {
    let now = chrono::Utc::now().timestamp();
    let delta = now - ts;

    if delta < 0 {
        return format_ts_iso(ts);
    }

    if delta < 60 {
        "just now".to_string()
    } else if delta < 3600 {
        let mins = delta / 60;
        format!("{} min{} ago", mins, if mins == 1 { "" } else { "s" })
    } else if delta < 86400 {
        let hours = delta / 3600;
        format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" })
    } else if delta < 86400 * 30 {
        let days = delta / 86400;
        format!("{} day{} ago", days, if days == 1 { "" } else { "s" })
    } else {
        format_ts_iso(ts)
    }
}

fn format_ts_iso(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ts.to_string())
}
