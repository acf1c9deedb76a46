//! Read-side hype leaderboard.
//!
//! Combines nothing at query time — it simply reads the `hype_score` column
//! the rescore job maintains. Dead links are hidden, matching search.

use anyhow::Result;
use sqlx::Row;

use crate::config::Config;
use crate::db;

pub async fn run_top(config: &Config, limit: i64) -> Result<()> {
    let pool = db::connect(config).await?;

    let rows = sqlx::query(
        r#"
        SELECT slug, name, category, hype_score, hype_updated_at
        FROM listings
        WHERE dead_link = 0
        ORDER BY hype_score DESC, slug ASC
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(&pool)
    .await?;

    if rows.is_empty() {
        println!("No listings.");
        pool.close().await;
        return Ok(());
    }

    println!("{:<6} {:<28} {:<16} {}", "HYPE", "NAME", "CATEGORY", "SLUG");
    println!("{}", "-".repeat(72));
    for row in &rows {
        let hype: i64 = row.get("hype_score");
        let name: String = row.get("name");
        let category: String = row.get("category");
        let slug: String = row.get("slug");
        println!("{:<6} {:<28} {:<16} {}", hype, name, category, slug);
    }

    pool.close().await;
    Ok(())
}
