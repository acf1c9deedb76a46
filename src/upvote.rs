//! Community upvote path.
//!
//! Plain counter arithmetic on the listing row. The counter feeds the score
//! engine on the next rescore pass; nothing here touches the hype columns.

use anyhow::{bail, Result};
use sqlx::Row;

use crate::config::Config;
use crate::db;

pub async fn run_upvote(config: &Config, slug: &str) -> Result<()> {
    let pool = db::connect(config).await?;

    let result = sqlx::query("UPDATE listings SET upvotes = upvotes + 1 WHERE slug = ?")
        .bind(slug)
        .execute(&pool)
        .await?;
    if result.rows_affected() == 0 {
        pool.close().await;
        bail!("Listing not found: {}", slug);
    }

    let row = sqlx::query("SELECT name, upvotes FROM listings WHERE slug = ?")
        .bind(slug)
        .fetch_one(&pool)
        .await?;
    let name: String = row.get("name");
    let upvotes: i64 = row.get("upvotes");
    println!("{} ({}): {} upvotes", name, slug, upvotes);

    pool.close().await;
    Ok(())
}
