//! Liveness flag moderation.
//!
//! Marking a listing dead is the logical-delete path: the rescore job skips
//! it (its last score stays frozen) and search stops returning it. Marking
//! it alive restores both on the next pass, with no re-index step.

use anyhow::{bail, Result};

use crate::config::Config;
use crate::db;

pub async fn run_link(config: &Config, slug: &str, dead: bool) -> Result<()> {
    let pool = db::connect(config).await?;

    let result = sqlx::query("UPDATE listings SET dead_link = ? WHERE slug = ?")
        .bind(dead as i64)
        .bind(slug)
        .execute(&pool)
        .await?;
    if result.rows_affected() == 0 {
        pool.close().await;
        bail!("Listing not found: {}", slug);
    }

    println!(
        "{}: marked {}",
        slug,
        if dead { "dead" } else { "alive" }
    );

    pool.close().await;
    Ok(())
}
