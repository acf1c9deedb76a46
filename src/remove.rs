//! Hard listing removal.
//!
//! Deletes the source row; the delete trigger drops the search document in
//! the same transaction, so the listing disappears from search atomically.

use anyhow::{bail, Result};

use crate::config::Config;
use crate::db;

pub async fn run_remove(config: &Config, slug: &str) -> Result<()> {
    let pool = db::connect(config).await?;

    let result = sqlx::query("DELETE FROM listings WHERE slug = ?")
        .bind(slug)
        .execute(&pool)
        .await?;
    if result.rows_affected() == 0 {
        pool.close().await;
        bail!("Listing not found: {}", slug);
    }

    println!("{}: removed", slug);

    pool.close().await;
    Ok(())
}
