//! Full-text search over the listings catalog.
//!
//! Queries the `listings_fts` index, which the schema triggers keep in
//! lockstep with the `listings` table, so results always reflect the most
//! recently committed writes with no re-index step.
//!
//! The index itself ranks by bm25 relevance only. Popularity ranking is a
//! caller-side concern: `--rank hype` re-sorts the relevance candidates by
//! the stored hype score.

use anyhow::{bail, Result};
use sqlx::{Row, SqlitePool};

use crate::config::Config;
use crate::db;
use crate::models::SearchHit;

pub async fn run_search(
    config: &Config,
    query: &str,
    rank_mode: &str,
    limit: Option<i64>,
) -> Result<()> {
    if query.trim().is_empty() {
        println!("No results.");
        return Ok(());
    }

    match rank_mode {
        "relevance" | "hype" => {}
        _ => bail!("Unknown rank mode: {}. Use relevance or hype.", rank_mode),
    }

    let pool = db::connect(config).await?;
    let limit = limit.unwrap_or(config.search.limit);

    let mut hits = fetch_hits(&pool, query, limit).await?;
    if hits.is_empty() {
        println!("No results.");
        pool.close().await;
        return Ok(());
    }

    if rank_mode == "hype" {
        hits.sort_by(|a, b| {
            b.hype_score
                .cmp(&a.hype_score)
                .then(
                    b.relevance
                        .partial_cmp(&a.relevance)
                        .unwrap_or(std::cmp::Ordering::Equal),
                )
                .then(a.slug.cmp(&b.slug))
        });
    }

    for (i, hit) in hits.iter().enumerate() {
        println!(
            "{}. [{:.2}] {} / {} ({})",
            i + 1,
            hit.relevance,
            hit.category,
            hit.name,
            hit.slug
        );
        println!("    hype: {}", hit.hype_score);
        println!("    excerpt: \"{}\"", hit.snippet.replace('\n', " ").trim());
        println!("    id: {}", hit.id);
        println!();
    }

    pool.close().await;
    Ok(())
}

/// Fetch relevance-ranked matches from the FTS index, joined back to the
/// listings table. Dead links are search-invisible by policy; the index
/// still mirrors them, so reviving a link needs no re-index.
pub async fn fetch_hits(pool: &SqlitePool, query: &str, limit: i64) -> Result<Vec<SearchHit>> {
    let rows = sqlx::query(
        r#"
        SELECT l.id, l.slug, l.name, l.category, l.hype_score, rank,
               snippet(listings_fts, 2, '>>>', '<<<', '...', 24) AS snippet
        FROM listings_fts
        JOIN listings l ON l.rowid = listings_fts.rowid
        WHERE listings_fts MATCH ?
          AND l.dead_link = 0
        ORDER BY rank, l.slug
        LIMIT ?
        "#,
    )
    .bind(query)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    let hits = rows
        .iter()
        .map(|row| {
            let rank: f64 = row.get("rank");
            SearchHit {
                id: row.get("id"),
                slug: row.get("slug"),
                name: row.get("name"),
                category: row.get("category"),
                hype_score: row.get("hype_score"),
                relevance: -rank, // bm25 rank is lower-is-better; negate
                snippet: row.get("snippet"),
            }
        })
        .collect();

    Ok(hits)
}
