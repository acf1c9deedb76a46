//! Scraper feed import.
//!
//! Ingests a JSON feed of listing entries (the output of the directory's
//! scrapers: GitHub trending, Product Hunt, tool aggregators) and upserts
//! them into the catalog by slug.
//!
//! The whole file is applied in one transaction, so a malformed entry or a
//! failed index write aborts the import without half-applying the feed.
//! Imports refresh text fields and raw signals only; the upvote counter and
//! the hype columns belong to other write paths and are never touched here.

use anyhow::{Context, Result};
use serde::Deserialize;
use sqlx::sqlite::Sqlite;
use sqlx::Transaction;
use std::path::Path;
use uuid::Uuid;

use crate::config::Config;
use crate::db;

/// Categories the directory understands. Unknown categories from a feed
/// fall back to `framework`, the normalizers' default.
pub const CATEGORIES: &[&str] = &[
    "mcp-server",
    "ai-agent",
    "web3-tool",
    "defi-tool",
    "infra",
    "framework",
    "saas-tool",
    "api-service",
    "developer-tool",
];

/// One entry of a scraper feed file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedEntry {
    #[serde(default)]
    pub slug: Option<String>,
    pub name: String,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub source_url: Option<String>,
    #[serde(default)]
    pub stars: i64,
    #[serde(default)]
    pub downloads: i64,
    #[serde(default)]
    pub submitted_by: Option<String>,
    #[serde(default)]
    pub dead_link: bool,
}

pub async fn run_import(config: &Config, file: &Path) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read feed file: {}", file.display()))?;
    let entries: Vec<FeedEntry> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse feed file: {}", file.display()))?;

    let pool = db::connect(config).await?;
    let now = chrono::Utc::now().timestamp();

    let mut inserted = 0u64;
    let mut updated = 0u64;

    let mut tx = pool.begin().await?;
    for entry in &entries {
        if upsert_entry(&mut tx, entry, now).await? {
            inserted += 1;
        } else {
            updated += 1;
        }
    }
    tx.commit().await?;

    println!("import {}", file.display());
    println!("  entries: {}", entries.len());
    println!("  inserted: {}", inserted);
    println!("  updated: {}", updated);
    println!("ok");

    pool.close().await;
    Ok(())
}

/// Upsert one feed entry by slug. Returns true if a new listing was created.
async fn upsert_entry(
    tx: &mut Transaction<'_, Sqlite>,
    entry: &FeedEntry,
    now: i64,
) -> Result<bool> {
    let slug = match &entry.slug {
        Some(s) if !s.is_empty() => s.clone(),
        _ => slugify(&entry.name),
    };
    if slug.is_empty() {
        anyhow::bail!("Feed entry '{}' produces an empty slug", entry.name);
    }

    let category = normalize_category(entry.category.as_deref());
    let tags_json = serde_json::to_string(&entry.tags)?;

    let existing_id: Option<String> = sqlx::query_scalar("SELECT id FROM listings WHERE slug = ?")
        .bind(&slug)
        .fetch_optional(&mut **tx)
        .await?;
    let is_new = existing_id.is_none();

    // Identity is assigned once at creation and survives feed refreshes.
    // Upvotes and the hype columns are deliberately absent from the
    // conflict update.
    let id = existing_id.unwrap_or_else(|| Uuid::new_v4().to_string());

    sqlx::query(
        r#"
        INSERT INTO listings
            (id, slug, name, tagline, description, category, tags_json,
             source_url, submitted_by, stars, downloads,
             created_at, updated_at, dead_link)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(slug) DO UPDATE SET
            name = excluded.name,
            tagline = excluded.tagline,
            description = excluded.description,
            category = excluded.category,
            tags_json = excluded.tags_json,
            source_url = excluded.source_url,
            submitted_by = excluded.submitted_by,
            stars = excluded.stars,
            downloads = excluded.downloads,
            updated_at = excluded.updated_at,
            dead_link = excluded.dead_link
        "#,
    )
    .bind(&id)
    .bind(&slug)
    .bind(&entry.name)
    .bind(&entry.tagline)
    .bind(&entry.description)
    .bind(category)
    .bind(&tags_json)
    .bind(&entry.source_url)
    .bind(&entry.submitted_by)
    .bind(entry.stars.max(0))
    .bind(entry.downloads.max(0))
    .bind(now)
    .bind(now)
    .bind(entry.dead_link as i64)
    .execute(&mut **tx)
    .await?;

    Ok(is_new)
}

/// Convert a name to a URL-safe slug: lowercase, non-alphanumeric runs
/// collapse to a single `-`, trimmed, capped at 100 characters.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true; // suppress a leading dash
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug.truncate(100);
    slug
}

fn normalize_category(category: Option<&str>) -> &'static str {
    category
        .and_then(|c| CATEGORIES.iter().copied().find(|k| *k == c))
        .unwrap_or("framework")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Foo Tool"), "foo-tool");
        assert_eq!(slugify("  LangChain.rs!! "), "langchain-rs");
        assert_eq!(slugify("owner/repo"), "owner-repo");
    }

    #[test]
    fn test_slugify_collapses_runs_and_trims() {
        assert_eq!(slugify("a -- b"), "a-b");
        assert_eq!(slugify("---"), "");
        let long = "x".repeat(250);
        assert_eq!(slugify(&long).len(), 100);
    }

    #[test]
    fn test_normalize_category() {
        assert_eq!(normalize_category(Some("mcp-server")), "mcp-server");
        assert_eq!(normalize_category(Some("not-a-category")), "framework");
        assert_eq!(normalize_category(None), "framework");
    }

    #[test]
    fn test_feed_entry_accepts_scraper_shape() {
        let raw = r#"{
            "slug": "foo-tool",
            "name": "Foo Tool",
            "tagline": "Agents for everyone",
            "description": "An agent framework",
            "category": "ai-agent",
            "tags": ["ai", "agent"],
            "sourceUrl": "https://github.com/foo/tool",
            "stars": 1234,
            "submittedBy": "crawl4ai-github-trending"
        }"#;
        let entry: FeedEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(entry.slug.as_deref(), Some("foo-tool"));
        assert_eq!(entry.stars, 1234);
        assert_eq!(entry.downloads, 0);
        assert_eq!(entry.source_url.as_deref(), Some("https://github.com/foo/tool"));
        assert!(!entry.dead_link);
    }
}
