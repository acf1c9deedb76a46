//! Core data models for the listings catalog.
//!
//! These types represent the listings, raw popularity signals, and search
//! results that flow through the import, rescore, and search paths.

/// A catalog listing as stored in SQLite.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct Listing {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub tagline: Option<String>,
    pub description: String,
    pub category: String,
    pub tags_json: String,
    pub source_url: Option<String>,
    pub submitted_by: Option<String>,
    pub stars: i64,
    pub downloads: i64,
    pub upvotes: i64,
    pub created_at: i64,
    pub updated_at: Option<i64>,
    pub dead_link: bool,
    pub hype_score: i64,
    pub hype_updated_at: Option<i64>,
}

/// The raw popularity signals the score engine consumes, as read from an
/// active listing row. `updated_at` is the last scraper refresh; a missing
/// value means the listing has never been refreshed and is treated as fresh.
#[derive(Debug, Clone)]
pub struct ListingSignals {
    pub id: String,
    pub name: String,
    pub stars: i64,
    pub downloads: i64,
    pub upvotes: i64,
    pub updated_at: Option<i64>,
}

/// One rescore result, staged for the batch write.
#[derive(Debug, Clone)]
pub struct ScoredListing {
    pub id: String,
    pub name: String,
    pub hype_score: i64,
}

/// A search result row returned from the FTS index, joined back to listings.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub id: String,
    pub slug: String,
    pub name: String,
    pub category: String,
    pub hype_score: i64,
    pub relevance: f64,
    pub snippet: String,
}
