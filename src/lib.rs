//! # tooldex
//!
//! Catalog ranking and search backend for an AI/agent/Web3 tool directory.
//!
//! The listings table in SQLite is the source of truth. Two derived views
//! hang off it with different consistency cadences:
//!
//! ```text
//! ┌───────────────┐   writes    ┌─────────────────────────┐
//! │ Scraper feeds │────────────▶│       listings          │
//! │ Upvotes, mods │             │  (signals + hype cols)  │
//! └───────────────┘             └─────┬──────────────┬────┘
//!                        triggers,    │              │  periodic,
//!                        same txn     ▼              ▼  atomic batch
//!                              ┌────────────┐  ┌────────────┐
//!                              │listings_fts│  │ hype_score │
//!                              │ (search)   │  │ (rescore)  │
//!                              └────────────┘  └────────────┘
//! ```
//!
//! The FTS index is synchronized transactionally by schema triggers on every
//! insert/update/delete; the hype score is recomputed for the whole catalog
//! in one atomic pass by `tooldex rescore`.
//!
//! ## Quick Start
//!
//! ```bash
//! tooldex init                          # create database
//! tooldex import feeds/github.json      # ingest scraper output
//! tooldex rescore                       # rank the catalog
//! tooldex search "agent framework" --rank hype
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`score`] | Pure hype score computation |
//! | [`rescore`] | Batch score recompute job |
//! | [`search`] | FTS5 catalog search |
//! | [`import`] | Scraper feed ingestion |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema migrations, index, and sync triggers |

pub mod config;
pub mod db;
pub mod import;
pub mod link;
pub mod migrate;
pub mod models;
pub mod remove;
pub mod rescore;
pub mod score;
pub mod search;
pub mod stats;
pub mod top;
pub mod upvote;
