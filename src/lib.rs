//! # Grand Slams
//!
//! Tennis tournament statistics backed by SQLite.
//!
//! ## Architecture
//!
//! - **models**: Row types for the seven tennis tables and player validation
//! - **storage**: Schema, inserts, player CRUD and the aggregate report queries
//! - **ingest**: Bulk CSV loader
//! - **api**: REST API endpoints and the HTML index page
//! - **config**: Configuration loading and validation

pub mod api;
pub mod config;
pub mod ingest;
pub mod models;
pub mod storage;

pub use models::*;
