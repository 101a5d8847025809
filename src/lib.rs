//! ODDSROOM: multi-bookmaker odds aggregation service.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod cache;
pub mod config;
pub mod feeds;
pub mod odds;
pub mod server;
pub mod types;
