//! Integration test suite.

mod aggregation;
mod mock_feed;
mod server;
