//! End-to-end tests against a running server
//!
//! Start the server with a database, then run: cargo test -- --ignored

mod api_tests;
