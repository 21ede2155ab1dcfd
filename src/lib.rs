pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod expenses;
pub mod state;
pub mod users;

// Shared fixtures, available to unit tests and integration tests alike.
pub mod test_utils;
