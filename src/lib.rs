// Library exports for Inkwell
// The binary and the integration tests build on these modules

pub mod api;
pub mod auth;
pub mod blog;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod flash;
pub mod routes;
pub mod state;
