// Library exports for the binary and integration tests

pub mod app;
pub mod auth_token;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
