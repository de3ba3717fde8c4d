// Library exports so integration tests can drive the router directly.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;
pub mod validate;
