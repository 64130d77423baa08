//! Carros API - HTTP CRUD service for car records
//!
//! Exposes the `carros` MongoDB collection over a small JSON HTTP surface:
//!
//! - `GET /carros` - list every car
//! - `GET /carros/{id}` - fetch one car by ObjectId
//! - `POST /carros` - insert a new car document
//! - `PUT /carros/{id}` - merge fields into an existing car
//! - `DELETE /carros/{id}` - remove a car
//!
//! The store is reached through the [`db::CarStore`] trait so the router can
//! run against MongoDB in production and an in-memory store in tests.

pub mod config;
pub mod db;
pub mod routes;
pub mod server;
pub mod types;

pub use config::Args;
pub use server::{run, serve, AppState};
pub use types::{CarrosError, Result};
