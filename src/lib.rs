//! Read-only HTTP catalog of asteroids and comets backed by MySQL

pub mod config;
pub mod database;
pub mod errors;
pub mod models;
pub mod server;
