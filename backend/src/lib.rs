//! Recipe API backend library
//!
//! Exposes the backend modules for the server binary, the
//! `create-superuser` tool and integration tests.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod media;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
