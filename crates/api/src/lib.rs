//! tasca API server library.
//!
//! Exposes the building blocks (config, state, error handling, image store,
//! services, routes) so integration tests and the binary entrypoint can both
//! access them.

pub mod config;
pub mod error;
pub mod handlers;
pub mod images;
pub mod router;
pub mod routes;
pub mod service;
pub mod state;
