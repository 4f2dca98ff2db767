//! Domain types and business rules shared by all tasca crates.
//!
//! Keeps the persistence (`tasca-db`), the Trello client (`tasca-trello`)
//! and the HTTP layer (`tasca-api`) agreeing on ids, timestamps, enums and
//! validation without depending on each other.

pub mod category;
pub mod error;
pub mod todo;
pub mod types;
