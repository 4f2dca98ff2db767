//! Orchestration layer: owns transactions and coordinates the repositories,
//! the image store and the Trello mirror. Handlers stay thin and delegate
//! here after parsing the request shape.

pub mod categories;
pub mod todos;
