//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods.
//! Methods participating in service-level transactions take a generic
//! `PgExecutor` so callers can pass either the pool or `&mut *tx`.

pub mod category_repo;
pub mod todo_repo;

pub use category_repo::CategoryRepo;
pub use todo_repo::TodoRepo;
