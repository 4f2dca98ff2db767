//! HTTP handlers. Handlers parse the request shape (JSON, multipart, query
//! strings) and delegate to the service layer.

pub mod categories;
pub mod todos;
