pub mod category;
pub mod todo;
