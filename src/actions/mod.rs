//! Actions applied to scan results.

pub mod delete;

pub use delete::{apply_plan, delete_file, DeleteError, DeletionReport};
