//! Per-user notes. Every route here requires a bearer token.

pub mod handlers;

pub use handlers::{create_note, list_notes, Pagination};
