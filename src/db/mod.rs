//! Persistence layer for notekeeper
//!
//! Users and notes live behind the [`Store`] trait. [`DbOperations`] is the
//! Postgres implementation used in production; [`MemoryStore`] keeps
//! everything in process and backs the test suite and `memory://` URLs.

pub mod memory;
pub mod models;
pub mod operations;

use async_trait::async_trait;

use crate::Result;

pub use memory::MemoryStore;
pub use models::{NewNote, NewUser, Note, User};
pub use operations::DbOperations;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Store: Send + Sync {
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;

    /// Inserts a user. Fails with `RegistrationError::EmailTaken` when the
    /// email is already present.
    async fn create_user(&self, user: &NewUser) -> Result<User>;

    async fn create_note(&self, owner_id: i64, note: &NewNote) -> Result<Note>;

    /// Notes owned by `owner_id`, oldest first.
    async fn list_notes(&self, owner_id: i64, skip: i64, limit: i64) -> Result<Vec<Note>>;
}
