//! Authentication module for notekeeper
//!
//! Password hashing, bearer token signing, login, registration, and the
//! request guard that turns a bearer token back into a user.

pub mod extractor;
pub mod handlers;
pub mod password;
pub mod service;
pub mod token;

pub use extractor::CurrentUser;
pub use password::CredentialHasher;
pub use service::AuthService;
pub use token::{Claims, TokenCodec};
