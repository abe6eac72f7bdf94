use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub is_active: bool,
}

/// A user row that has not been inserted yet. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub hashed_password: String,
    pub is_active: bool,
}

impl NewUser {
    pub fn new(email: String, hashed_password: String) -> Self {
        Self {
            email,
            hashed_password,
            is_active: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: Option<String>,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Client-supplied note fields. There is no owner here: the owner always
/// comes from the resolved identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewNote {
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
}
