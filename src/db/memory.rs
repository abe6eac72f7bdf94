use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::db::models::{NewNote, NewUser, Note, User};
use crate::db::Store;
use crate::error::RegistrationError;
use crate::Result;

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    notes: Vec<Note>,
    next_user_id: i64,
    next_note_id: i64,
}

/// In-process [`Store`] with the same uniqueness and ordering rules as the
/// Postgres schema. Ids start at 1 and are never reused.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn create_user(&self, user: &NewUser) -> Result<User> {
        let mut tables = self.tables.write().await;

        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(RegistrationError::EmailTaken.into());
        }

        tables.next_user_id += 1;
        let created = User {
            id: tables.next_user_id,
            email: user.email.clone(),
            hashed_password: user.hashed_password.clone(),
            is_active: user.is_active,
        };
        tables.users.push(created.clone());

        Ok(created)
    }

    async fn create_note(&self, owner_id: i64, note: &NewNote) -> Result<Note> {
        let mut tables = self.tables.write().await;

        tables.next_note_id += 1;
        let created = Note {
            id: tables.next_note_id,
            title: note.title.clone(),
            content: note.content.clone(),
            owner_id,
            created_at: Utc::now(),
        };
        tables.notes.push(created.clone());

        Ok(created)
    }

    async fn list_notes(&self, owner_id: i64, skip: i64, limit: i64) -> Result<Vec<Note>> {
        let tables = self.tables.read().await;

        // notes are appended in id order
        Ok(tables
            .notes
            .iter()
            .filter(|n| n.owner_id == owner_id)
            .skip(skip.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn new_user(email: &str) -> NewUser {
        NewUser::new(email.to_string(), "$argon2id$placeholder".to_string())
    }

    fn new_note(title: &str) -> NewNote {
        NewNote {
            title: title.to_string(),
            content: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_lookup_user() {
        let store = MemoryStore::new();
        let created = store.create_user(&new_user("alice@example.com")).await.unwrap();

        assert_eq!(created.id, 1);
        assert!(created.is_active);

        let by_email = store.get_user_by_email("alice@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, created.id);

        let by_id = store.get_user_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "alice@example.com");
    }

    #[tokio::test]
    async fn test_email_lookup_is_case_sensitive() {
        let store = MemoryStore::new();
        store.create_user(&new_user("alice@example.com")).await.unwrap();

        assert!(store.get_user_by_email("Alice@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let store = MemoryStore::new();
        store.create_user(&new_user("alice@example.com")).await.unwrap();

        let err = store.create_user(&new_user("alice@example.com")).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::RegistrationError(RegistrationError::EmailTaken)
        ));
    }

    #[tokio::test]
    async fn test_notes_are_scoped_to_owner() {
        let store = MemoryStore::new();
        let alice = store.create_user(&new_user("alice@example.com")).await.unwrap();
        let bob = store.create_user(&new_user("bob@example.com")).await.unwrap();

        store.create_note(alice.id, &new_note("a1")).await.unwrap();
        store.create_note(bob.id, &new_note("b1")).await.unwrap();
        store.create_note(alice.id, &new_note("a2")).await.unwrap();

        let notes = store.list_notes(alice.id, 0, 100).await.unwrap();
        let titles: Vec<_> = notes.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["a1", "a2"]);
        assert!(notes.iter().all(|n| n.owner_id == alice.id));
    }

    #[tokio::test]
    async fn test_list_notes_pagination() {
        let store = MemoryStore::new();
        let alice = store.create_user(&new_user("alice@example.com")).await.unwrap();
        for i in 0..5 {
            store.create_note(alice.id, &new_note(&format!("n{}", i))).await.unwrap();
        }

        let page = store.list_notes(alice.id, 1, 2).await.unwrap();
        let titles: Vec<_> = page.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["n1", "n2"]);

        assert!(store.list_notes(alice.id, 10, 2).await.unwrap().is_empty());
        assert!(store.list_notes(alice.id, 0, 0).await.unwrap().is_empty());
    }
}
