use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::db::models::{NewNote, NewUser, Note, User};
use crate::db::Store;
use crate::Result;

pub struct DbOperations {
    pool: Arc<PgPool>,
}

impl DbOperations {
    pub async fn new_with_options(
        url: &str,
        max_connections: u32,
        acquire_timeout: Duration,
    ) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(acquire_timeout)
            .connect(url)
            .await?;

        Ok(Self { pool: Arc::new(pool) })
    }

    pub async fn from_config(config: &DatabaseConfig) -> Result<Self> {
        Self::new_with_options(
            &config.url,
            config.max_connections,
            Duration::from_secs(config.acquire_timeout_secs),
        )
        .await
    }

    /// Applies the embedded migrations under `migrations/`.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(self.pool.as_ref()).await?;
        info!("Database migrations applied");
        Ok(())
    }

    pub async fn begin_transaction(&self) -> Result<Transaction<'_, Postgres>> {
        Ok(self.pool.as_ref().begin().await?)
    }

    pub async fn create_user_with_transaction(
        &self,
        user: &NewUser,
        transaction: &mut Transaction<'_, Postgres>,
    ) -> Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, hashed_password, is_active)
            VALUES ($1, $2, $3)
            RETURNING id, email, hashed_password, is_active
            "#,
        )
        .bind(&user.email)
        .bind(&user.hashed_password)
        .bind(user.is_active)
        .fetch_one(&mut **transaction)
        .await?;

        Ok(user)
    }
}

#[async_trait]
impl Store for DbOperations {
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, hashed_password, is_active FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(user)
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, hashed_password, is_active FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(user)
    }

    async fn create_user(&self, user: &NewUser) -> Result<User> {
        let mut transaction = self.begin_transaction().await?;

        let result = self.create_user_with_transaction(user, &mut transaction).await;

        match result {
            Ok(user) => {
                transaction.commit().await?;
                Ok(user)
            }
            Err(e) => {
                transaction.rollback().await?;
                Err(e)
            }
        }
    }

    async fn create_note(&self, owner_id: i64, note: &NewNote) -> Result<Note> {
        let note = sqlx::query_as::<_, Note>(
            r#"
            INSERT INTO notes (title, content, owner_id)
            VALUES ($1, $2, $3)
            RETURNING id, title, content, owner_id, created_at
            "#,
        )
        .bind(&note.title)
        .bind(&note.content)
        .bind(owner_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(note)
    }

    async fn list_notes(&self, owner_id: i64, skip: i64, limit: i64) -> Result<Vec<Note>> {
        let notes = sqlx::query_as::<_, Note>(
            r#"
            SELECT id, title, content, owner_id, created_at
            FROM notes
            WHERE owner_id = $1
            ORDER BY id
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(owner_id)
        .bind(skip)
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(notes)
    }
}
