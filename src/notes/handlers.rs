use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tracing::info;

use crate::auth::CurrentUser;
use crate::db::models::NewNote;
use crate::error::AppError;
use crate::AppState;

const DEFAULT_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

impl Pagination {
    fn validate(&self) -> Result<(), AppError> {
        if self.skip < 0 || self.limit < 0 {
            return Err(AppError::ValidationError(
                "skip and limit must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Creates a note owned by the caller. Ownership comes from the token, so
/// the body has no way to name another user.
pub async fn create_note(
    CurrentUser(user): CurrentUser,
    note: web::Json<NewNote>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let note = state.store.create_note(user.id, &note).await?;
    info!("User {} created note {}", user.id, note.id);

    Ok(HttpResponse::Ok().json(note))
}

pub async fn list_notes(
    CurrentUser(user): CurrentUser,
    page: web::Query<Pagination>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    page.validate()?;

    let notes = state.store.list_notes(user.id, page.skip, page.limit).await?;
    Ok(HttpResponse::Ok().json(notes))
}
