use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::extractor::CurrentUser;
use crate::db::models::User;
use crate::error::AppError;
use crate::AppState;

/// OAuth2 password-grant style form; `username` carries the email.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub is_active: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            is_active: user.is_active,
        }
    }
}

pub async fn login(
    form: web::Form<TokenRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    match state.auth.login(&form.username, &form.password).await {
        Ok(access_token) => Ok(HttpResponse::Ok().json(TokenResponse {
            access_token,
            token_type: "bearer".to_string(),
        })),
        Err(e) => {
            warn!("Login failed for {}: {}", form.username, e);
            Err(e)
        }
    }
}

pub async fn register(
    req: web::Json<RegisterRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!("Received registration request for email: {}", req.email);

    let user = state.auth.register(&req.email, &req.password).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

pub async fn me(CurrentUser(user): CurrentUser) -> HttpResponse {
    HttpResponse::Ok().json(UserResponse::from(user))
}
