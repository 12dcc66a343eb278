use axum::extract::{FromRequestParts, Request, State};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;
use axum::Json;
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::db::UserRecord;
use crate::error::AppError;
use super::AppState;

/// Bearer token payload. `sub` carries the account id.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// Authenticated account identity, inserted into request extensions by
/// [`require_auth`] and pulled out by handlers via the extractor impl.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".into()))
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<&UserRecord> for UserDto {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserDto,
}

/// POST /api/auth/register
///
/// # Errors
///
/// Returns 400 for missing or malformed fields and 409 when the email is
/// already registered.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let name = body.name.trim();
    let email = body.email.trim().to_lowercase();

    if name.is_empty() {
        return Err(AppError::Validation("Name is required".into()));
    }
    if !looks_like_email(&email) {
        return Err(AppError::Validation("A valid email is required".into()));
    }
    if body.password.len() < 6 {
        return Err(AppError::Validation(
            "Password must be at least 6 characters".into(),
        ));
    }

    let password_hash = hash(&body.password, DEFAULT_COST)?;

    let user = state
        .repo
        .create_user(name, &email, &password_hash)
        .await?
        .ok_or_else(|| {
            AppError::Conflict("An account with this email already exists".into())
        })?;

    let token = issue_token(&user, &state.config.jwt_secret, state.config.token_ttl_hours)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            user: UserDto::from(&user),
        }),
    ))
}

/// POST /api/auth/login
///
/// # Errors
///
/// Returns 401 for an unknown email or a wrong password. The two cases
/// carry distinct messages.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let email = body.email.trim().to_lowercase();

    let user = state
        .repo
        .find_user_by_email(&email)
        .await?
        .ok_or_else(|| AppError::Unauthorized("No account found with this email".into()))?;

    if !verify(&body.password, &user.password_hash)? {
        return Err(AppError::Unauthorized("Invalid password".into()));
    }

    let token = issue_token(&user, &state.config.jwt_secret, state.config.token_ttl_hours)?;

    Ok(Json(AuthResponse {
        token,
        user: UserDto::from(&user),
    }))
}

/// Middleware guarding the tenant-scoped routes. Decodes the bearer token
/// and stashes the caller's identity in request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let token = match header {
        Some(value) if value.starts_with("Bearer ") => &value[7..],
        _ => {
            return Err(AppError::Unauthorized(
                "Missing or invalid Authorization header".into(),
            ))
        }
    };

    let claims = decode_token(token, &state.config.jwt_secret)?;

    request.extensions_mut().insert(CurrentUser {
        id: claims.sub,
        email: claims.email,
    });

    Ok(next.run(request).await)
}

pub fn issue_token(user: &UserRecord, secret: &str, ttl_hours: i64) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user.id.clone(),
        email: user.email.clone(),
        iat: now.timestamp(),
        exp: (now + Duration::hours(ttl_hours)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
}

fn decode_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
}

fn looks_like_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}
