//! JSON REST handler for authentication.
//!
//! Login is deliberately simple: a static account list checked by exact
//! username and password match, returning an opaque bearer token. There is
//! no session store; clients keep the token and the other endpoints do not
//! verify it.

use std::time::{SystemTime, UNIX_EPOCH};

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::state::ApiState;

/// One account accepted by the login endpoint.
///
/// The password never leaves the server: it is skipped on serialization, so
/// the login response carries the account without it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub title: String,
    pub permissions: Vec<String>,
    pub access_tier: u8,
    #[serde(skip_serializing)]
    pub password: String,
}

/// Built-in account set used when no external user directory is configured.
#[must_use]
pub fn demo_users() -> Vec<UserAccount> {
    vec![
        UserAccount {
            id: "1".to_string(),
            username: "admin".to_string(),
            email: "admin@homelink.local".to_string(),
            full_name: "Administrator".to_string(),
            role: "admin".to_string(),
            title: "Estate Director".to_string(),
            permissions: vec!["all".to_string()],
            access_tier: 2,
            password: "admin123".to_string(),
        },
        UserAccount {
            id: "2".to_string(),
            username: "staff.member".to_string(),
            email: "staff.member@homelink.local".to_string(),
            full_name: "Staff Member".to_string(),
            role: "staff".to_string(),
            title: "Operations Manager".to_string(),
            permissions: vec![
                "dashboard".to_string(),
                "security:view".to_string(),
                "staff:read".to_string(),
            ],
            access_tier: 1,
            password: "staff123".to_string(),
        },
        UserAccount {
            id: "3".to_string(),
            username: "family.member".to_string(),
            email: "family.member@homelink.local".to_string(),
            full_name: "Family Member".to_string(),
            role: "family".to_string(),
            title: "Family Member".to_string(),
            permissions: vec!["estate:residential".to_string(), "staff:read".to_string()],
            access_tier: 1,
            password: "family123".to_string(),
        },
    ]
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize)]
struct LoginOk {
    token: String,
    user: UserAccount,
}

#[derive(Serialize)]
struct LoginError {
    error: &'static str,
}

/// Possible responses from the login endpoint.
pub enum LoginResponse {
    Ok(Box<UserAccount>),
    MissingCredentials,
    InvalidCredentials,
}

impl IntoResponse for LoginResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(user) => Json(LoginOk {
                token: issue_token(&user.id),
                user: *user,
            })
            .into_response(),
            Self::MissingCredentials => (
                StatusCode::BAD_REQUEST,
                Json(LoginError {
                    error: "Username and password are required",
                }),
            )
                .into_response(),
            Self::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                Json(LoginError {
                    error: "Invalid credentials",
                }),
            )
                .into_response(),
        }
    }
}

/// `POST /api/auth/login` — authenticate against the account list.
pub async fn login(
    State(state): State<ApiState>,
    Json(request): Json<LoginRequest>,
) -> LoginResponse {
    if request.username.is_empty() || request.password.is_empty() {
        return LoginResponse::MissingCredentials;
    }

    let Some(user) = state
        .users
        .iter()
        .find(|user| user.username == request.username)
    else {
        return LoginResponse::InvalidCredentials;
    };
    if user.password != request.password {
        return LoginResponse::InvalidCredentials;
    }

    tracing::info!(username = %user.username, role = %user.role, "login successful");
    LoginResponse::Ok(Box::new(user.clone()))
}

/// Opaque bearer token: timestamp plus account id.
fn issue_token(user_id: &str) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default();
    format!("homelink-token-{millis}-{user_id}")
}
