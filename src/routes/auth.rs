use crate::routes::ErrorBody;
use crate::startup::AppState;
use crate::telemetry::error_chain_fmt;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use secrecy::ExposeSecret;

#[derive(serde::Deserialize)]
pub struct AuthRequest {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

#[derive(serde::Serialize)]
struct AuthOkResponse {
    ok: bool,
}

#[derive(serde::Serialize)]
struct IssuedTokenResponse {
    token: String,
}

#[derive(thiserror::Error)]
pub enum AuthError {
    #[error("Server env missing (ADMIN_PASSWORD/ADMIN_TOKEN)")]
    MissingConfiguration,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Wrong password")]
    InvalidPassword,
    #[error("Bad request")]
    BadRequest(#[source] JsonRejection),
}

impl std::fmt::Debug for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match &self {
            AuthError::MissingConfiguration => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::InvalidToken | AuthError::InvalidPassword => StatusCode::UNAUTHORIZED,
            AuthError::BadRequest(_) => StatusCode::BAD_REQUEST,
        };
        if status.is_server_error() {
            tracing::error!("Authentication failed: {:?}", self);
        } else {
            tracing::warn!("Authentication rejected: {:?}", self);
        }
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Checks a submitted password or token against the configured secrets.
///
/// Comparison is plain string equality, like the deployment this replaces;
/// the endpoint is not hardened against timing analysis.
#[tracing::instrument(name = "Authenticate admin", skip(state, body))]
pub async fn authenticate(
    State(state): State<AppState>,
    body: Result<Json<AuthRequest>, JsonRejection>,
) -> Result<Response, AuthError> {
    let Json(request) = body.map_err(AuthError::BadRequest)?;
    let (Some(expected_password), Some(admin_token)) = (
        state.settings.admin_password(),
        state.settings.admin_token(),
    ) else {
        return Err(AuthError::MissingConfiguration);
    };

    match request.token.as_deref().filter(|token| !token.is_empty()) {
        // Verification of a previously issued token.
        Some(candidate) => {
            if candidate == admin_token.expose_secret().as_str() {
                Ok(Json(AuthOkResponse { ok: true }).into_response())
            } else {
                Err(AuthError::InvalidToken)
            }
        }
        // Password login; a successful check hands out the admin token for
        // use as a bearer credential on publish calls.
        None => {
            if request.password.as_deref() == Some(expected_password.expose_secret().as_str()) {
                Ok(Json(IssuedTokenResponse {
                    token: admin_token.expose_secret().clone(),
                })
                .into_response())
            } else {
                Err(AuthError::InvalidPassword)
            }
        }
    }
}
