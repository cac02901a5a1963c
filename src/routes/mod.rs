mod auth;
mod health_check;
mod publish;

pub use auth::*;
pub use health_check::*;
pub use publish::*;

/// The JSON body every error response carries.
#[derive(serde::Serialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}
