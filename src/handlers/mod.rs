use actix_web::{HttpMessage, HttpRequest, HttpResponse, Result};
use uuid::Uuid;

use crate::auth::Claims;
use crate::utils;

mod auth;
mod posts;
mod profiles;
mod users;

pub use auth::*;
pub use posts::*;
pub use profiles::*;
pub use users::*;

/// Health check endpoint
pub async fn health_check() -> Result<HttpResponse> {
    Ok(utils::response::success_response(
        serde_json::json!({"success": true, "status": "healthy"}),
    ))
}

/// Server status endpoint
pub async fn server_status() -> Result<HttpResponse> {
    let status = serde_json::json!({
        "status": "running",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    });
    Ok(utils::response::success_response(status))
}

/// The authenticated user id injected by the auth middleware. `None` only
/// when a protected handler is reached without the middleware (or with
/// claims carrying an unparseable subject).
pub(crate) fn authed_user_id(req: &HttpRequest) -> Option<Uuid> {
    req.extensions()
        .get::<Claims>()
        .and_then(|claims| claims.user_id().ok())
}

pub(crate) fn unauthorized() -> HttpResponse {
    utils::response::error_response("Unauthorized", 401)
}

pub(crate) fn flatten_validation_errors(err: validator::ValidationErrors) -> Vec<String> {
    let mut msgs = Vec::new();
    for (field, errors) in err.field_errors().iter() {
        for e in errors.iter() {
            let message = if let Some(m) = &e.message {
                m.to_string()
            } else {
                format!("{} {}", field, e.code)
            };
            msgs.push(message);
        }
    }
    msgs
}
