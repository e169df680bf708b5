use uuid::Uuid;

/// ID validation
pub fn validate_uuid(id: &str) -> Result<Uuid, String> {
    Uuid::parse_str(id).map_err(|_| "Invalid id format".to_string())
}

/// Gravatar URL derivation: MD5 of the normalized email, fixed size/default/
/// rating parameters.
pub mod gravatar {
    use md5::{Digest, Md5};

    pub fn url(email: &str) -> String {
        let normalized = email.trim().to_lowercase();
        let mut hasher = Md5::new();
        hasher.update(normalized.as_bytes());
        format!(
            "https://www.gravatar.com/avatar/{:x}?s=200&d=mm&r=pg",
            hasher.finalize()
        )
    }
}

/// Logging helpers
pub mod logging {
    use log::LevelFilter;

    pub fn level_from_string(level: &str) -> LevelFilter {
        match level.to_lowercase().as_str() {
            "error" => LevelFilter::Error,
            "warn" => LevelFilter::Warn,
            "info" => LevelFilter::Info,
            "debug" => LevelFilter::Debug,
            "trace" => LevelFilter::Trace,
            _ => LevelFilter::Info,
        }
    }
}

/// Error handling utilities
pub mod error {
    use std::fmt;

    /// Application error carrying the client-facing message and HTTP status.
    /// Internal failures are logged at conversion and surface as a generic
    /// 500 message.
    #[derive(Debug)]
    pub struct AppError {
        pub message: String,
        pub status_code: u16,
    }

    impl AppError {
        pub fn new(message: &str, status_code: u16) -> Self {
            Self {
                message: message.to_string(),
                status_code,
            }
        }

        pub fn bad_request(message: &str) -> Self {
            Self::new(message, 400)
        }

        pub fn unauthorized(message: &str) -> Self {
            Self::new(message, 401)
        }

        pub fn not_found(message: &str) -> Self {
            Self::new(message, 404)
        }

        /// Log the detail, return the generic server error. The detail is
        /// never included in the response body.
        pub fn internal<E: fmt::Display>(err: E) -> Self {
            log::error!("internal error: {}", err);
            Self::new("Something went wrong", 500)
        }
    }

    impl fmt::Display for AppError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.message)
        }
    }

    impl std::error::Error for AppError {}

    impl From<deadpool_postgres::PoolError> for AppError {
        fn from(err: deadpool_postgres::PoolError) -> Self {
            Self::internal(err)
        }
    }

    impl From<tokio_postgres::Error> for AppError {
        fn from(err: tokio_postgres::Error) -> Self {
            Self::internal(err)
        }
    }

    impl From<bcrypt::BcryptError> for AppError {
        fn from(err: bcrypt::BcryptError) -> Self {
            Self::internal(err)
        }
    }

    impl From<jsonwebtoken::errors::Error> for AppError {
        fn from(err: jsonwebtoken::errors::Error) -> Self {
            Self::internal(err)
        }
    }

    impl From<serde_json::Error> for AppError {
        fn from(err: serde_json::Error) -> Self {
            Self::internal(err)
        }
    }
}

/// Response helpers
pub mod response {
    use actix_web::HttpResponse;
    use serde::Serialize;

    use super::error::AppError;

    pub fn json_response<T: Serialize>(data: T, status: u16) -> HttpResponse {
        match actix_web::http::StatusCode::from_u16(status) {
            Ok(code) => HttpResponse::build(code)
                .content_type("application/json")
                .json(data),
            Err(_) => HttpResponse::build(actix_web::http::StatusCode::INTERNAL_SERVER_ERROR)
                .content_type("application/json")
                .json(serde_json::json!({"msg": "Invalid status code"})),
        }
    }

    pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
        json_response(data, 200)
    }

    pub fn error_response(message: &str, status: u16) -> HttpResponse {
        json_response(serde_json::json!({"msg": message}), status)
    }

    pub fn app_error_response(err: &AppError) -> HttpResponse {
        error_response(&err.message, err.status_code)
    }

    /// `{"errors": [{"msg": ...}, ...]}` — the shape used by the register
    /// and login endpoints for every failure.
    pub fn error_list_response(errors: Vec<String>, status: u16) -> HttpResponse {
        let entries: Vec<serde_json::Value> = errors
            .into_iter()
            .map(|msg| serde_json::json!({"msg": msg}))
            .collect();
        json_response(serde_json::json!({"errors": entries}), status)
    }

    /// Field-level validation failures, one `{"msg": ...}` entry each.
    pub fn validation_error_response(errors: Vec<String>) -> HttpResponse {
        error_list_response(errors, 400)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gravatar_url_is_deterministic_and_normalized() {
        let a = gravatar::url("Ada@Example.com ");
        let b = gravatar::url("ada@example.com");
        assert_eq!(a, b);
        assert!(a.starts_with("https://www.gravatar.com/avatar/"));
        assert!(a.ends_with("?s=200&d=mm&r=pg"));
    }

    #[test]
    fn gravatar_hash_matches_known_vector() {
        // md5("ada@example.com") = 3e3417d7ef77d5932a6734b916515ed5
        assert_eq!(
            gravatar::url("ada@example.com"),
            "https://www.gravatar.com/avatar/3e3417d7ef77d5932a6734b916515ed5?s=200&d=mm&r=pg"
        );
    }

    #[test]
    fn validate_uuid_rejects_garbage() {
        assert!(validate_uuid("not-a-uuid").is_err());
        assert!(validate_uuid("7c9e6679-7425-40de-944b-e07fc1f90ae7").is_ok());
    }
}
