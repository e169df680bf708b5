use actix_web::{
    body::BoxBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::{header, Method},
    Error, HttpMessage, HttpResponse,
};

use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::sync::Arc;

use crate::auth::{extract_token_from_request, AuthService};

/// Whether the route is reachable without a session token. Everything else
/// goes through token verification.
pub fn is_public_route(method: &Method, path: &str) -> bool {
    if path == "/health" || path == "/api/v1/status" {
        return true;
    }

    // Registration and login are the only public writes.
    if *method == Method::POST && (path == "/api/v1/users" || path == "/api/v1/auth") {
        return true;
    }

    // Profile reads are public, except the owner's own view; this also
    // covers the GitHub proxy under /profile/github/.
    if *method == Method::GET {
        if path == "/api/v1/profile" {
            return true;
        }
        if let Some(rest) = path.strip_prefix("/api/v1/profile/") {
            return rest != "me";
        }
    }

    false
}

/// Authentication middleware: verifies the `x-auth-token` header on
/// protected routes and injects the decoded claims into the request
/// extensions.
pub struct AuthMiddleware {
    pub auth_service: Arc<AuthService>,
}

impl<S> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error>,
    S: 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Arc::new(service),
            auth_service: Arc::clone(&self.auth_service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Arc<S>,
    auth_service: Arc<AuthService>,
}

impl<S> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error>,
    S: 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Arc::clone(&self.service);
        let auth_service = Arc::clone(&self.auth_service);

        Box::pin(async move {
            if is_public_route(req.method(), req.path()) {
                return service.call(req).await;
            }

            let token = match extract_token_from_request(&req) {
                Some(token) => token,
                None => {
                    let response = HttpResponse::Unauthorized().json(
                        serde_json::json!({"msg": "Authentication failed, Token required"}),
                    );
                    return Ok(req.into_response(response));
                }
            };

            match auth_service.validate_token(&token) {
                Ok(claims) => {
                    req.extensions_mut().insert(claims);
                    service.call(req).await
                }
                Err(_) => {
                    let response = HttpResponse::Unauthorized()
                        .json(serde_json::json!({"msg": "Token Invalid"}));
                    Ok(req.into_response(response))
                }
            }
        })
    }
}

/// CORS middleware
pub struct CorsMiddleware {
    pub allowed_origins: Vec<String>,
}

impl<S> Transform<S, ServiceRequest> for CorsMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error>,
    S: 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = CorsMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CorsMiddlewareService {
            service: Arc::new(service),
            allowed_origins: self.allowed_origins.clone(),
        }))
    }
}

pub struct CorsMiddlewareService<S> {
    service: Arc<S>,
    allowed_origins: Vec<String>,
}

impl<S> Service<ServiceRequest> for CorsMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error>,
    S: 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Arc::clone(&self.service);
        let allowed_origins = self.allowed_origins.clone();

        Box::pin(async move {
            let mut res = service.call(req).await?;

            let origin_header = res.request().headers().get("origin").cloned();
            let headers = res.headers_mut();

            if let Some(origin) = origin_header {
                if let Ok(origin_str) = origin.to_str() {
                    if allowed_origins.contains(&origin_str.to_string())
                        || allowed_origins.contains(&"*".to_string())
                    {
                        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
                    }
                }
            }

            headers.insert(
                header::ACCESS_CONTROL_ALLOW_METHODS,
                header::HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
            );

            headers.insert(
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                header::HeaderValue::from_static("Content-Type, x-auth-token, X-Requested-With"),
            );

            Ok(res)
        })
    }
}

/// Logging middleware
pub struct LoggingMiddleware;

impl<S> Transform<S, ServiceRequest> for LoggingMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error>,
    S: 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = LoggingMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(LoggingMiddlewareService {
            service: Arc::new(service),
        }))
    }
}

pub struct LoggingMiddlewareService<S> {
    service: Arc<S>,
}

impl<S> Service<ServiceRequest> for LoggingMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error>,
    S: 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Arc::clone(&self.service);
        let start_time = std::time::Instant::now();
        let method = req.method().clone();
        let uri = req.uri().clone();
        let remote_addr = req
            .connection_info()
            .peer_addr()
            .unwrap_or("unknown")
            .to_string();

        Box::pin(async move {
            let result = service.call(req).await;
            let duration = start_time.elapsed();

            match &result {
                Ok(res) => {
                    log::info!(
                        "{} {} {} {}ms from {}",
                        method,
                        uri,
                        res.status().as_u16(),
                        duration.as_millis(),
                        remote_addr
                    );
                }
                Err(err) => {
                    log::error!(
                        "{} {} failed: {} {}ms from {}",
                        method,
                        uri,
                        err,
                        duration.as_millis(),
                        remote_addr
                    );
                }
            }

            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_and_status_are_public() {
        assert!(is_public_route(&Method::GET, "/health"));
        assert!(is_public_route(&Method::GET, "/api/v1/status"));
    }

    #[test]
    fn register_and_login_are_public_posts_only() {
        assert!(is_public_route(&Method::POST, "/api/v1/users"));
        assert!(is_public_route(&Method::POST, "/api/v1/auth"));
        // Current-user read requires a token.
        assert!(!is_public_route(&Method::GET, "/api/v1/auth"));
    }

    #[test]
    fn profile_reads_are_public_except_own_view() {
        assert!(is_public_route(&Method::GET, "/api/v1/profile"));
        assert!(is_public_route(
            &Method::GET,
            "/api/v1/profile/7c9e6679-7425-40de-944b-e07fc1f90ae7"
        ));
        assert!(is_public_route(&Method::GET, "/api/v1/profile/github/octocat"));
        assert!(!is_public_route(&Method::GET, "/api/v1/profile/me"));
    }

    #[test]
    fn profile_writes_are_protected() {
        assert!(!is_public_route(&Method::POST, "/api/v1/profile"));
        assert!(!is_public_route(&Method::DELETE, "/api/v1/profile"));
        assert!(!is_public_route(&Method::PUT, "/api/v1/profile/experience"));
        assert!(!is_public_route(&Method::DELETE, "/api/v1/profile/education/x"));
    }

    #[test]
    fn post_routes_are_protected() {
        assert!(!is_public_route(&Method::GET, "/api/v1/posts"));
        assert!(!is_public_route(&Method::POST, "/api/v1/posts"));
        assert!(!is_public_route(&Method::PUT, "/api/v1/posts/like/x"));
        assert!(!is_public_route(&Method::DELETE, "/api/v1/posts/comment/x/y"));
    }
}
