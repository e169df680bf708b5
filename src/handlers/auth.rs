use actix_web::{web, HttpRequest, HttpResponse, Result};
use std::sync::Arc;
use validator::Validate;

use super::{authed_user_id, flatten_validation_errors, unauthorized};
use crate::models::LoginRequest;
use crate::services::UserService;
use crate::utils;

/// Login endpoint: POST /api/v1/auth
pub async fn login_user(
    req: web::Json<LoginRequest>,
    user_service: web::Data<Arc<UserService>>,
) -> Result<HttpResponse> {
    let r = req.into_inner();
    if let Err(e) = r.validate() {
        return Ok(utils::response::validation_error_response(
            flatten_validation_errors(e),
        ));
    }

    match user_service.login(r).await {
        Ok(response) => Ok(utils::response::success_response(response)),
        // Wrong credentials and server errors share the errors-array shape.
        Err(err) => Ok(utils::response::error_list_response(
            vec![err.message],
            err.status_code,
        )),
    }
}

/// Current-user endpoint: GET /api/v1/auth (requires x-auth-token)
pub async fn get_current_user(
    req: HttpRequest,
    user_service: web::Data<Arc<UserService>>,
) -> Result<HttpResponse> {
    let user_id = match authed_user_id(&req) {
        Some(id) => id,
        None => return Ok(unauthorized()),
    };

    match user_service.current_user(user_id).await {
        Ok(user) => Ok(utils::response::success_response(user)),
        Err(err) => Ok(utils::response::app_error_response(&err)),
    }
}
