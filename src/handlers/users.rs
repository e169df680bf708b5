use actix_web::{web, HttpResponse, Result};
use std::sync::Arc;
use validator::Validate;

use super::flatten_validation_errors;
use crate::models::RegisterRequest;
use crate::services::UserService;
use crate::utils;

/// Register endpoint: POST /api/v1/users
pub async fn register_user(
    req: web::Json<RegisterRequest>,
    user_service: web::Data<Arc<UserService>>,
) -> Result<HttpResponse> {
    let r = req.into_inner();
    if let Err(e) = r.validate() {
        return Ok(utils::response::validation_error_response(
            flatten_validation_errors(e),
        ));
    }

    match user_service.register(r).await {
        Ok(response) => Ok(utils::response::success_response(response)),
        // Duplicate email and server errors share the errors-array shape.
        Err(err) => Ok(utils::response::error_list_response(
            vec![err.message],
            err.status_code,
        )),
    }
}
