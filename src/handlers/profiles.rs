use actix_web::{web, HttpRequest, HttpResponse, Result};
use std::sync::Arc;
use validator::Validate;

use super::{authed_user_id, flatten_validation_errors, unauthorized};
use crate::models::{
    AddEducationRequest, AddExperienceRequest, ApiResponse, ListResponse, UpsertProfileRequest,
};
use crate::services::{GithubClient, ProfileService};
use crate::utils;

/// Own-profile endpoint: GET /api/v1/profile/me
pub async fn get_own_profile(
    req: HttpRequest,
    profile_service: web::Data<Arc<ProfileService>>,
) -> Result<HttpResponse> {
    let user_id = match authed_user_id(&req) {
        Some(id) => id,
        None => return Ok(unauthorized()),
    };

    match profile_service.get_own(user_id).await {
        Ok(profile) => Ok(utils::response::success_response(ApiResponse::success(profile))),
        Err(err) => Ok(utils::response::app_error_response(&err)),
    }
}

/// Profile upsert endpoint: POST /api/v1/profile
pub async fn upsert_profile(
    req: HttpRequest,
    body: web::Json<UpsertProfileRequest>,
    profile_service: web::Data<Arc<ProfileService>>,
) -> Result<HttpResponse> {
    let user_id = match authed_user_id(&req) {
        Some(id) => id,
        None => return Ok(unauthorized()),
    };

    let r = body.into_inner();
    if let Err(e) = r.validate() {
        return Ok(utils::response::validation_error_response(
            flatten_validation_errors(e),
        ));
    }

    match profile_service.upsert(user_id, r).await {
        Ok(profile) => Ok(utils::response::success_response(ApiResponse::success(profile))),
        Err(err) => Ok(utils::response::app_error_response(&err)),
    }
}

/// Profile listing endpoint: GET /api/v1/profile
pub async fn list_profiles(
    profile_service: web::Data<Arc<ProfileService>>,
) -> Result<HttpResponse> {
    match profile_service.list().await {
        Ok(profiles) => Ok(utils::response::success_response(ListResponse::new(profiles))),
        Err(err) => Ok(utils::response::app_error_response(&err)),
    }
}

/// Profile-by-user endpoint: GET /api/v1/profile/{user_id}
pub async fn get_profile_by_user_id(
    path: web::Path<String>,
    profile_service: web::Data<Arc<ProfileService>>,
) -> Result<HttpResponse> {
    // A malformed id can't name any profile.
    let user_id = match utils::validate_uuid(&path.into_inner()) {
        Ok(id) => id,
        Err(_) => return Ok(utils::response::error_response("No Profile for given user", 400)),
    };

    match profile_service.get_by_user(user_id).await {
        Ok(profile) => Ok(utils::response::success_response(ApiResponse::success(profile))),
        Err(err) => Ok(utils::response::app_error_response(&err)),
    }
}

/// Profile deletion endpoint: DELETE /api/v1/profile — removes the profile
/// and the owning user record
pub async fn delete_profile(
    req: HttpRequest,
    profile_service: web::Data<Arc<ProfileService>>,
) -> Result<HttpResponse> {
    let user_id = match authed_user_id(&req) {
        Some(id) => id,
        None => return Ok(unauthorized()),
    };

    match profile_service.delete_own(user_id).await {
        Ok(()) => Ok(utils::response::success_response(
            serde_json::json!({"msg": "Profile deleted"}),
        )),
        Err(err) => Ok(utils::response::app_error_response(&err)),
    }
}

/// Experience append endpoint: PUT /api/v1/profile/experience
pub async fn add_experience(
    req: HttpRequest,
    body: web::Json<AddExperienceRequest>,
    profile_service: web::Data<Arc<ProfileService>>,
) -> Result<HttpResponse> {
    let user_id = match authed_user_id(&req) {
        Some(id) => id,
        None => return Ok(unauthorized()),
    };

    let r = body.into_inner();
    if let Err(e) = r.validate() {
        return Ok(utils::response::validation_error_response(
            flatten_validation_errors(e),
        ));
    }

    match profile_service.add_experience(user_id, r).await {
        Ok(profile) => Ok(utils::response::success_response(ApiResponse::success(profile))),
        Err(err) => Ok(utils::response::app_error_response(&err)),
    }
}

/// Experience removal endpoint: DELETE /api/v1/profile/experience/{id}
pub async fn delete_experience(
    req: HttpRequest,
    path: web::Path<String>,
    profile_service: web::Data<Arc<ProfileService>>,
) -> Result<HttpResponse> {
    let user_id = match authed_user_id(&req) {
        Some(id) => id,
        None => return Ok(unauthorized()),
    };

    let entry_id = match utils::validate_uuid(&path.into_inner()) {
        Ok(id) => id,
        Err(msg) => return Ok(utils::response::error_response(&msg, 400)),
    };

    match profile_service.remove_experience(user_id, entry_id).await {
        Ok(profile) => Ok(utils::response::success_response(ApiResponse::success(profile))),
        Err(err) => Ok(utils::response::app_error_response(&err)),
    }
}

/// Education append endpoint: PUT /api/v1/profile/education
pub async fn add_education(
    req: HttpRequest,
    body: web::Json<AddEducationRequest>,
    profile_service: web::Data<Arc<ProfileService>>,
) -> Result<HttpResponse> {
    let user_id = match authed_user_id(&req) {
        Some(id) => id,
        None => return Ok(unauthorized()),
    };

    let r = body.into_inner();
    if let Err(e) = r.validate() {
        return Ok(utils::response::validation_error_response(
            flatten_validation_errors(e),
        ));
    }

    match profile_service.add_education(user_id, r).await {
        Ok(profile) => Ok(utils::response::success_response(ApiResponse::success(profile))),
        Err(err) => Ok(utils::response::app_error_response(&err)),
    }
}

/// Education removal endpoint: DELETE /api/v1/profile/education/{id}
pub async fn delete_education(
    req: HttpRequest,
    path: web::Path<String>,
    profile_service: web::Data<Arc<ProfileService>>,
) -> Result<HttpResponse> {
    let user_id = match authed_user_id(&req) {
        Some(id) => id,
        None => return Ok(unauthorized()),
    };

    let entry_id = match utils::validate_uuid(&path.into_inner()) {
        Ok(id) => id,
        Err(msg) => return Ok(utils::response::error_response(&msg, 400)),
    };

    match profile_service.remove_education(user_id, entry_id).await {
        Ok(profile) => Ok(utils::response::success_response(ApiResponse::success(profile))),
        Err(err) => Ok(utils::response::app_error_response(&err)),
    }
}

/// GitHub repository proxy: GET /api/v1/profile/github/{username}
pub async fn get_github_repos(
    path: web::Path<String>,
    github: web::Data<Arc<GithubClient>>,
) -> Result<HttpResponse> {
    match github.user_repos(&path.into_inner()).await {
        Ok(repos) => Ok(utils::response::success_response(repos)),
        Err(err) => Ok(utils::response::app_error_response(&err)),
    }
}
