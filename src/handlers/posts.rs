use actix_web::{web, HttpRequest, HttpResponse, Result};
use std::sync::Arc;
use validator::Validate;

use super::{authed_user_id, flatten_validation_errors, unauthorized};
use crate::models::{AddCommentRequest, ApiResponse, CreatePostRequest, ListResponse};
use crate::services::PostService;
use crate::utils;

/// Post creation endpoint: POST /api/v1/posts
pub async fn create_post(
    req: HttpRequest,
    body: web::Json<CreatePostRequest>,
    post_service: web::Data<Arc<PostService>>,
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

    match post_service.create(user_id, &r.text).await {
        Ok(post) => Ok(utils::response::success_response(ApiResponse::success(post))),
        Err(err) => Ok(utils::response::app_error_response(&err)),
    }
}

/// Post listing endpoint: GET /api/v1/posts — newest first
pub async fn list_posts(post_service: web::Data<Arc<PostService>>) -> Result<HttpResponse> {
    match post_service.list().await {
        Ok(posts) => Ok(utils::response::success_response(ListResponse::new(posts))),
        Err(err) => Ok(utils::response::app_error_response(&err)),
    }
}

/// Single-post endpoint: GET /api/v1/posts/{post_id}
pub async fn get_post(
    path: web::Path<String>,
    post_service: web::Data<Arc<PostService>>,
) -> Result<HttpResponse> {
    let post_id = match utils::validate_uuid(&path.into_inner()) {
        Ok(id) => id,
        Err(_) => return Ok(utils::response::error_response("Post not Found", 400)),
    };

    match post_service.get(post_id).await {
        Ok(post) => Ok(utils::response::success_response(ApiResponse::success(post))),
        Err(err) => Ok(utils::response::app_error_response(&err)),
    }
}

/// Post deletion endpoint: DELETE /api/v1/posts/{post_id} — author only
pub async fn delete_post(
    req: HttpRequest,
    path: web::Path<String>,
    post_service: web::Data<Arc<PostService>>,
) -> Result<HttpResponse> {
    let user_id = match authed_user_id(&req) {
        Some(id) => id,
        None => return Ok(unauthorized()),
    };

    let post_id = match utils::validate_uuid(&path.into_inner()) {
        Ok(id) => id,
        Err(_) => return Ok(utils::response::error_response("Post not exist", 400)),
    };

    match post_service.delete(post_id, user_id).await {
        Ok(post) => Ok(utils::response::success_response(ApiResponse::success(post))),
        Err(err) => Ok(utils::response::app_error_response(&err)),
    }
}

/// Like endpoint: PUT /api/v1/posts/like/{id}
pub async fn like_post(
    req: HttpRequest,
    path: web::Path<String>,
    post_service: web::Data<Arc<PostService>>,
) -> Result<HttpResponse> {
    let user_id = match authed_user_id(&req) {
        Some(id) => id,
        None => return Ok(unauthorized()),
    };

    let post_id = match utils::validate_uuid(&path.into_inner()) {
        Ok(id) => id,
        Err(_) => return Ok(utils::response::error_response("Post not exist", 400)),
    };

    match post_service.like(post_id, user_id).await {
        Ok(likes) => Ok(utils::response::success_response(
            serde_json::json!({"success": true, "likes": likes}),
        )),
        Err(err) => Ok(utils::response::app_error_response(&err)),
    }
}

/// Unlike endpoint: PUT /api/v1/posts/unlike/{id}
pub async fn unlike_post(
    req: HttpRequest,
    path: web::Path<String>,
    post_service: web::Data<Arc<PostService>>,
) -> Result<HttpResponse> {
    let user_id = match authed_user_id(&req) {
        Some(id) => id,
        None => return Ok(unauthorized()),
    };

    let post_id = match utils::validate_uuid(&path.into_inner()) {
        Ok(id) => id,
        Err(_) => return Ok(utils::response::error_response("Post not exist", 400)),
    };

    match post_service.unlike(post_id, user_id).await {
        Ok(likes) => Ok(utils::response::success_response(
            serde_json::json!({"success": true, "likes": likes}),
        )),
        Err(err) => Ok(utils::response::app_error_response(&err)),
    }
}

/// Comment endpoint: POST /api/v1/posts/comment/{id}
pub async fn add_comment(
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<AddCommentRequest>,
    post_service: web::Data<Arc<PostService>>,
) -> Result<HttpResponse> {
    let user_id = match authed_user_id(&req) {
        Some(id) => id,
        None => return Ok(unauthorized()),
    };

    let post_id = match utils::validate_uuid(&path.into_inner()) {
        Ok(id) => id,
        Err(_) => return Ok(utils::response::error_response("Post not exist", 400)),
    };

    let r = body.into_inner();
    if let Err(e) = r.validate() {
        return Ok(utils::response::validation_error_response(
            flatten_validation_errors(e),
        ));
    }

    match post_service.add_comment(post_id, user_id, &r.text).await {
        Ok(comments) => Ok(utils::response::success_response(ApiResponse::success(comments))),
        Err(err) => Ok(utils::response::app_error_response(&err)),
    }
}

/// Comment removal endpoint: DELETE /api/v1/posts/comment/{id}/{comment_id}
/// — comment author only
pub async fn delete_comment(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    post_service: web::Data<Arc<PostService>>,
) -> Result<HttpResponse> {
    let user_id = match authed_user_id(&req) {
        Some(id) => id,
        None => return Ok(unauthorized()),
    };

    let (post_id_raw, comment_id_raw) = path.into_inner();
    let post_id = match utils::validate_uuid(&post_id_raw) {
        Ok(id) => id,
        Err(_) => return Ok(utils::response::error_response("Post not exist", 400)),
    };
    let comment_id = match utils::validate_uuid(&comment_id_raw) {
        Ok(id) => id,
        Err(_) => return Ok(utils::response::error_response("Comment not exist", 400)),
    };

    match post_service.remove_comment(post_id, comment_id, user_id).await {
        Ok(comments) => Ok(utils::response::success_response(ApiResponse::success(comments))),
        Err(err) => Ok(utils::response::app_error_response(&err)),
    }
}
