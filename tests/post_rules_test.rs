#[cfg(test)]
mod tests {
    use actix_web::{test, web, App, HttpRequest, HttpResponse, Result as ActixResult};
    use chrono::Utc;
    use std::sync::Mutex;
    use uuid::Uuid;

    use devconnect_api::models::{Like, Post};

    // In-memory post store exercising the like/unlike/delete business rules
    // at the HTTP contract level (the production path enforces the same
    // rules in single SQL statements).
    struct TestStore {
        posts: Mutex<Vec<Post>>,
    }

    fn sample_post(author: Uuid) -> Post {
        Post {
            id: Uuid::new_v4(),
            user: author,
            name: "Ada".to_string(),
            avatar: "https://www.gravatar.com/avatar/x".to_string(),
            text: "hello world".to_string(),
            likes: Vec::new(),
            comments: Vec::new(),
            created_at: Utc::now(),
        }
    }

    fn acting_user(req: &HttpRequest) -> Uuid {
        req.headers()
            .get("x-user")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| Uuid::parse_str(v).ok())
            .expect("test requests always set x-user")
    }

    async fn like_post(
        req: HttpRequest,
        path: web::Path<Uuid>,
        store: web::Data<TestStore>,
    ) -> ActixResult<HttpResponse> {
        let user = acting_user(&req);
        let mut posts = store.posts.lock().unwrap();
        let post = match posts.iter_mut().find(|p| p.id == *path) {
            Some(post) => post,
            None => {
                return Ok(HttpResponse::BadRequest()
                    .json(serde_json::json!({"msg": "Post not exist"})))
            }
        };

        if post.likes.iter().any(|l| l.user == user) {
            return Ok(HttpResponse::BadRequest()
                .json(serde_json::json!({"msg": "Post already liked"})));
        }

        post.likes.push(Like { user });
        Ok(HttpResponse::Ok()
            .json(serde_json::json!({"success": true, "likes": &post.likes})))
    }

    async fn unlike_post(
        req: HttpRequest,
        path: web::Path<Uuid>,
        store: web::Data<TestStore>,
    ) -> ActixResult<HttpResponse> {
        let user = acting_user(&req);
        let mut posts = store.posts.lock().unwrap();
        let post = match posts.iter_mut().find(|p| p.id == *path) {
            Some(post) => post,
            None => {
                return Ok(HttpResponse::BadRequest()
                    .json(serde_json::json!({"msg": "Post not exist"})))
            }
        };

        if !post.likes.iter().any(|l| l.user == user) {
            return Ok(HttpResponse::BadRequest()
                .json(serde_json::json!({"msg": "Post has not liked"})));
        }

        post.likes.retain(|l| l.user != user);
        Ok(HttpResponse::Ok()
            .json(serde_json::json!({"success": true, "likes": &post.likes})))
    }

    async fn delete_post(
        req: HttpRequest,
        path: web::Path<Uuid>,
        store: web::Data<TestStore>,
    ) -> ActixResult<HttpResponse> {
        let user = acting_user(&req);
        let mut posts = store.posts.lock().unwrap();
        let post = match posts.iter().find(|p| p.id == *path) {
            Some(post) => post.clone(),
            None => {
                return Ok(HttpResponse::BadRequest()
                    .json(serde_json::json!({"msg": "Post not exist"})))
            }
        };

        if post.user != user {
            return Ok(HttpResponse::Unauthorized()
                .json(serde_json::json!({"msg": "You are not authorize to delete this post"})));
        }

        posts.retain(|p| p.id != post.id);
        Ok(HttpResponse::Ok().json(serde_json::json!({"success": true, "data": post})))
    }

    fn store_with(post: Post) -> web::Data<TestStore> {
        web::Data::new(TestStore {
            posts: Mutex::new(vec![post]),
        })
    }

    #[actix_rt::test]
    async fn second_like_by_same_user_is_rejected() {
        let liker = Uuid::new_v4();
        let post = sample_post(Uuid::new_v4());
        let post_id = post.id;
        let store = store_with(post);
        let app = test::init_service(
            App::new()
                .app_data(store)
                .route("/posts/like/{id}", web::put().to(like_post)),
        )
        .await;

        let req = test::TestRequest::put()
            .uri(&format!("/posts/like/{}", post_id))
            .insert_header(("x-user", liker.to_string()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["likes"].as_array().unwrap().len(), 1);

        let req = test::TestRequest::put()
            .uri(&format!("/posts/like/{}", post_id))
            .insert_header(("x-user", liker.to_string()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["msg"], "Post already liked");
    }

    #[actix_rt::test]
    async fn unliking_a_never_liked_post_is_rejected() {
        let post = sample_post(Uuid::new_v4());
        let post_id = post.id;
        let store = store_with(post);
        let app = test::init_service(
            App::new()
                .app_data(store)
                .route("/posts/unlike/{id}", web::put().to(unlike_post)),
        )
        .await;

        let req = test::TestRequest::put()
            .uri(&format!("/posts/unlike/{}", post_id))
            .insert_header(("x-user", Uuid::new_v4().to_string()))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["msg"], "Post has not liked");
    }

    #[actix_rt::test]
    async fn like_then_unlike_returns_to_empty() {
        let liker = Uuid::new_v4();
        let post = sample_post(Uuid::new_v4());
        let post_id = post.id;
        let store = store_with(post);
        let app = test::init_service(
            App::new()
                .app_data(store)
                .route("/posts/like/{id}", web::put().to(like_post))
                .route("/posts/unlike/{id}", web::put().to(unlike_post)),
        )
        .await;

        let req = test::TestRequest::put()
            .uri(&format!("/posts/like/{}", post_id))
            .insert_header(("x-user", liker.to_string()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let req = test::TestRequest::put()
            .uri(&format!("/posts/unlike/{}", post_id))
            .insert_header(("x-user", liker.to_string()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["likes"].as_array().unwrap().len(), 0);
    }

    #[actix_rt::test]
    async fn only_the_author_may_delete_a_post() {
        let author = Uuid::new_v4();
        let stranger = Uuid::new_v4();
        let post = sample_post(author);
        let post_id = post.id;
        let store = store_with(post);
        let app = test::init_service(
            App::new()
                .app_data(store.clone())
                .route("/posts/{id}", web::delete().to(delete_post)),
        )
        .await;

        let req = test::TestRequest::delete()
            .uri(&format!("/posts/{}", post_id))
            .insert_header(("x-user", stranger.to_string()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["msg"], "You are not authorize to delete this post");

        // The rejected delete left the post in place.
        assert_eq!(store.posts.lock().unwrap().len(), 1);

        let req = test::TestRequest::delete()
            .uri(&format!("/posts/{}", post_id))
            .insert_header(("x-user", author.to_string()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        assert_eq!(store.posts.lock().unwrap().len(), 0);
    }
}
