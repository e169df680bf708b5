use actix_web::{web, App, HttpServer};
use dotenvy::dotenv;
use std::sync::Arc;

use devconnect_api::auth::AuthService;
use devconnect_api::config::AppConfig;
use devconnect_api::database::DatabaseService;
use devconnect_api::handlers;
use devconnect_api::middleware::{AuthMiddleware, CorsMiddleware, LoggingMiddleware};
use devconnect_api::services::{GithubClient, PostService, ProfileService, UserService};
use devconnect_api::utils;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment from .env (if present)
    let _ = dotenv();

    // Load configuration
    let config = AppConfig::from_env().expect("Failed to load configuration");

    // Initialize logging: rotating file + stdout, env_logger as fallback
    if let Ok(logger) = flexi_logger::Logger::try_with_str(config.logging.level.clone()) {
        let file_spec = flexi_logger::FileSpec::default()
            .directory("logs")
            .suppress_timestamp();
        let _ = logger
            .log_to_file(file_spec)
            .duplicate_to_stdout(flexi_logger::Duplicate::Info)
            .start();
    } else {
        let log_level = utils::logging::level_from_string(&config.logging.level);
        env_logger::builder()
            .filter_level(log_level)
            .format_timestamp_secs()
            .init();
    }

    log::info!("Starting DevConnect API v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Server: {}:{}", config.server.host, config.server.port);

    // Initialize database
    let db_service = Arc::new(
        DatabaseService::new(&config.database)
            .await
            .expect("Failed to initialize database"),
    );

    // Ensure tables exist (create on first run)
    if let Err(e) = db_service.init_schema().await {
        log::error!("Failed to initialize DB schema: {}", e);
    } else {
        log::info!("DB schema ensured");
    }

    // Initialize services
    let auth_service = Arc::new(AuthService::new(config.auth.clone()));
    let user_service = Arc::new(UserService::new(
        Arc::clone(&db_service),
        Arc::clone(&auth_service),
    ));
    let profile_service = Arc::new(ProfileService::new(Arc::clone(&db_service)));
    let post_service = Arc::new(PostService::new(Arc::clone(&db_service)));
    let github_client = Arc::new(
        GithubClient::new(config.github.clone()).expect("Failed to build GitHub client"),
    );

    println!("🚀 DevConnect API started!");
    println!(
        "📍 Local access: http://{}:{}",
        config.server.host, config.server.port
    );
    println!(
        "📍 Health check: http://{}:{}/health",
        config.server.host, config.server.port
    );
    println!("📝 Press Ctrl+C to stop the server");
    println!();

    let server_config = config.server.clone();
    let cors_allowed_origins = config.security.cors_allowed_origins.clone();

    // Create and run the HTTP server
    HttpServer::new(move || {
        App::new()
            // Shared data
            .app_data(web::Data::new(Arc::clone(&user_service)))
            .app_data(web::Data::new(Arc::clone(&profile_service)))
            .app_data(web::Data::new(Arc::clone(&post_service)))
            .app_data(web::Data::new(Arc::clone(&github_client)))
            // Custom middleware; the auth layer runs innermost so logging and
            // CORS also cover rejected requests
            .wrap(AuthMiddleware {
                auth_service: Arc::clone(&auth_service),
            })
            .wrap(CorsMiddleware {
                allowed_origins: cors_allowed_origins.clone(),
            })
            .wrap(LoggingMiddleware)
            // API routes; specific paths are registered before their
            // parameterized siblings
            .service(
                web::scope("/api/v1")
                    .route("/status", web::get().to(handlers::server_status))
                    .route("/users", web::post().to(handlers::register_user))
                    .service(
                        web::resource("/auth")
                            .route(web::post().to(handlers::login_user))
                            .route(web::get().to(handlers::get_current_user)),
                    )
                    .route("/profile/me", web::get().to(handlers::get_own_profile))
                    .route(
                        "/profile/github/{username}",
                        web::get().to(handlers::get_github_repos),
                    )
                    .route("/profile/experience", web::put().to(handlers::add_experience))
                    .route(
                        "/profile/experience/{id}",
                        web::delete().to(handlers::delete_experience),
                    )
                    .route("/profile/education", web::put().to(handlers::add_education))
                    .route(
                        "/profile/education/{id}",
                        web::delete().to(handlers::delete_education),
                    )
                    .service(
                        web::resource("/profile")
                            .route(web::post().to(handlers::upsert_profile))
                            .route(web::get().to(handlers::list_profiles))
                            .route(web::delete().to(handlers::delete_profile)),
                    )
                    .route(
                        "/profile/{user_id}",
                        web::get().to(handlers::get_profile_by_user_id),
                    )
                    .route("/posts/like/{id}", web::put().to(handlers::like_post))
                    .route("/posts/unlike/{id}", web::put().to(handlers::unlike_post))
                    .route("/posts/comment/{id}", web::post().to(handlers::add_comment))
                    .route(
                        "/posts/comment/{id}/{comment_id}",
                        web::delete().to(handlers::delete_comment),
                    )
                    .service(
                        web::resource("/posts")
                            .route(web::post().to(handlers::create_post))
                            .route(web::get().to(handlers::list_posts)),
                    )
                    .service(
                        web::resource("/posts/{post_id}")
                            .route(web::get().to(handlers::get_post))
                            .route(web::delete().to(handlers::delete_post)),
                    ),
            )
            // Health check (public)
            .route("/health", web::get().to(handlers::health_check))
    })
    .bind((server_config.host.clone(), server_config.port))?
    .workers(server_config.workers)
    .keep_alive(std::time::Duration::from_secs(server_config.keep_alive_seconds))
    .client_request_timeout(std::time::Duration::from_secs(
        server_config.client_timeout_seconds,
    ))
    .run()
    .await
}
