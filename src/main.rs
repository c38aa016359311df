use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use sqlx::PgPool;
use std::io;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vidtube_service::auth::AuthKeys;
use vidtube_service::error::AppError;
use vidtube_service::storage::{MediaStorage, S3MediaStorage};
use vidtube_service::{db, handlers, metrics, Config};

async fn health_summary(pool: web::Data<PgPool>) -> HttpResponse {
    match sqlx::query("SELECT 1").fetch_one(pool.get_ref()).await {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "service": "vidtube-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
        Err(e) => HttpResponse::ServiceUnavailable().json(serde_json::json!({
            "status": "unhealthy",
            "error": format!("PostgreSQL connection failed: {}", e),
            "service": "vidtube-service"
        })),
    }
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut terminate =
            signal(SignalKind::terminate()).expect("Failed to install SIGTERM handler");

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = terminate.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    }
}

fn build_cors(allowed_origins: &str) -> Cors {
    let mut cors = Cors::default();
    for origin in allowed_origins.split(',') {
        let origin = origin.trim();
        if origin == "*" {
            cors = cors.allow_any_origin();
        } else if !origin.is_empty() {
            cors = cors.allowed_origin(origin);
        }
    }
    cors.allow_any_method().allow_any_header().max_age(3600)
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Configuration loading failed: {}", e);
            eprintln!("ERROR: Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting vidtube-service v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Environment: {}", config.app.env);

    // Initialize database connection pool
    let db_pool = match db::create_pool(&config.database).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Database pool creation failed: {}", e);
            eprintln!("ERROR: Failed to create database pool: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = db::run_migrations(&db_pool).await {
        tracing::error!("Database migration failed: {}", e);
        eprintln!("ERROR: Failed to run migrations: {}", e);
        std::process::exit(1);
    }
    tracing::info!("Connected to database, migrations applied");

    let storage: Arc<dyn MediaStorage> = Arc::new(S3MediaStorage::from_config(&config.storage).await);
    let storage_data: web::Data<dyn MediaStorage> = web::Data::from(storage);

    let auth_keys = web::Data::new(AuthKeys::new(&config.auth.access_token_secret));

    let bind_address = format!("{}:{}", config.app.host, config.app.port);
    tracing::info!("Starting HTTP server at {}", bind_address);

    let server = HttpServer::new(move || {
        let cors = build_cors(&config.cors.allowed_origins);

        // Video and thumbnail payloads arrive inline in the JSON body.
        let json_cfg = web::JsonConfig::default()
            .limit(64 * 1024 * 1024)
            .error_handler(|err, _req| {
                AppError::Validation(format!("Invalid request body: {}", err)).into()
            });

        App::new()
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(storage_data.clone())
            .app_data(auth_keys.clone())
            .app_data(json_cfg)
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(tracing_actix_web::TracingLogger::default())
            .route("/metrics", web::get().to(metrics::serve_metrics))
            .route("/api/v1/health", web::get().to(health_summary))
            .service(
                web::scope("/api/v1")
                    .service(
                        web::scope("/videos")
                            .service(
                                web::resource("")
                                    .route(web::get().to(handlers::list_videos))
                                    .route(web::post().to(handlers::publish_video)),
                            )
                            .service(
                                web::resource("/{video_id}")
                                    .route(web::get().to(handlers::get_video))
                                    .route(web::patch().to(handlers::update_video))
                                    .route(web::delete().to(handlers::delete_video)),
                            ),
                    )
                    .service(
                        web::scope("/comments")
                            .service(
                                web::resource("/video/{video_id}")
                                    .route(web::get().to(handlers::list_comments))
                                    .route(web::post().to(handlers::add_comment)),
                            )
                            .service(
                                web::resource("/{comment_id}")
                                    .route(web::patch().to(handlers::update_comment))
                                    .route(web::delete().to(handlers::delete_comment)),
                            ),
                    )
                    .service(
                        web::scope("/tweets")
                            .service(
                                web::resource("").route(web::post().to(handlers::create_tweet)),
                            )
                            .service(
                                web::resource("/user/{user_id}")
                                    .route(web::get().to(handlers::user_tweets)),
                            )
                            .service(
                                web::resource("/{tweet_id}")
                                    .route(web::patch().to(handlers::update_tweet))
                                    .route(web::delete().to(handlers::delete_tweet)),
                            ),
                    )
                    .service(
                        web::scope("/likes")
                            .route(
                                "/toggle/v/{video_id}",
                                web::post().to(handlers::toggle_video_like),
                            )
                            .route(
                                "/toggle/c/{comment_id}",
                                web::post().to(handlers::toggle_comment_like),
                            )
                            .route(
                                "/toggle/t/{tweet_id}",
                                web::post().to(handlers::toggle_tweet_like),
                            )
                            .route("/videos", web::get().to(handlers::liked_videos))
                            .route(
                                "/likedByUsers/{video_id}",
                                web::get().to(handlers::video_likers),
                            ),
                    )
                    .service(
                        web::scope("/subscriptions")
                            .route(
                                "/c/{channel_id}",
                                web::post().to(handlers::toggle_subscription),
                            )
                            .route(
                                "/c/{channel_id}/subscribers",
                                web::get().to(handlers::channel_subscribers),
                            )
                            .route(
                                "/u/{subscriber_id}/channels",
                                web::get().to(handlers::subscribed_channels),
                            ),
                    ),
            )
    })
    .bind(&bind_address)?
    .run();

    let server_handle = server.handle();
    let mut server_task = tokio::spawn(server);

    tokio::select! {
        result = &mut server_task => {
            return result.unwrap_or_else(|e| Err(io::Error::new(io::ErrorKind::Other, e)));
        }
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received, stopping server");
            server_handle.stop(true).await;
        }
    }

    match server_task.await {
        Ok(result) => result,
        Err(e) => Err(io::Error::new(io::ErrorKind::Other, e)),
    }
}
