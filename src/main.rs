mod api;
mod config;
mod database;
mod middleware;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{
    middleware::{DefaultHeaders, Logger},
    web, App, HttpServer,
};
use dotenv::dotenv;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::services::fixture_service::FixtureStore;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("❌ {}", e);
            log::error!("Please check your .env file and ensure all required variables are set.");
            std::process::exit(1);
        }
    };
    log::info!("✓ All required environment variables are present");

    log::info!("🚀 Starting Recipe Service...");

    // Connection failures are retried inside `connect`; giving up is fatal.
    let db = match database::MongoDB::connect(&config.mongodb_uri).await {
        Ok(db) => db,
        Err(e) => {
            log::error!("❌ MongoDB connection failed after all retries: {}", e);
            std::process::exit(1);
        }
    };
    log::info!("✅ MongoDB connected successfully");

    let fixtures = FixtureStore::load(&config);
    if config.use_mock_data && !fixtures.has_search_data() {
        log::error!(
            "❌ USE_MOCK_DATA is enabled but no mock data could be loaded from {}",
            config.mock_data_path
        );
        std::process::exit(1);
    }

    let host = config.host.clone();
    let port = config.port.clone();

    let db_data = web::Data::new(db);
    let config_data = web::Data::new(config);
    let fixtures_data = web::Data::new(fixtures);

    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!(
        "📚 Swagger UI available at: http://{}:{}/swagger-ui/",
        host,
        port
    );

    // Start HTTP server
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin("http://localhost:3000")
            .allowed_origin("http://localhost:5173")
            .allowed_origin("http://127.0.0.1:3000")
            .allowed_origin("http://127.0.0.1:5173")
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .supports_credentials()
            .max_age(3600);

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(db_data.clone())
            .app_data(config_data.clone())
            .app_data(fixtures_data.clone())
            .wrap(cors)
            // The Auth0 login popup needs a relaxed opener policy
            .wrap(
                DefaultHeaders::new()
                    .add(("Cross-Origin-Opener-Policy", "unsafe-none"))
                    .add(("Cross-Origin-Embedder-Policy", "unsafe-none")),
            )
            .wrap(Logger::default())
            // Swagger UI
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            )
            .route("/", web::get().to(api::root::welcome))
            .route("/health", web::get().to(api::health::health_check))
            .service(
                web::resource("/protected")
                    .wrap(middleware::auth::AuthMiddleware)
                    .route(web::get().to(api::root::protected_probe)),
            )
            // User sync after Auth0 login
            .service(
                web::scope("/api/users")
                    .wrap(middleware::auth::AuthMiddleware)
                    .route("", web::post().to(api::users::sync_user))
                    .route("/me", web::get().to(api::users::get_me)),
            )
            .service(
                web::scope("/api/recipes")
                    // Literal routes first; the {recipe_id} catch-all goes last
                    .route("/search", web::get().to(api::recipes::search_recipes))
                    .route("/random", web::get().to(api::recipes::random_recipes))
                    .route(
                        "/autocomplete",
                        web::get().to(api::recipes::autocomplete_search),
                    )
                    .route("/bulk-details", web::post().to(api::recipes::bulk_details))
                    .service(
                        web::scope("/favorites")
                            .wrap(middleware::auth::AuthMiddleware)
                            .route("", web::get().to(api::favorites::get_favorites))
                            .route("", web::post().to(api::favorites::set_favorites))
                            .route("", web::delete().to(api::favorites::remove_favorites)),
                    )
                    .service(
                        web::scope("/search-history")
                            .wrap(middleware::auth::AuthMiddleware)
                            .route("", web::get().to(api::search_history::get_search_history))
                            .route("", web::post().to(api::search_history::add_search_history))
                            .route(
                                "",
                                web::delete().to(api::search_history::remove_search_history),
                            ),
                    )
                    .service(
                        web::scope("/viewed")
                            .wrap(middleware::auth::AuthMiddleware)
                            .route("/count", web::get().to(api::viewed::viewed_count))
                            .route("", web::get().to(api::viewed::get_viewed))
                            .route("", web::post().to(api::viewed::mark_viewed)),
                    )
                    .route("/{recipe_id}", web::get().to(api::recipes::recipe_details)),
            )
    })
    .bind(format!("{}:{}", host, port))?
    .run()
    .await
}
