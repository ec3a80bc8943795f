use actix_cors::Cors;
use actix_web::{error, http::StatusCode, middleware, web, App, HttpResponse, HttpServer};
use match_questions::config::{LoggingSettings, Settings};
use match_questions::routes::{self, auth::JwtKeys, AppState};
use match_questions::services::{CacheKey, CacheManager, Fixture, PostgresClient};
use std::sync::Arc;
use tracing::{error, info, warn};

/// JSON error response for JSON payload errors
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl error::ResponseError for JsonError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST)).json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "invalid_query".to_string(),
        message: format!("Invalid query: {}", err),
        status_code: 400,
    }
    .into()
}

/// Handle path segments that fail to parse, e.g. `/questions/abc`
pub fn handle_path_error(err: error::PathError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    JsonError {
        error: "not_found".to_string(),
        message: format!("Invalid path: {}", err),
        status_code: 404,
    }
    .into()
}

fn init_logging(logging: &LoggingSettings) {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&logging.level))
        .with_target(false)
        .with_level(true);

    if logging.pretty() {
        subscriber.pretty().init();
    } else {
        subscriber.init();
    }
}

fn io_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    error!("{}: {}", context, err);
    std::io::Error::new(std::io::ErrorKind::Other, format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    // Logging is configured by the settings, so failures here go to stderr only
    let settings = Settings::load().map_err(|e| {
        std::io::Error::new(std::io::ErrorKind::Other, format!("Configuration error: {}", e))
    })?;

    init_logging(&settings.logging);

    info!("Starting match-questions service...");
    info!("Configuration loaded successfully");

    // Question statistics are cached, Redis is required
    let cache_ttl = settings.cache.ttl_secs.unwrap_or(300);
    let l1_cache_size = settings.cache.l1_cache_size.unwrap_or(1000);

    let cache = Arc::new(
        CacheManager::new(&settings.cache.redis_url, l1_cache_size, cache_ttl)
            .await
            .map_err(|e| io_error("Redis connection required", e))?,
    );

    info!("Cache manager initialized (L1: {} entries, TTL: {}s)", l1_cache_size, cache_ttl);

    let db_max_conn = settings.database.max_connections.unwrap_or(10);
    let db_min_conn = settings.database.min_connections.unwrap_or(1);

    let postgres = Arc::new(
        PostgresClient::from_settings(
            &settings.database.url,
            Some(db_max_conn),
            Some(db_min_conn),
            settings.database.acquire_timeout_secs,
            settings.database.idle_timeout_secs,
        )
        .await
        .map_err(|e| io_error("PostgreSQL connection error", e))?,
    );

    info!("PostgreSQL client initialized (max: {} connections)", db_max_conn);

    if let Some(path) = &settings.seed.fixture_path {
        match Fixture::load(path) {
            Ok(fixture) => {
                let inserted = postgres
                    .import_fixture(&fixture)
                    .await
                    .map_err(|e| io_error("Fixture import failed", e))?;
                if inserted > 0 {
                    if let Err(e) = cache.invalidate_pattern(CacheKey::all_question_stats()).await {
                        warn!("Failed to clear cached statistics: {}", e);
                    }
                }
                info!("Seed fixture {} applied ({} new questions)", path, inserted);
            }
            Err(e) => warn!("Skipping seed fixture {}: {}", path, e),
        }
    }

    let app_state = AppState {
        postgres,
        cache,
        auth: Arc::new(JwtKeys::new(
            settings.auth.jwt_secret.as_bytes(),
            settings.auth.issuer.clone(),
        )),
        pagination: settings.pagination.clone(),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
            .app_data(web::PathConfig::default().error_handler(handle_path_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
