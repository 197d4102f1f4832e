//! REST API router and server.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

use crate::api::handlers::{
    create_schedule_handler, delete_schedule_handler, get_schedule_handler,
    list_schedules_handler, root_handler, update_schedule_handler, ApiState,
};
use crate::calendar::EventManager;
use crate::config::{Config, ServerConfig};
use crate::storage::{create_storage, RecordStore};

/// REST API configuration.
#[derive(Debug, Clone)]
pub struct RestApiConfig {
    /// Enable CORS.
    pub enable_cors: bool,
    /// Allowed origins for CORS ("*" for any).
    pub cors_origins: Vec<String>,
}

impl Default for RestApiConfig {
    fn default() -> Self {
        Self {
            enable_cors: true,
            cors_origins: vec!["*".to_string()],
        }
    }
}

impl From<&ServerConfig> for RestApiConfig {
    fn from(server: &ServerConfig) -> Self {
        Self {
            enable_cors: server.enable_cors,
            cors_origins: server.cors_origins.clone(),
        }
    }
}

fn cors_layer(config: &RestApiConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if config.cors_origins.is_empty() || config.cors_origins.iter().any(|o| o == "*") {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();
    cors.allow_origin(AllowOrigin::list(origins))
}

/// Create the REST API router.
///
/// Endpoints:
/// - GET    /                - Application name
/// - GET    /schedules       - List all events
/// - GET    /schedules/:id   - Get events by id
/// - POST   /schedules       - Create an event
/// - PUT    /schedules/:id   - Replace an event
/// - DELETE /schedules/:id   - Delete an event
pub fn create_rest_router(
    events: Arc<EventManager<dyn RecordStore>>,
    config: &RestApiConfig,
) -> Router {
    let state = Arc::new(ApiState::new(events));

    let router = Router::new()
        .route("/", get(root_handler))
        .route(
            "/schedules",
            get(list_schedules_handler).post(create_schedule_handler),
        )
        .route(
            "/schedules/:id",
            get(get_schedule_handler)
                .put(update_schedule_handler)
                .delete(delete_schedule_handler),
        )
        .with_state(state);

    if config.enable_cors {
        router.layer(cors_layer(config))
    } else {
        router
    }
}

/// Open the configured store, make sure the events table exists, and serve
/// the REST API until the process exits.
pub async fn run_rest_server(config: Config) -> anyhow::Result<()> {
    let store = create_storage(&config).await?;
    let events = Arc::new(EventManager::with_table(
        store,
        config.storage.table_name.clone(),
    ));

    if !events.init_schema().await? {
        info!("Created events table '{}'", config.storage.table_name);
    }

    let app = create_rest_router(events, &RestApiConfig::from(&config.server));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "invalid bind address {}:{}",
                config.server.host, config.server.port
            )
        })?;

    info!("Calendar REST API listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    info!("Calendar REST API shutting down");
    Ok(())
}
