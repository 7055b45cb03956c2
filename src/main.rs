use actix_web::{middleware, web, App, HttpServer};
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use matchedge::{DecisionEngine, EngineConfig};

mod handlers;

use handlers::{evaluate, health};

/// Application state shared across handlers
pub struct AppState {
    pub engine: DecisionEngine,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }

    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let addr = format!("{}:{}", host, port);

    // Load engine configuration
    let config = match std::env::var("ENGINE_CONFIG") {
        Ok(path) => match EngineConfig::load(&path) {
            Ok(config) => {
                info!("Loaded engine configuration from {}", path);
                config
            }
            Err(e) => {
                warn!("{}. Using default configuration.", e);
                EngineConfig::default()
            }
        },
        Err(_) => EngineConfig::default(),
    };

    info!("Aggregation policy: {}", config.policy.name());

    let app_state = Arc::new(AppState {
        engine: DecisionEngine::new(config),
    });

    info!("Starting Matchedge API server at http://{}", addr);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(middleware::Logger::default())
            .route("/health", web::get().to(health::health_check))
            .route("/evaluate", web::post().to(evaluate::evaluate_match))
    })
    .bind(&addr)?
    .run()
    .await
}
