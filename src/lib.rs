pub mod app_state;
pub mod application;
pub mod config;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use app_state::AppState;
pub use config::Settings;

use domain::ports::OrderExtractor;
use infrastructure::gemini_client::{DisabledExtractor, GeminiExtractor};
use infrastructure::json_file_store::JsonFileStore;

/// Build the shared state from settings: file-backed orders and, when an API
/// key is present, the Gemini extractor.
pub fn build_state(settings: &Settings) -> web::Data<AppState> {
    let extractor: Arc<dyn OrderExtractor> = match &settings.gemini_api_key {
        Some(key) => match GeminiExtractor::new(
            &settings.gemini_base_url,
            &settings.gemini_model,
            key.clone(),
            settings.extraction_timeout,
        ) {
            Ok(client) => Arc::new(client),
            Err(e) => {
                log::error!("Could not build extraction client ({}), quick fill disabled", e);
                Arc::new(DisabledExtractor)
            }
        },
        None => {
            log::warn!("No API key configured, quick fill disabled");
            Arc::new(DisabledExtractor)
        }
    };
    let storage = Box::new(JsonFileStore::new(&settings.data_dir));
    web::Data::new(AppState::new(storage, extractor))
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    state: web::Data<AppState>,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let openapi = handlers::ApiDoc::openapi();
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Logger::default())
            .configure(handlers::configure)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
