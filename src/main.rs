use dotenvy::dotenv;
use fundraiser_tracker::{build_server, build_state, Settings};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let settings = Settings::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    let state = build_state(&settings);

    log::info!(
        "Starting server at http://{}:{} (data in {})",
        settings.host,
        settings.port,
        settings.data_dir.display()
    );

    build_server(state, &settings.host, settings.port)?.await
}
