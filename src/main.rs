use flowchart_api::config::AppConfig;
use flowchart_api::{build_service, routes::configure_routes};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load()?;

    let service = build_service(&config);
    let routes = configure_routes(service, &config.cors_origins);

    let addr = config.socket_addr();
    info!("Starting server on http://{}", addr);
    warp::serve(routes).run(addr).await;

    Ok(())
}
