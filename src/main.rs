use axum::ServiceExt;
use postpage::{config, routes, state};
use tower::Layer;
use tower_http::normalize_path::NormalizePathLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::Config::load()?;
    init_tracing(&config.log);

    let state = std::sync::Arc::new(state::State::from_config(&config)?);

    // build step: every known post is loaded before the first request
    let prerendered = state.prerender().await?;
    tracing::info!(prerendered, "prerendered posts");

    let app = NormalizePathLayer::trim_trailing_slash().layer(
        routes::route()
            .with_state(state)
            .layer(TraceLayer::new_for_http()),
    );

    let listener = tokio::net::TcpListener::bind(config.server.bind).await?;
    tracing::info!(addr = %config.server.bind, "serving posts");

    axum::serve(
        listener,
        ServiceExt::<axum::extract::Request>::into_make_service(app),
    )
    .await?;

    Ok(())
}

fn init_tracing(log: &config::Log) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);

    if log.json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
