use tracing::info;

use todolist::api::router;
use todolist::config::AppConfig;
use todolist::db;
use todolist::state::AppState;
use todolist::telemetry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    telemetry::init("todolist=debug");

    let config = AppConfig::new_from_env()?;

    let pool = db::connect(&config.database_url).await?;
    info!("database ready at {}", config.database_url);

    let state = AppState::new(pool)?;

    let app = router(state);

    info!("listening on http://{}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
