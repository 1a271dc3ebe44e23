use std::sync::Arc;

mod app;
mod config;
mod db;
mod error;
mod meals;
mod session;
mod state;
#[cfg(test)]
mod testing;
mod users;
mod validation;

use crate::{
    config::AppConfig,
    db::PgStore,
    meals::repo::MealStore,
    state::AppState,
    users::repo::UserStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "daily_diet=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = Arc::new(AppConfig::from_env()?);
    tracing::info!(env = ?config.env, "starting daily diet api");

    let pool = db::connect(&config).await?;
    db::migrate(&pool).await?;

    let store = Arc::new(PgStore::new(pool.clone()));
    let state = AppState::from_parts(
        config.clone(),
        store.clone() as Arc<dyn UserStore>,
        store as Arc<dyn MealStore>,
    );

    let result = app::serve(app::build_app(state), &config.addr()).await;

    pool.close().await;
    tracing::info!("database pool closed");
    result
}
