//! Carros API - HTTP CRUD service for car records

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use carros_api::{
    config::Args,
    db::{MongoCarStore, MongoClient},
    server::{self, AppState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    let log_level = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("carros_api={},info", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = args.validate() {
        error!("{}", e);
        std::process::exit(1);
    }

    info!("Listen: {}", args.listen_addr());
    info!("MongoDB database: {}", args.mongodb_db);

    // Connect before binding so no request can see an unconnected store
    let mongo = match MongoClient::new(&args.mongodb_uri, &args.mongodb_db).await {
        Ok(client) => client,
        Err(e) => {
            error!("MongoDB connection failed: {}", e);
            std::process::exit(1);
        }
    };

    let state = Arc::new(AppState::new(Arc::new(MongoCarStore::new(&mongo))));

    if let Err(e) = server::run(&args, state).await {
        error!("Server error: {:?}", e);
        std::process::exit(1);
    }

    Ok(())
}
