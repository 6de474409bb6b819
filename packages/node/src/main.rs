//! `amity-node` — relationship service for the Amity social graph.
//!
//! # Quick start
//!
//! ```sh
//! # In-memory node on the default port:
//! amity-node
//!
//! # Persistent SQLite node:
//! AMITY_DB=./amity.db amity-node
//!
//! # Custom bind address with a few users registered up front:
//! AMITY_BIND=127.0.0.1:9000 AMITY_SEED_USERS=andy@example.com,john@example.com amity-node
//! ```
//!
//! # Environment variables
//!
//! See [`amity_node::config::NodeConfig`] for the full list.

use std::sync::Arc;

use amity_node::{
    build_router, MemoryStorage, NodeConfig, RelationEngine, RelationService, SqliteStorage,
    Storage,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "amity_node=info,tower_http=debug".into()),
        )
        .init();

    let config = NodeConfig::from_env().unwrap_or_else(|e| panic!("invalid configuration: {e}"));

    let storage: Arc<dyn Storage> = match &config.db_path {
        Some(path) => {
            tracing::info!("storage: SQLite at {path}");
            Arc::new(
                SqliteStorage::open(path)
                    .unwrap_or_else(|e| panic!("failed to open SQLite database at {path}: {e}")),
            )
        }
        None => {
            tracing::info!("storage: in-memory (data will not survive restart)");
            Arc::new(MemoryStorage::new())
        }
    };

    let engine = Arc::new(RelationService::new(storage));

    let mut seeded = 0;
    for email in &config.seed_users {
        if !amity::is_valid_email(email) {
            tracing::warn!("skipping invalid seed email {email:?}");
            continue;
        }
        engine
            .register_user(email)
            .await
            .unwrap_or_else(|e| panic!("failed to seed user {email}: {e}"));
        seeded += 1;
    }
    if seeded > 0 {
        tracing::info!("seeded {seeded} users");
    }

    let app = build_router(engine);

    tracing::info!("listening on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {e}", config.bind_addr));

    axum::serve(listener, app).await.expect("server error");
}
