//! Shared helpers for the Amity conformance test suite.
//!
//! Provides [`spawn_node`] — a function that binds a `TcpListener` on an
//! ephemeral port, wires up an in-process node backed by `MemoryStorage`,
//! and returns both the local URL and a reference to the underlying storage
//! so tests can inspect rows without going through the HTTP layer.

use std::sync::Arc;

use amity_node::{build_router, MemoryStorage, RelationService, Storage};

/// Start an ephemeral in-process node and return `(base_url, storage)`.
///
/// The node runs in a background `tokio` task and is bound to an OS-assigned
/// port on `127.0.0.1`. The returned `String` is the server root, e.g.
/// `http://127.0.0.1:51234`. The returned `Arc<MemoryStorage>` is the same
/// storage instance the node uses.
///
/// # Panics
///
/// Panics if the TCP listener cannot be bound or the node fails to start.
pub async fn spawn_node() -> (String, Arc<MemoryStorage>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("get local addr");
    let base_url = format!("http://{addr}");

    let mem_storage = Arc::new(MemoryStorage::new());
    let storage: Arc<dyn Storage> = Arc::clone(&mem_storage) as Arc<dyn Storage>;
    let router = build_router(Arc::new(RelationService::new(storage)));

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("conformance node error");
    });

    (base_url, mem_storage)
}
