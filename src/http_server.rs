use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use serde_json::{Value, json};
use std::{collections::BTreeMap, future::Future, net::SocketAddr};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::{
    api::{v1, v2, views::LegacyRecordView},
    store::EmulatorStore,
    zones::Zone,
};

/// HTTP front end of the emulator
pub struct HttpServer {
    store: EmulatorStore,
    bind_addr: SocketAddr,
}

impl HttpServer {
    pub fn new(store: EmulatorStore, bind_addr: SocketAddr) -> Self {
        Self { store, bind_addr }
    }

    pub async fn bind(&self) -> std::io::Result<TcpListener> {
        TcpListener::bind(self.bind_addr).await
    }

    /// Serve requests on `listener` until `shutdown_signal` resolves
    pub async fn serve<F>(self, listener: TcpListener, shutdown_signal: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!("Starting HTTP server on {}", listener.local_addr()?);

        axum::serve(listener, router(self.store))
            .with_graceful_shutdown(shutdown_signal)
            .await
    }
}

/// Build the full route table over `store`
pub fn router(store: EmulatorStore) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/debug/records", get(debug_records))
        .nest("/Services/REST/v1", v1::routes(store.clone()))
        .nest("/api/v2", v2::routes(store.clone()))
        .nest("/Services/REST/v2", v2::routes(store.clone()))
        .with_state(store)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Basic health check endpoint
async fn health_check(State(store): State<EmulatorStore>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "active_tokens": store.sessions.len(),
        "total_records": store.records.len(),
        "zones": store.zones.len(),
    }))
}

#[derive(Serialize)]
struct DebugDump {
    records: BTreeMap<u64, LegacyRecordView>,
    zones: BTreeMap<String, Zone>,
}

/// Full dump of records and zones
async fn debug_records(State(store): State<EmulatorStore>) -> Json<DebugDump> {
    let records = store
        .records
        .all()
        .iter()
        .map(|record| (record.id, LegacyRecordView::from(record)))
        .collect();
    let zones = store
        .zones
        .all()
        .iter()
        .map(|zone| (zone.name.clone(), zone.clone()))
        .collect();

    Json(DebugDump { records, zones })
}
