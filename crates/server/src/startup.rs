use std::path::Path;
use std::sync::Arc;

use dotenvy::dotenv;
use migration::{Migrator, MigratorTrait};
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use common::admin_http::spawn_admin_server;
use configs::AppConfig;
use proto::catalog::v1::service_catalog_server::ServiceCatalogServer;
use service::catalog::repo::seaorm::SeaOrmServiceRepository;
use service::catalog::CatalogService;
use service::remote::GrpcEntityValidator;
use service::seed::seed_initial_services;
use service::storage::ObjectStoreGateway;

use crate::errors::StartupError;
use crate::grpc::CatalogGrpc;
use crate::metrics::encode_metrics;

/// Resolves on Ctrl+C; a failed signal handler is logged and never resolves.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "ctrl_c handler unavailable, graceful shutdown disabled");
        std::future::pending::<()>().await;
    }
    info!(service = "server", event = "shutdown_signal", "received Ctrl+C, draining grpc server");
}

/// Public entry: wire dependencies and serve gRPC until Ctrl+C
pub async fn run() -> Result<(), StartupError> {
    dotenv().ok();
    let cfg = AppConfig::load_and_validate().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;

    // 数据库连接与迁移
    let db = models::db::connect_with_config(&cfg.database).await?;
    models::db::test_connection(&db).await?;
    Migrator::up(&db, None)
        .await
        .map_err(|e| StartupError::Runtime(format!("migrations failed: {e}")))?;
    info!(service = "server", event = "migrated", "database schema up to date");

    // 兄弟服务客户端（惰性连接）
    let validator = GrpcEntityValidator::connect_lazy(&cfg.remote).map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    let storage = Arc::new(ObjectStoreGateway::s3(&cfg.storage).map_err(|e| StartupError::InvalidConfig(e.to_string()))?);
    let catalog = CatalogService::new(Arc::new(SeaOrmServiceRepository::new(db)), Arc::new(validator));

    if cfg.seed.enabled {
        let created = seed_initial_services(&catalog, storage.as_ref(), Path::new(&cfg.seed.images_dir))
            .await
            .map_err(|e| StartupError::Runtime(format!("initial services: {e}")))?;
        info!(service = "server", event = "seeded", created, "initial catalog checked");
    }

    let admin = if cfg.server.admin_addr.trim().is_empty() {
        None
    } else {
        Some(spawn_admin_server(&cfg.server.admin_addr, encode_metrics).await?)
    };

    let listener = tokio::net::TcpListener::bind(cfg.server.bind_addr())
        .await
        .map_err(|e| StartupError::Runtime(format!("bind {}: {e}", cfg.server.bind_addr())))?;
    let addr = listener.local_addr().map_err(|e| StartupError::Runtime(e.to_string()))?;
    info!(service = "server", event = "listening", %addr, "grpc server listening");

    let result = Server::builder()
        .layer(TraceLayer::new_for_grpc())
        .add_service(ServiceCatalogServer::new(CatalogGrpc::new(catalog, storage)))
        .serve_with_incoming_shutdown(TcpListenerStream::new(listener), shutdown_signal())
        .await;

    if let Some(handle) = admin {
        handle.abort();
    }
    result.map_err(|e| StartupError::Runtime(format!("grpc server: {e}")))
}
