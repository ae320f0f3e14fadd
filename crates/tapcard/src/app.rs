use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::config::Config;
use crate::controllers::AppState;
use crate::extractors::Json;
use crate::migrations::Migrator;
use crate::openapi::ApiDoc;
use crate::routing;

const API_DOCS_PATH: &str = "/api-docs";
const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

/// What `--migrate` / `--rollback [n]` on the command line asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbCommand {
    Migrate,
    Rollback(u32),
}

/// Parse database CLI flags. `--rollback` without a count rolls back one step.
pub fn parse_db_command(args: &[String]) -> Option<DbCommand> {
    if args.iter().any(|arg| arg == "--migrate") {
        return Some(DbCommand::Migrate);
    }
    let pos = args.iter().position(|arg| arg == "--rollback")?;
    let steps = args
        .get(pos + 1)
        .and_then(|n| n.parse::<u32>().ok())
        .unwrap_or(1);
    Some(DbCommand::Rollback(steps))
}

/// The TapCard application: configuration plus a migrated database.
pub struct App {
    pub config: Config,
    pub db: DatabaseConnection,
}

impl App {
    /// Build the application from environment configuration.
    pub async fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let config = Config::from_env()?;
        Self::with_config(config).await
    }

    /// Connect and run pending migrations.
    pub async fn with_config(config: Config) -> Result<Self, Box<dyn std::error::Error>> {
        let db = crate::db::connect(&config).await?;

        tracing::info!("Running pending database migrations...");
        Migrator::up(&db, None).await?;
        tracing::info!("Migrations complete.");

        Ok(App { config, db })
    }

    /// Run a database CLI command against `config`'s database.
    pub async fn run_db_command(
        config: &Config,
        command: DbCommand,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let db = crate::db::connect(config).await?;
        match command {
            DbCommand::Migrate => {
                tracing::info!("Running pending database migrations...");
                Migrator::up(&db, None).await?;
                tracing::info!("Migrations complete.");
            }
            DbCommand::Rollback(steps) => {
                tracing::info!("Rolling back {} migration(s)...", steps);
                Migrator::down(&db, Some(steps)).await?;
                tracing::info!("Rollback complete.");
            }
        }
        Ok(())
    }

    pub fn state(&self) -> AppState {
        AppState {
            db: self.db.clone(),
            config: Arc::new(self.config.clone()),
        }
    }

    /// Build the full router: API routes, health, docs and middleware.
    pub fn router(&self) -> Router {
        let openapi_spec = ApiDoc::openapi();
        let openapi_json = openapi_spec.clone();

        let mut router = Router::new()
            .route("/health", get(health))
            .merge(routing::build_routes().with_state(self.state()))
            .merge(Scalar::with_url(API_DOCS_PATH, openapi_spec))
            .route(
                OPENAPI_JSON_PATH,
                get(move || {
                    let spec = openapi_json.clone();
                    async move { axum::Json(spec) }
                }),
            )
            .layer(CorsLayer::permissive());

        // Request ids and HTTP spans only in development.
        if self.config.is_dev() {
            use tower_http::LatencyUnit;
            use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse};

            let x_request_id = axum::http::HeaderName::from_static("x-request-id");
            router = router
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(PropagateRequestIdLayer::new(x_request_id))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(tracing::Level::INFO))
                        .on_request(DefaultOnRequest::new().level(tracing::Level::INFO))
                        .on_response(
                            DefaultOnResponse::new()
                                .level(tracing::Level::INFO)
                                .latency_unit(LatencyUnit::Millis),
                        ),
                );
        }

        router
    }

    /// Serve until Ctrl+C.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        let addr = self.config.server_addr();
        let router = self.router();

        let listener = tokio::net::TcpListener::bind(&addr).await?;
        tracing::info!(
            "TapCard server running on http://{} (docs at {})",
            addr,
            API_DOCS_PATH
        );

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install CTRL+C signal handler: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down TapCard server...");
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
}

async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}
