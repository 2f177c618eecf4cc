//! Server construction and middleware wiring.
//!
//! Every binary runs the same pipeline: load [`ServiceSettings`], resolve
//! them for one [`ServiceKind`], build the matching [`ServiceState`] and
//! serve it with [`create_server`].

mod config;
mod state_builders;

pub use config::{ResolvedSettings, ServiceKind, ServiceSettings, SettingsError};
pub use state_builders::{account_state, build_service_state, statistics_state, user_state};

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use ortho_config::OrthoConfig;
use thiserror::Error;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use crate::Trace;
#[cfg(debug_assertions)]
use crate::doc::{AccountApiDoc, StatisticsApiDoc, UserApiDoc};
use crate::inbound::http::error::{json_error_handler, query_error_handler};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::state::{AccountHttpState, StatisticsHttpState, UserHttpState};
use crate::inbound::http::{accounts, statistics, users};
use crate::outbound::persistence::StoreError;

/// Errors that stop a service before it starts listening.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to load configuration: {message}")]
    Load { message: String },
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
    #[error("failed to start HTTP server: {0}")]
    Io(#[from] std::io::Error),
}

/// Driving-port state for whichever service the process runs.
#[derive(Clone)]
pub enum ServiceState {
    Accounts(web::Data<AccountHttpState>),
    Users(web::Data<UserHttpState>),
    Statistics(web::Data<StatisticsHttpState>),
}

impl ServiceState {
    fn configure(&self, cfg: &mut web::ServiceConfig) {
        match self {
            Self::Accounts(state) => {
                cfg.app_data(state.clone());
                accounts::configure(cfg);
            }
            Self::Users(state) => {
                cfg.app_data(state.clone());
                users::configure(cfg);
            }
            Self::Statistics(state) => {
                cfg.app_data(state.clone());
                statistics::configure(cfg);
            }
        }
    }

    #[cfg(debug_assertions)]
    fn openapi(&self) -> utoipa::openapi::OpenApi {
        match self {
            Self::Accounts(_) => AccountApiDoc::openapi(),
            Self::Users(_) => UserApiDoc::openapi(),
            Self::Statistics(_) => StatisticsApiDoc::openapi(),
        }
    }
}

/// Assemble the actix application for one service.
///
/// Malformed JSON bodies and query strings are answered with the standard
/// `invalid_request` error payload.
pub fn build_app(
    health_state: web::Data<HealthState>,
    service_state: ServiceState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    #[cfg(debug_assertions)]
    let openapi = service_state.openapi();

    let app = App::new()
        .app_data(health_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .wrap(Trace)
        .configure(|cfg| service_state.configure(cfg))
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi));

    app
}

/// Construct an Actix HTTP server for `service_state` on `bind_addr`.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener. The
/// health state is marked ready once the socket is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    service_state: ServiceState,
    bind_addr: std::net::SocketAddr,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), service_state.clone())
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

/// Install the JSON tracing subscriber filtered by `RUST_LOG`.
pub fn init_tracing() {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
}

/// Load configuration, wire `service` and serve it until shutdown.
///
/// # Errors
/// Returns [`StartupError`] when configuration is invalid, the store cannot
/// be prepared, or the listener fails.
pub async fn run(service: ServiceKind) -> Result<(), StartupError> {
    let settings = ServiceSettings::load()
        .map_err(|err| StartupError::Load {
            message: err.to_string(),
        })?
        .resolve(service)?;
    let service_state = build_service_state(&settings).await?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), service_state, settings.bind_addr)?;
    info!(
        service = service.name(),
        bind_addr = %settings.bind_addr,
        in_memory = settings.in_memory,
        "listening"
    );
    let outcome = server.await;
    health_state.mark_unhealthy();
    info!(service = service.name(), "stopped");
    Ok(outcome?)
}
