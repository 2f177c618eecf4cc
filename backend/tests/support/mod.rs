//! Shared helpers for running services in-process.

use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use account_platform::domain::StatisticsEmitter;
use account_platform::inbound::http::health::HealthState;
use account_platform::outbound::http::HttpStatisticsSink;
use account_platform::server::{ServiceState, build_app};
use actix_web::dev::ServerHandle;
use actix_web::{HttpServer, web};
use mockable::{Clock, DefaultClock};
use reqwest::Url;

/// A service listening on an ephemeral localhost port.
pub struct RunningService {
    pub base_url: Url,
    handle: ServerHandle,
}

impl RunningService {
    /// Absolute URL for `path` on this service.
    pub fn url(&self, path: &str) -> Url {
        self.base_url.join(path).expect("joinable path")
    }

    pub async fn stop(self) {
        self.handle.stop(true).await;
    }
}

/// Serve `state` on `127.0.0.1:0` from the current actix system.
pub fn spawn_service(state: ServiceState) -> RunningService {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local address");
    let health = web::Data::new(HealthState::new());
    health.mark_ready();

    let server = HttpServer::new(move || build_app(health.clone(), state.clone()))
        .workers(1)
        .listen(listener)
        .expect("listen on ephemeral port")
        .run();
    let handle = server.handle();
    actix_web::rt::spawn(server);

    RunningService {
        base_url: Url::parse(&format!("http://{addr}/")).expect("service URL"),
        handle,
    }
}

/// Base URL on which nothing is listening.
pub fn unreachable_url() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local address");
    drop(listener);
    Url::parse(&format!("http://{addr}/")).expect("unreachable URL")
}

pub fn system_clock() -> Arc<dyn Clock> {
    Arc::new(DefaultClock)
}

/// Inline emitter publishing to the statistics service at `base_url`.
pub fn inline_emitter(base_url: Url) -> StatisticsEmitter {
    let sink = HttpStatisticsSink::new(base_url, Duration::from_secs(5)).expect("statistics client");
    StatisticsEmitter::new(Arc::new(sink))
}
