//! Builders wiring repositories and remote clients into per-service HTTP
//! state.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::info;

use crate::domain::ports::{
    AccountRepository, StatisticsRepository, UserDirectory, UserRepository,
};
use crate::domain::{AccountService, StatisticsEmitter, StatisticsService, UserService};
use crate::inbound::http::state::{AccountHttpState, StatisticsHttpState, UserHttpState};
use crate::outbound::http::{HttpStatisticsSink, HttpUserDirectory};
use crate::outbound::persistence::{
    InMemoryAccountRepository, InMemoryStatisticsRepository, InMemoryUserRepository,
    MongoAccountRepository, MongoStatisticsRepository, MongoStore, MongoUserRepository,
};

use super::{ResolvedSettings, ServiceKind, ServiceState, StartupError};

/// Account state over `accounts`, checking owners through `users`.
pub fn account_state<R, D>(
    accounts: Arc<R>,
    users: Arc<D>,
    emitter: StatisticsEmitter,
    clock: Arc<dyn Clock>,
) -> ServiceState
where
    R: AccountRepository + 'static,
    D: UserDirectory + 'static,
{
    let service = Arc::new(AccountService::new(accounts, users, emitter, clock));
    ServiceState::Accounts(web::Data::new(AccountHttpState::new(
        service.clone(),
        service,
    )))
}

/// User state over `users`.
pub fn user_state<R>(users: Arc<R>, emitter: StatisticsEmitter, clock: Arc<dyn Clock>) -> ServiceState
where
    R: UserRepository + 'static,
{
    let service = Arc::new(UserService::new(users, emitter, clock));
    ServiceState::Users(web::Data::new(UserHttpState::new(service.clone(), service)))
}

/// Statistics state over `events`.
pub fn statistics_state<R>(events: Arc<R>, clock: Arc<dyn Clock>) -> ServiceState
where
    R: StatisticsRepository + 'static,
{
    let service = Arc::new(StatisticsService::new(events, clock));
    ServiceState::Statistics(web::Data::new(StatisticsHttpState::new(
        service.clone(),
        service,
    )))
}

fn build_emitter(settings: &ResolvedSettings) -> Result<StatisticsEmitter, StartupError> {
    let sink = HttpStatisticsSink::new(
        settings.statistics_service_url.clone(),
        settings.remote_timeout,
    )?;
    let emitter = StatisticsEmitter::new(Arc::new(sink));
    Ok(if settings.detached_statistics {
        emitter.detached()
    } else {
        emitter
    })
}

fn build_user_directory(settings: &ResolvedSettings) -> Result<HttpUserDirectory, StartupError> {
    Ok(HttpUserDirectory::new(
        settings.user_service_url.clone(),
        settings.remote_timeout,
    )?)
}

/// Build the state for `settings.service`, connecting to MongoDB unless the
/// in-memory stores were requested.
///
/// # Errors
/// Returns [`StartupError`] when the store is unreachable, its indexes cannot
/// be created, or an outbound client cannot be constructed.
pub async fn build_service_state(settings: &ResolvedSettings) -> Result<ServiceState, StartupError> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    if settings.in_memory {
        info!(service = settings.service.name(), "using in-memory stores");
        return match settings.service {
            ServiceKind::Accounts => Ok(account_state(
                Arc::new(InMemoryAccountRepository::new()),
                Arc::new(build_user_directory(settings)?),
                build_emitter(settings)?,
                clock,
            )),
            ServiceKind::Users => Ok(user_state(
                Arc::new(InMemoryUserRepository::new()),
                build_emitter(settings)?,
                clock,
            )),
            ServiceKind::Statistics => Ok(statistics_state(
                Arc::new(InMemoryStatisticsRepository::new()),
                clock,
            )),
        };
    }

    let store = MongoStore::connect(&settings.mongo_uri, &settings.database).await?;
    store.ensure_indexes().await?;
    match settings.service {
        ServiceKind::Accounts => Ok(account_state(
            Arc::new(MongoAccountRepository::new(&store)),
            Arc::new(build_user_directory(settings)?),
            build_emitter(settings)?,
            clock,
        )),
        ServiceKind::Users => Ok(user_state(
            Arc::new(MongoUserRepository::new(&store)),
            build_emitter(settings)?,
            clock,
        )),
        ServiceKind::Statistics => Ok(statistics_state(
            Arc::new(MongoStatisticsRepository::new(&store)),
            clock,
        )),
    }
}
