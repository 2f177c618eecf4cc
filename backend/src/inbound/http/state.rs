//! Shared HTTP adapter state.
//!
//! HTTP handlers accept these bundles via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O. Each
//! service binary registers the one bundle it serves.

use std::sync::Arc;

use crate::domain::ports::{
    AccountCommand, AccountQuery, StatisticsCommand, StatisticsQuery, UserCommand, UserQuery,
};

/// Ports behind the `/accounts` endpoints.
#[derive(Clone)]
pub struct AccountHttpState {
    pub accounts: Arc<dyn AccountCommand>,
    pub accounts_query: Arc<dyn AccountQuery>,
}

impl AccountHttpState {
    /// Bundle the account command and query ports.
    pub fn new(accounts: Arc<dyn AccountCommand>, accounts_query: Arc<dyn AccountQuery>) -> Self {
        Self {
            accounts,
            accounts_query,
        }
    }
}

/// Ports behind the `/users` endpoints.
#[derive(Clone)]
pub struct UserHttpState {
    pub users: Arc<dyn UserCommand>,
    pub users_query: Arc<dyn UserQuery>,
}

impl UserHttpState {
    /// Bundle the user command and query ports.
    pub fn new(users: Arc<dyn UserCommand>, users_query: Arc<dyn UserQuery>) -> Self {
        Self { users, users_query }
    }
}

/// Ports behind the `/statistics` endpoints.
#[derive(Clone)]
pub struct StatisticsHttpState {
    pub statistics: Arc<dyn StatisticsCommand>,
    pub statistics_query: Arc<dyn StatisticsQuery>,
}

impl StatisticsHttpState {
    /// Bundle the statistics command and query ports.
    pub fn new(
        statistics: Arc<dyn StatisticsCommand>,
        statistics_query: Arc<dyn StatisticsQuery>,
    ) -> Self {
        Self {
            statistics,
            statistics_query,
        }
    }
}
