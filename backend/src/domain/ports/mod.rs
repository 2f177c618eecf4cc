//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod account_query;
mod account_repository;
mod statistics_command;
mod statistics_query;
mod statistics_repository;
mod statistics_sink;
mod user_command;
mod user_directory;
mod user_query;
mod user_repository;

pub use account_command::AccountCommand;
#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use account_query::AccountQuery;
#[cfg(test)]
pub use account_query::MockAccountQuery;
#[cfg(test)]
pub use account_repository::MockAccountRepository;
pub use account_repository::{AccountRepository, AccountRepositoryError};
#[cfg(test)]
pub use statistics_command::MockStatisticsCommand;
pub use statistics_command::StatisticsCommand;
#[cfg(test)]
pub use statistics_query::MockStatisticsQuery;
pub use statistics_query::StatisticsQuery;
#[cfg(test)]
pub use statistics_repository::MockStatisticsRepository;
pub use statistics_repository::{StatisticsRepository, StatisticsRepositoryError};
#[cfg(test)]
pub use statistics_sink::MockStatisticsSink;
pub use statistics_sink::{StatisticsSink, StatisticsSinkError};
#[cfg(test)]
pub use user_command::MockUserCommand;
pub use user_command::UserCommand;
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::{UserDirectory, UserDirectoryError, UserSummary};
#[cfg(test)]
pub use user_query::MockUserQuery;
pub use user_query::UserQuery;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
