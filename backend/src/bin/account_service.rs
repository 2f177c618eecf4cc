//! Account service entry-point.

use account_platform::server::{self, ServiceKind};

#[actix_web::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    server::init_tracing();
    server::run(ServiceKind::Accounts).await?;
    Ok(())
}
