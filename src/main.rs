use std::sync::Arc;

use address_book::api::{self, AppState};
use address_book::config::Config;
use address_book::{Error, Server, telemetry};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let config = Config::from_env()?;
    telemetry::init(config.environment);
    config.log_loaded();

    let state = Arc::new(AppState::from_config(&config));
    Server::bind(config.socket_addr())
        .serve(api::router(state))
        .await
}
