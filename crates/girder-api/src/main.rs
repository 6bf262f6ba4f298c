mod api_doc;
mod auth;
mod error;
mod external;
mod handlers;
mod setup;
mod state;
mod telemetry;

use girder_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    telemetry::init_telemetry();

    let (_state, router) = setup::initialize_app(config.clone()).await?;

    setup::server::start_server(&config, router).await?;

    Ok(())
}
