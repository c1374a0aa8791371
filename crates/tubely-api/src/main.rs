use tubely_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::from_env()?;

    // Database, storage, services and routes
    let (_state, router) = tubely_api::setup::initialize_app(config.clone()).await?;

    tubely_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
