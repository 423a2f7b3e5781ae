use dhaba_server::{Config, Server, print_banner, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _log_guard = setup_environment()?;

    print_banner();
    tracing::info!("Dhaba Server starting...");

    let config = Config::from_env();
    tracing::info!(
        port = config.http_port,
        timezone = %config.business_timezone,
        environment = %config.environment,
        "configuration loaded"
    );

    let server = Server::new(config)?;
    server.run().await
}
