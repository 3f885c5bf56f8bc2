use ledger_server::{Config, Server, ServerState, init_logger_with_file};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Environment (dotenv, logging)
    dotenv::dotenv().ok();
    let config = Config::from_env();
    init_logger_with_file(Some(&config.log_level), None);

    tracing::info!("Booking ledger server starting...");

    // 2. Initialize server state (database, migrations)
    let state = ServerState::initialize(&config).await?;

    // 3. Run the HTTP server until shutdown
    let server = Server::with_state(config, state);
    server.run().await
}
