mod blog;
mod config;
mod error;
mod routes;
mod server;
mod state;
mod store;
mod telemetry;

#[tokio::main]
async fn main() {
    telemetry::setup_tracing();

    let config = match config::Config::from_env() {
        Ok(it) => it,
        Err(err) => {
            tracing::error!("invalid configuration: {err}");
            std::process::exit(1);
        }
    };

    let server = match server::run_server(&config.database_url, config.port).await {
        Ok(it) => it,
        Err(err) => {
            tracing::error!("could not start server: {err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("error waiting for ctrl-c: {err}");
    }

    if let Err(err) = server.stop().await {
        tracing::error!("error shutting down: {err}");
        std::process::exit(1);
    }
}
