use url_guard::config::load_from_env;
use url_guard::server;
use url_guard::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = load_from_env()?;
    telemetry::init(&config)?;
    config.print_summary();

    server::run(config).await
}
