//! Flight Records Binary
//!
//! Serves the flight API on BIND_ADDR (default 0.0.0.0:3000) against the
//! database described by DB_URL or DB_HOST/DB_PORT/DB_USER/DB_PASSWORD/DB_NAME.
use clap::Parser;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let config = hangar_server::Config::parse();
    hangar_core::log();
    hangar_server::run(config).await
}
