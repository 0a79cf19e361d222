/// Command-line and environment configuration for the server.
#[derive(Debug, Clone, PartialEq, Eq, clap::Parser)]
#[command(name = "backend", about = "HTTP API over flight arrival records")]
pub struct Config {
    /// Address the HTTP server listens on.
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:3000")]
    pub bind: String,
    /// The one origin allowed to make cross-origin requests.
    #[arg(long, env = "CORS_ORIGIN", default_value = "http://localhost:4200")]
    pub origin: String,
}
