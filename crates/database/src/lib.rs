//! PostgreSQL connectivity.
//!
//! ## Connectivity
//!
//! - [`Settings`] — Connection parameters read from the environment
//! - [`Database`] — Open client plus the task driving its connection
//!
//! ## Table Names
//!
//! Constants for the persistent entities addressed by SQL.
mod settings;

pub use settings::*;

use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_postgres::Client;

/// PostgreSQL error type alias.
pub type PgErr = tokio_postgres::Error;

/// Table for flight arrival records.
#[rustfmt::skip]
pub const PLANES: &str = "planes";

/// A single process-wide database connection.
///
/// Opened once at startup with [`Database::open`] and shared by handle
/// through [`Database::client`]. [`Database::close`] is called after every
/// consumer has stopped.
pub struct Database {
    client: Arc<Client>,
    connection: JoinHandle<()>,
}

impl Database {
    /// Establishes the database connection.
    ///
    /// Spawns the connection future on the current runtime and lowers the
    /// session's notice level so server chatter stays out of the logs.
    pub async fn open(settings: &Settings) -> Result<Self, PgErr> {
        log::info!("connecting to database ({})", settings);
        let tls = tokio_postgres::tls::NoTls;
        let (client, connection) = settings.config().connect(tls).await?;
        let connection = tokio::spawn(async move {
            if let Err(e) = connection.await {
                log::error!("database connection failed: {}", e);
            }
        });
        client
            .execute("SET client_min_messages TO WARNING", &[])
            .await?;
        log::info!("successfully connected to the database");
        Ok(Self {
            client: Arc::new(client),
            connection,
        })
    }
    pub fn client(&self) -> Arc<Client> {
        self.client.clone()
    }
    /// Terminates the session and waits for the connection task to finish.
    ///
    /// The connection only winds down once the last client handle is gone,
    /// so a handle still held elsewhere forces the task to be aborted.
    pub async fn close(self) {
        log::info!("closing database connection");
        match Arc::try_unwrap(self.client) {
            Ok(client) => {
                drop(client);
                match self.connection.await {
                    Ok(()) => log::info!("database connection closed"),
                    Err(e) => log::error!("database connection task failed: {}", e),
                }
            }
            Err(_) => {
                log::warn!("database client still shared, aborting connection");
                self.connection.abort();
            }
        }
    }
}
