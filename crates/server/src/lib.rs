//! Flight API server.
//!
//! Opens the database, hosts the flight routes behind CORS and access
//! logging, and closes the database once the HTTP server has stopped.
mod config;

pub use config::*;

use actix_cors::Cors;
use actix_web::App;
use actix_web::HttpServer;
use actix_web::middleware::Logger;
use actix_web::web;
use hangar_database::Database;
use hangar_database::Settings;
use hangar_planes::Hangar;
use std::sync::Arc;

/// Cross-origin policy admitting exactly one origin.
pub fn cors(origin: &str) -> Cors {
    Cors::default()
        .allowed_origin(origin)
        .allow_any_method()
        .allow_any_header()
}

#[rustfmt::skip]
pub async fn run(config: Config) -> Result<(), std::io::Error> {
    let database = Database::open(&Settings::from_env())
        .await
        .map_err(std::io::Error::other)?;
    let hangar = web::Data::from(database.client() as Arc<dyn Hangar>);
    let origin = config.origin.clone();
    log::info!("starting flight server on {}", config.bind);
    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%r %s %Ts"))
            .wrap(cors(&origin))
            .app_data(hangar.clone())
            .configure(hangar_planes::routes)
    })
    .workers(1)
    .bind(&config.bind);
    let served = match server {
        Ok(server) => server.run().await,
        Err(e) => {
            log::error!("failed to bind {}: {}", config.bind, e);
            Err(e)
        }
    };
    database.close().await;
    served
}
