use actix_web::{web, HttpServer};
use error_stack::{Result, ResultExt};
use std::process;
use thiserror::Error;
use tracing::info;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

use roster::{config, database, App};

#[derive(Debug, Error)]
#[error("Could not start roster HTTP server")]
struct StartError;

async fn run() -> Result<(), StartError> {
    let config = config::Server::load().change_context(StartError)?;
    let app = App::new(config).await.change_context(StartError)?;

    {
        let mut conn = app.db_write().await.change_context(StartError)?;
        database::migrations::run_pending(&mut conn)
            .await
            .change_context(StartError)?;
    }

    let addr = (app.config.ip, app.config.port);
    let workers = app.config.workers.get();

    let server = HttpServer::new({
        let app = app.clone();
        move || {
            actix_web::App::new()
                .app_data(web::Data::new(app.clone()))
                .wrap(TracingLogger::default())
                .configure(roster::http::controllers::configure)
        }
    })
    .workers(workers)
    .bind(addr)
    .change_context(StartError)
    .attach_printable("could not bind server with address and port")?;

    info!(
        "roster HTTP server is listening at http://{}:{} with {workers} workers",
        addr.0, addr.1
    );

    server.run().await.change_context(StartError)?;

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(error) = run().await {
        eprintln!("{error:?}");
        process::exit(1);
    }
}
