//! HTTP server for the Taskflow task tracker.
//!
//! Configuration is read from the environment (see
//! [`taskflow::api::config::ServerConfig`]). When `DATABASE_URL` is unset the
//! server keeps tasks in memory and loses them on exit.
//!
//! The member directory is seeded from the JSON array at
//! `TASKFLOW_DIRECTORY_FILE`:
//!
//! ```json
//! [
//!   { "_id": "m-1", "name": "Morgan", "role": "Project Manager", "teamCode": "T7" },
//!   { "_id": "a-1", "name": "Avery", "role": "Team Member", "teamCode": "T7" }
//! ]
//! ```

use actix_cors::Cors;
use actix_web::{App, HttpServer, http::header, middleware::Logger, web};
use chrono::Duration;
use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use env_logger::Env;
use log::{info, warn};
use std::fs;
use std::io;
use std::path::Path;
use std::sync::Arc;
use taskflow::{
    api::{AppState, auth::TokenKeys, config::ServerConfig, configure},
    task::{
        adapters::{
            memory::{InMemoryMemberDirectory, InMemoryTaskRepository},
            postgres::PostgresTaskRepository,
        },
        domain::TeamMember,
        ports::TaskRepository,
    },
};

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = ServerConfig::from_env().map_err(io::Error::other)?;
    let repository = build_repository(config.database_url.as_deref()).await?;
    let directory = Arc::new(load_directory(config.directory_seed.as_deref())?);
    let tokens = TokenKeys::new(
        config.jwt_secret.as_bytes(),
        Duration::hours(config.token_ttl_hours),
    );
    let state = web::Data::new(AppState::new(repository, directory, tokens));
    let frontend_origin = config.frontend_origin.clone();

    info!("server listening on {}", config.bind_address);
    info!("allowed CORS origin: {frontend_origin}");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&frontend_origin)
            .allowed_methods(vec!["GET", "POST", "PUT", "OPTIONS"])
            .allowed_headers(vec![
                header::CONTENT_TYPE,
                header::ACCEPT,
                header::AUTHORIZATION,
            ])
            .max_age(3600);

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(state.clone())
            .configure(configure)
    })
    .bind(&config.bind_address)?
    .run()
    .await
}

async fn build_repository(database_url: Option<&str>) -> io::Result<Arc<dyn TaskRepository>> {
    let Some(url) = database_url else {
        warn!("DATABASE_URL is not set; tasks are kept in memory only");
        return Ok(Arc::new(InMemoryTaskRepository::new()));
    };

    let manager = ConnectionManager::<PgConnection>::new(url);
    let pool = tokio::task::spawn_blocking(move || Pool::builder().build(manager))
        .await
        .map_err(io::Error::other)?
        .map_err(io::Error::other)?;
    let repository = PostgresTaskRepository::new(pool);
    repository
        .ensure_schema()
        .await
        .map_err(io::Error::other)?;
    info!("using PostgreSQL task store");
    Ok(Arc::new(repository))
}

fn load_directory(seed: Option<&Path>) -> io::Result<InMemoryMemberDirectory> {
    let Some(path) = seed else {
        warn!("TASKFLOW_DIRECTORY_FILE is not set; the member directory is empty");
        return Ok(InMemoryMemberDirectory::new());
    };

    let raw = fs::read_to_string(path)?;
    let records: Vec<TeamMember> = serde_json::from_str(&raw).map_err(io::Error::other)?;
    let count = records.len();
    let directory = InMemoryMemberDirectory::from_records(records).map_err(io::Error::other)?;
    info!("loaded {count} directory records from {}", path.display());
    Ok(directory)
}
