//! actix-web HTTP surface for the task tracker.
//!
//! Handlers authenticate the caller from a bearer token, translate request
//! bodies into service requests, and map service errors onto status codes.
//! All business rules live in [`crate::task::services`].

pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod upload;

use crate::task::{
    ports::{MemberDirectory, TaskRepository},
    services::{TaskAnalyticsService, TaskLifecycleService},
};
use actix_web::{guard, web};
use auth::TokenKeys;
use error::ApiError;
use mockable::DefaultClock;
use std::sync::Arc;

/// Shared state handed to every handler.
pub struct AppState {
    /// Lifecycle engine.
    pub lifecycle: TaskLifecycleService<dyn TaskRepository, dyn MemberDirectory, DefaultClock>,
    /// Analytics aggregator.
    pub analytics: TaskAnalyticsService<dyn TaskRepository, dyn MemberDirectory>,
    /// Identity directory, used for profile lookups.
    pub directory: Arc<dyn MemberDirectory>,
    /// Bearer-token keys.
    pub tokens: TokenKeys,
}

impl AppState {
    /// Wires the services over a task store and directory.
    #[must_use]
    pub fn new(
        repository: Arc<dyn TaskRepository>,
        directory: Arc<dyn MemberDirectory>,
        tokens: TokenKeys,
    ) -> Self {
        Self {
            lifecycle: TaskLifecycleService::new(
                Arc::clone(&repository),
                Arc::clone(&directory),
                Arc::new(DefaultClock),
            ),
            analytics: TaskAnalyticsService::new(repository, Arc::clone(&directory)),
            directory,
            tokens,
        }
    }
}

/// Rejects unparseable JSON bodies as validation failures.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| ApiError::BadRequest(err.to_string()).into())
}

/// Registers the `/api/tasks` and `/api/users` routes.
///
/// The caller must also register a `web::Data<AppState>`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(
            web::scope("/api/tasks")
                .route("/assign", web::post().to(handlers::assign_task))
                .route("/start/{id}", web::put().to(handlers::start_task))
                .service(
                    web::resource("/submit/{id}")
                        .route(
                            web::put()
                                .guard(guard::fn_guard(upload::is_multipart))
                                .to(handlers::submit_task_form),
                        )
                        .route(web::put().to(handlers::submit_task)),
                )
                .route("/my", web::get().to(handlers::my_tasks))
                .route("/assigned", web::get().to(handlers::team_tasks))
                .route("/analytics/member", web::get().to(handlers::member_analytics))
                .route(
                    "/analytics/manager",
                    web::get().to(handlers::manager_analytics),
                ),
        )
        .service(
            web::scope("/api/users")
                .route("/team", web::get().to(handlers::team_roster))
                .route("/profile", web::get().to(handlers::profile)),
        );
}
