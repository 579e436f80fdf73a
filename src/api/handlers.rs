//! HTTP handlers for task and user endpoints.

use super::{
    AppState,
    auth::AuthenticatedCaller,
    dto::{
        AssignTaskBody, MemberAnalyticsBody, ProfileBody, SubmitTaskBody, team_analytics_body,
    },
    error::ApiError,
    upload::read_submit_form,
};
use crate::task::{
    domain::{Caller, TaskId},
    services::TaskLifecycleError,
};
use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use uuid::Uuid;

type HandlerResult = Result<HttpResponse, ApiError>;

/// Path ids that are not UUIDs cannot name a stored task.
fn parse_task_id(raw: &str) -> Result<TaskId, ApiError> {
    Uuid::parse_str(raw.trim())
        .map(TaskId::from_uuid)
        .map_err(|_| ApiError::UnknownTask)
}

/// `POST /api/tasks/assign`
pub async fn assign_task(
    state: web::Data<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    body: web::Json<AssignTaskBody>,
) -> HandlerResult {
    let task = state
        .lifecycle
        .assign(&caller, body.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(task))
}

/// `PUT /api/tasks/start/{id}`
pub async fn start_task(
    state: web::Data<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    path: web::Path<String>,
) -> HandlerResult {
    let task_id = parse_task_id(&path)?;
    let task = state.lifecycle.start(&caller, task_id).await?;
    Ok(HttpResponse::Ok().json(task))
}

/// `PUT /api/tasks/submit/{id}`
pub async fn submit_task(
    state: web::Data<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    path: web::Path<String>,
    payload: Option<web::Json<SubmitTaskBody>>,
) -> HandlerResult {
    let task_id = parse_task_id(&path)?;
    let body = payload.map(web::Json::into_inner).unwrap_or_default();
    submit(&state, &caller, task_id, body).await
}

/// `PUT /api/tasks/submit/{id}` with a `multipart/form-data` body.
pub async fn submit_task_form(
    state: web::Data<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
    path: web::Path<String>,
    form: Multipart,
) -> HandlerResult {
    let task_id = parse_task_id(&path)?;
    let body = read_submit_form(form).await?;
    submit(&state, &caller, task_id, body).await
}

async fn submit(
    state: &AppState,
    caller: &Caller,
    task_id: TaskId,
    body: SubmitTaskBody,
) -> HandlerResult {
    let task = state
        .lifecycle
        .submit(caller, body.into_request(task_id))
        .await?;
    Ok(HttpResponse::Ok().json(task))
}

/// `GET /api/tasks/my`
pub async fn my_tasks(
    state: web::Data<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
) -> HandlerResult {
    let tasks = state.lifecycle.tasks_for_member(&caller).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// `GET /api/tasks/assigned`
pub async fn team_tasks(
    state: web::Data<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
) -> HandlerResult {
    let tasks = state.lifecycle.tasks_for_manager(&caller).await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// `GET /api/tasks/analytics/member`
pub async fn member_analytics(
    state: web::Data<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
) -> HandlerResult {
    let stats = state.analytics.member_analytics(&caller).await?;
    Ok(HttpResponse::Ok().json(MemberAnalyticsBody::from(stats)))
}

/// `GET /api/tasks/analytics/manager`
pub async fn manager_analytics(
    state: web::Data<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
) -> HandlerResult {
    let stats = state.analytics.team_analytics(&caller).await?;
    Ok(HttpResponse::Ok().json(team_analytics_body(stats)))
}

/// `GET /api/users/team`
pub async fn team_roster(
    state: web::Data<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
) -> HandlerResult {
    let roster = state.lifecycle.team_roster(&caller).await?;
    Ok(HttpResponse::Ok().json(roster))
}

/// `GET /api/users/profile`
pub async fn profile(
    state: web::Data<AppState>,
    AuthenticatedCaller(caller): AuthenticatedCaller,
) -> HandlerResult {
    let user = state
        .directory
        .find_user(caller.user_id())
        .await
        .map_err(TaskLifecycleError::from)?
        .ok_or(ApiError::UnknownUser)?;
    Ok(HttpResponse::Ok().json(ProfileBody { user }))
}
