//! `PostgreSQL` repository implementation for task lifecycle storage.

use super::{
    models::{NewTaskRow, TaskLifecycleChangeset, TaskRow},
    schema::team_tasks,
};
use crate::task::{
    domain::{
        DeliverableLink, PersistedTaskData, ProofArtifact, Task, TaskDomainError, TaskId,
        TaskStatus, TeamCode, UserId,
    },
    ports::{TaskMutator, TaskRepository, TaskRepositoryError, TaskRepositoryResult, apply_mutation},
};
use async_trait::async_trait;
use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// Idempotent DDL for the `team_tasks` table and its indexes.
pub const TEAM_TASKS_SCHEMA_SQL: &str =
    include_str!("../../../../migrations/2026-10-01-000000_create_team_tasks/up.sql");

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    /// Creates the `team_tasks` table if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the DDL fails.
    pub async fn ensure_schema(&self) -> TaskRepositoryResult<()> {
        self.run_blocking(|connection| Ok(connection.batch_execute(TEAM_TASKS_SCHEMA_SQL)?))
            .await
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

impl From<DieselError> for TaskRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn create(&self, task: &Task) -> TaskRepositoryResult<TaskId> {
        task.check_invariants()?;
        let task_id = task.id();
        let new_row = to_new_row(task);

        self.run_blocking(move |connection| {
            diesel::insert_into(team_tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        TaskRepositoryError::DuplicateTask(task_id)
                    }
                    _ => TaskRepositoryError::persistence(err),
                })?;
            Ok(task_id)
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = team_tasks::table
                .filter(team_tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn update(&self, id: TaskId, mutator: TaskMutator) -> TaskRepositoryResult<Task> {
        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx| {
                let row = team_tasks::table
                    .filter(team_tasks::id.eq(id.into_inner()))
                    .select(TaskRow::as_select())
                    .for_update()
                    .first::<TaskRow>(tx)
                    .optional()?
                    .ok_or(TaskRepositoryError::NotFound(id))?;
                let current = row_to_task(row)?;
                let updated = apply_mutation(&current, mutator)?;

                // Compare-and-set on the status the mutator observed.
                let written = diesel::update(
                    team_tasks::table
                        .filter(team_tasks::id.eq(id.into_inner()))
                        .filter(team_tasks::status.eq(current.status().as_str())),
                )
                .set(&to_changeset(&updated))
                .execute(tx)?;

                if written == 0 {
                    return Err(TaskDomainError::InvalidStatusTransition {
                        task_id: id,
                        from: current.status(),
                        to: updated.status(),
                    }
                    .into());
                }
                Ok(updated)
            })
        })
        .await
    }

    async fn list_by_assignee(&self, assignee: &UserId) -> TaskRepositoryResult<Vec<Task>> {
        let assigned_to = assignee.as_str().to_owned();
        self.run_blocking(move |connection| {
            let rows = team_tasks::table
                .filter(team_tasks::assigned_to.eq(assigned_to))
                .order(team_tasks::created_at.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn list_by_team(&self, team: &TeamCode) -> TaskRepositoryResult<Vec<Task>> {
        let team_code = team.as_str().to_owned();
        self.run_blocking(move |connection| {
            let rows = team_tasks::table
                .filter(team_tasks::team_code.eq(team_code))
                .order(team_tasks::created_at.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }
}

fn to_new_row(task: &Task) -> NewTaskRow {
    NewTaskRow {
        id: task.id().into_inner(),
        title: task.title().to_owned(),
        description: task.description().to_owned(),
        assigned_to: task.assigned_to().as_str().to_owned(),
        created_by: task.created_by().as_str().to_owned(),
        team_code: task.team().as_str().to_owned(),
        status: task.status().as_str().to_owned(),
        started_at: task.started_at(),
        completed_at: task.completed_at(),
        deliverable_link: task.deliverable_link().map(|link| link.as_str().to_owned()),
        completion_proof: task.completion_proof().map(|proof| proof.as_str().to_owned()),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    }
}

fn to_changeset(task: &Task) -> TaskLifecycleChangeset {
    TaskLifecycleChangeset {
        status: task.status().as_str().to_owned(),
        started_at: task.started_at(),
        completed_at: task.completed_at(),
        deliverable_link: task.deliverable_link().map(|link| link.as_str().to_owned()),
        completion_proof: task.completion_proof().map(|proof| proof.as_str().to_owned()),
        updated_at: task.updated_at(),
    }
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        title,
        description,
        assigned_to,
        created_by,
        team_code,
        status: persisted_status,
        started_at,
        completed_at,
        deliverable_link,
        completion_proof,
        created_at,
        updated_at,
    } = row;

    let status =
        TaskStatus::try_from(persisted_status.as_str()).map_err(TaskRepositoryError::persistence)?;
    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        title,
        description,
        assigned_to: UserId::new(assigned_to).map_err(TaskRepositoryError::persistence)?,
        created_by: UserId::new(created_by).map_err(TaskRepositoryError::persistence)?,
        team: TeamCode::new(team_code).map_err(TaskRepositoryError::persistence)?,
        status,
        started_at,
        completed_at,
        deliverable_link: DeliverableLink::parse(deliverable_link.as_deref()),
        completion_proof: ProofArtifact::parse(completion_proof.as_deref()),
        created_at,
        updated_at,
    };
    Ok(Task::from_persisted(data))
}
