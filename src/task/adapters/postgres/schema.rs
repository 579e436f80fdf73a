//! Diesel schema for task lifecycle persistence.

diesel::table! {
    /// Team task records and their lifecycle timestamps.
    team_tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Task title.
        title -> Text,
        /// Task description.
        description -> Text,
        /// Assigned member identifier.
        assigned_to -> Text,
        /// Creating manager identifier.
        created_by -> Text,
        /// Owning team code.
        team_code -> Text,
        /// Lifecycle status.
        #[max_length = 50]
        status -> Varchar,
        /// Set once when work starts.
        started_at -> Nullable<Timestamptz>,
        /// Set once on completion.
        completed_at -> Nullable<Timestamptz>,
        /// Optional deliverable link.
        deliverable_link -> Nullable<Text>,
        /// Optional completion proof reference.
        completion_proof -> Nullable<Text>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
