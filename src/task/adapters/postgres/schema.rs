//! Diesel schema for task persistence.

diesel::table! {
    /// Task aggregate records.
    tasks (id) {
        /// Task key.
        id -> BigInt,
        /// Requesting user.
        submitter_id -> BigInt,
        /// Assigned porter, once dispatched.
        receiver_id -> Nullable<BigInt>,
        /// Collection point.
        pickup_location -> Text,
        /// Delivery point.
        dropoff_location -> Text,
        /// Urgency level.
        #[max_length = 20]
        priority -> Varchar,
        /// Lifecycle status.
        #[max_length = 20]
        status -> Varchar,
        /// Patient context.
        patient_details -> Nullable<Text>,
        /// Item context.
        item_details -> Nullable<Text>,
        /// Handling instructions.
        additional_instructions -> Nullable<Text>,
        /// Task category.
        job_type_id -> Nullable<BigInt>,
        /// Owning department.
        department_id -> Nullable<BigInt>,
        /// Target ward.
        ward_id -> Nullable<BigInt>,
        /// Planner's estimate, minutes.
        estimated_duration -> Nullable<BigInt>,
        /// Elapsed working time, minutes.
        actual_duration -> Nullable<BigInt>,
        /// Moment work started.
        start_time -> Nullable<Timestamptz>,
        /// Moment of terminal entry.
        end_time -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last mutation timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Status transition history rows.
    task_status_updates (id) {
        /// Row key.
        id -> BigInt,
        /// Transitioned task.
        task_id -> BigInt,
        /// Status before.
        #[max_length = 20]
        old_status -> Varchar,
        /// Status after.
        #[max_length = 20]
        new_status -> Varchar,
        /// Acting user.
        updated_by -> BigInt,
        /// Free-text comment.
        comment -> Nullable<Text>,
        /// Recording timestamp.
        timestamp -> Timestamptz,
    }
}

diesel::table! {
    /// Priority change history rows.
    priority_changes (id) {
        /// Row key.
        id -> BigInt,
        /// Changed task.
        task_id -> BigInt,
        /// Priority before.
        #[max_length = 20]
        old_priority -> Varchar,
        /// Priority after.
        #[max_length = 20]
        new_priority -> Varchar,
        /// Acting user.
        changed_by -> BigInt,
        /// Stated reason.
        reason -> Nullable<Text>,
        /// Recording timestamp.
        timestamp -> Timestamptz,
    }
}

diesel::table! {
    /// Escalation records.
    escalations (id) {
        /// Row key.
        id -> BigInt,
        /// Escalated task.
        task_id -> BigInt,
        /// Escalating user.
        escalated_by -> BigInt,
        /// Stated reason.
        reason -> Text,
        /// Recording timestamp.
        timestamp -> Timestamptz,
    }
}

diesel::table! {
    /// Incident records.
    incidents (id) {
        /// Row key.
        id -> BigInt,
        /// Affected task.
        task_id -> BigInt,
        /// Reporting user.
        reported_by -> BigInt,
        /// What happened.
        description -> Text,
        /// Impact level.
        #[max_length = 20]
        severity -> Varchar,
        /// Recording timestamp.
        timestamp -> Timestamptz,
    }
}

diesel::table! {
    /// Attachment records; bytes live outside the engine.
    task_attachments (id) {
        /// Row key.
        id -> BigInt,
        /// Owning task.
        task_id -> BigInt,
        /// Uploading user.
        uploaded_by -> BigInt,
        /// Opaque storage path.
        file_path -> Text,
        /// Size in bytes.
        file_size -> Nullable<BigInt>,
        /// MIME type.
        #[max_length = 100]
        content_type -> Nullable<Varchar>,
        /// Upload timestamp.
        uploaded_at -> Timestamptz,
    }
}

diesel::table! {
    /// Requester feedback records.
    task_feedback (id) {
        /// Row key.
        id -> BigInt,
        /// Rated task.
        task_id -> BigInt,
        /// Rating user.
        rated_by -> BigInt,
        /// Satisfaction score, 1..=5.
        rating -> SmallInt,
        /// Free-text comments.
        comments -> Nullable<Text>,
        /// Recording timestamp.
        timestamp -> Timestamptz,
    }
}
