//! Diesel schema for audit, notification, and message persistence.

diesel::table! {
    /// Append-only audit log entries.
    audit_logs (id) {
        /// Entry key.
        id -> BigInt,
        /// Action name.
        #[max_length = 100]
        action -> Varchar,
        /// Acting user.
        actor_id -> BigInt,
        /// Affected task, when task-scoped.
        task_id -> Nullable<BigInt>,
        /// Free-text detail.
        details -> Nullable<Text>,
        /// Before-snapshot.
        old_values -> Nullable<Jsonb>,
        /// After-snapshot.
        new_values -> Nullable<Jsonb>,
        /// Request correlation id.
        correlation_id -> Nullable<Uuid>,
        /// Recording timestamp.
        timestamp -> Timestamptz,
    }
}

diesel::table! {
    /// User notifications.
    notifications (id) {
        /// Notification key.
        id -> BigInt,
        /// Notified user.
        user_id -> BigInt,
        /// Related task.
        task_id -> Nullable<BigInt>,
        /// Notification text.
        message -> Text,
        /// Delivery timestamp.
        sent_at -> Timestamptz,
        /// Read flag.
        is_read -> Bool,
    }
}

diesel::table! {
    /// User-to-user messages.
    messages (id) {
        /// Message key.
        id -> BigInt,
        /// Related task.
        task_id -> Nullable<BigInt>,
        /// Sending user.
        sender_id -> BigInt,
        /// Receiving user.
        receiver_id -> BigInt,
        /// Message body.
        body -> Text,
        /// Opaque attachment path.
        attachment_path -> Nullable<Text>,
        /// Delivery timestamp.
        sent_at -> Timestamptz,
        /// Read flag.
        is_read -> Bool,
    }
}
