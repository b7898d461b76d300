//! `PostgreSQL` store implementation for audit, notification, and message
//! persistence.

use super::models::{self, AuditLogRow, MessageRow, NotificationRow};
use super::schema::{audit_logs, messages, notifications};
use crate::audit::domain::{
    AuditEntry, AuditLog, Message, MessageId, NewMessage, Notification, NotificationId,
};
use crate::audit::ports::{AuditLogStore, MessageStore, NotificationStore};
use crate::directory::domain::UserId;
use crate::store::{StoreError, StoreResult};
use crate::task::domain::TaskId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};

/// `PostgreSQL` connection pool type used by audit adapters.
pub type AuditPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed audit trail.
#[derive(Debug, Clone)]
pub struct PostgresAuditTrail {
    pool: AuditPgPool,
}

impl PostgresAuditTrail {
    /// Creates a trail from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: AuditPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(StoreError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(StoreError::persistence)?
    }
}

#[async_trait]
impl AuditLogStore for PostgresAuditTrail {
    async fn append(&self, entry: AuditEntry, now: DateTime<Utc>) -> StoreResult<AuditLog> {
        self.run_blocking(move |connection| {
            let inserted: AuditLogRow = diesel::insert_into(audit_logs::table)
                .values((
                    audit_logs::action.eq(entry.action),
                    audit_logs::actor_id.eq(entry.actor.value()),
                    audit_logs::task_id.eq(entry.task_id.map(|id| id.value())),
                    audit_logs::details.eq(entry.details),
                    audit_logs::old_values.eq(entry.old_values),
                    audit_logs::new_values.eq(entry.new_values),
                    audit_logs::correlation_id.eq(entry.correlation_id),
                    audit_logs::timestamp.eq(now),
                ))
                .get_result(connection)
                .map_err(StoreError::persistence)?;
            Ok(models::row_to_log(inserted))
        })
        .await
    }

    async fn list_for_task(&self, task_id: TaskId) -> StoreResult<Vec<AuditLog>> {
        self.run_blocking(move |connection| {
            let rows = audit_logs::table
                .filter(audit_logs::task_id.eq(task_id.value()))
                .order(audit_logs::id.asc())
                .select(AuditLogRow::as_select())
                .load::<AuditLogRow>(connection)
                .map_err(StoreError::persistence)?;
            Ok(rows.into_iter().map(models::row_to_log).collect())
        })
        .await
    }

    async fn list_for_actor(&self, actor: UserId) -> StoreResult<Vec<AuditLog>> {
        self.run_blocking(move |connection| {
            let rows = audit_logs::table
                .filter(audit_logs::actor_id.eq(actor.value()))
                .order(audit_logs::id.asc())
                .select(AuditLogRow::as_select())
                .load::<AuditLogRow>(connection)
                .map_err(StoreError::persistence)?;
            Ok(rows.into_iter().map(models::row_to_log).collect())
        })
        .await
    }
}

#[async_trait]
impl NotificationStore for PostgresAuditTrail {
    async fn append(
        &self,
        user_id: UserId,
        task_id: Option<TaskId>,
        message: String,
        now: DateTime<Utc>,
    ) -> StoreResult<Notification> {
        self.run_blocking(move |connection| {
            let inserted: NotificationRow = diesel::insert_into(notifications::table)
                .values((
                    notifications::user_id.eq(user_id.value()),
                    notifications::task_id.eq(task_id.map(|id| id.value())),
                    notifications::message.eq(message),
                    notifications::sent_at.eq(now),
                    notifications::is_read.eq(false),
                ))
                .get_result(connection)
                .map_err(StoreError::persistence)?;
            Ok(models::row_to_notification(inserted))
        })
        .await
    }

    async fn mark_read(&self, id: NotificationId) -> StoreResult<Notification> {
        self.run_blocking(move |connection| {
            let updated: Option<NotificationRow> =
                diesel::update(notifications::table.filter(notifications::id.eq(id.value())))
                    .set(notifications::is_read.eq(true))
                    .get_result(connection)
                    .optional()
                    .map_err(StoreError::persistence)?;
            updated
                .map(models::row_to_notification)
                .ok_or(StoreError::not_found("notification", id.value()))
        })
        .await
    }

    async fn list_unread(&self, user_id: UserId) -> StoreResult<Vec<Notification>> {
        self.run_blocking(move |connection| {
            let rows = notifications::table
                .filter(notifications::user_id.eq(user_id.value()))
                .filter(notifications::is_read.eq(false))
                .order(notifications::id.asc())
                .select(NotificationRow::as_select())
                .load::<NotificationRow>(connection)
                .map_err(StoreError::persistence)?;
            Ok(rows.into_iter().map(models::row_to_notification).collect())
        })
        .await
    }
}

#[async_trait]
impl MessageStore for PostgresAuditTrail {
    async fn append(&self, new: NewMessage, now: DateTime<Utc>) -> StoreResult<Message> {
        self.run_blocking(move |connection| {
            let inserted: MessageRow = diesel::insert_into(messages::table)
                .values((
                    messages::task_id.eq(new.task_id.map(|id| id.value())),
                    messages::sender_id.eq(new.sender_id.value()),
                    messages::receiver_id.eq(new.receiver_id.value()),
                    messages::body.eq(new.body),
                    messages::attachment_path.eq(new.attachment_path),
                    messages::sent_at.eq(now),
                    messages::is_read.eq(false),
                ))
                .get_result(connection)
                .map_err(StoreError::persistence)?;
            Ok(models::row_to_message(inserted))
        })
        .await
    }

    async fn mark_read(&self, id: MessageId) -> StoreResult<Message> {
        self.run_blocking(move |connection| {
            let updated: Option<MessageRow> =
                diesel::update(messages::table.filter(messages::id.eq(id.value())))
                    .set(messages::is_read.eq(true))
                    .get_result(connection)
                    .optional()
                    .map_err(StoreError::persistence)?;
            updated
                .map(models::row_to_message)
                .ok_or(StoreError::not_found("message", id.value()))
        })
        .await
    }

    async fn list_received(&self, user_id: UserId) -> StoreResult<Vec<Message>> {
        self.run_blocking(move |connection| {
            let rows = messages::table
                .filter(messages::receiver_id.eq(user_id.value()))
                .order(messages::id.asc())
                .select(MessageRow::as_select())
                .load::<MessageRow>(connection)
                .map_err(StoreError::persistence)?;
            Ok(rows.into_iter().map(models::row_to_message).collect())
        })
        .await
    }
}
