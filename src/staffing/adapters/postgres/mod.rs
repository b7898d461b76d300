//! `PostgreSQL` adapters for staffing persistence.

mod models;
mod repository;
mod schema;

pub use repository::{PostgresRoster, StaffingPgPool};
