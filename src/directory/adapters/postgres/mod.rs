//! `PostgreSQL` persistence for the directory context.

mod models;
mod repository;
mod schema;

pub use repository::{DirectoryPgPool, PostgresDirectory};
