//! Thread-safe in-memory directory used by services and tests.

mod directory;

pub use directory::InMemoryDirectory;
