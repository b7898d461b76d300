//! Application services for the directory context.

mod registry;
mod settings;

pub use registry::{DirectoryService, DirectoryServiceError, DirectoryServiceResult, RegisterUserRequest};
pub use settings::SettingsService;
