//! Domain model for organizational reference data.
//!
//! Users, roles, departments, wards, catalogs, vehicles, public submission
//! links, report references, and system settings. All cross-entity relations
//! are id references resolved through the directory repositories.

mod catalog;
mod error;
mod ids;
mod organization;
mod public_link;
mod role;
mod settings;
mod user;
mod vehicle;

pub use catalog::{BreakType, JobType, Report};
pub use error::{DirectoryDomainError, ParseVehicleStatusError};
pub use ids::{
    BreakTypeId, DepartmentId, JobTypeId, PermissionId, ProfileId, PublicLinkId, ReportId, RoleId,
    SettingId, UserId, VehicleId, WardId,
};
pub use organization::{Department, Ward};
pub use public_link::{LinkToken, PublicLink};
pub use role::{CapabilityName, Permission, PermissionGrant, Role};
pub use settings::{SettingKey, SettingType, SettingsSnapshot, SystemSetting};
pub use user::{EmailAddress, NewUser, NewUserProfile, User, UserProfile, Username};
pub use vehicle::{NewVehicle, Vehicle, VehicleStatus};
