//! Repository ports for organizational reference data.
//!
//! Repositories assign integer keys monotonically and stamp `created_at` /
//! `updated_at` from the timestamp supplied by the calling service. A
//! rejected write leaves prior state unchanged.

use crate::directory::domain::{
    BreakType, BreakTypeId, CapabilityName, Department, DepartmentId, JobType, JobTypeId,
    LinkToken, NewUser, NewUserProfile, NewVehicle, Permission, PermissionId, PublicLink, Report,
    Role, RoleId, SettingKey, SettingType, SystemSetting, User, UserId, UserProfile, Username,
    Vehicle, VehicleId, VehicleStatus, Ward, WardId,
};
use crate::store::StoreResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Persistence contract for user accounts, profiles, and public links.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Creates a user.
    ///
    /// # Errors
    ///
    /// Returns a conflict when the username or email is taken, and a
    /// referential-integrity error when the role or department reference
    /// does not exist.
    async fn create_user(&self, new: NewUser, now: DateTime<Utc>) -> StoreResult<User>;

    /// Finds a user by key. Returns `None` when absent.
    async fn find_user(&self, id: UserId) -> StoreResult<Option<User>>;

    /// Finds a user by unique username. Returns `None` when absent.
    async fn find_user_by_username(&self, username: &Username) -> StoreResult<Option<User>>;

    /// Soft-deletes a user by clearing its active flag.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when the user does not exist.
    async fn deactivate_user(&self, id: UserId, now: DateTime<Utc>) -> StoreResult<User>;

    /// Lists active users holding the given role, optionally scoped to a
    /// department. An unscoped query returns role holders from every
    /// department.
    async fn list_active_users(
        &self,
        role_id: RoleId,
        department_id: Option<DepartmentId>,
    ) -> StoreResult<Vec<User>>;

    /// Creates or replaces the profile owned by a user.
    ///
    /// # Errors
    ///
    /// Returns a referential-integrity error when the user does not exist
    /// and a conflict when the profile email is taken by another profile.
    async fn upsert_profile(
        &self,
        user_id: UserId,
        profile: NewUserProfile,
        now: DateTime<Utc>,
    ) -> StoreResult<UserProfile>;

    /// Finds the profile owned by a user. Returns `None` when absent.
    async fn find_profile(&self, user_id: UserId) -> StoreResult<Option<UserProfile>>;

    /// Creates a public submission link for a station user.
    ///
    /// # Errors
    ///
    /// Returns a referential-integrity error when the station user does not
    /// exist and a conflict when the token is already in use.
    async fn create_public_link(
        &self,
        token: LinkToken,
        station_id: UserId,
        now: DateTime<Utc>,
    ) -> StoreResult<PublicLink>;

    /// Finds an active public link by token. Returns `None` when absent or
    /// deactivated.
    async fn find_public_link(&self, token: LinkToken) -> StoreResult<Option<PublicLink>>;

    /// Soft-deletes a public link.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when the link does not exist.
    async fn deactivate_public_link(&self, token: LinkToken) -> StoreResult<PublicLink>;
}

/// Persistence contract for roles, permissions, departments, wards, and
/// catalogs.
#[async_trait]
pub trait OrgDirectory: Send + Sync {
    /// Creates a role with a unique name.
    async fn create_role(
        &self,
        name: CapabilityName,
        description: Option<String>,
        now: DateTime<Utc>,
    ) -> StoreResult<Role>;

    /// Finds a role by key. Returns `None` when absent.
    async fn find_role(&self, id: RoleId) -> StoreResult<Option<Role>>;

    /// Finds a role by unique name. Returns `None` when absent.
    async fn find_role_by_name(&self, name: &CapabilityName) -> StoreResult<Option<Role>>;

    /// Creates a permission with a unique name.
    async fn create_permission(
        &self,
        name: CapabilityName,
        description: Option<String>,
        now: DateTime<Utc>,
    ) -> StoreResult<Permission>;

    /// Grants a permission to a role.
    ///
    /// # Errors
    ///
    /// Returns a conflict when the pair is already granted and a
    /// referential-integrity error when either side does not exist.
    async fn grant_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> StoreResult<()>;

    /// Lists permissions granted to a role.
    async fn list_permissions(&self, role_id: RoleId) -> StoreResult<Vec<Permission>>;

    /// Creates a department.
    async fn create_department(
        &self,
        name: String,
        location: Option<String>,
        now: DateTime<Utc>,
    ) -> StoreResult<Department>;

    /// Finds a department by key. Returns `None` when absent.
    async fn find_department(&self, id: DepartmentId) -> StoreResult<Option<Department>>;

    /// Creates a ward under a department.
    ///
    /// # Errors
    ///
    /// Returns a referential-integrity error when the department does not
    /// exist.
    async fn create_ward(
        &self,
        department_id: DepartmentId,
        name: String,
        now: DateTime<Utc>,
    ) -> StoreResult<Ward>;

    /// Finds a ward by key. Returns `None` when absent.
    async fn find_ward(&self, id: WardId) -> StoreResult<Option<Ward>>;

    /// Lists wards owned by a department.
    async fn list_wards(&self, department_id: DepartmentId) -> StoreResult<Vec<Ward>>;

    /// Creates a job type.
    async fn create_job_type(
        &self,
        name: String,
        description: Option<String>,
        now: DateTime<Utc>,
    ) -> StoreResult<JobType>;

    /// Finds a job type by key. Returns `None` when absent.
    async fn find_job_type(&self, id: JobTypeId) -> StoreResult<Option<JobType>>;

    /// Soft-deletes a job type by clearing its active flag.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when the job type does not exist.
    async fn deactivate_job_type(&self, id: JobTypeId) -> StoreResult<JobType>;

    /// Creates a break type.
    async fn create_break_type(
        &self,
        name: String,
        description: Option<String>,
        now: DateTime<Utc>,
    ) -> StoreResult<BreakType>;

    /// Finds a break type by key. Returns `None` when absent.
    async fn find_break_type(&self, id: BreakTypeId) -> StoreResult<Option<BreakType>>;
}

/// Persistence contract for transport vehicles.
#[async_trait]
pub trait FleetDirectory: Send + Sync {
    /// Registers a vehicle.
    async fn create_vehicle(&self, new: NewVehicle, now: DateTime<Utc>) -> StoreResult<Vehicle>;

    /// Finds a vehicle by key. Returns `None` when absent.
    async fn find_vehicle(&self, id: VehicleId) -> StoreResult<Option<Vehicle>>;

    /// Updates a vehicle's operational status.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when the vehicle does not exist.
    async fn set_vehicle_status(
        &self,
        id: VehicleId,
        status: VehicleStatus,
        now: DateTime<Utc>,
    ) -> StoreResult<Vehicle>;

    /// Assigns a vehicle to a user, or releases it with `None`.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when the vehicle does not exist and a
    /// referential-integrity error when the user does not exist.
    async fn assign_vehicle(
        &self,
        id: VehicleId,
        user_id: Option<UserId>,
        now: DateTime<Utc>,
    ) -> StoreResult<Vehicle>;
}

/// Persistence contract for key-value configuration.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Creates or replaces a setting by unique key.
    async fn put_setting(
        &self,
        key: SettingKey,
        value: String,
        data_type: Option<SettingType>,
        now: DateTime<Utc>,
    ) -> StoreResult<SystemSetting>;

    /// Finds a setting by key. Returns `None` when absent.
    async fn find_setting(&self, key: &SettingKey) -> StoreResult<Option<SystemSetting>>;

    /// Lists all settings.
    async fn list_settings(&self) -> StoreResult<Vec<SystemSetting>>;
}

/// Persistence contract for generated report references.
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Records a generated report reference.
    ///
    /// # Errors
    ///
    /// Returns a referential-integrity error when the generating user does
    /// not exist.
    async fn create_report(
        &self,
        generated_by: UserId,
        report_type: String,
        file_path: String,
        now: DateTime<Utc>,
    ) -> StoreResult<Report>;

    /// Lists reports generated by a user.
    async fn list_reports(&self, generated_by: UserId) -> StoreResult<Vec<Report>>;
}
