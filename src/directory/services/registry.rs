//! Service layer for maintaining organizational reference data.

use crate::directory::{
    domain::{
        BreakType, CapabilityName, Department, DepartmentId, DirectoryDomainError, EmailAddress,
        JobType, JobTypeId, LinkToken, NewUser, NewUserProfile, NewVehicle, Permission,
        PermissionId, PublicLink, Report, Role, RoleId, User, UserId, UserProfile, Username,
        Vehicle, VehicleId, VehicleStatus, Ward,
    },
    ports::{FleetDirectory, OrgDirectory, ReportStore, UserDirectory},
};
use crate::store::StoreError;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for registering a user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterUserRequest {
    username: String,
    credential_hash: String,
    role_id: Option<RoleId>,
    department_id: Option<DepartmentId>,
    email: Option<String>,
    phone: Option<String>,
}

impl RegisterUserRequest {
    /// Creates a request with required fields. The credential hash is opaque
    /// to this crate.
    #[must_use]
    pub fn new(username: impl Into<String>, credential_hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            credential_hash: credential_hash.into(),
            role_id: None,
            department_id: None,
            email: None,
            phone: None,
        }
    }

    /// Sets the role reference.
    #[must_use]
    pub const fn with_role(mut self, role_id: RoleId) -> Self {
        self.role_id = Some(role_id);
        self
    }

    /// Sets the home department.
    #[must_use]
    pub const fn with_department(mut self, department_id: DepartmentId) -> Self {
        self.department_id = Some(department_id);
        self
    }

    /// Sets the contact email.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the contact phone.
    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }
}

/// Service-level errors for directory operations.
#[derive(Debug, Error)]
pub enum DirectoryServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] DirectoryDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] StoreError),
}

/// Result type for directory service operations.
pub type DirectoryServiceResult<T> = Result<T, DirectoryServiceError>;

/// Orchestration service over the directory repositories.
#[derive(Clone)]
pub struct DirectoryService<R, C>
where
    R: UserDirectory + OrgDirectory + FleetDirectory + ReportStore,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> DirectoryService<R, C>
where
    R: UserDirectory + OrgDirectory + FleetDirectory + ReportStore,
    C: Clock + Send + Sync,
{
    /// Creates a new directory service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Registers a user account.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError`] when validation fails, the username
    /// or email is taken, or a referenced role/department does not exist.
    pub async fn register_user(&self, request: RegisterUserRequest) -> DirectoryServiceResult<User> {
        let RegisterUserRequest {
            username,
            credential_hash,
            role_id,
            department_id,
            email,
            phone,
        } = request;

        let mut new = NewUser::new(Username::new(username)?, credential_hash);
        if let Some(role_id) = role_id {
            new = new.with_role(role_id);
        }
        if let Some(department_id) = department_id {
            new = new.with_department(department_id);
        }
        if let Some(email) = email {
            new = new.with_email(EmailAddress::new(email)?);
        }
        if let Some(phone) = phone {
            new = new.with_phone(phone);
        }

        let user = self.repository.create_user(new, self.clock.utc()).await?;
        tracing::info!(user_id = user.id.value(), username = %user.username, "user registered");
        Ok(user)
    }

    /// Finds a user by key. Returns `Ok(None)` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError::Repository`] when lookup fails.
    pub async fn find_user(&self, id: UserId) -> DirectoryServiceResult<Option<User>> {
        Ok(self.repository.find_user(id).await?)
    }

    /// Soft-deletes a user account.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError::Repository`] when the user does not
    /// exist.
    pub async fn deactivate_user(&self, id: UserId) -> DirectoryServiceResult<User> {
        let user = self.repository.deactivate_user(id, self.clock.utc()).await?;
        tracing::info!(user_id = id.value(), "user deactivated");
        Ok(user)
    }

    /// Creates or replaces a user's profile.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError`] when the user does not exist or the
    /// profile email is taken.
    pub async fn upsert_profile(
        &self,
        user_id: UserId,
        profile: NewUserProfile,
    ) -> DirectoryServiceResult<UserProfile> {
        Ok(self
            .repository
            .upsert_profile(user_id, profile, self.clock.utc())
            .await?)
    }

    /// Defines a role with a unique name.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError`] when the name is invalid or taken.
    pub async fn define_role(
        &self,
        name: &str,
        description: Option<String>,
    ) -> DirectoryServiceResult<Role> {
        let name = CapabilityName::new(name)?;
        Ok(self
            .repository
            .create_role(name, description, self.clock.utc())
            .await?)
    }

    /// Defines a permission with a unique name.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError`] when the name is invalid or taken.
    pub async fn define_permission(
        &self,
        name: &str,
        description: Option<String>,
    ) -> DirectoryServiceResult<Permission> {
        let name = CapabilityName::new(name)?;
        Ok(self
            .repository
            .create_permission(name, description, self.clock.utc())
            .await?)
    }

    /// Grants a permission to a role.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError::Repository`] when either side is
    /// missing or the pair is already granted.
    pub async fn grant_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> DirectoryServiceResult<()> {
        Ok(self
            .repository
            .grant_permission(role_id, permission_id)
            .await?)
    }

    /// Creates a department.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError`] when the name is empty.
    pub async fn create_department(
        &self,
        name: &str,
        location: Option<String>,
    ) -> DirectoryServiceResult<Department> {
        let name = non_empty(name, "department")?;
        Ok(self
            .repository
            .create_department(name, location, self.clock.utc())
            .await?)
    }

    /// Creates a ward under a department.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError`] when the name is empty or the
    /// department does not exist.
    pub async fn create_ward(
        &self,
        department_id: DepartmentId,
        name: &str,
    ) -> DirectoryServiceResult<Ward> {
        let name = non_empty(name, "ward")?;
        Ok(self
            .repository
            .create_ward(department_id, name, self.clock.utc())
            .await?)
    }

    /// Creates a job type.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError`] when the name is empty.
    pub async fn create_job_type(
        &self,
        name: &str,
        description: Option<String>,
    ) -> DirectoryServiceResult<JobType> {
        let name = non_empty(name, "job type")?;
        Ok(self
            .repository
            .create_job_type(name, description, self.clock.utc())
            .await?)
    }

    /// Soft-deletes a job type so it rejects new tasks.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError::Repository`] when the job type does
    /// not exist.
    pub async fn retire_job_type(&self, id: JobTypeId) -> DirectoryServiceResult<JobType> {
        Ok(self.repository.deactivate_job_type(id).await?)
    }

    /// Creates a break type.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError`] when the name is empty.
    pub async fn create_break_type(
        &self,
        name: &str,
        description: Option<String>,
    ) -> DirectoryServiceResult<BreakType> {
        let name = non_empty(name, "break type")?;
        Ok(self
            .repository
            .create_break_type(name, description, self.clock.utc())
            .await?)
    }

    /// Registers a vehicle.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError`] when the registration or kind is
    /// empty.
    pub async fn register_vehicle(
        &self,
        registration: &str,
        kind: &str,
    ) -> DirectoryServiceResult<Vehicle> {
        let new = NewVehicle::new(registration, kind)?;
        Ok(self.repository.create_vehicle(new, self.clock.utc()).await?)
    }

    /// Updates a vehicle's operational status.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError::Repository`] when the vehicle does
    /// not exist.
    pub async fn set_vehicle_status(
        &self,
        id: VehicleId,
        status: VehicleStatus,
    ) -> DirectoryServiceResult<Vehicle> {
        Ok(self
            .repository
            .set_vehicle_status(id, status, self.clock.utc())
            .await?)
    }

    /// Assigns a vehicle to a user, or releases it with `None`.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError::Repository`] when the vehicle or
    /// user does not exist.
    pub async fn assign_vehicle(
        &self,
        id: VehicleId,
        user_id: Option<UserId>,
    ) -> DirectoryServiceResult<Vehicle> {
        Ok(self
            .repository
            .assign_vehicle(id, user_id, self.clock.utc())
            .await?)
    }

    /// Issues a public submission link for a station user.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError::Repository`] when the station user
    /// does not exist.
    pub async fn issue_public_link(&self, station_id: UserId) -> DirectoryServiceResult<PublicLink> {
        let link = self
            .repository
            .create_public_link(LinkToken::generate(), station_id, self.clock.utc())
            .await?;
        tracing::info!(station_id = station_id.value(), token = %link.token, "public link issued");
        Ok(link)
    }

    /// Looks up an active public link by token. Returns `Ok(None)` when
    /// absent or deactivated.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError::Repository`] when lookup fails.
    pub async fn resolve_public_link(
        &self,
        token: LinkToken,
    ) -> DirectoryServiceResult<Option<PublicLink>> {
        Ok(self.repository.find_public_link(token).await?)
    }

    /// Records a generated report reference; file bytes live elsewhere.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryServiceError::Repository`] when the generating
    /// user does not exist.
    pub async fn record_report(
        &self,
        generated_by: UserId,
        report_type: impl Into<String>,
        file_path: impl Into<String>,
    ) -> DirectoryServiceResult<Report> {
        Ok(self
            .repository
            .create_report(
                generated_by,
                report_type.into(),
                file_path.into(),
                self.clock.utc(),
            )
            .await?)
    }
}

fn non_empty(value: &str, entity: &'static str) -> Result<String, DirectoryDomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DirectoryDomainError::EmptyName(entity));
    }
    Ok(trimmed.to_owned())
}
