//! In-memory repository for organizational reference data.
//!
//! All five directory ports are served from one lock-guarded state so that
//! uniqueness and referential checks observe a consistent snapshot.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::directory::domain::{
    BreakType, BreakTypeId, CapabilityName, Department, DepartmentId, JobType, JobTypeId,
    LinkToken, NewUser, NewUserProfile, NewVehicle, Permission, PermissionId, ProfileId,
    PublicLink, PublicLinkId, Report, ReportId, Role, RoleId, SettingId, SettingKey, SettingType,
    SystemSetting, User, UserId, UserProfile, Username, Vehicle, VehicleId, VehicleStatus, Ward,
    WardId,
};
use crate::directory::ports::{
    FleetDirectory, OrgDirectory, ReportStore, SettingsStore, UserDirectory,
};
use crate::store::{IdSequence, StoreError, StoreResult};

/// Thread-safe in-memory directory repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    state: Arc<RwLock<DirectoryState>>,
}

#[derive(Debug, Default)]
struct DirectoryState {
    users: HashMap<UserId, User>,
    username_index: HashMap<String, UserId>,
    email_index: HashMap<String, UserId>,
    profiles: HashMap<UserId, UserProfile>,
    roles: HashMap<RoleId, Role>,
    role_name_index: HashMap<String, RoleId>,
    permissions: HashMap<PermissionId, Permission>,
    permission_name_index: HashMap<String, PermissionId>,
    grants: HashSet<(RoleId, PermissionId)>,
    departments: HashMap<DepartmentId, Department>,
    wards: HashMap<WardId, Ward>,
    job_types: HashMap<JobTypeId, JobType>,
    break_types: HashMap<BreakTypeId, BreakType>,
    vehicles: HashMap<VehicleId, Vehicle>,
    public_links: HashMap<PublicLinkId, PublicLink>,
    link_token_index: HashMap<Uuid, PublicLinkId>,
    settings: HashMap<String, SystemSetting>,
    reports: HashMap<ReportId, Report>,
    sequences: Sequences,
}

#[derive(Debug, Default)]
struct Sequences {
    users: IdSequence,
    profiles: IdSequence,
    roles: IdSequence,
    permissions: IdSequence,
    departments: IdSequence,
    wards: IdSequence,
    job_types: IdSequence,
    break_types: IdSequence,
    vehicles: IdSequence,
    public_links: IdSequence,
    settings: IdSequence,
    reports: IdSequence,
}

impl InMemoryDirectory {
    /// Creates an empty in-memory directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, DirectoryState>> {
        self.state.read().map_err(StoreError::poisoned)
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, DirectoryState>> {
        self.state.write().map_err(StoreError::poisoned)
    }
}

impl DirectoryState {
    fn require_user(&self, entity: &'static str, id: UserId) -> StoreResult<()> {
        if self.users.contains_key(&id) {
            Ok(())
        } else {
            Err(StoreError::dangling(entity, "user", id.value()))
        }
    }
}

#[async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn create_user(&self, new: NewUser, now: DateTime<Utc>) -> StoreResult<User> {
        let mut state = self.write()?;
        if state.username_index.contains_key(new.username.as_str()) {
            return Err(StoreError::conflict(
                "user",
                "username",
                new.username.as_str(),
            ));
        }
        if let Some(email) = &new.email
            && state.email_index.contains_key(email.as_str())
        {
            return Err(StoreError::conflict("user", "email", email.as_str()));
        }
        if let Some(role_id) = new.role_id
            && !state.roles.contains_key(&role_id)
        {
            return Err(StoreError::dangling("user", "role", role_id.value()));
        }
        if let Some(department_id) = new.department_id
            && !state.departments.contains_key(&department_id)
        {
            return Err(StoreError::dangling(
                "user",
                "department",
                department_id.value(),
            ));
        }

        let id = UserId::new(state.sequences.users.next());
        let user = User {
            id,
            username: new.username,
            credential_hash: new.credential_hash,
            role_id: new.role_id,
            department_id: new.department_id,
            is_active: true,
            email: new.email,
            phone: new.phone,
            created_at: now,
            updated_at: now,
        };
        state
            .username_index
            .insert(user.username.as_str().to_owned(), id);
        if let Some(email) = &user.email {
            state.email_index.insert(email.as_str().to_owned(), id);
        }
        state.users.insert(id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: UserId) -> StoreResult<Option<User>> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &Username) -> StoreResult<Option<User>> {
        let state = self.read()?;
        Ok(state
            .username_index
            .get(username.as_str())
            .and_then(|id| state.users.get(id))
            .cloned())
    }

    async fn deactivate_user(&self, id: UserId, now: DateTime<Utc>) -> StoreResult<User> {
        let mut state = self.write()?;
        let user = state
            .users
            .get_mut(&id)
            .ok_or(StoreError::not_found("user", id.value()))?;
        user.is_active = false;
        user.updated_at = now;
        Ok(user.clone())
    }

    async fn list_active_users(
        &self,
        role_id: RoleId,
        department_id: Option<DepartmentId>,
    ) -> StoreResult<Vec<User>> {
        let state = self.read()?;
        let mut users: Vec<User> = state
            .users
            .values()
            .filter(|user| {
                user.is_active
                    && user.role_id == Some(role_id)
                    && department_id.is_none_or(|dept| user.department_id == Some(dept))
            })
            .cloned()
            .collect();
        users.sort_by_key(|user| user.id);
        Ok(users)
    }

    async fn upsert_profile(
        &self,
        user_id: UserId,
        profile: NewUserProfile,
        now: DateTime<Utc>,
    ) -> StoreResult<UserProfile> {
        let mut state = self.write()?;
        state.require_user("user_profile", user_id)?;
        if let Some(email) = &profile.email {
            let taken = state
                .profiles
                .values()
                .any(|p| p.user_id != user_id && p.email.as_ref() == Some(email));
            if taken {
                return Err(StoreError::conflict("user_profile", "email", email.as_str()));
            }
        }

        let existing = state.profiles.get(&user_id).cloned();
        let (id, created_at) = existing.map_or_else(
            || (ProfileId::new(state.sequences.profiles.next()), now),
            |p| (p.id, p.created_at),
        );
        let record = UserProfile {
            id,
            user_id,
            first_name: profile.first_name,
            last_name: profile.last_name,
            address: profile.address,
            phone: profile.phone,
            email: profile.email,
            created_at,
            updated_at: now,
        };
        state.profiles.insert(user_id, record.clone());
        Ok(record)
    }

    async fn find_profile(&self, user_id: UserId) -> StoreResult<Option<UserProfile>> {
        Ok(self.read()?.profiles.get(&user_id).cloned())
    }

    async fn create_public_link(
        &self,
        token: LinkToken,
        station_id: UserId,
        now: DateTime<Utc>,
    ) -> StoreResult<PublicLink> {
        let mut state = self.write()?;
        state.require_user("public_link", station_id)?;
        if state.link_token_index.contains_key(&token.into_inner()) {
            return Err(StoreError::conflict(
                "public_link",
                "token",
                token.to_string(),
            ));
        }
        let id = PublicLinkId::new(state.sequences.public_links.next());
        let link = PublicLink {
            id,
            token,
            station_id,
            is_active: true,
            created_at: now,
        };
        state.link_token_index.insert(token.into_inner(), id);
        state.public_links.insert(id, link.clone());
        Ok(link)
    }

    async fn find_public_link(&self, token: LinkToken) -> StoreResult<Option<PublicLink>> {
        let state = self.read()?;
        Ok(state
            .link_token_index
            .get(&token.into_inner())
            .and_then(|id| state.public_links.get(id))
            .filter(|link| link.is_active)
            .cloned())
    }

    async fn deactivate_public_link(&self, token: LinkToken) -> StoreResult<PublicLink> {
        let mut state = self.write()?;
        let id = *state
            .link_token_index
            .get(&token.into_inner())
            .ok_or_else(|| StoreError::conflict("public_link", "token", token.to_string()))?;
        let link = state
            .public_links
            .get_mut(&id)
            .ok_or(StoreError::not_found("public_link", id.value()))?;
        link.is_active = false;
        Ok(link.clone())
    }
}

#[async_trait]
impl OrgDirectory for InMemoryDirectory {
    async fn create_role(
        &self,
        name: CapabilityName,
        description: Option<String>,
        now: DateTime<Utc>,
    ) -> StoreResult<Role> {
        let mut state = self.write()?;
        if state.role_name_index.contains_key(name.as_str()) {
            return Err(StoreError::conflict("role", "name", name.as_str()));
        }
        let id = RoleId::new(state.sequences.roles.next());
        let role = Role {
            id,
            name,
            description,
            created_at: now,
        };
        state
            .role_name_index
            .insert(role.name.as_str().to_owned(), id);
        state.roles.insert(id, role.clone());
        Ok(role)
    }

    async fn find_role(&self, id: RoleId) -> StoreResult<Option<Role>> {
        Ok(self.read()?.roles.get(&id).cloned())
    }

    async fn find_role_by_name(&self, name: &CapabilityName) -> StoreResult<Option<Role>> {
        let state = self.read()?;
        Ok(state
            .role_name_index
            .get(name.as_str())
            .and_then(|id| state.roles.get(id))
            .cloned())
    }

    async fn create_permission(
        &self,
        name: CapabilityName,
        description: Option<String>,
        now: DateTime<Utc>,
    ) -> StoreResult<Permission> {
        let mut state = self.write()?;
        if state.permission_name_index.contains_key(name.as_str()) {
            return Err(StoreError::conflict("permission", "name", name.as_str()));
        }
        let id = PermissionId::new(state.sequences.permissions.next());
        let permission = Permission {
            id,
            name,
            description,
            created_at: now,
        };
        state
            .permission_name_index
            .insert(permission.name.as_str().to_owned(), id);
        state.permissions.insert(id, permission.clone());
        Ok(permission)
    }

    async fn grant_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> StoreResult<()> {
        let mut state = self.write()?;
        if !state.roles.contains_key(&role_id) {
            return Err(StoreError::dangling("role_permission", "role", role_id.value()));
        }
        if !state.permissions.contains_key(&permission_id) {
            return Err(StoreError::dangling(
                "role_permission",
                "permission",
                permission_id.value(),
            ));
        }
        if !state.grants.insert((role_id, permission_id)) {
            return Err(StoreError::conflict(
                "role_permission",
                "pair",
                format!("{role_id}/{permission_id}"),
            ));
        }
        Ok(())
    }

    async fn list_permissions(&self, role_id: RoleId) -> StoreResult<Vec<Permission>> {
        let state = self.read()?;
        let mut permissions: Vec<Permission> = state
            .grants
            .iter()
            .filter(|(role, _)| *role == role_id)
            .filter_map(|(_, permission)| state.permissions.get(permission))
            .cloned()
            .collect();
        permissions.sort_by_key(|p| p.id);
        Ok(permissions)
    }

    async fn create_department(
        &self,
        name: String,
        location: Option<String>,
        now: DateTime<Utc>,
    ) -> StoreResult<Department> {
        let mut state = self.write()?;
        let id = DepartmentId::new(state.sequences.departments.next());
        let department = Department {
            id,
            name,
            location,
            created_at: now,
            updated_at: now,
        };
        state.departments.insert(id, department.clone());
        Ok(department)
    }

    async fn find_department(&self, id: DepartmentId) -> StoreResult<Option<Department>> {
        Ok(self.read()?.departments.get(&id).cloned())
    }

    async fn create_ward(
        &self,
        department_id: DepartmentId,
        name: String,
        now: DateTime<Utc>,
    ) -> StoreResult<Ward> {
        let mut state = self.write()?;
        if !state.departments.contains_key(&department_id) {
            return Err(StoreError::dangling(
                "ward",
                "department",
                department_id.value(),
            ));
        }
        let id = WardId::new(state.sequences.wards.next());
        let ward = Ward {
            id,
            department_id,
            name,
            created_at: now,
            updated_at: now,
        };
        state.wards.insert(id, ward.clone());
        Ok(ward)
    }

    async fn find_ward(&self, id: WardId) -> StoreResult<Option<Ward>> {
        Ok(self.read()?.wards.get(&id).cloned())
    }

    async fn list_wards(&self, department_id: DepartmentId) -> StoreResult<Vec<Ward>> {
        let state = self.read()?;
        let mut wards: Vec<Ward> = state
            .wards
            .values()
            .filter(|ward| ward.department_id == department_id)
            .cloned()
            .collect();
        wards.sort_by_key(|ward| ward.id);
        Ok(wards)
    }

    async fn create_job_type(
        &self,
        name: String,
        description: Option<String>,
        now: DateTime<Utc>,
    ) -> StoreResult<JobType> {
        let mut state = self.write()?;
        let id = JobTypeId::new(state.sequences.job_types.next());
        let job_type = JobType {
            id,
            name,
            description,
            is_active: true,
            created_at: now,
        };
        state.job_types.insert(id, job_type.clone());
        Ok(job_type)
    }

    async fn find_job_type(&self, id: JobTypeId) -> StoreResult<Option<JobType>> {
        Ok(self.read()?.job_types.get(&id).cloned())
    }

    async fn deactivate_job_type(&self, id: JobTypeId) -> StoreResult<JobType> {
        let mut state = self.write()?;
        let job_type = state
            .job_types
            .get_mut(&id)
            .ok_or(StoreError::not_found("job_type", id.value()))?;
        job_type.is_active = false;
        Ok(job_type.clone())
    }

    async fn create_break_type(
        &self,
        name: String,
        description: Option<String>,
        now: DateTime<Utc>,
    ) -> StoreResult<BreakType> {
        let mut state = self.write()?;
        let id = BreakTypeId::new(state.sequences.break_types.next());
        let break_type = BreakType {
            id,
            name,
            description,
            created_at: now,
        };
        state.break_types.insert(id, break_type.clone());
        Ok(break_type)
    }

    async fn find_break_type(&self, id: BreakTypeId) -> StoreResult<Option<BreakType>> {
        Ok(self.read()?.break_types.get(&id).cloned())
    }
}

#[async_trait]
impl FleetDirectory for InMemoryDirectory {
    async fn create_vehicle(&self, new: NewVehicle, now: DateTime<Utc>) -> StoreResult<Vehicle> {
        let mut state = self.write()?;
        let id = VehicleId::new(state.sequences.vehicles.next());
        let vehicle = Vehicle {
            id,
            registration: new.registration,
            kind: new.kind,
            status: VehicleStatus::Available,
            assigned_to: None,
            created_at: now,
            updated_at: now,
        };
        state.vehicles.insert(id, vehicle.clone());
        Ok(vehicle)
    }

    async fn find_vehicle(&self, id: VehicleId) -> StoreResult<Option<Vehicle>> {
        Ok(self.read()?.vehicles.get(&id).cloned())
    }

    async fn set_vehicle_status(
        &self,
        id: VehicleId,
        status: VehicleStatus,
        now: DateTime<Utc>,
    ) -> StoreResult<Vehicle> {
        let mut state = self.write()?;
        let vehicle = state
            .vehicles
            .get_mut(&id)
            .ok_or(StoreError::not_found("vehicle", id.value()))?;
        vehicle.status = status;
        vehicle.updated_at = now;
        Ok(vehicle.clone())
    }

    async fn assign_vehicle(
        &self,
        id: VehicleId,
        user_id: Option<UserId>,
        now: DateTime<Utc>,
    ) -> StoreResult<Vehicle> {
        let mut state = self.write()?;
        if let Some(user_id) = user_id {
            state.require_user("vehicle", user_id)?;
        }
        let vehicle = state
            .vehicles
            .get_mut(&id)
            .ok_or(StoreError::not_found("vehicle", id.value()))?;
        vehicle.assigned_to = user_id;
        vehicle.updated_at = now;
        Ok(vehicle.clone())
    }
}

#[async_trait]
impl SettingsStore for InMemoryDirectory {
    async fn put_setting(
        &self,
        key: SettingKey,
        value: String,
        data_type: Option<SettingType>,
        now: DateTime<Utc>,
    ) -> StoreResult<SystemSetting> {
        let mut state = self.write()?;
        let existing_id = state.settings.get(key.as_str()).map(|s| s.id);
        let id = existing_id
            .unwrap_or_else(|| SettingId::new(state.sequences.settings.next()));
        let setting = SystemSetting {
            id,
            key,
            value,
            data_type,
            updated_at: now,
        };
        state
            .settings
            .insert(setting.key.as_str().to_owned(), setting.clone());
        Ok(setting)
    }

    async fn find_setting(&self, key: &SettingKey) -> StoreResult<Option<SystemSetting>> {
        Ok(self.read()?.settings.get(key.as_str()).cloned())
    }

    async fn list_settings(&self) -> StoreResult<Vec<SystemSetting>> {
        let mut settings: Vec<SystemSetting> = self.read()?.settings.values().cloned().collect();
        settings.sort_by_key(|s| s.id);
        Ok(settings)
    }
}

#[async_trait]
impl ReportStore for InMemoryDirectory {
    async fn create_report(
        &self,
        generated_by: UserId,
        report_type: String,
        file_path: String,
        now: DateTime<Utc>,
    ) -> StoreResult<Report> {
        let mut state = self.write()?;
        state.require_user("report", generated_by)?;
        let id = ReportId::new(state.sequences.reports.next());
        let report = Report {
            id,
            generated_by,
            report_type,
            file_path,
            generated_at: now,
        };
        state.reports.insert(id, report.clone());
        Ok(report)
    }

    async fn list_reports(&self, generated_by: UserId) -> StoreResult<Vec<Report>> {
        let state = self.read()?;
        let mut reports: Vec<Report> = state
            .reports
            .values()
            .filter(|report| report.generated_by == generated_by)
            .cloned()
            .collect();
        reports.sort_by_key(|report| report.id);
        Ok(reports)
    }
}
