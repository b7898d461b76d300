//! `PostgreSQL` repository implementation for directory persistence.

use super::models::{
    self, BreakTypeRow, DepartmentRow, JobTypeRow, PermissionRow, ProfileRow, PublicLinkRow,
    ReportRow, RoleRow, SettingRow, UserRow, VehicleRow, WardRow,
};
use super::schema::{
    break_types, departments, job_types, permissions, public_links, reports, role_permissions,
    roles, system_settings, user_profiles, users, vehicles, wards,
};
use crate::directory::domain::{
    BreakType, BreakTypeId, CapabilityName, Department, DepartmentId, JobType, JobTypeId,
    LinkToken, NewUser, NewUserProfile, NewVehicle, Permission, PermissionId, PublicLink, Report,
    Role, RoleId, SettingKey, SettingType, SystemSetting, User, UserId, UserProfile, Username,
    Vehicle, VehicleId, VehicleStatus, Ward, WardId,
};
use crate::directory::ports::{
    FleetDirectory, OrgDirectory, ReportStore, SettingsStore, UserDirectory,
};
use crate::store::{StoreError, StoreResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by directory adapters.
pub type DirectoryPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed directory covering users, organization, fleet,
/// settings, and reports.
#[derive(Debug, Clone)]
pub struct PostgresDirectory {
    pool: DirectoryPgPool,
}

impl PostgresDirectory {
    /// Creates a directory from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: DirectoryPgPool) -> Self {
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

/// Maps a unique violation to a conflict and anything else to a
/// persistence error.
fn unique_or_persistence(
    entity: &'static str,
    field: &'static str,
    value: String,
) -> impl FnOnce(DieselError) -> StoreError {
    move |err| match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            StoreError::conflict(entity, field, value)
        }
        _ => StoreError::persistence(err),
    }
}

#[async_trait]
impl UserDirectory for PostgresDirectory {
    async fn create_user(&self, new: NewUser, now: DateTime<Utc>) -> StoreResult<User> {
        self.run_blocking(move |connection| {
            if let Some(role_id) = new.role_id
                && find_role_row(connection, role_id)?.is_none()
            {
                return Err(StoreError::dangling("user", "role", role_id.value()));
            }
            if let Some(department_id) = new.department_id
                && find_department_row(connection, department_id)?.is_none()
            {
                return Err(StoreError::dangling(
                    "user",
                    "department",
                    department_id.value(),
                ));
            }
            let username = new.username.as_str().to_owned();
            let inserted: UserRow = diesel::insert_into(users::table)
                .values((
                    users::username.eq(new.username.as_str()),
                    users::credential_hash.eq(&new.credential_hash),
                    users::role_id.eq(new.role_id.map(|id| id.value())),
                    users::department_id.eq(new.department_id.map(|id| id.value())),
                    users::is_active.eq(true),
                    users::email.eq(new.email.as_ref().map(|e| e.as_str())),
                    users::phone.eq(&new.phone),
                    users::created_at.eq(now),
                    users::updated_at.eq(now),
                ))
                .get_result(connection)
                .map_err(|err| match &err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info)
                        if info.constraint_name().is_some_and(|c| c.contains("email")) =>
                    {
                        StoreError::conflict(
                            "user",
                            "email",
                            new.email.as_ref().map(|e| e.as_str()).unwrap_or_default(),
                        )
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        StoreError::conflict("user", "username", username.clone())
                    }
                    _ => StoreError::persistence(err),
                })?;
            models::row_to_user(inserted)
        })
        .await
    }

    async fn find_user(&self, id: UserId) -> StoreResult<Option<User>> {
        self.run_blocking(move |connection| {
            find_user_row(connection, id)?
                .map(models::row_to_user)
                .transpose()
        })
        .await
    }

    async fn find_user_by_username(&self, username: &Username) -> StoreResult<Option<User>> {
        let username = username.as_str().to_owned();
        self.run_blocking(move |connection| {
            users::table
                .filter(users::username.eq(&username))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(StoreError::persistence)?
                .map(models::row_to_user)
                .transpose()
        })
        .await
    }

    async fn deactivate_user(&self, id: UserId, now: DateTime<Utc>) -> StoreResult<User> {
        self.run_blocking(move |connection| {
            let updated: Option<UserRow> =
                diesel::update(users::table.filter(users::id.eq(id.value())))
                    .set((users::is_active.eq(false), users::updated_at.eq(now)))
                    .get_result(connection)
                    .optional()
                    .map_err(StoreError::persistence)?;
            updated
                .ok_or(StoreError::not_found("user", id.value()))
                .and_then(models::row_to_user)
        })
        .await
    }

    async fn list_active_users(
        &self,
        role_id: RoleId,
        department_id: Option<DepartmentId>,
    ) -> StoreResult<Vec<User>> {
        self.run_blocking(move |connection| {
            let mut query = users::table
                .filter(users::is_active.eq(true))
                .filter(users::role_id.eq(role_id.value()))
                .into_boxed();
            if let Some(department_id) = department_id {
                query = query.filter(users::department_id.eq(department_id.value()));
            }
            let rows = query
                .order(users::id.asc())
                .select(UserRow::as_select())
                .load::<UserRow>(connection)
                .map_err(StoreError::persistence)?;
            rows.into_iter().map(models::row_to_user).collect()
        })
        .await
    }

    async fn upsert_profile(
        &self,
        user_id: UserId,
        profile: NewUserProfile,
        now: DateTime<Utc>,
    ) -> StoreResult<UserProfile> {
        self.run_blocking(move |connection| {
            if find_user_row(connection, user_id)?.is_none() {
                return Err(StoreError::dangling("user_profile", "user", user_id.value()));
            }
            let email = profile.email.as_ref().map(|e| e.as_str().to_owned());
            let existing: Option<ProfileRow> = user_profiles::table
                .filter(user_profiles::user_id.eq(user_id.value()))
                .select(ProfileRow::as_select())
                .first::<ProfileRow>(connection)
                .optional()
                .map_err(StoreError::persistence)?;
            let row: ProfileRow = if let Some(existing) = existing {
                diesel::update(user_profiles::table.filter(user_profiles::id.eq(existing.id)))
                    .set((
                        user_profiles::first_name.eq(&profile.first_name),
                        user_profiles::last_name.eq(&profile.last_name),
                        user_profiles::address.eq(&profile.address),
                        user_profiles::phone.eq(&profile.phone),
                        user_profiles::email.eq(&email),
                        user_profiles::updated_at.eq(now),
                    ))
                    .get_result(connection)
                    .map_err(unique_or_persistence(
                        "user_profile",
                        "email",
                        email.clone().unwrap_or_default(),
                    ))?
            } else {
                diesel::insert_into(user_profiles::table)
                    .values((
                        user_profiles::user_id.eq(user_id.value()),
                        user_profiles::first_name.eq(&profile.first_name),
                        user_profiles::last_name.eq(&profile.last_name),
                        user_profiles::address.eq(&profile.address),
                        user_profiles::phone.eq(&profile.phone),
                        user_profiles::email.eq(&email),
                        user_profiles::created_at.eq(now),
                        user_profiles::updated_at.eq(now),
                    ))
                    .get_result(connection)
                    .map_err(unique_or_persistence(
                        "user_profile",
                        "email",
                        email.clone().unwrap_or_default(),
                    ))?
            };
            models::row_to_profile(row)
        })
        .await
    }

    async fn find_profile(&self, user_id: UserId) -> StoreResult<Option<UserProfile>> {
        self.run_blocking(move |connection| {
            user_profiles::table
                .filter(user_profiles::user_id.eq(user_id.value()))
                .select(ProfileRow::as_select())
                .first::<ProfileRow>(connection)
                .optional()
                .map_err(StoreError::persistence)?
                .map(models::row_to_profile)
                .transpose()
        })
        .await
    }

    async fn create_public_link(
        &self,
        token: LinkToken,
        station_id: UserId,
        now: DateTime<Utc>,
    ) -> StoreResult<PublicLink> {
        self.run_blocking(move |connection| {
            if find_user_row(connection, station_id)?.is_none() {
                return Err(StoreError::dangling(
                    "public_link",
                    "user",
                    station_id.value(),
                ));
            }
            let inserted: PublicLinkRow = diesel::insert_into(public_links::table)
                .values((
                    public_links::token.eq(token.into_inner()),
                    public_links::station_id.eq(station_id.value()),
                    public_links::is_active.eq(true),
                    public_links::created_at.eq(now),
                ))
                .get_result(connection)
                .map_err(unique_or_persistence(
                    "public_link",
                    "token",
                    token.into_inner().to_string(),
                ))?;
            Ok(models::row_to_public_link(inserted))
        })
        .await
    }

    async fn find_public_link(&self, token: LinkToken) -> StoreResult<Option<PublicLink>> {
        self.run_blocking(move |connection| {
            let row = public_links::table
                .filter(public_links::token.eq(token.into_inner()))
                .filter(public_links::is_active.eq(true))
                .select(PublicLinkRow::as_select())
                .first::<PublicLinkRow>(connection)
                .optional()
                .map_err(StoreError::persistence)?;
            Ok(row.map(models::row_to_public_link))
        })
        .await
    }

    async fn deactivate_public_link(&self, token: LinkToken) -> StoreResult<PublicLink> {
        self.run_blocking(move |connection| {
            let updated: Option<PublicLinkRow> = diesel::update(
                public_links::table.filter(public_links::token.eq(token.into_inner())),
            )
            .set(public_links::is_active.eq(false))
            .get_result(connection)
            .optional()
            .map_err(StoreError::persistence)?;
            updated.map(models::row_to_public_link).ok_or_else(|| {
                StoreError::conflict("public_link", "token", token.into_inner().to_string())
            })
        })
        .await
    }
}

#[async_trait]
impl OrgDirectory for PostgresDirectory {
    async fn create_role(
        &self,
        name: CapabilityName,
        description: Option<String>,
        now: DateTime<Utc>,
    ) -> StoreResult<Role> {
        self.run_blocking(move |connection| {
            let value = name.as_str().to_owned();
            let inserted: RoleRow = diesel::insert_into(roles::table)
                .values((
                    roles::name.eq(name.as_str()),
                    roles::description.eq(&description),
                    roles::created_at.eq(now),
                ))
                .get_result(connection)
                .map_err(unique_or_persistence("role", "name", value))?;
            models::row_to_role(inserted)
        })
        .await
    }

    async fn find_role(&self, id: RoleId) -> StoreResult<Option<Role>> {
        self.run_blocking(move |connection| {
            find_role_row(connection, id)?
                .map(models::row_to_role)
                .transpose()
        })
        .await
    }

    async fn find_role_by_name(&self, name: &CapabilityName) -> StoreResult<Option<Role>> {
        let name = name.as_str().to_owned();
        self.run_blocking(move |connection| {
            roles::table
                .filter(roles::name.eq(&name))
                .select(RoleRow::as_select())
                .first::<RoleRow>(connection)
                .optional()
                .map_err(StoreError::persistence)?
                .map(models::row_to_role)
                .transpose()
        })
        .await
    }

    async fn create_permission(
        &self,
        name: CapabilityName,
        description: Option<String>,
        now: DateTime<Utc>,
    ) -> StoreResult<Permission> {
        self.run_blocking(move |connection| {
            let value = name.as_str().to_owned();
            let inserted: PermissionRow = diesel::insert_into(permissions::table)
                .values((
                    permissions::name.eq(name.as_str()),
                    permissions::description.eq(&description),
                    permissions::created_at.eq(now),
                ))
                .get_result(connection)
                .map_err(unique_or_persistence("permission", "name", value))?;
            models::row_to_permission(inserted)
        })
        .await
    }

    async fn grant_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> StoreResult<()> {
        self.run_blocking(move |connection| {
            diesel::insert_into(role_permissions::table)
                .values((
                    role_permissions::role_id.eq(role_id.value()),
                    role_permissions::permission_id.eq(permission_id.value()),
                ))
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        StoreError::conflict(
                            "role_permission",
                            "pair",
                            format!("{role_id}:{permission_id}"),
                        )
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, ref info)
                        if info.constraint_name().is_some_and(|c| c.contains("permission_id")) =>
                    {
                        StoreError::dangling(
                            "role_permission",
                            "permission",
                            permission_id.value(),
                        )
                    }
                    DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                        StoreError::dangling("role_permission", "role", role_id.value())
                    }
                    _ => StoreError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn list_permissions(&self, role_id: RoleId) -> StoreResult<Vec<Permission>> {
        self.run_blocking(move |connection| {
            let ids: Vec<i64> = role_permissions::table
                .filter(role_permissions::role_id.eq(role_id.value()))
                .select(role_permissions::permission_id)
                .load::<i64>(connection)
                .map_err(StoreError::persistence)?;
            let rows = permissions::table
                .filter(permissions::id.eq_any(ids))
                .order(permissions::id.asc())
                .select(PermissionRow::as_select())
                .load::<PermissionRow>(connection)
                .map_err(StoreError::persistence)?;
            rows.into_iter().map(models::row_to_permission).collect()
        })
        .await
    }

    async fn create_department(
        &self,
        name: String,
        location: Option<String>,
        now: DateTime<Utc>,
    ) -> StoreResult<Department> {
        self.run_blocking(move |connection| {
            let inserted: DepartmentRow = diesel::insert_into(departments::table)
                .values((
                    departments::name.eq(&name),
                    departments::location.eq(&location),
                    departments::created_at.eq(now),
                    departments::updated_at.eq(now),
                ))
                .get_result(connection)
                .map_err(StoreError::persistence)?;
            Ok(models::row_to_department(inserted))
        })
        .await
    }

    async fn find_department(&self, id: DepartmentId) -> StoreResult<Option<Department>> {
        self.run_blocking(move |connection| {
            Ok(find_department_row(connection, id)?.map(models::row_to_department))
        })
        .await
    }

    async fn create_ward(
        &self,
        department_id: DepartmentId,
        name: String,
        now: DateTime<Utc>,
    ) -> StoreResult<Ward> {
        self.run_blocking(move |connection| {
            if find_department_row(connection, department_id)?.is_none() {
                return Err(StoreError::dangling(
                    "ward",
                    "department",
                    department_id.value(),
                ));
            }
            let inserted: WardRow = diesel::insert_into(wards::table)
                .values((
                    wards::department_id.eq(department_id.value()),
                    wards::name.eq(&name),
                    wards::created_at.eq(now),
                    wards::updated_at.eq(now),
                ))
                .get_result(connection)
                .map_err(StoreError::persistence)?;
            Ok(models::row_to_ward(inserted))
        })
        .await
    }

    async fn find_ward(&self, id: WardId) -> StoreResult<Option<Ward>> {
        self.run_blocking(move |connection| {
            let row = wards::table
                .filter(wards::id.eq(id.value()))
                .select(WardRow::as_select())
                .first::<WardRow>(connection)
                .optional()
                .map_err(StoreError::persistence)?;
            Ok(row.map(models::row_to_ward))
        })
        .await
    }

    async fn list_wards(&self, department_id: DepartmentId) -> StoreResult<Vec<Ward>> {
        self.run_blocking(move |connection| {
            let rows = wards::table
                .filter(wards::department_id.eq(department_id.value()))
                .order(wards::id.asc())
                .select(WardRow::as_select())
                .load::<WardRow>(connection)
                .map_err(StoreError::persistence)?;
            Ok(rows.into_iter().map(models::row_to_ward).collect())
        })
        .await
    }

    async fn create_job_type(
        &self,
        name: String,
        description: Option<String>,
        now: DateTime<Utc>,
    ) -> StoreResult<JobType> {
        self.run_blocking(move |connection| {
            let inserted: JobTypeRow = diesel::insert_into(job_types::table)
                .values((
                    job_types::name.eq(&name),
                    job_types::description.eq(&description),
                    job_types::is_active.eq(true),
                    job_types::created_at.eq(now),
                ))
                .get_result(connection)
                .map_err(StoreError::persistence)?;
            Ok(models::row_to_job_type(inserted))
        })
        .await
    }

    async fn find_job_type(&self, id: JobTypeId) -> StoreResult<Option<JobType>> {
        self.run_blocking(move |connection| {
            let row = job_types::table
                .filter(job_types::id.eq(id.value()))
                .select(JobTypeRow::as_select())
                .first::<JobTypeRow>(connection)
                .optional()
                .map_err(StoreError::persistence)?;
            Ok(row.map(models::row_to_job_type))
        })
        .await
    }

    async fn deactivate_job_type(&self, id: JobTypeId) -> StoreResult<JobType> {
        self.run_blocking(move |connection| {
            let updated: Option<JobTypeRow> =
                diesel::update(job_types::table.filter(job_types::id.eq(id.value())))
                    .set(job_types::is_active.eq(false))
                    .get_result(connection)
                    .optional()
                    .map_err(StoreError::persistence)?;
            updated
                .map(models::row_to_job_type)
                .ok_or(StoreError::not_found("job type", id.value()))
        })
        .await
    }

    async fn create_break_type(
        &self,
        name: String,
        description: Option<String>,
        now: DateTime<Utc>,
    ) -> StoreResult<BreakType> {
        self.run_blocking(move |connection| {
            let inserted: BreakTypeRow = diesel::insert_into(break_types::table)
                .values((
                    break_types::name.eq(&name),
                    break_types::description.eq(&description),
                    break_types::created_at.eq(now),
                ))
                .get_result(connection)
                .map_err(StoreError::persistence)?;
            Ok(models::row_to_break_type(inserted))
        })
        .await
    }

    async fn find_break_type(&self, id: BreakTypeId) -> StoreResult<Option<BreakType>> {
        self.run_blocking(move |connection| {
            let row = break_types::table
                .filter(break_types::id.eq(id.value()))
                .select(BreakTypeRow::as_select())
                .first::<BreakTypeRow>(connection)
                .optional()
                .map_err(StoreError::persistence)?;
            Ok(row.map(models::row_to_break_type))
        })
        .await
    }
}

#[async_trait]
impl FleetDirectory for PostgresDirectory {
    async fn create_vehicle(&self, new: NewVehicle, now: DateTime<Utc>) -> StoreResult<Vehicle> {
        self.run_blocking(move |connection| {
            let registration = new.registration.clone();
            let inserted: VehicleRow = diesel::insert_into(vehicles::table)
                .values((
                    vehicles::registration.eq(&new.registration),
                    vehicles::kind.eq(&new.kind),
                    vehicles::status.eq(VehicleStatus::Available.as_str()),
                    vehicles::created_at.eq(now),
                    vehicles::updated_at.eq(now),
                ))
                .get_result(connection)
                .map_err(unique_or_persistence("vehicle", "registration", registration))?;
            models::row_to_vehicle(inserted)
        })
        .await
    }

    async fn find_vehicle(&self, id: VehicleId) -> StoreResult<Option<Vehicle>> {
        self.run_blocking(move |connection| {
            let row = vehicles::table
                .filter(vehicles::id.eq(id.value()))
                .select(VehicleRow::as_select())
                .first::<VehicleRow>(connection)
                .optional()
                .map_err(StoreError::persistence)?;
            row.map(models::row_to_vehicle).transpose()
        })
        .await
    }

    async fn set_vehicle_status(
        &self,
        id: VehicleId,
        status: VehicleStatus,
        now: DateTime<Utc>,
    ) -> StoreResult<Vehicle> {
        self.run_blocking(move |connection| {
            let updated: Option<VehicleRow> =
                diesel::update(vehicles::table.filter(vehicles::id.eq(id.value())))
                    .set((
                        vehicles::status.eq(status.as_str()),
                        vehicles::updated_at.eq(now),
                    ))
                    .get_result(connection)
                    .optional()
                    .map_err(StoreError::persistence)?;
            updated
                .ok_or(StoreError::not_found("vehicle", id.value()))
                .and_then(models::row_to_vehicle)
        })
        .await
    }

    async fn assign_vehicle(
        &self,
        id: VehicleId,
        user_id: Option<UserId>,
        now: DateTime<Utc>,
    ) -> StoreResult<Vehicle> {
        self.run_blocking(move |connection| {
            if let Some(user_id) = user_id
                && find_user_row(connection, user_id)?.is_none()
            {
                return Err(StoreError::dangling("vehicle", "user", user_id.value()));
            }
            let updated: Option<VehicleRow> =
                diesel::update(vehicles::table.filter(vehicles::id.eq(id.value())))
                    .set((
                        vehicles::assigned_to.eq(user_id.map(|u| u.value())),
                        vehicles::updated_at.eq(now),
                    ))
                    .get_result(connection)
                    .optional()
                    .map_err(StoreError::persistence)?;
            updated
                .ok_or(StoreError::not_found("vehicle", id.value()))
                .and_then(models::row_to_vehicle)
        })
        .await
    }
}

#[async_trait]
impl SettingsStore for PostgresDirectory {
    async fn put_setting(
        &self,
        key: SettingKey,
        value: String,
        data_type: Option<SettingType>,
        now: DateTime<Utc>,
    ) -> StoreResult<SystemSetting> {
        self.run_blocking(move |connection| {
            let inserted: SettingRow = diesel::insert_into(system_settings::table)
                .values((
                    system_settings::key.eq(key.as_str()),
                    system_settings::value.eq(&value),
                    system_settings::data_type.eq(data_type.map(SettingType::as_str)),
                    system_settings::updated_at.eq(now),
                ))
                .on_conflict(system_settings::key)
                .do_update()
                .set((
                    system_settings::value.eq(&value),
                    system_settings::data_type.eq(data_type.map(SettingType::as_str)),
                    system_settings::updated_at.eq(now),
                ))
                .get_result(connection)
                .map_err(StoreError::persistence)?;
            models::row_to_setting(inserted)
        })
        .await
    }

    async fn find_setting(&self, key: &SettingKey) -> StoreResult<Option<SystemSetting>> {
        let key = key.as_str().to_owned();
        self.run_blocking(move |connection| {
            system_settings::table
                .filter(system_settings::key.eq(&key))
                .select(SettingRow::as_select())
                .first::<SettingRow>(connection)
                .optional()
                .map_err(StoreError::persistence)?
                .map(models::row_to_setting)
                .transpose()
        })
        .await
    }

    async fn list_settings(&self) -> StoreResult<Vec<SystemSetting>> {
        self.run_blocking(move |connection| {
            let rows = system_settings::table
                .order(system_settings::id.asc())
                .select(SettingRow::as_select())
                .load::<SettingRow>(connection)
                .map_err(StoreError::persistence)?;
            rows.into_iter().map(models::row_to_setting).collect()
        })
        .await
    }
}

#[async_trait]
impl ReportStore for PostgresDirectory {
    async fn create_report(
        &self,
        generated_by: UserId,
        report_type: String,
        file_path: String,
        now: DateTime<Utc>,
    ) -> StoreResult<Report> {
        self.run_blocking(move |connection| {
            if find_user_row(connection, generated_by)?.is_none() {
                return Err(StoreError::dangling("report", "user", generated_by.value()));
            }
            let inserted: ReportRow = diesel::insert_into(reports::table)
                .values((
                    reports::generated_by.eq(generated_by.value()),
                    reports::report_type.eq(&report_type),
                    reports::file_path.eq(&file_path),
                    reports::generated_at.eq(now),
                ))
                .get_result(connection)
                .map_err(StoreError::persistence)?;
            Ok(models::row_to_report(inserted))
        })
        .await
    }

    async fn list_reports(&self, generated_by: UserId) -> StoreResult<Vec<Report>> {
        self.run_blocking(move |connection| {
            let rows = reports::table
                .filter(reports::generated_by.eq(generated_by.value()))
                .order(reports::id.asc())
                .select(ReportRow::as_select())
                .load::<ReportRow>(connection)
                .map_err(StoreError::persistence)?;
            Ok(rows.into_iter().map(models::row_to_report).collect())
        })
        .await
    }
}

fn find_user_row(connection: &mut PgConnection, id: UserId) -> StoreResult<Option<UserRow>> {
    users::table
        .filter(users::id.eq(id.value()))
        .select(UserRow::as_select())
        .first::<UserRow>(connection)
        .optional()
        .map_err(StoreError::persistence)
}

fn find_role_row(connection: &mut PgConnection, id: RoleId) -> StoreResult<Option<RoleRow>> {
    roles::table
        .filter(roles::id.eq(id.value()))
        .select(RoleRow::as_select())
        .first::<RoleRow>(connection)
        .optional()
        .map_err(StoreError::persistence)
}

fn find_department_row(
    connection: &mut PgConnection,
    id: DepartmentId,
) -> StoreResult<Option<DepartmentRow>> {
    departments::table
        .filter(departments::id.eq(id.value()))
        .select(DepartmentRow::as_select())
        .first::<DepartmentRow>(connection)
        .optional()
        .map_err(StoreError::persistence)
}
