//! Diesel row models for directory persistence.

use super::schema::{
    break_types, departments, job_types, permissions, public_links, reports, roles,
    system_settings, user_profiles, users, vehicles, wards,
};
use crate::directory::domain::{
    BreakType, BreakTypeId, CapabilityName, Department, DepartmentId, EmailAddress, JobType,
    JobTypeId, LinkToken, Permission, PermissionId, ProfileId, PublicLink, PublicLinkId, Report,
    ReportId, Role, RoleId, SettingId, SettingKey, SettingType, SystemSetting, User, UserId,
    UserProfile, Username, Vehicle, VehicleId, VehicleStatus, Ward, WardId,
};
use crate::store::{StoreError, StoreResult};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

/// Query result row for users.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub credential_hash: String,
    pub role_id: Option<i64>,
    pub department_id: Option<i64>,
    pub is_active: bool,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Query result row for user profiles.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProfileRow {
    pub id: i64,
    pub user_id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Query result row for roles.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = roles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RoleRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Query result row for permissions.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = permissions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PermissionRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Query result row for departments.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = departments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DepartmentRow {
    pub id: i64,
    pub name: String,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Query result row for wards.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = wards)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct WardRow {
    pub id: i64,
    pub department_id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Query result row for job types.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = job_types)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct JobTypeRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Query result row for break types.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = break_types)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct BreakTypeRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Query result row for vehicles.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = vehicles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct VehicleRow {
    pub id: i64,
    pub registration: String,
    pub kind: String,
    pub status: String,
    pub assigned_to: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Query result row for public links.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = public_links)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PublicLinkRow {
    pub id: i64,
    pub token: Uuid,
    pub station_id: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Query result row for reports.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = reports)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ReportRow {
    pub id: i64,
    pub generated_by: i64,
    pub report_type: String,
    pub file_path: String,
    pub generated_at: DateTime<Utc>,
}

/// Query result row for settings.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = system_settings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SettingRow {
    pub id: i64,
    pub key: String,
    pub value: String,
    pub data_type: Option<String>,
    pub updated_at: DateTime<Utc>,
}

pub fn row_to_user(row: UserRow) -> StoreResult<User> {
    Ok(User {
        id: UserId::new(row.id),
        username: Username::new(row.username).map_err(StoreError::persistence)?,
        credential_hash: row.credential_hash,
        role_id: row.role_id.map(RoleId::new),
        department_id: row.department_id.map(DepartmentId::new),
        is_active: row.is_active,
        email: row
            .email
            .map(EmailAddress::new)
            .transpose()
            .map_err(StoreError::persistence)?,
        phone: row.phone,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

pub fn row_to_profile(row: ProfileRow) -> StoreResult<UserProfile> {
    Ok(UserProfile {
        id: ProfileId::new(row.id),
        user_id: UserId::new(row.user_id),
        first_name: row.first_name,
        last_name: row.last_name,
        address: row.address,
        phone: row.phone,
        email: row
            .email
            .map(EmailAddress::new)
            .transpose()
            .map_err(StoreError::persistence)?,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

pub fn row_to_role(row: RoleRow) -> StoreResult<Role> {
    Ok(Role {
        id: RoleId::new(row.id),
        name: CapabilityName::new(row.name).map_err(StoreError::persistence)?,
        description: row.description,
        created_at: row.created_at,
    })
}

pub fn row_to_permission(row: PermissionRow) -> StoreResult<Permission> {
    Ok(Permission {
        id: PermissionId::new(row.id),
        name: CapabilityName::new(row.name).map_err(StoreError::persistence)?,
        description: row.description,
        created_at: row.created_at,
    })
}

pub fn row_to_department(row: DepartmentRow) -> Department {
    Department {
        id: DepartmentId::new(row.id),
        name: row.name,
        location: row.location,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

pub fn row_to_ward(row: WardRow) -> Ward {
    Ward {
        id: WardId::new(row.id),
        department_id: DepartmentId::new(row.department_id),
        name: row.name,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

pub fn row_to_job_type(row: JobTypeRow) -> JobType {
    JobType {
        id: JobTypeId::new(row.id),
        name: row.name,
        description: row.description,
        is_active: row.is_active,
        created_at: row.created_at,
    }
}

pub fn row_to_break_type(row: BreakTypeRow) -> BreakType {
    BreakType {
        id: BreakTypeId::new(row.id),
        name: row.name,
        description: row.description,
        created_at: row.created_at,
    }
}

pub fn row_to_vehicle(row: VehicleRow) -> StoreResult<Vehicle> {
    Ok(Vehicle {
        id: VehicleId::new(row.id),
        registration: row.registration,
        kind: row.kind,
        status: VehicleStatus::try_from(row.status.as_str()).map_err(StoreError::persistence)?,
        assigned_to: row.assigned_to.map(UserId::new),
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

pub fn row_to_public_link(row: PublicLinkRow) -> PublicLink {
    PublicLink {
        id: PublicLinkId::new(row.id),
        token: LinkToken::from_uuid(row.token),
        station_id: UserId::new(row.station_id),
        is_active: row.is_active,
        created_at: row.created_at,
    }
}

pub fn row_to_report(row: ReportRow) -> Report {
    Report {
        id: ReportId::new(row.id),
        generated_by: UserId::new(row.generated_by),
        report_type: row.report_type,
        file_path: row.file_path,
        generated_at: row.generated_at,
    }
}

pub fn row_to_setting(row: SettingRow) -> StoreResult<SystemSetting> {
    let data_type = match row.data_type.as_deref() {
        None => None,
        Some("text") => Some(SettingType::Text),
        Some("integer") => Some(SettingType::Integer),
        Some("boolean") => Some(SettingType::Boolean),
        Some(other) => {
            return Err(StoreError::persistence(std::io::Error::other(format!(
                "unrecognized setting type: {other}"
            ))));
        }
    };
    Ok(SystemSetting {
        id: SettingId::new(row.id),
        key: SettingKey::new(row.key).map_err(StoreError::persistence)?,
        value: row.value,
        data_type,
        updated_at: row.updated_at,
    })
}
