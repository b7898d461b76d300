//! Identifier newtypes for the directory domain.

use crate::ids::entity_id;

entity_id! {
    /// Unique identifier for a user record.
    UserId
}

entity_id! {
    /// Unique identifier for a user profile record.
    ProfileId
}

entity_id! {
    /// Unique identifier for a role.
    RoleId
}

entity_id! {
    /// Unique identifier for a permission.
    PermissionId
}

entity_id! {
    /// Unique identifier for a department.
    DepartmentId
}

entity_id! {
    /// Unique identifier for a ward.
    WardId
}

entity_id! {
    /// Unique identifier for a job type.
    JobTypeId
}

entity_id! {
    /// Unique identifier for a break type.
    BreakTypeId
}

entity_id! {
    /// Unique identifier for a vehicle.
    VehicleId
}

entity_id! {
    /// Unique identifier for a public submission link.
    PublicLinkId
}

entity_id! {
    /// Unique identifier for a generated report record.
    ReportId
}

entity_id! {
    /// Unique identifier for a system setting.
    SettingId
}
