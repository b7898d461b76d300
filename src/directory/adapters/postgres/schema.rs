//! Diesel schema for directory persistence.

diesel::table! {
    /// User accounts.
    users (id) {
        /// User key.
        id -> BigInt,
        /// Unique login name.
        #[max_length = 150]
        username -> Varchar,
        /// Opaque credential hash, managed elsewhere.
        #[max_length = 255]
        credential_hash -> Varchar,
        /// Held role.
        role_id -> Nullable<BigInt>,
        /// Home department.
        department_id -> Nullable<BigInt>,
        /// Soft-delete flag.
        is_active -> Bool,
        /// Unique contact email.
        #[max_length = 254]
        email -> Nullable<Varchar>,
        /// Contact phone.
        #[max_length = 50]
        phone -> Nullable<Varchar>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last mutation timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Zero-or-one profile per user.
    user_profiles (id) {
        /// Profile key.
        id -> BigInt,
        /// Owning user.
        user_id -> BigInt,
        /// First name.
        #[max_length = 150]
        first_name -> Nullable<Varchar>,
        /// Last name.
        #[max_length = 150]
        last_name -> Nullable<Varchar>,
        /// Postal address.
        address -> Nullable<Text>,
        /// Contact phone.
        #[max_length = 50]
        phone -> Nullable<Varchar>,
        /// Unique contact email.
        #[max_length = 254]
        email -> Nullable<Varchar>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last mutation timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Named roles.
    roles (id) {
        /// Role key.
        id -> BigInt,
        /// Unique role name.
        #[max_length = 150]
        name -> Varchar,
        /// Description.
        description -> Nullable<Text>,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Named permissions.
    permissions (id) {
        /// Permission key.
        id -> BigInt,
        /// Unique permission name.
        #[max_length = 150]
        name -> Varchar,
        /// Description.
        description -> Nullable<Text>,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Role-permission grants; pairs are unique.
    role_permissions (role_id, permission_id) {
        /// Granted role.
        role_id -> BigInt,
        /// Granted permission.
        permission_id -> BigInt,
    }
}

diesel::table! {
    /// Departments.
    departments (id) {
        /// Department key.
        id -> BigInt,
        /// Department name.
        #[max_length = 200]
        name -> Varchar,
        /// Physical location.
        #[max_length = 200]
        location -> Nullable<Varchar>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last mutation timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Wards, each owned by one department.
    wards (id) {
        /// Ward key.
        id -> BigInt,
        /// Owning department.
        department_id -> BigInt,
        /// Ward name.
        #[max_length = 200]
        name -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last mutation timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Task categories.
    job_types (id) {
        /// Job type key.
        id -> BigInt,
        /// Category name.
        #[max_length = 200]
        name -> Varchar,
        /// Description.
        description -> Nullable<Text>,
        /// Soft-delete flag.
        is_active -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Break categories.
    break_types (id) {
        /// Break type key.
        id -> BigInt,
        /// Category name.
        #[max_length = 200]
        name -> Varchar,
        /// Description.
        description -> Nullable<Text>,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Transport vehicles.
    vehicles (id) {
        /// Vehicle key.
        id -> BigInt,
        /// Registration plate.
        #[max_length = 50]
        registration -> Varchar,
        /// Vehicle kind.
        #[max_length = 50]
        kind -> Varchar,
        /// Operational status.
        #[max_length = 30]
        status -> Varchar,
        /// Assigned user.
        assigned_to -> Nullable<BigInt>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last mutation timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Anonymous submission links.
    public_links (id) {
        /// Link key.
        id -> BigInt,
        /// Unique link token.
        token -> Uuid,
        /// Station user.
        station_id -> BigInt,
        /// Soft-delete flag.
        is_active -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Generated report references.
    reports (id) {
        /// Report key.
        id -> BigInt,
        /// Generating user.
        generated_by -> BigInt,
        /// Report category.
        #[max_length = 100]
        report_type -> Varchar,
        /// Opaque storage path.
        file_path -> Text,
        /// Generation timestamp.
        generated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Key-value configuration.
    system_settings (id) {
        /// Setting key (surrogate).
        id -> BigInt,
        /// Unique setting key.
        #[max_length = 200]
        key -> Varchar,
        /// Raw value.
        value -> Text,
        /// Declared data type.
        #[max_length = 20]
        data_type -> Nullable<Varchar>,
        /// Last mutation timestamp.
        updated_at -> Timestamptz,
    }
}
