//! Diesel schema for staffing persistence.

diesel::table! {
    /// Shift records; at most one active row per user.
    shifts (id) {
        /// Shift key.
        id -> BigInt,
        /// Staffed user.
        user_id -> BigInt,
        /// Opening time.
        shift_start -> Timestamptz,
        /// Closing time, while open `NULL`.
        shift_end -> Nullable<Timestamptz>,
        /// Active flag, cleared on clock-out.
        is_active -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Availability records; one current row per porter, history retained.
    staff_availability (id) {
        /// Row key.
        id -> BigInt,
        /// Described porter.
        porter_id -> BigInt,
        /// Duty status.
        #[max_length = 20]
        status -> Varchar,
        /// Whether a break request is attached.
        break_requested -> Bool,
        /// Approval state of the attached request.
        #[max_length = 20]
        break_approval -> Nullable<Varchar>,
        /// Requested break category.
        break_type_id -> Nullable<BigInt>,
        /// Whether this is the porter's current row.
        is_current -> Bool,
        /// Last mutation timestamp.
        updated_at -> Timestamptz,
    }
}
