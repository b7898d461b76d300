//! Unit tests for the directory registry service.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for assertion clarity"
)]
#![expect(
    clippy::indexing_slicing,
    reason = "test code indexes after length assertions"
)]

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::rstest;

use crate::directory::adapters::memory::InMemoryDirectory;
use crate::directory::domain::{
    DepartmentId, DirectoryDomainError, Role, RoleId, User, UserId, VehicleStatus,
};
use crate::directory::ports::{OrgDirectory, UserDirectory};
use crate::directory::services::{DirectoryService, DirectoryServiceError, RegisterUserRequest};
use crate::store::StoreError;

type Service = DirectoryService<InMemoryDirectory, DefaultClock>;

struct Harness {
    directory: Arc<InMemoryDirectory>,
    service: Service,
}

fn harness() -> Harness {
    let directory = Arc::new(InMemoryDirectory::new());
    let service = Service::new(Arc::clone(&directory), Arc::new(DefaultClock));
    Harness { directory, service }
}

async fn seed_role(service: &Service, name: &str) -> Role {
    service
        .define_role(name, None)
        .await
        .expect("role defined")
}

async fn seed_user(service: &Service, username: &str, role_id: RoleId) -> User {
    service
        .register_user(RegisterUserRequest::new(username, "hash").with_role(role_id))
        .await
        .expect("user registered")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn registered_user_is_active_and_findable() {
    let h = harness();
    let role = seed_role(&h.service, "porter").await;

    let user = h
        .service
        .register_user(
            RegisterUserRequest::new("j.smith", "hash")
                .with_role(role.id)
                .with_email("j.smith@hospital.test")
                .with_phone("x4411"),
        )
        .await
        .expect("registered");

    assert!(user.is_active);
    assert_eq!(user.username.as_str(), "j.smith");
    assert_eq!(user.role_id, Some(role.id));
    assert_eq!(
        user.email.as_ref().map(|e| e.as_str()),
        Some("j.smith@hospital.test")
    );
    let found = h
        .service
        .find_user(user.id)
        .await
        .expect("lookup")
        .expect("present");
    assert_eq!(found, user);
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("two words")]
#[tokio::test(flavor = "multi_thread")]
async fn malformed_username_is_rejected(#[case] username: &str) {
    let h = harness();

    let err = h
        .service
        .register_user(RegisterUserRequest::new(username, "hash"))
        .await
        .expect_err("invalid username");

    assert!(matches!(
        err,
        DirectoryServiceError::Domain(DirectoryDomainError::InvalidUsername(_))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_username_is_a_conflict() {
    let h = harness();
    let role = seed_role(&h.service, "porter").await;
    seed_user(&h.service, "j.smith", role.id).await;

    let err = h
        .service
        .register_user(RegisterUserRequest::new("j.smith", "other-hash"))
        .await
        .expect_err("username taken");

    assert!(matches!(
        err,
        DirectoryServiceError::Repository(StoreError::Conflict {
            entity: "user",
            field: "username",
            ..
        })
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn registration_against_unknown_role_is_rejected() {
    let h = harness();

    let err = h
        .service
        .register_user(RegisterUserRequest::new("j.smith", "hash").with_role(RoleId::new(404)))
        .await
        .expect_err("role missing");

    assert!(matches!(
        err,
        DirectoryServiceError::Repository(StoreError::ReferentialIntegrity {
            entity: "user",
            reference: "role",
            id: 404
        })
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deactivated_user_is_excluded_from_active_listing() {
    let h = harness();
    let role = seed_role(&h.service, "porter").await;
    let keep = seed_user(&h.service, "keep", role.id).await;
    let drop_user = seed_user(&h.service, "drop", role.id).await;

    let deactivated = h
        .service
        .deactivate_user(drop_user.id)
        .await
        .expect("deactivated");
    assert!(!deactivated.is_active);

    let active = h
        .directory
        .list_active_users(role.id, None)
        .await
        .expect("listing");
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, keep.id);

    let err = h
        .service
        .deactivate_user(UserId::new(404))
        .await
        .expect_err("absent user");
    assert!(matches!(
        err,
        DirectoryServiceError::Repository(StoreError::NotFound {
            entity: "user",
            id: 404
        })
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_role_name_is_a_conflict() {
    let h = harness();
    seed_role(&h.service, "supervisor").await;

    let err = h
        .service
        .define_role("supervisor", None)
        .await
        .expect_err("name taken");

    assert!(matches!(
        err,
        DirectoryServiceError::Repository(StoreError::Conflict {
            entity: "role",
            field: "name",
            ..
        })
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn granted_permissions_are_listed_per_role() {
    let h = harness();
    let role = seed_role(&h.service, "supervisor").await;
    let assign = h
        .service
        .define_permission("task.assign", None)
        .await
        .expect("permission defined");
    let cancel = h
        .service
        .define_permission("task.cancel", None)
        .await
        .expect("permission defined");

    h.service
        .grant_permission(role.id, assign.id)
        .await
        .expect("granted");
    h.service
        .grant_permission(role.id, cancel.id)
        .await
        .expect("granted");

    let permissions = h
        .directory
        .list_permissions(role.id)
        .await
        .expect("listing");
    let names: Vec<&str> = permissions.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["task.assign", "task.cancel"]);

    let err = h
        .service
        .grant_permission(role.id, assign.id)
        .await
        .expect_err("pair already granted");
    assert!(matches!(
        err,
        DirectoryServiceError::Repository(StoreError::Conflict {
            entity: "role_permission",
            ..
        })
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn wards_require_an_existing_department() {
    let h = harness();
    let department = h
        .service
        .create_department("Radiology", Some("Block C".into()))
        .await
        .expect("department created");

    let ward = h
        .service
        .create_ward(department.id, "Ward 3")
        .await
        .expect("ward created");
    assert_eq!(ward.department_id, department.id);
    assert_eq!(ward.name, "Ward 3");

    let err = h
        .service
        .create_ward(DepartmentId::new(404), "Ward 9")
        .await
        .expect_err("department missing");
    assert!(matches!(
        err,
        DirectoryServiceError::Repository(StoreError::ReferentialIntegrity {
            entity: "ward",
            reference: "department",
            id: 404
        })
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn blank_department_name_is_rejected() {
    let h = harness();

    let err = h
        .service
        .create_department("   ", None)
        .await
        .expect_err("blank name");

    assert!(matches!(
        err,
        DirectoryServiceError::Domain(DirectoryDomainError::EmptyName("department"))
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn retired_job_type_stays_listed_but_inactive() {
    let h = harness();
    let job_type = h
        .service
        .create_job_type("Patient transfer", None)
        .await
        .expect("job type created");
    assert!(job_type.is_active);

    let retired = h
        .service
        .retire_job_type(job_type.id)
        .await
        .expect("retired");

    assert_eq!(retired.id, job_type.id);
    assert!(!retired.is_active);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn vehicle_status_and_assignment_round_trip() {
    let h = harness();
    let role = seed_role(&h.service, "porter").await;
    let porter = seed_user(&h.service, "p.jones", role.id).await;
    let vehicle = h
        .service
        .register_vehicle("WV-104", "van")
        .await
        .expect("registered");
    assert_eq!(vehicle.status, VehicleStatus::Available);
    assert_eq!(vehicle.assigned_to, None);

    let assigned = h
        .service
        .assign_vehicle(vehicle.id, Some(porter.id))
        .await
        .expect("assigned");
    assert_eq!(assigned.assigned_to, Some(porter.id));

    let maintained = h
        .service
        .set_vehicle_status(vehicle.id, VehicleStatus::UnderMaintenance)
        .await
        .expect("status set");
    assert_eq!(maintained.status, VehicleStatus::UnderMaintenance);

    let err = h
        .service
        .assign_vehicle(vehicle.id, Some(UserId::new(404)))
        .await
        .expect_err("user missing");
    assert!(matches!(
        err,
        DirectoryServiceError::Repository(StoreError::ReferentialIntegrity {
            entity: "vehicle",
            reference: "user",
            id: 404
        })
    ));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn public_link_resolves_until_deactivated() {
    let h = harness();
    let role = seed_role(&h.service, "station").await;
    let station = seed_user(&h.service, "ward-kiosk", role.id).await;

    let link = h
        .service
        .issue_public_link(station.id)
        .await
        .expect("issued");
    assert!(link.is_active);
    assert_eq!(link.station_id, station.id);

    let resolved = h
        .service
        .resolve_public_link(link.token)
        .await
        .expect("lookup")
        .expect("active link");
    assert_eq!(resolved.id, link.id);

    h.directory
        .deactivate_public_link(link.token)
        .await
        .expect("deactivated");
    assert!(h
        .service
        .resolve_public_link(link.token)
        .await
        .expect("lookup")
        .is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn report_references_require_their_generating_user() {
    let h = harness();
    let role = seed_role(&h.service, "admin").await;
    let admin = seed_user(&h.service, "a.admin", role.id).await;

    let report = h
        .service
        .record_report(admin.id, "shift_summary", "reports/2026-08-26.pdf")
        .await
        .expect("recorded");
    assert_eq!(report.generated_by, admin.id);
    assert_eq!(report.report_type, "shift_summary");

    let err = h
        .service
        .record_report(UserId::new(404), "shift_summary", "reports/x.pdf")
        .await
        .expect_err("user missing");
    assert!(matches!(
        err,
        DirectoryServiceError::Repository(StoreError::ReferentialIntegrity {
            entity: "report",
            reference: "user",
            id: 404
        })
    ));
}
