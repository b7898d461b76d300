//! Settings-driven dispatch policy behaviour.

use std::sync::Arc;

use mockable::DefaultClock;
use porterflow::directory::adapters::memory::InMemoryDirectory;
use porterflow::directory::domain::SettingType;
use porterflow::task::domain::TaskStatus;
use porterflow::task::services::DispatchPolicy;
use rstest::rstest;

use super::helpers::{Settings, world, world_with_policy};

/// Derives a dispatch policy through the settings write-through path.
async fn policy_from(settings: &[(&str, &str, Option<SettingType>)]) -> DispatchPolicy {
    let store = Arc::new(InMemoryDirectory::new());
    let service = Settings::new(Arc::clone(&store), Arc::new(DefaultClock));
    for (key, value, data_type) in settings {
        service
            .put(key, *value, *data_type)
            .await
            .expect("put setting");
    }
    let snapshot = service.current().expect("snapshot");
    DispatchPolicy::from_settings(&snapshot).expect("valid policy")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn default_policy_caps_a_porter_at_one_active_task() {
    let w = world().await;
    let porter = w.staffed_porter("p.jones").await;
    let first = w.submit_task().await;
    let second = w.submit_task().await;

    let chosen = w
        .dispatch
        .dispatch(first.id)
        .await
        .expect("dispatch")
        .expect("candidate found");
    assert_eq!(chosen.id, porter.id);

    // The porter is saturated, so the second task stays Pending.
    assert_eq!(w.dispatch.dispatch(second.id).await.expect("dispatch"), None);
    let stored = w.lifecycle.task(second.id).await.expect("reload");
    assert_eq!(stored.status, TaskStatus::Pending);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn raised_limit_allows_concurrent_assignments() {
    let policy = policy_from(&[(
        "dispatch.max_active_tasks",
        "2",
        Some(SettingType::Integer),
    )])
    .await;

    let w = world_with_policy(policy).await;
    let porter = w.staffed_porter("p.jones").await;
    let first = w.submit_task().await;
    let second = w.submit_task().await;

    w.dispatch.dispatch(first.id).await.expect("dispatch");
    let chosen = w
        .dispatch
        .dispatch(second.id)
        .await
        .expect("dispatch")
        .expect("candidate found");
    assert_eq!(chosen.id, porter.id);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn renamed_eligible_role_redirects_dispatch() {
    let policy = policy_from(&[("dispatch.eligible_role", "orderly", None)]).await;

    let w = world_with_policy(policy).await;
    // Porters hold the seeded "porter" role, not the configured one.
    w.staffed_porter("p.jones").await;
    let task = w.submit_task().await;

    assert_eq!(w.dispatch.dispatch(task.id).await.expect("dispatch"), None);
}
