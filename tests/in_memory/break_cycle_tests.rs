//! Break arbitration and its effect on dispatch eligibility.

use porterflow::task::domain::TaskStatus;
use rstest::rstest;

use super::helpers::world;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn porter_on_break_is_skipped_until_the_break_ends() {
    let w = world().await;
    let porter = w.staffed_porter("p.jones").await;

    w.availability
        .request_break(porter.id, None)
        .await
        .expect("request break");
    w.availability
        .resolve_break(w.supervisor.id, porter.id, true)
        .await
        .expect("approve break");

    let task = w.submit_task().await;
    let skipped = w.dispatch.dispatch(task.id).await.expect("dispatch");
    assert_eq!(skipped, None);

    w.availability
        .end_break(porter.id)
        .await
        .expect("end break");

    let chosen = w
        .dispatch
        .dispatch(task.id)
        .await
        .expect("dispatch")
        .expect("candidate found");
    assert_eq!(chosen.id, porter.id);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_break_leaves_the_porter_dispatchable() {
    let w = world().await;
    let porter = w.staffed_porter("p.jones").await;

    w.availability
        .request_break(porter.id, None)
        .await
        .expect("request break");
    w.availability
        .resolve_break(w.supervisor.id, porter.id, false)
        .await
        .expect("reject break");

    let task = w.submit_task().await;
    let chosen = w
        .dispatch
        .dispatch(task.id)
        .await
        .expect("dispatch")
        .expect("candidate found");
    assert_eq!(chosen.id, porter.id);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn clocked_out_porter_leaves_their_open_task_flagged() {
    let w = world().await;
    let porter = w.staffed_porter("p.jones").await;
    let task = w.submit_task().await;
    w.dispatch.dispatch(task.id).await.expect("dispatch");

    let summary = w
        .availability
        .clock_out(porter.id)
        .await
        .expect("clock out");

    assert_eq!(summary.advisories.len(), 1);
    assert_eq!(summary.advisories[0].task_id, task.id);
    assert_eq!(summary.advisories[0].status, TaskStatus::InProgress);

    // An off-duty porter receives no further work.
    let second = w.submit_task().await;
    assert_eq!(w.dispatch.dispatch(second.id).await.expect("dispatch"), None);
}
