//! End-to-end lifecycle progression, revision loop, and notification
//! fanout.

use steward::channel::{domain::ChannelKind, ports::MessageRepository};
use steward::task::{
    domain::{
        AuditAction, DepartmentId, Priority, RevisionSeverity, RevisionType, TaskDraft, TaskPatch,
        TaskStatus, UserId,
    },
    services::RevisionRequest,
};

use super::helpers::World;

fn draft(title: &str, department_id: DepartmentId) -> TaskDraft {
    TaskDraft::new(title, "details", department_id, Priority::P2)
}

#[tokio::test(flavor = "multi_thread")]
async fn full_revision_loop_preserves_timestamp_causality() {
    let world = World::new();
    let requester = UserId::new();
    let task = world
        .lifecycle
        .create(draft("Banner artwork", DepartmentId::new()), requester)
        .await
        .expect("creation succeeds");

    let start = world
        .lifecycle
        .update(
            task.id(),
            &TaskPatch::new().with_status(TaskStatus::InProgress),
            Some(requester),
            None,
        )
        .await
        .expect("start succeeds");
    let started_at = start.task.started_at().expect("started_at set");

    let done = world
        .lifecycle
        .update(
            task.id(),
            &TaskPatch::new().with_status(TaskStatus::Done),
            Some(requester),
            None,
        )
        .await
        .expect("completion succeeds");
    let first_completion = done.task.completed_at().expect("completed_at set");
    assert!(first_completion >= started_at);

    // Requesting a revision leaves done; completed_at must clear.
    let revision = world
        .tracker
        .request_revision(
            task.id(),
            RevisionRequest::new(RevisionType::Visual, RevisionSeverity::High, "Logo drifted"),
            requester,
        )
        .await
        .expect("revision request succeeds");
    assert_eq!(revision.task.status(), TaskStatus::RevisionPending);
    assert_eq!(revision.task.completed_at(), None);
    assert_eq!(revision.task.started_at(), Some(started_at));

    for status in [TaskStatus::RevisionInProgress, TaskStatus::RevisionDone] {
        world
            .lifecycle
            .update(
                task.id(),
                &TaskPatch::new().with_status(status),
                Some(requester),
                None,
            )
            .await
            .expect("revision progression succeeds");
    }

    let redone = world
        .lifecycle
        .update(
            task.id(),
            &TaskPatch::new().with_status(TaskStatus::Done),
            Some(requester),
            None,
        )
        .await
        .expect("second completion succeeds");
    let second_completion = redone.task.completed_at().expect("completed_at set again");
    assert!(second_completion >= first_completion);
    // started_at never moves across the whole loop.
    assert_eq!(redone.task.started_at(), Some(started_at));
}

#[tokio::test(flavor = "multi_thread")]
async fn audit_trail_grows_with_every_mutation() -> eyre::Result<()> {
    let world = World::new();
    let requester = UserId::new();
    let task = world
        .lifecycle
        .create(draft("Copy deck", DepartmentId::new()), requester)
        .await?;

    world
        .lifecycle
        .update(
            task.id(),
            &TaskPatch::new().with_status(TaskStatus::InProgress),
            Some(requester),
            None,
        )
        .await?;
    world
        .lifecycle
        .add_comment(task.id(), "looks good so far", Some(requester))
        .await?;

    let trail = world.lifecycle.audit_trail(task.id()).await?;
    let actions: Vec<AuditAction> = trail.iter().map(steward::task::domain::AuditEntry::action).collect();
    assert_eq!(
        actions,
        vec![
            AuditAction::Created,
            AuditAction::Updated,
            AuditAction::Commented
        ]
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn update_outcome_feeds_the_notification_fanout() {
    let world = World::new();
    let requester = UserId::new();

    // Department and same-named channel, seeded the way the resolver
    // would create them.
    let channel = world.seed_channel("design", ChannelKind::Department).await;
    let resolver = steward::channel::services::DepartmentResolver::new(
        std::sync::Arc::clone(&world.departments),
        std::sync::Arc::clone(&world.clock),
    );
    let department = resolver
        .find_or_create_by_name("design")
        .await
        .expect("resolution succeeds");

    let task = world
        .lifecycle
        .create(draft("Banner artwork", department.id()), requester)
        .await
        .expect("creation succeeds");

    let outcome = world
        .lifecycle
        .update(
            task.id(),
            &TaskPatch::new().with_status(TaskStatus::Done),
            Some(requester),
            None,
        )
        .await
        .expect("update succeeds");

    let fanout = world.fanout();
    let posted = fanout
        .notify_task_change(&outcome.task, &outcome.changes)
        .await
        .expect("notify succeeds")
        .expect("message posted");

    assert_eq!(posted.channel_id(), channel.id());
    assert!(posted.content().starts_with("✅"));
    assert!(posted.content().contains("Banner artwork"));

    let stored = world
        .messages
        .list_by_channel(channel.id())
        .await
        .expect("listing succeeds");
    assert_eq!(stored.len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn revisions_for_independent_tasks_number_independently() -> eyre::Result<()> {
    let world = World::new();
    let requester = UserId::new();
    let first = world
        .lifecycle
        .create(draft("First", DepartmentId::new()), requester)
        .await?;
    let second = world
        .lifecycle
        .create(draft("Second", DepartmentId::new()), requester)
        .await?;

    let request =
        |text: &str| RevisionRequest::new(RevisionType::Content, RevisionSeverity::Low, text);

    let first_rev = world
        .tracker
        .request_revision(first.id(), request("tweak intro"), requester)
        .await?;
    let second_rev = world
        .tracker
        .request_revision(second.id(), request("tweak outro"), requester)
        .await?;

    assert_eq!(first_rev.revision.number().value(), 1);
    assert_eq!(second_rev.revision.number().value(), 1);
    Ok(())
}
