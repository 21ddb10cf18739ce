//! Domain-focused tests for task invariants and value types.

use crate::task::domain::{
    ChangeIcon, ChangedField, DepartmentId, FieldChange, Priority, RevisionFields, RevisionNumber,
    Revision, RevisionSeverity, RevisionType, Task, TaskDomainError, TaskDraft, TaskId, TaskPatch,
    TaskStatus, UserId,
};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

#[fixture]
fn clock() -> DefaultClock {
    DefaultClock
}

fn draft() -> TaskDraft {
    TaskDraft::new(
        "Refresh landing page",
        "Swap hero imagery and update copy",
        DepartmentId::new(),
        Priority::P2,
    )
}

#[rstest]
fn task_new_starts_in_todo_with_no_work_timestamps(clock: DefaultClock) {
    let task = Task::new(draft(), UserId::new(), &clock).expect("valid draft");

    assert_eq!(task.status(), TaskStatus::Todo);
    assert_eq!(task.started_at(), None);
    assert_eq!(task.completed_at(), None);
    assert_eq!(task.created_at(), task.updated_at());
}

#[rstest]
fn task_new_rejects_whitespace_title(clock: DefaultClock) {
    let blank = TaskDraft::new("   ", "body", DepartmentId::new(), Priority::P1);
    let result = Task::new(blank, UserId::new(), &clock);
    assert!(matches!(result, Err(TaskDomainError::EmptyTitle)));
}

#[rstest]
fn started_at_is_written_once_and_never_moves(clock: DefaultClock) {
    let mut task = Task::new(draft(), UserId::new(), &clock).expect("valid draft");

    task.apply(&TaskPatch::new().with_status(TaskStatus::InProgress), &clock)
        .expect("move to in_progress");
    let first_start = task.started_at().expect("started_at set on first entry");

    task.apply(&TaskPatch::new().with_status(TaskStatus::Blocked), &clock)
        .expect("move to blocked");
    task.apply(&TaskPatch::new().with_status(TaskStatus::InProgress), &clock)
        .expect("re-enter in_progress");

    assert_eq!(task.started_at(), Some(first_start));
}

#[rstest]
fn completed_at_is_cleared_on_leaving_done_and_reset_on_return(clock: DefaultClock) {
    let mut task = Task::new(draft(), UserId::new(), &clock).expect("valid draft");

    task.apply(&TaskPatch::new().with_status(TaskStatus::Done), &clock)
        .expect("move to done");
    let first_completion = task.completed_at().expect("completed_at set on done");

    task.apply(
        &TaskPatch::new().with_status(TaskStatus::RevisionPending),
        &clock,
    )
    .expect("leave done");
    assert_eq!(task.completed_at(), None);

    task.apply(&TaskPatch::new().with_status(TaskStatus::Done), &clock)
        .expect("return to done");
    let second_completion = task.completed_at().expect("completed_at set again");
    assert!(second_completion >= first_completion);
}

#[rstest]
fn apply_reports_status_title_and_description_changes(clock: DefaultClock) {
    let mut task = Task::new(draft(), UserId::new(), &clock).expect("valid draft");

    let patch = TaskPatch::new()
        .with_status(TaskStatus::InProgress)
        .with_title("Refresh landing page v2")
        .with_description("New scope");
    let changes = task.apply(&patch, &clock).expect("patch applies");

    let fields: Vec<ChangedField> = changes.iter().map(|change| change.field).collect();
    assert_eq!(
        fields,
        vec![
            ChangedField::Status,
            ChangedField::Title,
            ChangedField::Description
        ]
    );
}

#[rstest]
fn apply_is_a_noop_for_identical_values(clock: DefaultClock) {
    let mut task = Task::new(draft(), UserId::new(), &clock).expect("valid draft");
    let before_update = task.updated_at();

    let patch = TaskPatch::new()
        .with_status(TaskStatus::Todo)
        .with_title("Refresh landing page")
        .with_priority(Priority::P2);
    let changes = task.apply(&patch, &clock).expect("no-op patch applies");

    assert!(changes.is_empty());
    assert_eq!(task.updated_at(), before_update);
}

#[rstest]
fn apply_rejects_empty_title_without_mutating(clock: DefaultClock) {
    let mut task = Task::new(draft(), UserId::new(), &clock).expect("valid draft");
    let snapshot = task.clone();

    let patch = TaskPatch::new()
        .with_status(TaskStatus::Done)
        .with_title("   ");
    let result = task.apply(&patch, &clock);

    assert!(matches!(result, Err(TaskDomainError::EmptyTitle)));
    assert_eq!(task, snapshot);
}

#[rstest]
#[case(TaskStatus::Done, ChangeIcon::Success)]
#[case(TaskStatus::InProgress, ChangeIcon::Start)]
#[case(TaskStatus::Blocked, ChangeIcon::Edit)]
#[case(TaskStatus::RevisionPending, ChangeIcon::Edit)]
fn status_change_icon_is_keyed_by_target(#[case] target: TaskStatus, #[case] icon: ChangeIcon) {
    let change = FieldChange::status(TaskStatus::Todo, target);
    assert_eq!(change.icon, icon);
}

#[rstest]
fn every_status_round_trips_through_its_canonical_string() {
    let statuses = [
        TaskStatus::Todo,
        TaskStatus::InProgress,
        TaskStatus::Blocked,
        TaskStatus::Done,
        TaskStatus::RevisionPending,
        TaskStatus::RevisionInProgress,
        TaskStatus::RevisionDone,
        TaskStatus::Rejected,
    ];
    for status in statuses {
        assert_eq!(TaskStatus::try_from(status.as_str()), Ok(status));
    }
}

#[rstest]
fn status_parsing_rejects_unknown_values() {
    assert!(TaskStatus::try_from("paused").is_err());
    assert!(Priority::try_from("P4").is_err());
}

#[rstest]
fn conventional_moves_follow_the_documented_progression() {
    assert!(TaskStatus::Todo.is_conventional_move(TaskStatus::InProgress));
    assert!(TaskStatus::Done.is_conventional_move(TaskStatus::RevisionPending));
    assert!(TaskStatus::RevisionDone.is_conventional_move(TaskStatus::Done));
    assert!(!TaskStatus::RevisionDone.is_conventional_move(TaskStatus::Blocked));
    assert!(!TaskStatus::Rejected.is_conventional_move(TaskStatus::Done));
}

#[rstest]
fn revision_number_rejects_zero() {
    assert!(matches!(
        RevisionNumber::new(0),
        Err(TaskDomainError::InvalidRevisionNumber)
    ));
    assert_eq!(RevisionNumber::new(1).expect("valid number").value(), 1);
}

#[rstest]
fn revision_new_rejects_empty_description(clock: DefaultClock) {
    let fields = RevisionFields {
        task_id: TaskId::new(),
        number: RevisionNumber::new(1).expect("valid number"),
        kind: RevisionType::Visual,
        severity: RevisionSeverity::Low,
        description: "  \t ".to_owned(),
        attachment_url: None,
        requester_id: UserId::new(),
    };
    let result = Revision::new(fields, &clock);
    assert!(matches!(
        result,
        Err(TaskDomainError::EmptyRevisionDescription)
    ));
}
