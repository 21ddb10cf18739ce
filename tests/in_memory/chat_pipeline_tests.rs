//! End-to-end chat ingestion: message posting, worker pool, task
//! creation, and error reporting.

use std::sync::Arc;
use std::time::Duration;

use steward::channel::{
    domain::{ChannelKind, MediaAttachment},
    ports::{DepartmentRepository, MessageRepository, UsageLedger},
    services::IngestionConfig,
};
use steward::task::{
    domain::{Priority, TaskStatus, UserId},
    ports::TaskFilter,
};
use steward::worker::IngestionWorkerPool;
use tokio::sync::mpsc;

use super::helpers::{ScriptedParser, StalledParser, World};

#[tokio::test(flavor = "multi_thread")]
async fn chat_command_becomes_a_linked_task_with_confirmation() {
    let world = World::new();
    let design = world.seed_channel("design", ChannelKind::Department).await;
    world.seed_channel("general", ChannelKind::General).await;

    let (sender, receiver) = mpsc::channel(16);
    let service = world.ingestion(IngestionConfig::default(), sender);
    let parser = Arc::new(ScriptedParser::new("Refresh landing page", Priority::P2));
    let processor = Arc::new(world.processor(parser, IngestionConfig::default()));
    let pool = IngestionWorkerPool::spawn(2, receiver, processor);

    let requester = UserId::new();
    let posted = service
        .post_message(
            design.id(),
            "!task [P1] refresh the landing page with the new hero",
            requester,
            Some(MediaAttachment::image("https://files.example/hero.png")),
        )
        .await
        .expect("posting succeeds");

    // Closing the queue lets the workers drain and exit.
    drop(service);
    pool.shutdown().await;

    let tasks = world
        .lifecycle
        .list(&TaskFilter::new())
        .await
        .expect("listing succeeds");
    assert_eq!(tasks.len(), 1);
    let task = tasks.first().expect("one task");
    assert_eq!(task.title(), "Refresh landing page");
    assert_eq!(task.status(), TaskStatus::Todo);
    // The manual bracket tag beats the parser's priority.
    assert_eq!(task.priority(), Priority::P1);
    assert_eq!(task.requester_id(), requester);
    assert_eq!(task.image_url(), Some("https://files.example/hero.png"));

    let linked = world
        .messages
        .find_by_id(posted.id())
        .await
        .expect("lookup succeeds")
        .expect("message present");
    assert_eq!(linked.linked_task_id(), Some(task.id()));

    let messages = world
        .messages
        .list_by_channel(design.id())
        .await
        .expect("listing succeeds");
    assert_eq!(messages.len(), 2);
    let confirmation = messages.last().expect("confirmation posted");
    assert!(confirmation.is_system());
    assert!(confirmation.content().contains("Refresh landing page"));
    assert!(confirmation.content().contains("design"));

    let tokens = world
        .usage
        .total_for(requester)
        .await
        .expect("usage readable");
    assert_eq!(tokens, 120);
}

#[tokio::test(flavor = "multi_thread")]
async fn department_is_created_lazily_from_the_channel_name() {
    let world = World::new();
    let video = world.seed_channel("video", ChannelKind::Department).await;

    let (sender, receiver) = mpsc::channel(16);
    let service = world.ingestion(IngestionConfig::default(), sender);
    let parser = Arc::new(ScriptedParser::new("Cut a teaser", Priority::P2));
    let processor = Arc::new(world.processor(parser, IngestionConfig::default()));
    let pool = IngestionWorkerPool::spawn(1, receiver, processor);

    service
        .post_message(video.id(), "!task cut a teaser from the keynote", UserId::new(), None)
        .await
        .expect("posting succeeds");
    drop(service);
    pool.shutdown().await;

    let tasks = world
        .lifecycle
        .list(&TaskFilter::new())
        .await
        .expect("listing succeeds");
    let task = tasks.first().expect("one task");
    let stored = world
        .departments
        .find_by_id(task.department_id())
        .await
        .expect("lookup succeeds")
        .expect("department exists");
    assert_eq!(stored.name(), "video");
}

#[tokio::test(flavor = "multi_thread")]
async fn parser_timeout_produces_an_error_notice_and_no_task() {
    let world = World::new();
    let design = world.seed_channel("design", ChannelKind::Department).await;

    let config = IngestionConfig {
        parser_timeout: Duration::from_millis(20),
        ..IngestionConfig::default()
    };
    let (sender, receiver) = mpsc::channel(16);
    let service = world.ingestion(config.clone(), sender);
    let processor = Arc::new(world.processor(Arc::new(StalledParser), config));
    let pool = IngestionWorkerPool::spawn(1, receiver, processor);

    let posted = service
        .post_message(design.id(), "!task refresh the landing page", UserId::new(), None)
        .await
        .expect("posting succeeds");
    drop(service);
    pool.shutdown().await;

    let tasks = world
        .lifecycle
        .list(&TaskFilter::new())
        .await
        .expect("listing succeeds");
    assert!(tasks.is_empty());

    // The original message survives unlinked next to the error notice.
    let messages = world
        .messages
        .list_by_channel(design.id())
        .await
        .expect("listing succeeds");
    assert_eq!(messages.len(), 2);
    let original = messages.first().expect("original message");
    assert_eq!(original.id(), posted.id());
    assert_eq!(original.linked_task_id(), None);
    let notice = messages.last().expect("error notice");
    assert!(notice.is_system());
    assert!(notice.content().contains("Could not create a task"));
    assert!(notice.content().contains("timed out"));
}

#[tokio::test(flavor = "multi_thread")]
async fn help_request_is_answered_without_touching_the_pool() {
    let world = World::new();
    let design = world.seed_channel("design", ChannelKind::Department).await;

    let (sender, mut receiver) = mpsc::channel(16);
    let service = world.ingestion(IngestionConfig::default(), sender);

    service
        .post_message(design.id(), "!help", UserId::new(), None)
        .await
        .expect("posting succeeds");

    assert!(receiver.try_recv().is_err());
    let messages = world
        .messages
        .list_by_channel(design.id())
        .await
        .expect("listing succeeds");
    assert_eq!(messages.len(), 2);
    assert!(messages.last().expect("help reply").is_system());
}

#[tokio::test(flavor = "multi_thread")]
async fn every_queued_job_is_processed_exactly_once() {
    let world = World::new();
    let design = world.seed_channel("design", ChannelKind::Department).await;

    let (sender, receiver) = mpsc::channel(64);
    let service = world.ingestion(IngestionConfig::default(), sender);
    let parser = Arc::new(ScriptedParser::new("Queued job", Priority::P3));
    let processor = Arc::new(world.processor(parser, IngestionConfig::default()));
    let pool = IngestionWorkerPool::spawn(4, receiver, processor);
    assert_eq!(pool.worker_count(), 4);

    for index in 0..10 {
        service
            .post_message(
                design.id(),
                &format!("!task queued job number {index}"),
                UserId::new(),
                None,
            )
            .await
            .expect("posting succeeds");
    }
    drop(service);
    pool.shutdown().await;

    let tasks = world
        .lifecycle
        .list(&TaskFilter::new())
        .await
        .expect("listing succeeds");
    assert_eq!(tasks.len(), 10);
}
