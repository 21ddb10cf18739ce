//! Domain-focused tests for channel entities.

use crate::channel::domain::{
    Channel, ChannelDomainError, ChannelId, ChannelKind, ChannelMessage, MediaAttachment,
};
use crate::task::domain::{TaskId, UserId};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

#[fixture]
fn clock() -> DefaultClock {
    DefaultClock
}

#[rstest]
fn channel_new_trims_and_rejects_empty_names() {
    let channel = Channel::new("  design  ", ChannelKind::Department).expect("valid name");
    assert_eq!(channel.name(), "design");
    assert_eq!(format!("{channel}"), "#design");

    let result = Channel::new("   ", ChannelKind::General);
    assert!(matches!(result, Err(ChannelDomainError::EmptyChannelName)));
}

#[rstest]
fn channel_kind_round_trips_through_its_canonical_string() {
    for kind in [
        ChannelKind::General,
        ChannelKind::Department,
        ChannelKind::Private,
    ] {
        assert_eq!(ChannelKind::try_from(kind.as_str()), Ok(kind));
    }
    assert!(ChannelKind::try_from("broadcast").is_err());
}

#[rstest]
fn system_messages_have_no_sender(clock: DefaultClock) {
    let message = ChannelMessage::system(ChannelId::new(), "Task created", &clock);
    assert!(message.is_system());
    assert_eq!(message.sender_id(), None);
}

#[rstest]
fn image_url_is_exposed_only_for_image_media(clock: DefaultClock) {
    let channel_id = ChannelId::new();
    let sender = UserId::new();

    let with_image = ChannelMessage::new(channel_id, "see attached", sender, &clock)
        .with_media(MediaAttachment::image("https://files.example/a.png"));
    assert_eq!(with_image.image_url(), Some("https://files.example/a.png"));

    let with_file = ChannelMessage::new(channel_id, "see attached", sender, &clock)
        .with_media(MediaAttachment::file("https://files.example/b.pdf"));
    assert_eq!(with_file.image_url(), None);
}

#[rstest]
fn task_link_is_write_once(clock: DefaultClock) {
    let mut message = ChannelMessage::new(ChannelId::new(), "!task do it", UserId::new(), &clock);
    let first_task = TaskId::new();

    message.link_task(first_task).expect("first link succeeds");
    let result = message.link_task(TaskId::new());

    assert!(matches!(
        result,
        Err(ChannelDomainError::TaskAlreadyLinked(id)) if id == message.id()
    ));
    assert_eq!(message.linked_task_id(), Some(first_task));
}
