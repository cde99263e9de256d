// tests/event_policy.rs

mod common;
use crate::common::init_tracing;

use std::error::Error;
use std::path::PathBuf;

use inotify::EventMask;

use ftrap::engine::{CoreCommand, CoreRuntime, SignalReason};
use ftrap::watch::mock::{MockHandle, MockWatchBackend};
use ftrap::watch::{ChangeClass, ChangeRecord, TargetId};

type TestResult = Result<(), Box<dyn Error>>;

/// Core with every path created and activated.
fn started(names: &[&str]) -> Result<(CoreRuntime<MockHandle>, MockWatchBackend), Box<dyn Error>> {
    let mut backend = MockWatchBackend::new();
    for name in names {
        backend.create(name);
    }
    let mut core = CoreRuntime::new(names.iter().map(PathBuf::from));
    core.start(&mut backend)?;
    Ok((core, backend))
}

fn handle_of(core: &CoreRuntime<MockHandle>, index: usize) -> Result<MockHandle, Box<dyn Error>> {
    let id = core
        .watches()
        .active()
        .find(|id| id.index() == index)
        .ok_or("target is not active")?;
    Ok(*core.watches().target(id).handle().ok_or("no handle")?)
}

fn target(core: &CoreRuntime<MockHandle>, index: usize) -> TargetId {
    core.watches()
        .queued()
        .chain(core.watches().active())
        .find(|id| id.index() == index)
        .expect("target exists")
}

#[test]
fn masks_map_to_policy_buckets() {
    init_tracing();

    let write = ChangeClass::from_mask(EventMask::CLOSE_WRITE);
    assert!(write.content_changed && !write.needs_requeue());

    let create = ChangeClass::from_mask(EventMask::CREATE);
    assert!(create.content_changed && !create.needs_requeue());

    let moved = ChangeClass::from_mask(EventMask::MOVE_SELF);
    assert!(moved.handle_invalidated && !moved.content_changed);

    let attrib = ChangeClass::from_mask(EventMask::ATTRIB);
    assert!(attrib.handle_invalidated && attrib.needs_requeue());

    let ignored = ChangeClass::from_mask(EventMask::IGNORED);
    assert!(ignored.auto_removed && !ignored.handle_invalidated);

    let deleted = ChangeClass::from_mask(EventMask::DELETE_SELF);
    assert_eq!(deleted, ChangeClass::default(), "IN_IGNORED follows on its own");
}

#[test]
fn initial_activation_requests_no_signal() -> TestResult {
    init_tracing();

    let mut backend = MockWatchBackend::new();
    backend.create("a");
    let mut core: CoreRuntime<MockHandle> = CoreRuntime::new(vec![PathBuf::from("a")]);

    assert_eq!(core.start(&mut backend)?, 1);
    let step = core.handle_tick(&mut backend)?;
    assert!(step.commands.is_empty());
    Ok(())
}

#[test]
fn each_content_change_in_a_batch_is_one_signal() -> TestResult {
    init_tracing();

    let (mut core, mut backend) = started(&["a", "b", "c"])?;
    let records = (0..3)
        .map(|i| Ok(ChangeRecord::new(handle_of(&core, i)?, EventMask::CLOSE_WRITE)))
        .collect::<Result<Vec<_>, Box<dyn Error>>>()?;

    let step = core.handle_batch(records, &mut backend)?;

    assert_eq!(step.signal_count(), 3, "no merging, no dropping");
    let paths: Vec<_> = step
        .commands
        .iter()
        .map(|CoreCommand::DeliverSignal(reason)| reason.clone())
        .collect();
    assert_eq!(
        paths,
        vec![
            SignalReason::ContentChanged { path: Some(PathBuf::from("a")) },
            SignalReason::ContentChanged { path: Some(PathBuf::from("b")) },
            SignalReason::ContentChanged { path: Some(PathBuf::from("c")) },
        ]
    );
    assert_eq!(core.watches().active_len(), 3, "writes keep targets active");
    Ok(())
}

#[test]
fn path_created_later_signals_once_on_activation() -> TestResult {
    init_tracing();

    let mut backend = MockWatchBackend::new();
    let mut core: CoreRuntime<MockHandle> = CoreRuntime::new(vec![PathBuf::from("late")]);
    assert_eq!(core.start(&mut backend)?, 0);

    assert!(core.handle_tick(&mut backend)?.commands.is_empty());

    backend.create("late");
    let step = core.handle_tick(&mut backend)?;
    assert_eq!(
        step.commands,
        vec![CoreCommand::DeliverSignal(SignalReason::PathsAppeared { count: 1 })]
    );

    assert!(core.handle_tick(&mut backend)?.commands.is_empty());
    Ok(())
}

#[test]
fn deleted_path_is_requeued_without_signal() -> TestResult {
    init_tracing();

    let (mut core, mut backend) = started(&["f"])?;
    let handle = handle_of(&core, 0)?;

    // Unlink: the kernel reports ATTRIB, DELETE_SELF, then IGNORED.
    let dropped = backend.delete("f");
    assert_eq!(dropped, vec![handle]);
    let records = vec![
        ChangeRecord::new(handle, EventMask::ATTRIB),
        ChangeRecord::new(handle, EventMask::DELETE_SELF),
        ChangeRecord::new(handle, EventMask::IGNORED),
    ];

    let step = core.handle_batch(records, &mut backend)?;
    assert!(step.commands.is_empty(), "deletion alone does not signal");
    assert!(!core.watches().is_active(target(&core, 0)));
    assert_eq!(core.watches().queued_len(), 1);

    // Nothing more until the path comes back.
    assert!(core.handle_tick(&mut backend)?.commands.is_empty());

    backend.create("f");
    let step = core.handle_tick(&mut backend)?;
    assert_eq!(step.signal_count(), 1);
    assert!(core.watches().is_active(target(&core, 0)));
    Ok(())
}

#[test]
fn self_replace_is_released_requeued_and_reactivated_in_one_step() -> TestResult {
    init_tracing();

    let (mut core, mut backend) = started(&["f"])?;
    let handle = handle_of(&core, 0)?;

    // `mv f.new f`: the old inode's watch is invalidated, the path exists.
    let step = core.handle_batch(vec![ChangeRecord::new(handle, EventMask::MOVE_SELF)], &mut backend)?;

    assert_eq!(backend.removed(), &[handle], "handle released explicitly");
    assert!(!backend.is_live(handle));
    let new_handle = handle_of(&core, 0)?;
    assert_ne!(new_handle, handle, "fresh watch on the replacement");
    assert_eq!(
        step.commands,
        vec![CoreCommand::DeliverSignal(SignalReason::PathsAppeared { count: 1 })]
    );
    Ok(())
}

#[test]
fn already_released_handle_is_tolerated() -> TestResult {
    init_tracing();

    let (mut core, mut backend) = started(&["f"])?;
    let handle = handle_of(&core, 0)?;
    backend.drop_watch(handle);
    backend.delete("f");

    let step = core.handle_batch(vec![ChangeRecord::new(handle, EventMask::ATTRIB)], &mut backend)?;

    assert!(step.commands.is_empty());
    assert!(backend.removed().is_empty());
    assert_eq!(core.watches().queued_len(), 1, "target requeued anyway");
    Ok(())
}

#[test]
fn records_for_already_requeued_targets_are_skipped() -> TestResult {
    init_tracing();

    let (mut core, mut backend) = started(&["f", "g"])?;
    let f = handle_of(&core, 0)?;
    let g = handle_of(&core, 1)?;
    backend.delete("f");

    let records = vec![
        ChangeRecord::new(f, EventMask::MOVE_SELF),
        // Same target again in the same batch: no longer active.
        ChangeRecord::new(f, EventMask::IGNORED),
        ChangeRecord::new(f, EventMask::ATTRIB),
        ChangeRecord::new(g, EventMask::CLOSE_WRITE),
    ];
    let step = core.handle_batch(records, &mut backend)?;

    assert_eq!(
        step.commands,
        vec![CoreCommand::DeliverSignal(SignalReason::ContentChanged {
            path: Some(PathBuf::from("g"))
        })]
    );
    assert_eq!(core.watches().queued_len(), 1);
    assert_eq!(core.watches().active_len(), 1);
    Ok(())
}

#[test]
fn unknown_handles_are_ignored() -> TestResult {
    init_tracing();

    let (mut core, mut backend) = started(&["f"])?;
    let records = vec![
        ChangeRecord::new(998, EventMask::IGNORED),
        ChangeRecord::new(999, EventMask::ATTRIB),
    ];

    let step = core.handle_batch(records, &mut backend)?;
    assert!(step.commands.is_empty());
    assert_eq!(core.watches().active_len(), 1);
    Ok(())
}

#[test]
fn overflow_rearms_every_watch() -> TestResult {
    init_tracing();

    let (mut core, mut backend) = started(&["f", "g", "f"])?;
    let before = handle_of(&core, 0)?;
    // Records for `g` were lost: the kernel already dropped its watch.
    backend.delete("g");

    let step = core.handle_batch(vec![ChangeRecord::new(0, EventMask::Q_OVERFLOW)], &mut backend)?;

    assert_eq!(backend.removed(), &[before], "each live handle released once");
    assert_eq!(core.watches().active_len(), 2, "both `f` targets re-armed");
    assert_eq!(core.watches().queued_len(), 1, "`g` waits to exist again");
    assert_ne!(handle_of(&core, 0)?, before);
    assert_eq!(handle_of(&core, 0)?, handle_of(&core, 2)?);
    assert_eq!(
        step.commands,
        vec![CoreCommand::DeliverSignal(SignalReason::PathsAppeared { count: 2 })]
    );
    Ok(())
}

#[test]
fn duplicate_targets_are_requeued_together_on_invalidation() -> TestResult {
    init_tracing();

    for mask in [EventMask::ATTRIB, EventMask::MOVE_SELF, EventMask::IGNORED] {
        let (mut core, mut backend) = started(&["f", "f", "f"])?;
        let shared = handle_of(&core, 0)?;
        assert_eq!(handle_of(&core, 2)?, shared);
        if mask == EventMask::IGNORED {
            backend.drop_watch(shared);
        }

        let step = core.handle_batch(vec![ChangeRecord::new(shared, mask)], &mut backend)?;

        assert!(!backend.is_live(shared), "{mask:?}");
        let renewed = handle_of(&core, 0)?;
        assert_ne!(renewed, shared, "{mask:?}");
        for i in 1..3 {
            assert_eq!(handle_of(&core, i)?, renewed, "{mask:?}: no target keeps a dead handle");
        }
        assert_eq!(
            step.commands,
            vec![CoreCommand::DeliverSignal(SignalReason::PathsAppeared { count: 3 })],
            "{mask:?}"
        );
    }
    Ok(())
}

#[test]
fn ignored_after_chmod_of_duplicates_does_not_signal_again() -> TestResult {
    init_tracing();

    let (mut core, mut backend) = started(&["f", "f", "f"])?;
    let shared = handle_of(&core, 0)?;

    // `chmod f`: ATTRIB now, IN_IGNORED for the released watch later.
    let first = core.handle_batch(vec![ChangeRecord::new(shared, EventMask::ATTRIB)], &mut backend)?;
    let second = core.handle_batch(vec![ChangeRecord::new(shared, EventMask::IGNORED)], &mut backend)?;

    assert_eq!(first.signal_count(), 1);
    assert!(second.commands.is_empty(), "stale IN_IGNORED must not re-arm anything");
    assert_eq!(core.watches().active_len(), 3);
    Ok(())
}

#[test]
fn content_change_and_new_path_in_one_batch_signal_twice() -> TestResult {
    init_tracing();

    let mut backend = MockWatchBackend::new();
    backend.create("dir");
    let mut core: CoreRuntime<MockHandle> =
        CoreRuntime::new(vec![PathBuf::from("dir"), PathBuf::from("dir/new.conf")]);
    core.start(&mut backend)?;
    let dir = handle_of(&core, 0)?;

    backend.create("dir/new.conf");
    let step = core.handle_batch(vec![ChangeRecord::new(dir, EventMask::CREATE)], &mut backend)?;

    assert_eq!(
        step.commands,
        vec![
            CoreCommand::DeliverSignal(SignalReason::ContentChanged {
                path: Some(PathBuf::from("dir"))
            }),
            CoreCommand::DeliverSignal(SignalReason::PathsAppeared { count: 1 }),
        ]
    );
    Ok(())
}

#[test]
fn permanent_error_during_retry_is_reported() -> TestResult {
    init_tracing();

    let mut backend = MockWatchBackend::new();
    let mut core: CoreRuntime<MockHandle> = CoreRuntime::new(vec![PathBuf::from("x")]);
    core.start(&mut backend)?;

    backend.fail_with("x", std::io::ErrorKind::PermissionDenied);
    assert!(core.handle_tick(&mut backend).is_err());
    Ok(())
}
