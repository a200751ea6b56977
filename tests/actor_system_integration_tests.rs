//! Integration tests driving the actor runtime end to end through a real
//! [`flowrt::ActorSystem`]: FIFO ordering under concurrent senders, the
//! bypass paths racing the mailbox consumer on purpose, and managed-pool
//! bulk cancellation (spec §8 seed-test scenarios 1-3, exercised here
//! against the full system rather than a bare `Actor`).

#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use flowrt::action::{ActionDispatch, ActionResult};
use flowrt::{ActorSystem, SystemConfig};

struct Log {
    entries: Vec<u64>,
}

impl ActionDispatch for Log {
    fn call_by_action_name(&mut self, action: &str, args: &str) -> ActionResult {
        match action {
            "append" => {
                let value: u64 = args.trim().parse().unwrap_or(0);
                self.entries.push(value);
                ActionResult::ok("")
            }
            "to_string" => ActionResult::ok(format!("{:?}", self.entries)),
            other => ActionResult::unknown_action(other),
        }
    }
}

#[tokio::test]
async fn fifo_ordering_holds_under_concurrent_senders_on_a_registered_actor() {
    let system = ActorSystem::new("order", SystemConfig::default()).unwrap();
    let actor = system.actor_of("log", Log { entries: Vec::new() }).unwrap();

    let mut handles = Vec::new();
    for i in 0u64..10 {
        let actor = Arc::clone(&actor);
        handles.push(tokio::spawn(async move {
            let delay = Duration::from_millis((i * 7) % 50);
            actor
                .tell(move |payload: &mut Log| {
                    std::thread::sleep(delay);
                    payload.entries.push(i);
                })
                .await
                .unwrap();
        }));
    }
    for h in handles {
        h.await.unwrap();
    }

    let result = actor.ask(|payload: &mut Log| format!("{:?}", payload.entries)).await.unwrap();
    assert_eq!(result, "[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]");
}

#[tokio::test]
async fn tell_now_observes_payload_while_a_tell_is_still_mid_flight() {
    let system = ActorSystem::new("bypass", SystemConfig::default()).unwrap();
    let actor = system.actor_of("log", Log { entries: Vec::new() }).unwrap();
    let flag = Arc::new(AtomicBool::new(false));

    // Issue the slow `tell` without awaiting it so it is still mid-sleep on
    // the mailbox consumer when `tell_now` runs concurrently on its own task
    // (spec §8 seed-test scenario 2).
    let slow_tell = actor.tell(|_payload: &mut Log| {
        std::thread::sleep(Duration::from_millis(500));
    });

    let flag_writer = Arc::clone(&flag);
    let bypass_tell_now = actor.tell_now(move |_payload: &mut Log| {
        flag_writer.store(true, Ordering::SeqCst);
    });

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(flag.load(Ordering::SeqCst));

    let (slow_result, bypass_result) = tokio::join!(slow_tell, bypass_tell_now);
    slow_result.unwrap();
    bypass_result.unwrap();
}

#[tokio::test]
async fn managed_pool_bulk_cancel_drops_most_queued_work() {
    let system = ActorSystem::new("cancel", SystemConfig::builder().with_pool_size(4).build().unwrap()).unwrap();
    let completed = Arc::new(AtomicUsize::new(0));
    let pool = system.managed_pool();

    for _ in 0..100 {
        let completed = Arc::clone(&completed);
        pool.submit_for_owner(
            "bulk",
            Box::new(move || {
                std::thread::sleep(Duration::from_millis(100));
                completed.fetch_add(1, Ordering::SeqCst);
            }),
        )
        .unwrap();
    }

    tokio::time::sleep(Duration::from_millis(500)).await;
    pool.cancel_for_owner("bulk");
    assert_eq!(pool.pending_for_owner("bulk"), 0);

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(completed.load(Ordering::SeqCst) < 40);
}

#[tokio::test]
async fn terminate_tears_down_a_system_with_children_and_pools() {
    let system = ActorSystem::new("teardown", SystemConfig::default()).unwrap();
    let parent = system.actor_of("parent", Log { entries: Vec::new() }).unwrap();
    let _child = parent.create_child("child", Log { entries: Vec::new() });
    assert_eq!(system.list().len(), 2);

    system.terminate().await;

    assert!(system.list().is_empty());
    assert!(!system.is_alive());
}
