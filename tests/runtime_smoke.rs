use std::time::Duration;

use swipebite::{
    core::{
        catalog::{CatalogSource, FetchError, StaticCatalog},
        queue::QueueError,
    },
    item::FoodItem,
    persist::memory::MemoryKvStore,
    runtime::{
        events::SessionEvent,
        handle::{RuntimeConfig, RuntimeError, spawn_session},
    },
    session::{Session, SessionConfig, SessionError},
    types::{Decision, QueueStatus},
};

fn session() -> Session {
    Session::open(Box::new(MemoryKvStore::new()), SessionConfig::default()).expect("session")
}

struct FlakySource {
    inner: StaticCatalog,
    fail_next: bool,
}

impl CatalogSource for FlakySource {
    fn load(&mut self) -> Result<Vec<FoodItem>, FetchError> {
        if self.fail_next {
            self.fail_next = false;
            return Err(FetchError::new("timeout"));
        }
        self.inner.load()
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[tokio::test]
async fn manual_fetch_and_decisions_emit_ordered_events() {
    init_tracing();
    let cfg = RuntimeConfig {
        fetch_on_start: false,
        ..RuntimeConfig::immediate()
    };
    let handle = spawn_session(session(), Box::new(Session::builtin_source().expect("catalog")), cfg);
    let mut sub = handle.subscribe();

    assert_eq!(handle.fetch().await.expect("fetch"), 6);
    let saved = handle.decide(Decision::Save).await.expect("save");
    assert!(saved.is_some());
    let skipped = handle.skip().await.expect("skip").expect("item");
    assert_eq!(skipped.id, "2");
    handle.remove("1").await.expect("remove").expect("removed");

    let expected = [
        SessionEvent::FetchStarted,
        SessionEvent::Fetched { unseen: 6 },
        SessionEvent::Saved { id: "1".to_string() },
    ];
    for want in expected {
        let got = tokio::time::timeout(Duration::from_secs(1), sub.recv())
            .await
            .expect("event timeout")
            .expect("event");
        assert_eq!(got, want);
    }
    match sub.recv().await.expect("notice") {
        SessionEvent::Notice(notice) => {
            assert_eq!(notice.title, "Food item saved");
            assert_eq!(notice.description, "Hyderabadi Biryani added to your Eat-List");
        }
        other => panic!("expected notice, got {other:?}"),
    }
    assert_eq!(sub.recv().await.expect("skip"), SessionEvent::Skipped { id: "2".to_string() });
    assert_eq!(sub.recv().await.expect("remove"), SessionEvent::Removed { id: "1".to_string() });

    let current = handle.current().await.expect("current").expect("item");
    assert_eq!(current.id, "3");
    assert!(handle.saved().await.expect("saved").is_empty());

    handle.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn startup_fetch_runs_before_first_command() {
    let handle = spawn_session(
        session(),
        Box::new(Session::builtin_source().expect("catalog")),
        RuntimeConfig::immediate(),
    );

    assert_eq!(handle.status().await.expect("status"), QueueStatus::HasItem);
    let current = handle.current().await.expect("current").expect("item");
    assert_eq!(current.id, "1");

    handle.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn duplicate_save_is_not_announced_as_saved() {
    let cfg = RuntimeConfig {
        fetch_on_start: false,
        ..RuntimeConfig::immediate()
    };
    let handle = spawn_session(session(), Box::new(Session::builtin_source().expect("catalog")), cfg);
    handle.fetch().await.expect("fetch");
    let item = handle.current().await.expect("current").expect("item");

    let mut sub = handle.subscribe();
    handle.save(item.clone()).await.expect("save");
    handle.save(item.clone()).await.expect("duplicate save");
    assert_eq!(handle.saved().await.expect("saved").len(), 1);

    assert_eq!(sub.recv().await.expect("saved"), SessionEvent::Saved { id: "1".to_string() });
    match sub.recv().await.expect("notice") {
        SessionEvent::Notice(notice) => assert_eq!(notice.title, "Food item saved"),
        other => panic!("expected notice, got {other:?}"),
    }
    match sub.recv().await.expect("duplicate notice") {
        SessionEvent::Notice(notice) => {
            assert_eq!(notice.title, "Already saved");
            assert_eq!(notice.description, "Hyderabadi Biryani is already in your Eat-List");
        }
        other => panic!("expected notice, got {other:?}"),
    }

    handle.shutdown().await.expect("shutdown");
    assert!(sub.try_recv().is_err());
}

#[tokio::test]
async fn decisions_sent_during_fetch_wait_for_it() {
    let cfg = RuntimeConfig {
        fetch_latency_ms: 50,
        auth_latency_ms: 0,
        fetch_on_start: false,
        ..RuntimeConfig::default()
    };
    let handle = spawn_session(session(), Box::new(Session::builtin_source().expect("catalog")), cfg);

    let fetcher = handle.clone();
    let fetch = tokio::spawn(async move { fetcher.fetch().await });
    tokio::time::sleep(Duration::from_millis(10)).await;

    let applied = handle.decide(Decision::Save).await.expect("decide");
    assert!(applied.is_some());
    assert_eq!(fetch.await.expect("join").expect("fetch"), 6);

    let saved = handle.saved().await.expect("saved");
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].id, "1");
    assert_eq!(handle.status().await.expect("status"), QueueStatus::HasItem);

    handle.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn failed_fetch_surfaces_error_and_notice() {
    let source = FlakySource {
        inner: Session::builtin_source().expect("catalog"),
        fail_next: true,
    };
    let handle = spawn_session(session(), Box::new(source), RuntimeConfig {
        fetch_on_start: false,
        ..RuntimeConfig::immediate()
    });
    let mut sub = handle.subscribe();

    let err = handle.fetch().await.unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Session(SessionError::Queue(QueueError::Fetch(_)))
    ));
    assert_eq!(handle.status().await.expect("status"), QueueStatus::Error);

    assert_eq!(sub.recv().await.expect("started"), SessionEvent::FetchStarted);
    assert_eq!(sub.recv().await.expect("failed"), SessionEvent::FetchFailed);
    match sub.recv().await.expect("notice") {
        SessionEvent::Notice(notice) => assert_eq!(notice.description, "Failed to fetch food items"),
        other => panic!("expected notice, got {other:?}"),
    }

    assert_eq!(handle.fetch().await.expect("retry"), 6);
    assert_eq!(handle.status().await.expect("status"), QueueStatus::HasItem);
    handle.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn login_failure_and_success_round_trip_through_runtime() {
    let handle = spawn_session(
        session(),
        Box::new(Session::builtin_source().expect("catalog")),
        RuntimeConfig::immediate(),
    );

    let err = handle.login("adam@example.com", "nope").await.unwrap_err();
    assert!(matches!(err, RuntimeError::Session(SessionError::Auth(_))));
    assert!(handle.current_user().await.expect("user").is_none());

    let user = handle.login("adam@example.com", "password123").await.expect("login");
    assert_eq!(user.username, "foodie_adam");
    handle.select_city("Hyderabad").await.expect("city");
    assert_eq!(handle.matches().await.expect("matches").len(), 3);

    handle.logout().await.expect("logout");
    assert!(handle.current_user().await.expect("user").is_none());

    handle.shutdown().await.expect("shutdown");
    assert!(matches!(handle.status().await, Err(RuntimeError::ChannelClosed)));
}
