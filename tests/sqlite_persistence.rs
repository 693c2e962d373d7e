use tempfile::TempDir;

use swipebite::{
    core::catalog::StaticCatalog,
    item::FoodItem,
    persist::{KvStore, load_json, save_json, sqlite::SqliteKvStore},
    session::{Session, SessionConfig},
    types::keys,
};

#[test]
fn sqlite_store_set_get_remove_round_trips() {
    let mut store = SqliteKvStore::open_in_memory().expect("open");

    assert_eq!(store.get("missing").expect("get"), None);
    store.set("k", "\"v1\"").expect("set");
    store.set("k", "\"v2\"").expect("overwrite");
    assert_eq!(store.get("k").expect("get").as_deref(), Some("\"v2\""));
    assert!(store.updated_ms("k").expect("ts").is_some());

    store.remove("k").expect("remove");
    store.remove("k").expect("remove twice");
    assert_eq!(store.get("k").expect("get"), None);
    assert!(store.keys().expect("keys").is_empty());
}

#[test]
fn saved_items_survive_reopen_and_are_reconciled() {
    let tmp = TempDir::new().expect("tmp");
    let db_path = tmp.path().join("session.db");

    let saved_ids = {
        let store = SqliteKvStore::open(&db_path).expect("open sqlite");
        let mut session = Session::open(Box::new(store), SessionConfig::default()).expect("session");
        let mut source = StaticCatalog::builtin().expect("catalog");
        session.fetch(&mut source).expect("fetch");

        session.save_current().expect("save").expect("item");
        session.skip().expect("skip");
        session.save_current().expect("save").expect("item");
        session.select_city("Hyderabad").expect("city");

        session.saved().iter().map(|i| i.id.clone()).collect::<Vec<_>>()
    };
    assert_eq!(saved_ids, vec!["1", "3"]);

    // Corrupt one stored copy; reopening should swap in the catalog copy.
    {
        let mut store = SqliteKvStore::open(&db_path).expect("reopen");
        let mut stored: Vec<FoodItem> = load_json(&store, keys::SAVED_ITEMS).expect("load").expect("present");
        stored[0].name = "stale".to_string();
        save_json(&mut store, keys::SAVED_ITEMS, &stored).expect("write");
        assert_eq!(
            store.keys().expect("keys"),
            vec![keys::SAVED_ITEMS.to_string(), keys::SELECTED_CITY.to_string()]
        );
    }

    let store = SqliteKvStore::open(&db_path).expect("reopen");
    let mut session = Session::open(Box::new(store), SessionConfig::default()).expect("session");
    assert_eq!(session.saved()[0].name, "Hyderabadi Biryani");
    assert_eq!(session.auth().selected_city(), Some("Hyderabad"));

    let mut source = StaticCatalog::builtin().expect("catalog");
    session.fetch(&mut source).expect("fetch");
    let unseen: Vec<&str> = session.queue().unseen().iter().map(|i| i.id.as_str()).collect();
    assert_eq!(unseen, vec!["2", "4", "5", "6"]);
    assert_eq!(session.current().map(|i| i.id.as_str()), Some("2"));
}
